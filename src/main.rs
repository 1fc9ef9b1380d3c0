use aws_apigw_bridge::{api, handler};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use std::sync::Arc;

use aws_apigw_bridge::models::gateway::GatewayEvent;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Use Lambda runtime's built-in tracing subscriber for CloudWatch Logs
    lambda_runtime::tracing::init_default_subscriber();

    let router = Arc::new(api::router());

    lambda_runtime::run(service_fn(move |event: LambdaEvent<GatewayEvent>| {
        let router = Arc::clone(&router);
        async move { handler::bridge_request(&router, event).await }
    }))
    .await
}
