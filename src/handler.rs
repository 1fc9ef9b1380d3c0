use lambda_runtime::tracing::{error, info, warn};
use lambda_runtime::{Diagnostic, LambdaEvent};

use crate::bridge::{self, RequestContext};
use crate::models::error::ErrorBody;
use crate::models::gateway::{GatewayEvent, GatewayResponse};
use crate::models::identity::{Identity, IdentityClaims};
use crate::router::Router;

/// Bridges one gateway invocation through the router.
///
/// The pipeline is: normalize the event, authenticate the caller, resolve
/// the route, dispatch. Authentication runs before routing; an invocation
/// without valid claims never reaches a handler. Auth failures, route
/// misses and endpoint errors all come back as well-formed gateway
/// responses, not failed invocations.
///
/// # Errors
///
/// Returns a `Diagnostic` with type `InvalidBody` when the event flags its
/// body as base64 and the payload does not decode. Every other failure maps
/// to an error-status response.
pub async fn bridge_request(
    router: &Router,
    event: LambdaEvent<GatewayEvent>,
) -> Result<GatewayResponse, Diagnostic> {
    let (event, _context) = event.into_parts();

    let request = bridge::normalize_request(&event).map_err(|e| {
        error!(error = %e, "Failed to decode request body");
        Diagnostic {
            error_type: "InvalidBody".to_string(),
            error_message: format!("Failed to decode request body: {e}"),
        }
    })?;

    let claims = match IdentityClaims::from_authorizer(event.request_context.authorizer.as_ref()) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, "Rejecting unauthenticated invocation");
            return Ok(error_response(
                401,
                ErrorBody {
                    error: String::from("Unauthorized"),
                    message: Some(String::from("invocation is not authenticated")),
                },
            ));
        }
    };
    let identity = Identity::from_claims(claims);

    let Some(matched) = router.resolve(&request.method, &request.path) else {
        warn!(method = %request.method, path = %request.path, "No route for request");
        return Ok(error_response(
            404,
            ErrorBody {
                error: String::from("NotFound"),
                message: Some(format!("no route for {} {}", request.method, request.path)),
            },
        ));
    };

    info!(
        operation = %matched.operation_id,
        user = %identity.username,
        "Dispatching request"
    );

    let context = RequestContext {
        request,
        identity,
        path_params: matched.path_params,
    };

    match router.dispatch(&matched.operation_id, context).await {
        Ok(response) => Ok(bridge::into_gateway_response(response)),
        Err(e) => {
            error!(operation = %matched.operation_id, error = %e, "Endpoint failed");
            Ok(error_response(e.status_code(), e.to_body()))
        }
    }
}

/// Builds a JSON error response in the declared error body shape.
fn error_response(status: u16, body: ErrorBody) -> GatewayResponse {
    let body = serde_json::to_string(&body).unwrap_or_else(|_| String::from("{}"));
    let mut headers = std::collections::HashMap::new();
    headers.insert(
        String::from("content-type"),
        String::from("application/json"),
    );
    GatewayResponse {
        status_code: status,
        headers,
        body,
        is_base64_encoded: false,
    }
}
