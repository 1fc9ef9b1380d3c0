//! CORS policy and the per-path preflight operation.

use indexmap::IndexMap;

use crate::spec::{
    ApiSpec, CorsPolicy, HeaderSpec, IntegrationResponseSpec, IntegrationSpec, OperationSpec,
    ResponseSpec,
};
use crate::synth::stack::Stage;

// TODO: replace with the real production origins once the frontend domain is final.
const PROD_ALLOW_ORIGINS: &[&str] = &["..."];

const ALLOW_METHODS: &[&str] = &["GET", "OPTIONS", "POST", "PUT", "DELETE", "HEAD"];

const ALLOW_HEADERS: &[&str] = &[
    "x-amzm-header",
    "x-apigateway-header",
    "x-api-key",
    "authorization",
    "x-amz-date",
    "content-type",
];

const PREFLIGHT_HEADERS: &[&str] = &[
    "Access-Control-Allow-Headers",
    "Access-Control-Allow-Methods",
    "Access-Control-Allow-Origin",
];

/// Attaches the CORS policy to the definition root and installs the mock
/// preflight under every path. A declared OPTIONS operation is replaced;
/// preflight behavior is owned by the gateway, not by handlers.
pub fn apply_cors(spec: &mut ApiSpec, stage: Stage) {
    let allow_origins = if stage.is_prod() {
        to_owned_vec(PROD_ALLOW_ORIGINS)
    } else {
        vec![String::from("*")]
    };

    spec.cors = Some(CorsPolicy {
        allow_origins,
        allow_methods: to_owned_vec(ALLOW_METHODS),
        allow_headers: to_owned_vec(ALLOW_HEADERS),
    });

    for item in spec.paths.values_mut() {
        item.options = Some(preflight_operation());
    }
}

/// The preflight never reaches a function. A mock integration echoes a fixed
/// 200 with wide-open response headers straight from the gateway.
fn preflight_operation() -> OperationSpec {
    let mut request_templates = IndexMap::new();
    request_templates.insert(
        String::from("application/json"),
        String::from("{\"statusCode\" : 200}"),
    );

    let mut response_parameters = IndexMap::new();
    response_parameters.insert(
        String::from("method.response.header.Access-Control-Allow-Headers"),
        String::from("'*'"),
    );
    response_parameters.insert(
        String::from("method.response.header.Access-Control-Allow-Methods"),
        String::from("'OPTIONS,GET,POST,PUT,DELETE,HEAD,PATCH'"),
    );
    response_parameters.insert(
        String::from("method.response.header.Access-Control-Allow-Origin"),
        String::from("'*'"),
    );

    let mut integration_responses = IndexMap::new();
    integration_responses.insert(
        String::from("default"),
        IntegrationResponseSpec {
            status_code: 200,
            response_parameters,
        },
    );

    let mut declared = ResponseSpec {
        description: String::from("200 response"),
        ..ResponseSpec::default()
    };
    for header in PREFLIGHT_HEADERS {
        declared
            .headers
            .insert((*header).to_owned(), HeaderSpec::string());
    }

    let mut responses = IndexMap::new();
    responses.insert(String::from("200"), declared);

    OperationSpec {
        integration: Some(IntegrationSpec {
            kind: String::from("mock"),
            uri: None,
            http_method: None,
            passthrough_behavior: None,
            request_templates,
            responses: integration_responses,
        }),
        responses,
        ..OperationSpec::default()
    }
}

fn to_owned_vec(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}
