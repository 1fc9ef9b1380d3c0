// Synthesis pipeline tests: declared API to deployable definition and ledger
#![allow(clippy::unwrap_used)]

use aws_apigw_bridge::api;
use aws_apigw_bridge::models::api::{ApiGroup, ApiMethod, ApiSchema, EndpointDefinition, ErrorVariant};
use aws_apigw_bridge::models::error::SynthError;
use aws_apigw_bridge::models::users::{FetchRandomUserPath, RandomUser};
use aws_apigw_bridge::spec::OperationSpec;
use aws_apigw_bridge::synth::stack::Resource;
use aws_apigw_bridge::synth::synthesizer::{sanitize_operation_id, synthesize};
use aws_apigw_bridge::synth::{self, DeployContext, Stack, Stage};
use serde_json::json;

#[test]
fn test_sanitize_collapses_separator_characters() {
    assert_eq!(
        sanitize_operation_id("Organization.Fetch/User:v2 beta"),
        "Organization-Fetch-User-v2-beta"
    );
    assert_eq!(sanitize_operation_id("AlreadyClean"), "AlreadyClean");
}

#[test]
fn test_every_endpoint_becomes_an_operation() {
    let spec = synthesize(&two_group_api()).unwrap();

    let rendered = serde_json::to_value(&spec).unwrap();
    assert_eq!(
        rendered["paths"]["/users/random/{seed}"]["get"]["operationId"],
        "Organization-FetchRandomUser"
    );
    assert_eq!(
        rendered["paths"]["/users"]["post"]["operationId"],
        "Organization-CreateUser"
    );
    assert_eq!(
        rendered["paths"]["/health"]["get"]["operationId"],
        "Platform-Health"
    );

    // Secured group operations carry the requirement, open groups do not.
    assert_eq!(
        rendered["paths"]["/users"]["post"]["security"],
        json!([{"Basic": []}])
    );
    assert!(rendered["paths"]["/health"]["get"].get("security").is_none());
}

#[test]
fn test_path_parameters_typed_from_path_schema() {
    let spec = synthesize(&api::api()).unwrap();
    let rendered = serde_json::to_value(&spec).unwrap();

    let parameters = &rendered["paths"]["/users/random/{seed}"]["get"]["parameters"];
    assert_eq!(parameters.as_array().unwrap().len(), 1);
    assert_eq!(parameters[0]["name"], "seed");
    assert_eq!(parameters[0]["in"], "path");
    assert_eq!(parameters[0]["required"], true);
    assert_eq!(parameters[0]["schema"]["type"], "integer");
}

#[test]
fn test_path_parameters_default_to_string_without_schema() {
    let api = ApiSchema::new("Test").group(
        ApiGroup::new("Things").endpoint(EndpointDefinition::get("GetThing", "/things/:id")),
    );
    let spec = synthesize(&api).unwrap();
    let rendered = serde_json::to_value(&spec).unwrap();

    let parameters = &rendered["paths"]["/things/{id}"]["get"]["parameters"];
    assert_eq!(parameters[0]["schema"], json!({"type": "string"}));
}

#[test]
fn test_success_and_error_responses_declared() {
    let spec = synthesize(&api::api()).unwrap();
    let rendered = serde_json::to_value(&spec).unwrap();
    let operation = &rendered["paths"]["/users/random/{seed}"]["get"];

    let success = &operation["responses"]["200"];
    assert_eq!(success["description"], "Success");
    let body_schema = &success["content"]["application/json"]["schema"];
    assert!(body_schema["properties"].get("name").is_some());
    assert!(body_schema["properties"].get("randomAge").is_some());
    assert!(body_schema.get("$schema").is_none(), "metadata keys must be stripped");
    assert!(body_schema.get("title").is_none(), "metadata keys must be stripped");

    let error = &operation["responses"]["500"];
    assert_eq!(error["description"], "UnknownException");
    let error_schema = &error["content"]["application/json"]["schema"];
    assert!(error_schema["properties"].get("error").is_some());
    assert!(error_schema["properties"].get("message").is_some());
}

#[test]
fn test_endpoint_without_success_schema_declares_204() {
    let api = ApiSchema::new("Test").group(
        ApiGroup::new("Things").endpoint(EndpointDefinition::delete("DropThing", "/things/:id")),
    );
    let spec = synthesize(&api).unwrap();
    let rendered = serde_json::to_value(&spec).unwrap();

    let responses = &rendered["paths"]["/things/{id}"]["delete"]["responses"];
    assert_eq!(responses["204"]["description"], "Success");
    assert!(responses.get("200").is_none());
}

#[test]
fn test_request_body_declared_for_body_schema() {
    let api = ApiSchema::new("Test").group(
        ApiGroup::new("Organization").endpoint(
            EndpointDefinition::post("CreateUser", "/users").body::<RandomUser>(),
        ),
    );
    let spec = synthesize(&api).unwrap();
    let rendered = serde_json::to_value(&spec).unwrap();

    let request_body = &rendered["paths"]["/users"]["post"]["requestBody"];
    assert_eq!(request_body["required"], true);
    assert!(
        request_body["content"]["application/json"]["schema"]["properties"]
            .get("randomAge")
            .is_some()
    );
}

#[test]
fn test_names_colliding_after_sanitization_rejected() {
    let api = ApiSchema::new("Test").group(
        ApiGroup::new("Org")
            .endpoint(EndpointDefinition::get("a.b", "/first"))
            .endpoint(EndpointDefinition::get("a/b", "/second")),
    );

    match synthesize(&api) {
        Err(SynthError::DuplicateOperationId { id }) => assert_eq!(id, "Org-a-b"),
        other => panic!("expected DuplicateOperationId, got {other:?}"),
    }
}

#[test]
fn test_duplicate_route_rejected() {
    let api = ApiSchema::new("Test").group(
        ApiGroup::new("Org")
            .endpoint(EndpointDefinition::get("First", "/users/:id"))
            .endpoint(EndpointDefinition::get("Second", "/users/:id")),
    );

    match synthesize(&api) {
        Err(SynthError::DuplicateRoute { path, method }) => {
            assert_eq!(path, "/users/{id}");
            assert_eq!(method, "get");
        }
        other => panic!("expected DuplicateRoute, got {other:?}"),
    }
}

#[test]
fn test_binder_rejects_operation_without_id() {
    let mut spec = synthesize(&api::api()).unwrap();
    let item = spec.paths.get_mut("/users/random/{seed}").unwrap();
    let nameless = OperationSpec::default();
    item.set_operation(ApiMethod::Put, nameless);

    let mut stack = Stack::new();
    let result = synth::integration::bind_integrations(&mut spec, &mut stack, &dev_context());

    match result {
        Err(SynthError::MissingOperationId { path, method }) => {
            assert_eq!(path, "/users/random/{seed}");
            assert_eq!(method, "put");
        }
        other => panic!("expected MissingOperationId, got {other:?}"),
    }
}

#[test]
fn test_binder_provisions_function_and_permission_per_operation() {
    let context = dev_context();
    let gateway = synth::synthesize_gateway(&two_group_api(), &context).unwrap();

    let functions: Vec<&str> = gateway
        .stack
        .resources()
        .iter()
        .filter_map(|resource| match resource {
            Resource::Function { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        functions,
        vec![
            "Organization-FetchRandomUser",
            "Organization-CreateUser",
            "Platform-Health"
        ]
    );

    for resource in gateway.stack.resources() {
        match resource {
            Resource::Function { handler, arn, name } => {
                assert_eq!(handler, "bootstrap", "all operations share one handler");
                assert_eq!(
                    arn,
                    &format!("arn:aws:lambda:us-east-1:123456789012:function:{name}")
                );
            }
            Resource::Permission { principal, .. } => {
                assert_eq!(principal, "apigateway.amazonaws.com");
            }
            Resource::RestApi { .. } => {}
        }
    }
}

#[test]
fn test_binder_attaches_proxy_integration() {
    let context = dev_context();
    let gateway = synth::synthesize_gateway(&api::api(), &context).unwrap();
    let rendered = serde_json::to_value(&gateway.spec).unwrap();

    let integration =
        &rendered["paths"]["/users/random/{seed}"]["get"]["x-amazon-apigateway-integration"];
    assert_eq!(integration["type"], "aws_proxy");
    assert_eq!(integration["httpMethod"], "POST", "gateway always POSTs to the function");
    assert_eq!(integration["passthroughBehavior"], "when_no_match");
    assert_eq!(
        integration["uri"],
        "arn:aws:apigateway:us-east-1:lambda:path/2015-03-31/functions/\
         arn:aws:lambda:us-east-1:123456789012:function:Organization-FetchRandomUser/invocations"
    );
}

#[test]
fn test_allow_origin_header_merged_into_declared_200() {
    let context = dev_context();
    let gateway = synth::synthesize_gateway(&api::api(), &context).unwrap();
    let rendered = serde_json::to_value(&gateway.spec).unwrap();

    let success = &rendered["paths"]["/users/random/{seed}"]["get"]["responses"]["200"];
    assert_eq!(
        success["headers"]["Access-Control-Allow-Origin"],
        json!({"schema": {"type": "string"}})
    );
    // The declared body survives the merge.
    assert_eq!(success["description"], "Success");
    assert!(
        success["content"]["application/json"]["schema"]["properties"]
            .get("randomAge")
            .is_some()
    );
}

#[test]
fn test_allow_origin_header_creates_200_when_absent() {
    let api = ApiSchema::new("Test").group(
        ApiGroup::new("Things").endpoint(EndpointDefinition::delete("DropThing", "/things/:id")),
    );
    let gateway = synth::synthesize_gateway(&api, &dev_context()).unwrap();
    let rendered = serde_json::to_value(&gateway.spec).unwrap();

    let responses = &rendered["paths"]["/things/{id}"]["delete"]["responses"];
    assert_eq!(
        responses["200"]["headers"]["Access-Control-Allow-Origin"]["schema"]["type"],
        "string"
    );
    // The declared 204 is untouched.
    assert_eq!(responses["204"]["description"], "Success");
}

#[test]
fn test_preflight_installed_on_every_path() {
    let gateway = synth::synthesize_gateway(&two_group_api(), &dev_context()).unwrap();
    let rendered = serde_json::to_value(&gateway.spec).unwrap();

    for path in ["/users/random/{seed}", "/users", "/health"] {
        let options = &rendered["paths"][path]["options"];
        let integration = &options["x-amazon-apigateway-integration"];
        assert_eq!(integration["type"], "mock");
        assert_eq!(
            integration["requestTemplates"]["application/json"],
            "{\"statusCode\" : 200}"
        );
        assert_eq!(integration["responses"]["default"]["statusCode"], 200);
        let params = &integration["responses"]["default"]["responseParameters"];
        assert_eq!(
            params["method.response.header.Access-Control-Allow-Headers"],
            "'*'"
        );
        assert_eq!(
            params["method.response.header.Access-Control-Allow-Methods"],
            "'OPTIONS,GET,POST,PUT,DELETE,HEAD,PATCH'"
        );
        assert_eq!(
            params["method.response.header.Access-Control-Allow-Origin"],
            "'*'"
        );

        let declared = &options["responses"]["200"];
        assert_eq!(declared["description"], "200 response");
        for header in [
            "Access-Control-Allow-Headers",
            "Access-Control-Allow-Methods",
            "Access-Control-Allow-Origin",
        ] {
            assert_eq!(declared["headers"][header]["schema"]["type"], "string");
        }

        assert!(options.get("operationId").is_none(), "preflight has no operation id");
    }
}

#[test]
fn test_preflight_replaces_declared_options_operation() {
    let mut api = ApiSchema::new("Test").group(
        ApiGroup::new("Things").endpoint(EndpointDefinition::get("ListThings", "/things")),
    );
    // Declare an explicit OPTIONS endpoint on the same path.
    api.groups[0].endpoints.push(EndpointDefinition {
        name: String::from("ProbeThings"),
        method: ApiMethod::Options,
        path: String::from("/things"),
        path_schema: None,
        body_schema: None,
        success_schema: None,
        errors: Vec::new(),
    });

    let gateway = synth::synthesize_gateway(&api, &dev_context()).unwrap();
    let rendered = serde_json::to_value(&gateway.spec).unwrap();

    let options = &rendered["paths"]["/things"]["options"];
    assert_eq!(options["x-amazon-apigateway-integration"]["type"], "mock");
    assert!(options.get("operationId").is_none());

    // The declared operation was still bound before being replaced, so its
    // function remains in the ledger.
    let has_probe_fn = gateway.stack.resources().iter().any(|resource| {
        matches!(resource, Resource::Function { name, .. } if name == "Things-ProbeThings")
    });
    assert!(has_probe_fn);
}

#[test]
fn test_cors_policy_follows_stage() {
    let dev = synth::synthesize_gateway(&api::api(), &dev_context()).unwrap();
    let dev_rendered = serde_json::to_value(&dev.spec).unwrap();
    let dev_cors = &dev_rendered["x-amazon-apigateway-cors"];
    assert_eq!(dev_cors["allowOrigins"], json!(["*"]));
    assert_eq!(
        dev_cors["allowMethods"],
        json!(["GET", "OPTIONS", "POST", "PUT", "DELETE", "HEAD"])
    );
    assert_eq!(
        dev_cors["allowHeaders"],
        json!([
            "x-amzm-header",
            "x-apigateway-header",
            "x-api-key",
            "authorization",
            "x-amz-date",
            "content-type"
        ])
    );

    let prod = synth::synthesize_gateway(&api::api(), &prod_context()).unwrap();
    let prod_rendered = serde_json::to_value(&prod.spec).unwrap();
    assert_ne!(
        prod_rendered["x-amazon-apigateway-cors"]["allowOrigins"],
        json!(["*"]),
        "prod must not allow every origin"
    );
}

#[test]
fn test_security_scheme_injected_with_pool_arn() {
    let context = dev_context();
    let gateway = synth::synthesize_gateway(&api::api(), &context).unwrap();
    let rendered = serde_json::to_value(&gateway.spec).unwrap();

    let scheme = &rendered["components"]["securitySchemes"]["Basic"];
    assert_eq!(scheme["type"], "apiKey");
    assert_eq!(scheme["name"], "Authorization");
    assert_eq!(scheme["in"], "header");
    assert_eq!(scheme["x-amazon-apigateway-authtype"], "cognito_user_pools");
    assert_eq!(
        scheme["x-amazon-apigateway-authorizer"],
        json!({
            "type": "cognito_user_pools",
            "providerARNs": [context.user_pool_arn]
        })
    );

    assert_eq!(
        rendered["paths"]["/users/random/{seed}"]["get"]["security"],
        json!([{"Basic": []}])
    );
}

#[test]
fn test_emitter_records_gateway_with_inline_definition() {
    let gateway = synth::synthesize_gateway(&api::api(), &dev_context()).unwrap();

    let rest_api = gateway
        .stack
        .resources()
        .iter()
        .find_map(|resource| match resource {
            Resource::RestApi {
                name,
                deploy,
                definition,
            } => Some((name.as_str(), *deploy, definition)),
            _ => None,
        })
        .expect("ledger must contain the gateway");

    assert_eq!(rest_api.0, "ApiGateway from HttpApi");
    assert!(rest_api.1, "definition deploys in the same change set");
    assert_eq!(
        rest_api.2,
        &serde_json::to_value(&gateway.spec).unwrap(),
        "inline definition matches the synthesized document"
    );
}

#[test]
fn test_stage_url_published_as_output() {
    let dev = synth::synthesize_gateway(&api::api(), &dev_context()).unwrap();
    let expected = "https://${ApiGatewayRestApi}.execute-api.us-east-1.amazonaws.com/dev";
    assert_eq!(dev.deployment.url, expected);
    assert_eq!(
        dev.stack.outputs().get("apiNextUrl").map(String::as_str),
        Some(expected)
    );

    let prod = synth::synthesize_gateway(&api::api(), &prod_context()).unwrap();
    assert!(prod.deployment.url.ends_with("/prod"));
}

#[test]
fn test_synthesis_is_deterministic() {
    let context = dev_context();
    let first = synth::synthesize_gateway(&api::api(), &context).unwrap();
    let second = synth::synthesize_gateway(&api::api(), &context).unwrap();

    let first_spec = serde_json::to_string(&first.spec).unwrap();
    let second_spec = serde_json::to_string(&second.spec).unwrap();
    assert_eq!(first_spec, second_spec, "definition must be byte-identical across runs");

    let first_stack = serde_json::to_string(&first.stack).unwrap();
    let second_stack = serde_json::to_string(&second.stack).unwrap();
    assert_eq!(first_stack, second_stack, "ledger must be byte-identical across runs");

    assert_eq!(first.deployment, second.deployment);
}

/// Helper for a deterministic dev deploy context.
fn dev_context() -> DeployContext {
    DeployContext::new(
        Stage::Dev,
        "us-east-1",
        "123456789012",
        "arn:aws:cognito-idp:us-east-1:123456789012:userpool/us-east-1_TESTPOOL",
    )
}

/// Helper for the matching prod context.
fn prod_context() -> DeployContext {
    DeployContext::new(
        Stage::Prod,
        "us-east-1",
        "123456789012",
        "arn:aws:cognito-idp:us-east-1:123456789012:userpool/us-east-1_TESTPOOL",
    )
}

/// Helper declaring two groups, one secured and one open.
fn two_group_api() -> ApiSchema {
    ApiSchema::new("ApiGateway from HttpApi")
        .group(
            ApiGroup::new("Organization")
                .security("Basic")
                .endpoint(
                    EndpointDefinition::get("FetchRandomUser", "/users/random/:seed")
                        .path_params::<FetchRandomUserPath>()
                        .success::<RandomUser>()
                        .error(ErrorVariant::unknown()),
                )
                .endpoint(
                    EndpointDefinition::post("CreateUser", "/users")
                        .body::<RandomUser>()
                        .success::<RandomUser>()
                        .error(ErrorVariant::forbidden())
                        .error(ErrorVariant::unknown()),
                ),
        )
        .group(
            ApiGroup::new("Platform")
                .endpoint(EndpointDefinition::get("Health", "/health")),
        )
}
