//! Turns the declared API into a base definition document.
//!
//! The output carries operations, schemas and security requirements but no
//! integrations yet; binding functions to operations is a separate pass.

use schemars::{Schema, schema_for};
use serde_json::{Value, json};
use std::collections::HashSet;

use crate::models::api::{ApiSchema, EndpointDefinition};
use crate::models::error::{ErrorBody, SynthError};
use crate::spec::{
    ApiSpec, MediaTypeSpec, OperationSpec, ParameterSpec, RequestBodySpec, ResponseSpec,
};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Derives a gateway-safe operation id. Separator characters that appear in
/// qualified names and path templates all collapse to hyphens.
#[must_use]
pub fn sanitize_operation_id(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c == '.' || c == '/' || c == ':' || c.is_whitespace() {
                '-'
            } else {
                c
            }
        })
        .collect()
}

/// Synthesizes the definition document for a declared API.
///
/// Operation ids are qualified as `{group}.{endpoint}` before sanitization,
/// so endpoint names only need to be unique within their group.
///
/// # Errors
///
/// Returns [`SynthError::DuplicateOperationId`] when two endpoints collapse
/// to the same id and [`SynthError::DuplicateRoute`] when two endpoints
/// declare the same path and method.
pub fn synthesize(api: &ApiSchema) -> Result<ApiSpec, SynthError> {
    let mut spec = ApiSpec::new(&api.title, &api.version);
    let mut seen_ids = HashSet::new();

    for group in &api.groups {
        for endpoint in &group.endpoints {
            let operation_id = sanitize_operation_id(&format!("{}.{}", group.name, endpoint.name));
            if !seen_ids.insert(operation_id.clone()) {
                return Err(SynthError::DuplicateOperationId { id: operation_id });
            }

            let item = spec.paths.entry(endpoint.path.clone()).or_default();
            if item.operation(endpoint.method).is_some() {
                return Err(SynthError::DuplicateRoute {
                    path: endpoint.path.clone(),
                    method: endpoint.method.to_string(),
                });
            }

            let operation = build_operation(operation_id, endpoint, group.security.as_deref())?;
            item.set_operation(endpoint.method, operation);
        }
    }

    Ok(spec)
}

fn build_operation(
    operation_id: String,
    endpoint: &EndpointDefinition,
    security: Option<&str>,
) -> Result<OperationSpec, SynthError> {
    let mut operation = OperationSpec {
        operation_id: Some(operation_id),
        ..OperationSpec::default()
    };

    operation.parameters = path_parameters(endpoint)?;

    if let Some(schema) = &endpoint.body_schema {
        let mut content = indexmap::IndexMap::new();
        content.insert(
            String::from(JSON_MEDIA_TYPE),
            MediaTypeSpec {
                schema: schema_value(schema)?,
            },
        );
        operation.request_body = Some(RequestBodySpec {
            required: true,
            content,
        });
    }

    match &endpoint.success_schema {
        Some(schema) => {
            let mut response = ResponseSpec {
                description: String::from("Success"),
                ..ResponseSpec::default()
            };
            response.content.insert(
                String::from(JSON_MEDIA_TYPE),
                MediaTypeSpec {
                    schema: schema_value(schema)?,
                },
            );
            operation.responses.insert(String::from("200"), response);
        }
        None => {
            operation.responses.insert(
                String::from("204"),
                ResponseSpec {
                    description: String::from("Success"),
                    ..ResponseSpec::default()
                },
            );
        }
    }

    let error_schema = schema_value(&schema_for!(ErrorBody))?;
    for variant in &endpoint.errors {
        let mut response = ResponseSpec {
            description: variant.name.clone(),
            ..ResponseSpec::default()
        };
        response.content.insert(
            String::from(JSON_MEDIA_TYPE),
            MediaTypeSpec {
                schema: error_schema.clone(),
            },
        );
        operation
            .responses
            .insert(variant.status.to_string(), response);
    }

    if let Some(scheme) = security {
        let mut requirement = indexmap::IndexMap::new();
        requirement.insert(scheme.to_owned(), Vec::new());
        operation.security = vec![requirement];
    }

    Ok(operation)
}

/// Declares one required path parameter per template segment, typed from the
/// endpoint's path schema when one was given.
fn path_parameters(endpoint: &EndpointDefinition) -> Result<Vec<ParameterSpec>, SynthError> {
    let properties = match &endpoint.path_schema {
        Some(schema) => {
            let value = schema_value(schema)?;
            value.get("properties").cloned()
        }
        None => None,
    };

    let mut parameters = Vec::new();
    for segment in endpoint.path.split('/') {
        let Some(name) = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
        else {
            continue;
        };
        let schema = properties
            .as_ref()
            .and_then(|props| props.get(name).cloned())
            .unwrap_or_else(|| json!({"type": "string"}));
        parameters.push(ParameterSpec {
            name: name.to_owned(),
            location: String::from("path"),
            required: true,
            schema,
        });
    }
    Ok(parameters)
}

/// Renders a schema for embedding. The generator's metadata keys have no
/// meaning inside a definition document and are removed.
fn schema_value(schema: &Schema) -> Result<Value, SynthError> {
    let mut value = serde_json::to_value(schema)?;
    if let Some(object) = value.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
    }
    Ok(value)
}
