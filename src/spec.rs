//! The deployable API definition document.
//!
//! This is an OpenAPI 3.0 document extended with the `x-amazon-apigateway-*`
//! vendor keys the gateway consumes when a definition is imported inline.
//! Maps are insertion-ordered so rendering the same schema twice yields the
//! same bytes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::models::api::ApiMethod;

/// Root of the definition document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSpec {
    pub openapi: String,
    pub info: SpecInfo,
    pub paths: IndexMap<String, PathSpec>,
    #[serde(default, skip_serializing_if = "SpecComponents::is_empty")]
    pub components: SpecComponents,
    #[serde(
        rename = "x-amazon-apigateway-cors",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cors: Option<CorsPolicy>,
}

impl ApiSpec {
    #[must_use]
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            openapi: String::from("3.0.3"),
            info: SpecInfo {
                title: title.into(),
                version: version.into(),
            },
            paths: IndexMap::new(),
            components: SpecComponents::default(),
            cors: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecInfo {
    pub title: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecComponents {
    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub security_schemes: IndexMap<String, SecuritySchemeSpec>,
}

impl SpecComponents {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.security_schemes.is_empty()
    }
}

/// Operations declared under one path template.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<OperationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<OperationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<OperationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<OperationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OperationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<OperationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<OperationSpec>,
}

impl PathSpec {
    #[must_use]
    pub const fn operation(&self, method: ApiMethod) -> Option<&OperationSpec> {
        match method {
            ApiMethod::Get => self.get.as_ref(),
            ApiMethod::Post => self.post.as_ref(),
            ApiMethod::Put => self.put.as_ref(),
            ApiMethod::Delete => self.delete.as_ref(),
            ApiMethod::Options => self.options.as_ref(),
            ApiMethod::Head => self.head.as_ref(),
            ApiMethod::Patch => self.patch.as_ref(),
        }
    }

    pub fn operation_mut(&mut self, method: ApiMethod) -> Option<&mut OperationSpec> {
        match method {
            ApiMethod::Get => self.get.as_mut(),
            ApiMethod::Post => self.post.as_mut(),
            ApiMethod::Put => self.put.as_mut(),
            ApiMethod::Delete => self.delete.as_mut(),
            ApiMethod::Options => self.options.as_mut(),
            ApiMethod::Head => self.head.as_mut(),
            ApiMethod::Patch => self.patch.as_mut(),
        }
    }

    pub fn set_operation(&mut self, method: ApiMethod, operation: OperationSpec) {
        let slot = match method {
            ApiMethod::Get => &mut self.get,
            ApiMethod::Post => &mut self.post,
            ApiMethod::Put => &mut self.put,
            ApiMethod::Delete => &mut self.delete,
            ApiMethod::Options => &mut self.options,
            ApiMethod::Head => &mut self.head,
            ApiMethod::Patch => &mut self.patch,
        };
        *slot = Some(operation);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OperationSpec {
    #[serde(
        rename = "operationId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterSpec>,
    #[serde(
        rename = "requestBody",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub request_body: Option<RequestBodySpec>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<IndexMap<String, Vec<String>>>,
    #[serde(
        rename = "x-amazon-apigateway-integration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub integration: Option<IntegrationSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    pub schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBodySpec {
    pub required: bool,
    pub content: IndexMap<String, MediaTypeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaTypeSpec {
    pub schema: Value,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, HeaderSpec>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaTypeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderSpec {
    pub schema: Value,
}

impl HeaderSpec {
    #[must_use]
    pub fn string() -> Self {
        Self {
            schema: json!({"type": "string"}),
        }
    }
}

/// `x-amazon-apigateway-integration` extension object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(
        rename = "httpMethod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub http_method: Option<String>,
    #[serde(
        rename = "passthroughBehavior",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub passthrough_behavior: Option<String>,
    #[serde(
        rename = "requestTemplates",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub request_templates: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, IntegrationResponseSpec>,
}

impl IntegrationSpec {
    /// Proxy integration: the gateway always invokes the function with POST
    /// regardless of the operation's own method.
    #[must_use]
    pub fn aws_proxy(uri: impl Into<String>) -> Self {
        Self {
            kind: String::from("aws_proxy"),
            uri: Some(uri.into()),
            http_method: Some(String::from("POST")),
            passthrough_behavior: Some(String::from("when_no_match")),
            request_templates: IndexMap::new(),
            responses: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationResponseSpec {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(
        rename = "responseParameters",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub response_parameters: IndexMap<String, String>,
}

/// Security scheme entry carrying the gateway authorizer extensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecuritySchemeSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(rename = "x-amazon-apigateway-authtype")]
    pub auth_type: String,
    #[serde(rename = "x-amazon-apigateway-authorizer")]
    pub authorizer: AuthorizerSpec,
}

impl SecuritySchemeSpec {
    /// Cognito user pool authorizer reading the `Authorization` header.
    #[must_use]
    pub fn cognito_user_pools(provider_arns: Vec<String>) -> Self {
        Self {
            kind: String::from("apiKey"),
            name: String::from("Authorization"),
            location: String::from("header"),
            auth_type: String::from("cognito_user_pools"),
            authorizer: AuthorizerSpec {
                kind: String::from("cognito_user_pools"),
                provider_arns,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizerSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "providerARNs")]
    pub provider_arns: Vec<String>,
}

/// `x-amazon-apigateway-cors` extension object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsPolicy {
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
}
