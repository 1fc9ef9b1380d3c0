//! Declarative API description the synthesizer and the runtime router share.
//!
//! An [`ApiSchema`] is the single authority for routes: the synthesizer turns
//! it into a deployable definition and the router turns it into a dispatch
//! table, so the two can never disagree about what is exposed.

use schemars::{JsonSchema, Schema, schema_for};
use std::fmt;

/// HTTP methods an endpoint may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
    Head,
    Patch,
}

impl ApiMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
        }
    }

    /// Parses a method name case-insensitively, as gateway events carry them
    /// uppercased.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "delete" => Some(Self::Delete),
            "options" => Some(Self::Options),
            "head" => Some(Self::Head),
            "patch" => Some(Self::Patch),
            _ => None,
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared error outcome of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorVariant {
    pub name: String,
    pub status: u16,
}

impl ErrorVariant {
    #[must_use]
    pub fn new(name: impl Into<String>, status: u16) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self::new("UnknownException", 500)
    }

    #[must_use]
    pub fn forbidden() -> Self {
        Self::new("ForbiddenException", 403)
    }
}

/// One operation: a method, a path template and its declared schemas.
#[derive(Debug, Clone)]
pub struct EndpointDefinition {
    pub name: String,
    pub method: ApiMethod,
    pub path: String,
    pub path_schema: Option<Schema>,
    pub body_schema: Option<Schema>,
    pub success_schema: Option<Schema>,
    pub errors: Vec<ErrorVariant>,
}

impl EndpointDefinition {
    fn new(name: impl Into<String>, method: ApiMethod, path: &str) -> Self {
        Self {
            name: name.into(),
            method,
            path: normalize_path_template(path),
            path_schema: None,
            body_schema: None,
            success_schema: None,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(name: impl Into<String>, path: &str) -> Self {
        Self::new(name, ApiMethod::Get, path)
    }

    #[must_use]
    pub fn post(name: impl Into<String>, path: &str) -> Self {
        Self::new(name, ApiMethod::Post, path)
    }

    #[must_use]
    pub fn put(name: impl Into<String>, path: &str) -> Self {
        Self::new(name, ApiMethod::Put, path)
    }

    #[must_use]
    pub fn delete(name: impl Into<String>, path: &str) -> Self {
        Self::new(name, ApiMethod::Delete, path)
    }

    /// Declares the JSON shape of a successful response.
    #[must_use]
    pub fn success<T: JsonSchema>(mut self) -> Self {
        self.success_schema = Some(schema_for!(T));
        self
    }

    /// Declares the JSON shape of the request body.
    #[must_use]
    pub fn body<T: JsonSchema>(mut self) -> Self {
        self.body_schema = Some(schema_for!(T));
        self
    }

    /// Declares the types of the path parameters. Properties are matched to
    /// template segments by name.
    #[must_use]
    pub fn path_params<T: JsonSchema>(mut self) -> Self {
        self.path_schema = Some(schema_for!(T));
        self
    }

    #[must_use]
    pub fn error(mut self, variant: ErrorVariant) -> Self {
        self.errors.push(variant);
        self
    }
}

/// A named group of endpoints sharing a security requirement.
#[derive(Debug, Clone)]
pub struct ApiGroup {
    pub name: String,
    pub security: Option<String>,
    pub endpoints: Vec<EndpointDefinition>,
}

impl ApiGroup {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            security: None,
            endpoints: Vec::new(),
        }
    }

    /// Names the security scheme every endpoint in the group requires.
    #[must_use]
    pub fn security(mut self, scheme: impl Into<String>) -> Self {
        self.security = Some(scheme.into());
        self
    }

    #[must_use]
    pub fn endpoint(mut self, endpoint: EndpointDefinition) -> Self {
        self.endpoints.push(endpoint);
        self
    }
}

/// The whole declared API.
#[derive(Debug, Clone)]
pub struct ApiSchema {
    pub title: String,
    pub version: String,
    pub groups: Vec<ApiGroup>,
}

impl ApiSchema {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: String::from("1.0.0"),
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn group(mut self, group: ApiGroup) -> Self {
        self.groups.push(group);
        self
    }
}

/// Rewrites `:name` path segments into the `{name}` template form the
/// definition and the router both use.
fn normalize_path_template(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{name}}}"),
            None => segment.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colon_segments_become_braced_parameters() {
        let endpoint = EndpointDefinition::get("FetchUser", "/users/random/:seed");
        assert_eq!(endpoint.path, "/users/random/{seed}");
    }

    #[test]
    fn test_braced_segments_pass_through_unchanged() {
        let endpoint = EndpointDefinition::get("FetchUser", "/users/{id}/posts");
        assert_eq!(endpoint.path, "/users/{id}/posts");
    }

    #[test]
    fn test_method_parse_is_case_insensitive() {
        assert_eq!(ApiMethod::parse("GET"), Some(ApiMethod::Get));
        assert_eq!(ApiMethod::parse("patch"), Some(ApiMethod::Patch));
        assert_eq!(ApiMethod::parse("CONNECT"), None);
    }
}
