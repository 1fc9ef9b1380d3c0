//! Error types for the synthesis pipeline and the endpoint surface.
//!
//! Endpoint failures carry a gateway status so the bridge can map them onto
//! well-formed proxy responses instead of failed invocations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure raised by an endpoint handler.
#[derive(Debug)]
pub enum ApiError {
    /// The caller is authenticated but not allowed to do this.
    Forbidden { message: Option<String> },
    /// Anything the endpoint could not recover from.
    Unknown {
        message: Option<String>,
        cause: Option<String>,
    },
}

impl ApiError {
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: Some(message.into()),
            cause: None,
        }
    }

    /// Gateway status the error maps to.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Forbidden { .. } => 403,
            Self::Unknown { .. } => 500,
        }
    }

    /// Stable error name surfaced in the response body and in the declared
    /// responses of the synthesized definition.
    #[must_use]
    pub const fn error_name(&self) -> &'static str {
        match self {
            Self::Forbidden { .. } => "ForbiddenException",
            Self::Unknown { .. } => "UnknownException",
        }
    }

    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        let message = match self {
            Self::Forbidden { message } | Self::Unknown { message, .. } => message.clone(),
        };
        ErrorBody {
            error: self.error_name().to_owned(),
            message,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forbidden { message } => match message {
                Some(msg) => write!(f, "forbidden: {msg}"),
                None => write!(f, "forbidden"),
            },
            Self::Unknown { message, cause } => {
                match message {
                    Some(msg) => write!(f, "{msg}")?,
                    None => write!(f, "unknown error")?,
                }
                if let Some(cause) = cause {
                    write!(f, " (caused by: {cause})")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown {
            message: Some(error.to_string()),
            cause: error.source().map(ToString::to_string),
        }
    }
}

/// Body of every error response, declared in the definition and produced by
/// the bridge at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Failure raised while synthesizing the deployable definition.
#[derive(Debug)]
pub enum SynthError {
    /// An operation reached the integration binder without an id.
    MissingOperationId { path: String, method: String },
    /// Two endpoints collapsed to the same operation id after sanitization.
    DuplicateOperationId { id: String },
    /// Two endpoints declared the same path and method.
    DuplicateRoute { path: String, method: String },
    /// A required deploy-context variable is unset.
    MissingConfig { name: &'static str },
    /// The definition could not be rendered to JSON.
    Serialize(serde_json::Error),
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOperationId { path, method } => {
                write!(f, "operation {method} {path} has no operation id")
            }
            Self::DuplicateOperationId { id } => {
                write!(f, "operation id {id} is declared more than once")
            }
            Self::DuplicateRoute { path, method } => {
                write!(f, "route {method} {path} is declared more than once")
            }
            Self::MissingConfig { name } => {
                write!(f, "required environment variable {name} is not set")
            }
            Self::Serialize(e) => write!(f, "failed to render the definition: {e}"),
        }
    }
}

impl std::error::Error for SynthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SynthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialize(error)
    }
}
