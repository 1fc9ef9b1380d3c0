//! Identity claims decoded from the gateway authorizer context.

use crate::models::gateway::AuthorizerContext;
use serde::Deserialize;

/// Group membership as it appears in authorizer claims. Depending on the
/// pool configuration the gateway delivers either a single comma-delimited
/// string or a proper array; both normalize to one list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "GroupsRepr")]
pub struct Groups(pub Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum GroupsRepr {
    Delimited(String),
    Sequence(Vec<String>),
}

impl From<GroupsRepr> for Groups {
    fn from(repr: GroupsRepr) -> Self {
        match repr {
            GroupsRepr::Delimited(joined) => {
                Self(joined.split(',').map(ToOwned::to_owned).collect())
            }
            GroupsRepr::Sequence(groups) => Self(groups),
        }
    }
}

/// Claims the runtime requires from the authorizer. Absence of any field is
/// an authentication failure, never a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityClaims {
    pub email: String,
    pub sub: String,
    #[serde(rename = "cognito:username")]
    pub username: String,
    #[serde(rename = "cognito:groups")]
    pub groups: Groups,
}

impl IdentityClaims {
    /// Decodes the claims object out of an optional authorizer context.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::Missing`] when the invocation carries no
    /// authorizer or no claims object, and [`ClaimsError::Decode`] when the
    /// claims are present but do not match the required shape.
    pub fn from_authorizer(authorizer: Option<&AuthorizerContext>) -> Result<Self, ClaimsError> {
        let claims = authorizer
            .and_then(|context| context.claims.as_ref())
            .ok_or(ClaimsError::Missing)?;
        serde_json::from_value(claims.clone()).map_err(ClaimsError::Decode)
    }
}

/// Caller identity handed to endpoint handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub groups: Vec<String>,
}

impl Identity {
    #[must_use]
    pub fn from_claims(claims: IdentityClaims) -> Self {
        Self {
            username: claims.username,
            groups: claims.groups.0,
        }
    }
}

/// Why an invocation could not be authenticated.
#[derive(Debug)]
pub enum ClaimsError {
    /// No authorizer context or no claims object on the event.
    Missing,
    /// Claims were present but malformed.
    Decode(serde_json::Error),
}

impl std::fmt::Display for ClaimsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "no authorizer claims on the invocation"),
            Self::Decode(e) => write!(f, "authorizer claims are malformed: {e}"),
        }
    }
}

impl std::error::Error for ClaimsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Missing => None,
            Self::Decode(e) => Some(e),
        }
    }
}
