//! Payload models for the users endpoints.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Successful response of the random user endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RandomUser {
    pub name: String,
    pub random_age: u8,
}

/// Path parameters of the random user endpoint.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FetchRandomUserPath {
    /// Seed the returned user is derived from.
    pub seed: u64,
}
