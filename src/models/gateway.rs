//! Proxy invocation envelopes exchanged with API Gateway.
//!
//! These types cover only the fields the runtime bridge reads and writes;
//! everything else in the gateway event is intentionally left undeclared.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Incoming proxy invocation event, as delivered to the Lambda entry point.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    pub path: String,
    /// Values may be explicit nulls on the wire; those are never copied into
    /// the reconstructed URL. Keyed by a sorted map so reconstruction is
    /// deterministic.
    #[serde(default)]
    pub query_string_parameters: Option<BTreeMap<String, Option<String>>>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default)]
    pub request_context: EventRequestContext,
}

/// Request-scoped metadata attached by the gateway.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventRequestContext {
    #[serde(default)]
    pub http_method: String,
    #[serde(default)]
    pub authorizer: Option<AuthorizerContext>,
}

/// Verified caller attributes attached by the upstream authorizer.
/// Claims stay opaque here; decoding lives with the identity schema.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct AuthorizerContext {
    #[serde(default)]
    pub claims: Option<Value>,
}

/// Outgoing proxy invocation result handed back to the gateway.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}
