//! Translates gateway proxy events into plain requests and back.
//!
//! Handlers never see gateway envelopes; they work against a reconstructed
//! request URL and return an [`EndpointResponse`] the bridge flattens into
//! the proxy result shape.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::HashMap;

use crate::models::error::ApiError;
use crate::models::gateway::{GatewayEvent, GatewayResponse};
use crate::models::identity::Identity;

/// Origin the request URL is rebuilt against. The gateway strips the real
/// host before invoking, so a fixed local origin stands in.
pub const LOCAL_ORIGIN: &str = "http://localhost";

/// A gateway event reduced to an ordinary HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgedRequest {
    pub method: String,
    /// Full URL including the query string, query names sorted.
    pub url: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

/// Everything a dispatched handler receives.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request: BridgedRequest,
    pub identity: Identity,
    pub path_params: HashMap<String, String>,
}

/// Response produced by a handler before flattening. Headers keep their
/// append order; duplicates resolve last-write-wins at flattening time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl EndpointResponse {
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// A 200 response with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unknown`] when the body cannot be serialized.
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_string(value).map_err(|e| ApiError::Unknown {
            message: Some(String::from("failed to serialize response body")),
            cause: Some(e.to_string()),
        })?;
        Ok(Self {
            status: 200,
            headers: vec![(
                String::from("content-type"),
                String::from("application/json"),
            )],
            body,
        })
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Rebuilds the request a gateway event describes.
///
/// Query parameters with null values are dropped. Names and values are
/// percent-encoded, and names appear in sorted order so the same event
/// always yields the same URL.
///
/// # Errors
///
/// Fails when the event flags its body as base64 and the payload does not
/// decode.
pub fn normalize_request(event: &GatewayEvent) -> Result<BridgedRequest, base64::DecodeError> {
    let mut url = format!("{LOCAL_ORIGIN}{}", event.path);
    if let Some(params) = &event.query_string_parameters {
        let mut first = true;
        for (name, value) in params {
            let Some(value) = value else { continue };
            url.push(if first { '?' } else { '&' });
            first = false;
            url.push_str(&urlencoding::encode(name));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
    }

    let body = match &event.body {
        Some(body) if event.is_base64_encoded => Some(STANDARD.decode(body)?),
        Some(body) => Some(body.clone().into_bytes()),
        None => None,
    };

    Ok(BridgedRequest {
        method: event.request_context.http_method.clone(),
        url,
        path: event.path.clone(),
        headers: event.headers.clone().unwrap_or_default(),
        body,
    })
}

/// Flattens a handler response into the proxy result shape. Repeated header
/// names keep the last value. Bodies go out as text; the bridge never
/// re-encodes to base64.
#[must_use]
pub fn into_gateway_response(response: EndpointResponse) -> GatewayResponse {
    let mut headers = HashMap::new();
    for (name, value) in response.headers {
        headers.insert(name, value);
    }
    GatewayResponse {
        status_code: response.status,
        headers,
        body: response.body,
        is_base64_encoded: false,
    }
}
