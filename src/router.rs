//! Dispatch table derived from the declared API.
//!
//! Routes come from the same [`ApiSchema`] the synthesizer consumes, keyed
//! by the same sanitized operation ids, so a handler registered here is
//! exactly one operation in the deployed definition.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::bridge::{EndpointResponse, RequestContext};
use crate::models::api::{ApiMethod, ApiSchema};
use crate::models::error::ApiError;
use crate::synth::synthesizer::sanitize_operation_id;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

struct RouteEntry {
    operation_id: String,
    method: ApiMethod,
    segments: Vec<Segment>,
}

/// A resolved route: which operation, and what the template captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub operation_id: String,
    pub path_params: HashMap<String, String>,
}

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<EndpointResponse, ApiError>> + Send>>;

type OperationHandler = Arc<dyn Fn(RequestContext) -> HandlerFuture + Send + Sync>;

/// Routes requests to registered operation handlers.
pub struct Router {
    entries: Vec<RouteEntry>,
    handlers: HashMap<String, OperationHandler>,
}

impl Router {
    /// Builds the route table from a declared API. Entries keep declaration
    /// order and the first matching route wins.
    #[must_use]
    pub fn from_api(api: &ApiSchema) -> Self {
        let mut entries = Vec::new();
        for group in &api.groups {
            for endpoint in &group.endpoints {
                let operation_id =
                    sanitize_operation_id(&format!("{}.{}", group.name, endpoint.name));
                entries.push(RouteEntry {
                    operation_id,
                    method: endpoint.method,
                    segments: parse_segments(&endpoint.path),
                });
            }
        }
        Self {
            entries,
            handlers: HashMap::new(),
        }
    }

    /// Registers the handler for one operation id.
    #[must_use]
    pub fn register<F, Fut>(mut self, operation_id: &str, handler: F) -> Self
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<EndpointResponse, ApiError>> + Send + 'static,
    {
        self.handlers.insert(
            operation_id.to_owned(),
            Arc::new(move |context| Box::pin(handler(context))),
        );
        self
    }

    /// Matches a method and concrete path against the route table.
    #[must_use]
    pub fn resolve(&self, method: &str, path: &str) -> Option<RouteMatch> {
        let method = ApiMethod::parse(method)?;
        let segments: Vec<&str> = path.split('/').collect();

        self.entries
            .iter()
            .filter(|entry| entry.method == method && entry.segments.len() == segments.len())
            .find_map(|entry| {
                let mut path_params = HashMap::new();
                for (pattern, concrete) in entry.segments.iter().zip(&segments) {
                    match pattern {
                        Segment::Literal(literal) => {
                            if literal != concrete {
                                return None;
                            }
                        }
                        Segment::Param(name) => {
                            path_params.insert(name.clone(), (*concrete).to_owned());
                        }
                    }
                }
                Some(RouteMatch {
                    operation_id: entry.operation_id.clone(),
                    path_params,
                })
            })
    }

    /// Invokes the handler registered for a resolved operation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unknown`] when the operation is routed but no
    /// handler was registered for it, and otherwise whatever the handler
    /// itself fails with.
    pub async fn dispatch(
        &self,
        operation_id: &str,
        context: RequestContext,
    ) -> Result<EndpointResponse, ApiError> {
        let handler = self.handlers.get(operation_id).cloned().ok_or_else(|| {
            ApiError::unknown(format!("no handler registered for operation {operation_id}"))
        })?;
        handler(context).await
    }
}

fn parse_segments(path: &str) -> Vec<Segment> {
    path.split('/')
        .map(|segment| {
            match segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
            {
                Some(name) => Segment::Param(name.to_owned()),
                None => Segment::Literal(segment.to_owned()),
            }
        })
        .collect()
}
