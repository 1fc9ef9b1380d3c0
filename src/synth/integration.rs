//! Binds every declared operation to the shared handler function.

use crate::models::error::SynthError;
use crate::spec::{ApiSpec, HeaderSpec, IntegrationSpec};
use crate::synth::stack::{DeployContext, Stack};
use crate::synth::synthesizer::sanitize_operation_id;

use super::API_METHODS;

/// Service principal the gateway invokes functions as.
pub const GATEWAY_PRINCIPAL: &str = "apigateway.amazonaws.com";

/// Handler artifact every function runs. One binary serves all operations
/// and dispatches on the operation route.
pub const SHARED_HANDLER: &str = "bootstrap";

const ALLOW_ORIGIN_HEADER: &str = "Access-Control-Allow-Origin";

/// Walks every operation in the definition, provisions a function named
/// after its operation id, grants the gateway permission to invoke it and
/// attaches the proxy integration.
///
/// The operation's declared 200 response also gains the allow-origin header
/// here, created when the operation declared no 200 of its own. Declared
/// content is never touched.
///
/// # Errors
///
/// Returns [`SynthError::MissingOperationId`] when an operation carries no
/// id; an unnamed operation cannot name its function.
pub fn bind_integrations(
    spec: &mut ApiSpec,
    stack: &mut Stack,
    context: &DeployContext,
) -> Result<(), SynthError> {
    for (path, item) in &mut spec.paths {
        for method in API_METHODS {
            let Some(operation) = item.operation_mut(method) else {
                continue;
            };

            let operation_id = match operation.operation_id.as_deref() {
                Some(id) if !id.is_empty() => id,
                _ => {
                    return Err(SynthError::MissingOperationId {
                        path: path.clone(),
                        method: method.to_string(),
                    });
                }
            };

            // Ids straight out of the synthesizer are already clean; this
            // covers definitions assembled by hand.
            let function_name = sanitize_operation_id(operation_id);
            let function = stack.add_function(function_name, SHARED_HANDLER, context);
            stack.add_permission(&function, GATEWAY_PRINCIPAL);
            operation.integration = Some(IntegrationSpec::aws_proxy(
                function.invocation_uri(&context.region),
            ));

            operation
                .responses
                .entry(String::from("200"))
                .or_default()
                .headers
                .insert(String::from(ALLOW_ORIGIN_HEADER), HeaderSpec::string());
        }
    }
    Ok(())
}
