//! Records the gateway resource and derives the deployed URL.

use crate::models::error::SynthError;
use crate::spec::ApiSpec;
use crate::synth::stack::{DeployContext, Stack};

/// Logical name the deployed gateway resolves to. The URL embeds it as a
/// substitution token since the physical id only exists after deployment.
pub const REST_API_LOGICAL_NAME: &str = "ApiGatewayRestApi";

/// The deployed gateway as seen by downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub api_name: String,
    pub url: String,
}

/// Renders the definition inline into the ledger and publishes the stage URL
/// as a stack output.
///
/// # Errors
///
/// Returns [`SynthError::Serialize`] when the definition cannot be rendered
/// to JSON.
pub fn emit_deployment(
    spec: &ApiSpec,
    stack: &mut Stack,
    context: &DeployContext,
) -> Result<Deployment, SynthError> {
    let definition = serde_json::to_value(spec)?;
    let api_name = spec.info.title.clone();
    stack.add_rest_api(api_name.clone(), definition);

    let url = format!(
        "https://${{{REST_API_LOGICAL_NAME}}}.execute-api.{}.amazonaws.com/{}",
        context.region,
        context.stage.as_str()
    );
    stack.add_output("apiNextUrl", url.clone());

    Ok(Deployment { api_name, url })
}
