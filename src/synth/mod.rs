//! Synthesis pipeline turning the declared API into a deployable gateway.
//!
//! The passes run in a fixed order: base definition, integration binding,
//! CORS, security scheme, then the gateway resource itself. Synthesis is
//! pure; running it twice over the same inputs renders identical documents.

pub mod cors;
pub mod emitter;
pub mod integration;
pub mod security;
pub mod stack;
pub mod synthesizer;

pub use emitter::Deployment;
pub use stack::{DeployContext, Stack, Stage};

use crate::models::api::{ApiMethod, ApiSchema};
use crate::models::error::SynthError;
use crate::spec::ApiSpec;

/// Method slots a path item can declare, in binding order.
pub const API_METHODS: [ApiMethod; 7] = [
    ApiMethod::Get,
    ApiMethod::Post,
    ApiMethod::Put,
    ApiMethod::Delete,
    ApiMethod::Options,
    ApiMethod::Head,
    ApiMethod::Patch,
];

/// Everything one synthesis run produces.
#[derive(Debug)]
pub struct SynthesizedGateway {
    pub spec: ApiSpec,
    pub stack: Stack,
    pub deployment: Deployment,
}

/// Runs the whole pipeline for one declared API.
///
/// # Errors
///
/// Propagates the first failure from any pass; the ledger from a failed run
/// must be discarded.
pub fn synthesize_gateway(
    api: &ApiSchema,
    context: &DeployContext,
) -> Result<SynthesizedGateway, SynthError> {
    let mut spec = synthesizer::synthesize(api)?;
    let mut stack = Stack::new();
    integration::bind_integrations(&mut spec, &mut stack, context)?;
    cors::apply_cors(&mut spec, context.stage);
    security::inject_security_scheme(&mut spec, context);
    let deployment = emitter::emit_deployment(&spec, &mut stack, context)?;
    Ok(SynthesizedGateway {
        spec,
        stack,
        deployment,
    })
}
