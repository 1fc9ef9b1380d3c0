//! Registers the user pool authorizer as a security scheme.

use crate::spec::{ApiSpec, SecuritySchemeSpec};
use crate::synth::stack::DeployContext;

/// Name groups reference to require the pool authorizer.
pub const SECURITY_SCHEME_NAME: &str = "Basic";

/// Adds the Cognito user pool scheme to the definition's components. Any
/// schemes already present are preserved.
pub fn inject_security_scheme(spec: &mut ApiSpec, context: &DeployContext) {
    spec.components.security_schemes.insert(
        String::from(SECURITY_SCHEME_NAME),
        SecuritySchemeSpec::cognito_user_pools(vec![context.user_pool_arn.clone()]),
    );
}
