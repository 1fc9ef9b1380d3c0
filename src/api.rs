//! The API this service declares and serves.
//!
//! Declaration happens once, here. The synthesizer renders the deployable
//! definition from it and [`router`] serves it, so deploy-time and run-time
//! views can never drift.

use crate::endpoints::fetch_random_user;
use crate::models::api::{ApiGroup, ApiSchema, EndpointDefinition, ErrorVariant};
use crate::models::users::{FetchRandomUserPath, RandomUser};
use crate::router::Router;
use crate::synth::security::SECURITY_SCHEME_NAME;

/// Title the definition is published under.
pub const API_TITLE: &str = "ApiGateway from HttpApi";

/// Operation id of the random user endpoint, as sanitized for the gateway.
pub const FETCH_RANDOM_USER: &str = "Organization-FetchRandomUser";

/// Declares the whole API.
#[must_use]
pub fn api() -> ApiSchema {
    ApiSchema::new(API_TITLE).group(
        ApiGroup::new("Organization")
            .security(SECURITY_SCHEME_NAME)
            .endpoint(
                EndpointDefinition::get("FetchRandomUser", "/users/random/:seed")
                    .path_params::<FetchRandomUserPath>()
                    .success::<RandomUser>()
                    .error(ErrorVariant::unknown()),
            ),
    )
}

/// Builds the runtime router with every operation handler registered.
#[must_use]
pub fn router() -> Router {
    Router::from_api(&api()).register(FETCH_RANDOM_USER, fetch_random_user)
}
