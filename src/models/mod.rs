pub mod api;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod users;

pub use api::{ApiGroup, ApiMethod, ApiSchema, EndpointDefinition, ErrorVariant};
pub use error::{ApiError, ErrorBody, SynthError};
pub use gateway::{AuthorizerContext, EventRequestContext, GatewayEvent, GatewayResponse};
pub use identity::{ClaimsError, Groups, Identity, IdentityClaims};
pub use users::{FetchRandomUserPath, RandomUser};
