mod identity;
mod middleware;

pub use identity::{FixedIdentity, IdentityProvider, ProxyHeaderIdentity, identity_from_config};
pub use middleware::{AuthError, CurrentUser, RequireUser};
