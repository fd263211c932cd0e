use std::sync::Arc;

use axum::http::{HeaderMap, HeaderName};

use crate::config::{DEFAULT_LOGIN_URL, IdentityConfig};
use crate::error::{Error, Result};
use crate::types::User;

/// Resolves the caller of a request. Authentication happens upstream; this
/// only reads its outcome.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self, headers: &HeaderMap) -> Option<User>;

    /// Where anonymous callers are sent to sign in.
    fn login_url(&self) -> &str;
}

/// Reads the user from headers set by an authenticating reverse proxy.
/// The username header may be percent-encoded so non-ASCII names survive.
pub struct ProxyHeaderIdentity {
    user_id_header: HeaderName,
    username_header: HeaderName,
    login_url: String,
}

impl ProxyHeaderIdentity {
    pub fn new(user_id_header: &str, username_header: &str, login_url: &str) -> Result<Self> {
        let parse = |name: &str| {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Config(format!("invalid header name '{name}': {e}")))
        };

        Ok(Self {
            user_id_header: parse(user_id_header)?,
            username_header: parse(username_header)?,
            login_url: login_url.to_string(),
        })
    }
}

impl IdentityProvider for ProxyHeaderIdentity {
    fn current_user(&self, headers: &HeaderMap) -> Option<User> {
        let user_id = headers
            .get(&self.user_id_header)?
            .to_str()
            .ok()?
            .trim()
            .parse::<i64>()
            .ok()?;

        let raw_name = headers.get(&self.username_header)?.to_str().ok()?;
        let username = urlencoding::decode(raw_name).ok()?.into_owned();

        Some(User { user_id, username })
    }

    fn login_url(&self) -> &str {
        &self.login_url
    }
}

/// Treats every request as coming from the same user, or from nobody.
pub struct FixedIdentity {
    user: Option<User>,
}

impl FixedIdentity {
    #[must_use]
    pub fn new(user: Option<User>) -> Self {
        Self { user }
    }

    #[must_use]
    pub fn user(user_id: i64, username: &str) -> Self {
        Self::new(Some(User {
            user_id,
            username: username.to_string(),
        }))
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(None)
    }
}

impl IdentityProvider for FixedIdentity {
    fn current_user(&self, _headers: &HeaderMap) -> Option<User> {
        self.user.clone()
    }

    fn login_url(&self) -> &str {
        DEFAULT_LOGIN_URL
    }
}

pub fn identity_from_config(config: &IdentityConfig) -> Result<Arc<dyn IdentityProvider>> {
    match config {
        IdentityConfig::Proxy {
            user_id_header,
            username_header,
            login_url,
        } => Ok(Arc::new(ProxyHeaderIdentity::new(
            user_id_header,
            username_header,
            login_url,
        )?)),
        IdentityConfig::Fixed { id, username } => Ok(Arc::new(FixedIdentity::user(*id, username))),
    }
}
