mod server;

pub use server::{DEFAULT_LOGIN_URL, IdentityConfig, ServerConfig};
