use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_USER_ID_HEADER: &str = "x-forwarded-user-id";
pub const DEFAULT_USERNAME_HEADER: &str = "x-forwarded-user";
pub const DEFAULT_LOGIN_URL: &str = "/auth/github";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub identity: IdentityConfig,
}

/// Where the caller's identity comes from. Authentication itself happens
/// outside this service.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum IdentityConfig {
    /// Trust headers injected by an authenticating reverse proxy.
    Proxy {
        #[serde(default = "default_user_id_header")]
        user_id_header: String,
        #[serde(default = "default_username_header")]
        username_header: String,
        #[serde(default = "default_login_url")]
        login_url: String,
    },
    /// Every request acts as the same user. Local development only.
    Fixed { id: i64, username: String },
}

fn default_user_id_header() -> String {
    DEFAULT_USER_ID_HEADER.to_string()
}

fn default_username_header() -> String {
    DEFAULT_USERNAME_HEADER.to_string()
}

fn default_login_url() -> String {
    DEFAULT_LOGIN_URL.to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        IdentityConfig::Proxy {
            user_id_header: default_user_id_header(),
            username_header: default_username_header(),
            login_url: default_login_url(),
        }
    }
}

impl ServerConfig {
    /// Reads a TOML config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("arranger.db")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            data_dir: PathBuf::from("./data"),
            identity: IdentityConfig::default(),
        }
    }
}
