//! Site configuration loaded via OrthoConfig, plus the resolved server
//! configuration handed to [`super::create_server`].

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use pressroom::inbound::http::session_config::{SessionOptions, SessionSettings};
use pressroom::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Settings read from CLI flags, `PRESSROOM_*` variables or a config file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PRESSROOM")]
pub struct SiteSettings {
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Unset keeps everything in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// File holding the session key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark the session cookie `Secure`. Defaults to on.
    /// Environment or file only; an absent CLI flag would read as `false`.
    #[ortho_config(skip_cli)]
    pub session_cookie_secure: Option<bool>,
    /// Fall back to a generated key when the key file is missing.
    #[ortho_config(skip_cli, default = false)]
    pub session_allow_ephemeral: bool,
}

/// Raised when a setting is present but unusable.
#[derive(Debug, thiserror::Error)]
#[error("invalid bind address '{value}': {source}")]
pub struct BindAddrError {
    value: String,
    #[source]
    source: std::net::AddrParseError,
}

impl SiteSettings {
    /// Parsed listen address, defaulting to `DEFAULT_BIND_ADDR`.
    pub fn bind_addr(&self) -> Result<SocketAddr, BindAddrError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| BindAddrError {
            value: value.to_owned(),
            source,
        })
    }

    /// Pool size for the PostgreSQL repositories.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    /// Session settings with defaults filled in; cookies are secure unless disabled.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            key_file: self
                .session_key_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE)),
            cookie_secure: self.session_cookie_secure.unwrap_or(true),
            allow_ephemeral: self.session_allow_ephemeral,
        }
    }
}

/// Everything the server needs once configuration has been resolved.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Server on `bind_addr` backed by in-memory repositories.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
        }
    }

    /// Use PostgreSQL-backed repositories instead of the in-memory ones.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
