//! # sb-config
//!
//! Layered runtime configuration: built-in defaults, then an optional
//! `snippetbox.toml`, then `SNIPPETBOX_*` environment variables, then
//! whatever the command line overrides.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_FILE: &str = "snippetbox.toml";
pub const ENV_PREFIX: &str = "SNIPPETBOX";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Listen address, `host:port`.
    pub addr: String,
    /// SQLite connection string. May embed credentials for other drivers,
    /// so it never shows up in `Debug` output.
    pub dsn: SecretString,
    /// Pretty, debug-level logs instead of JSON at info.
    pub debug: bool,
    pub session_lifetime_hours: u64,
    pub request_timeout_secs: u64,
}

/// Values supplied on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub addr: Option<String>,
    pub dsn: Option<String>,
    pub debug: Option<bool>,
}

impl AppConfig {
    /// Loads `.env` into the process environment, then resolves every layer
    /// against `snippetbox.toml` in the working directory.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(err) if err.not_found() => {}
            Err(err) => tracing::warn!(error = %err, "ignoring unreadable .env"),
        }
        Self::load_from(Path::new(DEFAULT_FILE), ENV_PREFIX, overrides)
    }

    pub fn load_from(file: &Path, env_prefix: &str, overrides: &Overrides) -> Result<Self, ConfigError> {
        let cfg: AppConfig = Config::builder()
            .set_default("addr", "127.0.0.1:4000")?
            .set_default("dsn", "sqlite://snippetbox.db")?
            .set_default("debug", false)?
            .set_default("session_lifetime_hours", 12)?
            .set_default("request_timeout_secs", 10)?
            .add_source(File::from(file).required(false))
            .add_source(Environment::with_prefix(env_prefix).try_parsing(true))
            .set_override_option("addr", overrides.addr.clone())?
            .set_override_option("dsn", overrides.dsn.clone())?
            .set_override_option("debug", overrides.debug)?
            .build()?
            .try_deserialize()?;

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        if self.session_lifetime_hours == 0 {
            return Err(ConfigError::Invalid {
                key: "session_lifetime_hours",
                reason: "must be at least 1".into(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "request_timeout_secs",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.addr.parse().map_err(|err: std::net::AddrParseError| ConfigError::Invalid {
            key: "addr",
            reason: err.to_string(),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
