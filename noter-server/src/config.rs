//! Configuration loaded from the environment
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the current directory. `dotenvy` never overwrites variables that
//! are already set, so explicitly exported values win over the file.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;
use tracing::debug;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_PASSWORD: &str = "postgres";
const DEFAULT_DB_NAME: &str = "noter";
const DEFAULT_DB_SSLMODE: &str = "disable";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' is not a valid port")]
    InvalidPort { key: &'static str, value: String },

    #[error("invalid value for DB_SSLMODE: '{0}'")]
    InvalidSslMode(String),
}

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_port: u16,
    pub database: DatabaseConfig,
}

/// PostgreSQL connection parameters
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
}

impl Config {
    /// Load configuration from `.env` (if present) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded .env from {}", path.display()),
            Err(e) => debug!("No .env loaded: {}", e),
        }

        Self::from_env()
    }

    /// Like [`Config::load`], but seeded from the env file at `path`.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match dotenvy::from_path(path) {
            Ok(()) => debug!("Loaded env file {}", path.display()),
            Err(e) => debug!("No env file loaded from {}: {}", path.display(), e),
        }

        Self::from_env()
    }

    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup, applying defaults
    /// for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let ssl_mode = get("DB_SSLMODE", DEFAULT_DB_SSLMODE);
        if PgSslMode::from_str(&ssl_mode).is_err() {
            return Err(ConfigError::InvalidSslMode(ssl_mode));
        }

        Ok(Self {
            server_port: parse_port("PORT", lookup("PORT"), DEFAULT_SERVER_PORT)?,
            database: DatabaseConfig {
                host: get("DB_HOST", DEFAULT_DB_HOST),
                port: parse_port("DB_PORT", lookup("DB_PORT"), DEFAULT_DB_PORT)?,
                user: get("DB_USER", DEFAULT_DB_USER),
                password: get("DB_PASSWORD", DEFAULT_DB_PASSWORD),
                name: get("DB_NAME", DEFAULT_DB_NAME),
                ssl_mode,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            database: DatabaseConfig::default(),
        }
    }
}

impl DatabaseConfig {
    /// Build sqlx connect options from the individual fields.
    pub fn connect_options(&self) -> PgConnectOptions {
        // ssl_mode is validated in Config::from_lookup; fall back to the default for
        // hand-built configs.
        let ssl_mode = PgSslMode::from_str(&self.ssl_mode).unwrap_or(PgSslMode::Disable);

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(ssl_mode)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_owned(),
            port: DEFAULT_DB_PORT,
            user: DEFAULT_DB_USER.to_owned(),
            password: DEFAULT_DB_PASSWORD.to_owned(),
            name: DEFAULT_DB_NAME.to_owned(),
            ssl_mode: DEFAULT_DB_SSLMODE.to_owned(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

fn parse_port(key: &'static str, value: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| ConfigError::InvalidPort { key, value: v }),
    }
}
