//! Server configuration parsed from environment variables.
//!
//! Variables (all optional unless noted):
//! - `PORT`: listen port, default 3000
//! - `STORE_BACKEND`: `memory` (default) or `postgres`
//! - `DATABASE_URL`: required when the backend is `postgres`
//! - `STATIC_DIR`: static asset root whose `data/` folder is served at `/data`,
//!   default `public`

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown STORE_BACKEND `{0}`; expected `memory` or `postgres`")]
    UnknownBackend(String),
    #[error("DATABASE_URL required when STORE_BACKEND=postgres")]
    MissingDatabaseUrl,
}

/// Where building documents are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub backend: StoreBackend,
    pub static_dir: PathBuf,
}

impl Config {
    /// Build typed config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown backend or a postgres backend without
    /// a database URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = parse_backend(
            std::env::var("STORE_BACKEND").ok().as_deref(),
            std::env::var("DATABASE_URL").ok(),
        )?;
        let static_dir = std::env::var("STATIC_DIR").map_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from);

        Ok(Self { port: env_parse("PORT", DEFAULT_PORT), backend, static_dir })
    }
}

pub(crate) fn parse_backend(raw: Option<&str>, database_url: Option<String>) -> Result<StoreBackend, ConfigError> {
    match raw.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        None | Some("" | "memory") => Ok(StoreBackend::Memory),
        Some("postgres" | "postgresql") => match database_url {
            Some(url) if !url.trim().is_empty() => Ok(StoreBackend::Postgres { database_url: url }),
            _ => Err(ConfigError::MissingDatabaseUrl),
        },
        Some(other) => Err(ConfigError::UnknownBackend(other.to_owned())),
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
