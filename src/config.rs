use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_POOL_MAX_SIZE: u32 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid {name} '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_max_size: u32,
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Pool settings used when only a connection string is known.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool_max_size: DEFAULT_POOL_MAX_SIZE,
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let pool_max_size = parse_or(&lookup, "DB_POOL_MAX_SIZE", DEFAULT_POOL_MAX_SIZE)?;
        let connect_timeout_ms =
            parse_or(&lookup, "DB_CONNECT_TIMEOUT_MS", DEFAULT_CONNECT_TIMEOUT_MS)?;

        if pool_max_size == 0 {
            return Err(ConfigError::Invalid {
                name: "DB_POOL_MAX_SIZE",
                value: "0".to_string(),
                reason: "pool needs at least one connection".to_string(),
            });
        }

        Ok(Self {
            host,
            port,
            database: DatabaseConfig {
                url,
                pool_max_size,
                connect_timeout: Duration::from_millis(connect_timeout_ms),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
