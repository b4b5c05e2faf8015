//! Load settings from environment variables.

use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

impl AppConfig {
    /// Read from the process environment. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; empty values count as unset.
    /// `DATABASE_URL` wins over the discrete `DB_*` variables, which require `DB_PASSWORD` and `DB_NAME`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = match get("DATABASE_URL") {
            Some(url) => url,
            None => {
                let password = get("DB_PASSWORD").ok_or(ConfigError::Missing("DB_PASSWORD"))?;
                let name = get("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?;
                let host = get("DB_HOST").unwrap_or_else(|| "localhost".into());
                let port = get("DB_PORT").unwrap_or_else(|| "5432".into());
                let user = get("DB_USER").unwrap_or_else(|| "postgres".into());
                format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name)
            }
        };

        let max_connections = parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 5u32)?;
        let server_port = parse_or(get("SERVER_PORT"), "SERVER_PORT", 8080u16)?;
        let base_url = get("POKEAPI_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string());
        let start = parse_or(get("SYNC_START_ID"), "SYNC_START_ID", DEFAULT_SYNC_START_ID)?;
        let end = parse_or(get("SYNC_END_ID"), "SYNC_END_ID", DEFAULT_SYNC_END_ID)?;
        let delay_ms = parse_or(get("SYNC_DELAY_MS"), "SYNC_DELAY_MS", DEFAULT_SYNC_DELAY_MS)?;

        let config = AppConfig {
            database: DatabaseConfig { url, max_connections },
            server_port,
            upstream: UpstreamConfig {
                base_url,
                timeout: DEFAULT_REQUEST_TIMEOUT,
            },
            sync: SyncConfig {
                category: SYNC_CATEGORY.to_string(),
                range: SyncRange::new(start, end)?,
                delay: Duration::from_millis(delay_ms),
            },
        };
        validate(&config)?;
        Ok(config)
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}
