//! Settings validation.

use crate::config::AppConfig;
use crate::error::ConfigError;

/// Identifier ranges must be positive and non-inverted.
pub fn validate_range(start: i32, end: i32) -> Result<(), ConfigError> {
    if start < 1 {
        return Err(ConfigError::Validation(format!("sync start id must be positive, got {}", start)));
    }
    if end < start {
        return Err(ConfigError::Validation(format!(
            "sync end id {} is before start id {}",
            end, start
        )));
    }
    Ok(())
}

pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    validate_range(config.sync.range.start(), config.sync.range.end())?;
    if config.database.max_connections == 0 {
        return Err(ConfigError::Validation("DB_MAX_CONNECTIONS must be at least 1".into()));
    }
    if !config.upstream.base_url.starts_with("http://") && !config.upstream.base_url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "POKEAPI_BASE_URL must be an http(s) url, got '{}'",
            config.upstream.base_url
        )));
    }
    Ok(())
}
