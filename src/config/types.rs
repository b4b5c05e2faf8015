//! Runtime settings for the server, the upstream client, and the sync engine.

use std::time::Duration;

/// Sync category label recorded in the provenance table.
pub const SYNC_CATEGORY: &str = "gen5";

/// First and last gen-5 national dex numbers (Victini to Genesect).
pub const DEFAULT_SYNC_START_ID: i32 = 494;
pub const DEFAULT_SYNC_END_ID: i32 = 649;

pub const DEFAULT_SYNC_DELAY_MS: u64 = 100;
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Inclusive range of upstream identifiers one sync run covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncRange {
    start: i32,
    end: i32,
}

impl SyncRange {
    /// Build a range; both ends must be positive and `start <= end`.
    pub fn new(start: i32, end: i32) -> Result<Self, crate::error::ConfigError> {
        crate::config::validate_range(start, end)?;
        Ok(SyncRange { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Number of identifiers in the range.
    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    /// A validated range always holds at least one id.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn ids(&self) -> std::ops::RangeInclusive<i32> {
        self.start..=self.end
    }
}

impl Default for SyncRange {
    fn default() -> Self {
        SyncRange {
            start: DEFAULT_SYNC_START_ID,
            end: DEFAULT_SYNC_END_ID,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncConfig {
    pub category: String,
    pub range: SyncRange,
    /// Pause between consecutive upstream requests.
    pub delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            category: SYNC_CATEGORY.to_string(),
            range: SyncRange::default(),
            delay: Duration::from_millis(DEFAULT_SYNC_DELAY_MS),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        UpstreamConfig {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Everything the binary needs to start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server_port: u16,
    pub upstream: UpstreamConfig,
    pub sync: SyncConfig,
}
