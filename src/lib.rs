//! Pokedex mirror: syncs a range of the PokeAPI catalog into PostgreSQL and serves it back
//! through a paginated, filterable, sortable REST API.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{CatalogSource, PokeApiClient};
pub use config::{AppConfig, SyncConfig, SyncRange};
pub use error::{AppError, ConfigError, FetchError};
pub use migration::apply_migrations;
pub use routes::app;
pub use service::{normalize, sync_range, CatalogQueryService, SyncSummary};
pub use state::{AppState, SyncLauncher};
pub use store::{ensure_database_exists, CatalogStore, PgCatalogStore};
