//! Catalog services: normalizer, sync engine, and query engine.

mod normalize;
mod query;
mod sync;
pub use normalize::normalize;
pub use query::CatalogQueryService;
pub use sync::{sync_range, SyncSummary};
