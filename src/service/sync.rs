//! Sync engine: fetch, normalize and persist every id of a range, then record provenance.

use crate::client::CatalogSource;
use crate::config::SyncConfig;
use crate::model::{SyncRun, SyncRunStatus};
use crate::service::normalize;
use crate::store::CatalogStore;
use serde::Serialize;

/// Aggregate outcome of one run. Per-id failures are only logged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub category: String,
    pub attempted: usize,
    pub succeeded: usize,
}

impl SyncSummary {
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}

/// Walk `config.range` in ascending order, one id at a time, pausing `config.delay` between
/// upstream requests. A fetch or persist failure skips that id; nothing aborts the run.
/// The provenance record is always written as completed; failing to write it is logged only.
pub async fn sync_range(source: &dyn CatalogSource, store: &dyn CatalogStore, config: &SyncConfig) -> SyncSummary {
    let range = config.range;
    let total = range.len();
    tracing::info!(
        category = %config.category,
        start = range.start(),
        end = range.end(),
        "sync started"
    );

    let mut succeeded = 0usize;
    for (i, id) in range.ids().enumerate() {
        if i > 0 && !config.delay.is_zero() {
            tokio::time::sleep(config.delay).await;
        }
        tracing::debug!(id, progress = i + 1, total, "fetching");

        let payload = match source.fetch(id).await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(id, error = %e, "skipping id");
                continue;
            }
        };
        let normalized = normalize(&payload);
        match store.upsert_entity(&normalized).await {
            Ok(_) => {
                succeeded += 1;
                tracing::info!(id, name = %normalized.entity.name, progress = i + 1, total, "saved");
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "skipping id");
            }
        }
    }

    let run = SyncRun {
        category: config.category.clone(),
        total_synced: i32::try_from(succeeded).unwrap_or(i32::MAX),
        status: SyncRunStatus::Completed,
    };
    if let Err(e) = store.record_sync_run(&run).await {
        tracing::error!(category = %config.category, error = %e, "failed to record sync run");
    }

    let summary = SyncSummary {
        category: config.category.clone(),
        attempted: total,
        succeeded,
    };
    tracing::info!(
        category = %summary.category,
        succeeded = summary.succeeded,
        failed = summary.failed(),
        "sync complete"
    );
    summary
}
