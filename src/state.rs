//! Shared application state for all routes, and the background sync launcher.

use crate::client::CatalogSource;
use crate::config::SyncConfig;
use crate::service::sync_range;
use crate::store::CatalogStore;
use sqlx::PgPool;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub source: Arc<dyn CatalogSource>,
    pub store: Arc<dyn CatalogStore>,
    pub sync: SyncConfig,
    pub launcher: SyncLauncher,
}

/// Starts sync runs as detached tasks, at most one at a time per process.
#[derive(Clone, Default)]
pub struct SyncLauncher {
    running: Arc<AtomicBool>,
}

/// Clears the running flag when the run ends, including by panic.
struct RunGuard(Arc<AtomicBool>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SyncLauncher {
    /// Spawn a run over `config.range` unless one is already in progress.
    /// Returns whether a new run was started. Never waits for the run.
    pub fn launch(&self, source: Arc<dyn CatalogSource>, store: Arc<dyn CatalogStore>, config: SyncConfig) -> bool {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::info!(category = %config.category, "sync already running; not starting another");
            return false;
        }
        let guard = RunGuard(self.running.clone());
        tokio::spawn(async move {
            let _guard = guard;
            sync_range(source.as_ref(), store.as_ref(), &config).await;
        });
        true
    }

    /// Reads the flag only, so status checks never contend with `launch`.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
