//! Sync control handlers: fire-and-forget trigger and provenance status.

use crate::error::AppError;
use crate::response::{accepted, success_one};
use crate::service::CatalogQueryService;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

/// Always answers 202; the run's outcome is only visible through the status endpoint.
pub async fn trigger_sync(State(state): State<AppState>) -> impl IntoResponse {
    let started = state
        .launcher
        .launch(state.source.clone(), state.store.clone(), state.sync.clone());
    let message = if started {
        format!(
            "sync of ids {}-{} started; check /api/pokemon/sync/status for progress",
            state.sync.range.start(),
            state.sync.range.end()
        )
    } else {
        "a sync run is already in progress; check /api/pokemon/sync/status".to_string()
    };
    accepted(message)
}

pub async fn sync_status(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let status = CatalogQueryService::sync_status(&state.pool, &state.sync.category).await?;
    Ok(success_one(status))
}
