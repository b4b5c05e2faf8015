//! Catalog routes. The static `sync` segments take priority over the `:id` capture.

use crate::handlers::{list, read, sync_status, trigger_sync};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn catalog_routes(state: AppState) -> Router {
    Router::new()
        .route("/pokemon", get(list))
        .route("/pokemon/sync", post(trigger_sync))
        .route("/pokemon/sync/status", get(sync_status))
        .route("/pokemon/:id", get(read))
        .with_state(state)
}
