//! API server: loads settings from the environment, prepares the schema, and serves the catalog API.

use pokedex_mirror::{
    app, apply_migrations, ensure_database_exists, AppConfig, AppState, PgCatalogStore, PokeApiClient, SyncLauncher,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pokedex_mirror=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        upstream = %config.upstream.base_url,
        start = config.sync.range.start(),
        end = config.sync.range.end(),
        "config loaded"
    );

    ensure_database_exists(&config.database.url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!("database connected");

    apply_migrations(&pool).await?;

    let state = AppState {
        pool: pool.clone(),
        source: Arc::new(PokeApiClient::new(&config.upstream)?),
        store: Arc::new(PgCatalogStore::new(pool)),
        sync: config.sync.clone(),
        launcher: SyncLauncher::default(),
    };

    let listener = TcpListener::bind(("0.0.0.0", config.server_port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
