//! Persistence: the transactional per-entity upsert, sync provenance writes, and database bootstrap.

use crate::error::AppError;
use crate::model::{NormalizedEntity, SyncRun};
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

pub const ENTITY_TABLE: &str = "pokemon";
pub const TYPE_TABLE: &str = "pokemon_types";
pub const ABILITY_TABLE: &str = "pokemon_abilities";
pub const STATS_TABLE: &str = "pokemon_stats";
pub const SYNC_TABLE: &str = "sync_metadata";

/// Write side used by the sync engine.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Atomically upsert the entity by external id and replace its types, abilities and stats.
    /// Returns the internal row id. Any failure rolls back and is `AppError::PersistFailed`.
    async fn upsert_entity(&self, normalized: &NormalizedEntity) -> Result<i32, AppError>;

    /// Overwrite the provenance record for `run.category`.
    async fn record_sync_run(&self, run: &SyncRun) -> Result<(), AppError>;
}

#[derive(Clone, Debug)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        PgCatalogStore { pool }
    }

    async fn upsert_in_tx(&self, n: &NormalizedEntity) -> Result<i32, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let e = &n.entity;
        let sql = format!(
            "INSERT INTO {} (pokedex_id, name, height, weight, sprite_url, animated_front, animated_back) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (pokedex_id) DO UPDATE SET name = EXCLUDED.name, height = EXCLUDED.height, \
             weight = EXCLUDED.weight, sprite_url = EXCLUDED.sprite_url, \
             animated_front = EXCLUDED.animated_front, animated_back = EXCLUDED.animated_back \
             RETURNING id",
            ENTITY_TABLE
        );
        tracing::debug!(sql = %sql, pokedex_id = e.pokedex_id, "query (tx)");
        let (entity_id,): (i32,) = sqlx::query_as(&sql)
            .bind(e.pokedex_id)
            .bind(&e.name)
            .bind(e.height)
            .bind(e.weight)
            .bind(&e.sprite_url)
            .bind(&e.animated_front)
            .bind(&e.animated_back)
            .fetch_one(&mut *tx)
            .await?;

        for table in [TYPE_TABLE, ABILITY_TABLE, STATS_TABLE] {
            sqlx::query(&format!("DELETE FROM {} WHERE pokemon_id = $1", table))
                .bind(entity_id)
                .execute(&mut *tx)
                .await?;
        }

        for t in &n.types {
            sqlx::query(&format!(
                "INSERT INTO {} (pokemon_id, type_name, slot) VALUES ($1, $2, $3)",
                TYPE_TABLE
            ))
            .bind(entity_id)
            .bind(&t.type_name)
            .bind(t.slot)
            .execute(&mut *tx)
            .await?;
        }

        for a in &n.abilities {
            sqlx::query(&format!(
                "INSERT INTO {} (pokemon_id, ability_name, is_hidden, slot) VALUES ($1, $2, $3, $4)",
                ABILITY_TABLE
            ))
            .bind(entity_id)
            .bind(&a.ability_name)
            .bind(a.is_hidden)
            .bind(a.slot)
            .execute(&mut *tx)
            .await?;
        }

        let s = &n.stats;
        sqlx::query(&format!(
            "INSERT INTO {} (pokemon_id, hp, attack, defense, special_attack, special_defense, speed) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
            STATS_TABLE
        ))
        .bind(entity_id)
        .bind(s.hp)
        .bind(s.attack)
        .bind(s.defense)
        .bind(s.special_attack)
        .bind(s.special_defense)
        .bind(s.speed)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(entity_id)
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn upsert_entity(&self, normalized: &NormalizedEntity) -> Result<i32, AppError> {
        // Dropping the uncommitted transaction on `?` rolls it back.
        self.upsert_in_tx(normalized)
            .await
            .map_err(|source| AppError::PersistFailed {
                id: normalized.entity.pokedex_id,
                source,
            })
    }

    async fn record_sync_run(&self, run: &SyncRun) -> Result<(), AppError> {
        let sql = format!(
            "INSERT INTO {} (sync_type, last_sync_at, total_synced, status) VALUES ($1, NOW(), $2, $3) \
             ON CONFLICT (sync_type) DO UPDATE SET last_sync_at = EXCLUDED.last_sync_at, \
             total_synced = EXCLUDED.total_synced, status = EXCLUDED.status",
            SYNC_TABLE
        );
        tracing::debug!(sql = %sql, category = %run.category, total = run.total_synced, "query");
        sqlx::query(&sql)
            .bind(&run.category)
            .bind(run.total_synced)
            .bind(run.status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, db_name) = admin_options(database_url)?;
    let Some(db_name) = db_name.filter(|n| !n.is_empty() && n != "postgres") else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Same connection settings pointed at `postgres`, plus the target database name if the url has one.
fn admin_options(database_url: &str) -> Result<(PgConnectOptions, Option<String>), AppError> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| AppError::InvalidInput(format!("invalid DATABASE_URL: {}", e)))?;
    let db_name = opts.get_database().map(str::to_string);
    Ok((opts.database("postgres"), db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
