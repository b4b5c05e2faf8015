//! Schema DDL for the mirrored catalog. Idempotent; safe to run on every start.

use crate::error::AppError;
use crate::store::{ABILITY_TABLE, ENTITY_TABLE, STATS_TABLE, SYNC_TABLE, TYPE_TABLE};
use sqlx::PgPool;

/// Statements in dependency order: parent table first, then children, then indexes.
pub fn schema_statements() -> Vec<String> {
    vec![
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id SERIAL PRIMARY KEY,
                pokedex_id INT UNIQUE NOT NULL,
                name VARCHAR(100) NOT NULL,
                height INT NOT NULL DEFAULT 0,
                weight INT NOT NULL DEFAULT 0,
                sprite_url TEXT NOT NULL DEFAULT '',
                animated_front TEXT NOT NULL DEFAULT '',
                animated_back TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            ENTITY_TABLE
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id SERIAL PRIMARY KEY,
                pokemon_id INT NOT NULL REFERENCES {}(id) ON DELETE CASCADE,
                type_name VARCHAR(50) NOT NULL,
                slot INT NOT NULL,
                UNIQUE (pokemon_id, slot)
            )
            "#,
            TYPE_TABLE, ENTITY_TABLE
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id SERIAL PRIMARY KEY,
                pokemon_id INT NOT NULL REFERENCES {}(id) ON DELETE CASCADE,
                ability_name VARCHAR(100) NOT NULL,
                is_hidden BOOLEAN NOT NULL DEFAULT FALSE,
                slot INT NOT NULL,
                UNIQUE (pokemon_id, slot)
            )
            "#,
            ABILITY_TABLE, ENTITY_TABLE
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id SERIAL PRIMARY KEY,
                pokemon_id INT NOT NULL REFERENCES {}(id) ON DELETE CASCADE,
                hp INT NOT NULL,
                attack INT NOT NULL,
                defense INT NOT NULL,
                special_attack INT NOT NULL,
                special_defense INT NOT NULL,
                speed INT NOT NULL,
                UNIQUE (pokemon_id)
            )
            "#,
            STATS_TABLE, ENTITY_TABLE
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id SERIAL PRIMARY KEY,
                sync_type VARCHAR(50) UNIQUE NOT NULL,
                last_sync_at TIMESTAMPTZ,
                total_synced INT NOT NULL DEFAULT 0,
                status VARCHAR(20) NOT NULL
            )
            "#,
            SYNC_TABLE
        ),
        format!("CREATE INDEX IF NOT EXISTS idx_pokemon_pokedex_id ON {}(pokedex_id)", ENTITY_TABLE),
        format!("CREATE INDEX IF NOT EXISTS idx_pokemon_name ON {}(name)", ENTITY_TABLE),
        format!("CREATE INDEX IF NOT EXISTS idx_pokemon_types_pokemon_id ON {}(pokemon_id)", TYPE_TABLE),
        format!("CREATE INDEX IF NOT EXISTS idx_pokemon_types_type_name ON {}(type_name)", TYPE_TABLE),
        format!("CREATE INDEX IF NOT EXISTS idx_pokemon_abilities_pokemon_id ON {}(pokemon_id)", ABILITY_TABLE),
        format!("CREATE INDEX IF NOT EXISTS idx_pokemon_stats_pokemon_id ON {}(pokemon_id)", STATS_TABLE),
    ]
}

/// Create the five catalog tables and their indexes if they do not exist.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for sql in schema_statements() {
        tracing::debug!(sql = %sql, "migration");
        sqlx::query(&sql).execute(pool).await?;
    }
    tracing::info!("catalog schema ready");
    Ok(())
}
