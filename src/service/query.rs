//! Read side: paginated listing, nested detail reassembly, and sync status.

use crate::error::AppError;
use crate::model::*;
use crate::sql::{
    count_matching, select_abilities, select_by_pokedex_id, select_page, select_stats, select_sync_status,
    select_types, ListQuery, QueryBuf,
};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::PgPool;

pub struct CatalogQueryService;

impl CatalogQueryService {
    /// One page of entities with their type names, plus pagination metadata.
    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<EntityPage, AppError> {
        let total = Self::fetch_count(pool, &count_matching(query)).await?;
        let rows: Vec<EntityRow> = Self::fetch_all(pool, &select_page(query)).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let types: Vec<TypeRow> = Self::fetch_all(pool, &select_types(row.id)).await?;
            let names = types.into_iter().map(|t| t.type_name).collect();
            records.push(EntitySummary::from_row(row, names));
        }
        Ok(EntityPage {
            records,
            page_info: PageInfo::compute(total, query.limit(), query.offset()),
        })
    }

    /// Full nested record for one external id. `NotFound` when no row matches.
    pub async fn detail(pool: &PgPool, pokedex_id: i32) -> Result<NestedRecord, AppError> {
        let row: EntityRow = Self::fetch_optional(pool, &select_by_pokedex_id(pokedex_id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pokemon {}", pokedex_id)))?;
        let types: Vec<TypeRow> = Self::fetch_all(pool, &select_types(row.id)).await?;
        let abilities: Vec<AbilityRow> = Self::fetch_all(pool, &select_abilities(row.id)).await?;
        let stats: Option<StatBlock> = Self::fetch_optional(pool, &select_stats(row.id)).await?;
        Ok(NestedRecord::assemble(row, types, abilities, stats))
    }

    /// Latest provenance for `category`, or the never-synced placeholder.
    pub async fn sync_status(pool: &PgPool, category: &str) -> Result<SyncStatus, AppError> {
        let row: Option<(String, Option<DateTime<Utc>>, i32, String)> =
            Self::fetch_optional(pool, &select_sync_status(category)).await?;
        Ok(match row {
            Some((category, last_sync_at, total_synced, status)) => SyncStatus {
                category,
                last_sync_at,
                total_synced,
                status,
            },
            None => SyncStatus::never_synced(category),
        })
    }

    async fn fetch_all<T>(pool: &PgPool, q: &QueryBuf) -> Result<Vec<T>, AppError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, T>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_all(pool).await?)
    }

    async fn fetch_optional<T>(pool: &PgPool, q: &QueryBuf) -> Result<Option<T>, AppError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, T>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_optional(pool).await?)
    }

    async fn fetch_count(pool: &PgPool, q: &QueryBuf) -> Result<i64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_scalar::<_, i64>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_one(pool).await?)
    }
}
