//! Records returned by the query engine.

use crate::model::{StatBlock, STAT_NAMES};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Status reported for a category that has never completed a run.
pub const NEVER_SYNCED: &str = "never_synced";

/// `pokemon` row as read back.
#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct EntityRow {
    pub id: i32,
    pub pokedex_id: i32,
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub sprite_url: String,
    pub animated_front: String,
    pub animated_back: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct TypeRow {
    pub type_name: String,
    pub slot: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct AbilityRow {
    pub ability_name: String,
    pub is_hidden: bool,
    pub slot: i32,
}

/// List item: the entity's own columns plus slot-ordered type names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntitySummary {
    pub id: i32,
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub sprite_url: String,
    pub animated_front: String,
    pub animated_back: String,
    pub types: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl EntitySummary {
    pub fn from_row(row: EntityRow, types: Vec<String>) -> Self {
        EntitySummary {
            id: row.pokedex_id,
            name: row.name,
            height: row.height,
            weight: row.weight,
            sprite_url: row.sprite_url,
            animated_front: row.animated_front,
            animated_back: row.animated_back,
            types,
            created_at: row.created_at,
        }
    }
}

/// Pagination metadata for one list response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageInfo {
    /// `limit` must be positive (the query sanitizer guarantees it).
    pub fn compute(total: i64, limit: i64, offset: i64) -> Self {
        PageInfo {
            total,
            page: offset / limit + 1,
            limit,
            total_pages: (total + limit - 1) / limit,
            has_next: offset.saturating_add(limit) < total,
            has_previous: offset > 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntityPage {
    pub records: Vec<EntitySummary>,
    pub page_info: PageInfo,
}

/// One entity rebuilt into the upstream payload's nested shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NestedRecord {
    pub id: i32,
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub sprites: NestedSprites,
    pub types: Vec<NestedType>,
    pub abilities: Vec<NestedAbility>,
    pub stats: Vec<NestedStat>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NestedSprites {
    pub front_default: String,
    pub animated: NestedAnimated,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NestedAnimated {
    pub front_default: String,
    pub back_default: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NestedType {
    pub slot: i32,
    #[serde(rename = "type")]
    pub kind: NamedRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NestedAbility {
    pub is_hidden: bool,
    pub slot: i32,
    pub ability: NamedRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NestedStat {
    pub base_stat: i32,
    pub stat: NamedRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamedRef {
    pub name: String,
}

impl NestedRecord {
    /// Rebuild from rows. Type and ability rows are expected slot-ordered.
    /// A missing stat row yields an empty stat list, not zeros.
    pub fn assemble(row: EntityRow, types: Vec<TypeRow>, abilities: Vec<AbilityRow>, stats: Option<StatBlock>) -> Self {
        let stats: Vec<NestedStat> = stats
            .map(|block| {
                block
                    .named_values()
                    .into_iter()
                    .map(|(name, value)| NestedStat {
                        base_stat: value,
                        stat: NamedRef { name: name.to_string() },
                    })
                    .collect()
            })
            .unwrap_or_default();
        debug_assert!(stats.is_empty() || stats.len() == STAT_NAMES.len());
        NestedRecord {
            id: row.pokedex_id,
            name: row.name,
            height: row.height,
            weight: row.weight,
            sprites: NestedSprites {
                front_default: row.sprite_url,
                animated: NestedAnimated {
                    front_default: row.animated_front,
                    back_default: row.animated_back,
                },
            },
            types: types
                .into_iter()
                .map(|t| NestedType {
                    slot: t.slot,
                    kind: NamedRef { name: t.type_name },
                })
                .collect(),
            abilities: abilities
                .into_iter()
                .map(|a| NestedAbility {
                    is_hidden: a.is_hidden,
                    slot: a.slot,
                    ability: NamedRef { name: a.ability_name },
                })
                .collect(),
            stats,
            created_at: row.created_at,
        }
    }
}

/// Latest provenance for a sync category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub category: String,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub total_synced: i32,
    pub status: String,
}

impl SyncStatus {
    pub fn never_synced(category: &str) -> Self {
        SyncStatus {
            category: category.to_string(),
            last_sync_at: None,
            total_synced: 0,
            status: NEVER_SYNCED.to_string(),
        }
    }
}
