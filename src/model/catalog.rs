//! Normalized relational rows written by the sync engine.

use serde::Serialize;

/// Stat names as the upstream catalog spells them, in display order.
pub const STAT_NAMES: [&str; 6] = ["hp", "attack", "defense", "special-attack", "special-defense", "speed"];

/// One `pokemon` row as written. `created_at` is set by the database on first insert only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogEntity {
    pub pokedex_id: i32,
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub sprite_url: String,
    pub animated_front: String,
    pub animated_back: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeAssignment {
    pub type_name: String,
    pub slot: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AbilityAssignment {
    pub ability_name: String,
    pub is_hidden: bool,
    pub slot: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StatBlock {
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub special_attack: i32,
    pub special_defense: i32,
    pub speed: i32,
}

impl StatBlock {
    /// Values paired with their upstream names, in `STAT_NAMES` order.
    pub fn named_values(&self) -> [(&'static str, i32); 6] {
        [
            (STAT_NAMES[0], self.hp),
            (STAT_NAMES[1], self.attack),
            (STAT_NAMES[2], self.defense),
            (STAT_NAMES[3], self.special_attack),
            (STAT_NAMES[4], self.special_defense),
            (STAT_NAMES[5], self.speed),
        ]
    }
}

/// Everything one upstream payload turns into; persisted atomically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedEntity {
    pub entity: CatalogEntity,
    pub types: Vec<TypeAssignment>,
    pub abilities: Vec<AbilityAssignment>,
    pub stats: StatBlock,
}

/// Provenance summary of the latest run for one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncRun {
    pub category: String,
    pub total_synced: i32,
    pub status: SyncRunStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncRunStatus {
    Completed,
}

impl SyncRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncRunStatus::Completed => "completed",
        }
    }
}
