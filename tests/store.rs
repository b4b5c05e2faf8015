//! Persistence and query tests against PostgreSQL. `#[sqlx::test]` creates a throwaway
//! database per test from `DATABASE_URL`.

use async_trait::async_trait;
use pokedex_mirror::config::{SyncConfig, SyncRange};
use pokedex_mirror::model::*;
use pokedex_mirror::sql::ListQuery;
use pokedex_mirror::{
    apply_migrations, sync_range, AppError, CatalogQueryService, CatalogSource, CatalogStore, FetchError, PgCatalogStore,
};
use sqlx::PgPool;
use std::time::Duration;

fn entity(pokedex_id: i32, name: &str, weight: i32, types: &[&str]) -> NormalizedEntity {
    NormalizedEntity {
        entity: CatalogEntity {
            pokedex_id,
            name: name.to_string(),
            height: 10,
            weight,
            sprite_url: format!("https://img/{}.png", pokedex_id),
            animated_front: String::new(),
            animated_back: String::new(),
        },
        types: types
            .iter()
            .enumerate()
            .map(|(i, t)| TypeAssignment {
                type_name: t.to_string(),
                slot: i as i32 + 1,
            })
            .collect(),
        abilities: vec![
            AbilityAssignment {
                ability_name: "blaze".into(),
                is_hidden: false,
                slot: 1,
            },
            AbilityAssignment {
                ability_name: "solar-power".into(),
                is_hidden: true,
                slot: 3,
            },
        ],
        stats: StatBlock {
            hp: 39,
            attack: 52,
            defense: 43,
            special_attack: 60,
            special_defense: 50,
            speed: 65,
        },
    }
}

async fn setup(pool: &PgPool) -> PgCatalogStore {
    apply_migrations(pool).await.unwrap();
    PgCatalogStore::new(pool.clone())
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

fn type_names(record: &NestedRecord) -> Vec<&str> {
    record.types.iter().map(|t| t.kind.name.as_str()).collect()
}

#[sqlx::test(migrations = false)]
async fn resync_updates_in_place_and_replaces_children(pool: PgPool) {
    let store = setup(&pool).await;
    store.upsert_entity(&entity(4, "charmander", 85, &["fire", "flying"])).await.unwrap();
    let first = CatalogQueryService::detail(&pool, 4).await.unwrap();

    let mut again = entity(4, "charmander-x", 90, &["water"]);
    again.abilities.truncate(1);
    again.stats.hp = 80;
    store.upsert_entity(&again).await.unwrap();

    assert_eq!(count(&pool, "pokemon").await, 1);
    assert_eq!(count(&pool, "pokemon_types").await, 1);
    assert_eq!(count(&pool, "pokemon_abilities").await, 1);
    assert_eq!(count(&pool, "pokemon_stats").await, 1);

    let second = CatalogQueryService::detail(&pool, 4).await.unwrap();
    assert_eq!(second.name, "charmander-x");
    assert_eq!(second.weight, 90);
    assert_eq!(type_names(&second), vec!["water"]);
    assert_eq!(second.stats[0].base_stat, 80);
    assert_eq!(second.created_at, first.created_at);
}

#[sqlx::test(migrations = false)]
async fn failed_step_rolls_back_the_whole_entity(pool: PgPool) {
    let store = setup(&pool).await;
    store.upsert_entity(&entity(7, "squirtle", 90, &["water"])).await.unwrap();

    let mut broken = entity(7, "renamed", 1, &["fire", "grass"]);
    broken.types[1].slot = 1;
    let err = store.upsert_entity(&broken).await.unwrap_err();
    assert!(matches!(err, AppError::PersistFailed { id: 7, .. }));

    let kept = CatalogQueryService::detail(&pool, 7).await.unwrap();
    assert_eq!(kept.name, "squirtle");
    assert_eq!(kept.weight, 90);
    assert_eq!(type_names(&kept), vec!["water"]);
    assert_eq!(kept.abilities.len(), 2);
    assert_eq!(kept.stats.len(), 6);
}

#[sqlx::test(migrations = false)]
async fn detail_without_stat_row_has_empty_stats(pool: PgPool) {
    let store = setup(&pool).await;
    store.upsert_entity(&entity(1, "bulbasaur", 69, &["grass", "poison"])).await.unwrap();
    sqlx::query("DELETE FROM pokemon_stats").execute(&pool).await.unwrap();

    let record = CatalogQueryService::detail(&pool, 1).await.unwrap();
    assert!(record.stats.is_empty());
    assert_eq!(type_names(&record), vec!["grass", "poison"]);
    assert!(record.abilities[1].is_hidden);
}

#[sqlx::test(migrations = false)]
async fn detail_of_unknown_id_is_not_found(pool: PgPool) {
    setup(&pool).await;
    let err = CatalogQueryService::detail(&pool, 9999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[sqlx::test(migrations = false)]
async fn type_filter_counts_each_entity_once(pool: PgPool) {
    let store = setup(&pool).await;
    store.upsert_entity(&entity(1, "a", 10, &["fire", "fire"])).await.unwrap();
    store.upsert_entity(&entity(2, "b", 20, &["flying", "fire"])).await.unwrap();
    store.upsert_entity(&entity(3, "c", 30, &["water"])).await.unwrap();

    let query = ListQuery::sanitize(None, None, None, None, Some(" Fire "));
    let page = CatalogQueryService::list(&pool, &query).await.unwrap();

    assert_eq!(page.page_info.total, 2);
    let ids: Vec<i32> = page.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(page.records[1].types, vec!["flying", "fire"]);
}

#[sqlx::test(migrations = false)]
async fn unknown_sort_field_falls_back_to_pokedex_id(pool: PgPool) {
    let store = setup(&pool).await;
    for (id, weight) in [(3, 10), (1, 30), (2, 20)] {
        store.upsert_entity(&entity(id, "x", weight, &["normal"])).await.unwrap();
    }

    let query = ListQuery::sanitize(None, None, Some("DROP TABLE pokemon"), Some("desc; --"), None);
    let page = CatalogQueryService::list(&pool, &query).await.unwrap();

    let ids: Vec<i32> = page.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(count(&pool, "pokemon").await, 3);
}

#[sqlx::test(migrations = false)]
async fn pages_through_sorted_results(pool: PgPool) {
    let store = setup(&pool).await;
    for id in 1..=5 {
        store.upsert_entity(&entity(id, "same", 100 - id, &["normal"])).await.unwrap();
    }

    let query = ListQuery::sanitize(Some(2), Some(2), Some("weight"), Some("asc"), None);
    let page = CatalogQueryService::list(&pool, &query).await.unwrap();

    let ids: Vec<i32> = page.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2]);
    assert_eq!(page.page_info, PageInfo {
        total: 5,
        page: 2,
        limit: 2,
        total_pages: 3,
        has_next: true,
        has_previous: true,
    });
}

#[sqlx::test(migrations = false)]
async fn sync_status_reflects_latest_run_only(pool: PgPool) {
    let store = setup(&pool).await;
    let before = CatalogQueryService::sync_status(&pool, "gen5").await.unwrap();
    assert_eq!(before, SyncStatus::never_synced("gen5"));

    for total_synced in [5, 3] {
        store
            .record_sync_run(&SyncRun {
                category: "gen5".into(),
                total_synced,
                status: SyncRunStatus::Completed,
            })
            .await
            .unwrap();
    }

    let after = CatalogQueryService::sync_status(&pool, "gen5").await.unwrap();
    assert_eq!(after.total_synced, 3);
    assert_eq!(after.status, "completed");
    assert!(after.last_sync_at.is_some());
    assert_eq!(count(&pool, "sync_metadata").await, 1);
}

struct StaticSource;

#[async_trait]
impl CatalogSource for StaticSource {
    async fn fetch(&self, id: i32) -> Result<CatalogPayload, AppError> {
        if id == 496 {
            return Err(AppError::FetchFailed {
                id,
                source: FetchError::Status(404),
            });
        }
        Ok(CatalogPayload {
            id,
            name: format!("mon-{}", id),
            height: 7,
            weight: id,
            sprites: Sprites::default(),
            types: vec![TypeSlot {
                slot: 1,
                kind: NamedResource::named("grass"),
            }],
            abilities: vec![],
            stats: vec![StatDetail {
                base_stat: 45,
                effort: 0,
                stat: NamedResource::named("speed"),
            }],
        })
    }
}

#[sqlx::test(migrations = false)]
async fn sync_run_persists_what_it_fetched(pool: PgPool) {
    let store = setup(&pool).await;
    let config = SyncConfig {
        category: "gen5".into(),
        range: SyncRange::new(494, 497).unwrap(),
        delay: Duration::ZERO,
    };

    let summary = sync_range(&StaticSource, &store, &config).await;
    assert_eq!((summary.attempted, summary.succeeded), (4, 3));

    let record = CatalogQueryService::detail(&pool, 495).await.unwrap();
    assert_eq!((record.name.as_str(), record.height, record.weight), ("mon-495", 7, 495));
    assert_eq!(record.sprites.front_default, "");
    let stats: Vec<(&str, i32)> = record.stats.iter().map(|s| (s.stat.name.as_str(), s.base_stat)).collect();
    assert_eq!(stats[0], ("hp", 0));
    assert_eq!(stats[5], ("speed", 45));

    let status = CatalogQueryService::sync_status(&pool, "gen5").await.unwrap();
    assert_eq!(status.total_synced, 3);
    assert!(matches!(
        CatalogQueryService::detail(&pool, 496).await,
        Err(AppError::NotFound(_))
    ));
}
