//! In-memory fakes of the sync engine's collaborators.

use crate::client::CatalogSource;
use crate::error::{AppError, FetchError};
use crate::model::*;
use crate::store::CatalogStore;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tokio::sync::Semaphore;

/// A small but complete upstream payload for `id`.
pub fn payload(id: i32) -> CatalogPayload {
    CatalogPayload {
        id,
        name: format!("mon-{}", id),
        height: id % 20 + 1,
        weight: id * 3,
        sprites: Sprites {
            front_default: Some(format!("https://img/{}.png", id)),
            ..Sprites::default()
        },
        types: vec![
            TypeSlot { slot: 1, kind: NamedResource::named("grass") },
            TypeSlot { slot: 2, kind: NamedResource::named("poison") },
        ],
        abilities: vec![AbilitySlot {
            is_hidden: false,
            slot: 1,
            ability: NamedResource::named("overgrow"),
        }],
        stats: vec![StatDetail {
            base_stat: 45,
            effort: 0,
            stat: NamedResource::named("hp"),
        }],
    }
}

/// Serves `payload(id)` for known ids and a 404 `FetchFailed` for the rest.
#[derive(Default)]
pub struct FakeSource {
    known: HashSet<i32>,
    requested: Mutex<Vec<i32>>,
    gate: Option<Semaphore>,
}

impl FakeSource {
    pub fn with_ids(ids: impl IntoIterator<Item = i32>) -> Self {
        FakeSource {
            known: ids.into_iter().collect(),
            ..FakeSource::default()
        }
    }

    /// Every fetch waits until `release` is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    pub fn requested(&self) -> Vec<i32> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSource for FakeSource {
    async fn fetch(&self, id: i32) -> Result<CatalogPayload, AppError> {
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await;
        }
        self.requested.lock().unwrap().push(id);
        if self.known.contains(&id) {
            Ok(payload(id))
        } else {
            Err(AppError::FetchFailed {
                id,
                source: FetchError::Status(404),
            })
        }
    }
}

/// Keyed by pokedex id, so re-upserts replace like the real table does.
#[derive(Default)]
pub struct FakeStore {
    rows: Mutex<HashMap<i32, NormalizedEntity>>,
    upserts: Mutex<usize>,
    fail_ids: HashSet<i32>,
    runs: Mutex<Vec<SyncRun>>,
    fail_provenance: bool,
}

impl FakeStore {
    pub fn failing_on(ids: impl IntoIterator<Item = i32>) -> Self {
        FakeStore {
            fail_ids: ids.into_iter().collect(),
            ..FakeStore::default()
        }
    }

    pub fn without_provenance(mut self) -> Self {
        self.fail_provenance = true;
        self
    }

    pub fn entity(&self, pokedex_id: i32) -> Option<NormalizedEntity> {
        self.rows.lock().unwrap().get(&pokedex_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn upserts(&self) -> usize {
        *self.upserts.lock().unwrap()
    }

    pub fn runs(&self) -> Vec<SyncRun> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogStore for FakeStore {
    async fn upsert_entity(&self, normalized: &NormalizedEntity) -> Result<i32, AppError> {
        let id = normalized.entity.pokedex_id;
        if self.fail_ids.contains(&id) {
            return Err(AppError::PersistFailed {
                id,
                source: sqlx::Error::PoolTimedOut,
            });
        }
        *self.upserts.lock().unwrap() += 1;
        self.rows.lock().unwrap().insert(id, normalized.clone());
        Ok(id)
    }

    async fn record_sync_run(&self, run: &SyncRun) -> Result<(), AppError> {
        if self.fail_provenance {
            return Err(AppError::Db(sqlx::Error::PoolClosed));
        }
        let mut runs = self.runs.lock().unwrap();
        runs.retain(|r| r.category != run.category);
        runs.push(run.clone());
        Ok(())
    }
}
