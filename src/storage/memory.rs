//! In-memory durable-store backend
//!
//! Implements all three storage traits over `DashMap`. Per-key entry locking
//! gives the same per-row atomic update semantics a database backend would:
//! a mutation and its CTR recomputation happen under one shard lock, and the
//! vacant/occupied check in `ViewLedger::record` is the storage-level
//! uniqueness constraint on `(kind, entity_id, visitor_ip)`.
//!
//! Used by tests and embedded deployments; production deployments plug a
//! database-backed implementation into the same traits.

use std::net::IpAddr;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::errors::Result;
use crate::storage::{
    AnalyticsRecord, AnalyticsStore, Entity, EntityKind, EntityStore, ViewLedger, ViewRecord,
};

#[derive(Default)]
pub struct MemoryBackend {
    entities: DashMap<(EntityKind, Uuid), Entity>,
    records: DashMap<(EntityKind, Uuid), AnalyticsRecord>,
    ledger: DashMap<(EntityKind, Uuid, IpAddr), ViewRecord>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove_entity(&self, kind: EntityKind, id: Uuid) {
        self.entities.remove(&(kind, id));
    }

    /// 在持有 entry 锁的情况下应用变更并重算 CTR
    fn mutate<F>(&self, kind: EntityKind, id: Uuid, f: F) -> AnalyticsRecord
    where
        F: FnOnce(&mut AnalyticsRecord),
    {
        let mut entry = self
            .records
            .entry((kind, id))
            .or_insert_with(|| AnalyticsRecord::new(kind, id));
        f(entry.value_mut());
        entry.value_mut().recompute_click_through_rate();
        entry.value().clone()
    }
}

#[async_trait]
impl EntityStore for MemoryBackend {
    async fn exists(&self, kind: EntityKind, id: Uuid) -> Result<bool> {
        Ok(self.entities.contains_key(&(kind, id)))
    }

    async fn find_by_slug(&self, kind: EntityKind, slug: &str) -> Result<Option<Entity>> {
        Ok(self
            .entities
            .iter()
            .find(|e| e.key().0 == kind && e.value().slug == slug)
            .map(|e| e.value().clone()))
    }

    async fn insert(&self, entity: Entity) -> Result<()> {
        self.entities.insert((entity.kind, entity.id), entity);
        Ok(())
    }
}

#[async_trait]
impl AnalyticsStore for MemoryBackend {
    async fn get(&self, kind: EntityKind, id: Uuid) -> Result<Option<AnalyticsRecord>> {
        Ok(self.records.get(&(kind, id)).map(|r| r.value().clone()))
    }

    async fn add_impressions(
        &self,
        kind: EntityKind,
        id: Uuid,
        delta: u64,
    ) -> Result<AnalyticsRecord> {
        Ok(self.mutate(kind, id, |r| r.impressions += delta))
    }

    async fn add_click(&self, kind: EntityKind, id: Uuid) -> Result<AnalyticsRecord> {
        Ok(self.mutate(kind, id, |r| r.clicks += 1))
    }

    async fn add_view(&self, kind: EntityKind, id: Uuid) -> Result<AnalyticsRecord> {
        Ok(self.mutate(kind, id, |r| r.views += 1))
    }

    async fn set_avg_time_on_page(
        &self,
        kind: EntityKind,
        id: Uuid,
        seconds: f64,
    ) -> Result<AnalyticsRecord> {
        Ok(self.mutate(kind, id, |r| r.avg_time_on_page = seconds))
    }
}

#[async_trait]
impl ViewLedger for MemoryBackend {
    async fn exists(&self, kind: EntityKind, id: Uuid, visitor_ip: IpAddr) -> Result<bool> {
        Ok(self.ledger.contains_key(&(kind, id, visitor_ip)))
    }

    async fn record(&self, kind: EntityKind, id: Uuid, visitor_ip: IpAddr) -> Result<bool> {
        match self.ledger.entry((kind, id, visitor_ip)) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(v) => {
                v.insert(ViewRecord {
                    entity_id: id,
                    kind,
                    visitor_ip,
                    timestamp: Utc::now(),
                });
                Ok(true)
            }
        }
    }
}
