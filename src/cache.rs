//! Reference-data cache with TTL and explicit invalidation.
//!
//! Machines are read on every recalculation but change rarely, so they are
//! cached here instead of being re-queried per batch. The cache is an owned
//! object injected into the services that need it - never module state - and
//! every write to the machines table must call [`ReferenceCache::invalidate_machines`]
//! so readers never price against stale rates longer than the TTL.

use crate::{entities::machine, errors::Result};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Machine map keyed by id, plus the instant it was loaded.
type MachineMap = (Instant, HashMap<i64, machine::Model>);

/// TTL-bounded cache of reference data used by the costing pipeline.
#[derive(Debug)]
pub struct ReferenceCache {
    ttl: Duration,
    machines: RwLock<Option<MachineMap>>,
}

impl ReferenceCache {
    /// Creates an empty cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            machines: RwLock::new(None),
        }
    }

    /// Returns all non-deleted machines keyed by id, loading from the
    /// database when the cache is empty or older than the TTL.
    pub async fn machines<C>(&self, db: &C) -> Result<HashMap<i64, machine::Model>>
    where
        C: ConnectionTrait,
    {
        {
            let cached = self.machines.read().await;
            if let Some((loaded_at, map)) = cached.as_ref() {
                if loaded_at.elapsed() < self.ttl {
                    debug!("machine cache hit ({} machines)", map.len());
                    return Ok(map.clone());
                }
            }
        }

        let rows = machine::Entity::find()
            .filter(machine::Column::IsDeleted.eq(false))
            .all(db)
            .await?;
        let map: HashMap<i64, machine::Model> =
            rows.into_iter().map(|m| (m.id, m)).collect();

        info!("machine cache refreshed with {} machines", map.len());
        *self.machines.write().await = Some((Instant::now(), map.clone()));
        Ok(map)
    }

    /// Drops the cached machines. Must be called by every machine write.
    pub async fn invalidate_machines(&self) {
        debug!("machine cache invalidated");
        *self.machines.write().await = None;
    }
}
