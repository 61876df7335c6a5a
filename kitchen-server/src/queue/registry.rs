//! Per-tenant lock registry
//!
//! All mutations touching one tenant's orders serialize on that tenant's
//! mutex; different tenants proceed in parallel. Entries are created lazily
//! on first access and kept for the life of the process.

use crate::queue::tenant::TenantQueue;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Default)]
pub struct TenantRegistry {
    tenants: Arc<DashMap<String, Arc<Mutex<TenantQueue>>>>,
}

impl TenantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock one tenant's queue.
    ///
    /// The map shard lock is released before awaiting the tenant mutex so a
    /// held tenant lock never blocks lookups for other tenants.
    pub async fn lock(&self, tenant_id: &str) -> OwnedMutexGuard<TenantQueue> {
        let slot = {
            let entry = self
                .tenants
                .entry(tenant_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(TenantQueue::new(tenant_id))));
            entry.value().clone()
        };
        slot.lock_owned().await
    }

    /// Tenants seen so far
    pub fn tenant_ids(&self) -> Vec<String> {
        self.tenants.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}
