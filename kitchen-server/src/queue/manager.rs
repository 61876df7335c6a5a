//! QueueManager - per-tenant kitchen queue orchestration
//!
//! All mutations run under the owning tenant's lock and follow one flow:
//!
//! ```text
//! enqueue / dequeue / remove / requeue
//!     ├─ 1. Mutate the order copy (transition, queue fields)
//!     ├─ 2. Persist the primary order (failure aborts, memory untouched)
//!     ├─ 3. Commit the in-memory queue mutation
//!     ├─ 4. Resync positions / promote the head
//!     ├─ 5. Persist repositioned orders (best effort)
//!     └─ 6. Return effects, dispatched after the lock is released
//! ```
//!
//! The in-memory queues are the ordering authority while the process runs;
//! [`QueueManager::initialize`] rebuilds them from durable status fields
//! after a restart.

use crate::catalog::MenuCatalog;
use crate::notify::NotificationDispatcher;
use crate::orders::lifecycle::{self, OrderError, OrderResult};
use crate::orders::store::OrderStore;
use crate::queue::registry::TenantRegistry;
use crate::queue::tenant::TenantQueue;
use serde_json::Value;
use shared::kitchen::{KitchenUpdate, KitchenUpdateType};
use shared::order::{Actor, OrderStatus};
use shared::util;
use shared::{Order, QueueSnapshot};
use tokio::sync::OwnedMutexGuard;

/// Change of the displayed order produced by a queue mutation
#[derive(Debug, Clone)]
pub enum ActiveOrderChange {
    /// A new head is on the kitchen display
    Promoted(Box<Order>),
    /// The queue drained; the display is empty
    Cleared,
}

/// Kitchen display events produced by one queue mutation.
///
/// Dispatch happens after the tenant lock is released.
#[derive(Debug, Clone)]
pub struct QueueEffects {
    /// Queue contents after the mutation
    pub snapshot: QueueSnapshot,
    /// Set when the displayed order changed
    pub active_change: Option<ActiveOrderChange>,
}

pub struct QueueManager {
    store: OrderStore,
    catalog: MenuCatalog,
    dispatcher: NotificationDispatcher,
    registry: TenantRegistry,
    display_timeout_ms: i64,
}

impl std::fmt::Debug for QueueManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueManager")
            .field("tenants", &self.registry.len())
            .field("display_timeout_ms", &self.display_timeout_ms)
            .finish()
    }
}

impl QueueManager {
    pub fn new(
        store: OrderStore,
        catalog: MenuCatalog,
        dispatcher: NotificationDispatcher,
        display_timeout_ms: i64,
    ) -> Self {
        Self {
            store,
            catalog,
            dispatcher,
            registry: TenantRegistry::new(),
            display_timeout_ms,
        }
    }

    /// Rebuild every tenant queue from durable state.
    ///
    /// Orders still in approved/preparing are loaded per tenant, sorted by
    /// last-update time ascending, and given fresh contiguous positions. A
    /// head that was already displayed keeps its display time; an
    /// undisplayed head is promoted. Idempotent, called once at startup
    /// before traffic is accepted.
    pub async fn initialize(&self) -> OrderResult<()> {
        let by_tenant = self.store.load_all_active()?;
        let now = util::now_millis();

        for (tenant_id, orders) in by_tenant {
            let mut queue = self.registry.lock(&tenant_id).await;
            queue.replace_all(orders);
            let (dirty, _) = queue.resync(now, self.display_timeout_ms);
            if let Err(e) = self.store.save_batch(&dirty) {
                tracing::warn!("Queue position sync failed for tenant {tenant_id}: {e}");
            }
            tracing::info!(
                "🍳 Rebuilt kitchen queue for tenant {tenant_id} ({} orders)",
                queue.len()
            );
        }
        Ok(())
    }

    /// Lock one tenant's queue. Every status or queue mutation for the
    /// tenant must run under this guard; tenants are independent.
    pub async fn lock_tenant(&self, tenant_id: &str) -> OwnedMutexGuard<TenantQueue> {
        self.registry.lock(tenant_id).await
    }

    /// Consistent queue view for one tenant
    pub async fn snapshot(&self, tenant_id: &str) -> QueueSnapshot {
        self.registry.lock(tenant_id).await.snapshot()
    }

    /// Add an approved order to the back of the queue.
    ///
    /// Classifies the order's cooking profile, applies the transition to
    /// preparing, persists the final record, then appends it. If the queue
    /// was empty the order goes straight onto the display.
    pub fn enqueue_locked(
        &self,
        queue: &mut TenantQueue,
        mut order: Order,
        actor: &Actor,
    ) -> OrderResult<(Order, QueueEffects)> {
        debug_assert_eq!(queue.tenant_id(), order.tenant_id);
        if queue.contains(&order.id) {
            return Err(OrderError::InvalidOperation(format!(
                "order {} is already queued",
                order.id
            )));
        }

        lifecycle::apply_transition(&mut order, OrderStatus::Preparing, actor, None)?;
        order.has_long_items = self.catalog.order_has_long_items(&order.items);

        let was_empty = queue.is_empty();
        let now = util::now_millis();
        order.queue_position = Some(queue.len() as u32 + 1);
        if was_empty {
            order.displayed_at = Some(now);
            order.timeout_at = order
                .has_long_items
                .then_some(now + self.display_timeout_ms);
        } else {
            order.displayed_at = None;
            order.timeout_at = None;
        }

        self.store.save(&order)?;
        queue.push_back(order.clone());

        let mut effects = self.finish_mutation(queue, false);
        if was_empty {
            effects.active_change = Some(ActiveOrderChange::Promoted(Box::new(order.clone())));
        }
        Ok((order, effects))
    }

    /// Take an order out of the queue as ready (kitchen finished it)
    pub fn dequeue_locked(
        &self,
        queue: &mut TenantQueue,
        order_id: &str,
        actor: &Actor,
    ) -> OrderResult<(Order, QueueEffects)> {
        self.take_out_locked(queue, order_id, OrderStatus::Ready, actor, None)
    }

    /// Take an order out of the queue as cancelled
    pub fn remove_locked(
        &self,
        queue: &mut TenantQueue,
        order_id: &str,
        actor: &Actor,
        note: Option<String>,
    ) -> OrderResult<(Order, QueueEffects)> {
        self.take_out_locked(queue, order_id, OrderStatus::Cancelled, actor, note)
    }

    /// Move a timed-out order to the back of the queue.
    ///
    /// The deadline is re-checked under the lock, so a stale candidate from
    /// the monitor's scan is skipped (`Ok(false)`) instead of moved. The
    /// order's status does not change and no audit entry is written; all
    /// persistence here is best-effort position sync.
    pub async fn requeue(&self, tenant_id: &str, order_id: &str, now: i64) -> OrderResult<bool> {
        let mut queue = self.registry.lock(tenant_id).await;

        let due = queue.get(order_id).is_some_and(|o| {
            o.status == OrderStatus::Preparing
                && o.has_long_items
                && o.timeout_at.is_some_and(|deadline| deadline <= now)
        });
        if !due {
            return Ok(false);
        }

        let was_head = queue.head().is_some_and(|h| h.id == order_id);
        queue.move_to_back(order_id);
        let effects = self.finish_mutation(&mut queue, was_head);
        drop(queue);

        tracing::info!("⏱️ Requeued slow order {order_id} for tenant {tenant_id}");
        self.dispatch_effects(&effects);
        Ok(true)
    }

    /// Orders past their display deadline, as (tenant id, order id) pairs
    pub async fn timed_out(&self, now: i64) -> Vec<(String, String)> {
        let mut due = Vec::new();
        for tenant_id in self.registry.tenant_ids() {
            let queue = self.registry.lock(&tenant_id).await;
            for order in queue.orders() {
                if order.status == OrderStatus::Preparing
                    && order.has_long_items
                    && order.timeout_at.is_some_and(|deadline| deadline <= now)
                {
                    due.push((tenant_id.clone(), order.id.clone()));
                }
            }
        }
        due
    }

    /// Publish the kitchen events produced by a queue mutation. Call after
    /// releasing the tenant lock.
    pub fn dispatch_effects(&self, effects: &QueueEffects) {
        let tenant_id = &effects.snapshot.tenant_id;

        match serde_json::to_value(&effects.snapshot) {
            Ok(payload) => self.dispatcher.notify_kitchen(
                tenant_id,
                KitchenUpdate::new(KitchenUpdateType::QueueUpdated, payload),
            ),
            Err(e) => tracing::error!("Failed to serialize queue snapshot: {e}"),
        }

        if let Some(change) = &effects.active_change {
            let payload = match change {
                ActiveOrderChange::Promoted(order) => {
                    serde_json::to_value(order.as_ref()).unwrap_or(Value::Null)
                }
                ActiveOrderChange::Cleared => Value::Null,
            };
            self.dispatcher.notify_kitchen(
                tenant_id,
                KitchenUpdate::new(KitchenUpdateType::ActiveOrderChanged, payload),
            );
        }
    }

    fn take_out_locked(
        &self,
        queue: &mut TenantQueue,
        order_id: &str,
        next: OrderStatus,
        actor: &Actor,
        note: Option<String>,
    ) -> OrderResult<(Order, QueueEffects)> {
        let Some(current) = queue.get(order_id) else {
            return Err(OrderError::NotFound(order_id.to_string()));
        };
        let was_head = queue.head().is_some_and(|h| h.id == order_id);

        let mut order = current.clone();
        lifecycle::apply_transition(&mut order, next, actor, note)?;
        order.clear_queue_fields();
        self.store.save(&order)?;

        queue.remove(order_id);
        let effects = self.finish_mutation(queue, was_head);
        Ok((order, effects))
    }

    /// Restore queue invariants and sync positions after a mutation
    fn finish_mutation(&self, queue: &mut TenantQueue, head_removed: bool) -> QueueEffects {
        let now = util::now_millis();
        let (dirty, promoted) = queue.resync(now, self.display_timeout_ms);
        if let Err(e) = self.store.save_batch(&dirty) {
            tracing::warn!("Queue position sync failed for tenant {}: {e}", queue.tenant_id());
        }

        let active_change = match promoted {
            Some(order) => Some(ActiveOrderChange::Promoted(Box::new(order))),
            None if head_removed && queue.is_empty() => Some(ActiveOrderChange::Cleared),
            None => None,
        };

        QueueEffects {
            snapshot: queue.snapshot(),
            active_change,
        }
    }
}
