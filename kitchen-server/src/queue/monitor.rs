//! Timeout Monitor - periodic display deadline sweep
//!
//! Scans every tenant queue for preparing orders past their display window
//! and asks the manager to move each one to the back. Ticks run one at a
//! time; dueness is re-checked under the tenant lock, so a candidate that
//! was already handled (or finished) by the time its turn comes is skipped.

use crate::queue::manager::QueueManager;
use shared::util;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct TimeoutMonitor {
    manager: Arc<QueueManager>,
    tick: Duration,
}

impl TimeoutMonitor {
    pub fn new(manager: Arc<QueueManager>, tick: Duration) -> Self {
        Self { manager, tick }
    }

    /// Run until the shutdown token is cancelled.
    ///
    /// A tick that fires while the previous sweep is still running waits
    /// for the next interval instead of bursting to catch up.
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!("TimeoutMonitor started (tick {:?})", self.tick);

        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval.tick().await; // first tick fires immediately

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("TimeoutMonitor stopped");
                    break;
                }
                _ = interval.tick() => {
                    self.sweep_once(util::now_millis()).await;
                }
            }
        }
    }

    /// One pass over all tenants; returns how many orders were moved.
    ///
    /// A failed requeue is logged and does not stop the rest of the sweep.
    pub async fn sweep_once(&self, now: i64) -> usize {
        let candidates = self.manager.timed_out(now).await;
        let mut moved = 0;

        for (tenant_id, order_id) in candidates {
            match self.manager.requeue(&tenant_id, &order_id, now).await {
                Ok(true) => moved += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!("Requeue failed for order {order_id} (tenant {tenant_id}): {e}");
                }
            }
        }

        if moved > 0 {
            tracing::debug!("Timeout sweep moved {moved} order(s)");
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MenuCatalog, MenuEntry};
    use crate::notify::{ChannelHub, LogOnlyPushSender, NotificationDispatcher, TokenStore};
    use crate::orders::lifecycle;
    use crate::orders::store::OrderStore;
    use shared::order::{Actor, OrderStatus, PaymentMethod, Pricing};
    use shared::{CookingType, Order, OrderItem, Portion};

    const TIMEOUT_MS: i64 = 20_000;

    fn manager() -> Arc<QueueManager> {
        let store = OrderStore::open_in_memory().unwrap();
        let catalog = MenuCatalog::new();
        catalog.upsert("stew", MenuEntry::new("Stew", CookingType::Long));
        catalog.upsert("juice", MenuEntry::new("Juice", CookingType::Short));
        let dispatcher = NotificationDispatcher::new(
            Arc::new(ChannelHub::new(16)),
            Arc::new(LogOnlyPushSender),
            TokenStore::new(),
        );
        Arc::new(QueueManager::new(store, catalog, dispatcher, TIMEOUT_MS))
    }

    async fn enqueue(manager: &QueueManager, tenant: &str, number: &str, menu: &str) -> Order {
        let mut order = Order::new(
            tenant,
            number,
            "cust-1",
            vec![OrderItem {
                menu_item_id: menu.to_string(),
                name: menu.to_string(),
                quantity: 1,
                unit_price: 5.0,
                portion: Portion::Full,
                cooking_override: None,
                note: None,
            }],
            PaymentMethod::Cash,
            Pricing::default(),
        );
        lifecycle::apply_transition(
            &mut order,
            OrderStatus::CashSelected,
            &Actor::customer("cust-1"),
            None,
        )
        .unwrap();
        lifecycle::apply_transition(&mut order, OrderStatus::Approved, &Actor::staff("s1"), None)
            .unwrap();

        let mut queue = manager.lock_tenant(tenant).await;
        let (order, _) = manager
            .enqueue_locked(&mut queue, order, &Actor::staff("s1"))
            .unwrap();
        order
    }

    #[tokio::test]
    async fn test_sweep_moves_overdue_order_once() {
        let mgr = manager();
        let monitor = TimeoutMonitor::new(mgr.clone(), Duration::from_millis(10));
        let head = enqueue(&mgr, "t1", "#0001", "stew").await;
        enqueue(&mgr, "t1", "#0002", "juice").await;

        let now = head.timeout_at.unwrap() + 1;
        assert_eq!(monitor.sweep_once(now).await, 1);

        let snapshot = mgr.snapshot("t1").await;
        assert_eq!(snapshot.orders[0].order_number, "#0002");
        assert_eq!(snapshot.orders[1].order_number, "#0001");

        // The moved order lost its deadline and the short head has none
        assert_eq!(monitor.sweep_once(now).await, 0);
    }

    #[tokio::test]
    async fn test_sweep_before_deadline_does_nothing() {
        let mgr = manager();
        let monitor = TimeoutMonitor::new(mgr.clone(), Duration::from_millis(10));
        let head = enqueue(&mgr, "t1", "#0001", "stew").await;

        assert_eq!(monitor.sweep_once(head.timeout_at.unwrap() - 1).await, 0);
        assert_eq!(
            mgr.snapshot("t1").await.orders[0].order_number,
            "#0001"
        );
    }

    #[tokio::test]
    async fn test_sweep_covers_every_tenant() {
        let mgr = manager();
        let monitor = TimeoutMonitor::new(mgr.clone(), Duration::from_millis(10));
        let a = enqueue(&mgr, "t1", "#0001", "stew").await;
        let b = enqueue(&mgr, "t2", "#0001", "stew").await;

        let now = a.timeout_at.unwrap().max(b.timeout_at.unwrap()) + 1;
        assert_eq!(monitor.sweep_once(now).await, 2);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let mgr = manager();
        let monitor = TimeoutMonitor::new(mgr, Duration::from_millis(5));
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(monitor.run(shutdown.clone()));
        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("monitor should stop promptly")
            .unwrap();
    }
}
