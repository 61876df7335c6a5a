//! Per-tenant in-memory queue state
//!
//! The queue owns full order records while they hold a slot. During normal
//! operation this structure, not the persisted `queue_position` fields, is
//! the authority on ordering; positions are written back to storage after
//! each mutation and rebuilt from durable status fields on startup.

use shared::{Order, QueueSnapshot};

/// Ordered kitchen queue for one tenant. Index 0 is the head.
#[derive(Debug)]
pub struct TenantQueue {
    tenant_id: String,
    orders: Vec<Order>,
}

impl TenantQueue {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            orders: Vec::new(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn head(&self) -> Option<&Order> {
        self.orders.first()
    }

    pub fn get(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    pub fn contains(&self, order_id: &str) -> bool {
        self.get(order_id).is_some()
    }

    /// Queued orders, head first
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Append an order to the tail
    pub fn push_back(&mut self, order: Order) {
        self.orders.push(order);
    }

    /// Remove an order by id from any position
    pub fn remove(&mut self, order_id: &str) -> Option<Order> {
        let idx = self.orders.iter().position(|o| o.id == order_id)?;
        Some(self.orders.remove(idx))
    }

    /// Move an order to the tail, clearing its display fields so a
    /// following [`resync`](Self::resync) treats the new head as
    /// undisplayed. Returns false if the order is not queued.
    pub fn move_to_back(&mut self, order_id: &str) -> bool {
        let Some(idx) = self.orders.iter().position(|o| o.id == order_id) else {
            return false;
        };
        let mut order = self.orders.remove(idx);
        order.displayed_at = None;
        order.timeout_at = None;
        self.orders.push(order);
        true
    }

    /// Replace the whole queue (startup rebuild). Orders are sorted by
    /// last-update time ascending; ties keep their load order.
    pub fn replace_all(&mut self, mut orders: Vec<Order>) {
        orders.sort_by_key(|o| o.updated_at);
        self.orders = orders;
    }

    /// Re-establish queue invariants after a mutation.
    ///
    /// Positions become a contiguous 1..N sequence, a head without
    /// `displayed_at` is promoted (deadline set only for long orders), and
    /// stale display fields on non-head entries are cleared. Returns the
    /// orders whose fields changed, plus the freshly promoted head if any.
    pub fn resync(&mut self, now: i64, timeout_ms: i64) -> (Vec<Order>, Option<Order>) {
        let mut dirty = Vec::new();
        let mut promoted = None;

        for (idx, order) in self.orders.iter_mut().enumerate() {
            let mut changed = false;

            let position = Some((idx + 1) as u32);
            if order.queue_position != position {
                order.queue_position = position;
                changed = true;
            }

            if idx == 0 {
                if order.displayed_at.is_none() {
                    order.displayed_at = Some(now);
                    order.timeout_at = order.has_long_items.then_some(now + timeout_ms);
                    promoted = Some(order.clone());
                    changed = true;
                }
            } else if order.displayed_at.is_some() || order.timeout_at.is_some() {
                order.displayed_at = None;
                order.timeout_at = None;
                changed = true;
            }

            if changed {
                dirty.push(order.clone());
            }
        }

        (dirty, promoted)
    }

    /// Point-in-time copy for publishing and portal reads
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            tenant_id: self.tenant_id.clone(),
            orders: self.orders.clone(),
            active_order_id: self
                .orders
                .first()
                .filter(|o| o.is_displayed())
                .map(|o| o.id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{OrderStatus, PaymentMethod, Pricing};

    const TIMEOUT_MS: i64 = 20_000;

    fn queued_order(number: &str, has_long_items: bool) -> Order {
        let mut order = Order::new(
            "tenant-1",
            number,
            "cust-1",
            vec![],
            PaymentMethod::Cash,
            Pricing::default(),
        );
        order.status = OrderStatus::Preparing;
        order.has_long_items = has_long_items;
        order
    }

    fn positions(queue: &TenantQueue) -> Vec<u32> {
        queue
            .orders()
            .iter()
            .filter_map(|o| o.queue_position)
            .collect()
    }

    #[test]
    fn test_resync_assigns_contiguous_positions() {
        let mut queue = TenantQueue::new("tenant-1");
        for n in ["#0001", "#0002", "#0003"] {
            queue.push_back(queued_order(n, false));
        }

        let (dirty, _) = queue.resync(1000, TIMEOUT_MS);

        assert_eq!(positions(&queue), vec![1, 2, 3]);
        assert_eq!(dirty.len(), 3);
    }

    #[test]
    fn test_resync_promotes_undisplayed_head() {
        let mut queue = TenantQueue::new("tenant-1");
        queue.push_back(queued_order("#0001", true));

        let (_, promoted) = queue.resync(1000, TIMEOUT_MS);

        let head = promoted.unwrap();
        assert_eq!(head.displayed_at, Some(1000));
        assert_eq!(head.timeout_at, Some(1000 + TIMEOUT_MS));
        assert_eq!(queue.head().unwrap().displayed_at, Some(1000));
    }

    #[test]
    fn test_promoted_short_order_gets_no_deadline() {
        let mut queue = TenantQueue::new("tenant-1");
        queue.push_back(queued_order("#0001", false));

        let (_, promoted) = queue.resync(1000, TIMEOUT_MS);

        let head = promoted.unwrap();
        assert_eq!(head.displayed_at, Some(1000));
        assert!(head.timeout_at.is_none());
    }

    #[test]
    fn test_resync_is_stable_when_nothing_changed() {
        let mut queue = TenantQueue::new("tenant-1");
        queue.push_back(queued_order("#0001", false));
        queue.push_back(queued_order("#0002", false));
        queue.resync(1000, TIMEOUT_MS);

        let (dirty, promoted) = queue.resync(2000, TIMEOUT_MS);

        assert!(dirty.is_empty());
        assert!(promoted.is_none());
        // The head keeps its original display time
        assert_eq!(queue.head().unwrap().displayed_at, Some(1000));
    }

    #[test]
    fn test_resync_clears_stale_display_fields_behind_head() {
        let mut queue = TenantQueue::new("tenant-1");
        let mut stale = queued_order("#0001", true);
        stale.displayed_at = Some(500);
        stale.timeout_at = Some(20_500);
        queue.push_back(queued_order("#0002", false));
        queue.push_back(stale);

        queue.resync(1000, TIMEOUT_MS);

        let second = &queue.orders()[1];
        assert!(second.displayed_at.is_none());
        assert!(second.timeout_at.is_none());
    }

    #[test]
    fn test_move_to_back_preserves_relative_order() {
        let mut queue = TenantQueue::new("tenant-1");
        for n in ["#0001", "#0002", "#0003"] {
            queue.push_back(queued_order(n, true));
        }
        queue.resync(1000, TIMEOUT_MS);

        assert!(queue.move_to_back(&queue.orders()[0].id.clone()));
        let (_, promoted) = queue.resync(2000, TIMEOUT_MS);

        let numbers: Vec<&str> = queue
            .orders()
            .iter()
            .map(|o| o.order_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["#0002", "#0003", "#0001"]);
        assert_eq!(positions(&queue), vec![1, 2, 3]);
        // The old head lost its display fields, the new head gained them
        assert!(queue.orders()[2].displayed_at.is_none());
        assert_eq!(promoted.unwrap().order_number, "#0002");
    }

    #[test]
    fn test_move_to_back_on_single_order_restarts_display() {
        let mut queue = TenantQueue::new("tenant-1");
        queue.push_back(queued_order("#0001", true));
        queue.resync(1000, TIMEOUT_MS);

        let id = queue.head().unwrap().id.clone();
        assert!(queue.move_to_back(&id));
        let (_, promoted) = queue.resync(5000, TIMEOUT_MS);

        // Still the head, but with a fresh display time and deadline
        let head = promoted.unwrap();
        assert_eq!(head.id, id);
        assert_eq!(head.displayed_at, Some(5000));
        assert_eq!(head.timeout_at, Some(5000 + TIMEOUT_MS));
    }

    #[test]
    fn test_remove_missing_order_returns_none() {
        let mut queue = TenantQueue::new("tenant-1");
        queue.push_back(queued_order("#0001", false));
        assert!(queue.remove("no-such-id").is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_replace_all_sorts_by_updated_at() {
        let mut queue = TenantQueue::new("tenant-1");
        let mut a = queued_order("#0001", false);
        a.updated_at = 300;
        let mut b = queued_order("#0002", false);
        b.updated_at = 100;
        let mut c = queued_order("#0003", false);
        c.updated_at = 200;

        queue.replace_all(vec![a, b, c]);

        let numbers: Vec<&str> = queue
            .orders()
            .iter()
            .map(|o| o.order_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["#0002", "#0003", "#0001"]);
    }

    #[test]
    fn test_snapshot_reports_active_order() {
        let mut queue = TenantQueue::new("tenant-1");
        assert!(queue.snapshot().active_order_id.is_none());

        queue.push_back(queued_order("#0001", false));
        queue.push_back(queued_order("#0002", false));
        queue.resync(1000, TIMEOUT_MS);

        let snapshot = queue.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.active_order_id.as_deref(),
            Some(queue.head().unwrap().id.as_str())
        );
    }
}
