//! Order lifecycle service
//!
//! Entry point for every customer/staff action that changes an order's
//! status. Each operation follows the same shape:
//!
//! ```text
//! lock tenant → load order → validate + apply transition → save
//!      → queue effects (still locked) → unlock → dispatch notifications
//! ```
//!
//! The tenant lock is the same one guarding queue mutations, so status
//! changes and queue changes for one tenant never interleave. Notifications
//! are best-effort; a dispatch failure never rolls back committed state.

use crate::notify::NotificationDispatcher;
use crate::orders::lifecycle::{self, OrderError, OrderResult};
use crate::orders::money;
use crate::orders::store::OrderStore;
use crate::queue::manager::QueueManager;
use shared::kitchen::{KitchenUpdate, KitchenUpdateType};
use shared::order::{Actor, OrderStatus, PaymentMethod};
use shared::{Order, OrderItem, QueueSnapshot};
use std::sync::Arc;

/// Checkout submission, as handed over by the (external) request layer
#[derive(Debug, Clone)]
pub struct DraftOrder {
    pub tenant_id: String,
    pub customer_id: String,
    pub items: Vec<OrderItem>,
    pub payment_method: PaymentMethod,
}

pub struct OrderService {
    store: OrderStore,
    manager: Arc<QueueManager>,
    dispatcher: NotificationDispatcher,
    /// Tax fraction applied at checkout (0.21 for 21%)
    tax_rate: f64,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("tax_rate", &self.tax_rate)
            .finish()
    }
}

impl OrderService {
    pub fn new(
        store: OrderStore,
        manager: Arc<QueueManager>,
        dispatcher: NotificationDispatcher,
        tax_rate: f64,
    ) -> Self {
        Self {
            store,
            manager,
            dispatcher,
            tax_rate,
        }
    }

    /// Create a new order in `draft` from a checkout submission.
    ///
    /// Validates every line, prices the order, and assigns the next
    /// per-tenant order number. No audit entry and no notification; the
    /// first transition out of draft produces both.
    pub fn create_draft(&self, input: DraftOrder) -> OrderResult<Order> {
        if input.items.is_empty() {
            return Err(OrderError::InvalidOperation(
                "order must contain at least one item".to_string(),
            ));
        }

        let pricing = money::compute_pricing(&input.items, self.tax_rate)?;
        let seq = self.store.next_order_number(&input.tenant_id)?;
        let order = Order::new(
            input.tenant_id,
            shared::util::format_order_number(seq),
            input.customer_id,
            input.items,
            input.payment_method,
            pricing,
        );
        self.store.save(&order)?;

        tracing::info!(
            "🧾 Order {} ({}) created for tenant {}",
            order.order_number,
            order.id,
            order.tenant_id
        );
        Ok(order)
    }

    /// Customer uploads a transfer receipt: `draft|disapproved → payment_uploaded`.
    ///
    /// A paid amount that does not match the order total is recorded and
    /// logged, not rejected; approving it is the staff's call.
    pub async fn upload_receipt(
        &self,
        tenant_id: &str,
        order_id: &str,
        receipt_image: String,
        paid_amount: f64,
        actor: &Actor,
    ) -> OrderResult<Order> {
        if !paid_amount.is_finite() || paid_amount < 0.0 {
            return Err(OrderError::InvalidOperation(format!(
                "paid_amount must be a non-negative number, got {paid_amount}"
            )));
        }

        let order = self
            .transition_unqueued(
                tenant_id,
                order_id,
                OrderStatus::PaymentUploaded,
                actor,
                None,
                |order| {
                    order.payment.method = PaymentMethod::Receipt;
                    order.payment.receipt_image = Some(receipt_image);
                    order.payment.paid_amount = paid_amount;
                    order.payment.rejection_note = None;
                },
            )
            .await?;

        if !money::money_eq(paid_amount, order.pricing.total) {
            tracing::warn!(
                "💳 Reported payment {} differs from total {} for order {}",
                paid_amount,
                order.pricing.total,
                order.order_number
            );
        }
        Ok(order)
    }

    /// Customer chooses to pay cash at the counter: `draft → cash_selected`
    pub async fn select_cash(
        &self,
        tenant_id: &str,
        order_id: &str,
        actor: &Actor,
    ) -> OrderResult<Order> {
        self.transition_unqueued(
            tenant_id,
            order_id,
            OrderStatus::CashSelected,
            actor,
            None,
            |order| order.payment.method = PaymentMethod::Cash,
        )
        .await
    }

    /// Staff approves the payment and the order enters the kitchen queue.
    ///
    /// Two transitions run back to back under one lock and one save:
    /// `payment_uploaded|cash_selected → approved → preparing`. Each appends
    /// its own audit entry and each gets its own customer notification.
    pub async fn approve(
        &self,
        tenant_id: &str,
        order_id: &str,
        actor: &Actor,
    ) -> OrderResult<Order> {
        let mut queue = self.manager.lock_tenant(tenant_id).await;
        let mut order = self.load_in_tenant(order_id, tenant_id)?;
        lifecycle::apply_transition(&mut order, OrderStatus::Approved, actor, None)?;

        let approved = order.clone();
        let (order, effects) = self.manager.enqueue_locked(&mut queue, order, actor)?;
        drop(queue);

        self.dispatcher.notify_status_change(&approved, actor);
        self.dispatcher.notify_status_change(&order, actor);
        self.manager.dispatch_effects(&effects);
        Ok(order)
    }

    /// Staff rejects the uploaded payment:
    /// `payment_uploaded|cash_selected → disapproved`. The customer can
    /// upload a new receipt afterwards.
    pub async fn disapprove(
        &self,
        tenant_id: &str,
        order_id: &str,
        actor: &Actor,
        note: String,
    ) -> OrderResult<Order> {
        self.transition_unqueued(
            tenant_id,
            order_id,
            OrderStatus::Disapproved,
            actor,
            Some(note.clone()),
            |order| order.payment.rejection_note = Some(note),
        )
        .await
    }

    /// Cancel an order from any status that still allows it.
    ///
    /// A queued order leaves the kitchen queue with full display handover;
    /// anything else is a plain transition.
    pub async fn cancel(
        &self,
        tenant_id: &str,
        order_id: &str,
        actor: &Actor,
        note: Option<String>,
    ) -> OrderResult<Order> {
        let mut queue = self.manager.lock_tenant(tenant_id).await;
        let order = self.load_in_tenant(order_id, tenant_id)?;

        if queue.contains(&order.id) {
            let (order, effects) = self.manager.remove_locked(&mut queue, order_id, actor, note)?;
            drop(queue);
            self.manager.dispatch_effects(&effects);
            self.dispatcher.notify_status_change(&order, actor);
            return Ok(order);
        }

        let mut order = order;
        lifecycle::apply_transition(&mut order, OrderStatus::Cancelled, actor, note)?;
        self.store.save(&order)?;
        drop(queue);

        self.dispatcher.notify_status_change(&order, actor);
        Ok(order)
    }

    /// Kitchen finished the order: `preparing → ready`.
    ///
    /// The order leaves the queue, the next head takes the display, and an
    /// `ORDER_READY` kitchen update fires alongside the status notice.
    pub async fn mark_ready(
        &self,
        tenant_id: &str,
        order_id: &str,
        actor: &Actor,
    ) -> OrderResult<Order> {
        let mut queue = self.manager.lock_tenant(tenant_id).await;
        let order = self.load_in_tenant(order_id, tenant_id)?;

        let (order, effects) = if queue.contains(&order.id) {
            let (order, effects) = self.manager.dequeue_locked(&mut queue, order_id, actor)?;
            (order, Some(effects))
        } else {
            let mut order = order;
            lifecycle::apply_transition(&mut order, OrderStatus::Ready, actor, None)?;
            order.clear_queue_fields();
            self.store.save(&order)?;
            (order, None)
        };
        drop(queue);

        if let Some(effects) = &effects {
            self.manager.dispatch_effects(effects);
        }
        self.dispatcher.notify_status_change(&order, actor);
        self.notify_order_ready(&order);
        Ok(order)
    }

    /// Customer picked the order up: `ready → received` (terminal)
    pub async fn mark_received(
        &self,
        tenant_id: &str,
        order_id: &str,
        actor: &Actor,
    ) -> OrderResult<Order> {
        self.transition_unqueued(
            tenant_id,
            order_id,
            OrderStatus::Received,
            actor,
            None,
            |_| {},
        )
        .await
    }

    /// Consistent view of the tenant's kitchen queue
    pub async fn queue_snapshot(&self, tenant_id: &str) -> QueueSnapshot {
        self.manager.snapshot(tenant_id).await
    }

    /// Load one order, scoped to the tenant
    pub fn get_order(&self, tenant_id: &str, order_id: &str) -> OrderResult<Order> {
        self.load_in_tenant(order_id, tenant_id)
    }

    /// Shared path for transitions with no queue involvement
    async fn transition_unqueued(
        &self,
        tenant_id: &str,
        order_id: &str,
        next: OrderStatus,
        actor: &Actor,
        note: Option<String>,
        update: impl FnOnce(&mut Order),
    ) -> OrderResult<Order> {
        let guard = self.manager.lock_tenant(tenant_id).await;
        let mut order = self.load_in_tenant(order_id, tenant_id)?;
        lifecycle::apply_transition(&mut order, next, actor, note)?;
        update(&mut order);
        self.store.save(&order)?;
        drop(guard);

        self.dispatcher.notify_status_change(&order, actor);
        Ok(order)
    }

    /// An order from another tenant is reported as missing, not as foreign
    fn load_in_tenant(&self, order_id: &str, tenant_id: &str) -> OrderResult<Order> {
        let order = self
            .store
            .load(order_id)?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;
        if order.tenant_id != tenant_id {
            return Err(OrderError::NotFound(order_id.to_string()));
        }
        Ok(order)
    }

    fn notify_order_ready(&self, order: &Order) {
        let payload = serde_json::json!({
            "order_id": order.id,
            "order_number": order.order_number,
        });
        self.dispatcher.notify_kitchen(
            &order.tenant_id,
            KitchenUpdate::new(KitchenUpdateType::OrderReady, payload),
        );
    }
}
