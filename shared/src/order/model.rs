//! The order record and its audit history

use super::item::OrderItem;
use super::payment::{PaymentDetails, PaymentMethod, Pricing};
use super::status::OrderStatus;
use crate::util;
use serde::{Deserialize, Serialize};

/// Role of the actor performing a status change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    Customer,
    Staff,
    System,
}

/// Who performed a status change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Actor {
    pub id: String,
    pub role: ActorRole,
}

impl Actor {
    pub fn customer(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: ActorRole::Customer,
        }
    }

    pub fn staff(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: ActorRole::Staff,
        }
    }

    pub fn system() -> Self {
        Self {
            id: "system".to_string(),
            role: ActorRole::System,
        }
    }
}

/// One entry in an order's append-only status history.
/// Entries are never mutated or removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    pub previous_status: OrderStatus,
    pub new_status: OrderStatus,
    pub actor_id: String,
    pub actor_role: ActorRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub timestamp: i64,
}

/// The central order record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Opaque order id
    pub id: String,
    /// Owning cafe
    pub tenant_id: String,
    /// Human-readable number for the kitchen slip
    pub order_number: String,
    /// Owning customer
    pub customer_id: String,
    /// Current lifecycle status
    pub status: OrderStatus,
    /// Order lines
    pub items: Vec<OrderItem>,
    pub payment: PaymentDetails,
    pub pricing: Pricing,
    /// 1-based position in the kitchen queue, present only while
    /// approved/preparing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_position: Option<u32>,
    /// True if any item's effective cooking type is long
    #[serde(default)]
    pub has_long_items: bool,
    /// When this order became the displayed head of the queue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displayed_at: Option<i64>,
    /// Requeue deadline; set only while displayed with long items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_at: Option<i64>,
    /// Append-only status history
    #[serde(default)]
    pub audit_logs: Vec<AuditEntry>,
    /// Creation timestamp (epoch millis)
    pub created_at: i64,
    /// Last update timestamp (epoch millis)
    pub updated_at: i64,
}

impl Order {
    /// Create a new draft order
    pub fn new(
        tenant_id: impl Into<String>,
        order_number: impl Into<String>,
        customer_id: impl Into<String>,
        items: Vec<OrderItem>,
        payment_method: PaymentMethod,
        pricing: Pricing,
    ) -> Self {
        let now = util::now_millis();
        Self {
            id: util::new_order_id(),
            tenant_id: tenant_id.into(),
            order_number: order_number.into(),
            customer_id: customer_id.into(),
            status: OrderStatus::Draft,
            items,
            payment: PaymentDetails::new(payment_method),
            pricing,
            queue_position: None,
            has_long_items: false,
            displayed_at: None,
            timeout_at: None,
            audit_logs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the order is in a terminal status
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Check if the order occupies a kitchen queue slot
    pub fn is_queued(&self) -> bool {
        self.status.is_queued()
    }

    /// Check if the order is the one shown on the kitchen display
    pub fn is_displayed(&self) -> bool {
        self.displayed_at.is_some()
    }

    /// Clear all queue bookkeeping when the order leaves the queue
    pub fn clear_queue_fields(&mut self) {
        self.queue_position = None;
        self.displayed_at = None;
        self.timeout_at = None;
    }
}
