//! Kitchen display and customer notification payloads

use crate::order::{Order, OrderStatus};
use crate::util;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== Channel Key ====================

/// Address of a push notification channel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelKey {
    /// A single customer's channel within a tenant
    Customer {
        tenant_id: String,
        customer_id: String,
    },
    /// The shared kitchen staff channel of a tenant
    Kitchen { tenant_id: String },
}

impl ChannelKey {
    pub fn customer(tenant_id: impl Into<String>, customer_id: impl Into<String>) -> Self {
        Self::Customer {
            tenant_id: tenant_id.into(),
            customer_id: customer_id.into(),
        }
    }

    pub fn kitchen(tenant_id: impl Into<String>) -> Self {
        Self::Kitchen {
            tenant_id: tenant_id.into(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        match self {
            Self::Customer { tenant_id, .. } => tenant_id,
            Self::Kitchen { tenant_id } => tenant_id,
        }
    }

    /// Topic string used when routing through the broadcast hub
    pub fn as_topic(&self) -> String {
        match self {
            Self::Customer {
                tenant_id,
                customer_id,
            } => format!("{tenant_id}/customer/{customer_id}"),
            Self::Kitchen { tenant_id } => format!("{tenant_id}/kitchen"),
        }
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_topic())
    }
}

// ==================== Status Notices ====================

/// Push payload describing a single order status change.
///
/// Sent to the owning customer's channel on every change, and to the
/// tenant's kitchen channel for changes staff care about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusNotice {
    /// Order id
    pub order_id: String,
    /// Human-readable order number
    pub order_number: String,
    /// Status the order just entered
    pub new_status: OrderStatus,
    /// Display text for the new status
    pub message: String,
    /// When the change happened (epoch millis)
    pub timestamp: i64,
}

// ==================== Kitchen Display Updates ====================

/// Kind of kitchen display event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KitchenUpdateType {
    /// Queue membership or ordering changed
    QueueUpdated,
    /// A different order (or none) is now front-of-queue
    ActiveOrderChanged,
    /// An order finished preparation
    OrderReady,
}

impl KitchenUpdateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QueueUpdated => "queue_updated",
            Self::ActiveOrderChanged => "active_order_changed",
            Self::OrderReady => "order_ready",
        }
    }
}

impl fmt::Display for KitchenUpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Envelope broadcast to a tenant's kitchen display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenUpdate {
    /// Event kind
    pub update_type: KitchenUpdateType,
    /// Event-specific data (queue snapshot, order, ...)
    pub payload: serde_json::Value,
    /// When the event was produced (epoch millis)
    pub timestamp: i64,
}

impl KitchenUpdate {
    pub fn new(update_type: KitchenUpdateType, payload: serde_json::Value) -> Self {
        Self {
            update_type,
            payload,
            timestamp: util::now_millis(),
        }
    }
}

// ==================== Queue Snapshot ====================

/// Consistent view of one tenant's kitchen queue.
///
/// Sent as the `queue_updated` payload and served to the portal on demand.
/// Orders are in queue order (head first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub tenant_id: String,
    /// Queued orders, head first
    pub orders: Vec<Order>,
    /// Id of the currently displayed order, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_order_id: Option<String>,
}

impl QueueSnapshot {
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_key_topics() {
        let customer = ChannelKey::customer("cafe-1", "cust-9");
        assert_eq!(customer.as_topic(), "cafe-1/customer/cust-9");
        assert_eq!(customer.tenant_id(), "cafe-1");

        let kitchen = ChannelKey::kitchen("cafe-1");
        assert_eq!(kitchen.as_topic(), "cafe-1/kitchen");
        assert_eq!(kitchen.to_string(), "cafe-1/kitchen");
    }

    #[test]
    fn test_channel_keys_hash_by_value() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(ChannelKey::customer("cafe-1", "cust-9"));
        set.insert(ChannelKey::customer("cafe-1", "cust-9"));
        set.insert(ChannelKey::kitchen("cafe-1"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_update_type_serialization() {
        let json = serde_json::to_string(&KitchenUpdateType::ActiveOrderChanged).unwrap();
        assert_eq!(json, "\"active_order_changed\"");
        assert_eq!(KitchenUpdateType::OrderReady.as_str(), "order_ready");
    }

    #[test]
    fn test_status_notice_roundtrip_fields() {
        let notice = StatusNotice {
            order_id: "ord-1".to_string(),
            order_number: "#0042".to_string(),
            new_status: OrderStatus::Ready,
            message: "Your order is ready for pickup".to_string(),
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["new_status"], "READY");
        assert_eq!(json["order_number"], "#0042");
    }
}
