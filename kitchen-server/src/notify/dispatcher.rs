//! Notification fan-out for status changes and kitchen display events
//!
//! Delivery is fire-and-forget relative to the state mutation: a failed
//! publish or push is logged and never surfaces to the caller.

use crate::notify::channel::RealtimeChannel;
use crate::notify::messages::status_message;
use crate::notify::push::{PushError, PushMessage, PushSender, TokenStore};
use shared::kitchen::{ChannelKey, KitchenUpdate, StatusNotice};
use shared::order::Actor;
use shared::{Order, util};
use std::sync::Arc;

/// Event name for status notices on customer and staff channels
pub const STATUS_EVENT: &str = "order-status-changed";

#[derive(Clone)]
pub struct NotificationDispatcher {
    channel: Arc<dyn RealtimeChannel>,
    push: Arc<dyn PushSender>,
    tokens: TokenStore,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("tokens", &self.tokens)
            .finish()
    }
}

impl NotificationDispatcher {
    pub fn new(
        channel: Arc<dyn RealtimeChannel>,
        push: Arc<dyn PushSender>,
        tokens: TokenStore,
    ) -> Self {
        Self {
            channel,
            push,
            tokens,
        }
    }

    /// Fan out one status change: the owning customer's channel, the
    /// tenant's staff channel, then a best-effort mobile push. Never fails.
    pub fn notify_status_change(&self, order: &Order, actor: &Actor) {
        let notice = StatusNotice {
            order_id: order.id.clone(),
            order_number: order.order_number.clone(),
            new_status: order.status,
            message: status_message(order.status),
            timestamp: util::now_millis(),
        };
        let payload = match serde_json::to_value(&notice) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize notice for order {}: {e}", order.id);
                return;
            }
        };

        tracing::info!(
            "📣 Order {} -> {} (actor {})",
            order.order_number,
            order.status,
            actor.id
        );

        self.channel.publish(
            &ChannelKey::customer(&order.tenant_id, &order.customer_id),
            STATUS_EVENT,
            payload.clone(),
        );
        self.channel
            .publish(&ChannelKey::kitchen(&order.tenant_id), STATUS_EVENT, payload);

        self.push_to_customer(order, notice.message);
    }

    /// Kitchen display event, scoped to the tenant's staff channel
    pub fn notify_kitchen(&self, tenant_id: &str, update: KitchenUpdate) {
        let event = update.update_type.as_str();
        let payload = match serde_json::to_value(&update) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize kitchen update for {tenant_id}: {e}");
                return;
            }
        };
        self.channel
            .publish(&ChannelKey::kitchen(tenant_id), event, payload);
    }

    /// Spawned out-of-band push. A dead-token response drops the stored
    /// token so the next registration starts clean.
    fn push_to_customer(&self, order: &Order, message: String) {
        let Some(token) = self.tokens.get(&order.customer_id) else {
            return;
        };

        let push = self.push.clone();
        let tokens = self.tokens.clone();
        let customer_id = order.customer_id.clone();
        let order_number = order.order_number.clone();
        tokio::spawn(async move {
            let msg = PushMessage {
                title: format!("Order {order_number}"),
                body: message,
            };
            match push.send(&token, &msg).await {
                Ok(()) => {}
                Err(PushError::DeviceNotRegistered) => {
                    tracing::info!("Dropping dead device token for customer {customer_id}");
                    tokens.clear(&customer_id);
                }
                Err(e) => {
                    tracing::warn!("Push to customer {customer_id} failed: {e}");
                }
            }
        });
    }
}
