//! Realtime channel seam and the in-process broadcast hub

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use shared::ChannelKey;
use std::sync::Arc;
use tokio::sync::broadcast;

/// One event on a realtime topic
#[derive(Debug, Clone, Serialize)]
pub struct ChannelEvent {
    pub event: String,
    pub payload: Value,
}

/// Transport seam for realtime fan-out.
///
/// Delivery is at-most-once and best-effort; `publish` never blocks and
/// never fails. The concrete transport (WebSocket gateway, message bus)
/// plugs in here.
pub trait RealtimeChannel: Send + Sync {
    /// Publish an event to one channel. Returns the number of subscribers
    /// the event was handed to.
    fn publish(&self, key: &ChannelKey, event: &str, payload: Value) -> usize;
}

/// In-process broadcast hub.
///
/// Each channel key maps to a tokio broadcast topic. Slow subscribers lose
/// old events rather than blocking publishers.
#[derive(Clone)]
pub struct ChannelHub {
    capacity: usize,
    topics: Arc<DashMap<String, broadcast::Sender<ChannelEvent>>>,
}

impl ChannelHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            topics: Arc::new(DashMap::new()),
        }
    }

    /// Subscribe to one channel's events
    pub fn subscribe(&self, key: &ChannelKey) -> broadcast::Receiver<ChannelEvent> {
        self.sender(key).subscribe()
    }

    fn sender(&self, key: &ChannelKey) -> broadcast::Sender<ChannelEvent> {
        let entry = self
            .topics
            .entry(key.as_topic())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        entry.value().clone()
    }
}

impl std::fmt::Debug for ChannelHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelHub")
            .field("topics", &self.topics.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl RealtimeChannel for ChannelHub {
    fn publish(&self, key: &ChannelKey, event: &str, payload: Value) -> usize {
        let sender = self.sender(key);
        // A send error only means nobody is listening right now
        sender
            .send(ChannelEvent {
                event: event.to_string(),
                payload,
            })
            .unwrap_or(0)
    }
}
