//! Shared types for the Cortado cafe ordering platform
//!
//! Common types used by the kitchen server and its clients:
//! order records, the status transition graph, kitchen display events
//! and realtime channel addressing.

pub mod kitchen;
pub mod order;
pub mod util;

// Re-exports
pub use kitchen::{ChannelKey, KitchenUpdate, KitchenUpdateType, QueueSnapshot, StatusNotice};
pub use order::{
    Actor, ActorRole, AuditEntry, CookingType, Order, OrderItem, OrderStatus, PaymentDetails,
    PaymentMethod, Portion, Pricing, is_valid_transition,
};
