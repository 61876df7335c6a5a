//! Order Lifecycle Module
//!
//! This module provides the types for the kitchen order lifecycle:
//! - Status: the legal state graph every mutation must follow
//! - Model: the full order record with its append-only audit history
//! - Items / Payment: order composition, payment details and totals

pub mod item;
pub mod model;
pub mod payment;
pub mod status;

// Re-exports
pub use item::{CookingType, OrderItem, Portion};
pub use model::{Actor, ActorRole, AuditEntry, Order};
pub use payment::{PaymentDetails, PaymentMethod, Pricing};
pub use status::{OrderStatus, is_valid_transition};
