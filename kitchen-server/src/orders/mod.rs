//! Order Lifecycle Module
//!
//! Everything that creates and mutates orders:
//!
//! - **lifecycle**: transition-table enforcement and the order error type
//! - **money**: decimal-precise pricing and checkout validation
//! - **store**: redb persistence (orders, active index, number counters)
//! - **service**: the customer/staff operations driving the status graph
//!
//! # Command Flow
//!
//! ```text
//! Action (upload/approve/cancel/ready/received)
//!        ↓
//!   OrderService ── tenant lock ──→ apply_transition → OrderStore
//!        ↓                               ↓
//!   QueueManager (approve/ready/cancel paths)
//!        ↓
//!   NotificationDispatcher (after unlock)
//! ```

pub mod lifecycle;
pub mod money;
pub mod service;
pub mod store;

// Re-exports
pub use lifecycle::{OrderError, OrderResult, apply_transition};
pub use service::{DraftOrder, OrderService};
pub use store::{OrderStore, StorageError, StorageResult};

// Re-export shared types for convenience
pub use shared::order::{Actor, ActorRole, Order, OrderStatus};
