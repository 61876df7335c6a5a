//! Kitchen Queue Module
//!
//! Per-tenant FIFO queues driving the kitchen display:
//!
//! - **tenant**: one tenant's in-memory queue and position bookkeeping
//! - **registry**: lazy per-tenant queue creation and locking
//! - **manager**: mutation orchestration, persistence, display events
//! - **monitor**: periodic sweep moving stalled long orders to the back
//!
//! # Data Flow
//!
//! ```text
//! Approve → QueueManager.enqueue → tail of tenant queue
//!                                       ↓
//!                              head promoted to display
//!                                       ↓  (long order idle ~20s)
//!                       TimeoutMonitor → requeue → back of queue
//!                                       ↓
//!               Ready / Cancel → dequeue / remove → next head promoted
//! ```
//!
//! Queue order lives in memory while the process runs; positions are
//! mirrored to storage so a restart can rebuild every queue.

pub mod manager;
pub mod monitor;
pub mod registry;
pub mod tenant;

// Re-exports
pub use manager::{ActiveOrderChange, QueueEffects, QueueManager};
pub use monitor::TimeoutMonitor;
pub use registry::TenantRegistry;
pub use tenant::TenantQueue;
