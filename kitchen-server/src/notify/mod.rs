//! Notification Fan-out Module
//!
//! Status-change and kitchen display events flow out through here:
//!
//! - **channel**: realtime publish/subscribe seam and in-process hub
//! - **push**: out-of-band mobile push seam and device token store
//! - **messages**: static status -> human text table
//! - **dispatcher**: fan-out orchestration (customer, staff, push)
//!
//! Everything in this module is best-effort by contract: no function here
//! may fail the state mutation that triggered it.

pub mod channel;
pub mod dispatcher;
pub mod messages;
pub mod push;

// Re-exports
pub use channel::{ChannelEvent, ChannelHub, RealtimeChannel};
pub use dispatcher::{NotificationDispatcher, STATUS_EVENT};
pub use messages::status_message;
pub use push::{LogOnlyPushSender, PushError, PushMessage, PushSender, TokenStore};
