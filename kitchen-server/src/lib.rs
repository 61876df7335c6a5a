//! Cortado Kitchen Server - multi-tenant kitchen queue and order lifecycle
//!
//! # Architecture Overview
//!
//! The server sequences approved orders into a single-file kitchen display
//! per tenant and drives the order status graph:
//!
//! - **Order lifecycle** (`orders`): transition enforcement, pricing,
//!   persistence, and the customer/staff operations
//! - **Kitchen queue** (`queue`): per-tenant FIFO, display promotion, and
//!   the slow-order timeout monitor
//! - **Notifications** (`notify`): realtime channel fan-out plus
//!   best-effort mobile push
//! - **Catalog** (`catalog`): menu cooking-type cache
//!
//! # Module Structure
//!
//! ```text
//! kitchen-server/src/
//! ├── core/        # config, state, server, background tasks
//! ├── orders/      # lifecycle, money, store, service
//! ├── queue/       # tenant queues, registry, manager, monitor
//! ├── notify/      # channel hub, dispatcher, push
//! ├── catalog.rs   # menu cooking-type cache
//! └── utils/       # logger
//! ```

pub mod catalog;
pub mod core;
pub mod notify;
pub mod orders;
pub mod queue;
pub mod utils;

// Re-export public types
pub use catalog::{MenuCatalog, MenuEntry};
pub use core::{Config, Result, Server, ServerError, ServerState};
pub use notify::NotificationDispatcher;
pub use orders::{DraftOrder, OrderError, OrderService, OrderStore};
pub use queue::{QueueManager, TimeoutMonitor};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialize logging from the environment.
///
/// Must run before anything logs; config parsing relies on it for its
/// fallback warnings.
pub fn setup_environment() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______           __            __
  / ____/___  _____/ /_____ _____/ /___
 / /   / __ \/ ___/ __/ __ `/ __  / __ \
/ /___/ /_/ / /  / /_/ /_/ / /_/ / /_/ /
\____/\____/_/   \__/\__,_/\__,_/\____/
    __ __ _ __       __
   / //_/(_) /______/ /_  ___  ____
  / ,<  / / __/ ___/ __ \/ _ \/ __ \
 / /| |/ / /_/ /__/ / / /  __/ / / /
/_/ |_/_/\__/\___/_/ /_/\___/_/ /_/
    "#
    );
}
