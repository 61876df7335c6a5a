//! Server Implementation
//!
//! Startup order and graceful shutdown for the kitchen server.

use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, Result, ServerState};
use crate::queue::TimeoutMonitor;

pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create a server over an already-initialized state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Run until interrupted.
    ///
    /// Initializes the state if none was supplied (which rebuilds every
    /// tenant queue), starts the timeout monitor, then waits for ctrl-c
    /// and shuts the background tasks down gracefully.
    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let mut tasks = BackgroundTasks::new();
        let shutdown = tasks.shutdown_token();
        let monitor = TimeoutMonitor::new(state.queue_manager(), self.config.monitor_tick());
        tasks.spawn("timeout_monitor", TaskKind::Periodic, monitor.run(shutdown));
        tasks.log_summary();

        tracing::info!("🍳 Kitchen server up (environment: {})", self.config.environment);
        tracing::info!("  Work dir        : {}", self.config.work_dir);
        tracing::info!("  Database        : {}", self.config.db_path().display());
        tracing::info!("  Display timeout : {} ms", self.config.display_timeout_ms);
        tracing::info!("  Monitor tick    : {} ms", self.config.monitor_tick_ms);

        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutting down...");
        tasks.shutdown().await;

        Ok(())
    }
}
