use std::sync::Arc;

use crate::catalog::MenuCatalog;
use crate::core::{Config, Result};
use crate::notify::{ChannelHub, LogOnlyPushSender, NotificationDispatcher, TokenStore};
use crate::orders::{OrderService, OrderStore};
use crate::queue::QueueManager;

/// Server state - shared handles to every service
///
/// All fields are cheap to clone (Arc or Arc-backed).
///
/// | field | purpose |
/// |-------|---------|
/// | config | immutable configuration |
/// | store | redb order persistence |
/// | catalog | menu cooking-type cache |
/// | hub | in-process realtime channel hub |
/// | tokens | customer push token store |
/// | dispatcher | status / kitchen notification fan-out |
/// | manager | per-tenant kitchen queues |
/// | service | order lifecycle operations |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: OrderStore,
    pub catalog: MenuCatalog,
    pub hub: Arc<ChannelHub>,
    pub tokens: TokenStore,
    pub dispatcher: NotificationDispatcher,
    pub manager: Arc<QueueManager>,
    pub service: Arc<OrderService>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("work_dir", &self.config.work_dir)
            .field("environment", &self.config.environment)
            .field("catalog", &self.catalog)
            .finish()
    }
}

impl ServerState {
    /// Initialize the server state.
    ///
    /// Order matters: the work directory and database come up first, then
    /// the notification plumbing, then the queue manager which rebuilds
    /// every tenant queue from durable state before any traffic arrives.
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir()?;
        let store = OrderStore::open(config.db_path())?;

        let catalog = MenuCatalog::new();
        let hub = Arc::new(ChannelHub::new(config.channel_capacity));
        let tokens = TokenStore::new();
        let dispatcher = NotificationDispatcher::new(
            hub.clone(),
            Arc::new(LogOnlyPushSender),
            tokens.clone(),
        );

        let manager = Arc::new(QueueManager::new(
            store.clone(),
            catalog.clone(),
            dispatcher.clone(),
            config.display_timeout_ms,
        ));
        manager.initialize().await?;

        let service = Arc::new(OrderService::new(
            store.clone(),
            manager.clone(),
            dispatcher.clone(),
            config.tax_rate,
        ));

        Ok(Self {
            config: config.clone(),
            store,
            catalog,
            hub,
            tokens,
            dispatcher,
            manager,
            service,
        })
    }

    pub fn order_service(&self) -> Arc<OrderService> {
        self.service.clone()
    }

    pub fn queue_manager(&self) -> Arc<QueueManager> {
        self.manager.clone()
    }
}
