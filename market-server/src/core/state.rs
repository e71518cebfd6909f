use std::sync::Arc;

use crate::assignment::{AssignmentEngine, FirstVerified};
use crate::core::Config;
use crate::directory::InMemoryDirectory;
use crate::notify::NotificationDispatcher;
use crate::orders::{OrderService, OrderStore};
use crate::reports::{InMemoryCatalog, ReportService};

/// Shared server state
///
/// Holds one instance of every service behind `Arc`, so cloning the
/// state for each request is cheap.
///
/// The user directory and product catalog are in-process stand-ins for
/// external services; they sit behind the [`crate::directory::UserDirectory`]
/// and [`crate::reports::ProductCatalog`] traits so a remote client can
/// replace them without touching the services.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub store: OrderStore,
    pub orders: OrderService,
    pub assignments: Arc<AssignmentEngine>,
    pub notifications: Arc<NotificationDispatcher>,
    pub reports: ReportService,
    pub directory: Arc<InMemoryDirectory>,
    pub catalog: Arc<InMemoryCatalog>,
}

impl ServerState {
    /// Open the database and wire up all services
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let store = OrderStore::open(config.db_path())?;
        tracing::info!(path = %config.db_path().display(), "Order database opened");

        let notifications = Arc::new(NotificationDispatcher::new(store.clone()));
        let directory = Arc::new(InMemoryDirectory::new());
        let catalog = Arc::new(InMemoryCatalog::new());

        let orders = OrderService::new(store.clone(), notifications.clone());
        let assignments = Arc::new(AssignmentEngine::new(
            store.clone(),
            directory.clone(),
            notifications.clone(),
            Arc::new(FirstVerified),
        ));
        let reports = ReportService::new(store.clone(), catalog.clone());

        Ok(Self {
            config: Arc::new(config.clone()),
            store,
            orders,
            assignments,
            notifications,
            reports,
            directory,
            catalog,
        })
    }
}
