use std::sync::Arc;

use stockbook_infra::{
    BalanceAggregator, Catalog, InMemoryStore, InventoryStore, Ledger, SqliteStore, StoreError,
};

use crate::config::StoreConfig;

/// Store handle shared by every service; the backend is picked at startup.
pub type SharedStore = Arc<dyn InventoryStore>;

/// Services used by the HTTP handlers, all over the same store.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Catalog<SharedStore>,
    pub ledger: Ledger<SharedStore>,
    pub balances: BalanceAggregator<SharedStore>,
}

impl AppServices {
    pub fn new(store: SharedStore) -> Self {
        Self {
            catalog: Catalog::new(store.clone()),
            ledger: Ledger::new(store.clone()),
            balances: BalanceAggregator::new(store),
        }
    }

    /// Fresh in-memory services (tests/dev).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }
}

/// Open the configured store and wire the services onto it.
pub async fn build_services(config: &StoreConfig) -> Result<AppServices, StoreError> {
    let store: SharedStore = match config {
        StoreConfig::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Arc::new(InMemoryStore::new())
        }
        StoreConfig::Sqlite {
            url,
            max_connections,
        } => {
            tracing::info!(%url, max_connections, "opening sqlite store");
            Arc::new(SqliteStore::connect(url, *max_connections).await?)
        }
    };

    Ok(AppServices::new(store))
}
