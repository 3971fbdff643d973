//! Balance aggregation over a store snapshot.

use tracing::instrument;

use stockbook_balance::{compute_balance, compute_balances, Balance};
use stockbook_catalog::ProductName;
use stockbook_core::{DomainError, DomainResult};

use crate::store::InventoryStore;

/// Derives per-product balances on demand. Nothing is cached.
#[derive(Debug, Clone)]
pub struct BalanceAggregator<S> {
    store: S,
}

impl<S: InventoryStore> BalanceAggregator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// One balance per catalog product, sorted by name.
    #[instrument(skip(self), err)]
    pub async fn compute_all(&self) -> DomainResult<Vec<Balance>> {
        let snapshot = self.store.snapshot().await?;
        compute_balances(
            snapshot.products.iter().map(|p| &p.name),
            &snapshot.movements,
        )
    }

    /// Balance of a single product.
    #[instrument(skip(self), err)]
    pub async fn compute_one(&self, name: &str) -> DomainResult<Balance> {
        let name = ProductName::parse(name)?;
        let snapshot = self.store.snapshot().await?;

        if !snapshot.products.iter().any(|p| p.name == name) {
            return Err(DomainError::unknown_product(name.into_inner()));
        }

        compute_balance(name.as_str(), &snapshot.movements)
    }
}
