//! Product catalog service.

use tracing::instrument;

use stockbook_catalog::{sort_names, Product, ProductName};
use stockbook_core::DomainResult;

use crate::store::InventoryStore;

/// Registers and lists the known products.
#[derive(Debug, Clone)]
pub struct Catalog<S> {
    store: S,
}

impl<S: InventoryStore> Catalog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Register a new product under the trimmed `name`.
    ///
    /// Fails with `InvalidInput` on a blank name and `DuplicateProduct` when
    /// the exact (case-sensitive) name is already registered.
    #[instrument(skip(self), err)]
    pub async fn register(&self, name: &str) -> DomainResult<Product> {
        let name = ProductName::parse(name)?;
        Ok(self.store.insert_product(&name).await?)
    }

    /// All product names, ascending by byte order.
    #[instrument(skip(self), err)]
    pub async fn list(&self) -> DomainResult<Vec<String>> {
        let mut names: Vec<String> = self
            .store
            .list_products()
            .await?
            .into_iter()
            .map(|p| p.name.into_inner())
            .collect();
        sort_names(&mut names);
        Ok(names)
    }

    /// Whether the trimmed `name` is registered. Blank names never are.
    pub async fn exists(&self, name: &str) -> DomainResult<bool> {
        match ProductName::try_trimmed(name) {
            Some(name) => Ok(self.store.product_exists(&name).await?),
            None => Ok(false),
        }
    }
}
