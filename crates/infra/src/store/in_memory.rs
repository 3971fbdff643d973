use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use stockbook_catalog::{Product, ProductName};
use stockbook_core::{ProductId, RecordId};
use stockbook_ledger::{sort_newest_first, Direction, MovementRecord, NewMovement};

use super::r#trait::{InventoryStore, LedgerSnapshot, StoreError};

#[derive(Debug, Default)]
struct State {
    /// Keyed by name so iteration is already in listing order.
    products: BTreeMap<ProductName, ProductId>,
    /// Append-only, in id order.
    movements: Vec<MovementRecord>,
    last_product_id: i64,
    last_record_id: i64,
}

/// In-memory catalog + ledger.
///
/// Intended for tests/dev. One `RwLock` guards all state: writers serialise
/// on it, readers share it.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("lock poisoned".to_string())
    }
}

#[async_trait]
impl InventoryStore for InMemoryStore {
    async fn insert_product(&self, name: &ProductName) -> Result<Product, StoreError> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;

        if state.products.contains_key(name) {
            return Err(StoreError::DuplicateProduct(name.to_string()));
        }

        state.last_product_id += 1;
        let id = ProductId::new(state.last_product_id);
        state.products.insert(name.clone(), id);

        Ok(Product::new(id, name.clone()))
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state
            .products
            .iter()
            .map(|(name, id)| Product::new(*id, name.clone()))
            .collect())
    }

    async fn product_exists(&self, name: &ProductName) -> Result<bool, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state.products.contains_key(name))
    }

    async fn append_movement(&self, movement: NewMovement) -> Result<MovementRecord, StoreError> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;

        if !state.products.contains_key(&movement.product_name) {
            return Err(StoreError::UnknownProduct(movement.product_name.to_string()));
        }

        state.last_record_id += 1;
        let record = movement.into_record(RecordId::new(state.last_record_id));
        state.movements.push(record.clone());

        Ok(record)
    }

    async fn list_movements(&self, direction: Direction) -> Result<Vec<MovementRecord>, StoreError> {
        let mut records: Vec<MovementRecord> = {
            let state = self.state.read().map_err(|_| Self::poisoned())?;
            state
                .movements
                .iter()
                .filter(|m| m.direction == direction)
                .cloned()
                .collect()
        };
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn snapshot(&self) -> Result<LedgerSnapshot, StoreError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(LedgerSnapshot {
            products: state
                .products
                .iter()
                .map(|(name, id)| Product::new(*id, name.clone()))
                .collect(),
            movements: state.movements.clone(),
        })
    }
}
