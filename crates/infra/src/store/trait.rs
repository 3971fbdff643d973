use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockbook_catalog::{Product, ProductName};
use stockbook_core::DomainError;
use stockbook_ledger::{Direction, MovementRecord, NewMovement};

/// Persistence operation error.
///
/// These are **infrastructure errors** raised by a backend. Constraint
/// violations the backend enforces map to their domain counterparts; every
/// other failure is `Unavailable`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("product \"{0}\" already exists")]
    DuplicateProduct(String),

    #[error("unknown product \"{0}\"")]
    UnknownProduct(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateProduct(name) => DomainError::duplicate_product(name),
            StoreError::UnknownProduct(name) => DomainError::unknown_product(name),
            StoreError::Unavailable(detail) => DomainError::storage_unavailable(detail),
        }
    }
}

/// Catalog and ledger observed at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSnapshot {
    /// Catalog entries sorted by name.
    pub products: Vec<Product>,
    /// Every movement of both directions, in append (`id`) order.
    pub movements: Vec<MovementRecord>,
}

/// Durable storage for the catalog and the ledger.
///
/// ## Implementation Requirements
///
/// Implementations must:
/// - reject a second product with the same name (`DuplicateProduct`), with
///   the check and the insert serialised so concurrent registrations cannot
///   both succeed
/// - reject a movement whose product is not in the catalog (`UnknownProduct`)
/// - assign record ids from one strictly increasing sequence that is never
///   reused, serialised across concurrent appends
/// - never update or delete a stored movement
/// - let reads run concurrently with each other
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Insert a new catalog entry.
    async fn insert_product(&self, name: &ProductName) -> Result<Product, StoreError>;

    /// All catalog entries sorted by name (byte order).
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn product_exists(&self, name: &ProductName) -> Result<bool, StoreError>;

    /// Append a validated movement and return it with its assigned id.
    async fn append_movement(&self, movement: NewMovement) -> Result<MovementRecord, StoreError>;

    /// Movements of one direction, newest first (timestamp desc, id desc).
    async fn list_movements(&self, direction: Direction) -> Result<Vec<MovementRecord>, StoreError>;

    /// Read catalog and ledger consistently in a single call.
    async fn snapshot(&self) -> Result<LedgerSnapshot, StoreError>;
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn insert_product(&self, name: &ProductName) -> Result<Product, StoreError> {
        (**self).insert_product(name).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list_products().await
    }

    async fn product_exists(&self, name: &ProductName) -> Result<bool, StoreError> {
        (**self).product_exists(name).await
    }

    async fn append_movement(&self, movement: NewMovement) -> Result<MovementRecord, StoreError> {
        (**self).append_movement(movement).await
    }

    async fn list_movements(&self, direction: Direction) -> Result<Vec<MovementRecord>, StoreError> {
        (**self).list_movements(direction).await
    }

    async fn snapshot(&self) -> Result<LedgerSnapshot, StoreError> {
        (**self).snapshot().await
    }
}
