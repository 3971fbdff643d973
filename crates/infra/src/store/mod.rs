//! Persistence boundary for the catalog and the ledger.
//!
//! Two interchangeable backends implement [`InventoryStore`]: an in-memory
//! store for tests/dev and a SQLite store for production. The services in
//! this crate take any of them by value (usually behind an `Arc`).

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

#[cfg(test)]
pub(crate) mod conformance;

pub use in_memory::InMemoryStore;
pub use r#trait::{InventoryStore, LedgerSnapshot, StoreError};
pub use sqlite::SqliteStore;
