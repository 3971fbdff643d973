//! Infrastructure layer: persistence backends, the catalog/ledger/balance
//! services built on them, and the spreadsheet bulk import.

pub mod balances;
pub mod catalog;
pub mod import;
pub mod ledger;
pub mod store;

pub use balances::BalanceAggregator;
pub use catalog::Catalog;
pub use ledger::Ledger;
pub use store::{InMemoryStore, InventoryStore, LedgerSnapshot, SqliteStore, StoreError};
