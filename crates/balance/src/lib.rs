//! Balance derivation.
//!
//! Balances are never stored: they are a pure fold over the catalog and the
//! ledger, recomputed on every read.

pub mod balance;

pub use balance::{Balance, compute_balance, compute_balances};
