//! Shared domain building blocks: the error model and typed ids.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model every layer reports through, and the store-assigned
//! identifiers of products and ledger records.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{ProductId, RecordId};
