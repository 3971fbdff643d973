//! Catalog domain module.
//!
//! This crate contains the rules for product identity, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;

pub use product::{Product, ProductName, sort_names};
