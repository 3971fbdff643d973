//! Ledger domain module.
//!
//! This crate contains the rules for inward/outward movement records,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage). Appending and id assignment belong to the store.

pub mod movement;
pub mod ordering;

pub use movement::{Direction, MovementDraft, MovementRecord, NewMovement};
pub use ordering::{newest_first, sort_newest_first};
