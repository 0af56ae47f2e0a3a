//! Collection registries: in-memory owners of persisted collections.
//!
//! # Responsibility
//! - Load each persisted collection once and serve reads from memory.
//! - Persist every mutation before it becomes visible to readers.
//!
//! # Invariants
//! - The in-memory state always equals the last durably persisted state;
//!   failed saves roll the mirror back.
//! - Each registry owns exactly one well-known collection key.
//!
//! # See also
//! - [`crate::store::CollectionStore`] for the persistence contract.

pub mod offline;
pub mod places;
