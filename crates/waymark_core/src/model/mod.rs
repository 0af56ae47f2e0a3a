//! Domain model for saved places and offline map regions.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep validation and normalization rules next to the shapes they guard.
//!
//! # Invariants
//! - Every saved place is identified by a stable opaque string id.
//! - Model types carry no storage concerns; persistence lives behind
//!   [`crate::store::CollectionStore`].

pub mod place;
pub mod region;
