//! Grocery list domain model.
//!
//! # Responsibility
//! - Define the canonical item record shared by store and state manager.
//! - Own name normalization used by every write path.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId` assigned by the store.
//! - Item names are unique under case-insensitive comparison; the state
//!   manager enforces this at write time, the store does not.

pub mod item;
