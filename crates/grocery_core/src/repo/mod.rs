//! Store adapter contracts and implementations.
//!
//! # Responsibility
//! - Define the CRUD-by-identity contract the state manager consumes.
//! - Isolate SQLite query details from list orchestration.
//!
//! # Invariants
//! - Mutations are staged until `commit()`; `rollback()` discards them.
//! - Stores never enforce name uniqueness.
//! - Update/delete of an unknown identity reports `NotFound`.

pub mod item_repo;
pub mod memory_store;
