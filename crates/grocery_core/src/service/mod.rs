//! Core use-case services.
//!
//! # Responsibility
//! - Turn presentation commands into validated store operations.
//! - Keep presentation layers decoupled from storage details.

pub mod grocery_list;
