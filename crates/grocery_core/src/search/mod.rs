//! List search.
//!
//! # Responsibility
//! - Filter the canonical collection by case-insensitive name substring.
//! - Classify the search state shown by the presentation layer.
//!
//! # Invariants
//! - Filtering never reorders items and never touches the store.

pub mod filter;
