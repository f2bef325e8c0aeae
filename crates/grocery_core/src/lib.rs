//! Core domain logic for the grocery list.
//! This crate is the single source of truth for list invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{normalize_item_name, GroceryItem, ItemId, ItemValidationError};
pub use repo::item_repo::{ItemStore, SqliteItemStore, StoreError, StoreResult};
pub use repo::memory_store::MemoryItemStore;
pub use search::filter::{filter_items, SearchMode};
pub use service::grocery_list::{
    EmptyState, GroceryList, GroceryListError, GroceryListResult, ListView, RenderSink,
    SearchOutcome,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
