//! Substring filter over grocery items.

use crate::model::item::GroceryItem;
use serde::{Deserialize, Serialize};

/// Search state of the list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// No query; every item is visible.
    Inactive,
    /// Query is set and matches at least one item.
    Searching,
    /// Query is set and matches nothing.
    SearchEmpty,
}

impl SearchMode {
    /// Derives the mode from the active query and the filtered result size.
    pub fn classify(query: &str, visible_len: usize) -> Self {
        if query.is_empty() {
            Self::Inactive
        } else if visible_len == 0 {
            Self::SearchEmpty
        } else {
            Self::Searching
        }
    }
}

/// Returns items whose name contains `query`, ignoring case.
///
/// Relative order of `items` is preserved. An empty query is the inactive
/// search and returns every item.
pub fn filter_items(items: &[GroceryItem], query: &str) -> Vec<GroceryItem> {
    if query.is_empty() {
        return items.to_vec();
    }

    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
