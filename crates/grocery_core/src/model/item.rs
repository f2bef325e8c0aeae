//! Grocery item domain model.
//!
//! # Responsibility
//! - Define the `GroceryItem` record and its stable identity.
//! - Normalize user-entered names into their stored display form.
//!
//! # Invariants
//! - `id` is assigned once by the store and never changes.
//! - A stored `name` is trimmed, non-empty and title-cased.
//! - `quantity` is free-form text kept verbatim; empty means "no quantity".

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid word regex"));

/// Stable identifier for a grocery item.
pub type ItemId = Uuid;

/// Input rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    /// Name is empty or whitespace-only.
    EmptyName,
    /// Another item already uses this name (case-insensitive).
    DuplicateName(String),
}

impl ItemValidationError {
    /// Short stable code shown to the presentation layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty name",
            Self::DuplicateName(_) => "duplicate",
        }
    }
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "empty name: an item needs a name"),
            Self::DuplicateName(name) => {
                write!(f, "duplicate: `{name}` already exists in the list")
            }
        }
    }
}

impl Error for ItemValidationError {}

/// One entry of the grocery list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: ItemId,
    /// Title-cased display name.
    pub name: String,
    /// Free-form amount such as `2 lbs`. May be empty.
    pub quantity: String,
}

impl GroceryItem {
    pub fn new(id: ItemId, name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            quantity: quantity.into(),
        }
    }

    /// Returns whether a quantity was entered for this item.
    pub fn has_quantity(&self) -> bool {
        !self.quantity.is_empty()
    }

    /// Detail line for list rows, `None` when there is no quantity.
    pub fn quantity_label(&self) -> Option<String> {
        if self.has_quantity() {
            Some(format!("Quantity: {}", self.quantity))
        } else {
            None
        }
    }

    /// Case-insensitive name comparison used by the uniqueness check.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Trims and title-cases a user-entered item name.
///
/// Every run of letters/digits gets its first character upper-cased and the
/// rest lower-cased; separators are kept as typed.
///
/// # Errors
/// - `ItemValidationError::EmptyName` when the trimmed name is empty.
pub fn normalize_item_name(raw: &str) -> Result<String, ItemValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ItemValidationError::EmptyName);
    }

    let titled = WORD_RE.replace_all(trimmed, |caps: &Captures<'_>| capitalize_word(&caps[0]));
    Ok(titled.into_owned())
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}
