//! Grocery list state manager.
//!
//! # Responsibility
//! - Own the canonical item collection and the visible (filtered) subset.
//! - Validate add/edit input, reject duplicate names, drive the store's unit
//!   of work and signal the presentation layer after every state change.
//!
//! # Invariants
//! - `canonical` always mirrors the last successful `fetch_all()`.
//! - `visible == filter_items(canonical, query)` after every public call.
//! - A rejected command or a persistence failure leaves `canonical`,
//!   `visible` and the store unchanged and emits no render signal.
//! - `NotFound` from the store triggers a resynchronizing reload.
//! - Mutations address items by identity, never by position in `visible`.

use crate::model::item::{normalize_item_name, GroceryItem, ItemId, ItemValidationError};
use crate::repo::item_repo::{ItemStore, StoreError, StoreResult};
use crate::search::filter::{filter_items, SearchMode};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GroceryListResult<T> = Result<T, GroceryListError>;

/// Command failure reported to the presentation layer.
#[derive(Debug)]
pub enum GroceryListError {
    /// Input needs user correction; nothing was written.
    Validation(ItemValidationError),
    /// Store has no record with this identity. The list was resynchronized.
    NotFound(ItemId),
    /// Store failed to read or write; staged work was discarded.
    Persistence(StoreError),
}

impl Display for GroceryListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "grocery item not found: {id}"),
            Self::Persistence(err) => write!(f, "grocery list could not be saved: {err}"),
        }
    }
}

impl Error for GroceryListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<ItemValidationError> for GroceryListError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for GroceryListError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Persistence(other),
        }
    }
}

/// Why the visible list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// The list itself has no items.
    NoItems,
    /// Items exist but the active query hides all of them.
    NoMatches,
}

/// Render payload handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListView {
    /// Items to display, in canonical order.
    pub items: Vec<GroceryItem>,
    pub mode: SearchMode,
    /// Active query; empty when search is inactive.
    pub query: String,
    /// Size of the canonical collection.
    pub total_count: usize,
    /// Search is only offered once the list has items.
    pub search_available: bool,
}

impl ListView {
    /// Returns which empty-list guidance to show, if any.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.total_count == 0 {
            Some(EmptyState::NoItems)
        } else if self.items.is_empty() {
            Some(EmptyState::NoMatches)
        } else {
            None
        }
    }
}

/// Outcome of confirming a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Filter stays applied with `count` visible items.
    Results { count: usize },
    /// Nothing matched `query`; the list was restored to inactive search.
    NotFound { query: String },
}

/// Receives "render now" signals.
pub trait RenderSink {
    fn render(&mut self, view: &ListView);
}

impl<F> RenderSink for F
where
    F: FnMut(&ListView),
{
    fn render(&mut self, view: &ListView) {
        self(view)
    }
}

/// List/search state manager over an injected item store.
pub struct GroceryList<S: ItemStore> {
    store: S,
    canonical: Vec<GroceryItem>,
    visible: Vec<GroceryItem>,
    query: String,
    sinks: Vec<Box<dyn RenderSink>>,
}

impl<S: ItemStore> GroceryList<S> {
    /// Creates an empty manager. Call [`GroceryList::reload`] before use.
    pub fn new(store: S) -> Self {
        Self {
            store,
            canonical: Vec::new(),
            visible: Vec::new(),
            query: String::new(),
            sinks: Vec::new(),
        }
    }

    /// Creates a manager and performs the startup reload.
    pub fn open(store: S) -> GroceryListResult<Self> {
        let mut list = Self::new(store);
        list.reload()?;
        Ok(list)
    }

    /// Registers a render sink; it receives every subsequent signal.
    pub fn subscribe(&mut self, sink: impl RenderSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// Items as last fetched from the store.
    pub fn canonical(&self) -> &[GroceryItem] {
        &self.canonical
    }

    /// Items currently shown.
    pub fn visible(&self) -> &[GroceryItem] {
        &self.visible
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> SearchMode {
        SearchMode::classify(&self.query, self.visible.len())
    }

    /// Looks up one item by identity, e.g. to prefill an edit form.
    pub fn item(&self, id: ItemId) -> Option<&GroceryItem> {
        self.canonical.iter().find(|item| item.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hands the store back, e.g. to reopen the list over it later.
    ///
    /// Every successful command has already committed, so nothing is staged.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Snapshot of the current render payload.
    pub fn view(&self) -> ListView {
        ListView {
            items: self.visible.clone(),
            mode: self.mode(),
            query: self.query.clone(),
            total_count: self.canonical.len(),
            search_available: !self.canonical.is_empty(),
        }
    }

    /// Refetches the canonical collection and recomputes `visible`.
    ///
    /// # Errors
    /// - `Persistence` when the store read fails; state is left unchanged.
    pub fn reload(&mut self) -> GroceryListResult<()> {
        self.refresh()?;
        self.notify();
        Ok(())
    }

    /// Adds a new item and returns its identity.
    ///
    /// The name is trimmed and title-cased; the quantity is kept verbatim.
    ///
    /// # Errors
    /// - `Validation(EmptyName)` for blank names.
    /// - `Validation(DuplicateName)` when the name already exists, ignoring case.
    /// - `Persistence` when the store write or commit fails.
    pub fn add_item(&mut self, name: &str, quantity: &str) -> GroceryListResult<ItemId> {
        let name = self.validated_name(name, None)?;
        let id = self.apply("item_add", |store| store.create(&name, quantity))?;
        self.reload()?;

        info!(
            "event=item_add module=service status=ok item_id={id} total={}",
            self.canonical.len()
        );
        Ok(id)
    }

    /// Replaces name and quantity of an existing item.
    ///
    /// Keeping the item's own name (in any casing) is not a duplicate.
    ///
    /// # Errors
    /// - `Validation` as for [`GroceryList::add_item`].
    /// - `NotFound` when the store has no such item; the list is reloaded.
    /// - `Persistence` when the store write or commit fails.
    pub fn edit_item(&mut self, id: ItemId, name: &str, quantity: &str) -> GroceryListResult<()> {
        let name = self.validated_name(name, Some(id))?;
        self.apply("item_edit", |store| store.update(id, &name, quantity))?;
        self.reload()?;

        info!("event=item_edit module=service status=ok item_id={id}");
        Ok(())
    }

    /// Deletes an item by identity, whether or not it is currently visible.
    ///
    /// When an active search is left with no matches the list returns to the
    /// inactive state.
    ///
    /// # Errors
    /// - `NotFound` when the store has no such item; the list is reloaded.
    /// - `Persistence` when the store write or commit fails.
    pub fn delete_item(&mut self, id: ItemId) -> GroceryListResult<()> {
        self.apply("item_delete", |store| store.delete(id))?;
        self.refresh()?;

        if !self.query.is_empty() && self.visible.is_empty() {
            debug!("event=search_reset module=service reason=delete_cleared_results");
            self.query.clear();
            self.recompute_visible();
        }
        self.notify();

        info!(
            "event=item_delete module=service status=ok item_id={id} total={}",
            self.canonical.len()
        );
        Ok(())
    }

    /// Sets the search query and refilters without touching the store.
    ///
    /// An empty query deactivates search.
    pub fn set_search_query(&mut self, query: impl Into<String>) -> SearchMode {
        self.query = query.into();
        self.recompute_visible();
        self.notify();

        let mode = self.mode();
        debug!(
            "event=search_update module=service mode={mode:?} visible={}",
            self.visible.len()
        );
        mode
    }

    /// Confirms the current search.
    ///
    /// A search that matched nothing is reported and reset to inactive.
    pub fn submit_search(&mut self) -> SearchOutcome {
        if self.mode() != SearchMode::SearchEmpty {
            return SearchOutcome::Results {
                count: self.visible.len(),
            };
        }

        let query = std::mem::take(&mut self.query);
        self.recompute_visible();
        self.notify();
        SearchOutcome::NotFound { query }
    }

    /// Cancels search from the search bar.
    pub fn cancel_search(&mut self) {
        self.restore_inactive();
    }

    /// Clears the query and shows the full list again.
    pub fn restore_inactive(&mut self) {
        self.query.clear();
        self.recompute_visible();
        self.notify();
    }

    fn validated_name(
        &self,
        raw: &str,
        editing: Option<ItemId>,
    ) -> Result<String, ItemValidationError> {
        let name = normalize_item_name(raw)?;
        let taken = self
            .canonical
            .iter()
            .any(|item| Some(item.id) != editing && item.has_name(&name));

        if taken {
            debug!("event=item_validate module=service status=rejected reason=duplicate");
            return Err(ItemValidationError::DuplicateName(name));
        }
        Ok(name)
    }

    /// Runs one mutation plus commit as a unit of work.
    fn apply<T>(
        &mut self,
        event: &'static str,
        mutation: impl FnOnce(&mut S) -> StoreResult<T>,
    ) -> GroceryListResult<T> {
        let result = match mutation(&mut self.store) {
            Ok(value) => self.store.commit().map(|()| value),
            Err(err) => Err(err),
        };

        let err = match result {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if let Err(rollback_err) = self.store.rollback() {
            error!("event={event} module=service status=error error_code=rollback_failed error={rollback_err}");
        }

        match err {
            StoreError::NotFound(id) => {
                warn!("event={event} module=service status=error error_code=not_found item_id={id}");
                if let Err(reload_err) = self.reload() {
                    error!("event={event} module=service status=error error_code=resync_failed error={reload_err}");
                }
                Err(GroceryListError::NotFound(id))
            }
            other => {
                error!("event={event} module=service status=error error_code=persistence error={other}");
                Err(GroceryListError::Persistence(other))
            }
        }
    }

    fn refresh(&mut self) -> GroceryListResult<()> {
        let items = self.store.fetch_all()?;
        self.canonical = items;
        self.recompute_visible();
        Ok(())
    }

    fn recompute_visible(&mut self) {
        self.visible = filter_items(&self.canonical, &self.query);
    }

    fn notify(&mut self) {
        if self.sinks.is_empty() {
            return;
        }

        let view = self.view();
        for sink in &mut self.sinks {
            sink.render(&view);
        }
    }
}
