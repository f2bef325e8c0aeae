//! In-process item store.
//!
//! Same staging contract as the SQLite store: writes land in a working copy
//! that `commit()` publishes and `rollback()` throws away. Useful for embedding
//! without a database file and for exercising failure paths.

use crate::model::item::{GroceryItem, ItemId};
use crate::repo::item_repo::{ItemStore, StoreError, StoreResult};
use uuid::Uuid;

/// Vector-backed `ItemStore` kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    committed: Vec<GroceryItem>,
    working: Option<Vec<GroceryItem>>,
    fail_next_commit: bool,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with already-committed items.
    pub fn with_items(items: Vec<GroceryItem>) -> Self {
        Self {
            committed: items,
            ..Self::default()
        }
    }

    /// Items visible to a reader that only sees flushed state.
    pub fn committed(&self) -> &[GroceryItem] {
        &self.committed
    }

    pub fn has_staged_changes(&self) -> bool {
        self.working.is_some()
    }

    /// Makes the next `commit()` fail with `StoreError::WriteFailed`.
    pub fn fail_next_commit(&mut self) {
        self.fail_next_commit = true;
    }

    fn working_mut(&mut self) -> &mut Vec<GroceryItem> {
        let committed = &self.committed;
        self.working.get_or_insert_with(|| committed.clone())
    }

    fn current(&self) -> &[GroceryItem] {
        self.working.as_deref().unwrap_or(&self.committed)
    }
}

impl ItemStore for MemoryItemStore {
    fn create(&mut self, name: &str, quantity: &str) -> StoreResult<ItemId> {
        let id = Uuid::new_v4();
        self.working_mut().push(GroceryItem::new(id, name, quantity));
        Ok(id)
    }

    fn fetch_all(&self) -> StoreResult<Vec<GroceryItem>> {
        Ok(self.current().to_vec())
    }

    fn update(&mut self, id: ItemId, name: &str, quantity: &str) -> StoreResult<()> {
        if !self.current().iter().any(|item| item.id == id) {
            return Err(StoreError::NotFound(id));
        }

        if let Some(item) = self.working_mut().iter_mut().find(|item| item.id == id) {
            item.name = name.to_string();
            item.quantity = quantity.to_string();
        }
        Ok(())
    }

    fn delete(&mut self, id: ItemId) -> StoreResult<()> {
        let Some(index) = self.current().iter().position(|item| item.id == id) else {
            return Err(StoreError::NotFound(id));
        };

        self.working_mut().remove(index);
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        if self.fail_next_commit {
            self.fail_next_commit = false;
            return Err(StoreError::WriteFailed(
                "memory store commit rejected".to_string(),
            ));
        }

        if let Some(working) = self.working.take() {
            self.committed = working;
        }
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        self.working = None;
        Ok(())
    }
}
