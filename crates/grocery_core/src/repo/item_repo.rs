//! Item store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/fetch/update/delete over canonical `grocery_items` rows.
//! - Stage writes in a unit of work that callers close with `commit()`.
//!
//! # Invariants
//! - Identity is generated here on create and never rewritten.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Only transactions opened by this store are committed or rolled back.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::item::{GroceryItem, ItemId};
use log::{debug, warn};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ITEMS_TABLE: &str = "grocery_items";
const REQUIRED_COLUMNS: &[&str] = &["uuid", "name", "quantity", "created_at", "updated_at"];

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer error for item persistence.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    NotFound(ItemId),
    /// Backend refused a write or flush without a SQLite-level cause.
    WriteFailed(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "grocery item not found: {id}"),
            Self::WriteFailed(message) => write!(f, "store write failed: {message}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted grocery item data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record store consumed by the list state manager.
///
/// Mutations are staged; callers must `commit()` after each logical
/// operation and `rollback()` when any step of it fails.
pub trait ItemStore {
    /// Inserts a new record and returns its store-assigned identity.
    fn create(&mut self, name: &str, quantity: &str) -> StoreResult<ItemId>;
    /// Returns every record in store-defined display order.
    fn fetch_all(&self) -> StoreResult<Vec<GroceryItem>>;
    /// Overwrites name and quantity of an existing record.
    fn update(&mut self, id: ItemId, name: &str, quantity: &str) -> StoreResult<()>;
    /// Removes a record.
    fn delete(&mut self, id: ItemId) -> StoreResult<()>;
    /// Flushes staged mutations.
    fn commit(&mut self) -> StoreResult<()>;
    /// Discards staged mutations.
    fn rollback(&mut self) -> StoreResult<()>;
}

/// SQLite-backed item store.
pub struct SqliteItemStore<'conn> {
    conn: &'conn Connection,
    staged: bool,
}

impl<'conn> SqliteItemStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema does
    ///   not carry the item table shape.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self {
            conn,
            staged: false,
        })
    }

    /// Returns whether uncommitted mutations are pending.
    pub fn has_staged_changes(&self) -> bool {
        self.staged
    }

    fn begin_if_needed(&mut self) -> StoreResult<()> {
        if !self.staged {
            self.conn.execute_batch("BEGIN IMMEDIATE;")?;
            self.staged = true;
        }
        Ok(())
    }
}

impl ItemStore for SqliteItemStore<'_> {
    fn create(&mut self, name: &str, quantity: &str) -> StoreResult<ItemId> {
        self.begin_if_needed()?;

        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO grocery_items (uuid, name, quantity) VALUES (?1, ?2, ?3);",
            params![id.to_string(), name, quantity],
        )?;

        Ok(id)
    }

    fn fetch_all(&self) -> StoreResult<Vec<GroceryItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, quantity
             FROM grocery_items
             ORDER BY created_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn update(&mut self, id: ItemId, name: &str, quantity: &str) -> StoreResult<()> {
        self.begin_if_needed()?;

        let changed = self.conn.execute(
            "UPDATE grocery_items
             SET
                name = ?1,
                quantity = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?3;",
            params![name, quantity, id.to_string()],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    fn delete(&mut self, id: ItemId) -> StoreResult<()> {
        self.begin_if_needed()?;

        let changed = self
            .conn
            .execute("DELETE FROM grocery_items WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        if !self.staged {
            return Ok(());
        }

        self.conn.execute_batch("COMMIT;")?;
        self.staged = false;
        debug!("event=store_commit module=repo status=ok");
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        if !self.staged {
            return Ok(());
        }

        self.staged = false;
        // SQLite may already have rolled back on its own after some failures.
        if self.conn.is_autocommit() {
            return Ok(());
        }

        self.conn.execute_batch("ROLLBACK;")?;
        debug!("event=store_rollback module=repo status=ok");
        Ok(())
    }
}

impl Drop for SqliteItemStore<'_> {
    fn drop(&mut self) {
        if !self.staged {
            return;
        }

        warn!("event=store_drop module=repo status=warn reason=uncommitted_changes_discarded");
        if let Err(err) = self.rollback() {
            warn!("event=store_drop module=repo status=error error={err}");
        }
    }
}

fn ensure_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [ITEMS_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(StoreError::MissingRequiredTable(ITEMS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([ITEMS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for &column in REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name.as_str() == column) {
            return Err(StoreError::MissingRequiredColumn {
                table: ITEMS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_item_row(row: &Row<'_>) -> StoreResult<GroceryItem> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!(
            "invalid uuid value `{uuid_text}` in grocery_items.uuid"
        ))
    })?;

    let name: String = row.get("name")?;
    if name.trim().is_empty() {
        return Err(StoreError::InvalidData(format!(
            "blank name for item {id} in grocery_items.name"
        )));
    }

    Ok(GroceryItem {
        id,
        name,
        quantity: row.get("quantity")?,
    })
}
