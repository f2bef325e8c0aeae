//! Grocery database file: connection setup and `grocery_items` schema.
//!
//! A connection handed out by [`open_db`] or [`open_db_in_memory`] already
//! carries the newest `grocery_items` schema this build knows, so item stores
//! can be built on it directly. The schema generation lives in
//! `PRAGMA user_version`; a file stamped by a newer build is refused rather
//! than downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or upgrading the grocery database.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected a pragma, schema statement or query.
    Sqlite(rusqlite::Error),
    /// The file was written by a build with a newer item schema.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "grocery database error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "grocery list was saved with schema v{db_version}, this build reads up to v{latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
