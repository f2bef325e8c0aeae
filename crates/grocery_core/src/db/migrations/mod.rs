//! Schema steps for the grocery item table.
//!
//! Each step is one SQL script under this directory. Steps run oldest first
//! inside a single transaction, and each one stamps its number into
//! `PRAGMA user_version` so a half-upgraded file never becomes visible.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

/// One numbered schema script.
#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

/// Ordered by `version`, no gaps.
const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "grocery_items",
    sql: include_str!("0001_init.sql"),
}];

/// Newest `grocery_items` schema generation this build can read and write.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings the grocery schema up to [`latest_version`].
///
/// A file that is already current is left untouched.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the list was saved by a newer
///   build.
/// - `DbError::Sqlite` when a schema script fails; the file keeps its
///   previous version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let to_version = latest_version();

    if from_version > to_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: to_version,
        });
    }
    if from_version == to_version {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > from_version)
    {
        run_step(&tx, step)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from_version} to_version={to_version}");
    Ok(())
}

/// Schema generation stamped into the grocery file, `0` when fresh.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn run_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", step.version)?;
    debug!(
        "event=db_migrate_step module=db version={} name={}",
        step.version, step.name
    );
    Ok(())
}
