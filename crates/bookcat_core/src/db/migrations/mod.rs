//! Embedded schema migrations for the book catalog.
//!
//! # Responsibility
//! - Keep the ordered list of schema steps compiled into the binary.
//! - Bring a connection up to the newest known schema in one transaction.
//!
//! # Invariants
//! - Step versions increase strictly.
//! - `PRAGMA user_version` always names the last applied step.
//!
//! # See also
//! - `0001_books.sql` for the book table shape and its CHECK constraints.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "books",
    sql: include_str!("0001_books.sql"),
}];

/// Returns the newest schema version this binary can produce.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the schema version recorded on `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Applies every step newer than the connection's recorded version.
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the database was written by a
///   newer binary.
/// - [`DbError::Sqlite`] when any step fails; no partial step is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = schema_version(conn)?;
    let target = latest_version();

    if from_version > target {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: target,
        });
    }
    if from_version == target {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in MIGRATIONS.iter().filter(|step| step.version > from_version) {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=applied version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from_version, target
    );
    Ok(())
}
