//! Database setup for [`SqliteStore`](crate::SqliteStore).
//!
//! The schema is a single `models` table keyed by model name (see
//! `migrations/`). Its version lives in SQLite's `user_version` pragma and
//! is brought up to date by `rusqlite_migration` every time a database is
//! opened, so a file written by an older build is upgraded in place.

use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};

use crate::error::StorageError;

/// Schema history of the `models` table, oldest first. Existing entries
/// must never be edited; a schema change is a new file appended here.
fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(include_str!("migrations/001_initial_schema.sql"))])
}

/// Opens (or creates) the model database at `path`, upgraded to the latest
/// schema.
pub fn open_database(path: &str) -> Result<Connection, StorageError> {
    let mut conn = Connection::open(path)?;
    configure_and_migrate(&mut conn)?;
    Ok(conn)
}

/// Opens a private in-memory model database, discarded on drop.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    let mut conn = Connection::open_in_memory()?;
    configure_and_migrate(&mut conn)?;
    Ok(conn)
}

fn configure_and_migrate(conn: &mut Connection) -> Result<(), StorageError> {
    // Readers in another process see the last committed save.
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    migrations()
        .to_latest(conn)
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_valid() {
        assert!(migrations().validate().is_ok());
    }

    #[test]
    fn reopening_a_database_keeps_its_schema_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.db");
        let path = path.to_str().unwrap();

        let version = |conn: &Connection| -> i64 {
            conn.query_row("PRAGMA user_version", [], |row| row.get(0))
                .unwrap()
        };
        let first = open_database(path).unwrap();
        assert_eq!(version(&first), 1);
        drop(first);
        assert_eq!(version(&open_database(path).unwrap()), 1);
    }

    #[test]
    fn in_memory_databases_have_the_models_table() {
        let conn = open_in_memory().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM models", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
