//! SQLite connection and schema
//!
//! One shared connection, guarded by a mutex, carries every read and write.
//! The connection is the single synchronization point for inventory
//! mutations, so per-item operations are linearizable.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared database handle passed into each store at construction time.
pub type Db = Arc<Mutex<Connection>>;

const SCHEMA_SQL: &str = r#"
-- Enable WAL mode for better concurrent access
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'USER'
);

CREATE TABLE IF NOT EXISTS sweets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    price REAL NOT NULL,
    quantity INTEGER NOT NULL
);
"#;

/// Open (or create) the database and apply the schema.
pub fn open(db_path: &str) -> Result<Db> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_NO_MUTEX; // We handle our own locking

    let conn = Connection::open_with_flags(db_path, flags)
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    conn.execute_batch(SCHEMA_SQL)
        .context("Failed to initialize database schema")?;

    // Verify WAL mode is active
    let journal_mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap_or_default();

    if journal_mode.to_lowercase() != "wal" {
        warn!("WAL mode not active, journal_mode = {}", journal_mode);
    }

    info!("📊 Database initialized at: {}", db_path);

    Ok(Arc::new(Mutex::new(conn)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_open_creates_schema() {
        let temp_file = NamedTempFile::new().unwrap();
        let db = open(temp_file.path().to_str().unwrap()).unwrap();

        let conn = db.lock();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"users".to_string()));
        assert!(tables.contains(&"sweets".to_string()));
    }

    #[test]
    fn test_open_is_idempotent() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        drop(open(&path).unwrap());
        // Re-opening an existing database must not fail on CREATE TABLE.
        open(&path).unwrap();
    }
}
