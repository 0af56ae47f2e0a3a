//! SQLite-backed collection store.
//!
//! # Responsibility
//! - Persist one JSON document per collection key in the `collections`
//!   table.
//! - Own the connection so the store can be shared across registries and
//!   threads.
//!
//! # Invariants
//! - Construction validates the migrated schema; operations assume it.
//! - The connection lock is held only for the duration of one statement.

use super::{CollectionStore, StoreError, StoreResult};
use crate::db::migrations::latest_version;
use crate::db::{open_db, open_db_in_memory};
use log::{debug, error, warn};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Collection store persisting documents in a SQLite `collections` table.
#[derive(Debug)]
pub struct SqliteCollectionStore {
    conn: Mutex<Connection>,
}

impl SqliteCollectionStore {
    /// Wraps a migrated connection after validating the expected schema.
    ///
    /// # Errors
    /// - [`StoreError::UninitializedConnection`] when migrations have not
    ///   run on this connection.
    /// - [`StoreError::MissingRequiredTable`] /
    ///   [`StoreError::MissingRequiredColumn`] when the schema does not
    ///   match this build.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_store_connection_ready(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a database file, migrates it and wraps it as a store.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a fresh in-memory store; every call starts empty.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    fn read_raw(&self, key: &str) -> rusqlite::Result<Option<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT value FROM collections WHERE key = ?1;")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }
}

impl CollectionStore for SqliteCollectionStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.read_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=store_load module=store status=absent key={key}");
                return None;
            }
            Err(err) => {
                error!("event=store_load module=store status=error key={key} error={err}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(
                    "event=store_load module=store status=ok key={key} bytes={}",
                    raw.len()
                );
                Some(value)
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=corrupt key={key} bytes={} error={err}",
                    raw.len()
                );
                None
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let payload = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;

        let conn = self.conn.lock();
        match conn.execute(
            "INSERT INTO collections (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = excluded.updated_at;",
            params![key, payload],
        ) {
            Ok(_) => {
                debug!(
                    "event=store_save module=store status=ok key={key} bytes={}",
                    payload.len()
                );
                Ok(())
            }
            Err(err) => {
                error!("event=store_save module=store status=error key={key} error={err}");
                Err(err.into())
            }
        }
    }
}

fn ensure_store_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "collections")? {
        return Err(StoreError::MissingRequiredTable("collections"));
    }

    for column in ["key", "value", "updated_at"] {
        if !table_has_column(conn, "collections", column)? {
            return Err(StoreError::MissingRequiredColumn {
                table: "collections",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
