//! Persisted collection storage boundary.
//!
//! # Responsibility
//! - Define the contract for durable JSON persistence of whole named
//!   collections.
//! - Isolate SQLite and serde_json details from registry logic.
//!
//! # Invariants
//! - `load` never fails: absent or unreadable data degrades to `None` and
//!   is logged, so a corrupt document can not brick startup.
//! - `save` replaces the whole document under a key, or leaves the durable
//!   state untouched and reports the error.
//!
//! # See also
//! - [`crate::registry`] for the collection owners built on this trait.

use crate::db::DbError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod sqlite;

pub use sqlite::SqliteCollectionStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for collection persistence operations.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Collection value could not be serialized to JSON.
    Serialize {
        key: String,
        source: serde_json::Error,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize { key, source } => {
                write!(f, "failed to serialize collection `{key}`: {source}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "collection store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "collection store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "collection store requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize { source, .. } => Some(source),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
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

/// Contract for durable whole-collection persistence.
///
/// Collections are stored as one JSON document per well-known key; partial
/// updates are not part of the contract.
pub trait CollectionStore {
    /// Loads and deserializes the document persisted under `key`.
    ///
    /// Returns `None` when the key is absent or the stored document can not
    /// be read or parsed; failures are logged, never surfaced, so callers
    /// always start from a usable (possibly empty) state.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T>;

    /// Serializes `value` and replaces the document under `key`.
    ///
    /// The previous durable document stays intact when this fails.
    fn save<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()>;
}

impl<S: CollectionStore> CollectionStore for Arc<S> {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        S::load(self, key)
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        S::save(self, key, value)
    }
}
