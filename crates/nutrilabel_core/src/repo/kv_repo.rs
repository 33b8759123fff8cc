//! Durable key-value storage contract and SQLite implementation.
//!
//! # Responsibility
//! - Store opaque string blobs under string keys.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Keys are non-blank.
//! - `set_item` replaces the whole value; there is no partial update.
//! - `remove_item` on a missing key is a no-op.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Transport-level storage failure.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidKey(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid storage key `{key}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Snapshot persistence failure: storage transport or blob encoding.
#[derive(Debug)]
pub enum PersistenceError {
    Storage(RepoError),
    /// Stored blob could not be decoded.
    Corrupt(String),
    Encode(serde_json::Error),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "storage unavailable: {err}"),
            Self::Corrupt(details) => write!(f, "corrupt stored data: {details}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Corrupt(_) => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<RepoError> for PersistenceError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Key-value storage interface mirrored by snapshot repositories.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> RepoResult<()>;
    fn remove_item(&self, key: &str) -> RepoResult<()>;
    /// All keys, sorted ascending.
    fn list_keys(&self) -> RepoResult<Vec<String>>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> RepoResult<()> {
        (**self).remove_item(key)
    }

    fn list_keys(&self) -> RepoResult<Vec<String>> {
        (**self).list_keys()
    }
}

/// SQLite-backed key-value storage over the `kv_store` table.
#[derive(Clone, Copy)]
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>> {
        let key = checked_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = checked_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> RepoResult<()> {
        let key = checked_key(key)?;
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn list_keys(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_store ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

/// Debug summary of what is held in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageInfo {
    pub keys: Vec<String>,
    /// Sum of stored value lengths in bytes.
    pub total_bytes: usize,
}

/// Collects key names and an approximate payload size.
pub fn storage_info(store: &impl KeyValueStore) -> RepoResult<StorageInfo> {
    let keys = store.list_keys()?;
    let mut total_bytes = 0;
    for key in &keys {
        if let Some(value) = store.get_item(key)? {
            total_bytes += value.len();
        }
    }
    Ok(StorageInfo { keys, total_bytes })
}

fn checked_key(key: &str) -> RepoResult<&str> {
    if key.trim().is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(key)
}
