//! Blob store backends.
//!
//! The ledger is persisted as one serialized value under a single key. The
//! `SQLite` backend keeps the value in the `ledger_blobs` table; the memory
//! backend is for headless use and tests.

use crate::{
    entities::{LedgerBlob, ledger_blob},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::debug;

/// A key-value store holding whole serialized values.
#[allow(async_fn_in_trait)]
pub trait BlobStore {
    /// Reads the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`. Either the new value is stored
    /// in full or the old one is left untouched.
    async fn put(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Blob store backed by the `ledger_blobs` table.
#[derive(Debug, Clone)]
pub struct SqliteBlobStore {
    db: DatabaseConnection,
}

impl SqliteBlobStore {
    /// Wraps an open connection. Tables must already exist
    /// (see [`create_tables`](crate::config::database::create_tables)).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl BlobStore for SqliteBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let blob = LedgerBlob::find()
            .filter(ledger_blob::Column::Key.eq(key))
            .one(&self.db)
            .await?;
        Ok(blob.map(|b| b.value))
    }

    async fn put(&mut self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().naive_utc();

        // Lookup and write share one transaction so no partial write is visible
        let txn = self.db.begin().await?;

        let existing = LedgerBlob::find()
            .filter(ledger_blob::Column::Key.eq(key))
            .one(&txn)
            .await?;

        if let Some(blob) = existing {
            let mut active_model: ledger_blob::ActiveModel = blob.into();
            active_model.value = Set(value.to_string());
            active_model.updated_at = Set(now);
            active_model.update(&txn).await?;
        } else {
            let new_blob = ledger_blob::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(now),
                ..Default::default()
            };
            new_blob.insert(&txn).await?;
        }

        txn.commit().await?;
        debug!("Wrote {} bytes to blob '{}'", value.len(), key);
        Ok(())
    }
}

/// Blob store kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    slots: HashMap<String, String>,
}

impl MemoryBlobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one slot already filled.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.to_string(), value.to_string());
        Self { slots }
    }

    /// The raw value under `key`, without going through the async interface.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    async fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_sqlite_get_missing_key() -> Result<()> {
        let store = SqliteBlobStore::new(setup_test_db().await?);
        assert!(store.get("messData").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_sqlite_put_then_get() -> Result<()> {
        let mut store = SqliteBlobStore::new(setup_test_db().await?);
        store.put("messData", "[]").await?;
        assert_eq!(store.get("messData").await?, Some("[]".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_sqlite_put_replaces_existing_value() -> Result<()> {
        let mut store = SqliteBlobStore::new(setup_test_db().await?);
        store.put("messData", "[1]").await?;
        store.put("messData", "[2]").await?;
        store.put("other", "x").await?;

        assert_eq!(store.get("messData").await?, Some("[2]".to_string()));

        // Verify only one row exists for the key
        let count = LedgerBlob::find()
            .filter(ledger_blob::Column::Key.eq("messData"))
            .count(store.connection())
            .await?;
        assert_eq!(count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() -> Result<()> {
        let mut store = MemoryBlobStore::new();
        assert!(store.get("k").await?.is_none());
        store.put("k", "v1").await?;
        store.put("k", "v2").await?;
        assert_eq!(store.get("k").await?, Some("v2".to_string()));
        assert_eq!(store.peek("k"), Some("v2"));
        Ok(())
    }
}
