//! Shared test utilities for the mess ledger.
//!
//! Helpers for setting up test databases and ledger stores over the various
//! blob store backends.

use crate::{
    core::{
        blob::{BlobStore, MemoryBlobStore},
        store::LedgerStore,
    },
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Blob key used by every test store.
pub const TEST_KEY: &str = "messData";

/// Installs a tracing subscriber that writes through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// An empty ledger over an in-memory blob store.
pub async fn setup_memory_store() -> LedgerStore<MemoryBlobStore> {
    init_test_tracing();
    let (store, _) = LedgerStore::load(MemoryBlobStore::new(), TEST_KEY).await;
    store
}

/// Reloads a store from whatever it last saved.
pub async fn reload<S: BlobStore>(store: LedgerStore<S>) -> LedgerStore<S> {
    let key = store.key().to_string();
    let (reloaded, _) = LedgerStore::load(store.into_blob_store(), &key).await;
    reloaded
}

/// Blob store that serves a fixed blob and refuses every write.
#[derive(Debug, Default)]
pub struct FailingBlobStore {
    blob: Option<String>,
    fail_reads: bool,
}

impl FailingBlobStore {
    /// A store that serves `blob` but refuses writes.
    pub fn with_blob(blob: &str) -> Self {
        Self {
            blob: Some(blob.to_string()),
            fail_reads: false,
        }
    }

    /// A store whose reads fail too.
    pub fn unreadable() -> Self {
        Self {
            blob: None,
            fail_reads: true,
        }
    }
}

impl BlobStore for FailingBlobStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(Error::Io(std::io::Error::other("simulated read failure")));
        }
        Ok(self.blob.clone())
    }

    async fn put(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Io(std::io::Error::other("simulated write failure")))
    }
}

/// A ledger seeded with `(roll_no, name)` students whose saves always fail.
pub async fn setup_failing_store(students: &[(&str, &str)]) -> LedgerStore<FailingBlobStore> {
    init_test_tracing();
    let entries: Vec<serde_json::Value> = students
        .iter()
        .map(|(roll_no, name)| serde_json::json!({ "roll_no": roll_no, "name": name }))
        .collect();
    let blobs = FailingBlobStore::with_blob(&serde_json::Value::Array(entries).to_string());
    let (store, _) = LedgerStore::load(blobs, TEST_KEY).await;
    store
}

/// In-memory blob store that counts writes.
#[derive(Debug, Default)]
pub struct CountingBlobStore {
    inner: MemoryBlobStore,
    /// Number of successful `put` calls
    pub writes: usize,
}

impl BlobStore for CountingBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.inner.put(key, value).await?;
        self.writes += 1;
        Ok(())
    }
}

/// An empty ledger over a write-counting blob store.
pub async fn setup_counting_store() -> LedgerStore<CountingBlobStore> {
    init_test_tracing();
    let (store, _) = LedgerStore::load(CountingBlobStore::default(), TEST_KEY).await;
    store
}
