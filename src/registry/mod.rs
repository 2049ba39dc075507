//! File registry for FileShare.
//!
//! The registry is a flat key-value collection of [`FileRecord`]s keyed by id.
//! Storage engines plug in behind the [`RecordStore`] trait:
//! - [`MemoryStore`]: process-local map, optional record quota
//! - [`SqliteStore`]: SQLite table via sqlx
//!
//! Operations are independent of each other. There is no cross-operation
//! locking, so [`FileRegistry::increment_downloads`] can lose an increment
//! when two callers race on the same id.

mod memory;
mod record;
mod sqlite;

pub use memory::MemoryStore;
pub use record::{generate_file_id, FileRecord, FILE_ID_LENGTH};
pub use sqlite::SqliteStore;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{RegistryBackend, RegistryConfig};
use crate::db::Database;
use crate::{FileShareError, Result};

/// Storage engine behind the registry.
///
/// Every method may fail with [`FileShareError::StorageUnavailable`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short name of the backend, for logs.
    fn backend_name(&self) -> &'static str;

    /// Insert the record, or fully replace the one with the same id.
    async fn put(&self, record: &FileRecord) -> Result<()>;

    /// Fetch a record by id.
    async fn get(&self, id: &str) -> Result<Option<FileRecord>>;

    /// Fetch every record, in no particular order.
    async fn get_all(&self) -> Result<Vec<FileRecord>>;

    /// Remove a record. Removing an absent id succeeds.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Handle to the file registry.
#[derive(Clone)]
pub struct FileRegistry {
    store: Arc<dyn RecordStore>,
}

impl FileRegistry {
    /// Create a registry over the given store.
    pub fn new(store: impl RecordStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Create a registry backed by an unbounded in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Open the registry described by the configuration.
    pub async fn open(config: &RegistryConfig) -> Result<Self> {
        let registry = match config.backend {
            RegistryBackend::Memory => match config.max_records {
                Some(max) => Self::new(MemoryStore::with_capacity_limit(max)),
                None => Self::new(MemoryStore::new()),
            },
            RegistryBackend::Sqlite => {
                let db = Database::open(&config.path).await?;
                Self::new(SqliteStore::new(db))
            }
        };

        tracing::info!(backend = registry.backend_name(), "File registry ready");
        Ok(registry)
    }

    /// Name of the underlying backend.
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Insert or replace a record.
    pub async fn put(&self, record: &FileRecord) -> Result<()> {
        debug!(id = %record.id, "registry put");
        self.store.put(record).await
    }

    /// Get a record by id. `None` is a normal outcome.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<FileRecord>> {
        self.store.get(id).await
    }

    /// List all records in storage order.
    pub async fn list_all(&self) -> Result<Vec<FileRecord>> {
        self.store.get_all().await
    }

    /// List all records, most recently uploaded first.
    pub async fn list_recent(&self) -> Result<Vec<FileRecord>> {
        let mut records = self.store.get_all().await?;
        records.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records)
    }

    /// Delete a record. Deleting an absent id is a no-op.
    pub async fn delete(&self, id: &str) -> Result<()> {
        debug!(id, "registry delete");
        self.store.delete(id).await
    }

    /// Add one to the download counter and return the updated record.
    ///
    /// Read-modify-write without a lock: concurrent callers may undercount.
    pub async fn increment_downloads(&self, id: &str) -> Result<FileRecord> {
        let mut record = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| FileShareError::NotFound(format!("file {id}")))?;

        record.downloads = record.downloads.saturating_add(1);
        self.store.put(&record).await?;

        Ok(record)
    }
}

impl std::fmt::Debug for FileRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileRegistry")
            .field("backend", &self.backend_name())
            .finish()
    }
}
