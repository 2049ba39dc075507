//! In-memory record store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{FileRecord, RecordStore};
use crate::{FileShareError, Result};

/// Record store kept in process memory.
///
/// With a capacity limit, inserting a new id into a full store fails with
/// `StorageUnavailable`; replacing an existing id always succeeds.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, FileRecord>>,
    max_records: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding at most `max_records` records.
    pub fn with_capacity_limit(max_records: usize) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            max_records: Some(max_records),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, record: &FileRecord) -> Result<()> {
        let mut records = self.records.write().await;

        if let Some(max) = self.max_records {
            if !records.contains_key(&record.id) && records.len() >= max {
                return Err(FileShareError::StorageUnavailable(format!(
                    "quota exceeded ({max} records)"
                )));
            }
        }

        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<FileRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<FileRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.records.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> FileRecord {
        FileRecord::new(id, format!("{id}.bin"), "a.bin", "application/octet-stream", None)
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = MemoryStore::new();
        store.put(&record("x")).await.unwrap();

        assert_eq!(store.get("x").await.unwrap().unwrap().id, "x");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_absent_is_ok() {
        let store = MemoryStore::new();
        store.delete("nope").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_capacity_limit_rejects_new_ids() {
        let store = MemoryStore::with_capacity_limit(2);
        store.put(&record("a")).await.unwrap();
        store.put(&record("b")).await.unwrap();

        let result = store.put(&record("c")).await;
        assert!(matches!(result, Err(FileShareError::StorageUnavailable(_))));

        // Prior state unchanged
        assert_eq!(store.len().await, 2);
        assert!(store.get("c").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_capacity_limit_allows_replace() {
        let store = MemoryStore::with_capacity_limit(1);
        store.put(&record("a")).await.unwrap();

        let mut replacement = record("a");
        replacement.downloads = 3;
        store.put(&replacement).await.unwrap();

        assert_eq!(store.get("a").await.unwrap().unwrap().downloads, 3);
    }

    #[tokio::test]
    async fn test_delete_frees_capacity() {
        let store = MemoryStore::with_capacity_limit(1);
        store.put(&record("a")).await.unwrap();
        store.delete("a").await.unwrap();

        store.put(&record("b")).await.unwrap();
        assert_eq!(store.len().await, 1);
    }
}
