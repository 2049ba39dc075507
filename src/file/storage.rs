//! Blob storage for FileShare.
//!
//! Uploaded content lives on disk under UUID-based names, sharded by the
//! first two characters of the name. The registry only keeps the stored
//! name (`content_ref`).

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::{FileShareError, Result};

/// Disk-backed blob storage.
///
/// Layout:
/// ```text
/// {base_path}/
/// ├── 3f/
/// │   └── 3f2a9c10-1b7e-4d0a-9a51-6c3e8f0b2d47.pdf
/// └── c8/
///     └── c81d44e2-70aa-4f3b-b2d9-01fe5a6b9c33.bin
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `base_path`, creating the directory if needed.
    pub async fn open(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)
            .await
            .map_err(|e| unavailable(&base_path, e))?;

        Ok(Self { base_path })
    }

    /// Base directory of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Save content under a fresh name and return that name.
    ///
    /// The extension of `original_name` is kept so the blob is recognizable
    /// on disk.
    pub async fn save(&self, content: &[u8], original_name: &str) -> Result<String> {
        let stored_name = Self::generate_stored_name(original_name);
        self.save_with_name(content, &stored_name).await?;
        Ok(stored_name)
    }

    /// Save content under a specific stored name.
    pub async fn save_with_name(&self, content: &[u8], stored_name: &str) -> Result<()> {
        let file_path = self.get_file_path(stored_name)?;

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| unavailable(parent, e))?;
        }

        fs::write(&file_path, content)
            .await
            .map_err(|e| unavailable(&file_path, e))
    }

    /// Load the content of a stored blob.
    pub async fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        let file_path = self.get_file_path(stored_name)?;

        match fs::read(&file_path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(FileShareError::NotFound(format!("content {stored_name}")))
            }
            Err(e) => Err(unavailable(&file_path, e)),
        }
    }

    /// Delete a blob. Returns `false` if it did not exist.
    pub async fn delete(&self, stored_name: &str) -> Result<bool> {
        let file_path = self.get_file_path(stored_name)?;

        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(unavailable(&file_path, e)),
        }
    }

    /// Whether a blob exists.
    pub async fn exists(&self, stored_name: &str) -> bool {
        match self.get_file_path(stored_name) {
            Ok(path) => fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Full path of a stored name: `{base_path}/{shard}/{stored_name}`.
    ///
    /// Names that could escape the storage directory are rejected.
    pub fn get_file_path(&self, stored_name: &str) -> Result<PathBuf> {
        if stored_name.is_empty()
            || stored_name.contains(['/', '\\'])
            || stored_name.starts_with('.')
        {
            return Err(FileShareError::Validation(format!(
                "invalid stored name {stored_name:?}"
            )));
        }

        Ok(self
            .base_path
            .join(Self::get_shard(stored_name))
            .join(stored_name))
    }

    fn get_shard(stored_name: &str) -> &str {
        stored_name.get(..2).unwrap_or(stored_name)
    }

    fn extract_extension(filename: &str) -> &str {
        Path::new(filename)
            .extension()
            .and_then(|s| s.to_str())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin")
    }

    /// Generate a UUID-based stored name keeping the original extension.
    pub fn generate_stored_name(original_name: &str) -> String {
        let ext = Self::extract_extension(original_name);
        format!("{}.{ext}", Uuid::new_v4())
    }
}

fn unavailable(path: &Path, e: io::Error) -> FileShareError {
    FileShareError::StorageUnavailable(format!("{}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup_storage() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path()).await.unwrap();
        (temp_dir, storage)
    }

    #[tokio::test]
    async fn test_open_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let storage_path = temp_dir.path().join("blobs");

        assert!(!storage_path.exists());

        let storage = FileStorage::open(&storage_path).await.unwrap();

        assert!(storage_path.exists());
        assert_eq!(storage.base_path(), storage_path);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let (_temp_dir, storage) = setup_storage().await;

        let stored_name = storage.save(b"hello", "notes.txt").await.unwrap();

        assert!(stored_name.ends_with(".txt"));
        assert_eq!(storage.load(&stored_name).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_save_uses_shard_directory() {
        let (_temp_dir, storage) = setup_storage().await;

        let stored_name = storage.save(b"data", "a.bin").await.unwrap();

        let shard_dir = storage.base_path().join(&stored_name[..2]);
        assert!(shard_dir.is_dir());
        assert!(shard_dir.join(&stored_name).is_file());
    }

    #[tokio::test]
    async fn test_empty_content() {
        let (_temp_dir, storage) = setup_storage().await;

        let stored_name = storage.save(b"", "empty.txt").await.unwrap();

        assert!(storage.exists(&stored_name).await);
        assert!(storage.load(&stored_name).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_not_found() {
        let (_temp_dir, storage) = setup_storage().await;

        let result = storage.load("00000000-0000-0000-0000-000000000000.txt").await;
        assert!(matches!(result, Err(FileShareError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let (_temp_dir, storage) = setup_storage().await;
        let stored_name = storage.save(b"bye", "bye.txt").await.unwrap();

        assert!(storage.exists(&stored_name).await);
        assert!(storage.delete(&stored_name).await.unwrap());
        assert!(!storage.exists(&stored_name).await);
        assert!(!storage.delete(&stored_name).await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let (_temp_dir, storage) = setup_storage().await;

        for name in ["../etc/passwd", "a/b.txt", "..", ".hidden", ""] {
            let result = storage.load(name).await;
            assert!(
                matches!(result, Err(FileShareError::Validation(_))),
                "accepted {name:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_write_failure_is_storage_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path().join("blobs")).await.unwrap();

        // A plain file where the shard directory should go
        std::fs::write(storage.base_path().join("ab"), b"in the way").unwrap();

        let result = storage.save_with_name(b"data", "ab123.txt").await;
        assert!(matches!(result, Err(FileShareError::StorageUnavailable(_))));
    }

    #[test]
    fn test_extract_extension() {
        assert_eq!(FileStorage::extract_extension("report.pdf"), "pdf");
        assert_eq!(FileStorage::extract_extension("photo.JPG"), "JPG");
        assert_eq!(FileStorage::extract_extension("archive.tar.gz"), "gz");
        assert_eq!(FileStorage::extract_extension("README"), "bin");
        assert_eq!(FileStorage::extract_extension(".hidden"), "bin");
        assert_eq!(FileStorage::extract_extension("odd.ex t"), "bin");
    }

    #[test]
    fn test_generate_stored_name() {
        let a = FileStorage::generate_stored_name("スクリーンショット.png");
        let b = FileStorage::generate_stored_name("スクリーンショット.png");

        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
        assert_eq!(a.len(), 36 + ".png".len());
    }

    #[test]
    fn test_get_shard() {
        assert_eq!(FileStorage::get_shard("abcdef.txt"), "ab");
        assert_eq!(FileStorage::get_shard("x"), "x");
    }
}
