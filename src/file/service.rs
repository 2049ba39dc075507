//! File service for FileShare.
//!
//! Ties blob storage to the registry:
//! - Upload with size check and orphan cleanup
//! - Download with the download counter as a side effect
//! - Inline preview, listing and deletion

use tracing::{info, warn};

use crate::registry::{generate_file_id, FileRecord, FileRegistry};
use crate::{FileShareError, Result};

use super::media::{resolve_media_type, PreviewKind};
use super::storage::FileStorage;
use super::DEFAULT_MAX_FILE_SIZE;

/// Request data for a file upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Original filename, kept verbatim.
    pub file_name: String,
    /// Content type supplied by the client, if any.
    pub media_type: Option<String>,
    /// File content.
    pub content: Vec<u8>,
}

impl UploadRequest {
    /// Create a new upload request.
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: None,
            content,
        }
    }

    /// Set the client-supplied media type.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

/// Result of a download.
#[derive(Debug)]
pub struct Download {
    /// The record, with the counter as stored after this download.
    pub record: FileRecord,
    /// File content.
    pub content: Vec<u8>,
}

/// Result of a preview.
#[derive(Debug)]
pub struct Preview {
    pub record: FileRecord,
    pub kind: PreviewKind,
    /// File content; `None` when the kind has no inline rendering.
    pub content: Option<Vec<u8>>,
}

/// File service for uploads and downloads.
#[derive(Debug, Clone)]
pub struct FileService {
    registry: FileRegistry,
    storage: FileStorage,
    max_file_size: u64,
}

impl FileService {
    /// Create a new FileService.
    pub fn new(registry: FileRegistry, storage: FileStorage) -> Self {
        Self {
            registry,
            storage,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set the maximum upload size in bytes.
    pub fn with_max_file_size(mut self, max_size: u64) -> Self {
        self.max_file_size = max_size;
        self
    }

    /// Maximum upload size in bytes.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// The underlying registry.
    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    /// Upload a file.
    ///
    /// Saves the blob, then puts exactly one record. If the put fails the
    /// blob is removed again and the registry error is returned.
    pub async fn upload(&self, request: UploadRequest) -> Result<FileRecord> {
        if request.file_name.trim().is_empty() {
            return Err(FileShareError::Validation("file name is required".to_string()));
        }

        let size = request.content.len() as u64;
        if size > self.max_file_size {
            let max_mb = self.max_file_size / 1024 / 1024;
            return Err(FileShareError::Validation(format!(
                "file too large (max {max_mb}MB)"
            )));
        }

        let media_type = resolve_media_type(request.media_type.as_deref(), &request.file_name);
        let content_ref = self.storage.save(&request.content, &request.file_name).await?;

        let record = FileRecord::new(
            generate_file_id(),
            content_ref,
            request.file_name,
            media_type,
            Some(size),
        );

        if let Err(e) = self.registry.put(&record).await {
            if let Err(cleanup) = self.storage.delete(&record.content_ref).await {
                warn!(
                    content_ref = %record.content_ref,
                    "Failed to remove orphaned blob: {}", cleanup
                );
            }
            return Err(e);
        }

        info!(id = %record.id, name = %record.name, size, "File uploaded");
        Ok(record)
    }

    /// Get a record by id.
    pub async fn get(&self, id: &str) -> Result<FileRecord> {
        self.registry
            .get_by_id(id)
            .await?
            .ok_or_else(|| FileShareError::NotFound(format!("file {id}")))
    }

    /// All records, newest upload first.
    pub async fn list_recent(&self) -> Result<Vec<FileRecord>> {
        self.registry.list_recent().await
    }

    /// Download a file and count it.
    ///
    /// A failed counter update is logged and does not fail the download.
    pub async fn download(&self, id: &str) -> Result<Download> {
        let mut record = self.get(id).await?;
        let content = self.storage.load(&record.content_ref).await?;

        match self.registry.increment_downloads(id).await {
            Ok(updated) => record = updated,
            Err(e) => warn!(id, "Failed to update download count: {}", e),
        }

        Ok(Download { record, content })
    }

    /// Load a file for inline display without counting a download.
    ///
    /// Content is only read for kinds a browser can render inline.
    pub async fn preview(&self, id: &str) -> Result<Preview> {
        let record = self.get(id).await?;
        let kind = PreviewKind::for_media_type(&record.media_type);
        let content = if kind.is_inline() {
            Some(self.storage.load(&record.content_ref).await?)
        } else {
            None
        };

        Ok(Preview {
            record,
            kind,
            content,
        })
    }

    /// Delete a file and its blob.
    ///
    /// Returns `false` when the id was unknown; that is not an error.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let Some(record) = self.registry.get_by_id(id).await? else {
            return Ok(false);
        };

        self.registry.delete(id).await?;

        if let Err(e) = self.storage.delete(&record.content_ref).await {
            warn!(id, content_ref = %record.content_ref, "Failed to delete blob: {}", e);
        }

        info!(id, "File deleted");
        Ok(true)
    }
}
