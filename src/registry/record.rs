//! The file record persisted by the registry.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of a generated file id.
pub const FILE_ID_LENGTH: usize = 11;

const FILE_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a new random file id (lowercase base-36).
///
/// Ids are not checked for collisions; a colliding upload replaces the
/// earlier record.
pub fn generate_file_id() -> String {
    let mut rng = rand::rng();
    (0..FILE_ID_LENGTH)
        .map(|_| FILE_ID_ALPHABET[rng.random_range(0..FILE_ID_ALPHABET.len())] as char)
        .collect()
}

/// Metadata for one shared file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Registry key.
    pub id: String,
    /// Stored blob name of the content.
    pub content_ref: String,
    /// Original filename, unsanitized.
    pub name: String,
    /// Content type as supplied by the uploader.
    pub media_type: String,
    /// Size in bytes, if known.
    pub size: Option<u64>,
    /// Number of completed downloads.
    pub downloads: u64,
    /// When the file was uploaded. Never changes.
    pub uploaded_at: DateTime<Utc>,
}

impl FileRecord {
    /// Create a fresh record with zero downloads, stamped now.
    pub fn new(
        id: impl Into<String>,
        content_ref: impl Into<String>,
        name: impl Into<String>,
        media_type: impl Into<String>,
        size: Option<u64>,
    ) -> Self {
        Self {
            id: id.into(),
            content_ref: content_ref.into(),
            name: name.into(),
            media_type: media_type.into(),
            size,
            downloads: 0,
            uploaded_at: Utc::now(),
        }
    }

    /// Set the upload timestamp.
    pub fn with_uploaded_at(mut self, uploaded_at: DateTime<Utc>) -> Self {
        self.uploaded_at = uploaded_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = FileRecord::new("abc", "ab/abc.txt", "notes.txt", "text/plain", Some(10));

        assert_eq!(record.id, "abc");
        assert_eq!(record.downloads, 0);
        assert_eq!(record.size, Some(10));
        assert!(record.uploaded_at <= Utc::now());
    }

    #[test]
    fn test_generate_file_id_shape() {
        let id = generate_file_id();

        assert_eq!(id.len(), FILE_ID_LENGTH);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generate_file_id_varies() {
        let a = generate_file_id();
        let b = generate_file_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_record_json_shape() {
        let record = FileRecord::new("abc", "ab/abc.txt", "notes.txt", "text/plain", None);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], "abc");
        assert_eq!(json["media_type"], "text/plain");
        assert!(json["size"].is_null());
        assert_eq!(json["downloads"], 0);
    }
}
