//! SQLite-backed record store.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use super::{FileRecord, RecordStore};
use crate::db::Database;
use crate::{FileShareError, Result};

/// Record store persisted in the `files` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Create a store over an opened (and migrated) database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn put(&self, record: &FileRecord) -> Result<()> {
        let size = record.size.map(to_db_int).transpose()?;
        let downloads = to_db_int(record.downloads)?;

        sqlx::query(
            "INSERT OR REPLACE INTO files
                 (id, content_ref, name, media_type, size, downloads, uploaded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.content_ref)
        .bind(&record.name)
        .bind(&record.media_type)
        .bind(size)
        .bind(downloads)
        .bind(
            record
                .uploaded_at
                .to_rfc3339_opts(SecondsFormat::Nanos, true),
        )
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<FileRecord>> {
        let row: Option<FileRow> = sqlx::query_as(
            "SELECT id, content_ref, name, media_type, size, downloads, uploaded_at
             FROM files WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(FileRow::into_record).transpose()
    }

    async fn get_all(&self) -> Result<Vec<FileRecord>> {
        let rows: Vec<FileRow> = sqlx::query_as(
            "SELECT id, content_ref, name, media_type, size, downloads, uploaded_at
             FROM files",
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter().map(FileRow::into_record).collect()
    }

    async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }
}

fn to_db_int(value: u64) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| FileShareError::Validation(format!("value {value} out of range")))
}

/// Internal struct for mapping database rows to FileRecord.
#[derive(sqlx::FromRow)]
struct FileRow {
    id: String,
    content_ref: String,
    name: String,
    media_type: String,
    size: Option<i64>,
    downloads: i64,
    uploaded_at: String,
}

impl FileRow {
    /// Convert a row into a record. Malformed stored values are a read failure.
    fn into_record(self) -> Result<FileRecord> {
        let size = self
            .size
            .map(|s| {
                u64::try_from(s).map_err(|_| {
                    FileShareError::ReadFailure(format!("record {}: negative size {s}", self.id))
                })
            })
            .transpose()?;

        let downloads = u64::try_from(self.downloads).map_err(|_| {
            FileShareError::ReadFailure(format!(
                "record {}: negative download count {}",
                self.id, self.downloads
            ))
        })?;

        let uploaded_at = DateTime::parse_from_rfc3339(&self.uploaded_at)
            .map_err(|e| {
                FileShareError::ReadFailure(format!("record {}: bad timestamp: {e}", self.id))
            })?
            .with_timezone(&Utc);

        Ok(FileRecord {
            id: self.id,
            content_ref: self.content_ref,
            name: self.name,
            media_type: self.media_type,
            size,
            downloads,
            uploaded_at,
        })
    }
}
