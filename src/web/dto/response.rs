//! Response DTOs for Web API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::file::{format_file_size, share_url, FileCategory, PreviewKind};
use crate::registry::FileRecord;
use crate::session::DemoSession;

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    /// Response data.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PaginationMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Create a new paginated response.
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
            },
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    /// Total number of items.
    pub total: u64,
}

fn to_rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ============================================================================
// File DTOs
// ============================================================================

/// File metadata response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileResponse {
    /// File id.
    pub id: String,
    /// Original file name.
    pub name: String,
    pub media_type: String,
    /// Size in bytes, absent when unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Size for display, e.g. "1.5 KB".
    pub size_display: String,
    /// Listing category (icon hint).
    pub category: FileCategory,
    /// How the file can be previewed inline.
    pub preview: PreviewKind,
    /// Completed downloads.
    pub downloads: u64,
    /// Upload timestamp (RFC 3339).
    pub uploaded_at: String,
    /// Public share link.
    pub share_url: String,
}

impl FileResponse {
    /// Build the response for a record, with links under `public_url`.
    pub fn from_record(record: &FileRecord, public_url: &str) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            media_type: record.media_type.clone(),
            size: record.size,
            // An empty file is a known size of zero, not an unknown one.
            size_display: format_file_size(record.size),
            category: FileCategory::for_media_type(&record.media_type),
            preview: PreviewKind::for_media_type(&record.media_type),
            downloads: record.downloads,
            uploaded_at: to_rfc3339(&record.uploaded_at),
            share_url: share_url(public_url, &record.id),
        }
    }
}

/// Share link response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShareLinkResponse {
    /// File id.
    pub id: String,
    /// Link anyone can open to download the file.
    pub url: String,
}

// ============================================================================
// Session DTOs
// ============================================================================

/// Demo session response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Bearer token for subsequent requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub expires_at: String,
}

impl SessionResponse {
    /// Response carrying the token (returned once, at login).
    pub fn with_token(session: &DemoSession) -> Self {
        Self {
            token: Some(session.token.clone()),
            ..Self::without_token(session)
        }
    }

    /// Response without the token.
    pub fn without_token(session: &DemoSession) -> Self {
        Self {
            token: None,
            name: session.name.clone(),
            email: session.email.clone(),
            created_at: to_rfc3339(&session.created_at),
            expires_at: to_rfc3339(&session.expires_at),
        }
    }
}
