//! File handling for FileShare.
//!
//! - Blob storage on disk with UUID naming
//! - Media type classification for previews and listings
//! - Share link construction
//! - The upload/download service tying blobs to the registry

pub mod media;
mod service;
mod share;
mod storage;

pub use media::{format_file_size, resolve_media_type, FileCategory, PreviewKind};
pub use service::{Download, FileService, Preview, UploadRequest};
pub use share::share_url;
pub use storage::FileStorage;

/// Default maximum upload size (50MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
