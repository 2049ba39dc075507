//! FileShare - upload a file, get a link, let anyone download it.
//!
//! A small file-sharing service: blobs on disk, metadata in a pluggable
//! registry (SQLite or memory), and a JSON API with share links.

pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod registry;
pub mod session;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{FileShareError, Result};
pub use file::{FileService, FileStorage, UploadRequest};
pub use registry::{FileRecord, FileRegistry, MemoryStore, RecordStore, SqliteStore};
pub use session::{DemoSession, SessionManager};
