//! API handlers for the FileShare web API.

pub mod files;
pub mod session;

pub use files::*;
pub use session::*;

use crate::file::FileService;
use crate::session::SessionManager;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload/download service.
    pub files: FileService,
    /// Demo sessions.
    pub sessions: SessionManager,
    /// Base URL for share links.
    pub public_url: String,
}

impl AppState {
    /// Create a new application state.
    pub fn new(files: FileService, sessions: SessionManager, public_url: impl Into<String>) -> Self {
        Self {
            files,
            sessions,
            public_url: public_url.into(),
        }
    }
}
