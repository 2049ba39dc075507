//! Web API module for FileShare.
//!
//! REST endpoints for uploading, listing, previewing, downloading and sharing
//! files, plus demo sessions and the OpenAPI browser.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_app, create_router};
pub use server::WebServer;
