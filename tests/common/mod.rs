//! Test helpers for Web API tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use fileshare::config::WebConfig;
use fileshare::web::{create_app, AppState};
use fileshare::{
    Database, FileRegistry, FileService, FileStorage, MemoryStore, SessionManager, SqliteStore,
};
use serde_json::Value;
use tempfile::TempDir;

pub const PUBLIC_URL: &str = "http://share.test";

/// A running test server and the blob directory it writes into.
pub struct TestApp {
    pub server: TestServer,
    pub files: FileService,
    _storage_dir: TempDir,
}

/// Create a test server backed by an in-memory registry.
pub async fn create_test_app() -> TestApp {
    create_test_app_with(FileRegistry::in_memory(), None).await
}

/// Create a test server backed by an in-memory SQLite registry.
pub async fn create_sqlite_test_app() -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    create_test_app_with(FileRegistry::new(SqliteStore::new(db)), None).await
}

/// Create a test server with a custom registry and optional size limit.
pub async fn create_test_app_with(registry: FileRegistry, max_file_size: Option<u64>) -> TestApp {
    let storage_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = FileStorage::open(storage_dir.path())
        .await
        .expect("Failed to open file storage");

    let mut files = FileService::new(registry, storage);
    if let Some(max) = max_file_size {
        files = files.with_max_file_size(max);
    }

    let state = AppState::new(files.clone(), SessionManager::default(), PUBLIC_URL);
    let router = create_app(Arc::new(state), &WebConfig::default());
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        files,
        _storage_dir: storage_dir,
    }
}

/// A registry whose store refuses every new record.
pub fn full_registry() -> FileRegistry {
    FileRegistry::new(MemoryStore::with_capacity_limit(0))
}

/// Build a multipart form with a single "file" part.
pub fn file_form(name: &str, media_type: &str, content: &[u8]) -> MultipartForm {
    let part = Part::bytes(content.to_vec())
        .file_name(name)
        .mime_type(media_type);
    MultipartForm::new().add_part("file", part)
}

/// Upload a file and return the `data` object of the response.
pub async fn upload(server: &TestServer, name: &str, media_type: &str, content: &[u8]) -> Value {
    let response = server
        .post("/api/files")
        .multipart(file_form(name, media_type, content))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["data"].clone()
}

/// Get the `id` of an uploaded file.
pub fn file_id(data: &Value) -> String {
    data["id"].as_str().unwrap().to_string()
}
