//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::dto::{
    FileResponse, LoginRequest, PaginationMeta, SessionResponse, ShareLinkResponse, UploadForm,
};
use super::error::{ErrorBody, ErrorCode, ErrorDetail};
use super::handlers::{self, AppState};
use super::middleware::{create_cors_layer, security_headers};
use crate::config::WebConfig;
use crate::file::{FileCategory, PreviewKind};

/// Slack on top of the upload limit for multipart boundaries and headers.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// OpenAPI document for the FileShare API.
#[derive(OpenApi)]
#[openapi(
    info(title = "FileShare API", description = "Upload, share and download files"),
    servers((url = "/api")),
    paths(
        handlers::files::upload_file,
        handlers::files::list_files,
        handlers::files::get_file,
        handlers::files::download_file,
        handlers::files::preview_file,
        handlers::files::share_link,
        handlers::files::delete_file,
        handlers::session::login,
        handlers::session::current_session,
        handlers::session::logout,
    ),
    components(schemas(
        FileResponse,
        ShareLinkResponse,
        SessionResponse,
        LoginRequest,
        UploadForm,
        PaginationMeta,
        FileCategory,
        PreviewKind,
        ErrorBody,
        ErrorDetail,
        ErrorCode,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "files", description = "Upload, list, download and share files"),
        (name = "session", description = "Demo sessions")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let body_limit = usize::try_from(app_state.files.max_file_size())
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let file_routes = Router::new()
        .route(
            "/",
            get(handlers::list_files).post(handlers::upload_file),
        )
        .route(
            "/:id",
            get(handlers::get_file).delete(handlers::delete_file),
        )
        .route("/:id/download", get(handlers::download_file))
        .route("/:id/preview", get(handlers::preview_file))
        .route("/:id/share", get(handlers::share_link));

    let session_routes = Router::new().route(
        "/",
        get(handlers::current_session)
            .post(handlers::login)
            .delete(handlers::logout),
    );

    let api_routes = Router::new()
        .nest("/files", file_routes)
        .nest("/session", session_routes);

    Router::new()
        .nest("/api", api_routes)
        .route("/download/:id", get(handlers::download_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create the Swagger UI router serving the OpenAPI document.
pub fn create_swagger_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Create a router serving a front end from `static_path`.
///
/// Unknown paths fall back to `index.html`. Returns `None` if the
/// directory does not exist.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    let dir = Path::new(static_path);
    if !dir.is_dir() {
        tracing::warn!("Static file directory not found: {}", static_path);
        return None;
    }

    let serve_dir = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
    Some(Router::new().fallback_service(serve_dir))
}

/// Assemble the complete application: API, health, docs, optional static
/// files, with gzip compression.
pub fn create_app(app_state: Arc<AppState>, web_config: &WebConfig) -> Router {
    let mut router = create_router(app_state, &web_config.cors_origins)
        .merge(create_health_router())
        .merge(create_swagger_router());

    if web_config.serve_static {
        if let Some(static_router) = create_static_router(&web_config.static_path) {
            router = router.merge(static_router);
        }
    }

    router.layer(CompressionLayer::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
    }

    #[test]
    fn test_openapi_document() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/files"));
        assert!(doc.paths.paths.contains_key("/files/{id}/download"));
        assert!(doc.paths.paths.contains_key("/session"));

        let components = doc.components.unwrap();
        assert!(components.schemas.contains_key("FileResponse"));
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_static_router_missing_dir() {
        assert!(create_static_router("definitely/not/here").is_none());
    }

    #[test]
    fn test_static_router_existing_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("index.html"), "<html></html>").unwrap();

        assert!(create_static_router(temp_dir.path().to_str().unwrap()).is_some());
    }
}
