//! File handlers for Web API.

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::file::{share_url, UploadRequest};
use crate::registry::FileRecord;
use crate::web::dto::{
    ApiResponse, FileResponse, PaginatedResponse, PaginationQuery, ShareLinkResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::OptionalSession;
use crate::FileShareError;

/// Build a Content-Disposition header value.
///
/// Control characters are dropped and quotes/backslashes replaced in the
/// plain `filename` parameter; names that needed that, or that are not
/// ASCII, also get an RFC 5987 `filename*` parameter.
fn content_disposition_header(disposition: &str, filename: &str) -> String {
    let needs_encoding =
        !filename.is_ascii() || filename.chars().any(|c| c.is_control() || c == '"' || c == '\\');

    if !needs_encoding {
        return format!("{disposition}; filename=\"{filename}\"");
    }

    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            c if !c.is_ascii() => '_',
            c => c,
        })
        .collect();
    let encoded = urlencoding::encode(filename);

    format!("{disposition}; filename=\"{sanitized}\"; filename*=UTF-8''{encoded}")
}

fn content_type_header(media_type: &str) -> HeaderValue {
    HeaderValue::from_str(media_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"))
}

fn file_response(
    record: &FileRecord,
    content: Vec<u8>,
    disposition: &str,
) -> Result<Response<Body>, ApiError> {
    Response::builder()
        .header(header::CONTENT_TYPE, content_type_header(&record.media_type))
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(disposition, &record.name),
        )
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

/// POST /api/files - Upload a file.
///
/// Request body: multipart/form-data with a "file" field.
#[utoipa::path(
    post,
    path = "/files",
    tag = "files",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File uploaded", body = FileResponse),
        (status = 400, description = "Missing or unreadable file", body = ErrorBody),
        (status = 422, description = "File too large", body = ErrorBody),
        (status = 503, description = "Storage unavailable", body = ErrorBody)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    OptionalSession(session): OptionalSession,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponse>>), ApiError> {
    let max_mb = state.files.max_file_size() / 1024 / 1024;
    let read_error = |e: axum::extract::multipart::MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::from(FileShareError::Validation(format!(
                "file too large (max {max_mb}MB)"
            )))
        } else {
            tracing::warn!("Failed to read upload: {}", e);
            ApiError::from(FileShareError::ReadFailure(e.body_text()))
        }
    };

    let mut upload: Option<UploadRequest> = None;

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let media_type = field.content_type().map(str::to_string);
        let content = field.bytes().await.map_err(read_error)?.to_vec();

        let mut request = UploadRequest::new(file_name, content);
        if let Some(media_type) = media_type {
            request = request.with_media_type(media_type);
        }
        upload = Some(request);
        break;
    }

    let upload = upload.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let record = state.files.upload(upload).await?;

    if let Some(session) = session {
        tracing::info!(id = %record.id, uploaded_by = %session.email, "Upload by signed-in visitor");
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(FileResponse::from_record(
            &record,
            &state.public_url,
        ))),
    ))
}

/// GET /api/files - List recent uploads, newest first.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Recent uploads", body = Vec<FileResponse>),
        (status = 503, description = "Storage unavailable", body = ErrorBody)
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<FileResponse>>, ApiError> {
    let pagination = pagination.normalized();
    let (offset, limit) = pagination.to_offset_limit();

    let records = state.files.list_recent().await?;
    let total = records.len() as u64;

    let files = records
        .iter()
        .skip(offset)
        .take(limit)
        .map(|r| FileResponse::from_record(r, &state.public_url))
        .collect();

    Ok(Json(PaginatedResponse::new(
        files,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// GET /api/files/:id - Get file metadata.
#[utoipa::path(
    get,
    path = "/files/{id}",
    tag = "files",
    params(("id" = String, Path, description = "File ID")),
    responses(
        (status = 200, description = "File metadata", body = FileResponse),
        (status = 404, description = "File not found", body = ErrorBody)
    )
)]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let record = state.files.get(&id).await?;
    Ok(Json(ApiResponse::new(FileResponse::from_record(
        &record,
        &state.public_url,
    ))))
}

/// GET /api/files/:id/download - Download a file.
///
/// Also serves `GET /download/:id`, the share-link target.
#[utoipa::path(
    get,
    path = "/files/{id}/download",
    tag = "files",
    params(("id" = String, Path, description = "File ID")),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = ErrorBody)
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let download = state.files.download(&id).await?;
    file_response(&download.record, download.content, "attachment")
}

/// GET /api/files/:id/preview - Show a file inline.
///
/// Only images, video, audio and PDF are served; anything else is 415.
/// Previews do not count as downloads.
#[utoipa::path(
    get,
    path = "/files/{id}/preview",
    tag = "files",
    params(("id" = String, Path, description = "File ID")),
    responses(
        (status = 200, description = "File content for inline display"),
        (status = 404, description = "File not found", body = ErrorBody),
        (status = 415, description = "No inline preview for this type", body = ErrorBody)
    )
)]
pub async fn preview_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let preview = state.files.preview(&id).await?;
    if !preview.kind.is_inline() {
        return Err(ApiError::unsupported_media_type(format!(
            "No preview available for {}",
            preview.record.media_type
        )));
    }

    let content = preview.content.unwrap_or_default();
    let mut response = file_response(&preview.record, content, "inline")?;
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("sandbox"),
    );

    Ok(response)
}

/// GET /api/files/:id/share - Get the share link for a file.
#[utoipa::path(
    get,
    path = "/files/{id}/share",
    tag = "files",
    params(("id" = String, Path, description = "File ID")),
    responses(
        (status = 200, description = "Share link", body = ShareLinkResponse),
        (status = 404, description = "File not found", body = ErrorBody)
    )
)]
pub async fn share_link(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ShareLinkResponse>>, ApiError> {
    let record = state.files.get(&id).await?;

    Ok(Json(ApiResponse::new(ShareLinkResponse {
        url: share_url(&state.public_url, &record.id),
        id: record.id,
    })))
}

/// DELETE /api/files/:id - Delete a file.
///
/// Deleting an unknown id succeeds.
#[utoipa::path(
    delete,
    path = "/files/{id}",
    tag = "files",
    params(("id" = String, Path, description = "File ID")),
    responses(
        (status = 204, description = "File deleted (or never existed)"),
        (status = 503, description = "Storage unavailable", body = ErrorBody)
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.files.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
