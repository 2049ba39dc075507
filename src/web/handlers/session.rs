//! Demo session handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::web::dto::{sanitize_string, ApiResponse, LoginRequest, SessionResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::CurrentSession;

/// POST /api/session - Start a demo session.
///
/// No credentials are checked.
#[utoipa::path(
    post,
    path = "/session",
    tag = "session",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Session started", body = SessionResponse),
        (status = 422, description = "Invalid email or name", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionResponse>>), ApiError> {
    let name = req.name.as_deref().map(sanitize_string);
    let session = state.sessions.login(name.as_deref(), &req.email).await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(SessionResponse::with_token(&session))),
    ))
}

/// GET /api/session - Current session.
#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "No valid session", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn current_session(
    CurrentSession(session): CurrentSession,
) -> Json<ApiResponse<SessionResponse>> {
    Json(ApiResponse::new(SessionResponse::without_token(&session)))
}

/// DELETE /api/session - End the current session.
#[utoipa::path(
    delete,
    path = "/session",
    tag = "session",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "No valid session", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
) -> StatusCode {
    state.sessions.logout(&session.token).await;
    StatusCode::NO_CONTENT
}
