//! Demo session extractors.
//!
//! Handlers that care about the visitor take [`CurrentSession`] (required)
//! or [`OptionalSession`] as an argument. The session is resolved from an
//! `Authorization: Bearer <token>` header against the session manager in
//! the application state.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::session::DemoSession;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// The signed-in visitor. Rejects with 401 when absent or expired.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub DemoSession);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::unauthorized("Missing session token"))?;

        let session = state
            .sessions
            .get(bearer.token())
            .await
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

        Ok(CurrentSession(session))
    }
}

/// The signed-in visitor, if any. Never rejects.
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<DemoSession>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for OptionalSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = CurrentSession::from_request_parts(parts, state)
            .await
            .ok()
            .map(|CurrentSession(s)| s);

        Ok(OptionalSession(session))
    }
}
