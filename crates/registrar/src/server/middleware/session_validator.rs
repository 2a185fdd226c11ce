use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Requires a live session and exposes its context as a request extension.
pub async fn require_session(
    State(s): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return ApiErrorType::from((
            StatusCode::UNAUTHORIZED,
            "Missing bearer token",
            None,
        ))
        .into_response();
    };

    match s.sessions.get(token) {
        Some(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        None => {
            warn!(path = %req.uri().path(), "Rejected request without a live session");
            ApiErrorType::from((
                StatusCode::UNAUTHORIZED,
                "Session expired or not found",
                None,
            ))
            .into_response()
        }
    }
}
