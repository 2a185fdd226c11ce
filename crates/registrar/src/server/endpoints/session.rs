//! Session lifecycle endpoints: sign-in, refresh and sign-out.
//!
//! This service does not check credentials itself. The name, email and role
//! in `POST /session` are taken as given, so a live session only proves that
//! someone opened one. Set `session_secret` in the config so that only the
//! sign-in front end (which sends it in `x-registrar-secret`) can open
//! sessions. Sessions are held in memory until they expire and are swept by
//! the cleanup task.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use crate::report::SubmitterContext;
use crate::server::middleware::session_validator::bearer_token;
use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// Body of POST /session, sent once the user has signed in to the registrar API.
#[derive(Debug, Deserialize)]
pub struct SessionInitBody {
    pub token: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
}

/// Header carrying the configured session secret.
pub const SESSION_SECRET_HEADER: &str = "x-registrar-secret";

fn missing_token() -> Response {
    ApiErrorType::from((StatusCode::UNAUTHORIZED, "Missing bearer token", None)).into_response()
}

/// POST /session
pub async fn post_init_session(
    State(s): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<SessionInitBody>,
) -> Response {
    if let Some(secret) = &s.config.session_secret {
        let presented = headers
            .get(SESSION_SECRET_HEADER)
            .and_then(|v| v.to_str().ok());
        if presented != Some(secret.as_str()) {
            warn!(email = %body.email, "Rejected session init without the shared secret");
            return ApiErrorType::from((
                StatusCode::FORBIDDEN,
                "Session init not authorized",
                None,
            ))
            .into_response();
        }
    }

    if body.token.trim().is_empty() {
        return ApiErrorType::from((StatusCode::BAD_REQUEST, "Token must not be empty", None))
            .into_response();
    }

    let session = s.sessions.init(
        body.token.trim(),
        SubmitterContext {
            name: body.name,
            email: body.email,
            role: body.role,
        },
    );

    (StatusCode::CREATED, Json(session)).into_response()
}

/// POST /session/refresh
pub async fn post_refresh_session(
    State(s): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return missing_token();
    };

    match s.sessions.refresh(token) {
        Some(session) => (StatusCode::OK, Json(session)).into_response(),
        None => ApiErrorType::from((
            StatusCode::UNAUTHORIZED,
            "Session expired or not found",
            None,
        ))
        .into_response(),
    }
}

/// DELETE /session
pub async fn delete_session(State(s): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return missing_token();
    };

    let cleared = s.sessions.clear(token);
    (StatusCode::OK, Json(json!({ "cleared": cleared }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use axum::http::header::AUTHORIZATION;
    use axum::http::HeaderValue;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::from_config(ServiceConfig::default()).unwrap())
    }

    fn auth(token: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn test_session_endpoints_lifecycle() {
        let s = state();

        let created = post_init_session(
            State(s.clone()),
            HeaderMap::new(),
            Json(SessionInitBody {
                token: "tok-1".to_string(),
                name: "Ana Cruz".to_string(),
                email: "ana@example.edu".to_string(),
                role: "registrar".to_string(),
            }),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        assert!(s.sessions.get("tok-1").is_some());

        let refreshed = post_refresh_session(State(s.clone()), auth("tok-1")).await;
        assert_eq!(refreshed.status(), StatusCode::OK);

        let deleted = delete_session(State(s.clone()), auth("tok-1")).await;
        assert_eq!(deleted.status(), StatusCode::OK);
        assert!(s.sessions.get("tok-1").is_none());

        let refreshed = post_refresh_session(State(s.clone()), auth("tok-1")).await;
        assert_eq!(refreshed.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_empty_token_rejected() {
        let response = post_init_session(
            State(state()),
            HeaderMap::new(),
            Json(SessionInitBody {
                token: "  ".to_string(),
                name: String::new(),
                email: String::new(),
                role: String::new(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_init_requires_configured_secret() {
        let config = ServiceConfig {
            session_secret: Some("s3cret".to_string()),
            ..Default::default()
        };
        let s = Arc::new(AppState::from_config(config).unwrap());
        let body = || SessionInitBody {
            token: "tok-2".to_string(),
            name: "Ana Cruz".to_string(),
            email: "ana@example.edu".to_string(),
            role: "registrar".to_string(),
        };

        let rejected = post_init_session(State(s.clone()), HeaderMap::new(), Json(body())).await;
        assert_eq!(rejected.status(), StatusCode::FORBIDDEN);

        let mut wrong = HeaderMap::new();
        wrong.insert(SESSION_SECRET_HEADER, HeaderValue::from_static("guess"));
        let rejected = post_init_session(State(s.clone()), wrong, Json(body())).await;
        assert_eq!(rejected.status(), StatusCode::FORBIDDEN);
        assert!(s.sessions.is_empty());

        let mut right = HeaderMap::new();
        right.insert(SESSION_SECRET_HEADER, HeaderValue::from_static("s3cret"));
        let created = post_init_session(State(s.clone()), right, Json(body())).await;
        assert_eq!(created.status(), StatusCode::CREATED);
        assert!(s.sessions.get("tok-2").is_some());
    }

    #[tokio::test]
    async fn test_missing_header() {
        let response = delete_session(State(state()), HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
