use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware as mw, Router};

use crate::server::endpoints::{grades, reports, schedule, session, status};
use crate::server::middleware::*;
use crate::types::AppState;

mod endpoints;
mod middleware;
mod types;

pub use types::ApiErrorType;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Router whose endpoints require a live session
    let session_router = Router::new()
        .route(
            "/reports/grade_change",
            post(reports::post_grade_change_report),
        )
        .route("/reports", get(reports::get_my_reports))
        .route("/reports/:report_id", get(reports::get_report))
        .route("/report_cache/stats", get(status::get_report_cache_stats))
        .route_layer(mw::from_fn_with_state(
            app_state.clone(),
            session_validator::require_session,
        ));

    // Stateless computation endpoints
    let compute_router = Router::new()
        .route("/schedule/parse", post(schedule::post_parse_schedule))
        .route("/schedule/conflicts", post(schedule::post_find_conflicts))
        .route(
            "/registration/validate",
            post(schedule::post_validate_registration),
        )
        .route("/grades/compute", post(grades::post_compute_grade));

    Router::new()
        .route("/health", get(status::get_health))
        .route(
            "/session",
            post(session::post_init_session).delete(session::delete_session),
        )
        .route("/session/refresh", post(session::post_refresh_session))
        .merge(compute_router)
        .merge(session_router)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::report::SubmitterContext;
    use crate::session::SessionStore;
    use axum::body::{to_bytes, Body};
    use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    fn user() -> SubmitterContext {
        SubmitterContext {
            name: "Ana Cruz".to_string(),
            email: "ana@example.edu".to_string(),
            role: "faculty".to_string(),
        }
    }

    fn state_with_session(token: &str) -> Arc<AppState> {
        let state = AppState::from_config(ServiceConfig::default()).unwrap();
        state.sessions.init(token, user());
        Arc::new(state)
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_open_routes_need_no_session() {
        let app = create_router(state_with_session("tok"));

        let response = app.clone().oneshot(get("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .method("POST")
            .uri("/schedule/parse")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"schedule": "TTH", "time": "13:00-14:30"}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/no/such/route", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_protected_routes_require_live_session() {
        let app = create_router(state_with_session("tok"));

        let missing = app
            .clone()
            .oneshot(get("/report_cache/stats", None))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let unknown = app
            .clone()
            .oneshot(get("/report_cache/stats", Some("other")))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

        let live = app
            .clone()
            .oneshot(get("/report_cache/stats", Some("tok")))
            .await
            .unwrap();
        assert_eq!(live.status(), StatusCode::OK);

        let report = app
            .oneshot(get("/reports/CGF-0-AAAAAA", Some("other")))
            .await
            .unwrap();
        assert_eq!(report.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_session_rejected() {
        let mut state = AppState::from_config(ServiceConfig::default()).unwrap();
        state.sessions = SessionStore::new(Duration::ZERO);
        state.sessions.init("tok", user());
        let app = create_router(Arc::new(state));

        let response = app
            .oneshot(get("/report_cache/stats", Some("tok")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_generate_then_download_report() {
        let app = create_router(state_with_session("tok"));

        let request = Request::builder()
            .method("POST")
            .uri("/reports/grade_change")
            .header(AUTHORIZATION, "Bearer tok")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"student_name": "Maria Santos", "course_code": "CS101",
                    "grade_rows": [{"grade_type": "Midterm", "weight_percent": "50%", "score": 80},
                                   {"grade_type": "Final", "weight_percent": "50%", "score": 90}]}"#,
            ))
            .unwrap();
        let created = app.clone().oneshot(request).await.unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);

        let bytes = to_bytes(created.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let report_id = body["report_id"].as_str().unwrap().to_string();

        let uri = format!("/reports/{}", report_id);
        let fetched = app.clone().oneshot(get(&uri, Some("tok"))).await.unwrap();
        assert_eq!(fetched.status(), StatusCode::OK);
        let html = to_bytes(fetched.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8(html.to_vec()).unwrap().contains(&report_id));

        let listed = app.clone().oneshot(get("/reports", Some("tok"))).await.unwrap();
        assert_eq!(listed.status(), StatusCode::OK);

        let anonymous = app.oneshot(get(&uri, None)).await.unwrap();
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    }
}
