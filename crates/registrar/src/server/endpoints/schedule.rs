use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::registration::{validate_registration, RegistrationRequest};
use crate::schedule::{find_conflicts, parse_schedule, ConflictPair, CourseSelection};
use crate::server::types::ApiErrorType;

#[derive(Debug, Deserialize)]
pub struct ParseScheduleBody {
    pub schedule: String,
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct ConflictsBody {
    #[serde(default)]
    pub selections: Vec<CourseSelection>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConflictsResponse {
    pub has_conflicts: bool,
    pub conflicts: Vec<ConflictPair>,
}

/// POST /schedule/parse
/// Parses a day pattern and time range
pub async fn post_parse_schedule(Json(body): Json<ParseScheduleBody>) -> Response {
    match parse_schedule(&body.schedule, &body.time) {
        Ok(parsed) => (StatusCode::OK, Json(parsed)).into_response(),
        Err(e) => ApiErrorType::from((
            StatusCode::BAD_REQUEST,
            e.kind(),
            Some(e.to_string()),
        ))
        .into_response(),
    }
}

/// POST /schedule/conflicts
/// Returns every pair of selected courses whose meeting times collide
pub async fn post_find_conflicts(Json(body): Json<ConflictsBody>) -> Response {
    info!("POST /schedule/conflicts ({} selections)", body.selections.len());

    let conflicts = find_conflicts(&body.selections);
    let response = ConflictsResponse {
        has_conflicts: !conflicts.is_empty(),
        conflicts,
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /registration/validate
/// Checks an add/drop request before it is submitted
pub async fn post_validate_registration(Json(request): Json<RegistrationRequest>) -> Response {
    let check = validate_registration(&request);
    (StatusCode::OK, Json(check)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::RegistrationCheck;
    use axum::body::to_bytes;

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_parse_schedule_endpoint() {
        let ok = post_parse_schedule(Json(ParseScheduleBody {
            schedule: "MTWTH".to_string(),
            time: "09:00-10:15".to_string(),
        }))
        .await;
        assert_eq!(ok.status(), StatusCode::OK);

        let bad = post_parse_schedule(Json(ParseScheduleBody {
            schedule: "MTWTH".to_string(),
            time: "nine to ten".to_string(),
        }))
        .await;
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = body_json(bad).await;
        assert_eq!(body["error"], "malformed-time-range");
    }

    #[tokio::test]
    async fn test_conflicts_endpoint() {
        let body: ConflictsBody = serde_json::from_str(
            r#"{"selections": [
                {"id": "a", "course": {"course_code": "CS101", "course_name": "Intro", "section": "A",
                                       "schedule": "MW", "time": "09:00-10:30"}},
                {"id": "b", "course": {"course_code": "MA101", "course_name": "Calculus", "section": "B",
                                       "schedule": "W", "time": "10:00-11:00"}},
                {"id": "c"}
            ]}"#,
        )
        .unwrap();

        let response = post_find_conflicts(Json(body)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let parsed: ConflictsResponse = body_json(response).await;
        assert!(parsed.has_conflicts);
        assert_eq!(parsed.conflicts.len(), 1);
        assert_eq!(parsed.conflicts[0].first.id, "a");
        assert_eq!(parsed.conflicts[0].second.id, "b");
    }

    #[tokio::test]
    async fn test_validate_registration_endpoint() {
        let request: RegistrationRequest =
            serde_json::from_str(r#"{"student_id": "1", "kind": "drop", "selections": [{"id": "x"}]}"#)
                .unwrap();
        let response = post_validate_registration(Json(request)).await;
        let check: RegistrationCheck = body_json(response).await;
        assert_eq!(check.incomplete, vec!["x".to_string()]);
        assert!(!check.ok);
    }
}
