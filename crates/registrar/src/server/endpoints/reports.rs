//! Grade change report endpoints. All routes here sit behind the session middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::grades;
use crate::report::{generate_grade_change_report, GradeChangeForm, ReportData};
use crate::server::types::ApiErrorType;
use crate::session::SessionContext;
use crate::types::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportCreated {
    pub report_id: String,
    /// The report can be downloaded until this time
    pub expires_at: DateTime<Utc>,
    pub data: ReportData,
}

/// POST /reports/grade_change
///
/// Renders a change-of-grade report for the signed-in user and caches the HTML.
/// Submission is refused while the grade weights do not add up to 100.
pub async fn post_grade_change_report(
    State(s): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Json(form): Json<GradeChangeForm>,
) -> Response {
    if let Some(message) = grades::weight_warning(&form.grade_rows) {
        warn!(
            session = %session.key,
            course = %form.course_code,
            "Rejected grade change report with invalid weights"
        );
        return ApiErrorType::from((
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid grade weights",
            Some(message),
        ))
        .into_response();
    }

    let report = generate_grade_change_report(&s.formatter, &s.template, &form, &session.user);
    let report_id = report.report_id.clone();
    let data = report.data.clone();
    let expires_at = s.reports.insert(report);
    let created = ReportCreated {
        report_id,
        expires_at,
        data,
    };

    (StatusCode::CREATED, Json(created)).into_response()
}

/// GET /reports
/// Lists the signed-in user's reports that can still be downloaded
pub async fn get_my_reports(
    State(s): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    let listings = s.reports.list_for_submitter(&session.user.email);
    (StatusCode::OK, Json(listings)).into_response()
}

/// GET /reports/:report_id
/// Returns a previously generated report as HTML
pub async fn get_report(
    Path(report_id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /reports/{}", report_id);

    match s.reports.get(&report_id) {
        Some(report) => (StatusCode::OK, Html(report.html)).into_response(),
        None => ApiErrorType::from((
            StatusCode::NOT_FOUND,
            "Report not found or expired",
            Some(report_id),
        ))
        .into_response(),
    }
}
