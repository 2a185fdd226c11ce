use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::grades::{self, Curve, GradeRow};

#[derive(Debug, Deserialize)]
pub struct ComputeGradeBody {
    #[serde(default)]
    pub rows: Vec<GradeRow>,
    /// Curve as typed; empty or invalid means no curve
    #[serde(default, deserialize_with = "grades::text_or_number")]
    pub curve: String,
}

/// POST /grades/compute
/// Returns the weighted grade, curved grade, letter and weight check
pub async fn post_compute_grade(Json(body): Json<ComputeGradeBody>) -> Response {
    let summary = grades::summarize(&body.rows, Curve::parse(&body.curve));
    (StatusCode::OK, Json(summary)).into_response()
}
