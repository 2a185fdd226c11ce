/// Validation of course registration and drop requests
use crate::schedule::{find_conflicts, ConflictPair, CourseSelection};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Whether courses are being added or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationKind {
    Add,
    Drop,
}

/// A registration or drop form as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    #[serde(default)]
    pub student_id: String,
    pub kind: RegistrationKind,
    #[serde(default)]
    pub selections: Vec<CourseSelection>,
}

/// Result of checking a registration request before submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationCheck {
    pub conflicts: Vec<ConflictPair>,
    /// Ids of course cards that have not been resolved to an offering
    pub incomplete: Vec<String>,
    /// True when there are no conflicts, no incomplete cards and at least one course
    pub ok: bool,
}

/// Checks a registration request for schedule conflicts and unfinished cards.
///
/// Drop requests never report conflicts: removing courses cannot create one.
pub fn validate_registration(request: &RegistrationRequest) -> RegistrationCheck {
    let incomplete: Vec<String> = request
        .selections
        .iter()
        .filter(|s| !s.is_resolved())
        .map(|s| s.id.clone())
        .collect();

    let conflicts = match request.kind {
        RegistrationKind::Add => find_conflicts(&request.selections),
        RegistrationKind::Drop => Vec::new(),
    };

    let has_courses = request.selections.iter().any(|s| s.is_resolved());
    let ok = conflicts.is_empty() && incomplete.is_empty() && has_courses;

    info!(
        student_id = %request.student_id,
        kind = ?request.kind,
        courses = request.selections.len(),
        conflicts = conflicts.len(),
        incomplete = incomplete.len(),
        "Validated registration request"
    );

    RegistrationCheck {
        conflicts,
        incomplete,
        ok,
    }
}
