/// Types for grade-change forms and the report data rendered from them
use crate::grades::GradeRow;
use serde::{Deserialize, Serialize};

/// A submitted change-of-grade form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeChangeForm {
    pub student_name: String,
    pub student_id: String,
    pub student_email: String,
    pub program: String,
    pub year_level: String,
    pub course_code: String,
    pub course_name: String,
    pub section: String,
    pub semester: String,
    pub school_year: String,
    pub instructor_name: String,
    pub original_grade: String,
    pub new_grade: String,
    pub reason: String,
    pub grade_rows: Vec<GradeRow>,
    /// Curve as typed on the form
    #[serde(deserialize_with = "crate::grades::text_or_number")]
    pub curve: String,
    pub submitted_at: Option<String>,
}

/// The signed-in user generating a report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmitterContext {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Named grade buckets printed on the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeBucket {
    Quizzes,
    Tests,
    Midterm,
    Final,
}

/// Grade rows assigned to the four report buckets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradeBreakdown {
    pub quizzes: Option<GradeRow>,
    pub tests: Option<GradeRow>,
    pub midterm: Option<GradeRow>,
    pub final_exam: Option<GradeRow>,
}

impl GradeBreakdown {
    pub fn get(&self, bucket: GradeBucket) -> Option<&GradeRow> {
        match bucket {
            GradeBucket::Quizzes => self.quizzes.as_ref(),
            GradeBucket::Tests => self.tests.as_ref(),
            GradeBucket::Midterm => self.midterm.as_ref(),
            GradeBucket::Final => self.final_exam.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, bucket: GradeBucket) -> &mut Option<GradeRow> {
        match bucket {
            GradeBucket::Quizzes => &mut self.quizzes,
            GradeBucket::Tests => &mut self.tests,
            GradeBucket::Midterm => &mut self.midterm,
            GradeBucket::Final => &mut self.final_exam,
        }
    }
}

/// Flat, template-ready projection of a grade-change form.
///
/// Field names are the `{{placeholder}}` keys used by the report template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    // Header
    pub organization_name: String,
    pub report_title: String,
    pub report_id: String,
    pub report_generated_at: String,

    // Student
    pub student_name: String,
    pub student_id: String,
    pub student_email: String,
    pub program: String,
    pub year_level: String,

    // Course
    pub course_code: String,
    pub course_name: String,
    pub section: String,
    pub semester: String,
    pub school_year: String,
    pub instructor_name: String,

    // Requested change
    pub original_grade: String,
    pub new_grade: String,
    pub reason: String,

    // Breakdown
    pub quizzes_weight: String,
    pub quizzes_score: String,
    pub tests_weight: String,
    pub tests_score: String,
    pub midterm_weight: String,
    pub midterm_score: String,
    pub final_weight: String,
    pub final_score: String,
    pub weighted_grade: String,
    pub curve: String,
    pub curved_grade: String,
    pub computed_letter_grade: String,
    pub weights_valid: bool,
    pub has_curve: bool,

    // Submission
    pub submitted_by_name: String,
    pub submitted_by_email: String,
    pub submitted_by_role: String,
    pub submitted_at: String,

    // Signatures
    pub instructor_signature: String,
    pub chair_name: String,
    pub chair_signature: String,
    pub dean_name: String,
    pub dean_signature: String,
    pub registrar_name: String,
    pub registrar_signature: String,
    pub approval_status: String,
}
