//! Mapping of submitted grade-change forms onto report data.

use super::types::{GradeBreakdown, GradeBucket, GradeChangeForm, ReportData, SubmitterContext};
use crate::grades::{self, Curve, GradeRow};
use chrono::{DateTime, Local, TimeZone, Utc};
use rand::Rng;
use std::fmt::Display;
use tracing::debug;

/// Prefix of every change-of-grade report id.
pub const REPORT_ID_PREFIX: &str = "CGF";

/// Placeholder for signatures that have not been collected yet.
pub const PENDING: &str = "Pending";

/// Shown for a grade bucket with no matching row.
pub const NOT_APPLICABLE: &str = "N/A";

/// en-US style "1/15/2025, 2:05:09 PM".
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

const BASE36_UPPER: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const REPORT_ID_SUFFIX_LEN: usize = 6;

/// Builds a report id from a millisecond timestamp and a random source.
pub fn report_id_from_parts<R: Rng + ?Sized>(epoch_millis: i64, rng: &mut R) -> String {
    let suffix: String = (0..REPORT_ID_SUFFIX_LEN)
        .map(|_| BASE36_UPPER[rng.gen_range(0..BASE36_UPPER.len())] as char)
        .collect();
    format!("{}-{}-{}", REPORT_ID_PREFIX, epoch_millis, suffix)
}

/// Generates a fresh `CGF-<millis>-<XXXXXX>` report id.
pub fn generate_report_id() -> String {
    report_id_from_parts(Utc::now().timestamp_millis(), &mut rand::thread_rng())
}

/// Assigns a grade type label to a report bucket, ignoring case.
pub fn classify_grade_type(grade_type: &str) -> Option<GradeBucket> {
    let lower = grade_type.trim().to_lowercase();
    if lower.contains("quiz") {
        Some(GradeBucket::Quizzes)
    } else if lower.contains("midterm") {
        Some(GradeBucket::Midterm)
    } else if lower.contains("final") {
        Some(GradeBucket::Final)
    } else if lower.contains("test") || lower.contains("exam") {
        Some(GradeBucket::Tests)
    } else {
        None
    }
}

/// Places grade rows into the four report buckets.
///
/// Each bucket takes the first row that matches it. The first row matching no
/// bucket fills `quizzes` when nothing matched `quizzes`; any other unmatched
/// rows do not appear on the report.
pub fn bucket_rows(rows: &[GradeRow]) -> GradeBreakdown {
    let mut breakdown = GradeBreakdown::default();
    let mut first_unmatched: Option<&GradeRow> = None;

    for row in rows {
        match classify_grade_type(&row.grade_type) {
            Some(bucket) => {
                let slot = breakdown.slot_mut(bucket);
                if slot.is_none() {
                    *slot = Some(row.clone());
                }
            }
            None => {
                if first_unmatched.is_none() {
                    first_unmatched = Some(row);
                } else {
                    debug!(grade_type = %row.grade_type, "Grade row left off report");
                }
            }
        }
    }

    if breakdown.quizzes.is_none() {
        breakdown.quizzes = first_unmatched.cloned();
    } else if let Some(row) = first_unmatched {
        debug!(grade_type = %row.grade_type, "Grade row left off report");
    }

    breakdown
}

fn bucket_weight(row: Option<&GradeRow>) -> String {
    match row.map(|r| r.weight_percent.trim()) {
        Some(w) if !w.is_empty() => format!("{}%", w.trim_end_matches('%').trim_end()),
        _ => NOT_APPLICABLE.to_string(),
    }
}

fn bucket_score(row: Option<&GradeRow>) -> String {
    match row.map(|r| r.score.trim()) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NOT_APPLICABLE.to_string(),
    }
}

/// Turns submitted forms into [`ReportData`].
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    organization_name: String,
    timestamp_format: String,
}

impl ReportFormatter {
    pub fn new(organization_name: impl Into<String>, timestamp_format: impl Into<String>) -> Self {
        Self {
            organization_name: organization_name.into(),
            timestamp_format: timestamp_format.into(),
        }
    }

    /// Maps a form and its submitter onto report fields.
    ///
    /// # Arguments
    /// * `form` - The submitted grade-change form
    /// * `submitter` - Who is generating the report
    /// * `report_id` - Id to print on the report
    /// * `now` - Generation time, rendered with the configured format
    pub fn format<Tz>(
        &self,
        form: &GradeChangeForm,
        submitter: &SubmitterContext,
        report_id: String,
        now: &DateTime<Tz>,
    ) -> ReportData
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let generated_at = now.format(&self.timestamp_format).to_string();
        let breakdown = bucket_rows(&form.grade_rows);
        let summary = grades::summarize(&form.grade_rows, Curve::parse(&form.curve));

        let submitted_at = form
            .submitted_at
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| generated_at.clone());

        ReportData {
            organization_name: self.organization_name.clone(),
            report_title: "Change of Grade Form".to_string(),
            report_id,
            report_generated_at: generated_at,

            student_name: form.student_name.clone(),
            student_id: form.student_id.clone(),
            student_email: form.student_email.clone(),
            program: form.program.clone(),
            year_level: form.year_level.clone(),

            course_code: form.course_code.clone(),
            course_name: form.course_name.clone(),
            section: form.section.clone(),
            semester: form.semester.clone(),
            school_year: form.school_year.clone(),
            instructor_name: form.instructor_name.clone(),

            original_grade: form.original_grade.clone(),
            new_grade: form.new_grade.clone(),
            reason: form.reason.clone(),

            quizzes_weight: bucket_weight(breakdown.get(GradeBucket::Quizzes)),
            quizzes_score: bucket_score(breakdown.get(GradeBucket::Quizzes)),
            tests_weight: bucket_weight(breakdown.get(GradeBucket::Tests)),
            tests_score: bucket_score(breakdown.get(GradeBucket::Tests)),
            midterm_weight: bucket_weight(breakdown.get(GradeBucket::Midterm)),
            midterm_score: bucket_score(breakdown.get(GradeBucket::Midterm)),
            final_weight: bucket_weight(breakdown.get(GradeBucket::Final)),
            final_score: bucket_score(breakdown.get(GradeBucket::Final)),
            weighted_grade: format!("{:.2}", summary.weighted_grade),
            curve: format!("{}", summary.curve.value()),
            curved_grade: format!("{:.2}", summary.curved_grade),
            computed_letter_grade: summary.letter.to_string(),
            weights_valid: summary.weights_valid,
            has_curve: summary.curve.value() > 0.0,

            submitted_by_name: submitter.name.clone(),
            submitted_by_email: submitter.email.clone(),
            submitted_by_role: submitter.role.clone(),
            submitted_at,

            instructor_signature: PENDING.to_string(),
            chair_name: PENDING.to_string(),
            chair_signature: PENDING.to_string(),
            dean_name: PENDING.to_string(),
            dean_signature: PENDING.to_string(),
            registrar_name: PENDING.to_string(),
            registrar_signature: PENDING.to_string(),
            approval_status: PENDING.to_string(),
        }
    }

    /// Formats a report stamped with the current local time and a new id.
    pub fn to_report_data(&self, form: &GradeChangeForm, submitter: &SubmitterContext) -> ReportData {
        self.format(form, submitter, generate_report_id(), &Local::now())
    }
}
