/// Change-of-grade report generation
mod cache;
mod formatter;
mod template;
mod types;

pub use cache::{CacheStats, RenderedReport, ReportCache, ReportListing};
pub use formatter::{
    bucket_rows, classify_grade_type, generate_report_id, report_id_from_parts, ReportFormatter,
    DEFAULT_TIMESTAMP_FORMAT, NOT_APPLICABLE, PENDING, REPORT_ID_PREFIX,
};
pub use template::{render, render_report, GRADE_CHANGE_TEMPLATE};
pub use types::*;

use tracing::info;

/// Formats a form, renders it into `template` and returns the result.
pub fn generate_grade_change_report(
    formatter: &ReportFormatter,
    template: &str,
    form: &GradeChangeForm,
    submitter: &SubmitterContext,
) -> RenderedReport {
    let data = formatter.to_report_data(form, submitter);
    let html = render_report(template, &data);

    info!(
        report_id = %data.report_id,
        course = %data.course_code,
        submitted_by = %submitter.email,
        "Generated grade change report"
    );

    RenderedReport {
        report_id: data.report_id.clone(),
        data,
        html,
    }
}
