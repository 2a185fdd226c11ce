//! Short-lived storage of rendered reports, so a report can be downloaded
//! after it is generated.

use super::types::ReportData;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// A report rendered to HTML, ready for download.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub report_id: String,
    pub data: ReportData,
    pub html: String,
}

impl RenderedReport {
    /// Email of the user who generated the report.
    pub fn submitted_by(&self) -> &str {
        &self.data.submitted_by_email
    }
}

#[derive(Debug, Clone)]
struct StoredReport {
    report: RenderedReport,
    expires_at: DateTime<Utc>,
}

/// Listing entry for a stored report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportListing {
    pub report_id: String,
    pub student_name: String,
    pub course_code: String,
    pub expires_at: DateTime<Utc>,
}

/// Counts for the report cache stats endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub stored: usize,
    pub live: usize,
    pub expired: usize,
    /// Distinct submitters with a live report
    pub submitters: usize,
}

/// Rendered reports keyed by report id. Each report is kept for a fixed
/// time after it is generated and is dropped on the first fetch after that.
pub struct ReportCache {
    reports: DashMap<String, StoredReport>,
    ttl: Duration,
}

impl ReportCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            reports: DashMap::new(),
            ttl,
        }
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Stores a report and returns when it will expire.
    pub fn insert(&self, report: RenderedReport) -> DateTime<Utc> {
        self.insert_at(report, Utc::now())
    }

    fn insert_at(&self, report: RenderedReport, now: DateTime<Utc>) -> DateTime<Utc> {
        let expires_at = self.expiry_from(now);
        self.reports.insert(
            report.report_id.clone(),
            StoredReport { report, expires_at },
        );
        expires_at
    }

    /// Returns the report if it has not expired. An expired report is removed.
    pub fn get(&self, report_id: &str) -> Option<RenderedReport> {
        self.get_at(report_id, Utc::now())
    }

    fn get_at(&self, report_id: &str, now: DateTime<Utc>) -> Option<RenderedReport> {
        let stored = self.reports.get(report_id)?;
        if now < stored.expires_at {
            return Some(stored.report.clone());
        }

        drop(stored);
        self.reports.remove(report_id);
        debug!(report_id, "Report expired before download");
        None
    }

    /// Live reports generated by `email`, oldest expiry first.
    pub fn list_for_submitter(&self, email: &str) -> Vec<ReportListing> {
        let now = Utc::now();
        let mut listings: Vec<ReportListing> = self
            .reports
            .iter()
            .filter(|s| now < s.expires_at && s.report.submitted_by() == email)
            .map(|s| ReportListing {
                report_id: s.report.report_id.clone(),
                student_name: s.report.data.student_name.clone(),
                course_code: s.report.data.course_code.clone(),
                expires_at: s.expires_at,
            })
            .collect();
        listings.sort_by(|a, b| {
            a.expires_at
                .cmp(&b.expires_at)
                .then_with(|| a.report_id.cmp(&b.report_id))
        });
        listings
    }

    /// Drops a report before it expires. Returns true if it was stored.
    pub fn invalidate(&self, report_id: &str) -> bool {
        self.reports.remove(report_id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Removes every expired report and returns how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.reports.len();
        self.reports.retain(|_, s| now < s.expires_at);
        let removed = before.saturating_sub(self.reports.len());
        if removed > 0 {
            debug!(removed, "Swept expired reports");
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let mut live = 0;
        let mut submitters = std::collections::HashSet::new();
        for stored in self.reports.iter() {
            if now < stored.expires_at {
                live += 1;
                submitters.insert(stored.report.submitted_by().to_string());
            }
        }

        let stored = self.reports.len();
        CacheStats {
            stored,
            live,
            expired: stored.saturating_sub(live),
            submitters: submitters.len(),
        }
    }
}
