//! Error types for schedule parsing.

use thiserror::Error;

/// Errors that can occur while parsing a course's meeting pattern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleParseError {
    /// The day pattern (e.g. "MTWTH") contained no days or an unknown token
    #[error("Malformed day pattern {pattern:?}: {reason}")]
    MalformedPattern { pattern: String, reason: String },

    /// The time range (e.g. "12:00-13:50") could not be read
    #[error("Malformed time range {range:?}: {reason}")]
    MalformedTimeRange { range: String, reason: String },
}

impl ScheduleParseError {
    /// Returns the short kind string used in logs and API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleParseError::MalformedPattern { .. } => "malformed-pattern",
            ScheduleParseError::MalformedTimeRange { .. } => "malformed-time-range",
        }
    }

    pub(crate) fn pattern(pattern: &str, reason: impl Into<String>) -> Self {
        ScheduleParseError::MalformedPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn time_range(range: &str, reason: impl Into<String>) -> Self {
        ScheduleParseError::MalformedTimeRange {
            range: range.to_string(),
            reason: reason.into(),
        }
    }
}
