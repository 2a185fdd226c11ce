//! Pairwise time-conflict detection over course selections.

use super::error::ScheduleParseError;
use super::parser::parse_schedule;
use super::types::{ConflictPair, Course, CourseSelection, ParsedSchedule, SelectionRef};
use tracing::{debug, warn};

/// Outcome of comparing two courses' meeting patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictCheck {
    /// The courses share a day and their times overlap
    Conflict,
    /// The courses can both be taken
    Clear,
    /// One of the schedules could not be parsed
    Unparseable(ScheduleParseError),
}

impl ConflictCheck {
    /// Fail-open reading: only a confirmed overlap counts as a conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ConflictCheck::Conflict)
    }

    /// Returns true if the comparison could not be made.
    pub fn is_unparseable(&self) -> bool {
        matches!(self, ConflictCheck::Unparseable(_))
    }
}

/// Returns true if two parsed schedules meet on a common day at overlapping times.
///
/// Intervals are half-open, so a class ending at 10:00 does not collide with
/// one starting at 10:00.
pub fn schedules_overlap(a: &ParsedSchedule, b: &ParsedSchedule) -> bool {
    a.shares_day_with(b) && a.overlaps_time_with(b)
}

/// Compares the meeting patterns of two courses.
pub fn check_courses(a: &Course, b: &Course) -> ConflictCheck {
    let parsed_a = match parse_schedule(&a.schedule, &a.time) {
        Ok(p) => p,
        Err(e) => return ConflictCheck::Unparseable(e),
    };
    let parsed_b = match parse_schedule(&b.schedule, &b.time) {
        Ok(p) => p,
        Err(e) => return ConflictCheck::Unparseable(e),
    };

    if schedules_overlap(&parsed_a, &parsed_b) {
        ConflictCheck::Conflict
    } else {
        ConflictCheck::Clear
    }
}

/// Finds every pair of resolved selections whose schedules collide.
///
/// Selections without a resolved course are skipped. Pairs are reported in
/// traversal order (outer index ascending, then inner index ascending). A pair
/// whose schedules cannot be parsed is logged and treated as no conflict.
///
/// # Arguments
/// * `selections` - The course cards currently on the form
///
/// # Returns
/// * The conflicting pairs, possibly empty
pub fn find_conflicts(selections: &[CourseSelection]) -> Vec<ConflictPair> {
    let resolved: Vec<(usize, &CourseSelection, &Course)> = selections
        .iter()
        .enumerate()
        .filter_map(|(idx, sel)| sel.course.as_ref().map(|course| (idx, sel, course)))
        .collect();

    let mut conflicts = Vec::new();

    for (i, (idx_a, sel_a, course_a)) in resolved.iter().enumerate() {
        for (idx_b, sel_b, course_b) in resolved.iter().skip(i + 1) {
            match check_courses(course_a, course_b) {
                ConflictCheck::Conflict => {
                    debug!(
                        first = %sel_a.id,
                        second = %sel_b.id,
                        "Schedule conflict detected"
                    );
                    conflicts.push(ConflictPair {
                        first: SelectionRef {
                            index: *idx_a,
                            id: sel_a.id.clone(),
                        },
                        second: SelectionRef {
                            index: *idx_b,
                            id: sel_b.id.clone(),
                        },
                        first_course: (*course_a).clone(),
                        second_course: (*course_b).clone(),
                    });
                }
                ConflictCheck::Clear => {}
                ConflictCheck::Unparseable(e) => {
                    warn!(
                        kind = "schedule-parse-failed",
                        first = %sel_a.id,
                        second = %sel_b.id,
                        error = %e,
                        "Could not compare schedules, treating as no conflict"
                    );
                }
            }
        }
    }

    conflicts
}

/// Returns true if any two resolved selections collide.
pub fn has_conflicts(selections: &[CourseSelection]) -> bool {
    !find_conflicts(selections).is_empty()
}
