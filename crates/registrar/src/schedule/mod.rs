//! Course meeting schedules: parsing and conflict detection.

mod conflict;
mod error;
mod parser;
mod types;

pub use conflict::{check_courses, find_conflicts, has_conflicts, schedules_overlap, ConflictCheck};
pub use error::ScheduleParseError;
pub use parser::{parse_day_pattern, parse_schedule, parse_time_range};
pub use types::*;
