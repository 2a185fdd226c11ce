/// Types for course offerings and their meeting schedules
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single meeting day token as it appears in a day pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    #[serde(rename = "M")]
    Monday,
    #[serde(rename = "T")]
    Tuesday,
    #[serde(rename = "W")]
    Wednesday,
    #[serde(rename = "TH")]
    Thursday,
    #[serde(rename = "F")]
    Friday,
    #[serde(rename = "S")]
    Saturday,
    #[serde(rename = "SU")]
    Sunday,
}

impl Day {
    /// Returns the token used for this day in day patterns.
    pub fn token(&self) -> &'static str {
        match self {
            Day::Monday => "M",
            Day::Tuesday => "T",
            Day::Wednesday => "W",
            Day::Thursday => "TH",
            Day::Friday => "F",
            Day::Saturday => "S",
            Day::Sunday => "SU",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A meeting pattern reduced to days and a half-open minute interval.
///
/// `start_time` and `end_time` are minutes from midnight, with
/// `start_time < end_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSchedule {
    pub days: Vec<Day>,
    pub start_time: u32,
    pub end_time: u32,
}

impl ParsedSchedule {
    /// Returns true if both schedules meet on at least one common day.
    pub fn shares_day_with(&self, other: &ParsedSchedule) -> bool {
        self.days.iter().any(|d| other.days.contains(d))
    }

    /// Returns true if the `[start, end)` intervals overlap.
    pub fn overlaps_time_with(&self, other: &ParsedSchedule) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

/// A course offering as returned by the registrar API.
///
/// `(course_code, course_name, section)` identifies an offering within a
/// semester's data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Course {
    pub course_code: String,
    pub course_name: String,
    pub section: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub credits: f32,
    #[serde(default)]
    pub room: String,
    /// Day pattern, e.g. "MTWTH"
    pub schedule: String,
    /// Time range, e.g. "12:00-13:50"
    pub time: String,
    #[serde(default)]
    pub school: String,
}

/// One course card on a registration or drop form.
///
/// `course` stays `None` until the code, name and section have all been
/// picked and resolved against the course list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CourseSelection {
    pub id: String,
    #[serde(default)]
    pub course_code: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub course: Option<Course>,
}

impl CourseSelection {
    /// Returns true once the selection points at an actual offering.
    pub fn is_resolved(&self) -> bool {
        self.course.is_some()
    }
}

/// Position and identifier of a selection inside the submitted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRef {
    pub index: usize,
    pub id: String,
}

/// Two selections whose meeting times collide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictPair {
    pub first: SelectionRef,
    pub second: SelectionRef,
    pub first_course: Course,
    pub second_course: Course,
}
