//! Parsing of compact day patterns ("MTWTH") and time ranges ("12:00-13:50").

use super::error::ScheduleParseError;
use super::types::{Day, ParsedSchedule};
use regex::Regex;
use std::sync::LazyLock;

static TIME_RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,2}):(\d{2})\s*-\s*(\d{1,2}):(\d{2})\s*$").unwrap()
});

/// Parses a day pattern and a time range into a [`ParsedSchedule`].
///
/// # Arguments
/// * `day_pattern` - Concatenated day tokens, e.g. `"MTWTH"`
/// * `time_range` - `"HH:MM-HH:MM"` in 24-hour time
///
/// # Returns
/// * `Ok(ParsedSchedule)` - Days in pattern order and the minute interval
/// * `Err(ScheduleParseError)` - If either input is malformed
pub fn parse_schedule(
    day_pattern: &str,
    time_range: &str,
) -> Result<ParsedSchedule, ScheduleParseError> {
    let days = parse_day_pattern(day_pattern)?;
    let (start_time, end_time) = parse_time_range(time_range)?;

    Ok(ParsedSchedule {
        days,
        start_time,
        end_time,
    })
}

/// Splits a day pattern into day tokens.
///
/// "TH" and "SU" are read greedily so that Thursday never becomes
/// Tuesday followed by a stray "H".
pub fn parse_day_pattern(pattern: &str) -> Result<Vec<Day>, ScheduleParseError> {
    let normalized = pattern.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(ScheduleParseError::pattern(pattern, "no days given"));
    }

    let chars: Vec<char> = normalized.chars().collect();
    let mut days = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let next = chars.get(i + 1).copied();
        let (day, width) = match (chars[i], next) {
            ('T', Some('H')) => (Day::Thursday, 2),
            ('S', Some('U')) => (Day::Sunday, 2),
            ('M', _) => (Day::Monday, 1),
            ('T', _) => (Day::Tuesday, 1),
            ('W', _) => (Day::Wednesday, 1),
            ('F', _) => (Day::Friday, 1),
            ('S', _) => (Day::Saturday, 1),
            (other, _) => {
                return Err(ScheduleParseError::pattern(
                    pattern,
                    format!("unknown day token '{}' at position {}", other, i),
                ));
            }
        };
        days.push(day);
        i += width;
    }

    Ok(days)
}

/// Converts `"HH:MM-HH:MM"` into `(start, end)` minutes from midnight.
pub fn parse_time_range(range: &str) -> Result<(u32, u32), ScheduleParseError> {
    let caps = TIME_RANGE_REGEX
        .captures(range)
        .ok_or_else(|| ScheduleParseError::time_range(range, "expected HH:MM-HH:MM"))?;

    let field = |idx: usize| -> Result<u32, ScheduleParseError> {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or_else(|| ScheduleParseError::time_range(range, "missing time component"))
    };

    let start = clock_minutes(range, field(1)?, field(2)?)?;
    let end = clock_minutes(range, field(3)?, field(4)?)?;

    if start >= end {
        return Err(ScheduleParseError::time_range(
            range,
            "start time must be before end time",
        ));
    }

    Ok((start, end))
}

fn clock_minutes(range: &str, hours: u32, minutes: u32) -> Result<u32, ScheduleParseError> {
    if hours > 23 || minutes > 59 {
        return Err(ScheduleParseError::time_range(
            range,
            format!("{:02}:{:02} is not a valid 24-hour time", hours, minutes),
        ));
    }
    Ok(hours * 60 + minutes)
}
