/// Types for grade components, curves and letter grades
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One component of a course grade, kept as entered on the form.
///
/// Values stay textual so half-typed input ("8", "50%", "") is representable;
/// they are coerced to numbers only when a grade is computed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GradeRow {
    /// e.g. "Quizzes", "Midterm"
    #[serde(default)]
    pub grade_type: String,
    /// e.g. "30%" or "30"
    #[serde(default, deserialize_with = "text_or_number")]
    pub weight_percent: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub score: String,
}

impl GradeRow {
    pub fn new(
        grade_type: impl Into<String>,
        weight_percent: impl Into<String>,
        score: impl Into<String>,
    ) -> Self {
        Self {
            grade_type: grade_type.into(),
            weight_percent: weight_percent.into(),
            score: score.into(),
        }
    }
}

/// Accepts JSON strings, numbers or null for a textual field.
pub(crate) fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Letter grade bands, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

impl LetterGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-negative additive adjustment applied before letter banding.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curve(f64);

impl Curve {
    /// Creates a curve, clamping negative or non-finite values to zero.
    pub fn new(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Curve(value)
        } else {
            Curve(0.0)
        }
    }

    /// Reads a free-typed curve. Empty, invalid or negative input resets to zero.
    pub fn parse(input: &str) -> Self {
        input
            .trim()
            .parse::<f64>()
            .map(Curve::new)
            .unwrap_or_default()
    }

    /// One step up, as with the increment control.
    pub fn increment(self) -> Self {
        Curve::new(self.0 + 1.0)
    }

    /// One step down, never below zero.
    pub fn decrement(self) -> Self {
        Curve::new(self.0 - 1.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Adds the curve to a computed grade.
    pub fn apply(&self, grade: f64) -> f64 {
        grade + self.0
    }
}

/// Everything the grade panel shows for a set of rows and a curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeSummary {
    pub weighted_grade: f64,
    pub curve: Curve,
    pub curved_grade: f64,
    pub letter: LetterGrade,
    pub weights_total: f64,
    pub weights_valid: bool,
    /// Advisory message when the weights do not add up to 100
    pub weight_message: Option<String>,
}
