/// Weighted grade computation and letter banding
use super::types::{Curve, GradeRow, GradeSummary, LetterGrade};

/// Allowed slack when checking that weights add up to 100.
pub const WEIGHT_TOLERANCE: f64 = 0.01;

/// Lower bounds (inclusive) of each letter band, evaluated top-down.
const LETTER_BANDS: [(f64, LetterGrade); 7] = [
    (90.0, LetterGrade::A),
    (85.0, LetterGrade::BPlus),
    (80.0, LetterGrade::B),
    (75.0, LetterGrade::CPlus),
    (70.0, LetterGrade::C),
    (65.0, LetterGrade::DPlus),
    (60.0, LetterGrade::D),
];

/// Reads a typed number, treating anything unreadable as zero.
///
/// A trailing `%` is ignored so "30%" and "30" mean the same weight.
pub fn parse_lenient(text: &str) -> f64 {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Computes `Σ(score·weight) / Σ(weight)`.
///
/// Rows with zero weight contribute nothing. If the weights sum to zero
/// (including an empty list) or the sums overflow, the result is 0.
pub fn compute_weighted_grade(rows: &[GradeRow]) -> f64 {
    let (weighted_sum, weight_sum) = rows.iter().fold((0.0, 0.0), |(ws, w), row| {
        let weight = parse_lenient(&row.weight_percent);
        let score = parse_lenient(&row.score);
        (ws + score * weight, w + weight)
    });

    if weight_sum > 0.0 {
        finite_or_zero(weighted_sum / weight_sum)
    } else {
        0.0
    }
}

/// Sum of all row weights in percent. An overflowing sum reads as 0.
pub fn weights_total(rows: &[GradeRow]) -> f64 {
    finite_or_zero(rows.iter().map(|r| parse_lenient(&r.weight_percent)).sum())
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Returns true if the weights add up to 100 within [`WEIGHT_TOLERANCE`].
pub fn weights_valid(rows: &[GradeRow]) -> bool {
    (weights_total(rows) - 100.0).abs() <= WEIGHT_TOLERANCE
}

/// Advisory message shown next to the grade rows when weights are off.
pub fn weight_warning(rows: &[GradeRow]) -> Option<String> {
    if weights_valid(rows) {
        None
    } else {
        Some(format!(
            "Grade weights must add up to 100% (currently {:.2}%)",
            weights_total(rows)
        ))
    }
}

/// Maps a (curved) numeric grade to its letter band.
pub fn letter_grade(grade: f64) -> LetterGrade {
    LETTER_BANDS
        .iter()
        .find(|(floor, _)| grade >= *floor)
        .map(|(_, letter)| *letter)
        .unwrap_or(LetterGrade::F)
}

/// Computes the weighted grade, applies the curve and bands the result.
pub fn summarize(rows: &[GradeRow], curve: Curve) -> GradeSummary {
    let weighted_grade = compute_weighted_grade(rows);
    let curved_grade = finite_or_zero(curve.apply(weighted_grade));

    GradeSummary {
        weighted_grade,
        curve,
        curved_grade,
        letter: letter_grade(curved_grade),
        weights_total: weights_total(rows),
        weights_valid: weights_valid(rows),
        weight_message: weight_warning(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[(&str, &str, &str)]) -> Vec<GradeRow> {
        data.iter()
            .map(|(t, w, s)| GradeRow::new(*t, *w, *s))
            .collect()
    }

    #[test]
    fn test_weighted_grade_with_curve() {
        let rows = rows(&[("Midterm", "50%", "80"), ("Final", "50%", "90")]);
        assert_eq!(compute_weighted_grade(&rows), 85.0);

        let summary = summarize(&rows, Curve::new(5.0));
        assert_eq!(summary.curved_grade, 90.0);
        assert_eq!(summary.letter, LetterGrade::A);
        assert!(summary.weights_valid);
        assert_eq!(summary.weight_message, None);
    }

    #[test]
    fn test_weighted_mean_not_simple_average() {
        let rows = rows(&[("Quizzes", "20", "100"), ("Final", "80", "50")]);
        assert!((compute_weighted_grade(&rows) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_rows() {
        assert_eq!(compute_weighted_grade(&[]), 0.0);
        assert!(!weights_valid(&[]));
        assert!(weight_warning(&[]).is_some());
    }

    #[test]
    fn test_non_numeric_input_is_zero() {
        let rows = rows(&[("Quizzes", "abc", "90"), ("Tests", "100", ""), ("Other", "", "x")]);
        assert_eq!(compute_weighted_grade(&rows), 0.0);
        assert_eq!(weights_total(&rows), 100.0);
    }

    #[test]
    fn test_zero_weight_rows_ignored() {
        let rows = rows(&[("Quizzes", "0", "10"), ("Final", "100", "77")]);
        assert_eq!(compute_weighted_grade(&rows), 77.0);
    }

    #[test]
    fn test_weight_tolerance() {
        let ok = rows(&[("A", "33.33", "0"), ("B", "33.33", "0"), ("C", "33.34", "0")]);
        assert!(weights_valid(&ok));
        let off = rows(&[("A", "50", "0"), ("B", "49.9", "0")]);
        assert!(!weights_valid(&off));
    }

    #[test]
    fn test_letter_grade_boundaries() {
        assert_eq!(letter_grade(90.0).as_str(), "A");
        assert_eq!(letter_grade(89.999).as_str(), "B+");
        assert_eq!(letter_grade(85.0).as_str(), "B+");
        assert_eq!(letter_grade(80.0).as_str(), "B");
        assert_eq!(letter_grade(75.0).as_str(), "C+");
        assert_eq!(letter_grade(70.0).as_str(), "C");
        assert_eq!(letter_grade(65.0).as_str(), "D+");
        assert_eq!(letter_grade(60.0).as_str(), "D");
        assert_eq!(letter_grade(59.99).as_str(), "F");
        assert_eq!(letter_grade(120.0).as_str(), "A");
    }

    #[test]
    fn test_curve_controls() {
        let curve = Curve::default().increment().increment();
        assert_eq!(curve.value(), 2.0);
        assert_eq!(curve.decrement().decrement().decrement().value(), 0.0);
        assert_eq!(Curve::parse("2.5").value(), 2.5);
        assert_eq!(Curve::parse("").value(), 0.0);
        assert_eq!(Curve::parse("abc").value(), 0.0);
        assert_eq!(Curve::parse("-3").value(), 0.0);
    }

    #[test]
    fn test_huge_values_stay_finite() {
        let rows = rows(&[("Final", "1e308", "1e308"), ("Midterm", "1e308", "1e308")]);
        assert_eq!(compute_weighted_grade(&rows), 0.0);
        assert_eq!(weights_total(&rows), 0.0);

        let summary = summarize(&rows, Curve::new(f64::MAX));
        assert!(summary.curved_grade.is_finite());
        assert!(!summary.weights_valid);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["weighted_grade"], 0.0);
        assert_eq!(json["weights_total"], 0.0);
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(parse_lenient(" 30% "), 30.0);
        assert_eq!(parse_lenient("12.5"), 12.5);
        assert_eq!(parse_lenient("NaN"), 0.0);
        assert_eq!(parse_lenient("inf"), 0.0);
    }

    #[test]
    fn test_rows_deserialize_from_numbers() {
        let rows: Vec<GradeRow> = serde_json::from_str(
            r#"[{"grade_type":"Midterm","weight_percent":"50%","score":80},
                {"grade_type":"Final","weight_percent":50,"score":null}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].score, "80");
        assert_eq!(rows[1].weight_percent, "50");
        assert_eq!(rows[1].score, "");
    }
}
