//! `{{placeholder}}` substitution for report templates.

use super::types::ReportData;
use html_escape::encode_safe;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Built-in change-of-grade report template.
pub const GRADE_CHANGE_TEMPLATE: &str = include_str!("templates/grade_change.html");

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").unwrap());

impl ReportData {
    /// Flattens the report into placeholder keys and display strings.
    ///
    /// Booleans render as "Yes"/"No".
    pub fn field_map(&self) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();

        if let Ok(Value::Object(map)) = serde_json::to_value(self) {
            for (key, value) in map {
                let text = match value {
                    Value::String(s) => s,
                    Value::Bool(true) => "Yes".to_string(),
                    Value::Bool(false) => "No".to_string(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                fields.insert(key, text);
            }
        }

        fields
    }
}

/// Replaces every `{{key}}` in `template` with the HTML-escaped field value.
///
/// Placeholders with no matching field are left as they are. Substituted
/// values are not scanned again, so a value containing `{{...}}` stays literal.
pub fn render(template: &str, fields: &BTreeMap<String, String>) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| match fields.get(&caps[1]) {
            Some(value) => encode_safe(value).into_owned(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Renders report data into a template.
pub fn render_report(template: &str, data: &ReportData) -> String {
    render(template, &data.field_map())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{GradeChangeForm, ReportFormatter, SubmitterContext, DEFAULT_TIMESTAMP_FORMAT};

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        let out = render(
            "<p>{{name}}</p><p>{{ name }}</p><p>{{id}}</p>",
            &fields(&[("name", "Ana"), ("id", "7")]),
        );
        assert_eq!(out, "<p>Ana</p><p>Ana</p><p>7</p>");
    }

    #[test]
    fn test_render_escapes_values() {
        let out = render(
            "<td>{{reason}}</td>",
            &fields(&[("reason", "<script>alert('x')</script> & more")]),
        );
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
        assert!(out.contains("&amp; more"));
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let out = render("{{known}} {{unknown}}", &fields(&[("known", "ok")]));
        assert_eq!(out, "ok {{unknown}}");
    }

    #[test]
    fn test_values_are_not_expanded_twice() {
        let out = render(
            "{{a}}|{{b}}",
            &fields(&[("a", "{{b}}"), ("b", "secret")]),
        );
        assert_eq!(out, "{{b}}|secret");
    }

    #[test]
    fn test_builtin_template_is_fully_filled() {
        let formatter = ReportFormatter::new("State University", DEFAULT_TIMESTAMP_FORMAT);
        let form = GradeChangeForm {
            student_name: "Maria <b>Santos</b>".to_string(),
            ..Default::default()
        };
        let data = formatter.to_report_data(&form, &SubmitterContext::default());
        let html = render_report(GRADE_CHANGE_TEMPLATE, &data);

        assert!(!PLACEHOLDER_REGEX.is_match(&html));
        assert!(html.contains(&data.report_id));
        assert!(html.contains("Maria &lt;b&gt;Santos&lt;"));
        assert!(!html.contains("<b>Santos"));
    }

    #[test]
    fn test_field_map_booleans() {
        let formatter = ReportFormatter::new("X", DEFAULT_TIMESTAMP_FORMAT);
        let data = formatter.to_report_data(&GradeChangeForm::default(), &SubmitterContext::default());
        let map = data.field_map();
        assert_eq!(map.get("weights_valid").map(String::as_str), Some("No"));
        assert_eq!(map.get("has_curve").map(String::as_str), Some("No"));
        assert_eq!(map.get("approval_status").map(String::as_str), Some("Pending"));
    }
}
