//! Extraction of the JSON envelope from model output
//!
//! Models often wrap the requested JSON in prose or code fences. The envelope
//! is taken greedily from the first `{` to the last `}`.

use once_cell::sync::Lazy;
use regex::Regex;
use reframe_common::models::{Analysis, Reflection};
use serde::Deserialize;

use super::CoachError;

static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| {
    // (?s) lets `.` cross newlines
    Regex::new(r"(?s)\{.*\}").expect("JSON object pattern is valid")
});

/// The outermost `{...}` span of `text`, if any
pub fn extract_json_object(text: &str) -> Option<&str> {
    JSON_OBJECT.find(text).map(|m| m.as_str())
}

// Fields are optional here so a missing key is reported by name rather than
// as a generic deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    root_cause: Option<String>,
    quick_fix: Option<String>,
    new_habit: Option<String>,
    mindset_shift: Option<String>,
    long_term_advice: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReflection {
    reflection: Option<String>,
    micro_advice: Option<String>,
}

fn required(value: Option<String>, name: &'static str) -> Result<String, CoachError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(CoachError::MissingField(name))
}

fn decode<'a, T: Deserialize<'a>>(text: &'a str) -> Result<T, CoachError> {
    let json = extract_json_object(text)
        .ok_or_else(|| CoachError::InvalidFormat("no JSON object in response".to_string()))?;
    serde_json::from_str(json).map_err(|e| CoachError::InvalidFormat(e.to_string()))
}

/// Parse a problem analysis; all five fields must be present and non-empty
pub fn parse_analysis(text: &str) -> Result<Analysis, CoachError> {
    let raw: RawAnalysis = decode(text)?;

    Ok(Analysis {
        root_cause: required(raw.root_cause, "rootCause")?,
        quick_fix: required(raw.quick_fix, "quickFix")?,
        new_habit: required(raw.new_habit, "newHabit")?,
        mindset_shift: required(raw.mindset_shift, "mindsetShift")?,
        long_term_advice: required(raw.long_term_advice, "longTermAdvice")?,
    })
}

/// Parse a journal reflection; both fields must be present and non-empty
pub fn parse_reflection(text: &str) -> Result<Reflection, CoachError> {
    let raw: RawReflection = decode(text)?;

    Ok(Reflection {
        reflection: required(raw.reflection, "reflection")?,
        micro_advice: required(raw.micro_advice, "microAdvice")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "rootCause": "Habit loops.",
        "quickFix": "Pause for 90 seconds.",
        "newHabit": "Morning check-in.",
        "mindsetShift": "Treat it as data.",
        "longTermAdvice": "Review every two weeks."
    }"#;

    #[test]
    fn test_extract_from_code_fence() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json_object(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_extract_is_greedy_to_last_brace() {
        let text = "x {\"a\": {\"b\": 2}} trailing } end";
        assert_eq!(extract_json_object(text), Some("{\"a\": {\"b\": 2}} trailing }"));
    }

    #[test]
    fn test_extract_none_without_braces() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_parse_analysis_full() {
        let analysis = parse_analysis(FULL).unwrap();
        assert_eq!(analysis.root_cause, "Habit loops.");
        assert_eq!(analysis.quick_fix, "Pause for 90 seconds.");
        assert_eq!(analysis.long_term_advice, "Review every two weeks.");
    }

    #[test]
    fn test_parse_analysis_ignores_extra_fields() {
        let text = r#"{"rootCause":"a","quickFix":"b","newHabit":"c","mindsetShift":"d","longTermAdvice":"e","score":9}"#;
        assert!(parse_analysis(text).is_ok());
    }

    #[test]
    fn test_parse_analysis_missing_field_named() {
        let text = r#"{"rootCause":"a","quickFix":"b","newHabit":"c","longTermAdvice":"e"}"#;
        match parse_analysis(text) {
            Err(CoachError::MissingField(name)) => assert_eq!(name, "mindsetShift"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_analysis_empty_field_rejected() {
        let text = r#"{"rootCause":"","quickFix":"b","newHabit":"c","mindsetShift":"d","longTermAdvice":"e"}"#;
        assert!(matches!(
            parse_analysis(text),
            Err(CoachError::MissingField("rootCause"))
        ));
    }

    #[test]
    fn test_parse_analysis_whitespace_field_accepted() {
        let text = r#"{"rootCause":" ","quickFix":"b","newHabit":"c","mindsetShift":"d","longTermAdvice":"e"}"#;
        assert_eq!(parse_analysis(text).unwrap().root_cause, " ");
    }

    #[test]
    fn test_parse_analysis_invalid_json() {
        assert!(matches!(
            parse_analysis("{rootCause: unquoted}"),
            Err(CoachError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_reflection() {
        let text = "Sure! {\"reflection\": \"You showed up.\", \"microAdvice\": \"Write three wins.\"}";
        let reflection = parse_reflection(text).unwrap();
        assert_eq!(reflection.reflection, "You showed up.");
        assert_eq!(reflection.micro_advice, "Write three wins.");
    }

    #[test]
    fn test_parse_reflection_missing_micro_advice() {
        assert!(matches!(
            parse_reflection(r#"{"reflection": "ok"}"#),
            Err(CoachError::MissingField("microAdvice"))
        ));
    }
}
