//! Completeness verdict normalization

use crate::service::AnalysisError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder requirement when a payload omits the missing list
const MISSING_FALLBACK: &str = "Requirements need to be reviewed";
/// Requirement shown when the whole analysis failed
const ANALYSIS_FAILED_MISSING: &str = "Please review the section requirements";
/// Improvement shown when the whole analysis failed
const ANALYSIS_FAILED_IMPROVEMENT: &str = "Please try analyzing the section again";

/// Normalized result of a section completeness check
///
/// `is_complete` is derived from the missing list being empty; the raw
/// flag in the payload is ignored so a collaborator cannot declare a
/// section complete while still listing unmet criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessVerdict {
    /// Whether every criterion was met
    pub is_complete: bool,
    /// Criteria the section satisfies
    pub met: Vec<String>,
    /// Criteria still unmet
    pub missing: Vec<String>,
    /// Free-form feedback items
    pub feedback: Vec<String>,
    /// Suggested improvements
    pub improvements: Vec<String>,
}

impl CompletenessVerdict {
    /// Normalize a collaborator response, recovering from failure
    ///
    /// Transport errors and malformed payloads both collapse to the
    /// safe incomplete default; absent arrays are treated as empty.
    #[must_use]
    pub fn from_response(response: Result<Value, AnalysisError>) -> Self {
        match response {
            Ok(value) => Self::from_value(&value),
            Err(err) => {
                tracing::warn!(error = %err, "completeness check failed, using safe default");
                Self::analysis_failed(&err.to_string())
            }
        }
    }

    /// Normalize a raw payload value
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            tracing::warn!("completeness payload is not an object, using safe default");
            return Self::analysis_failed("analysis returned a malformed payload");
        };

        let status = object.get("completionStatus");
        let met = string_array(status.and_then(|s| s.get("met")));
        let missing = match status.and_then(|s| s.get("missing")).and_then(Value::as_array) {
            Some(items) => strings_of(items),
            None => vec![MISSING_FALLBACK.to_string()],
        };
        let feedback = string_array(object.get("feedbackItems"));
        let improvements = string_array(object.get("suggestedImprovements"));

        Self {
            is_complete: missing.is_empty(),
            met,
            missing,
            feedback,
            improvements,
        }
    }

    /// The safe default for a failed analysis
    #[must_use]
    pub fn analysis_failed(reason: &str) -> Self {
        Self {
            is_complete: false,
            met: Vec::new(),
            missing: vec![ANALYSIS_FAILED_MISSING.to_string()],
            feedback: vec![reason.to_string()],
            improvements: vec![ANALYSIS_FAILED_IMPROVEMENT.to_string()],
        }
    }
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| strings_of(items))
        .unwrap_or_default()
}

fn strings_of(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn complete_when_missing_is_empty() {
        let verdict = CompletenessVerdict::from_value(&json!({
            "isComplete": false,
            "completionStatus": {"met": ["thesis"], "missing": []},
            "feedbackItems": ["solid"],
            "suggestedImprovements": []
        }));
        assert!(verdict.is_complete, "derived from empty missing, raw flag ignored");
        assert_eq!(verdict.met, vec!["thesis"]);
    }

    #[test]
    fn incomplete_when_missing_listed() {
        let verdict = CompletenessVerdict::from_value(&json!({
            "isComplete": true,
            "completionStatus": {"missing": ["hook", "context"]},
        }));
        assert!(!verdict.is_complete, "raw complete flag cannot override missing items");
        assert_eq!(verdict.missing.len(), 2);
        assert!(verdict.met.is_empty());
    }

    #[test]
    fn absent_missing_array_gets_placeholder() {
        let verdict = CompletenessVerdict::from_value(&json!({"feedbackItems": []}));
        assert!(!verdict.is_complete);
        assert_eq!(verdict.missing, vec![MISSING_FALLBACK]);
    }

    #[test]
    fn non_object_payload_falls_back() {
        let verdict = CompletenessVerdict::from_value(&json!("not even close"));
        assert!(!verdict.is_complete);
        assert_eq!(verdict.missing, vec![ANALYSIS_FAILED_MISSING]);
        assert_eq!(verdict.improvements, vec![ANALYSIS_FAILED_IMPROVEMENT]);
    }

    #[test]
    fn transport_error_falls_back_with_reason() {
        let verdict = CompletenessVerdict::from_response(Err(AnalysisError::Transport(
            "connection reset".to_string(),
        )));
        assert!(!verdict.is_complete);
        assert_eq!(verdict.missing, vec![ANALYSIS_FAILED_MISSING]);
        assert!(verdict.feedback[0].contains("connection reset"));
    }

    #[test]
    fn non_string_entries_are_dropped() {
        let verdict = CompletenessVerdict::from_value(&json!({
            "completionStatus": {"met": ["a", 7, null], "missing": []}
        }));
        assert_eq!(verdict.met, vec!["a"]);
        assert!(verdict.is_complete);
    }
}
