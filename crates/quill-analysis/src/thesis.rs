//! Thesis point extraction normalization

use crate::service::AnalysisError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Point used when extraction yields nothing usable
const DEFAULT_POINT: &str = "Main Argument";

/// One main point extracted from a thesis statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThesisPoint {
    /// The argument the point makes
    pub point: String,
    /// Keywords tied to the point
    pub keywords: Vec<String>,
    /// Evidence the writer could use
    pub suggested_evidence: Vec<String>,
}

/// Normalized thesis analysis result
///
/// Never empty: extraction must always yield at least one point so
/// body-paragraph generation cannot fail outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThesisPoints {
    /// Main points in presentation order
    pub main_points: Vec<ThesisPoint>,
}

impl ThesisPoints {
    /// Normalize a collaborator response, recovering from failure
    #[must_use]
    pub fn from_response(response: Result<Value, AnalysisError>) -> Self {
        match response {
            Ok(value) => Self::from_value(&value),
            Err(err) => {
                tracing::warn!(error = %err, "thesis extraction failed, using default point");
                Self::default()
            }
        }
    }

    /// Normalize a raw payload value
    ///
    /// A missing, non-array, or empty `mainPoints` key yields the
    /// single default point. Per-point gaps are filled: an absent
    /// `point` becomes `"Main Point {n}"`, absent arrays become empty.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(raw_points) = value.get("mainPoints").and_then(Value::as_array) else {
            tracing::warn!("thesis payload missing mainPoints, using default point");
            return Self::default();
        };
        if raw_points.is_empty() {
            tracing::warn!("thesis payload has zero points, using default point");
            return Self::default();
        }

        let main_points = raw_points
            .iter()
            .enumerate()
            .map(|(index, raw)| ThesisPoint {
                point: raw
                    .get("point")
                    .and_then(Value::as_str)
                    .map_or_else(|| format!("Main Point {}", index + 1), str::to_string),
                keywords: string_array(raw.get("keywords")),
                suggested_evidence: string_array(raw.get("suggestedEvidence")),
            })
            .collect();

        Self { main_points }
    }
}

impl Default for ThesisPoints {
    fn default() -> Self {
        Self {
            main_points: vec![ThesisPoint {
                point: DEFAULT_POINT.to_string(),
                keywords: Vec::new(),
                suggested_evidence: Vec::new(),
            }],
        }
    }
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
