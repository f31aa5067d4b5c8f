//! Error report normalization

use crate::service::AnalysisError;
use quill_annotate::{ErrorCategory, ErrorMatch, MatchesByCategory};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized categorized error matches from one check
///
/// Every category is conceptually present; absent ones read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    matches: MatchesByCategory,
}

impl ErrorReport {
    /// Normalize a collaborator response, recovering from failure
    ///
    /// Transport errors and malformed payloads yield the empty report.
    #[must_use]
    pub fn from_response(response: Result<Value, AnalysisError>) -> Self {
        match response {
            Ok(value) => Self::from_value(&value),
            Err(err) => {
                tracing::warn!(error = %err, "error check failed, using empty report");
                Self::default()
            }
        }
    }

    /// Normalize a raw payload value
    ///
    /// Accepts either a flat array of matches carrying a `category`
    /// tag, or a map from category tag to match arrays. Entries with an
    /// unknown category or no `text` are dropped; a missing `message`
    /// becomes empty and a non-array `suggestions` becomes empty.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let mut matches = MatchesByCategory::new();
        for category in ErrorCategory::ALL {
            matches.insert(category, Vec::new());
        }

        match value {
            Value::Array(entries) => {
                for entry in entries {
                    let Some(category) = entry
                        .get("category")
                        .and_then(Value::as_str)
                        .and_then(ErrorCategory::from_tag)
                    else {
                        continue;
                    };
                    if let Some(m) = normalize_match(entry) {
                        matches.entry(category).or_default().push(m);
                    }
                }
            }
            Value::Object(by_tag) => {
                for (tag, entries) in by_tag {
                    let Some(category) = ErrorCategory::from_tag(tag) else {
                        continue;
                    };
                    let Some(entries) = entries.as_array() else {
                        continue;
                    };
                    for entry in entries {
                        if let Some(m) = normalize_match(entry) {
                            matches.entry(category).or_default().push(m);
                        }
                    }
                }
            }
            _ => {
                tracing::warn!("error payload is neither array nor map, using empty report");
            }
        }

        Self { matches }
    }

    /// Matches for one category
    #[must_use]
    pub fn matches(&self, category: ErrorCategory) -> &[ErrorMatch] {
        self.matches.get(&category).map_or(&[], Vec::as_slice)
    }

    /// All matches grouped by category, in canonical category order
    #[inline]
    #[must_use]
    pub fn by_category(&self) -> &MatchesByCategory {
        &self.matches
    }

    /// Total match count across categories
    #[must_use]
    pub fn total(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    /// Whether no errors were reported
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// The first category holding at least one match
    #[must_use]
    pub fn first_nonempty_category(&self) -> Option<ErrorCategory> {
        ErrorCategory::ALL
            .into_iter()
            .find(|c| !self.matches(*c).is_empty())
    }
}

fn normalize_match(entry: &Value) -> Option<ErrorMatch> {
    let text = entry.get("text")?.as_str()?;
    if text.is_empty() {
        return None;
    }
    Some(ErrorMatch {
        text: text.to_string(),
        message: entry
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        suggestions: entry
            .get("suggestions")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    })
}
