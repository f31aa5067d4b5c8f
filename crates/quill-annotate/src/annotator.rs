//! The span merge sweep
//!
//! Turns raw text plus categorized matches into an ordered run list.
//! Overlap clusters (spans sharing a character position) become a single
//! merged run carrying up to three colors and every member's message.

use crate::category::{ErrorCategory, MatchesByCategory, Rgb};
use serde::{Deserialize, Serialize};

/// Colors rendered distinctly in one overlap run; extras reuse these
const MAX_OVERLAP_COLORS: usize = 3;

/// A located error occurrence, ephemeral per check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSpan {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// Category of the originating match
    pub category: ErrorCategory,
    /// Message of the originating match
    pub message: String,
}

/// One element of the annotated output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Run {
    /// Literal text with no active error span
    Text {
        /// The literal characters
        text: String,
    },
    /// A highlighted segment covered by one or more spans
    Highlight(HighlightRun),
}

/// A highlighted segment of the checked text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRun {
    /// The covered characters
    pub text: String,
    /// Byte offset where the segment starts
    pub start: usize,
    /// Byte offset one past the segment end
    pub end: usize,
    /// Categories of every span active over the segment, in span order
    pub categories: Vec<ErrorCategory>,
    /// Colors to interleave; capped at three even when more spans overlap
    pub colors: Vec<Rgb>,
    /// Every active span's message, newline-joined
    pub tooltip: String,
}

/// The renderer-agnostic annotation result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedText {
    runs: Vec<Run>,
}

impl AnnotatedText {
    /// The ordered runs
    #[inline]
    #[must_use]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Whether any run was produced
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Only the highlighted runs, in order
    pub fn highlights(&self) -> impl Iterator<Item = &HighlightRun> {
        self.runs.iter().filter_map(|run| match run {
            Run::Highlight(h) => Some(h),
            Run::Text { .. } => None,
        })
    }
}

/// Merge raw text and categorized matches into highlight runs
///
/// Every occurrence of every match substring is located (the scan
/// advances one character after each hit, so adjacent and overlapping
/// literal occurrences are all found), spans are sorted by start, and a
/// left-to-right sweep emits literal runs between spans and one merged
/// run per overlap cluster segment. Match text absent from `text` is
/// silently skipped; empty `text` yields an empty run list.
#[must_use]
pub fn annotate(text: &str, matches: &MatchesByCategory) -> AnnotatedText {
    if text.is_empty() {
        return AnnotatedText::default();
    }

    let spans = locate_spans(text, matches);
    let mut runs = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;

    while pos < text.len() {
        let active: Vec<&ErrorSpan> = spans
            .iter()
            .filter(|s| s.start <= pos && pos < s.end)
            .collect();

        if active.is_empty() {
            let Some(ch) = text[pos..].chars().next() else {
                break;
            };
            literal.push(ch);
            pos += ch.len_utf8();
            continue;
        }

        if !literal.is_empty() {
            runs.push(Run::Text {
                text: std::mem::take(&mut literal),
            });
        }

        // The segment ends where the earliest active span ends; the
        // sweep resumes there so the segment is never reprocessed.
        let end = active.iter().map(|s| s.end).min().unwrap_or(text.len());
        runs.push(Run::Highlight(merge_segment(text, pos, end, &active)));
        pos = end;
    }

    if !literal.is_empty() {
        runs.push(Run::Text { text: literal });
    }

    AnnotatedText { runs }
}

/// Locate every occurrence of every match substring
fn locate_spans(text: &str, matches: &MatchesByCategory) -> Vec<ErrorSpan> {
    let mut spans = Vec::new();
    for (category, category_matches) in matches {
        for m in category_matches {
            if m.text.is_empty() {
                continue;
            }
            let mut from = 0;
            while let Some(found) = text[from..].find(&m.text) {
                let start = from + found;
                spans.push(ErrorSpan {
                    start,
                    end: start + m.text.len(),
                    category: *category,
                    message: m.message.clone(),
                });
                // Advance a single character so overlapping literal
                // occurrences are found too.
                let step = text[start..].chars().next().map_or(1, char::len_utf8);
                from = start + step;
            }
        }
    }
    spans.sort_by_key(|s| s.start);
    spans
}

fn merge_segment(text: &str, start: usize, end: usize, active: &[&ErrorSpan]) -> HighlightRun {
    let categories: Vec<ErrorCategory> = active.iter().map(|s| s.category).collect();
    let colors: Vec<Rgb> = active
        .iter()
        .take(MAX_OVERLAP_COLORS)
        .map(|s| s.category.color())
        .collect();
    let tooltip = active
        .iter()
        .map(|s| s.message.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    HighlightRun {
        text: text[start..end].to_string(),
        start,
        end,
        categories,
        colors,
        tooltip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::ErrorMatch;

    fn single(category: ErrorCategory, text: &str, message: &str) -> MatchesByCategory {
        let mut matches = MatchesByCategory::new();
        matches.entry(category).or_default().push(ErrorMatch {
            text: text.to_string(),
            message: message.to_string(),
            suggestions: vec![],
        });
        matches
    }

    #[test]
    fn empty_text_yields_no_runs() {
        let matches = single(ErrorCategory::Spelling, "cat", "m");
        assert!(annotate("", &matches).is_empty());
    }

    #[test]
    fn no_matches_is_one_literal_run() {
        let annotated = annotate("plain text", &MatchesByCategory::new());
        assert_eq!(
            annotated.runs(),
            &[Run::Text {
                text: "plain text".to_string()
            }]
        );
    }

    #[test]
    fn repeated_occurrences_each_get_a_run() {
        let matches = single(ErrorCategory::Spelling, "cat", "no such word");
        let annotated = annotate("cat sat cat", &matches);

        let highlights: Vec<_> = annotated.highlights().collect();
        assert_eq!(highlights.len(), 2);
        assert_eq!((highlights[0].start, highlights[0].end), (0, 3));
        assert_eq!((highlights[1].start, highlights[1].end), (8, 11));

        assert_eq!(
            annotated.runs()[1],
            Run::Text {
                text: " sat ".to_string()
            },
            "literal text between hits is unmodified"
        );
    }

    #[test]
    fn two_categories_same_substring_merge_into_one_run() {
        let mut matches = single(ErrorCategory::Spelling, "bad", "spelled badly");
        matches
            .entry(ErrorCategory::Stylistic)
            .or_default()
            .push(ErrorMatch {
                text: "bad".to_string(),
                message: "weak word choice".to_string(),
                suggestions: vec![],
            });

        let annotated = annotate("this is bad text", &matches);
        let highlights: Vec<_> = annotated.highlights().collect();
        assert_eq!(highlights.len(), 1, "exactly one merged run");

        let run = highlights[0];
        assert_eq!((run.start, run.end), (8, 11));
        assert_eq!(run.colors.len(), 2);
        assert!(run.tooltip.contains("spelled badly"));
        assert!(run.tooltip.contains("weak word choice"));
    }

    #[test]
    fn overlap_colors_cap_at_three() {
        let mut matches = MatchesByCategory::new();
        for category in [
            ErrorCategory::Spelling,
            ErrorCategory::Punctuation,
            ErrorCategory::LexicoSemantic,
            ErrorCategory::Stylistic,
        ] {
            matches.entry(category).or_default().push(ErrorMatch {
                text: "word".to_string(),
                message: format!("{category} issue"),
                suggestions: vec![],
            });
        }

        let annotated = annotate("a word here", &matches);
        let highlights: Vec<_> = annotated.highlights().collect();
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].categories.len(), 4, "all spans represented");
        assert_eq!(highlights[0].colors.len(), 3, "colors capped");
        assert_eq!(highlights[0].tooltip.lines().count(), 4, "all messages kept");
    }

    #[test]
    fn stale_match_text_is_skipped() {
        let matches = single(ErrorCategory::Spelling, "vanished", "stale");
        let annotated = annotate("current text", &matches);
        assert_eq!(annotated.highlights().count(), 0);
        assert_eq!(annotated.runs().len(), 1);
    }

    #[test]
    fn overlapping_literal_occurrences_are_all_found() {
        let matches = single(ErrorCategory::Typographical, "aa", "doubled");
        let annotated = annotate("aaa", &matches);
        // Spans [0,2) and [1,3) merge into [0,2) then [2,3).
        let highlights: Vec<_> = annotated.highlights().collect();
        assert_eq!(highlights.len(), 2);
        assert_eq!((highlights[0].start, highlights[0].end), (0, 2));
        assert_eq!((highlights[1].start, highlights[1].end), (2, 3));
        let covered: String = highlights.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(covered, "aaa", "no text lost or duplicated");
    }

    #[test]
    fn staggered_overlap_keeps_all_text() {
        let mut matches = single(ErrorCategory::Spelling, "one two", "first");
        matches
            .entry(ErrorCategory::Stylistic)
            .or_default()
            .push(ErrorMatch {
                text: "two three".to_string(),
                message: "second".to_string(),
                suggestions: vec![],
            });

        let annotated = annotate("one two three", &matches);
        let rebuilt: String = annotated
            .runs()
            .iter()
            .map(|run| match run {
                Run::Text { text } => text.as_str(),
                Run::Highlight(h) => h.text.as_str(),
            })
            .collect();
        assert_eq!(rebuilt, "one two three");
    }

    #[test]
    fn multibyte_text_sweeps_on_char_boundaries() {
        let matches = single(ErrorCategory::Spelling, "héllo", "accented");
        let annotated = annotate("héllo wörld héllo", &matches);
        assert_eq!(annotated.highlights().count(), 2);
    }

    #[test]
    fn empty_match_text_is_ignored() {
        let matches = single(ErrorCategory::Spelling, "", "empty");
        let annotated = annotate("some text", &matches);
        assert_eq!(annotated.highlights().count(), 0);
    }

    #[test]
    fn single_span_run_carries_category_color_and_message() {
        let matches = single(ErrorCategory::Punctuation, "sat", "msg");
        let annotated = annotate("cat sat", &matches);
        let highlights: Vec<_> = annotated.highlights().collect();
        assert_eq!(highlights[0].categories, vec![ErrorCategory::Punctuation]);
        assert_eq!(highlights[0].colors, vec![ErrorCategory::Punctuation.color()]);
        assert_eq!(highlights[0].tooltip, "msg");
    }
}
