//! Quill Annotate - proofreading feedback over free text
//!
//! Merges categorized error matches into a display model of possibly
//! overlapping highlighted spans. The output is renderer-agnostic data
//! (ordered runs with colors and tooltips), not markup: any UI layer
//! maps runs to its own presentation.
//!
//! # Example
//!
//! ```
//! use quill_annotate::{annotate, ErrorCategory, ErrorMatch, MatchesByCategory};
//!
//! let mut matches = MatchesByCategory::new();
//! matches.entry(ErrorCategory::Spelling).or_default().push(ErrorMatch {
//!     text: "teh".to_string(),
//!     message: "Misspelling of 'the'".to_string(),
//!     suggestions: vec!["the".to_string()],
//! });
//!
//! let annotated = annotate("teh cat", &matches);
//! assert_eq!(annotated.runs().len(), 2);
//! ```

pub mod annotator;
pub mod category;

pub use annotator::{annotate, AnnotatedText, ErrorSpan, HighlightRun, Run};
pub use category::{ErrorCategory, ErrorMatch, MatchesByCategory, Rgb};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
