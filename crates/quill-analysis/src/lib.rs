//! Quill Analysis - the content-analysis collaborator seam
//!
//! The engine never interprets AI-produced prose; it consumes three
//! structured payloads (error matches, completeness verdicts, thesis
//! points) from an external [`AnalysisService`]. Payloads are fallible
//! and possibly malformed, so every one passes through a normalizer
//! that substitutes safe defaults instead of propagating a parse
//! failure: the writing workflow must never deadlock on a bad response.

pub mod report;
pub mod service;
pub mod thesis;
pub mod verdict;

pub use report::ErrorReport;
pub use service::{AnalysisError, AnalysisService};
pub use thesis::{ThesisPoint, ThesisPoints};
pub use verdict::CompletenessVerdict;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
