//! The analysis collaborator trait

use async_trait::async_trait;
use quill_section::SectionKind;
use serde_json::Value;

/// Failures surfaced by an analysis collaborator
///
/// These cover the transport; structurally invalid payloads are not
/// errors here, they are handled by the normalizers with safe defaults.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The collaborator could not be reached or failed mid-call
    #[error("analysis transport failed: {0}")]
    Transport(String),

    /// The collaborator produced bytes that are not JSON at all
    #[error("analysis response is not JSON: {0}")]
    NotJson(String),
}

/// External content-analysis collaborator
///
/// All three operations are asynchronous and fallible, and even a
/// successful call may carry a structurally invalid payload; callers
/// normalize every response through this crate's payload types.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Detect categorized errors in `text`
    ///
    /// Expected payload: an array of `{category, text, message,
    /// suggestions}` objects, or a map from category tag to such
    /// arrays.
    async fn check_errors(&self, text: &str) -> Result<Value, AnalysisError>;

    /// Evaluate a section against its kind-specific criteria
    ///
    /// `previous` carries the preceding section's content for context.
    /// Expected payload: `{isComplete, completionStatus: {met,
    /// missing}, feedbackItems, suggestedImprovements}`.
    async fn check_completeness(
        &self,
        content: &str,
        kind: SectionKind,
        previous: Option<&str>,
    ) -> Result<Value, AnalysisError>;

    /// Extract the main points of a thesis statement
    ///
    /// Expected payload: `{mainPoints: [{point, keywords,
    /// suggestedEvidence}]}`.
    async fn extract_thesis_points(&self, intro_text: &str) -> Result<Value, AnalysisError>;
}
