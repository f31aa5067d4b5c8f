//! Thesis expansion
//!
//! Turns a completed introduction into generated Body sections. The
//! expander never mutates the graph itself; callers splice the result
//! in via `SectionGraph::replace_bodies_with` once the writer confirms,
//! which keeps the "keep existing" escape hatch free of side effects.

use quill_analysis::{AnalysisService, ThesisPoints};
use quill_section::Section;
use std::sync::Arc;

/// Generates Body sections from an introduction's thesis
#[derive(Clone)]
pub struct ThesisExpander {
    analysis: Arc<dyn AnalysisService>,
}

impl ThesisExpander {
    /// Create an expander over an analysis collaborator
    #[inline]
    #[must_use]
    pub fn new(analysis: Arc<dyn AnalysisService>) -> Self {
        Self { analysis }
    }

    /// Derive Body sections from the introduction text
    ///
    /// Always yields at least one section: a malformed or failed
    /// extraction falls back to the single default main point.
    pub async fn expand(&self, intro_text: &str) -> Vec<Section> {
        let response = self.analysis.extract_thesis_points(intro_text).await;
        let points = ThesisPoints::from_response(response);

        tracing::info!(points = points.main_points.len(), "expanding thesis into body sections");

        points
            .main_points
            .into_iter()
            .enumerate()
            .map(|(index, point)| {
                Section::generated_body(
                    index + 1,
                    point.point,
                    point.keywords,
                    point.suggested_evidence,
                )
            })
            .collect()
    }
}

impl std::fmt::Debug for ThesisExpander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThesisExpander").finish_non_exhaustive()
    }
}
