//! Section entities
//!
//! A [`Section`] carries workflow metadata only. The free text a writer
//! produces is owned by the persistence collaborator and keyed by the
//! section's id, so the graph stays lightweight and content I/O stays
//! asynchronous.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use ulid::Ulid;

/// Unique section identifier (ULID for monotonic, sortable ids)
///
/// Ids are permanent: deleting a section retires its id, which is never
/// reused for a later section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionId(pub Ulid);

impl SectionId {
    /// Generate a new section id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural role of a section within the essay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    /// Opening section; exactly one, always first
    Introduction,
    /// Argument paragraph; zero to five, contiguous in the middle
    Body,
    /// Closing section; exactly one, always last
    Conclusion,
}

impl SectionKind {
    /// Whether this is a Body section
    #[inline]
    #[must_use]
    pub fn is_body(self) -> bool {
        matches!(self, Self::Body)
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Introduction => "introduction",
            Self::Body => "body paragraph",
            Self::Conclusion => "conclusion",
        };
        write!(f, "{name}")
    }
}

/// Per-section completion state
///
/// Recomputed, never accumulated: a section cycles back to [`Drafted`]
/// when its content changes and is re-checked.
///
/// [`Drafted`]: Completion::Drafted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Completion {
    /// No content yet (0%)
    #[default]
    Empty,
    /// Drafted but not verified complete (50%)
    Drafted,
    /// Verified complete by a completeness check (100%)
    Complete,
}

impl Completion {
    /// Display percentage for progress UI
    #[inline]
    #[must_use]
    pub fn percentage(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Drafted => 50,
            Self::Complete => 100,
        }
    }

    /// Whether the section has been verified complete
    #[inline]
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Snapshot of the unresolved items from the last completeness check
///
/// Persisted per section so the workflow UI can show outstanding
/// requirements after navigating away and back. Present only while the
/// section's completion is below 100%.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementsSnapshot {
    /// Criteria the last check reported as missing
    pub missing: Vec<String>,
    /// Suggested improvements from the last check
    pub improvements: Vec<String>,
}

impl RequirementsSnapshot {
    /// Create a snapshot from check results
    #[inline]
    #[must_use]
    pub fn new(missing: Vec<String>, improvements: Vec<String>) -> Self {
        Self {
            missing,
            improvements,
        }
    }
}

/// One structural unit of the essay
///
/// Carries metadata only; see the module docs for where content lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Stable unique id
    id: SectionId,
    /// Structural role
    kind: SectionKind,
    /// Display title; Body titles are rewritten on renumbering
    title: String,
    /// Thesis point this section argues (generated Body sections only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    /// Keywords from thesis analysis (generated Body sections only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    keywords: Vec<String>,
    /// Suggested evidence from thesis analysis
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    suggested_evidence: Vec<String>,
    /// Completion state
    #[serde(default)]
    completion: Completion,
    /// Unresolved requirements from the last check, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    requirements: Option<RequirementsSnapshot>,
}

impl Section {
    /// Create the Introduction section
    #[inline]
    #[must_use]
    pub fn introduction() -> Self {
        Self::with_kind(SectionKind::Introduction, "Introduction".to_string())
    }

    /// Create the Conclusion section
    #[inline]
    #[must_use]
    pub fn conclusion() -> Self {
        Self::with_kind(SectionKind::Conclusion, "Conclusion".to_string())
    }

    /// Create a manual Body section with the given 1-based rank
    ///
    /// The rank is provisional; the graph renumbers on every structural
    /// change.
    #[inline]
    #[must_use]
    pub fn body(rank: usize) -> Self {
        Self::with_kind(SectionKind::Body, format!("Body Paragraph {rank}"))
    }

    /// Create a Body section generated from a thesis point
    #[must_use]
    pub fn generated_body(
        rank: usize,
        point: impl Into<String>,
        keywords: Vec<String>,
        suggested_evidence: Vec<String>,
    ) -> Self {
        let point = point.into();
        Self {
            title: format!("Body Paragraph {rank}: {point}"),
            topic: Some(point),
            keywords,
            suggested_evidence,
            ..Self::with_kind(SectionKind::Body, String::new())
        }
    }

    fn with_kind(kind: SectionKind, title: String) -> Self {
        Self {
            id: SectionId::new(),
            kind,
            title,
            topic: None,
            keywords: Vec::new(),
            suggested_evidence: Vec::new(),
            completion: Completion::Empty,
            requirements: None,
        }
    }

    /// Section id
    #[inline]
    #[must_use]
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Structural role
    #[inline]
    #[must_use]
    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    /// Display title
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Thesis point, for generated Body sections
    #[inline]
    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Thesis keywords, for generated Body sections
    #[inline]
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Suggested evidence, for generated Body sections
    #[inline]
    #[must_use]
    pub fn suggested_evidence(&self) -> &[String] {
        &self.suggested_evidence
    }

    /// Completion state
    #[inline]
    #[must_use]
    pub fn completion(&self) -> Completion {
        self.completion
    }

    /// Unresolved requirements from the last completeness check
    #[inline]
    #[must_use]
    pub fn requirements(&self) -> Option<&RequirementsSnapshot> {
        self.requirements.as_ref()
    }

    /// Set the completion state
    ///
    /// Reaching [`Completion::Complete`] clears the requirements
    /// snapshot; the snapshot only exists while completion is below 100%.
    pub fn set_completion(&mut self, completion: Completion) {
        self.completion = completion;
        if completion.is_complete() {
            self.requirements = None;
        }
    }

    /// Replace the requirements snapshot
    pub fn set_requirements(&mut self, requirements: Option<RequirementsSnapshot>) {
        self.requirements = requirements;
    }

    /// Rewrite the title for a new 1-based rank (Body sections only)
    pub(crate) fn renumber(&mut self, rank: usize) {
        debug_assert!(self.kind.is_body());
        self.title = match &self.topic {
            Some(topic) => format!("Body Paragraph {rank}: {topic}"),
            None => format!("Body Paragraph {rank}"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_ids_are_unique() {
        let a = Section::body(1);
        let b = Section::body(1);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn generated_body_title_carries_point() {
        let section = Section::generated_body(2, "Economic impact", vec![], vec![]);
        assert_eq!(section.title(), "Body Paragraph 2: Economic impact");
        assert_eq!(section.topic(), Some("Economic impact"));
    }

    #[test]
    fn renumber_preserves_topic_suffix() {
        let mut section = Section::generated_body(3, "Main Argument", vec![], vec![]);
        section.renumber(1);
        assert_eq!(section.title(), "Body Paragraph 1: Main Argument");

        let mut manual = Section::body(4);
        manual.renumber(2);
        assert_eq!(manual.title(), "Body Paragraph 2");
    }

    #[test]
    fn completing_clears_requirements() {
        let mut section = Section::body(1);
        section.set_requirements(Some(RequirementsSnapshot::new(
            vec!["topic sentence".to_string()],
            vec![],
        )));
        section.set_completion(Completion::Complete);
        assert!(section.requirements().is_none());
        assert_eq!(section.completion().percentage(), 100);
    }

    #[test]
    fn completion_percentages() {
        assert_eq!(Completion::Empty.percentage(), 0);
        assert_eq!(Completion::Drafted.percentage(), 50);
        assert_eq!(Completion::Complete.percentage(), 100);
    }

    #[test]
    fn section_serde_round_trip() {
        let section = Section::generated_body(1, "A point", vec!["kw".to_string()], vec![]);
        let json = serde_json::to_string(&section).unwrap();
        let back: Section = serde_json::from_str(&json).unwrap();
        assert_eq!(section, back);
    }
}
