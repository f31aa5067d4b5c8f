//! Ordered section sequence and its structural invariants
//!
//! The graph owns section ordering: Introduction first, Conclusion last,
//! Body sections contiguous in between. Every structural change
//! renumbers Body titles positionally.

use crate::section::{Section, SectionId, SectionKind};
use serde::{Deserialize, Serialize};

/// Upper bound on Body sections per essay
pub const MAX_BODY_SECTIONS: usize = 5;

/// Structural operation errors
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The id does not name a section in this graph
    #[error("unknown section: {0}")]
    UnknownSection(SectionId),

    /// The operation only applies to Body sections
    #[error("section {id} is a {kind}, not a body paragraph")]
    NotABody {
        /// Offending section id
        id: SectionId,
        /// Its actual kind
        kind: SectionKind,
    },

    /// A restored sequence violates the structural invariants
    #[error("malformed section sequence: {0}")]
    MalformedSequence(String),
}

/// The ordered essay section sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionGraph {
    sections: Vec<Section>,
}

impl SectionGraph {
    /// Create a fresh graph holding an Introduction and a Conclusion
    #[must_use]
    pub fn new() -> Self {
        Self {
            sections: vec![Section::introduction(), Section::conclusion()],
        }
    }

    /// Restore a graph from a persisted sequence, validating invariants
    ///
    /// # Errors
    /// `GraphError::MalformedSequence` when the sequence does not start
    /// with an Introduction, end with a Conclusion, keep Body sections
    /// contiguous in between, stay within the Body cap, or contains a
    /// duplicate id.
    pub fn from_sections(sections: Vec<Section>) -> Result<Self, GraphError> {
        let malformed = |msg: &str| GraphError::MalformedSequence(msg.to_string());

        if sections.len() < 2 {
            return Err(malformed("sequence shorter than introduction + conclusion"));
        }
        if sections[0].kind() != SectionKind::Introduction {
            return Err(malformed("sequence does not start with an introduction"));
        }
        if sections[sections.len() - 1].kind() != SectionKind::Conclusion {
            return Err(malformed("sequence does not end with a conclusion"));
        }
        let middle = &sections[1..sections.len() - 1];
        if middle.iter().any(|s| !s.kind().is_body()) {
            return Err(malformed("non-body section between introduction and conclusion"));
        }
        if middle.len() > MAX_BODY_SECTIONS {
            return Err(malformed("body section cap exceeded"));
        }
        let mut ids: Vec<SectionId> = sections.iter().map(Section::id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != sections.len() {
            return Err(malformed("duplicate section id"));
        }

        let mut graph = Self { sections };
        graph.renumber();
        Ok(graph)
    }

    /// All sections in order
    #[inline]
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look up a section by id
    #[must_use]
    pub fn get(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id() == *id)
    }

    /// Look up a section by id, mutably
    pub fn get_mut(&mut self, id: &SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id() == *id)
    }

    /// Position of a section in the current order
    #[must_use]
    pub fn position(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id() == *id)
    }

    /// The Introduction section
    #[inline]
    #[must_use]
    pub fn introduction(&self) -> &Section {
        &self.sections[0]
    }

    /// The Conclusion section
    #[inline]
    #[must_use]
    pub fn conclusion(&self) -> &Section {
        &self.sections[self.sections.len() - 1]
    }

    /// Body sections in order
    pub fn bodies(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.kind().is_body())
    }

    /// Number of Body sections
    #[inline]
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies().count()
    }

    /// Insert a new Body section immediately before the Conclusion
    ///
    /// The `after` hint is accepted for interface compatibility but does
    /// not affect placement: new bodies always land after the existing
    /// bodies, before the Conclusion. Returns `None` without mutating
    /// anything when the graph already holds [`MAX_BODY_SECTIONS`]
    /// bodies; the cap is a rejected no-op, not an error.
    pub fn insert_body(&mut self, after: Option<&SectionId>) -> Option<Section> {
        let _ = after;
        let count = self.body_count();
        if count >= MAX_BODY_SECTIONS {
            tracing::debug!(count, "body section cap reached, insert ignored");
            return None;
        }

        let section = Section::body(count + 1);
        let conclusion_at = self.sections.len() - 1;
        self.sections.insert(conclusion_at, section);
        self.renumber();
        Some(self.sections[conclusion_at].clone())
    }

    /// Delete a Body section and renumber the remainder
    ///
    /// Returns a snapshot of the new sequence.
    ///
    /// # Errors
    /// - `GraphError::UnknownSection` if the id is not in the graph
    /// - `GraphError::NotABody` for the Introduction or Conclusion;
    ///   those are only destroyed by resetting the whole essay
    pub fn delete_body(&mut self, id: &SectionId) -> Result<Vec<Section>, GraphError> {
        let position = self
            .position(id)
            .ok_or(GraphError::UnknownSection(*id))?;
        let kind = self.sections[position].kind();
        if !kind.is_body() {
            tracing::debug!(%id, %kind, "refusing to delete non-body section");
            return Err(GraphError::NotABody { id: *id, kind });
        }

        self.sections.remove(position);
        self.renumber();
        Ok(self.sections.clone())
    }

    /// Atomically replace all Body sections with a new list
    ///
    /// The new sequence is assembled in full before it is committed, so
    /// an aborted caller observes no partial mutation. Returns the
    /// removed bodies so their persisted keys can be torn down. Lists
    /// longer than [`MAX_BODY_SECTIONS`] are truncated to the cap.
    pub fn replace_bodies_with(&mut self, mut new_bodies: Vec<Section>) -> Vec<Section> {
        if new_bodies.len() > MAX_BODY_SECTIONS {
            tracing::warn!(
                generated = new_bodies.len(),
                cap = MAX_BODY_SECTIONS,
                "truncating generated body sections to cap"
            );
            new_bodies.truncate(MAX_BODY_SECTIONS);
        }
        debug_assert!(new_bodies.iter().all(|s| s.kind().is_body()));

        let mut replaced = Vec::new();
        let mut next = Vec::with_capacity(2 + new_bodies.len());
        for section in self.sections.drain(..) {
            match section.kind() {
                SectionKind::Introduction => next.push(section),
                SectionKind::Body => replaced.push(section),
                SectionKind::Conclusion => {
                    next.extend(new_bodies.drain(..));
                    next.push(section);
                }
            }
        }
        self.sections = next;
        self.renumber();
        replaced
    }

    /// The section following `id` in the current order
    #[must_use]
    pub fn find_next(&self, id: &SectionId) -> Option<&Section> {
        let position = self.position(id)?;
        self.sections.get(position + 1)
    }

    /// The section preceding `id` in the current order
    #[must_use]
    pub fn find_previous(&self, id: &SectionId) -> Option<&Section> {
        let position = self.position(id)?;
        position.checked_sub(1).map(|p| &self.sections[p])
    }

    /// The next Body section after `id`, if one exists
    #[must_use]
    pub fn next_body_after(&self, id: &SectionId) -> Option<&Section> {
        let position = self.position(id)?;
        self.sections[position + 1..]
            .iter()
            .find(|s| s.kind().is_body())
    }

    /// Re-derive every Body rank from position and rewrite its title
    fn renumber(&mut self) {
        let mut rank = 0usize;
        for section in &mut self.sections {
            if section.kind().is_body() {
                rank += 1;
                section.renumber(rank);
            }
        }
    }
}

impl Default for SectionGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body_titles(graph: &SectionGraph) -> Vec<String> {
        graph.bodies().map(|s| s.title().to_string()).collect()
    }

    #[test]
    fn new_graph_is_intro_and_conclusion() {
        let graph = SectionGraph::new();
        assert_eq!(graph.sections().len(), 2);
        assert_eq!(graph.introduction().kind(), SectionKind::Introduction);
        assert_eq!(graph.conclusion().kind(), SectionKind::Conclusion);
        assert_eq!(graph.body_count(), 0);
    }

    #[test]
    fn insert_places_body_before_conclusion() {
        let mut graph = SectionGraph::new();
        let body = graph.insert_body(None).unwrap();
        assert_eq!(body.title(), "Body Paragraph 1");
        assert_eq!(graph.sections()[1].id(), body.id());
        assert_eq!(
            graph.conclusion().kind(),
            SectionKind::Conclusion,
            "conclusion stays last"
        );
    }

    #[test]
    fn insert_at_cap_is_a_no_op() {
        let mut graph = SectionGraph::new();
        for _ in 0..MAX_BODY_SECTIONS {
            assert!(graph.insert_body(None).is_some());
        }
        let before = graph.sections().to_vec();
        assert!(graph.insert_body(None).is_none());
        assert_eq!(graph.sections(), &before[..], "count and order unchanged");
    }

    #[test]
    fn delete_renumbers_positionally() {
        let mut graph = SectionGraph::new();
        let first = graph.insert_body(None).unwrap();
        let _second = graph.insert_body(None).unwrap();
        let _third = graph.insert_body(None).unwrap();

        graph.delete_body(&first.id()).unwrap();
        assert_eq!(
            body_titles(&graph),
            vec!["Body Paragraph 1", "Body Paragraph 2"]
        );
    }

    #[test]
    fn delete_non_body_is_rejected() {
        let mut graph = SectionGraph::new();
        let intro_id = graph.introduction().id();
        let err = graph.delete_body(&intro_id).unwrap_err();
        assert!(matches!(err, GraphError::NotABody { .. }));
        assert_eq!(graph.sections().len(), 2, "nothing was removed");
    }

    #[test]
    fn delete_unknown_id_is_rejected() {
        let mut graph = SectionGraph::new();
        let err = graph.delete_body(&SectionId::new()).unwrap_err();
        assert!(matches!(err, GraphError::UnknownSection(_)));
    }

    #[test]
    fn replace_bodies_swaps_and_returns_removed() {
        let mut graph = SectionGraph::new();
        let old = graph.insert_body(None).unwrap();

        let generated = vec![
            Section::generated_body(1, "First point", vec![], vec![]),
            Section::generated_body(2, "Second point", vec![], vec![]),
        ];
        let removed = graph.replace_bodies_with(generated);

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id(), old.id());
        assert_eq!(
            body_titles(&graph),
            vec![
                "Body Paragraph 1: First point",
                "Body Paragraph 2: Second point"
            ]
        );
    }

    #[test]
    fn replace_truncates_past_cap() {
        let mut graph = SectionGraph::new();
        let generated = (1..=7)
            .map(|n| Section::generated_body(n, format!("Point {n}"), vec![], vec![]))
            .collect();
        graph.replace_bodies_with(generated);
        assert_eq!(graph.body_count(), MAX_BODY_SECTIONS);
    }

    #[test]
    fn uncommitted_expansion_leaves_graph_untouched() {
        let mut graph = SectionGraph::new();
        graph.insert_body(None);
        let before = graph.clone();

        // Generating sections without calling replace_bodies_with is
        // the "keep existing" escape hatch.
        let _generated = vec![Section::generated_body(1, "Unused", vec![], vec![])];
        assert_eq!(graph, before);
    }

    #[test]
    fn navigation_respects_order() {
        let mut graph = SectionGraph::new();
        let body = graph.insert_body(None).unwrap();
        let intro_id = graph.introduction().id();
        let conclusion_id = graph.conclusion().id();

        assert_eq!(graph.find_next(&intro_id).unwrap().id(), body.id());
        assert_eq!(graph.find_next(&body.id()).unwrap().id(), conclusion_id);
        assert!(graph.find_next(&conclusion_id).is_none());
        assert_eq!(graph.find_previous(&body.id()).unwrap().id(), intro_id);
        assert!(graph.find_previous(&intro_id).is_none());
    }

    #[test]
    fn next_body_after_skips_nothing() {
        let mut graph = SectionGraph::new();
        let first = graph.insert_body(None).unwrap();
        let second = graph.insert_body(None).unwrap();
        assert_eq!(
            graph.next_body_after(&first.id()).unwrap().id(),
            second.id()
        );
        assert!(graph.next_body_after(&second.id()).is_none());
    }

    #[test]
    fn from_sections_rejects_malformed_sequences() {
        let only_intro = vec![Section::introduction()];
        assert!(SectionGraph::from_sections(only_intro).is_err());

        let reversed = vec![Section::conclusion(), Section::introduction()];
        assert!(SectionGraph::from_sections(reversed).is_err());

        let intro_in_middle = vec![
            Section::introduction(),
            Section::introduction(),
            Section::conclusion(),
        ];
        assert!(SectionGraph::from_sections(intro_in_middle).is_err());
    }

    #[test]
    fn from_sections_round_trips_through_json() {
        let mut graph = SectionGraph::new();
        graph.insert_body(None);
        let json = serde_json::to_string(graph.sections()).unwrap();
        let sections: Vec<Section> = serde_json::from_str(&json).unwrap();
        let restored = SectionGraph::from_sections(sections).unwrap();
        assert_eq!(restored, graph);
    }

    proptest! {
        /// For any insert/delete sequence, Body titles stay positional
        /// and the Body count stays within the cap.
        #[test]
        fn structural_invariants_hold(ops in prop::collection::vec(0..3u8, 0..40)) {
            let mut graph = SectionGraph::new();
            for op in ops {
                match op {
                    0 | 1 => {
                        let inserted = graph.insert_body(None);
                        if graph.body_count() > MAX_BODY_SECTIONS {
                            prop_assert!(false, "cap exceeded");
                        }
                        if inserted.is_none() {
                            prop_assert_eq!(graph.body_count(), MAX_BODY_SECTIONS);
                        }
                    }
                    _ => {
                        let next_body = graph.bodies().next().map(Section::id);
                        if let Some(id) = next_body {
                            graph.delete_body(&id).unwrap();
                        }
                    }
                }

                prop_assert!(graph.body_count() <= MAX_BODY_SECTIONS);
                for (rank, body) in graph.bodies().enumerate() {
                    prop_assert_eq!(body.title(), format!("Body Paragraph {}", rank + 1));
                }
                prop_assert_eq!(graph.introduction().kind(), SectionKind::Introduction);
                prop_assert_eq!(graph.conclusion().kind(), SectionKind::Conclusion);
            }
        }
    }
}
