//! Per-section completion gating
//!
//! The gate turns a completeness verdict plus graph context into the
//! next actions offered to the writer. It never blocks: an incomplete
//! verdict changes what is surfaced, not where the writer may go.

use quill_analysis::CompletenessVerdict;
use quill_section::{Completion, RequirementsSnapshot, SectionGraph, SectionId, SectionKind};
use serde::{Deserialize, Serialize};

/// Graph facts the gate needs about the section under decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphContext {
    /// Number of Body sections currently in the graph
    pub body_count: usize,
    /// The next Body section after this one, if any
    pub next_body: Option<SectionId>,
    /// The Conclusion section, if present
    pub conclusion: Option<SectionId>,
}

impl GraphContext {
    /// Capture the context for one section
    #[must_use]
    pub fn for_section(graph: &SectionGraph, id: &SectionId) -> Self {
        Self {
            body_count: graph.body_count(),
            next_body: graph.next_body_after(id).map(quill_section::Section::id),
            conclusion: Some(graph.conclusion().id()),
        }
    }
}

/// A next step the workflow surfaces after a completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextAction {
    /// Insert one manual Body paragraph
    AddBodyParagraph,
    /// Navigate to the next Body paragraph
    ContinueToNextBody(SectionId),
    /// Navigate to the Conclusion
    MoveToConclusion(SectionId),
    /// Generate Body paragraphs from the introduction's thesis
    ExpandThesis,
    /// Keep the Body paragraphs already written
    KeepExistingBodies,
    /// Replace all Body paragraphs with regenerated ones; destructive,
    /// requires explicit confirmation before committing
    RegenerateBodies,
    /// Hand the essay off for review and submission
    Finalize {
        /// Whether the conclusion's criteria are currently met
        requirements_met: bool,
    },
}

/// Outcome of one completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
    /// New completion state for the section
    pub completion: Completion,
    /// Requirements snapshot to persist while incomplete
    pub requirements: Option<RequirementsSnapshot>,
    /// Actions offered to the writer, in presentation order
    pub actions: Vec<NextAction>,
}

/// The per-section completion state machine
///
/// Stateless: state lives on the sections themselves and is recomputed
/// from each verdict, never accumulated.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionGate;

impl CompletionGate {
    /// Decide the transition for one completion request
    #[must_use]
    pub fn decide(
        kind: SectionKind,
        verdict: &CompletenessVerdict,
        ctx: &GraphContext,
    ) -> GateDecision {
        let completion = if verdict.is_complete {
            Completion::Complete
        } else {
            Completion::Drafted
        };
        let requirements = (!verdict.is_complete).then(|| {
            RequirementsSnapshot::new(verdict.missing.clone(), verdict.improvements.clone())
        });

        let actions = match kind {
            SectionKind::Introduction => Self::introduction_actions(verdict.is_complete, ctx),
            SectionKind::Body => Self::body_actions(verdict.is_complete, ctx),
            SectionKind::Conclusion => vec![NextAction::Finalize {
                requirements_met: verdict.is_complete,
            }],
        };

        GateDecision {
            completion,
            requirements,
            actions,
        }
    }

    fn introduction_actions(is_complete: bool, ctx: &GraphContext) -> Vec<NextAction> {
        if !is_complete {
            return vec![NextAction::AddBodyParagraph];
        }
        if ctx.body_count == 0 {
            // Auto-generation is the primary offer; the manual path
            // stays available as an escape hatch.
            vec![NextAction::ExpandThesis, NextAction::AddBodyParagraph]
        } else {
            vec![NextAction::KeepExistingBodies, NextAction::RegenerateBodies]
        }
    }

    fn body_actions(is_complete: bool, ctx: &GraphContext) -> Vec<NextAction> {
        let mut actions = vec![NextAction::AddBodyParagraph];
        if let Some(next) = ctx.next_body {
            actions.push(NextAction::ContinueToNextBody(next));
        }
        if is_complete {
            if let Some(conclusion) = ctx.conclusion {
                actions.push(NextAction::MoveToConclusion(conclusion));
            }
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> CompletenessVerdict {
        CompletenessVerdict {
            is_complete: true,
            ..CompletenessVerdict::default()
        }
    }

    fn incomplete(missing: &[&str]) -> CompletenessVerdict {
        CompletenessVerdict {
            is_complete: false,
            missing: missing.iter().map(ToString::to_string).collect(),
            improvements: vec!["tighten the argument".to_string()],
            ..CompletenessVerdict::default()
        }
    }

    fn ctx(body_count: usize) -> GraphContext {
        GraphContext {
            body_count,
            next_body: None,
            conclusion: Some(SectionId::new()),
        }
    }

    #[test]
    fn incomplete_intro_offers_manual_body() {
        let decision =
            CompletionGate::decide(SectionKind::Introduction, &incomplete(&["thesis"]), &ctx(0));
        assert_eq!(decision.completion, Completion::Drafted);
        assert_eq!(decision.actions, vec![NextAction::AddBodyParagraph]);
        assert_eq!(
            decision.requirements.unwrap().missing,
            vec!["thesis".to_string()]
        );
    }

    #[test]
    fn complete_intro_without_bodies_offers_expansion_never_keep() {
        let decision = CompletionGate::decide(SectionKind::Introduction, &complete(), &ctx(0));
        assert_eq!(decision.completion, Completion::Complete);
        assert!(decision.actions.contains(&NextAction::ExpandThesis));
        assert!(!decision.actions.contains(&NextAction::KeepExistingBodies));
        assert!(decision.requirements.is_none());
    }

    #[test]
    fn complete_intro_with_bodies_offers_keep_or_regenerate() {
        let decision = CompletionGate::decide(SectionKind::Introduction, &complete(), &ctx(2));
        assert_eq!(
            decision.actions,
            vec![NextAction::KeepExistingBodies, NextAction::RegenerateBodies]
        );
        assert!(!decision.actions.contains(&NextAction::ExpandThesis));
    }

    #[test]
    fn incomplete_body_still_offers_progress() {
        let next = SectionId::new();
        let context = GraphContext {
            body_count: 2,
            next_body: Some(next),
            conclusion: Some(SectionId::new()),
        };
        let decision = CompletionGate::decide(SectionKind::Body, &incomplete(&["evidence"]), &context);

        assert_eq!(decision.completion, Completion::Drafted);
        assert!(decision.actions.contains(&NextAction::AddBodyParagraph));
        assert!(decision
            .actions
            .contains(&NextAction::ContinueToNextBody(next)));
        assert!(
            !decision
                .actions
                .iter()
                .any(|a| matches!(a, NextAction::MoveToConclusion(_))),
            "conclusion eligibility requires a complete verdict"
        );
    }

    #[test]
    fn complete_body_adds_conclusion_eligibility() {
        let conclusion = SectionId::new();
        let context = GraphContext {
            body_count: 1,
            next_body: None,
            conclusion: Some(conclusion),
        };
        let decision = CompletionGate::decide(SectionKind::Body, &complete(), &context);
        assert!(decision
            .actions
            .contains(&NextAction::MoveToConclusion(conclusion)));
        assert!(!decision
            .actions
            .iter()
            .any(|a| matches!(a, NextAction::ContinueToNextBody(_))));
    }

    #[test]
    fn incomplete_conclusion_still_offers_finalize() {
        let decision =
            CompletionGate::decide(SectionKind::Conclusion, &incomplete(&["closure"]), &ctx(3));
        assert_eq!(
            decision.actions,
            vec![NextAction::Finalize {
                requirements_met: false
            }]
        );
        assert_eq!(decision.completion, Completion::Drafted);
    }

    #[test]
    fn complete_conclusion_finalizes_with_requirements_met() {
        let decision = CompletionGate::decide(SectionKind::Conclusion, &complete(), &ctx(3));
        assert_eq!(
            decision.actions,
            vec![NextAction::Finalize {
                requirements_met: true
            }]
        );
        assert_eq!(decision.completion, Completion::Complete);
    }
}
