//! Session orchestration
//!
//! One [`SessionOrchestrator`] per editing session owns the single
//! source of truth for the essay: the section graph, the active
//! section's draft buffer, throttle state, and the writing score.
//! Persistence is a side effect of the one mutation path; the analysis
//! collaborator is called asynchronously with at most one outstanding
//! check and one outstanding complete request, and responses landing
//! after the writer navigated away are discarded instead of applied to
//! the wrong section.

use crate::config::WorkflowConfig;
use crate::error::{Operation, WorkflowError};
use crate::expander::ThesisExpander;
use crate::gate::{CompletionGate, GateDecision, GraphContext};
use crate::handoff::{EssayId, EssayMeta, ReviewHandoff};
use crate::store::{keys, EssayStore};
use chrono::Utc;
use parking_lot::{Mutex, MutexGuard};
use quill_analysis::{AnalysisService, CompletenessVerdict, ErrorReport};
use quill_annotate::{annotate, AnnotatedText};
use quill_section::{Completion, GraphError, Section, SectionGraph, SectionId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Result of a proofreading error check
#[derive(Debug, Clone)]
pub struct ErrorCheck {
    /// The section that was checked
    pub section: SectionId,
    /// Normalized categorized matches
    pub report: ErrorReport,
    /// The checked text merged with its highlight runs
    pub annotated: AnnotatedText,
    /// Writing score after this check
    pub score: u32,
}

/// Outcome of [`SessionOrchestrator::check`]
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// The check applied to the still-active section
    Checked(ErrorCheck),
    /// The writer navigated away mid-flight; the result was discarded
    Superseded,
}

/// Result of a completion request
#[derive(Debug, Clone)]
pub struct CompletionResult {
    /// The section the verdict applies to
    pub section: SectionId,
    /// The normalized completeness verdict
    pub verdict: CompletenessVerdict,
    /// The gate's transition decision
    pub decision: GateDecision,
}

/// Outcome of [`SessionOrchestrator::complete`]
#[derive(Debug, Clone)]
pub enum CompleteOutcome {
    /// The decision applied to the still-active section
    Decided(CompletionResult),
    /// The writer navigated away mid-flight; the result was discarded
    Superseded,
}

/// Mutable per-session editor state, all behind one lock
struct EditorState {
    essay_id: EssayId,
    meta: EssayMeta,
    graph: SectionGraph,
    active: Option<SectionId>,
    draft: String,
    last_check: Option<Instant>,
    last_errors: Option<ErrorCheck>,
    score: u32,
}

struct SessionInner {
    config: WorkflowConfig,
    store: Arc<dyn EssayStore>,
    analysis: Arc<dyn AnalysisService>,
    expander: ThesisExpander,
    state: Mutex<EditorState>,
    check_in_flight: AtomicBool,
    complete_in_flight: AtomicBool,
}

impl SessionInner {
    fn persist_manifest(&self, state: &EditorState) {
        match serde_json::to_string(state.graph.sections()) {
            Ok(json) => self.store.set(&keys::sections(&state.essay_id), &json),
            Err(err) => tracing::error!(error = %err, "failed to serialize section manifest"),
        }
    }

    fn autosave_tick(&self) {
        let state = self.state.lock();
        if let Some(active) = state.active {
            // Always persist, even when empty: last write wins.
            self.store.set(&keys::content(&active), &state.draft);
            tracing::trace!(section = %active, "autosaved draft");
        }
    }
}

/// Resets the in-flight flag when the request settles on any path
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool, operation: Operation) -> Result<Self, WorkflowError> {
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(%operation, "request rejected, already in progress");
            return Err(WorkflowError::AlreadyInFlight { operation });
        }
        Ok(Self { flag })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Ties the workflow engine together for one editing session
pub struct SessionOrchestrator {
    inner: Arc<SessionInner>,
    autosave: Mutex<Option<JoinHandle<()>>>,
}

impl SessionOrchestrator {
    /// Open a session over a fresh essay (Introduction + Conclusion)
    #[must_use]
    pub fn new(
        meta: EssayMeta,
        store: Arc<dyn EssayStore>,
        analysis: Arc<dyn AnalysisService>,
        config: WorkflowConfig,
    ) -> Self {
        let essay_id = EssayId::new();
        tracing::info!(essay = %essay_id, title = %meta.title, "opening essay session");
        Self::with_state(essay_id, meta, SectionGraph::new(), store, analysis, config)
    }

    /// Resume a session from a persisted section manifest
    ///
    /// # Errors
    /// `WorkflowError::CorruptManifest` when the manifest is absent,
    /// not JSON, or violates the structural invariants.
    pub fn resume(
        essay_id: EssayId,
        meta: EssayMeta,
        store: Arc<dyn EssayStore>,
        analysis: Arc<dyn AnalysisService>,
        config: WorkflowConfig,
    ) -> Result<Self, WorkflowError> {
        let json = store
            .get(&keys::sections(&essay_id))
            .ok_or_else(|| WorkflowError::CorruptManifest("manifest not found".to_string()))?;
        let sections: Vec<Section> = serde_json::from_str(&json)
            .map_err(|err| WorkflowError::CorruptManifest(err.to_string()))?;
        let graph = SectionGraph::from_sections(sections)
            .map_err(|err| WorkflowError::CorruptManifest(err.to_string()))?;

        tracing::info!(essay = %essay_id, "resuming essay session");
        Ok(Self::with_state(essay_id, meta, graph, store, analysis, config))
    }

    fn with_state(
        essay_id: EssayId,
        meta: EssayMeta,
        graph: SectionGraph,
        store: Arc<dyn EssayStore>,
        analysis: Arc<dyn AnalysisService>,
        config: WorkflowConfig,
    ) -> Self {
        let inner = Arc::new(SessionInner {
            expander: ThesisExpander::new(Arc::clone(&analysis)),
            config,
            store,
            analysis,
            state: Mutex::new(EditorState {
                essay_id,
                meta,
                graph,
                active: None,
                draft: String::new(),
                last_check: None,
                last_errors: None,
                score: 0,
            }),
            check_in_flight: AtomicBool::new(false),
            complete_in_flight: AtomicBool::new(false),
        });
        {
            let state = inner.state.lock();
            inner.persist_manifest(&state);
        }
        Self {
            inner,
            autosave: Mutex::new(None),
        }
    }

    /// The essay id this session edits
    #[must_use]
    pub fn essay_id(&self) -> EssayId {
        self.lock_state().essay_id
    }

    /// The essay metadata
    #[must_use]
    pub fn meta(&self) -> EssayMeta {
        self.lock_state().meta.clone()
    }

    /// Snapshot of the current section sequence
    #[must_use]
    pub fn sections(&self) -> Vec<Section> {
        self.lock_state().graph.sections().to_vec()
    }

    /// The currently active section, if any
    #[must_use]
    pub fn active_section(&self) -> Option<SectionId> {
        self.lock_state().active
    }

    /// The active section's draft content
    #[must_use]
    pub fn active_content(&self) -> Option<String> {
        let state = self.lock_state();
        state.active.map(|_| state.draft.clone())
    }

    /// Current writing score
    #[must_use]
    pub fn score(&self) -> u32 {
        self.lock_state().score
    }

    /// The last applied error check, if one is still current
    #[must_use]
    pub fn last_error_check(&self) -> Option<ErrorCheck> {
        self.lock_state().last_errors.clone()
    }

    /// Make a section active, saving the outgoing draft first
    ///
    /// Navigation is never gated on completeness. In-flight analysis
    /// requests are not cancelled; their results are discarded when
    /// they land after this call.
    ///
    /// # Errors
    /// `WorkflowError::InvalidOperation` when the id is not in the
    /// graph.
    pub fn activate(&self, id: &SectionId) -> Result<Section, WorkflowError> {
        let mut state = self.lock_state();
        let section = state
            .graph
            .get(id)
            .cloned()
            .ok_or(GraphError::UnknownSection(*id))
            .map_err(WorkflowError::from)?;

        if let Some(current) = state.active {
            if current != *id {
                self.inner.store.set(&keys::content(&current), &state.draft);
            }
        }
        state.draft = self
            .inner
            .store
            .get(&keys::content(id))
            .unwrap_or_default();
        state.active = Some(*id);
        state.last_errors = None;
        tracing::debug!(section = %id, "section activated");
        Ok(section)
    }

    /// Replace the active section's draft content
    ///
    /// Persists immediately and re-derives completion: cleared content
    /// drops to 0%, first content bumps 0% to 50%, and checked states
    /// are otherwise left alone until the next completeness check.
    ///
    /// # Errors
    /// `WorkflowError::NoActiveSection` when nothing is active.
    pub fn update_content(&self, text: &str) -> Result<(), WorkflowError> {
        let mut state = self.lock_state();
        let id = state.active.ok_or(WorkflowError::NoActiveSection)?;
        state.draft = text.to_string();
        self.inner.store.set(&keys::content(&id), text);

        if let Some(section) = state.graph.get_mut(&id) {
            let current = section.completion();
            let next = if text.trim().is_empty() {
                Completion::Empty
            } else if current == Completion::Empty {
                Completion::Drafted
            } else {
                current
            };
            if next != current {
                section.set_completion(next);
            }
        }
        self.inner.persist_manifest(&state);
        Ok(())
    }

    /// Run a proofreading error check on the active section
    ///
    /// Rejected fast, without contacting the collaborator, when the
    /// cooldown window is still open or another check is in flight.
    /// A malformed or failed response degrades to an empty report. The
    /// result is discarded as [`CheckOutcome::Superseded`] when the
    /// writer switched sections while the request was out.
    ///
    /// # Errors
    /// - `WorkflowError::NoActiveSection` / `EmptyContent` on validation
    /// - `WorkflowError::CooldownActive` with the remaining wait
    /// - `WorkflowError::AlreadyInFlight` when a check is outstanding
    pub async fn check(&self) -> Result<CheckOutcome, WorkflowError> {
        let entry = Instant::now();
        let (section_id, text) = {
            let state = self.lock_state();
            let id = state.active.ok_or(WorkflowError::NoActiveSection)?;
            if let Some(last) = state.last_check {
                let elapsed = entry.duration_since(last);
                if elapsed < self.inner.config.check_cooldown {
                    return Err(WorkflowError::CooldownActive {
                        remaining: self.inner.config.check_cooldown - elapsed,
                    });
                }
            }
            if state.draft.trim().is_empty() {
                return Err(WorkflowError::EmptyContent);
            }
            (id, state.draft.clone())
        };

        let _guard = FlightGuard::acquire(&self.inner.check_in_flight, Operation::Check)?;
        tracing::info!(section = %section_id, "running error check");

        let response = self.inner.analysis.check_errors(&text).await;
        let report = ErrorReport::from_response(response);

        let mut state = self.lock_state();
        if state.active != Some(section_id) {
            tracing::debug!(section = %section_id, "discarding stale error check result");
            return Ok(CheckOutcome::Superseded);
        }

        state.last_check = Some(entry);
        let gained = i64::from(self.inner.config.check_score_bonus)
            - i64::try_from(report.total()).unwrap_or(i64::MAX);
        let next = i64::from(state.score).saturating_add(gained).max(0);
        state.score = u32::try_from(next).unwrap_or(u32::MAX);

        let annotated = annotate(&text, report.by_category());
        let check = ErrorCheck {
            section: section_id,
            report,
            annotated,
            score: state.score,
        };
        state.last_errors = Some(check.clone());
        Ok(CheckOutcome::Checked(check))
    }

    /// Request completion of the active section
    ///
    /// Persists the draft, consults the analysis collaborator with the
    /// previous section's content as context, and applies the gate's
    /// decision atomically: completion state, requirements snapshot,
    /// and manifest all move together. Stale results are discarded as
    /// [`CompleteOutcome::Superseded`].
    ///
    /// # Errors
    /// - `WorkflowError::NoActiveSection` / `EmptyContent` on validation
    /// - `WorkflowError::AlreadyInFlight` when a complete is outstanding
    pub async fn complete(&self) -> Result<CompleteOutcome, WorkflowError> {
        let (section_id, kind, text, previous) = {
            let state = self.lock_state();
            let id = state.active.ok_or(WorkflowError::NoActiveSection)?;
            if state.draft.trim().is_empty() {
                return Err(WorkflowError::EmptyContent);
            }
            let section = state
                .graph
                .get(&id)
                .ok_or(GraphError::UnknownSection(id))
                .map_err(WorkflowError::from)?;
            let previous = state
                .graph
                .find_previous(&id)
                .and_then(|prev| self.inner.store.get(&keys::content(&prev.id())));
            (id, section.kind(), state.draft.clone(), previous)
        };

        let _guard = FlightGuard::acquire(&self.inner.complete_in_flight, Operation::Complete)?;
        self.inner.store.set(&keys::content(&section_id), &text);
        tracing::info!(section = %section_id, %kind, "running completeness check");

        let response = self
            .inner
            .analysis
            .check_completeness(&text, kind, previous.as_deref())
            .await;
        let verdict = CompletenessVerdict::from_response(response);

        let mut state = self.lock_state();
        if state.active != Some(section_id) {
            tracing::debug!(section = %section_id, "discarding stale completeness result");
            return Ok(CompleteOutcome::Superseded);
        }

        let ctx = GraphContext::for_section(&state.graph, &section_id);
        let decision = CompletionGate::decide(kind, &verdict, &ctx);

        if let Some(section) = state.graph.get_mut(&section_id) {
            section.set_completion(decision.completion);
            section.set_requirements(decision.requirements.clone());
        }
        match &decision.requirements {
            Some(snapshot) => match serde_json::to_string(snapshot) {
                Ok(json) => self
                    .inner
                    .store
                    .set(&keys::requirements(&section_id), &json),
                Err(err) => {
                    tracing::error!(error = %err, "failed to serialize requirements snapshot");
                }
            },
            None => self.inner.store.remove(&keys::requirements(&section_id)),
        }
        self.inner.persist_manifest(&state);

        Ok(CompleteOutcome::Decided(CompletionResult {
            section: section_id,
            verdict,
            decision,
        }))
    }

    /// Insert one manual Body paragraph before the Conclusion
    ///
    /// Returns `None` without mutating anything when the Body cap is
    /// already reached.
    pub fn add_body_paragraph(&self) -> Option<Section> {
        let mut state = self.lock_state();
        let inserted = state.graph.insert_body(None);
        if inserted.is_some() {
            self.inner.persist_manifest(&state);
        }
        inserted
    }

    /// Generate Body sections from the introduction's thesis
    ///
    /// Does not mutate the graph: commit the result through
    /// [`Self::regenerate_bodies`] once the writer confirms, or drop it
    /// to keep the existing paragraphs.
    pub async fn expand_thesis(&self) -> Vec<Section> {
        let intro_text = {
            let state = self.lock_state();
            let intro = state.graph.introduction().id();
            if state.active == Some(intro) {
                state.draft.clone()
            } else {
                self.inner
                    .store
                    .get(&keys::content(&intro))
                    .unwrap_or_default()
            }
        };
        self.inner.expander.expand(&intro_text).await
    }

    /// Commit generated Body sections, replacing every existing one
    ///
    /// Destructive: the replaced sections' content and requirement keys
    /// are torn down. Returns the new section sequence.
    pub fn regenerate_bodies(&self, bodies: Vec<Section>) -> Vec<Section> {
        let mut state = self.lock_state();
        let removed = state.graph.replace_bodies_with(bodies);
        for section in &removed {
            self.inner.store.remove(&keys::content(&section.id()));
            self.inner.store.remove(&keys::requirements(&section.id()));
        }
        if let Some(active) = state.active {
            if removed.iter().any(|s| s.id() == active) {
                let intro = state.graph.introduction().id();
                state.draft = self
                    .inner
                    .store
                    .get(&keys::content(&intro))
                    .unwrap_or_default();
                state.active = Some(intro);
                state.last_errors = None;
            }
        }
        self.inner.persist_manifest(&state);
        tracing::info!(replaced = removed.len(), "body sections regenerated");
        state.graph.sections().to_vec()
    }

    /// Delete a Body paragraph
    ///
    /// Tears down its persisted keys and, when the deleted section was
    /// active, activates the nearest surviving section.
    ///
    /// # Errors
    /// `WorkflowError::InvalidOperation` for unknown ids or non-Body
    /// sections; nothing is partially applied.
    pub fn delete_body(&self, id: &SectionId) -> Result<Vec<Section>, WorkflowError> {
        let mut state = self.lock_state();
        let old_position = state.graph.position(id);
        let sections = state.graph.delete_body(id)?;

        self.inner.store.remove(&keys::content(id));
        self.inner.store.remove(&keys::requirements(id));

        if state.active == Some(*id) {
            let fallback = old_position
                .unwrap_or(0)
                .min(sections.len().saturating_sub(1));
            let next = sections[fallback].id();
            state.draft = self
                .inner
                .store
                .get(&keys::content(&next))
                .unwrap_or_default();
            state.active = Some(next);
            state.last_errors = None;
            tracing::debug!(deleted = %id, activated = %next, "active section deleted");
        }
        self.inner.persist_manifest(&state);
        Ok(sections)
    }

    /// Build the review handoff for the submission collaborator
    ///
    /// The engine performs no submission itself; it saves the active
    /// draft and packages the section sequence with the essay metadata.
    #[must_use]
    pub fn finalize(&self) -> ReviewHandoff {
        let state = self.lock_state();
        if let Some(active) = state.active {
            self.inner.store.set(&keys::content(&active), &state.draft);
        }
        tracing::info!(essay = %state.essay_id, "handing essay off for review");
        ReviewHandoff {
            essay_id: state.essay_id,
            essay: state.meta.clone(),
            sections: state.graph.sections().to_vec(),
            generated_at: Utc::now(),
        }
    }

    /// Reset the essay atomically
    ///
    /// Tears down every key the manifest lists, then starts over with a
    /// fresh Introduction and Conclusion.
    pub fn reset(&self) -> Vec<Section> {
        let mut state = self.lock_state();
        for section in state.graph.sections() {
            self.inner.store.remove(&keys::content(&section.id()));
            self.inner.store.remove(&keys::requirements(&section.id()));
        }
        self.inner.store.remove(&keys::sections(&state.essay_id));

        state.graph = SectionGraph::new();
        state.active = None;
        state.draft.clear();
        state.last_check = None;
        state.last_errors = None;
        state.score = 0;
        self.inner.persist_manifest(&state);
        tracing::info!(essay = %state.essay_id, "essay reset");
        state.graph.sections().to_vec()
    }

    /// Start the fixed-interval autosave task
    ///
    /// Persists the active draft every interval regardless of content,
    /// independent of any in-flight analysis request. Idempotent while
    /// a task is already running; stopped by [`Self::stop_autosave`] or
    /// on drop.
    pub fn start_autosave(&self) {
        let mut slot = self.autosave.lock();
        if slot.is_some() {
            return;
        }
        let inner = Arc::clone(&self.inner);
        let interval = inner.config.autosave_interval;
        *slot = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; the save loop starts
            // one full interval in.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                inner.autosave_tick();
            }
        }));
    }

    /// Stop the autosave task, if running
    pub fn stop_autosave(&self) {
        if let Some(handle) = self.autosave.lock().take() {
            handle.abort();
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, EditorState> {
        self.inner.state.lock()
    }
}

impl Drop for SessionOrchestrator {
    fn drop(&mut self) {
        self.stop_autosave();
    }
}

impl std::fmt::Debug for SessionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock_state();
        f.debug_struct("SessionOrchestrator")
            .field("essay_id", &state.essay_id)
            .field("active", &state.active)
            .field("sections", &state.graph.sections().len())
            .finish_non_exhaustive()
    }
}
