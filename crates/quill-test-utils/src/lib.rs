//! Testing utilities for the quill workspace
//!
//! Shared fakes, payload builders, and fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use quill_analysis::{AnalysisError, AnalysisService};
use quill_core::EssayStore;
use quill_section::SectionKind;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// In-memory key-value store standing in for the persistence collaborator
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored key, for teardown assertions
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl EssayStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

type Scripted = Mutex<VecDeque<Result<Value, AnalysisError>>>;

/// Deterministic [`AnalysisService`] fake driven by scripted responses
///
/// Each method pops its own response queue; an unscripted call fails
/// with a transport error so tests surface missing scripts instead of
/// silently passing. An optional response delay keeps requests
/// in-flight under a paused tokio clock for throttle and staleness
/// tests.
#[derive(Debug, Default)]
pub struct ScriptedAnalysis {
    errors: Scripted,
    completeness: Scripted,
    thesis: Scripted,
    error_calls: AtomicUsize,
    completeness_calls: AtomicUsize,
    thesis_calls: AtomicUsize,
    response_delay: Mutex<Option<Duration>>,
}

impl ScriptedAnalysis {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_errors(&self, response: Result<Value, AnalysisError>) {
        self.errors.lock().push_back(response);
    }

    pub fn push_completeness(&self, response: Result<Value, AnalysisError>) {
        self.completeness.lock().push_back(response);
    }

    pub fn push_thesis(&self, response: Result<Value, AnalysisError>) {
        self.thesis.lock().push_back(response);
    }

    /// Delay every response, keeping requests observably in flight
    pub fn set_response_delay(&self, delay: Duration) {
        *self.response_delay.lock() = Some(delay);
    }

    #[must_use]
    pub fn error_calls(&self) -> usize {
        self.error_calls.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn completeness_calls(&self) -> usize {
        self.completeness_calls.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn thesis_calls(&self) -> usize {
        self.thesis_calls.load(Ordering::Acquire)
    }

    async fn respond(&self, queue: &Scripted, counter: &AtomicUsize) -> Result<Value, AnalysisError> {
        counter.fetch_add(1, Ordering::AcqRel);
        let delay = *self.response_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AnalysisError::Transport("no scripted response".to_string())))
    }
}

#[async_trait]
impl AnalysisService for ScriptedAnalysis {
    async fn check_errors(&self, _text: &str) -> Result<Value, AnalysisError> {
        self.respond(&self.errors, &self.error_calls).await
    }

    async fn check_completeness(
        &self,
        _content: &str,
        _kind: SectionKind,
        _previous: Option<&str>,
    ) -> Result<Value, AnalysisError> {
        self.respond(&self.completeness, &self.completeness_calls)
            .await
    }

    async fn extract_thesis_points(&self, _intro_text: &str) -> Result<Value, AnalysisError> {
        self.respond(&self.thesis, &self.thesis_calls).await
    }
}

/// Completeness payload with every criterion met
#[must_use]
pub fn complete_payload() -> Value {
    json!({
        "isComplete": true,
        "completionStatus": {"met": ["all criteria"], "missing": []},
        "feedbackItems": [],
        "suggestedImprovements": []
    })
}

/// Completeness payload listing unmet criteria
#[must_use]
pub fn incomplete_payload(missing: &[&str]) -> Value {
    json!({
        "isComplete": false,
        "completionStatus": {"met": [], "missing": missing},
        "feedbackItems": [],
        "suggestedImprovements": ["revise the section"]
    })
}

/// Error-check payload with no findings
#[must_use]
pub fn no_errors_payload() -> Value {
    json!([])
}

/// Thesis payload with one point per name
#[must_use]
pub fn thesis_payload(points: &[&str]) -> Value {
    let main_points: Vec<Value> = points
        .iter()
        .map(|point| json!({"point": point, "keywords": [], "suggestedEvidence": []}))
        .collect();
    json!({ "mainPoints": main_points })
}

/// Install a test tracing subscriber; repeated calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
