//! Quill Core - the essay section workflow engine
//!
//! The central crate that:
//! - Gates progression between sections on completeness verdicts
//! - Expands a completed introduction into generated body paragraphs
//! - Orchestrates an editing session: throttled analysis requests,
//!   content persistence, autosave, and stale-response protection
//!
//! # Example
//!
//! ```rust,ignore
//! use quill_core::{EssayMeta, SessionOrchestrator, WorkflowConfig};
//!
//! # async fn example(store: std::sync::Arc<dyn quill_core::EssayStore>,
//! #                  analysis: std::sync::Arc<dyn quill_analysis::AnalysisService>) {
//! let meta = EssayMeta::new("My Essay", "Prompt", "discussion");
//! let session = SessionOrchestrator::new(meta, store, analysis, WorkflowConfig::new());
//!
//! let intro = session.sections()[0].id();
//! session.activate(&intro).unwrap();
//! session.update_content("An essay needs a thesis.").unwrap();
//! let outcome = session.check().await.unwrap();
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod expander;
pub mod gate;
pub mod handoff;
pub mod session;
pub mod store;

pub use config::WorkflowConfig;
pub use error::{Operation, WorkflowError};
pub use expander::ThesisExpander;
pub use gate::{CompletionGate, GateDecision, GraphContext, NextAction};
pub use handoff::{EssayId, EssayMeta, ReviewHandoff};
pub use session::{
    CheckOutcome, CompleteOutcome, CompletionResult, ErrorCheck, SessionOrchestrator,
};
pub use store::{keys, EssayStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the workflow engine
    pub use crate::{
        CheckOutcome, CompleteOutcome, EssayMeta, NextAction, SessionOrchestrator,
        WorkflowConfig, WorkflowError,
    };
    pub use quill_analysis::{AnalysisService, CompletenessVerdict};
    pub use quill_section::{Completion, Section, SectionGraph, SectionId, SectionKind};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
