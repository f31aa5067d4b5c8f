//! Error types for the workflow engine
//!
//! Covers the caller-visible failures: validation, throttling, and
//! rejected structural operations. Malformed analysis payloads are not
//! represented here; they are recovered inside the normalizers with
//! safe defaults, and stale analysis responses surface as `Superseded`
//! outcomes rather than errors.

use quill_section::GraphError;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

/// The throttled long-running operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Proofreading error check
    Check,
    /// Section completeness check
    Complete,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Check => "check",
            Self::Complete => "complete",
        };
        write!(f, "{name}")
    }
}

/// Main workflow error type
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// The section has no content to analyze
    #[error("section has no content yet")]
    EmptyContent,

    /// No section is currently active in the session
    #[error("no active section")]
    NoActiveSection,

    /// A request of the same kind is still in flight
    #[error("a {operation} request is already in progress")]
    AlreadyInFlight {
        /// Which operation is in flight
        operation: Operation,
    },

    /// The check cooldown window has not elapsed
    #[error("check cooldown active, {} seconds remaining", remaining.as_secs())]
    CooldownActive {
        /// Time left until the next check is allowed
        remaining: Duration,
    },

    /// A structural operation was rejected by the section graph
    #[error("invalid operation: {0}")]
    InvalidOperation(#[from] GraphError),

    /// A persisted section manifest could not be restored
    #[error("stored section manifest is corrupt: {0}")]
    CorruptManifest(String),
}

impl WorkflowError {
    /// Whether this is a throttle rejection (in-flight or cooldown)
    #[inline]
    #[must_use]
    pub fn is_throttle(&self) -> bool {
        matches!(
            self,
            Self::AlreadyInFlight { .. } | Self::CooldownActive { .. }
        )
    }

    /// Remaining wait for cooldown rejections
    #[inline]
    #[must_use]
    pub fn remaining_wait(&self) -> Option<Duration> {
        match self {
            Self::CooldownActive { remaining } => Some(*remaining),
            _ => None,
        }
    }
}
