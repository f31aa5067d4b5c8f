//! Essay identity and the review handoff

use chrono::{DateTime, Utc};
use quill_section::Section;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use ulid::Ulid;

/// Unique essay identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EssayId(pub Ulid);

impl EssayId {
    /// Generate a new essay id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for EssayId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EssayId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptive essay metadata supplied at setup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssayMeta {
    /// Essay title
    pub title: String,
    /// The prompt the essay answers
    pub prompt: String,
    /// The post type the finished essay becomes
    pub post_type: String,
}

impl EssayMeta {
    /// Create essay metadata
    #[inline]
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        prompt: impl Into<String>,
        post_type: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
            post_type: post_type.into(),
        }
    }
}

/// The package emitted to the submission collaborator on finalize
///
/// The engine builds this and stops; review and network submission are
/// the collaborator's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewHandoff {
    /// The essay being handed off
    pub essay_id: EssayId,
    /// Descriptive metadata
    pub essay: EssayMeta,
    /// Section sequence with completion states
    pub sections: Vec<Section>,
    /// When the handoff was generated
    pub generated_at: DateTime<Utc>,
}
