//! The persistence collaborator seam
//!
//! A plain key-value contract: section content and requirement
//! snapshots live here, keyed by section id, and the essay-scoped
//! manifest lists every section so teardown is a single deterministic
//! walk instead of a key-prefix sweep.

use crate::handoff::EssayId;
use quill_section::SectionId;

/// External key-value persistence collaborator
pub trait EssayStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value (last write wins)
    fn set(&self, key: &str, value: &str);
    /// Remove a value; removing an absent key is a no-op
    fn remove(&self, key: &str);
}

/// Key scheme shared by the engine and its persistence collaborator
pub mod keys {
    use super::{EssayId, SectionId};

    /// Key holding a section's free text
    #[must_use]
    pub fn content(id: &SectionId) -> String {
        format!("content:{id}")
    }

    /// Key holding a section's unresolved-requirements snapshot
    #[must_use]
    pub fn requirements(id: &SectionId) -> String {
        format!("requirements:{id}")
    }

    /// Key holding the essay's section manifest
    #[must_use]
    pub fn sections(essay_id: &EssayId) -> String {
        format!("sections:{essay_id}")
    }
}
