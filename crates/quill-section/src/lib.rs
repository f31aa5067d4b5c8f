//! Quill Section - essay section entities and the ordered section graph
//!
//! The foundational crate of the workspace:
//! - [`Section`] metadata entities (content lives in the persistence
//!   collaborator, keyed by [`SectionId`])
//! - [`SectionGraph`] owning the ordered sequence and its structural
//!   invariants (Introduction first, Conclusion last, at most
//!   [`MAX_BODY_SECTIONS`] Body sections in between, positional titles)

pub mod graph;
pub mod section;

pub use graph::{GraphError, SectionGraph, MAX_BODY_SECTIONS};
pub use section::{Completion, RequirementsSnapshot, Section, SectionId, SectionKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
