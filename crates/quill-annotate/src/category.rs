//! Error categories and the match contract
//!
//! The five categories are fixed; each carries a stable highlight color
//! so renderers agree on the palette without owning it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// The five proofreading error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCategory {
    /// Typing mistakes, endings, capitalization, compounds
    Spelling,
    /// Commas, colons, clause separation
    Punctuation,
    /// Meaning, missing words, word choice
    LexicoSemantic,
    /// Register, repetition, word order, sentence length
    Stylistic,
    /// Spacing, layout, formatting
    Typographical,
}

impl ErrorCategory {
    /// All categories in their canonical order
    pub const ALL: [Self; 5] = [
        Self::Spelling,
        Self::Punctuation,
        Self::LexicoSemantic,
        Self::Stylistic,
        Self::Typographical,
    ];

    /// Parse the wire tag used by the analysis collaborator
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "spelling" => Some(Self::Spelling),
            "punctuation" => Some(Self::Punctuation),
            "lexicoSemantic" => Some(Self::LexicoSemantic),
            "stylistic" => Some(Self::Stylistic),
            "typographical" => Some(Self::Typographical),
            _ => None,
        }
    }

    /// Wire tag for this category
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Spelling => "spelling",
            Self::Punctuation => "punctuation",
            Self::LexicoSemantic => "lexicoSemantic",
            Self::Stylistic => "stylistic",
            Self::Typographical => "typographical",
        }
    }

    /// Human-facing category label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Spelling => "Spelling",
            Self::Punctuation => "Punctuation",
            Self::LexicoSemantic => "Meaning & Word Choice",
            Self::Stylistic => "Style",
            Self::Typographical => "Typography",
        }
    }

    /// Highlight color for this category
    #[must_use]
    pub fn color(self) -> Rgb {
        match self {
            Self::Spelling => Rgb::new(254, 202, 202),
            Self::Punctuation => Rgb::new(255, 255, 0),
            Self::LexicoSemantic => Rgb::new(254, 128, 0),
            Self::Stylistic => Rgb::new(191, 219, 254),
            Self::Typographical => Rgb::new(187, 247, 208),
        }
    }
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// An sRGB highlight color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Create a color from channels
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// One error reported by the analysis collaborator
///
/// `text` is the verbatim substring to locate, not an offset: the
/// collaborator has no say over positions, and a match referencing
/// stale text simply finds no occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMatch {
    /// Exact problematic text to find
    pub text: String,
    /// Explanation of the error
    pub message: String,
    /// Correction suggestions
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Matches grouped by category, iterating in insertion order
pub type MatchesByCategory = IndexMap<ErrorCategory, Vec<ErrorMatch>>;
