use serde::{Deserialize, Serialize};

pub mod backend;
pub mod layout;

// Re-export for convenience
pub use backend::{BackendError, DocumentSource, LayoutBackend};
pub use layout::{BlockLayout, DocumentLayout, LineLayout, PageLayout, SpanLayout};

/// A lettered sub-part nested under one top-level question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subpart {
    /// Parent question identifier plus the letter, e.g. `"Q3a"`.
    pub id: String,
    /// The single lowercase letter, e.g. `'a'`.
    pub label: char,
    /// Accumulated body text, space-joined.
    pub text: String,
}

/// One reconstructed top-level question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, `"Q"` plus the detected number. Assigned once,
    /// at creation, and never re-derived from text afterward.
    pub id: String,
    /// Accumulated body text, space-joined.
    pub text: String,
    /// 1-based page on which the question boundary was accepted.
    pub page: u32,
    /// Sub-parts in detection order.
    pub subparts: Vec<Subpart>,
}

/// The outline extracted from one paper.
///
/// Questions appear in detection order, which follows page/line order —
/// a numbering reset in a multi-paper document legitimately yields a
/// non-monotonic identifier sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperOutline {
    /// Identifier derived from the file name, or supplied by the caller
    /// for in-memory input.
    pub paper_id: String,
    pub questions: Vec<Question>,
    /// Text seen before the first detected boundary. Only populated when
    /// preamble capture is enabled; absent from JSON otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preamble: Option<String>,
}
