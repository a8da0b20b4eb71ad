use thiserror::Error;

pub mod config;
pub mod extractor;
pub mod sequence;
pub mod zone;

pub use config::{ConfigError, ListOverride, OutlineConfig, OutlineConfigBuilder};
pub use extractor::OutlineExtractor;
pub use sequence::{Acceptance, SequenceTracker};
pub use zone::Zone;
// Re-export domain types from core (canonical definitions live there)
pub use examscan_core::{
    BackendError, DocumentLayout, DocumentSource, LayoutBackend, PaperOutline, Question, Subpart,
};

#[derive(Error, Debug)]
pub enum OutlineError {
    #[error("backend error: {0}")]
    Backend(#[from] examscan_core::BackendError),
}

/// Extract the question outline of an exam paper using the given layout
/// backend.
///
/// Pipeline:
/// 1. Materialize the page layout (blocks → lines → spans) via `backend`
/// 2. Drop spans in the header/footer bands
/// 3. Detect question boundaries from bold in-sequence numerals
/// 4. Gate out boilerplate lines; halt at answer-scheme onset
/// 5. Assemble questions and lettered sub-parts in detection order
pub fn extract_outline(
    source: &DocumentSource,
    backend: &dyn LayoutBackend,
) -> Result<PaperOutline, OutlineError> {
    OutlineExtractor::new().extract_via_backend(source, backend)
}
