use std::path::PathBuf;

use thiserror::Error;

use crate::layout::DocumentLayout;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open {path}: {message}")]
    Open { path: String, message: String },
    #[error("failed to extract page layout: {0}")]
    Layout(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A readable PDF resource supplied by the caller.
///
/// The core performs no file discovery or validation beyond what the
/// tokenizer itself raises.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// A PDF on the local filesystem.
    Path(PathBuf),
    /// An in-memory PDF with a caller-supplied name.
    Bytes { name: String, data: Vec<u8> },
}

impl DocumentSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        DocumentSource::Path(path.into())
    }

    pub fn bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        DocumentSource::Bytes {
            name: name.into(),
            data,
        }
    }

    /// The identifier the resulting outline carries: the file name for
    /// path input, the supplied name for buffers.
    pub fn paper_id(&self) -> String {
        match self {
            DocumentSource::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            DocumentSource::Bytes { name, .. } => name.clone(),
        }
    }
}

/// Trait for page-layout tokenizer backends.
///
/// Implementors materialize the blocks → lines → spans structure of a
/// document in one call and release the underlying handle before
/// returning; the outline pipeline in `examscan-parsing` consumes the
/// result and never touches the handle itself.
pub trait LayoutBackend: Send + Sync {
    /// Load the full layout of a document.
    ///
    /// Failing to open or read the document is fatal and must name the
    /// failing input; unexpected page geometry is not an error here.
    fn load_layout(&self, source: &DocumentSource) -> Result<DocumentLayout, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_id_from_path() {
        let source = DocumentSource::path("/tmp/uploads/paper_midyear.pdf");
        assert_eq!(source.paper_id(), "paper_midyear.pdf");
    }

    #[test]
    fn test_paper_id_from_bytes() {
        let source = DocumentSource::bytes("uploaded.pdf", vec![0x25, 0x50, 0x44, 0x46]);
        assert_eq!(source.paper_id(), "uploaded.pdf");
    }

    #[test]
    fn test_open_error_names_path() {
        let err = BackendError::Open {
            path: "missing.pdf".into(),
            message: "no such file".into(),
        };
        assert!(err.to_string().contains("missing.pdf"));
    }
}
