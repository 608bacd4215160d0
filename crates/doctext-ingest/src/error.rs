use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use doctext_core::{BackendError, DocumentFormat};

/// Every way text extraction can fail.
///
/// The dispatcher contributes `NotFound` and `UnsupportedFormat`; the
/// format extractors contribute the rest. Errors pass through the
/// dispatcher unchanged.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("unsupported file type: '{extension}' (supported: .pdf, .docx)")]
    UnsupportedFormat { extension: String },
    #[error("{format} support not available: no {format} backend is configured")]
    BackendUnavailable { format: DocumentFormat },
    #[error("failed to extract text from {format}: {source}")]
    ReadFailure {
        format: DocumentFormat,
        #[source]
        source: BackendError,
    },
    #[error("no text could be extracted from the {format} file")]
    Empty { format: DocumentFormat },
}

/// Fieldless mirror of [`ExtractionError`] for branching and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    UnsupportedFormat,
    BackendUnavailable,
    ReadFailure,
    Empty,
}

impl ExtractionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::NotFound { .. } => ErrorKind::NotFound,
            ExtractionError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            ExtractionError::BackendUnavailable { .. } => ErrorKind::BackendUnavailable,
            ExtractionError::ReadFailure { .. } => ErrorKind::ReadFailure,
            ExtractionError::Empty { .. } => ErrorKind::Empty,
        }
    }

    /// The format involved, if classification got that far.
    pub fn format(&self) -> Option<DocumentFormat> {
        match self {
            ExtractionError::BackendUnavailable { format }
            | ExtractionError::ReadFailure { format, .. }
            | ExtractionError::Empty { format } => Some(*format),
            ExtractionError::NotFound { .. } | ExtractionError::UnsupportedFormat { .. } => None,
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::BackendUnavailable => "backend_unavailable",
            ErrorKind::ReadFailure => "read_failure",
            ErrorKind::Empty => "empty",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
