use std::fmt;
use std::path::Path;
use std::sync::Arc;

use doctext_core::{DocxBackend, ExtractionConfig, PdfBackend};

pub mod docx;
mod error;
pub mod metadata;
pub mod pdf;

// Re-export domain types for convenience
pub use doctext_core::{BackendError, DocumentFormat, DocxContent, DocxTable};
pub use docx::assemble_docx_text;
pub use error::{ErrorKind, ExtractionError};
pub use metadata::{FileInfo, file_extension, get_file_info, try_get_file_info};
pub use pdf::assemble_pdf_text;

/// Format-dispatching text extractor.
///
/// Holds at most one backend per format. A format without a backend is
/// reported as [`ExtractionError::BackendUnavailable`] at call time, before
/// the file is opened. The extractor keeps no per-call state, so one
/// instance can be shared across threads.
#[derive(Clone)]
pub struct Extractor {
    pdf: Option<Arc<dyn PdfBackend>>,
    docx: Option<Arc<dyn DocxBackend>>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("pdf", &self.pdf.as_ref().map(|b| b.name()))
            .field("docx", &self.docx.as_ref().map(|b| b.name()))
            .finish()
    }
}

impl Extractor {
    /// Extractor with every backend compiled into this build.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Extractor with no backends; every format is unavailable.
    pub fn empty() -> Self {
        Self {
            pdf: None,
            docx: None,
        }
    }

    /// Extractor with the compiled-in backends that `config` leaves enabled.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            pdf: if config.pdf_enabled {
                default_pdf_backend(config)
            } else {
                None
            },
            docx: if config.docx_enabled {
                default_docx_backend(config)
            } else {
                None
            },
        }
    }

    pub fn with_pdf_backend(mut self, backend: impl PdfBackend + 'static) -> Self {
        self.pdf = Some(Arc::new(backend));
        self
    }

    pub fn with_docx_backend(mut self, backend: impl DocxBackend + 'static) -> Self {
        self.docx = Some(Arc::new(backend));
        self
    }

    /// Whether a backend is registered for `format`.
    pub fn supports(&self, format: DocumentFormat) -> bool {
        self.backend_name(format).is_some()
    }

    /// Name of the backend registered for `format`, if any.
    pub fn backend_name(&self, format: DocumentFormat) -> Option<&'static str> {
        match format {
            DocumentFormat::Pdf => self.pdf.as_ref().map(|b| b.name()),
            DocumentFormat::Docx => self.docx.as_ref().map(|b| b.name()),
        }
    }

    /// Formats that currently have a backend.
    pub fn available_formats(&self) -> Vec<DocumentFormat> {
        DocumentFormat::ALL
            .into_iter()
            .filter(|f| self.supports(*f))
            .collect()
    }

    /// Extract plain text from a PDF or DOCX file.
    ///
    /// Dispatches on the file extension (case-insensitive):
    /// - `.pdf` → PDF backend
    /// - `.docx` → DOCX backend
    /// - anything else → [`ExtractionError::UnsupportedFormat`]
    ///
    /// The path must exist; the returned text is trimmed and never empty.
    /// Errors raised by the format extractors are returned unchanged.
    pub fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        let result = self.dispatch(path);
        match &result {
            Ok(text) => {
                tracing::info!(
                    path = %path.display(),
                    chars = text.chars().count(),
                    "successfully extracted text"
                );
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    kind = %e.kind(),
                    error = %e,
                    "text extraction failed"
                );
            }
        }
        result
    }

    fn dispatch(&self, path: &Path) -> Result<String, ExtractionError> {
        if !path.exists() {
            return Err(ExtractionError::NotFound {
                path: path.to_path_buf(),
            });
        }

        match detect_format(path)? {
            DocumentFormat::Pdf => self.extract_pdf(path),
            DocumentFormat::Docx => self.extract_docx(path),
        }
    }

    /// Extract text from a PDF regardless of its extension.
    pub fn extract_pdf(&self, path: &Path) -> Result<String, ExtractionError> {
        let backend = self
            .pdf
            .as_deref()
            .ok_or(ExtractionError::BackendUnavailable {
                format: DocumentFormat::Pdf,
            })?;
        pdf::extract_with(backend, path)
    }

    /// Extract text from a DOCX file regardless of its extension.
    pub fn extract_docx(&self, path: &Path) -> Result<String, ExtractionError> {
        let backend = self
            .docx
            .as_deref()
            .ok_or(ExtractionError::BackendUnavailable {
                format: DocumentFormat::Docx,
            })?;
        docx::extract_with(backend, path)
    }
}

/// Classify a path by its extension without touching the file.
pub fn detect_format(path: &Path) -> Result<DocumentFormat, ExtractionError> {
    let extension = file_extension(path);
    DocumentFormat::from_extension(&extension)
        .ok_or(ExtractionError::UnsupportedFormat { extension })
}

/// Extract text from a file with the default backends.
pub fn extract_text_from_file(path: &Path) -> Result<String, ExtractionError> {
    Extractor::new().extract_text(path)
}

/// Extract text from a PDF with the default PDF backend.
pub fn extract_text_from_pdf(path: &Path) -> Result<String, ExtractionError> {
    Extractor::new().extract_pdf(path)
}

/// Extract text from a DOCX file with the default DOCX backend.
pub fn extract_text_from_docx(path: &Path) -> Result<String, ExtractionError> {
    Extractor::new().extract_docx(path)
}

#[cfg(feature = "pdf")]
fn default_pdf_backend(config: &ExtractionConfig) -> Option<Arc<dyn PdfBackend>> {
    let backend = doctext_pdf_mupdf::MupdfBackend::new()
        .with_replacement_char(config.pdf_replacement_char);
    Some(Arc::new(backend))
}

#[cfg(not(feature = "pdf"))]
fn default_pdf_backend(_config: &ExtractionConfig) -> Option<Arc<dyn PdfBackend>> {
    None
}

#[cfg(feature = "docx")]
fn default_docx_backend(config: &ExtractionConfig) -> Option<Arc<dyn DocxBackend>> {
    let backend =
        doctext_docx::OoxmlBackend::new().with_max_part_size(config.docx_max_part_size);
    Some(Arc::new(backend))
}

#[cfg(not(feature = "docx"))]
fn default_docx_backend(_config: &ExtractionConfig) -> Option<Arc<dyn DocxBackend>> {
    None
}
