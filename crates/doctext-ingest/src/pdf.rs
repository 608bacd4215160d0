use std::path::Path;

use doctext_core::{DocumentFormat, PdfBackend};

use crate::ExtractionError;

/// Concatenate page texts in page order, each followed by `\n`.
///
/// Pages that produced no text are skipped rather than contributing a
/// blank line.
pub fn assemble_pdf_text(pages: &[String]) -> String {
    let mut text = String::new();
    for page in pages.iter().filter(|p| !p.is_empty()) {
        text.push_str(page);
        text.push('\n');
    }
    text
}

/// Extract trimmed, non-empty text from a PDF through `backend`.
pub(crate) fn extract_with(
    backend: &dyn PdfBackend,
    path: &Path,
) -> Result<String, ExtractionError> {
    let pages = backend.page_texts(path).map_err(|source| {
        tracing::error!(backend = backend.name(), error = %source, "PDF extraction error");
        ExtractionError::ReadFailure {
            format: DocumentFormat::Pdf,
            source,
        }
    })?;

    tracing::debug!(backend = backend.name(), pages = pages.len(), "read PDF pages");

    let text = assemble_pdf_text(&pages).trim().to_string();
    if text.is_empty() {
        tracing::error!(backend = backend.name(), pages = pages.len(), "PDF yielded no text");
        return Err(ExtractionError::Empty {
            format: DocumentFormat::Pdf,
        });
    }

    tracing::debug!(chars = text.chars().count(), "assembled PDF text");
    Ok(text)
}
