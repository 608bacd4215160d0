use std::path::Path;

use doctext_core::{DocumentFormat, DocxBackend, DocxContent};

use crate::ExtractionError;

/// Build the plain-text form of a DOCX body.
///
/// All paragraphs come first, each followed by `\n`. Tables follow in
/// document order: each cell is followed by a single space and each row by
/// `\n`. Tables are therefore not interleaved at their position in the
/// document; downstream consumers rely on this ordering.
pub fn assemble_docx_text(content: &DocxContent) -> String {
    let mut text = String::new();

    for paragraph in &content.paragraphs {
        text.push_str(paragraph);
        text.push('\n');
    }

    for table in &content.tables {
        for row in &table.rows {
            for cell in row {
                text.push_str(cell);
                text.push(' ');
            }
            text.push('\n');
        }
    }

    text
}

/// Extract trimmed, non-empty text from a DOCX file through `backend`.
pub(crate) fn extract_with(
    backend: &dyn DocxBackend,
    path: &Path,
) -> Result<String, ExtractionError> {
    let content = backend.read_document(path).map_err(|source| {
        tracing::error!(backend = backend.name(), error = %source, "DOCX extraction error");
        ExtractionError::ReadFailure {
            format: DocumentFormat::Docx,
            source,
        }
    })?;

    tracing::debug!(
        backend = backend.name(),
        paragraphs = content.paragraphs.len(),
        tables = content.tables.len(),
        "read DOCX body"
    );

    let text = assemble_docx_text(&content).trim().to_string();
    if text.is_empty() {
        tracing::error!(backend = backend.name(), "DOCX yielded no text");
        return Err(ExtractionError::Empty {
            format: DocumentFormat::Docx,
        });
    }

    tracing::debug!(chars = text.chars().count(), "assembled DOCX text");
    Ok(text)
}
