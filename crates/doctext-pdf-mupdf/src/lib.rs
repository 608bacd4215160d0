use std::path::Path;

use mupdf::{Document, TextPageFlags};

use doctext_core::{BackendError, PdfBackend};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that DOCX-only consumers do not transitively
/// depend on it.
///
/// Each page is rendered to a structured text page; every line of every
/// block is emitted in reading order, joined with `\n`. The page string has
/// no trailing newline, so callers decide how pages are separated.
pub struct MupdfBackend {
    /// Substitute for glyphs MuPDF cannot map to a Unicode scalar.
    replacement_char: char,
}

impl Default for MupdfBackend {
    fn default() -> Self {
        Self {
            replacement_char: '\u{FFFD}',
        }
    }
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the character emitted for unmappable glyphs.
    pub fn with_replacement_char(mut self, c: char) -> Self {
        self.replacement_char = c;
        self
    }
}

impl PdfBackend for MupdfBackend {
    fn name(&self) -> &'static str {
        "mupdf"
    }

    fn page_texts(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::Open("invalid path encoding".into()))?;

        let document = Document::open(path_str).map_err(|e| BackendError::Open(e.to_string()))?;

        if document
            .needs_password()
            .map_err(|e| BackendError::Parse(e.to_string()))?
        {
            return Err(BackendError::Parse(
                "document is encrypted and requires a password".into(),
            ));
        }

        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::Parse(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::Parse(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::Parse(e.to_string()))?;

            let mut lines = Vec::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or(self.replacement_char))
                        .collect();
                    lines.push(line_text);
                }
            }
            pages_text.push(lines.join("\n"));
        }

        tracing::debug!(
            path = %path.display(),
            pages = pages_text.len(),
            "mupdf read pages"
        );

        Ok(pages_text)
    }
}
