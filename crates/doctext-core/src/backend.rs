use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    Open(String),
    #[error("failed to parse document: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors only read pages; concatenation, trimming and the empty-text
/// check are applied by the caller so every backend behaves the same way.
pub trait PdfBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Text of every page, in page order.
    ///
    /// A page without extractable text (e.g. a scanned image) yields an
    /// empty string rather than an error.
    fn page_texts(&self, path: &Path) -> Result<Vec<String>, BackendError>;
}

/// Trait for DOCX reading backends.
pub trait DocxBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Read the body paragraphs and body tables of a DOCX file.
    fn read_document(&self, path: &Path) -> Result<DocxContent, BackendError>;
}

/// Text content of a DOCX body, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocxContent {
    /// Text of each body-level paragraph.
    pub paragraphs: Vec<String>,
    /// Body-level tables. Tables nested inside cells are not listed.
    pub tables: Vec<DocxTable>,
}

/// A table as row-major cell texts.
///
/// A cell's text is its paragraphs joined with `\n`. Cells spanning several
/// grid columns appear once per column they cover.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocxTable {
    pub rows: Vec<Vec<String>>,
}

impl DocxTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}
