use std::path::Path;

use doctext_core::{BackendError, DEFAULT_DOCX_MAX_PART_SIZE_MB, DocxBackend, DocxContent, DocxTable};

pub mod package;
pub mod xml_parser;

use xml_parser::{RawTable, VMerge};

/// Pure-Rust implementation of [`DocxBackend`].
///
/// Reads the OOXML zip package and streams the main document part, so no
/// native library or external process is needed.
pub struct OoxmlBackend {
    /// Maximum uncompressed size of the main document part, in bytes.
    max_part_size: u64,
}

impl Default for OoxmlBackend {
    fn default() -> Self {
        Self {
            max_part_size: u64::from(DEFAULT_DOCX_MAX_PART_SIZE_MB) * 1024 * 1024,
        }
    }
}

impl OoxmlBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum uncompressed size of `word/document.xml`.
    pub fn with_max_part_size(mut self, bytes: u64) -> Self {
        self.max_part_size = bytes;
        self
    }
}

impl DocxBackend for OoxmlBackend {
    fn name(&self) -> &'static str {
        "ooxml"
    }

    fn read_document(&self, path: &Path) -> Result<DocxContent, BackendError> {
        let data = package::read_main_part(path, self.max_part_size)?;
        let body = xml_parser::parse_document(data.as_slice())
            .map_err(|e| BackendError::Parse(format!("malformed document.xml: {}", e)))?;

        tracing::debug!(
            path = %path.display(),
            paragraphs = body.paragraphs.len(),
            tables = body.tables.len(),
            "ooxml read document"
        );

        Ok(DocxContent {
            paragraphs: body.paragraphs,
            tables: body.tables.into_iter().map(resolve_merges).collect(),
        })
    }
}

/// Expand horizontally spanned cells and fill vertically merged ones.
///
/// A cell spanning N grid columns is repeated N times. A `vMerge`
/// continuation cell takes the text of the cell above it in the same grid
/// column, so every row lists one entry per grid column it covers.
pub fn resolve_merges(raw: RawTable) -> DocxTable {
    let mut rows = Vec::with_capacity(raw.rows.len());
    let mut previous: Vec<String> = Vec::new();

    for raw_row in raw.rows {
        let mut row: Vec<String> = Vec::with_capacity(raw_row.len());
        for cell in raw_row {
            let column = row.len();
            let text = match cell.v_merge {
                VMerge::Continue => previous.get(column).cloned().unwrap_or_default(),
                VMerge::None | VMerge::Restart => cell.text,
            };
            for _ in 0..cell.grid_span.max(1) {
                row.push(text.clone());
            }
        }
        previous = row.clone();
        rows.push(row);
    }

    DocxTable::new(rows)
}
