//! Shared domain types for the doctext extraction pipeline.
//!
//! This crate carries no parser dependencies. Concrete backends live in
//! `doctext-pdf-mupdf` and `doctext-docx`; the dispatcher that ties them
//! together lives in `doctext-ingest`.

pub mod backend;
pub mod config_file;
pub mod format;

pub use backend::{BackendError, DocxBackend, DocxContent, DocxTable, PdfBackend};
pub use config_file::{ConfigFile, DEFAULT_DOCX_MAX_PART_SIZE_MB, ExtractionConfig};
pub use format::DocumentFormat;
