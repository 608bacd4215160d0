use std::io::Write;

use doctext_ingest::{DocumentFormat, ExtractionError, Extractor, FileInfo};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// JSON shape of a successful `extract --json`.
#[derive(Debug, Serialize)]
pub struct ExtractionReport<'a> {
    pub file: &'a str,
    pub format: DocumentFormat,
    pub chars: usize,
    pub text: &'a str,
}

/// Print the one-line summary after a successful extraction.
pub fn print_extraction_summary(
    w: &mut dyn Write,
    file_name: &str,
    format: DocumentFormat,
    chars: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "{} {} characters from {} ({})",
            "Extracted".green().bold(),
            chars,
            file_name.bold(),
            format
        )
    } else {
        writeln!(
            w,
            "Extracted {} characters from {} ({})",
            chars, file_name, format
        )
    }
}

/// Print an extraction failure with its kind.
pub fn print_extraction_error(
    w: &mut dyn Write,
    err: &ExtractionError,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "{} {} {}",
            "Error:".red().bold(),
            err,
            format!("[{}]", err.kind()).dimmed()
        )
    } else {
        writeln!(w, "Error: {} [{}]", err, err.kind())
    }
}

/// Print file metadata as aligned `key: value` lines.
pub fn print_file_info(w: &mut dyn Write, info: &FileInfo, color: ColorMode) -> std::io::Result<()> {
    if info.is_empty() {
        if color.enabled() {
            writeln!(w, "{}", "(no file information available)".dimmed())?;
        } else {
            writeln!(w, "(no file information available)")?;
        }
        return Ok(());
    }

    let rows = [
        ("name", info.name.clone().unwrap_or_default()),
        (
            "extension",
            info.extension
                .clone()
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "(none)".to_string()),
        ),
        (
            "size",
            info.size.map(|s| format!("{} bytes", s)).unwrap_or_default(),
        ),
    ];

    for (key, value) in rows {
        if color.enabled() {
            writeln!(w, "{:<10} {}", format!("{key}:").cyan(), value)?;
        } else {
            writeln!(w, "{:<10} {}", format!("{key}:"), value)?;
        }
    }
    Ok(())
}

/// Print which formats have a backend in this build and configuration.
pub fn print_backends(w: &mut dyn Write, extractor: &Extractor, color: ColorMode) -> std::io::Result<()> {
    for format in DocumentFormat::ALL {
        let status = match extractor.backend_name(format) {
            Some(name) => {
                if color.enabled() {
                    format!("{} ({})", "available".green(), name)
                } else {
                    format!("available ({})", name)
                }
            }
            None => {
                if color.enabled() {
                    "unavailable".red().to_string()
                } else {
                    "unavailable".to_string()
                }
            }
        };
        writeln!(w, "{:<6} {:<6} {}", format.to_string(), format.extension(), status)?;
    }
    Ok(())
}
