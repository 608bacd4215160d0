//! File metadata inspection.
//!
//! [`get_file_info`] never fails: any I/O error yields an empty
//! [`FileInfo`]. Callers that need to know why inspection failed use
//! [`try_get_file_info`].

use std::io;
use std::path::Path;

use serde::Serialize;

/// Size, extension and base name of a file.
///
/// All fields are `None` when inspection failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    /// Size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Lowercase extension including the leading dot, `""` if there is none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Final path component.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl FileInfo {
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.extension.is_none() && self.name.is_none()
    }
}

/// Lowercase extension of `path` including the leading dot.
///
/// Returns `""` when the final component has no extension; dotfiles such
/// as `.env` have no extension.
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Inspect `path`, returning an empty record on any error.
pub fn get_file_info(path: &Path) -> FileInfo {
    match try_get_file_info(path) {
        Ok(info) => info,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "file info unavailable");
            FileInfo::default()
        }
    }
}

/// Inspect `path`, propagating I/O errors (missing file, permission denied).
pub fn try_get_file_info(path: &Path) -> io::Result<FileInfo> {
    let metadata = std::fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(FileInfo {
        size: Some(metadata.len()),
        extension: Some(file_extension(path)),
        name: Some(name),
    })
}
