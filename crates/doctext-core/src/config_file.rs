use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default cap on the uncompressed size of `word/document.xml`.
pub const DEFAULT_DOCX_MAX_PART_SIZE_MB: u32 = 64;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub backends: Option<BackendsConfig>,
    pub pdf: Option<PdfConfig>,
    pub docx: Option<DocxConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendsConfig {
    pub pdf: Option<bool>,
    pub docx: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfConfig {
    pub replacement_char: Option<char>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocxConfig {
    pub max_part_size_mb: Option<u32>,
}

/// Platform config directory path: `<config_dir>/doctext/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("doctext").join("config.toml"))
}

/// Load config by cascading CWD `.doctext.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".doctext.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_backends = base.backends.unwrap_or_default();
    let overlay_backends = overlay.backends.unwrap_or_default();
    let base_pdf = base.pdf.unwrap_or_default();
    let overlay_pdf = overlay.pdf.unwrap_or_default();
    let base_docx = base.docx.unwrap_or_default();
    let overlay_docx = overlay.docx.unwrap_or_default();

    ConfigFile {
        backends: Some(BackendsConfig {
            pdf: overlay_backends.pdf.or(base_backends.pdf),
            docx: overlay_backends.docx.or(base_backends.docx),
        }),
        pdf: Some(PdfConfig {
            replacement_char: overlay_pdf.replacement_char.or(base_pdf.replacement_char),
        }),
        docx: Some(DocxConfig {
            max_part_size_mb: overlay_docx.max_part_size_mb.or(base_docx.max_part_size_mb),
        }),
    }
}

/// Resolved extraction settings: file values with defaults filled in and
/// environment overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    pub pdf_enabled: bool,
    pub docx_enabled: bool,
    pub pdf_replacement_char: char,
    /// Upper bound in bytes for the uncompressed main DOCX part.
    pub docx_max_part_size: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pdf_enabled: true,
            docx_enabled: true,
            pdf_replacement_char: '\u{FFFD}',
            docx_max_part_size: u64::from(DEFAULT_DOCX_MAX_PART_SIZE_MB) * 1024 * 1024,
        }
    }
}

impl ExtractionConfig {
    /// Load from the cascaded config files, then apply `DOCTEXT_*` env vars.
    pub fn load() -> Self {
        Self::from_file(&load_config()).with_env_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(file: &ConfigFile) -> Self {
        let defaults = Self::default();
        let backends = file.backends.clone().unwrap_or_default();
        let pdf = file.pdf.clone().unwrap_or_default();
        let docx = file.docx.clone().unwrap_or_default();

        Self {
            pdf_enabled: backends.pdf.unwrap_or(defaults.pdf_enabled),
            docx_enabled: backends.docx.unwrap_or(defaults.docx_enabled),
            pdf_replacement_char: pdf
                .replacement_char
                .unwrap_or(defaults.pdf_replacement_char),
            docx_max_part_size: docx
                .max_part_size_mb
                .map(|mb| u64::from(mb) * 1024 * 1024)
                .unwrap_or(defaults.docx_max_part_size),
        }
    }

    /// Apply `DOCTEXT_DISABLE_PDF` / `DOCTEXT_DISABLE_DOCX`.
    ///
    /// `lookup` abstracts the environment so tests don't touch process state.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if lookup("DOCTEXT_DISABLE_PDF").is_some_and(|v| is_truthy(&v)) {
            self.pdf_enabled = false;
        }
        if lookup("DOCTEXT_DISABLE_DOCX").is_some_and(|v| is_truthy(&v)) {
            self.docx_enabled = false;
        }
        self
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_deserializes() {
        let toml_str = "[backends]\npdf = false\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(parsed.backends.unwrap().pdf, Some(false));
        assert!(parsed.docx.is_none());
    }

    #[test]
    fn from_file_fills_defaults() {
        let config = ExtractionConfig::from_file(&ConfigFile::default());
        assert_eq!(config, ExtractionConfig::default());
    }

    #[test]
    fn from_file_converts_megabytes() {
        let file = ConfigFile {
            docx: Some(DocxConfig {
                max_part_size_mb: Some(2),
            }),
            ..Default::default()
        };
        let config = ExtractionConfig::from_file(&file);
        assert_eq!(config.docx_max_part_size, 2 * 1024 * 1024);
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            backends: Some(BackendsConfig {
                pdf: Some(false),
                docx: Some(false),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            backends: Some(BackendsConfig {
                pdf: Some(true),
                docx: None,
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay).backends.unwrap();
        assert_eq!(merged.pdf, Some(true));
        assert_eq!(merged.docx, Some(false));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            pdf: Some(PdfConfig {
                replacement_char: Some('?'),
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.pdf.unwrap().replacement_char, Some('?'));
    }

    #[test]
    fn env_overrides_disable_backends() {
        let config = ExtractionConfig::default().with_env_overrides(|key| match key {
            "DOCTEXT_DISABLE_PDF" => Some("1".to_string()),
            "DOCTEXT_DISABLE_DOCX" => Some("false".to_string()),
            _ => None,
        });
        assert!(!config.pdf_enabled);
        assert!(config.docx_enabled);
    }

    #[test]
    fn load_from_path_missing_or_invalid_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("missing.toml")).is_none());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "backends = [not toml").unwrap();
        assert!(load_from_path(&bad).is_none());
    }
}
