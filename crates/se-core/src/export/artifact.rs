//! Export formats and rendered artifacts

use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    #[serde(alias = "yml")]
    Yaml,
    Pdf,
}

impl ExportFormat {
    /// All supported formats
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Yaml, ExportFormat::Pdf];

    /// Format name
    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// File extension without the dot
    pub fn file_extension(&self) -> &'static str {
        self.name()
    }

    /// MIME type of the rendered bytes
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Yaml => "text/yaml",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    /// `<base>.<ext>` for this format
    pub fn filename(&self, base: &str) -> String {
        format!("{}.{}", sanitize_base_name(base), self.file_extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Replace path separators and control characters so the base name stays a
/// single path component. Everything else, `:` included, is kept as given.
fn sanitize_base_name(base: &str) -> String {
    let cleaned: String = base
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "session".to_string()
    } else {
        cleaned
    }
}

/// Rendered export output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// Encoded document
    pub bytes: Vec<u8>,
    /// `<base>.<ext>`
    pub suggested_filename: String,
    /// MIME type of `bytes`
    pub mime_type: String,
}

impl RenderedArtifact {
    /// Wrap rendered bytes with the filename and MIME type of `format`
    pub fn new(bytes: Vec<u8>, format: ExportFormat, base: &str) -> Self {
        Self {
            bytes,
            suggested_filename: format.filename(base),
            mime_type: format.mime_type().to_string(),
        }
    }

    /// Size of the payload in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the artifact into `dir` under its suggested filename.
    ///
    /// The write goes through a temporary file that is renamed into place.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        let final_path = dir.join(&self.suggested_filename);
        let temp_path = dir.join(format!(".{}.tmp", self.suggested_filename));
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(&self.bytes)?;
            file.flush()?;
        }
        fs::rename(&temp_path, &final_path)?;

        debug!("Wrote {} bytes to {:?}", self.bytes.len(), final_path);
        Ok(final_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("YAML".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert_eq!("yml".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert_eq!(" pdf ".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
    }

    #[test]
    fn test_parse_unsupported_format() {
        let err = "docx".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(ref f) if f == "docx"));
    }

    #[test]
    fn test_filename_and_mime_contract() {
        let cases = [
            (ExportFormat::Json, "session-42.json", "application/json"),
            (ExportFormat::Yaml, "session-42.yaml", "text/yaml"),
            (ExportFormat::Pdf, "session-42.pdf", "application/pdf"),
        ];
        for (format, filename, mime) in cases {
            let artifact = RenderedArtifact::new(vec![1, 2, 3], format, "session-42");
            assert_eq!(artifact.suggested_filename, filename);
            assert_eq!(artifact.mime_type, mime);
        }
    }

    #[test]
    fn test_base_name_sanitized() {
        assert_eq!(ExportFormat::Json.filename("../etc/passwd"), ".._etc_passwd.json");
        assert_eq!(ExportFormat::Pdf.filename("  "), "session.pdf");
        assert_eq!(ExportFormat::Yaml.filename(".."), "session.yaml");
    }

    #[test]
    fn test_base_name_keeps_colons() {
        assert_eq!(ExportFormat::Pdf.filename("session-12:00"), "session-12:00.pdf");
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        let artifact = RenderedArtifact::new(b"{}".to_vec(), ExportFormat::Json, "session-1");

        let path = artifact.write_to_dir(&target).unwrap();
        assert_eq!(path, target.join("session-1.json"));
        assert_eq!(fs::read(&path).unwrap(), b"{}");
        assert!(!target.join(".session-1.json.tmp").exists());
    }
}
