//! Configuration management for session-export

use crate::error::{ExportError, Result};
use crate::export::ExportFormat;
use crate::session::LabelSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Export settings
    pub export: ExportConfig,
    /// PDF layout settings
    pub pdf: PdfConfig,
    /// Image fetch settings
    pub fetch: FetchConfig,
    /// PDF section labels
    pub labels: LabelSet,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ExportError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration, using defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ExportError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ExportError::Config(e.to_string()))
    }

    /// Check values that parse but cannot produce a usable layout
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.pdf.page_size.dimensions();
        if !self.pdf.margin.is_finite()
            || self.pdf.margin < 0.0
            || self.pdf.margin * 2.0 >= width.min(height)
        {
            return Err(ExportError::Config(format!(
                "pdf.margin {} leaves no writable area",
                self.pdf.margin
            )));
        }
        if !self.pdf.image_size.is_finite()
            || self.pdf.image_size <= 0.0
            || self.pdf.image_size > width - self.pdf.margin * 2.0
        {
            return Err(ExportError::Config(format!(
                "pdf.image_size {} does not fit the page",
                self.pdf.image_size
            )));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ExportError::Config(
                "fetch.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Export-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default export format
    pub default_format: ExportFormat,
    /// Directory artifacts are written to
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::Pdf,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Supported page sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A4,
    Letter,
}

impl PageSize {
    /// Width and height in millimetres
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
        }
    }
}

/// PDF layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Page size
    pub page_size: PageSize,
    /// Margin on every side, in millimetres
    pub margin: f32,
    /// Edge length of the square image footprint, in millimetres
    pub image_size: f32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin: 20.0,
            image_size: 80.0,
        }
    }
}

/// Image fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with HTTP requests
    pub user_agent: String,
}

impl FetchConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("session-export/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
