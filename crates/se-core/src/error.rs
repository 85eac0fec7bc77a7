//! Error types for session-export

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for session-export
#[derive(Debug, Error)]
pub enum ExportError {
    /// Requested format is not one of json, yaml or pdf
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// The PDF drawing surface could not be created or written
    #[error("Rendering surface error: {0}")]
    RenderingSurface(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Failure to load a single image for PDF embedding.
///
/// Never escapes the PDF renderer; each one becomes a placeholder line.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    /// Network or filesystem request failed
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// Server answered with a non-success status
    #[error("failed to fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// Resource is not a decodable image
    #[error("failed to decode {url}: {message}")]
    Decode { url: String, message: String },

    /// URL scheme the loader cannot handle
    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),

    /// Decoded image has no pixels to convert into an embeddable raster
    #[error("no raster surface for {url} ({width}x{height})")]
    Surface { url: String, width: u32, height: u32 },
}

/// Result type alias for session-export
pub type Result<T> = std::result::Result<T, ExportError>;
