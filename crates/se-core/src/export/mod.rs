//! Export functionality for session records
//!
//! This module renders a [`SessionRecord`](crate::session::SessionRecord)
//! into a durable artifact.
//!
//! # Overview
//!
//! Export supports three formats:
//! - JSON (2-space indented, field order preserved)
//! - YAML (block style, no line wrapping)
//! - PDF (paginated document with embedded images)
//!
//! # Example
//!
//! ```ignore
//! use se_core::config::Config;
//! use se_core::export::{ExportEngine, ExportFormat};
//!
//! let engine = ExportEngine::from_config(&Config::default())?;
//! let artifact = engine.export(&record, ExportFormat::Pdf, "session-42").await?;
//! artifact.write_to_dir(Path::new("exports"))?;
//! ```

mod artifact;
mod exporter;
pub mod images;
mod json;
pub mod pdf;
mod yaml;

pub use artifact::{ExportFormat, RenderedArtifact};
pub use exporter::{default_base_name, ExportEngine, Exporter};
pub use images::{HttpImageLoader, ImageLoader, LoadedImage};
pub use json::JsonExporter;
pub use pdf::PdfRenderer;
pub use yaml::YamlExporter;
