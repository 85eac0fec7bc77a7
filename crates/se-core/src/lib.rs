//! se-core - Core library for session-export
//!
//! This crate renders creative-session records into JSON, YAML and paginated
//! PDF documents, including the record model, label sets, configuration and
//! image loading.

pub mod config;
pub mod error;
pub mod export;
pub mod session;

pub use error::{ExportError, ImageLoadError, Result};
