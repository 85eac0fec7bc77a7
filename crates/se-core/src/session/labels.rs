//! Localized display strings for the PDF document

use super::record::ScalarField;
use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Section titles used by the PDF renderer.
///
/// All nine strings are required; deserializing a table with a missing key
/// fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSet {
    pub title: String,
    pub prompt: String,
    pub seed: String,
    pub aspect_ratio: String,
    pub profile: String,
    pub blueprint: String,
    pub filters: String,
    pub generated_at: String,
    pub images: String,
}

impl LabelSet {
    /// Load a label set from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ExportError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a label set from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ExportError::Config(format!("invalid label set: {}", e)))
    }

    /// Label for one of the scalar fields
    pub fn scalar(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::Seed => &self.seed,
            ScalarField::AspectRatio => &self.aspect_ratio,
            ScalarField::Profile => &self.profile,
            ScalarField::Blueprint => &self.blueprint,
        }
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            title: "Session Export".to_string(),
            prompt: "Prompt".to_string(),
            seed: "Seed".to_string(),
            aspect_ratio: "Aspect Ratio".to_string(),
            profile: "Profile".to_string(),
            blueprint: "Blueprint".to_string(),
            filters: "Filters".to_string(),
            generated_at: "Generated At".to_string(),
            images: "Images".to_string(),
        }
    }
}
