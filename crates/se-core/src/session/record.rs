//! Session record data model

use crate::error::{ExportError, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Applied filters, label to value, in insertion order
pub type Filters = IndexMap<String, String>;

/// Structured description of one creative-generation session.
///
/// Every field except `generated_at` is optional. An absent field means the
/// corresponding section is left out of the rendered document; an empty string
/// is still a present value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Prompt text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Generation seed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    /// Aspect ratio, e.g. "16:9"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// Generation profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Blueprint label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<String>,
    /// Applied filters
    #[serde(default)]
    pub filters: Filters,
    /// Generated image references (URLs, data URLs or paths)
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// ISO-8601 timestamp of the export
    pub generated_at: String,
}

impl SessionRecord {
    /// Create a record with only the timestamp set
    pub fn new(generated_at: impl Into<String>) -> Self {
        Self {
            prompt: None,
            seed: None,
            aspect_ratio: None,
            profile: None,
            blueprint: None,
            filters: Filters::new(),
            image_urls: Vec::new(),
            generated_at: generated_at.into(),
        }
    }

    /// Create a record stamped with the current UTC time
    pub fn now() -> Self {
        Self::new(Utc::now().to_rfc3339())
    }

    /// Set the prompt
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set the seed
    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Set the aspect ratio
    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(aspect_ratio.into());
        self
    }

    /// Set the profile
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the blueprint label
    pub fn with_blueprint(mut self, blueprint: impl Into<String>) -> Self {
        self.blueprint = Some(blueprint.into());
        self
    }

    /// Append a filter; re-inserting an existing label keeps its original position
    pub fn with_filter(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(label.into(), value.into());
        self
    }

    /// Append an image reference
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_urls.push(url.into());
        self
    }

    /// Parse `generated_at` as an RFC 3339 timestamp
    pub fn generated_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.generated_at.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Check the record before export.
    ///
    /// A blank timestamp is rejected; a timestamp that is not RFC 3339 is
    /// accepted as opaque text with a warning.
    pub fn validate(&self) -> Result<()> {
        if self.generated_at.trim().is_empty() {
            return Err(ExportError::Validation(
                "generatedAt must not be empty".to_string(),
            ));
        }

        if self.generated_at_utc().is_none() {
            warn!(
                generated_at = %self.generated_at,
                "generatedAt is not an RFC 3339 timestamp, exporting it verbatim"
            );
        }

        Ok(())
    }

    /// Seed, aspect ratio, profile and blueprint, in rendering order
    pub fn scalar_fields(&self) -> [(ScalarField, Option<&str>); 4] {
        [
            (ScalarField::Seed, self.seed.as_deref()),
            (ScalarField::AspectRatio, self.aspect_ratio.as_deref()),
            (ScalarField::Profile, self.profile.as_deref()),
            (ScalarField::Blueprint, self.blueprint.as_deref()),
        ]
    }
}

/// The single-line scalar fields of a session record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Seed,
    AspectRatio,
    Profile,
    Blueprint,
}
