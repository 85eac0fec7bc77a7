//! Exporter trait and engine

use super::artifact::{ExportFormat, RenderedArtifact};
use super::images::{HttpImageLoader, ImageLoader};
use super::json::JsonExporter;
use super::pdf::PdfRenderer;
use super::yaml::YamlExporter;
use crate::config::Config;
use crate::error::Result;
use crate::session::{LabelSet, SessionRecord};
use tracing::{debug, info};

/// Synchronous serializers of session records
pub trait Exporter: Send + Sync {
    /// Export a record to bytes
    fn export(&self, record: &SessionRecord) -> Result<Vec<u8>>;

    /// The format this exporter produces
    fn format(&self) -> ExportFormat;

    /// Get the format name
    fn format_name(&self) -> &str {
        self.format().name()
    }

    /// Get the file extension
    fn file_extension(&self) -> &str {
        self.format().file_extension()
    }

    /// Get the MIME type
    fn mime_type(&self) -> &str {
        self.format().mime_type()
    }
}

/// Renders session records into JSON, YAML or PDF artifacts.
///
/// Holds no per-export state; one engine can serve any number of exports.
pub struct ExportEngine<L = HttpImageLoader> {
    json: JsonExporter,
    yaml: YamlExporter,
    pdf: PdfRenderer<L>,
}

impl ExportEngine<HttpImageLoader> {
    /// Create an engine from configuration, fetching images over HTTP
    pub fn from_config(config: &Config) -> Result<Self> {
        let loader = HttpImageLoader::new(&config.fetch)?;
        Ok(Self::with_loader(config, config.labels.clone(), loader))
    }
}

impl<L: ImageLoader> ExportEngine<L> {
    /// Create an engine with a custom image loader
    pub fn with_loader(config: &Config, labels: LabelSet, loader: L) -> Self {
        Self {
            json: JsonExporter::new(),
            yaml: YamlExporter::new(),
            pdf: PdfRenderer::new(&config.pdf, labels, loader),
        }
    }

    /// Replace the PDF labels
    pub fn with_labels(mut self, labels: LabelSet) -> Self {
        self.pdf.set_labels(labels);
        self
    }

    /// Labels used for PDF output
    pub fn labels(&self) -> &LabelSet {
        self.pdf.labels()
    }

    /// Export a record to the requested format
    pub async fn export(
        &self,
        record: &SessionRecord,
        format: ExportFormat,
        base_name: &str,
    ) -> Result<RenderedArtifact> {
        debug!(%format, base_name, "Starting export");

        let bytes = match format {
            ExportFormat::Json => self.json.export(record)?,
            ExportFormat::Yaml => self.yaml.export(record)?,
            ExportFormat::Pdf => self.pdf.render(record).await?,
        };

        let artifact = RenderedArtifact::new(bytes, format, base_name);
        info!(
            filename = %artifact.suggested_filename,
            bytes = artifact.len(),
            "Export complete"
        );
        Ok(artifact)
    }

    /// Export using a textual format selector.
    ///
    /// The selector is validated before anything is rendered or fetched.
    pub async fn export_named(
        &self,
        record: &SessionRecord,
        format: &str,
        base_name: &str,
    ) -> Result<RenderedArtifact> {
        let format: ExportFormat = format.parse()?;
        self.export(record, format, base_name).await
    }

    /// Export to JSON or YAML without an async context.
    ///
    /// Returns `None` for PDF, which needs to await image loads.
    pub fn export_text(
        &self,
        record: &SessionRecord,
        format: ExportFormat,
        base_name: &str,
    ) -> Option<Result<RenderedArtifact>> {
        let bytes = match format {
            ExportFormat::Json => self.json.export(record),
            ExportFormat::Yaml => self.yaml.export(record),
            ExportFormat::Pdf => return None,
        };
        Some(bytes.map(|bytes| RenderedArtifact::new(bytes, format, base_name)))
    }
}

/// Default base name for an export: `session-YYYYMMDD-HHMMSS` from the
/// record timestamp, or `session` when it cannot be parsed
pub fn default_base_name(record: &SessionRecord) -> String {
    record
        .generated_at_utc()
        .map(|ts| format!("session-{}", ts.format("%Y%m%d-%H%M%S")))
        .unwrap_or_else(|| "session".to_string())
}
