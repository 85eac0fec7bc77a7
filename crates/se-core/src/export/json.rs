//! JSON exporter for session records

use super::artifact::ExportFormat;
use super::exporter::Exporter;
use crate::error::Result;
use crate::session::SessionRecord;

/// JSON exporter, 2-space indented
#[derive(Debug, Clone, Default)]
pub struct JsonExporter;

impl JsonExporter {
    /// Create a new JSON exporter
    pub fn new() -> Self {
        Self
    }

    /// Decode a record previously rendered by this exporter
    pub fn decode(bytes: &[u8]) -> Result<SessionRecord> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl Exporter for JsonExporter {
    fn export(&self, record: &SessionRecord) -> Result<Vec<u8>> {
        // serde_json's pretty printer indents with two spaces
        let mut bytes = serde_json::to_vec_pretty(record)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }
}
