//! YAML exporter for session records

use super::artifact::ExportFormat;
use super::exporter::Exporter;
use crate::error::Result;
use crate::session::SessionRecord;

/// YAML exporter.
///
/// Emits block style without a line width limit, so long prompts stay on a
/// single line; values containing newlines become literal block scalars.
#[derive(Debug, Clone, Default)]
pub struct YamlExporter;

impl YamlExporter {
    /// Create a new YAML exporter
    pub fn new() -> Self {
        Self
    }

    /// Decode a record previously rendered by this exporter
    pub fn decode(bytes: &[u8]) -> Result<SessionRecord> {
        Ok(serde_yaml_ng::from_slice(bytes)?)
    }
}

impl Exporter for YamlExporter {
    fn export(&self, record: &SessionRecord) -> Result<Vec<u8>> {
        Ok(serde_yaml_ng::to_string(record)?.into_bytes())
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Yaml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn long_prompt() -> String {
        "a sprawling cyberpunk market street at night with neon signage, ".repeat(6)
    }

    #[test]
    fn test_yaml_exporter_format() {
        let exporter = YamlExporter::new();
        assert_eq!(exporter.format_name(), "yaml");
        assert_eq!(exporter.mime_type(), "text/yaml");
    }

    #[test]
    fn test_round_trip() {
        let record = SessionRecord::new("2024-05-01T12:00:00Z")
            .with_prompt(long_prompt())
            .with_seed("00042")
            .with_aspect_ratio("1:1")
            .with_profile("yes")
            .with_blueprint("")
            .with_filter("Saturation", "1.5")
            .with_filter("Hue", "-10deg")
            .with_image("https://example.com/a.png");

        let bytes = YamlExporter::new().export(&record).unwrap();
        let decoded = YamlExporter::decode(&bytes).unwrap();

        assert_eq!(decoded, record);
        assert_eq!(
            decoded.filters.keys().collect::<Vec<_>>(),
            vec!["Saturation", "Hue"]
        );
    }

    #[test]
    fn test_round_trip_empty_collections() {
        let record = SessionRecord::new("2024-05-01T12:00:00Z");
        let bytes = YamlExporter::new().export(&record).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();

        assert!(text.contains("filters: {}"));
        assert!(text.contains("imageUrls: []"));
        assert_eq!(YamlExporter::decode(&bytes).unwrap(), record);
    }

    #[test]
    fn test_long_prompt_not_wrapped() {
        let prompt = long_prompt();
        let record = SessionRecord::new("2024-05-01T12:00:00Z").with_prompt(prompt.trim_end());
        let text = String::from_utf8(YamlExporter::new().export(&record).unwrap()).unwrap();

        let prompt_line = text
            .lines()
            .find(|line| line.starts_with("prompt:"))
            .unwrap();
        assert!(prompt_line.contains(prompt.trim_end()));
    }

    #[test]
    fn test_multiline_prompt_preserved() {
        let record = SessionRecord::new("2024-05-01T12:00:00Z")
            .with_prompt("first line\nsecond line\n\nfourth line");
        let bytes = YamlExporter::new().export(&record).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("prompt: |-\n  first line\n  second line\n"));

        let decoded = YamlExporter::decode(&bytes).unwrap();
        assert_eq!(decoded.prompt, record.prompt);
    }

    #[test]
    fn test_block_style() {
        let record = SessionRecord::new("2024-05-01T12:00:00Z")
            .with_filter("Brightness", "120%")
            .with_image("https://example.com/a.png");
        let text = String::from_utf8(YamlExporter::new().export(&record).unwrap()).unwrap();

        assert!(text.contains("filters:\n  Brightness: 120%\n"));
        assert!(text.contains("imageUrls:\n- https://example.com/a.png\n"));
    }
}
