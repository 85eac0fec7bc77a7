//! Export command
//!
//! Export a session record to JSON, YAML or PDF.

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use se_core::config::Config;
use se_core::export::{default_base_name, ExportEngine, ExportFormat};
use se_core::session::{LabelSet, SessionRecord};

/// Arguments for the export command
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Session record file (JSON, or YAML for .yaml/.yml)
    pub input: PathBuf,

    /// Export format: json, yaml or pdf (default from config)
    #[arg(long, short)]
    pub format: Option<String>,

    /// Output directory (default from config)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Base file name without extension
    #[arg(long, short)]
    pub name: Option<String>,

    /// TOML file with the nine PDF section labels
    #[arg(long)]
    pub labels: Option<PathBuf>,

    /// Write the artifact to stdout instead of a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

/// Execute the export command
pub async fn execute(args: ExportArgs, config_path: &Path) -> Result<()> {
    use colored::Colorize;

    // Reject unknown formats before touching any file
    let requested = args
        .format
        .as_deref()
        .map(str::parse::<ExportFormat>)
        .transpose()?;

    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let format = requested.unwrap_or(config.export.default_format);

    let record = read_record(&args.input)?;
    record
        .validate()
        .with_context(|| format!("Invalid session record in {}", args.input.display()))?;

    let labels = match &args.labels {
        Some(path) => LabelSet::from_toml_file(path)
            .with_context(|| format!("Failed to load labels from {}", path.display()))?,
        None => config.labels.clone(),
    };

    let engine = ExportEngine::from_config(&config)?.with_labels(labels);
    let base_name = args
        .name
        .clone()
        .unwrap_or_else(|| default_base_name(&record));

    let spinner = if format == ExportFormat::Pdf && !args.stdout {
        Some(pdf_spinner(record.image_urls.len()))
    } else {
        None
    };

    let result = engine.export(&record, format, &base_name).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let artifact = result.context("Export failed")?;

    if args.stdout {
        std::io::stdout()
            .write_all(&artifact.bytes)
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    let dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.export.output_dir.clone());
    let path = artifact
        .write_to_dir(&dir)
        .with_context(|| format!("Failed to write to {}", dir.display()))?;

    eprintln!(
        "{} Exported to {} ({}, {} bytes)",
        "✓".green(),
        path.display().to_string().cyan(),
        artifact.mime_type,
        artifact.len()
    );

    Ok(())
}

/// Read a session record, choosing the decoder by file extension
fn read_record(path: &Path) -> Result<SessionRecord> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session record {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    debug!(path = %path.display(), yaml = is_yaml, "Reading session record");

    let record = if is_yaml {
        serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse YAML session record {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON session record {}", path.display()))?
    };

    Ok(record)
}

fn pdf_spinner(image_count: usize) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Rendering PDF ({} images)...", image_count));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
