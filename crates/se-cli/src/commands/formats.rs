//! Formats command
//!
//! List the supported export formats.

use anyhow::Result;
use se_core::export::ExportFormat;

/// Execute the formats command
pub fn execute() -> Result<()> {
    use colored::Colorize;

    println!("{}", "Export formats:".bold().underline());
    for format in ExportFormat::ALL {
        println!(
            "  {:<6} .{:<6} {}",
            format.name().cyan(),
            format.file_extension(),
            format.mime_type().dimmed()
        );
    }

    Ok(())
}
