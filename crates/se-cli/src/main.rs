//! session-export - Session Document Export CLI
//!
//! Renders a creative-session record into JSON, YAML or PDF.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a default configuration
//! session-export config init
//!
//! # Export a session record as PDF into ./exports
//! session-export export session.json --format pdf --output exports
//!
//! # Print the YAML rendering
//! session-export export session.json --format yaml --stdout
//! ```

mod commands;

#[tokio::main]
async fn main() {
    if let Err(err) = commands::run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
