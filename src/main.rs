//! True Positive List Loader
//!
//! CLI entry point: loads the True Positive List (remote CSV, local
//! fallback) into an attacker registry and optionally dumps the merged
//! registry as JSON for downstream tracing jobs.
//!
//! Author: AI-Generated
//! Created: 2026-08-29

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{info, Level};
use true_positive_loader::{load_config, AttackerRegistry, TruePositiveFetcher};

/// True Positive List Loader
#[derive(Parser)]
#[command(name = "true-positive-loader")]
struct Args {
    /// Remote CSV resource (overrides TRUE_POSITIVE_LIST_URL)
    #[arg(long, env = "TRUE_POSITIVE_LIST_URL")]
    url: Option<String>,

    /// Local fallback CSV path (overrides TRUE_POSITIVE_LIST_PATH)
    #[arg(long, env = "TRUE_POSITIVE_LIST_PATH")]
    path: Option<String>,

    /// Existing registry JSON to seed before loading
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Write the merged registry as JSON to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// JSON dump written by --output.
#[derive(Serialize)]
struct RegistryDump {
    generated_at: DateTime<Utc>,
    entries: AttackerRegistry,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = load_config()?;

    let list_url = args.url.unwrap_or(config.list_url);
    let list_path = args.path.unwrap_or(config.list_path);
    info!("True Positive List source: {} (fallback: {})", list_url, list_path);

    let mut registry: AttackerRegistry = match &args.registry {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read registry file: {:?}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse registry JSON: {:?}", path))?
        }
        None => AttackerRegistry::new(),
    };
    let seeded = registry.len();

    let fetcher = TruePositiveFetcher::new(list_url, list_path);
    fetcher.load(&mut registry).await;

    info!(
        "Registry holds {} attacker addresses ({} pre-seeded)",
        registry.len(),
        seeded
    );

    if let Some(output) = &args.output {
        let dump = RegistryDump {
            generated_at: Utc::now(),
            entries: registry,
        };
        let json = serde_json::to_string_pretty(&dump)?;
        fs::write(output, json)
            .with_context(|| format!("Failed to write registry dump: {:?}", output))?;
        info!("Merged registry written to {:?}", output);
    }

    Ok(())
}
