//! DDM asset preparation
//!
//! Copies the HDRI, textures, and demo models from a sibling `ddm-files`
//! checkout into `public/ddm-files`. Run once before building or serving.

use anyhow::{Context, Result};
use clap::Parser;
use ddm_core::prepare::{default_destination_root, default_source_root, DEFAULT_ASSETS};
use ddm_core::{prepare, AssetManifest};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "ddm-prepare")]
#[command(about = "Copy ddm-files assets into this project's public folder")]
#[command(version)]
struct Args {
    /// Root of this project (defaults to the current directory)
    #[arg(long)]
    repo_root: Option<PathBuf>,

    /// ddm-files checkout (defaults to <repo-root>/../ddm-files)
    #[arg(long)]
    source_root: Option<PathBuf>,

    /// Destination folder (defaults to <repo-root>/public/ddm-files)
    #[arg(long)]
    destination: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let repo_root = match args.repo_root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let repo_root = repo_root.canonicalize().unwrap_or(repo_root);

    let source_root = args
        .source_root
        .unwrap_or_else(|| default_source_root(&repo_root));
    let destination = args
        .destination
        .unwrap_or_else(|| default_destination_root(&repo_root));

    let manifest = AssetManifest::mirrored(&source_root, &destination, DEFAULT_ASSETS.iter().copied());

    info!(
        source = %source_root.display(),
        destination = %destination.display(),
        files = manifest.len(),
        "Preparing assets"
    );

    let report = prepare(&manifest, &source_root)?;
    tracing::debug!(bytes = report.bytes, "Preparation finished");

    Ok(())
}
