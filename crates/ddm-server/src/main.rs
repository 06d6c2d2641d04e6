//! DDM Server - Main entry point
//!
//! Serves the prepared scene assets and the web frontend.

mod api;
mod config;
mod server;
mod state;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "ddm-server")]
#[command(about = "Asset backend for the DDM 3D scene")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "ddm-server.toml")]
    config: PathBuf,

    /// Bind address for web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
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
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("DDM server v{}", env!("CARGO_PKG_VERSION"));

    let mut config = config::load_config(&args.config)?;

    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    info!(
        mount = %config.assets.mount_path(),
        web = %config.web.path,
        "Configuration loaded"
    );

    let bind = config.server.bind.clone();
    let tls = config.server.tls.clone();
    let state = state::AppState::new(config);

    server::run(state, &bind, tls.as_ref()).await
}
