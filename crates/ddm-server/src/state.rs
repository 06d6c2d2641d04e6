//! Shared application state

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{Config, ASSET_ROOT_ENV};

/// Read-only state shared by all handlers
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Directory assets are served from
    pub asset_root: PathBuf,
}

impl AppState {
    /// Create state, honoring the `DDM_ASSET_ROOT` override
    pub fn new(config: Config) -> Arc<Self> {
        let env_root = std::env::var(ASSET_ROOT_ENV).ok();
        let asset_root = config.assets.resolve_root(env_root.as_deref());
        Self::with_asset_root(config, asset_root)
    }

    pub fn with_asset_root(config: Config, asset_root: PathBuf) -> Arc<Self> {
        if asset_root.is_dir() {
            info!(root = %asset_root.display(), "Serving assets");
        } else {
            warn!(
                root = %asset_root.display(),
                "Asset root does not exist yet; run ddm-prepare to populate it"
            );
        }

        Arc::new(Self { config, asset_root })
    }
}
