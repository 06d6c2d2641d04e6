//! Configuration loading

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable overriding the asset root
pub const ASSET_ROOT_ENV: &str = "DDM_ASSET_ROOT";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP server
    #[serde(default = "default_bind")]
    pub bind: String,
    /// TLS configuration (optional - enables HTTPS when present)
    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            tls: None,
        }
    }
}

/// TLS/HTTPS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM format)
    pub cert: String,
    /// Path to private key file (PEM format)
    pub key: String,
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Folder filled by `ddm-prepare`
    #[serde(default = "default_asset_root")]
    pub root: String,
    /// URL prefix the assets are served under; the scene's asset base path
    #[serde(default = "default_asset_mount")]
    pub mount: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_asset_root(),
            mount: default_asset_mount(),
        }
    }
}

fn default_asset_root() -> String {
    "public/ddm-files".to_string()
}

fn default_asset_mount() -> String {
    ddm_core::DEFAULT_ASSET_BASE_PATH.to_string()
}

impl AssetsConfig {
    /// Mount normalized to a leading `/` and no trailing `/`
    pub fn mount_path(&self) -> String {
        let trimmed = self.mount.trim().trim_matches('/');
        format!("/{}", trimmed)
    }

    /// Asset root, with a non-blank override taking precedence
    pub fn resolve_root(&self, env_override: Option<&str>) -> PathBuf {
        match env_override.map(str::trim) {
            Some(root) if !root.is_empty() => PathBuf::from(root),
            _ => PathBuf::from(&self.root),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Directory holding the built WASM frontend
    #[serde(default = "default_web_path")]
    pub path: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            path: default_web_path(),
        }
    }
}

fn default_web_path() -> String {
    "web".to_string()
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}
