//! Build-time asset preparation
//!
//! Copies a fixed, ordered manifest of files from the sibling `ddm-files`
//! project into this project's public asset folder. The run is fail-fast:
//! the first missing source stops it, and nothing after that entry is
//! attempted. Copies are full, byte-exact, and unconditionally overwrite.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Name of the sibling project that owns the source assets
pub const DEPENDENCY_PROJECT: &str = "ddm-files";

/// Name of this project, used in operator-facing messages
pub const PROJECT_NAME: &str = "rpatt-3dmodel-app";

/// Files copied by the default manifest, relative to the source root.
/// The destination tree mirrors this layout.
pub const DEFAULT_ASSETS: &[&str] = &[
    "public/autumn_field_puresky_4k.hdr",
    "public/ground.jpg",
    "public/waternormals.jpeg",
    "data/demo/generic_fou.glb",
    "data/demo/generic_pin_piles.glb",
];

#[derive(Error, Debug)]
pub enum PrepareError {
    #[error(
        "Cannot find {project} project at {}. Make sure it is checked out next to {}.",
        .path.display(),
        PROJECT_NAME
    )]
    MissingDependencyProject { project: String, path: PathBuf },
    #[error("Missing {project} asset: {}", .path.display())]
    MissingAsset { project: String, path: PathBuf },
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single file to copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl AssetReference {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Ordered list of files to copy, with the roots it was built from
#[derive(Debug, Clone)]
pub struct AssetManifest {
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    pub entries: Vec<AssetReference>,
}

impl AssetManifest {
    /// Build a manifest copying `relative_paths` from `source_root` into the
    /// same relative locations under `destination_root`
    pub fn mirrored<I, S>(source_root: &Path, destination_root: &Path, relative_paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        let entries = relative_paths
            .into_iter()
            .map(|relative| {
                AssetReference::new(
                    source_root.join(relative.as_ref()),
                    destination_root.join(relative.as_ref()),
                )
            })
            .collect();

        Self {
            source_root: source_root.to_path_buf(),
            destination_root: destination_root.to_path_buf(),
            entries,
        }
    }

    /// The default manifest for a checkout at `repo_root`: sources come from
    /// `<repo_root>/../ddm-files`, destinations land in
    /// `<repo_root>/public/ddm-files`
    pub fn ddm_default(repo_root: &Path) -> Self {
        let source_root = default_source_root(repo_root);
        let destination_root = default_destination_root(repo_root);
        Self::mirrored(&source_root, &destination_root, DEFAULT_ASSETS.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `<repo_root>/../ddm-files`
pub fn default_source_root(repo_root: &Path) -> PathBuf {
    match repo_root.parent() {
        Some(parent) => parent.join(DEPENDENCY_PROJECT),
        None => repo_root.join("..").join(DEPENDENCY_PROJECT),
    }
}

/// `<repo_root>/public/ddm-files`
pub fn default_destination_root(repo_root: &Path) -> PathBuf {
    repo_root.join("public").join(DEPENDENCY_PROJECT)
}

/// Outcome of a successful preparation run
#[derive(Debug, Clone)]
pub struct PrepareReport {
    pub destination_root: PathBuf,
    pub copied: Vec<PathBuf>,
    pub bytes: u64,
}

/// Copy every manifest entry in order.
///
/// Fails with [`PrepareError::MissingDependencyProject`] if `source_root` is
/// not a directory, and with [`PrepareError::MissingAsset`] on the first
/// entry whose source does not exist. Entries copied before a failure are
/// left in place.
pub fn prepare(manifest: &AssetManifest, source_root: &Path) -> Result<PrepareReport, PrepareError> {
    if !source_root.is_dir() {
        return Err(PrepareError::MissingDependencyProject {
            project: DEPENDENCY_PROJECT.to_string(),
            path: source_root.to_path_buf(),
        });
    }

    let mut report = PrepareReport {
        destination_root: manifest.destination_root.clone(),
        copied: Vec::with_capacity(manifest.len()),
        bytes: 0,
    };

    for entry in &manifest.entries {
        report.bytes += copy_entry(entry)?;
        report.copied.push(entry.destination.clone());
    }

    info!(
        destination = %manifest.destination_root.display(),
        files = report.copied.len(),
        "Copied {} assets into {}",
        DEPENDENCY_PROJECT,
        manifest.destination_root.display()
    );

    Ok(report)
}

fn copy_entry(entry: &AssetReference) -> Result<u64, PrepareError> {
    if !entry.source.is_file() {
        return Err(PrepareError::MissingAsset {
            project: DEPENDENCY_PROJECT.to_string(),
            path: entry.source.clone(),
        });
    }

    if let Some(parent) = entry.destination.parent() {
        ensure_directory(parent)?;
    }

    let bytes = std::fs::copy(&entry.source, &entry.destination).map_err(|source| {
        PrepareError::Io {
            path: entry.destination.clone(),
            source,
        }
    })?;

    debug!(
        source = %entry.source.display(),
        destination = %entry.destination.display(),
        bytes,
        "Copied asset"
    );

    Ok(bytes)
}

fn ensure_directory(dir: &Path) -> Result<(), PrepareError> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }

    std::fs::create_dir_all(dir).map_err(|source| PrepareError::Io {
        path: dir.to_path_buf(),
        source,
    })
}
