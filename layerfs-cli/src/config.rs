//! CLI configuration
//!
//! Loads the layer manifest and turns it into a `LayerStack`.

use layerfs_config::StackManifest;
use layerfs_vfs::{dir, Layer, LayerStack, NativeFileSystem, VfsError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Manifest loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("manifest '{path}' not found")]
    Missing { path: PathBuf },

    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("layer '{label}': {source}")]
    Layer {
        label: String,
        #[source]
        source: VfsError,
    },
}

/// Read and parse a manifest file
pub fn read_manifest(path: &Path) -> Result<StackManifest, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the stack described by a manifest.
///
/// Layers are added in manifest order, so the last one has the highest
/// priority. Relative roots are resolved against `base_dir`.
pub fn build_stack(manifest: &StackManifest, base_dir: &Path) -> Result<LayerStack, ConfigError> {
    let mut stack = LayerStack::new();
    for spec in &manifest.layers {
        let label = spec.display_label();
        let root = base_dir.join(&spec.root);
        let fs = dir(NativeFileSystem::with_base(&root), &spec.subdir).map_err(|source| {
            ConfigError::Layer {
                label: label.clone(),
                source,
            }
        })?;
        info!(target: "layerfs::cli", layer = %label, root = %root.display(), "layer added");
        stack.push(Layer::new(label, fs));
    }
    Ok(stack)
}

/// Directory the manifest's relative paths are resolved against
pub fn manifest_dir(manifest_path: &Path) -> PathBuf {
    match manifest_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
