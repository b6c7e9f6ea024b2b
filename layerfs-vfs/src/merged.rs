//! Merged directory handles

use crate::error::{VfsError, VfsResult};
use crate::metadata::{DirEntry, Metadata};
use crate::path;
use crate::r#trait::File;
use crate::stack::Layer;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// A directory as seen through a layer stack.
///
/// Holds the layers as they were when the directory was opened; adding
/// layers to the stack afterwards does not change what this handle lists.
/// The entry set is computed on the first `read_dir` call and then handed
/// out through a cursor.
///
/// Entries come out sorted by name. Callers should not rely on the order.
pub struct MergedDirectory {
    layers: Arc<Vec<Layer>>,
    path: PathBuf,
    file: Option<Box<dyn File>>,
    entries: Option<Vec<DirEntry>>,
    cursor: usize,
}

impl std::fmt::Debug for MergedDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergedDirectory")
            .field("path", &self.path)
            .field("layers", &self.layers.len())
            .field("backed", &self.file.is_some())
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl MergedDirectory {
    /// A directory that only exists as the union of its layers.
    pub(crate) fn synthetic(layers: Arc<Vec<Layer>>, path: &Path) -> Self {
        Self::new(layers, path, None)
    }

    /// A directory backed by the real handle of the first layer that has it.
    pub(crate) fn backed(layers: Arc<Vec<Layer>>, path: &Path, file: Box<dyn File>) -> Self {
        Self::new(layers, path, Some(file))
    }

    fn new(layers: Arc<Vec<Layer>>, path: &Path, file: Option<Box<dyn File>>) -> Self {
        Self {
            layers,
            path: path.to_path_buf(),
            file,
            entries: None,
            cursor: 0,
        }
    }

    /// The path this directory was opened with
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when no layer has a real directory at this path
    pub fn is_synthetic(&self) -> bool {
        self.file.is_none()
    }

    /// Read directory entries.
    ///
    /// With `n > 0`, returns at most `n` entries; once everything has been
    /// handed out, returns `VfsError::EndOfDirectory`.
    ///
    /// With `n == 0`, returns all remaining entries, and an empty `Vec`
    /// (not an error) when nothing remains.
    ///
    /// Each call continues where the previous one stopped.
    pub fn read_dir(&mut self, n: usize) -> VfsResult<Vec<DirEntry>> {
        let cursor = self.cursor;
        let entries = self.entries.get_or_insert_with(|| merge(&self.layers, &self.path));
        let remaining = &entries[cursor.min(entries.len())..];

        if remaining.is_empty() {
            return if n > 0 {
                Err(VfsError::EndOfDirectory)
            } else {
                Ok(Vec::new())
            };
        }

        let take = if n > 0 { n.min(remaining.len()) } else { remaining.len() };
        let batch = remaining[..take].to_vec();
        self.cursor += take;
        Ok(batch)
    }
}

/// Union of the layers' entries at `path`, first layer wins for each name.
///
/// Layers that cannot list the path are skipped: a directory does not need
/// to exist in every layer.
fn merge(layers: &[Layer], path: &Path) -> Vec<DirEntry> {
    let mut merged: BTreeMap<String, DirEntry> = BTreeMap::new();
    for layer in layers {
        let entries = match layer.fs().read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                trace!(target: "layerfs::merge", layer = layer.name(), path = %path.display(), error = %e, "layer skipped");
                continue;
            }
        };
        for entry in entries {
            merged.entry(entry.name().to_string()).or_insert(entry);
        }
    }
    debug!(target: "layerfs::merge", path = %path.display(), entries = merged.len(), "merged directory");
    merged.into_values().collect()
}

impl File for MergedDirectory {
    fn stat(&self) -> VfsResult<Metadata> {
        match &self.file {
            Some(file) => file.stat(),
            None => Ok(Metadata::directory(path::display(&self.path))),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize> {
        match self.file.as_mut() {
            Some(file) => file.read(buf),
            None => Err(VfsError::InvalidOperation {
                op: "read",
                path: path::display(&self.path),
            }),
        }
    }

    fn close(&mut self) -> VfsResult<()> {
        self.entries = None;
        self.cursor = 0;
        match self.file.as_mut() {
            Some(file) => file.close(),
            None => Ok(()),
        }
    }
}
