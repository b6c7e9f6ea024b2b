//! Layer stack: ordered backends with open resolution

use crate::error::{VfsError, VfsResult};
use crate::merged::MergedDirectory;
use crate::metadata::{DirEntry, Metadata};
use crate::path;
use crate::r#trait::{File, FileSystem};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// One backend in a stack, with a label for diagnostics.
#[derive(Clone)]
pub struct Layer {
    name: String,
    fs: Arc<dyn FileSystem>,
}

impl Layer {
    /// Create a layer. The name is only used in logs and diagnostics.
    pub fn new(name: impl Into<String>, fs: impl FileSystem + 'static) -> Self {
        Self {
            name: name.into(),
            fs: Arc::new(fs),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fs(&self) -> &dyn FileSystem {
        &*self.fs
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer").field("name", &self.name).finish()
    }
}

/// Result of opening a path on a stack.
///
/// Decided once when the path is resolved: directories are always merged
/// across layers, files come straight from the layer that owns them.
#[derive(Debug)]
pub enum Handle {
    /// A file handle from the highest-priority layer that has the path
    File(Box<dyn File>),
    /// A directory listing the union of all layers at the path
    Directory(MergedDirectory),
}

impl Handle {
    pub fn is_dir(&self) -> bool {
        matches!(self, Handle::Directory(_))
    }

    /// The merged directory, if this handle is one
    pub fn as_directory(&mut self) -> Option<&mut MergedDirectory> {
        match self {
            Handle::Directory(dir) => Some(dir),
            Handle::File(_) => None,
        }
    }

    pub fn into_directory(self) -> Option<MergedDirectory> {
        match self {
            Handle::Directory(dir) => Some(dir),
            Handle::File(_) => None,
        }
    }
}

impl File for Handle {
    fn stat(&self) -> VfsResult<Metadata> {
        match self {
            Handle::File(file) => file.stat(),
            Handle::Directory(dir) => dir.stat(),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize> {
        match self {
            Handle::File(file) => file.read(buf),
            Handle::Directory(dir) => dir.read(buf),
        }
    }

    fn close(&mut self) -> VfsResult<()> {
        match self {
            Handle::File(file) => file.close(),
            Handle::Directory(dir) => dir.close(),
        }
    }
}

/// An ordered stack of backends where the top layer wins.
///
/// Layers are kept highest priority first: the most recently added layer is
/// consulted first when opening a path, and its directory entries shadow
/// same-named entries of the layers below.
///
/// # Example
/// ```
/// use layerfs_vfs::{FileSystem, LayerStack, MemoryFileSystem};
/// use std::path::Path;
///
/// let mut stack = LayerStack::new();
/// stack.add("defaults", MemoryFileSystem::with_files([("x", "1")]));
/// stack.add("user", MemoryFileSystem::with_files([("x", "2"), ("y", "3")]));
///
/// assert_eq!(stack.read_file(Path::new("x")).unwrap(), b"2");
/// assert_eq!(stack.read_file(Path::new("y")).unwrap(), b"3");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    layers: Arc<Vec<Layer>>,
}

impl LayerStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a backend on top of the stack.
    ///
    /// Later added layers have more priority and shadow earlier ones.
    /// Directories already opened keep the layers they were opened with.
    pub fn add(&mut self, name: impl Into<String>, fs: impl FileSystem + 'static) {
        self.push(Layer::new(name, fs));
    }

    /// Add a prebuilt layer on top of the stack.
    pub fn push(&mut self, layer: Layer) {
        debug!(target: "layerfs::stack", layer = layer.name(), depth = self.layers.len() + 1, "add layer");
        Arc::make_mut(&mut self.layers).insert(0, layer);
    }

    /// Builder form of [`add`](Self::add)
    pub fn with_layer(mut self, name: impl Into<String>, fs: impl FileSystem + 'static) -> Self {
        self.add(name, fs);
        self
    }

    /// Layers in priority order, highest first
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Open a path.
    ///
    /// - `"/"` is refused with `PermissionDenied`.
    /// - `""` and `"."` open the synthetic root directory, even on an empty
    ///   stack.
    /// - Otherwise layers are tried highest priority first and the first
    ///   successful open wins. If it is a directory, the result lists the
    ///   union of all layers at that path. If no layer can open the path,
    ///   the error of the last layer tried is returned unchanged.
    pub fn open(&self, path: &Path) -> VfsResult<Handle> {
        if path == Path::new("/") {
            return Err(VfsError::PermissionDenied {
                path: path::display(path),
            });
        }
        if path::is_self(path) {
            return Ok(Handle::Directory(MergedDirectory::synthetic(
                Arc::clone(&self.layers),
                path,
            )));
        }

        let mut last_err = None;
        for layer in self.layers.iter() {
            let file = match layer.fs().open(path) {
                Ok(file) => file,
                Err(e) => {
                    last_err = Some(e);
                    continue;
                }
            };

            debug!(target: "layerfs::stack", layer = layer.name(), path = %path.display(), "resolved");
            return Ok(match file.stat() {
                Ok(meta) if meta.is_dir => Handle::Directory(MergedDirectory::backed(
                    Arc::clone(&self.layers),
                    path,
                    file,
                )),
                Ok(_) => Handle::File(file),
                Err(e) => {
                    debug!(target: "layerfs::stack", layer = layer.name(), path = %path.display(), error = %e, "stat failed, treating as file");
                    Handle::File(file)
                }
            });
        }

        Err(last_err.unwrap_or_else(|| VfsError::not_found(path::display(path))))
    }

    /// The highest-priority layer that can open `path`.
    pub fn owner(&self, path: &Path) -> Option<&Layer> {
        self.layers.iter().find(|layer| match layer.fs().open(path) {
            Ok(mut file) => {
                let _ = file.close();
                true
            }
            Err(_) => false,
        })
    }
}

impl FileSystem for LayerStack {
    fn open(&self, path: &Path) -> VfsResult<Box<dyn File>> {
        Ok(Box::new(LayerStack::open(self, path)?))
    }

    fn read_dir(&self, path: &Path) -> VfsResult<Vec<DirEntry>> {
        let mut handle = LayerStack::open(self, path)?;
        let entries = match handle.as_directory() {
            Some(dir) => dir.read_dir(0),
            None => Err(VfsError::NotADirectory {
                path: path::display(path),
            }),
        };
        handle.close()?;
        entries
    }
}
