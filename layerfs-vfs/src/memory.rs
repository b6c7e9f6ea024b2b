//! In-memory file system implementation

use crate::error::{VfsError, VfsResult};
use crate::metadata::{DirEntry, Metadata};
use crate::path;
use crate::r#trait::{File, FileSystem};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

/// Node in the memory tree
#[derive(Debug, Clone)]
enum Node {
    File { data: Arc<Vec<u8>>, modified: SystemTime },
    Directory { modified: SystemTime },
}

/// An in-memory file system implementation.
///
/// Nodes are stored in a `BTreeMap` keyed by clean slash-separated paths, so
/// the children of a directory are a contiguous key range. Parent directories
/// are created implicitly when a file is written.
///
/// # Example
/// ```
/// use layerfs_vfs::{FileSystem, MemoryFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new();
/// fs.write_file(Path::new("config/database"), b"sqlite").unwrap();
/// assert_eq!(fs.read_file(Path::new("config/database")).unwrap(), b"sqlite");
/// assert!(fs.is_dir(Path::new("config")));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    nodes: Arc<RwLock<BTreeMap<String, Node>>>,
}

impl MemoryFileSystem {
    /// Create a new empty memory file system.
    pub fn new() -> Self {
        Self {
            nodes: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a new memory file system pre-populated with files.
    ///
    /// # Arguments
    /// * `files` - Iterator of (path, content) tuples
    ///
    /// # Panics
    /// If a path is invalid or collides with a directory.
    pub fn with_files<I, S, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (S, C)>,
        S: AsRef<str>,
        C: Into<Vec<u8>>,
    {
        let fs = Self::new();
        for (path, content) in files {
            let path = path.as_ref();
            let content: Vec<u8> = content.into();
            if let Err(e) = fs.write_file(Path::new(path), &content) {
                panic!("invalid memory file '{}': {}", path, e);
            }
        }
        fs
    }

    /// Normalize a path into its storage key. The root is `""`.
    fn key(path: &Path) -> VfsResult<String> {
        Ok(path::display(&path::clean(path)?))
    }

    fn poisoned() -> VfsError {
        VfsError::Custom {
            message: String::from("Lock poisoned"),
        }
    }

    /// Write file contents, creating parent directories as needed.
    pub fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        let key = Self::key(path)?;
        if key.is_empty() {
            return Err(VfsError::IsADirectory { path: key });
        }
        let mut nodes = self.nodes.write().map_err(|_| Self::poisoned())?;
        if let Some(Node::Directory { .. }) = nodes.get(&key) {
            return Err(VfsError::IsADirectory { path: key });
        }
        Self::ensure_parents(&mut nodes, &key)?;
        nodes.insert(
            key,
            Node::File {
                data: Arc::new(content.to_vec()),
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    /// Create a directory (and its parents). Existing directories are kept.
    pub fn create_dir(&self, path: &Path) -> VfsResult<()> {
        let key = Self::key(path)?;
        if key.is_empty() {
            return Ok(());
        }
        let mut nodes = self.nodes.write().map_err(|_| Self::poisoned())?;
        Self::ensure_parents(&mut nodes, &key)?;
        match nodes.get(&key) {
            Some(Node::File { .. }) => Err(VfsError::NotADirectory { path: key }),
            Some(Node::Directory { .. }) => Ok(()),
            None => {
                nodes.insert(
                    key,
                    Node::Directory {
                        modified: SystemTime::now(),
                    },
                );
                Ok(())
            }
        }
    }

    fn ensure_parents(nodes: &mut BTreeMap<String, Node>, key: &str) -> VfsResult<()> {
        let mut end = 0;
        while let Some(offset) = key[end..].find('/') {
            end += offset;
            let parent = &key[..end];
            match nodes.get(parent) {
                Some(Node::File { .. }) => {
                    return Err(VfsError::NotADirectory {
                        path: parent.to_string(),
                    })
                }
                Some(Node::Directory { .. }) => {}
                None => {
                    nodes.insert(
                        parent.to_string(),
                        Node::Directory {
                            modified: SystemTime::now(),
                        },
                    );
                }
            }
            end += 1;
        }
        Ok(())
    }

    fn node(&self, path: &Path) -> VfsResult<(String, Option<Node>)> {
        let key = Self::key(path)?;
        if key.is_empty() {
            return Ok((key, None));
        }
        let nodes = self.nodes.read().map_err(|_| Self::poisoned())?;
        match nodes.get(&key) {
            Some(node) => Ok((key, Some(node.clone()))),
            None => Err(VfsError::NotFound { path: key }),
        }
    }

    /// Check if path exists as a file
    pub fn is_file(&self, path: &Path) -> bool {
        matches!(self.node(path), Ok((_, Some(Node::File { .. }))))
    }

    /// Check if path exists as a directory (the root always does)
    pub fn is_dir(&self, path: &Path) -> bool {
        matches!(self.node(path), Ok((_, None)) | Ok((_, Some(Node::Directory { .. }))))
    }

    fn metadata(key: &str, node: Option<&Node>) -> Metadata {
        let name = path::base_name(Path::new(key));
        match node {
            Some(Node::File { data, modified }) => {
                Metadata::file(name, data.len() as u64).with_modified(Some(*modified))
            }
            Some(Node::Directory { modified }) => {
                Metadata::directory(name).with_modified(Some(*modified))
            }
            None => Metadata::directory(name),
        }
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Open handle on a memory node.
///
/// File content is shared with the tree at open time; later writes to the
/// same path do not affect an open handle.
#[derive(Debug)]
pub struct MemoryFile {
    key: String,
    metadata: Metadata,
    data: Option<Arc<Vec<u8>>>,
    pos: usize,
}

impl File for MemoryFile {
    fn stat(&self) -> VfsResult<Metadata> {
        Ok(self.metadata.clone())
    }

    fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize> {
        let data = self.data.as_ref().ok_or_else(|| VfsError::IsADirectory {
            path: self.key.clone(),
        })?;
        let remaining = &data[self.pos.min(data.len())..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl FileSystem for MemoryFileSystem {
    fn open(&self, path: &Path) -> VfsResult<Box<dyn File>> {
        let (key, node) = self.node(path)?;
        let metadata = Self::metadata(&key, node.as_ref());
        let data = match node {
            Some(Node::File { data, .. }) => Some(data),
            _ => None,
        };
        Ok(Box::new(MemoryFile {
            key,
            metadata,
            data,
            pos: 0,
        }))
    }

    fn read_dir(&self, path: &Path) -> VfsResult<Vec<DirEntry>> {
        let (key, node) = self.node(path)?;
        if let Some(Node::File { .. }) = node {
            return Err(VfsError::NotADirectory { path: key });
        }

        let prefix = if key.is_empty() {
            String::new()
        } else {
            format!("{}/", key)
        };
        let nodes = self.nodes.read().map_err(|_| Self::poisoned())?;
        let entries = nodes
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .filter(|(k, _)| !k[prefix.len()..].contains('/'))
            .map(|(k, node)| DirEntry::new(&k[prefix.len()..], Self::metadata(k, Some(node))))
            .collect();
        Ok(entries)
    }

    fn stat(&self, path: &Path) -> VfsResult<Metadata> {
        let (key, node) = self.node(path)?;
        Ok(Self::metadata(&key, node.as_ref()))
    }
}
