//! File metadata and directory entries

use std::time::SystemTime;

/// Permission bits reported for directories that have no real backing file.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Permission bits reported for files when the backend has none.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Metadata about a file or directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Base name (or the requested path for synthetic directories)
    pub name: String,
    /// Size in bytes (0 for directories)
    pub size: u64,
    /// Permission bits
    pub mode: u32,
    /// Last modification time, `None` when unknown
    pub modified: Option<SystemTime>,
    /// True if this is a directory
    pub is_dir: bool,
}

impl Metadata {
    /// Metadata for a regular file.
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            mode: DEFAULT_FILE_MODE,
            modified: None,
            is_dir: false,
        }
    }

    /// Metadata for a directory.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            mode: DEFAULT_DIR_MODE,
            modified: None,
            is_dir: true,
        }
    }

    /// Set the modification time.
    pub fn with_modified(mut self, modified: Option<SystemTime>) -> Self {
        self.modified = modified;
        self
    }

    /// True if this is a regular file.
    pub fn is_file(&self) -> bool {
        !self.is_dir
    }
}

/// A directory entry returned by `read_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    name: String,
    metadata: Metadata,
}

impl DirEntry {
    /// Create an entry; `name` is the entry name, not a full path.
    pub fn new(name: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            name: name.into(),
            metadata,
        }
    }

    /// Name of the entry (not full path)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        self.metadata.is_dir
    }

    /// Metadata as reported by the layer that produced this entry
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}
