//! Layerfs Virtual File System
//!
//! A layered (union) file system: several read-only backends are stacked,
//! the most recently added layer wins for duplicate paths, and directories
//! list the merged entries of every layer.
//!
//! # Usage
//! ```rust
//! use layerfs_vfs::{FileSystem, LayerStack, MemoryFileSystem};
//! use std::path::Path;
//!
//! let mut stack = LayerStack::new();
//! stack.add("defaults", MemoryFileSystem::with_files([("x", "1")]));
//! stack.add("user", MemoryFileSystem::with_files([("x", "2"), ("y", "3")]));
//!
//! assert_eq!(stack.read_file(Path::new("x")).unwrap(), b"2");
//!
//! let mut root = stack.open(Path::new(".")).unwrap();
//! let entries = root.as_directory().unwrap().read_dir(0).unwrap();
//! assert_eq!(entries.len(), 2);
//! ```

mod error;
mod memory;
mod merged;
mod metadata;
mod native;
pub mod path;
mod stack;
mod sub;
mod r#trait;

pub use error::{VfsError, VfsResult};
pub use memory::{MemoryFile, MemoryFileSystem};
pub use merged::MergedDirectory;
pub use metadata::{DirEntry, Metadata, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE};
pub use native::{NativeFile, NativeFileSystem};
pub use r#trait::{File, FileSystem};
pub use stack::{Handle, Layer, LayerStack};
pub use sub::{dir, must_dir, SubFileSystem};

/// Create a new memory-based file system.
pub fn memory_fs() -> MemoryFileSystem {
    MemoryFileSystem::new()
}

/// Create a new native file system rooted at `base`.
pub fn native_fs(base: impl Into<std::path::PathBuf>) -> NativeFileSystem {
    NativeFileSystem::with_base(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_helpers_stack() {
        let defaults = memory_fs();
        defaults.write_file(Path::new("theme"), b"light").unwrap();

        let mut stack = LayerStack::new();
        stack.add("defaults", defaults);
        stack.add("cwd", native_fs(std::env::temp_dir()));

        assert_eq!(stack.read_file(Path::new("theme")).unwrap(), b"light");
        assert!(stack.open(Path::new(".")).unwrap().is_dir());
    }
}
