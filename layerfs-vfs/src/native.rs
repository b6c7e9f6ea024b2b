//! Native file system implementation

use crate::error::{VfsError, VfsResult};
use crate::metadata::{DirEntry, Metadata};
use crate::path;
use crate::r#trait::{File, FileSystem};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::trace;

/// A native OS directory tree exposed as a read-only backend.
///
/// All paths are resolved relative to the base directory; `..` components
/// are rejected, so the backend never reaches outside its base.
///
/// # Example
/// ```
/// use layerfs_vfs::{FileSystem, NativeFileSystem};
/// use std::path::Path;
///
/// let fs = NativeFileSystem::with_base(std::env::temp_dir());
/// assert!(fs.stat(Path::new(".")).unwrap().is_dir);
/// ```
#[derive(Debug, Clone)]
pub struct NativeFileSystem {
    base: PathBuf,
}

impl NativeFileSystem {
    /// Create a native file system rooted at the current directory.
    pub fn new() -> Self {
        Self::with_base(".")
    }

    /// Create a new native file system with a base directory.
    ///
    /// All paths will be relative to this base directory.
    ///
    /// # Arguments
    /// * `base` - The base directory for all file operations
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// The base directory
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn resolve(&self, path: &Path) -> VfsResult<(PathBuf, PathBuf)> {
        let rel = path::clean(path)?;
        let full = self.base.join(&rel);
        Ok((rel, full))
    }
}

impl Default for NativeFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn to_metadata(name: String, meta: &std::fs::Metadata) -> Metadata {
    let is_dir = meta.is_dir();

    #[cfg(unix)]
    let mode = {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o7777
    };
    #[cfg(not(unix))]
    let mode = if is_dir {
        crate::metadata::DEFAULT_DIR_MODE
    } else {
        crate::metadata::DEFAULT_FILE_MODE
    };

    Metadata {
        name,
        size: if is_dir { 0 } else { meta.len() },
        mode,
        modified: meta.modified().ok(),
        is_dir,
    }
}

/// Open handle on a native file or directory
#[derive(Debug)]
pub struct NativeFile {
    path: String,
    metadata: Metadata,
    file: Option<std::fs::File>,
}

impl File for NativeFile {
    fn stat(&self) -> VfsResult<Metadata> {
        Ok(self.metadata.clone())
    }

    fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize> {
        match self.file.as_mut() {
            Some(file) => file.read(buf).map_err(|e| VfsError::from_io(e, self.path.clone())),
            None if self.metadata.is_dir => Err(VfsError::IsADirectory {
                path: self.path.clone(),
            }),
            None => Err(VfsError::InvalidOperation {
                op: "read",
                path: self.path.clone(),
            }),
        }
    }

    fn close(&mut self) -> VfsResult<()> {
        self.file = None;
        Ok(())
    }
}

impl FileSystem for NativeFileSystem {
    fn open(&self, path: &Path) -> VfsResult<Box<dyn File>> {
        let (rel, full) = self.resolve(path)?;
        let display = path::display(&rel);
        trace!(target: "layerfs::native", path = %full.display(), "open");

        let meta = std::fs::metadata(&full).map_err(|e| VfsError::from_io(e, display.clone()))?;
        let metadata = to_metadata(path::base_name(&rel), &meta);
        let file = if metadata.is_dir {
            None
        } else {
            Some(std::fs::File::open(&full).map_err(|e| VfsError::from_io(e, display.clone()))?)
        };

        Ok(Box::new(NativeFile {
            path: display,
            metadata,
            file,
        }))
    }

    fn read_dir(&self, path: &Path) -> VfsResult<Vec<DirEntry>> {
        let (rel, full) = self.resolve(path)?;
        let display = path::display(&rel);
        trace!(target: "layerfs::native", path = %full.display(), "read_dir");

        let reader = std::fs::read_dir(&full).map_err(|e| {
            if full.is_file() {
                VfsError::NotADirectory {
                    path: display.clone(),
                }
            } else {
                VfsError::from_io(e, display.clone())
            }
        })?;

        // Entries are stat'ed through symlinks, like `open`; unreadable ones are
        // left out rather than failing the listing.
        let mut entries = Vec::new();
        for entry in reader {
            let entry = entry.map_err(|e| VfsError::from_io(e, display.clone()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            match std::fs::metadata(entry.path()) {
                Ok(meta) => entries.push(DirEntry::new(name.clone(), to_metadata(name, &meta))),
                Err(e) => {
                    trace!(target: "layerfs::native", path = %entry.path().display(), error = %e, "entry skipped");
                }
            }
        }
        Ok(entries)
    }

    fn stat(&self, path: &Path) -> VfsResult<Metadata> {
        let (rel, full) = self.resolve(path)?;
        let meta =
            std::fs::metadata(&full).map_err(|e| VfsError::from_io(e, path::display(&rel)))?;
        Ok(to_metadata(path::base_name(&rel), &meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("layerfs_native_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_native_read() {
        let dir = temp_dir("read");
        {
            let mut file = std::fs::File::create(dir.join("hello.txt")).unwrap();
            file.write_all(b"hello native").unwrap();
        }

        let fs = NativeFileSystem::with_base(&dir);
        assert_eq!(fs.read_file(Path::new("hello.txt")).unwrap(), b"hello native");
        assert_eq!(fs.stat(Path::new("hello.txt")).unwrap().size, 12);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_native_empty_file() {
        let dir = temp_dir("empty");
        std::fs::write(dir.join("empty"), b"").unwrap();

        let fs = NativeFileSystem::with_base(&dir);
        assert!(fs.read_file(Path::new("empty")).unwrap().is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_native_directory_handle() {
        let dir = temp_dir("dir_handle");
        std::fs::create_dir(dir.join("sub")).unwrap();

        let fs = NativeFileSystem::with_base(&dir);
        let mut handle = fs.open(Path::new("sub")).unwrap();
        let meta = handle.stat().unwrap();
        assert!(meta.is_dir);
        assert_eq!(meta.name, "sub");

        let mut buf = [0u8; 4];
        assert!(matches!(
            handle.read(&mut buf).unwrap_err(),
            VfsError::IsADirectory { .. }
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_native_read_dir() {
        let dir = temp_dir("read_dir");
        std::fs::write(dir.join("a.txt"), b"a").unwrap();
        std::fs::create_dir(dir.join("b")).unwrap();

        let fs = NativeFileSystem::with_base(&dir);
        let mut entries = fs.read_dir(Path::new("")).unwrap();
        entries.sort_by(|a, b| a.name().cmp(b.name()));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name(), "a.txt");
        assert!(!entries[0].is_dir());
        assert_eq!(entries[1].name(), "b");
        assert!(entries[1].is_dir());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_native_read_dir_on_file() {
        let dir = temp_dir("read_dir_file");
        std::fs::write(dir.join("a.txt"), b"a").unwrap();

        let fs = NativeFileSystem::with_base(&dir);
        let err = fs.read_dir(Path::new("a.txt")).unwrap_err();
        assert!(matches!(err, VfsError::NotADirectory { .. }));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_native_read_nonexistent() {
        let dir = temp_dir("nonexistent");
        let fs = NativeFileSystem::with_base(&dir);

        let result = fs.read_file(Path::new("missing.txt"));
        assert!(matches!(result.unwrap_err(), VfsError::NotFound { .. }));
        assert!(!fs.exists(Path::new("missing.txt")));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_native_read_dir_follows_symlinks() {
        let dir = temp_dir("symlinks");
        std::fs::create_dir(dir.join("real")).unwrap();
        std::fs::write(dir.join("real/inner"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.join("real"), dir.join("linked")).unwrap();
        std::os::unix::fs::symlink(dir.join("gone"), dir.join("dangling")).unwrap();

        let fs = NativeFileSystem::with_base(&dir);
        let entries = fs.read_dir(Path::new("")).unwrap();
        let mut names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
        names.sort();
        assert_eq!(names, vec!["linked", "real"]);

        let linked = entries.iter().find(|e| e.name() == "linked").unwrap();
        assert!(linked.is_dir());
        assert_eq!(linked.is_dir(), fs.open(Path::new("linked")).unwrap().stat().unwrap().is_dir);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_native_rejects_escape() {
        let fs = NativeFileSystem::with_base(std::env::temp_dir());
        let err = fs.stat(Path::new("../etc")).unwrap_err();
        assert!(matches!(err, VfsError::InvalidPath { .. }));
    }
}
