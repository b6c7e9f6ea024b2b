//! FileSystem and File trait definitions

use crate::error::{VfsError, VfsResult};
use crate::metadata::{DirEntry, Metadata};
use std::path::Path;
use std::sync::Arc;

/// An open file or directory handle.
///
/// Handles are owned by a single caller at a time; they are `Send` so they
/// can move between threads, but are never shared.
pub trait File: Send {
    /// Metadata for the open handle
    fn stat(&self) -> VfsResult<Metadata>;

    /// Read bytes into `buf`, returning how many were read.
    ///
    /// `Ok(0)` means end of file.
    fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize>;

    /// Release the handle.
    fn close(&mut self) -> VfsResult<()> {
        Ok(())
    }

    /// Read the remaining bytes of the handle.
    fn read_to_end(&mut self) -> VfsResult<Vec<u8>> {
        let mut content = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                return Ok(content);
            }
            content.extend_from_slice(&chunk[..n]);
        }
    }
}

/// Read-only file system backend.
///
/// All paths are relative to the backend root. `""` and `"."` name the root
/// itself. Backends decide how to treat a leading `/`.
///
/// # Implementations
/// - `MemoryFileSystem`: In-memory file system
/// - `NativeFileSystem`: Native OS directory tree
/// - `SubFileSystem`: A subdirectory of another backend
/// - `LayerStack`: The union of several backends
pub trait FileSystem: Send + Sync {
    /// Open a file or directory
    ///
    /// # Arguments
    /// * `path` - Path relative to the backend root
    ///
    /// # Returns
    /// An open handle, or VfsError
    fn open(&self, path: &Path) -> VfsResult<Box<dyn File>>;

    /// List the entries of a directory
    ///
    /// # Arguments
    /// * `path` - Directory path relative to the backend root
    ///
    /// # Returns
    /// The directory's entries, or VfsError
    fn read_dir(&self, path: &Path) -> VfsResult<Vec<DirEntry>>;

    /// Get metadata for a file or directory
    fn stat(&self, path: &Path) -> VfsResult<Metadata> {
        let mut file = self.open(path)?;
        let meta = file.stat();
        file.close()?;
        meta
    }

    /// Read a whole file
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let mut file = self.open(path)?;
        if file.stat()?.is_dir {
            let _ = file.close();
            return Err(VfsError::IsADirectory {
                path: path.to_string_lossy().into_owned(),
            });
        }
        let content = file.read_to_end();
        file.close()?;
        content
    }

    /// Check if path exists
    fn exists(&self, path: &Path) -> bool {
        self.stat(path).is_ok()
    }
}

impl<T: FileSystem + ?Sized> FileSystem for Arc<T> {
    fn open(&self, path: &Path) -> VfsResult<Box<dyn File>> {
        (**self).open(path)
    }

    fn read_dir(&self, path: &Path) -> VfsResult<Vec<DirEntry>> {
        (**self).read_dir(path)
    }

    fn stat(&self, path: &Path) -> VfsResult<Metadata> {
        (**self).stat(path)
    }

    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        (**self).read_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}

impl std::fmt::Debug for dyn File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.stat() {
            Ok(meta) => f.debug_tuple("File").field(&meta.name).finish(),
            Err(_) => f.write_str("File"),
        }
    }
}

impl<F: File + ?Sized> File for Box<F> {
    fn stat(&self) -> VfsResult<Metadata> {
        (**self).stat()
    }

    fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize> {
        (**self).read(buf)
    }

    fn close(&mut self) -> VfsResult<()> {
        (**self).close()
    }
}
