//! VFS Error Types

use thiserror::Error;

/// Result type for VFS operations
pub type VfsResult<T> = Result<T, VfsError>;

/// Error type for VFS operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VfsError {
    /// File or directory not found
    #[error("Path not found: {path}")]
    NotFound { path: String },

    /// Permission denied
    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    /// Invalid path
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Operation not supported by this handle
    #[error("Invalid operation '{op}' on {path}")]
    InvalidOperation { op: &'static str, path: String },

    /// Expected a directory
    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    /// Expected a file
    #[error("Is a directory: {path}")]
    IsADirectory { path: String },

    /// Directory iteration is exhausted.
    ///
    /// Returned by paged `read_dir(n)` calls with `n > 0`; this is a
    /// terminal signal, not a failure.
    #[error("End of directory")]
    EndOfDirectory,

    /// IO error
    #[error("IO error: {message}")]
    Io { message: String },

    /// Custom error message
    #[error("{message}")]
    Custom { message: String },
}

impl VfsError {
    /// Shorthand for a `NotFound` error on `path`.
    pub fn not_found(path: impl Into<String>) -> Self {
        VfsError::NotFound { path: path.into() }
    }

    /// True for the paging terminal signal.
    pub fn is_end_of_directory(&self) -> bool {
        matches!(self, VfsError::EndOfDirectory)
    }

    /// True for errors meaning "nothing at this path".
    pub fn is_not_found(&self) -> bool {
        matches!(self, VfsError::NotFound { .. })
    }

    /// Convert an IO error, keeping the kinds the VFS distinguishes.
    pub fn from_io(err: std::io::Error, path: impl Into<String>) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => VfsError::NotFound { path: path.into() },
            std::io::ErrorKind::PermissionDenied => VfsError::PermissionDenied { path: path.into() },
            _ => err.into(),
        }
    }
}

impl From<std::io::Error> for VfsError {
    fn from(err: std::io::Error) -> Self {
        VfsError::Io {
            message: err.to_string(),
        }
    }
}
