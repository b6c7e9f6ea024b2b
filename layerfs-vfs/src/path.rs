//! Path normalization shared by the backends

use crate::error::{VfsError, VfsResult};
use std::path::{Component, Path, PathBuf};

/// Normalize a backend path to a clean relative path.
///
/// Leading `/` and `.` components are dropped, so `""`, `"."` and `"/"` all
/// name the backend root (an empty path). `..` is rejected: a backend never
/// hands out anything above its own root.
pub fn clean(path: &Path) -> VfsResult<PathBuf> {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::Normal(s) => result.push(s),
            Component::ParentDir => {
                return Err(VfsError::InvalidPath {
                    path: display(path),
                    reason: String::from("parent directory components are not allowed"),
                })
            }
            Component::Prefix(_) => {
                return Err(VfsError::InvalidPath {
                    path: display(path),
                    reason: String::from("path prefixes are not allowed"),
                })
            }
        }
    }
    Ok(result)
}

/// Slash-separated string form of a path, used as a map key and in errors.
pub fn display(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Join path segments into a single relative path.
pub fn join<S: AsRef<Path>>(segments: &[S]) -> PathBuf {
    segments.iter().map(|s| s.as_ref()).collect()
}

/// Base name of a clean path, `"."` for the root.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("."))
}

/// True for the root/self markers `""` and `"."`.
pub fn is_self(path: &Path) -> bool {
    path.as_os_str().is_empty() || path == Path::new(".")
}
