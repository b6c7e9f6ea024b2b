//! Subdirectory scoping
//!
//! Builds a backend view rooted at a subdirectory of another backend. This
//! is how a single physical tree contributes several layers, e.g.
//! `dir(assets, &["defaults"])` and `dir(assets, &["overrides"])`.

use crate::error::{VfsError, VfsResult};
use crate::metadata::{DirEntry, Metadata};
use crate::path;
use crate::r#trait::{File, FileSystem};
use std::path::{Path, PathBuf};

/// A backend restricted to one of its subdirectories.
#[derive(Debug, Clone)]
pub struct SubFileSystem<F> {
    inner: F,
    prefix: PathBuf,
}

impl<F: FileSystem> SubFileSystem<F> {
    /// The subdirectory this view is rooted at, relative to the inner backend
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// The wrapped backend
    pub fn inner(&self) -> &F {
        &self.inner
    }

    fn full(&self, path: &Path) -> VfsResult<PathBuf> {
        Ok(self.prefix.join(path::clean(path)?))
    }
}

impl<F: FileSystem> FileSystem for SubFileSystem<F> {
    fn open(&self, path: &Path) -> VfsResult<Box<dyn File>> {
        self.inner.open(&self.full(path)?)
    }

    fn read_dir(&self, path: &Path) -> VfsResult<Vec<DirEntry>> {
        self.inner.read_dir(&self.full(path)?)
    }

    fn stat(&self, path: &Path) -> VfsResult<Metadata> {
        self.inner.stat(&self.full(path)?)
    }

    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        self.inner.read_file(&self.full(path)?)
    }
}

/// Returns a new backend that is a subdirectory of `fs`.
///
/// The segments are joined into one relative path. Fails with `NotFound` if
/// the subdirectory does not exist and `NotADirectory` if it is a file.
pub fn dir<F, S>(fs: F, segments: &[S]) -> VfsResult<SubFileSystem<F>>
where
    F: FileSystem,
    S: AsRef<Path>,
{
    let prefix = path::clean(&path::join(segments))?;
    let meta = fs.stat(&prefix)?;
    if !meta.is_dir {
        return Err(VfsError::NotADirectory {
            path: path::display(&prefix),
        });
    }
    Ok(SubFileSystem { inner: fs, prefix })
}

/// Returns a new backend that is a subdirectory of `fs`.
///
/// # Panics
/// If the subdirectory can't be found. Meant for fixed layouts where a
/// missing directory is a configuration error.
pub fn must_dir<F, S>(fs: F, segments: &[S]) -> SubFileSystem<F>
where
    F: FileSystem,
    S: AsRef<Path>,
{
    match dir(fs, segments) {
        Ok(sub) => sub,
        Err(e) => panic!(
            "can't find subdirectory {}: {}",
            path::display(&path::join(segments)),
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryFileSystem;

    fn assets() -> MemoryFileSystem {
        MemoryFileSystem::with_files([
            ("layer1/application.html.tpl", "layer1"),
            ("layer1/layer1", "layer1"),
            ("layer2/config/database", "layer2"),
            ("README", "readme"),
        ])
    }

    #[test]
    fn test_dir_scopes_paths() {
        let sub = dir(assets(), &["layer2"]).unwrap();
        assert_eq!(sub.read_file(Path::new("config/database")).unwrap(), b"layer2");
        assert!(sub.read_file(Path::new("layer1")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_dir_joins_segments() {
        let sub = dir(assets(), &["layer2", "config"]).unwrap();
        assert_eq!(sub.prefix(), Path::new("layer2/config"));
        assert_eq!(sub.read_file(Path::new("database")).unwrap(), b"layer2");
    }

    #[test]
    fn test_dir_root_listing() {
        let sub = dir(assets(), &["layer1"]).unwrap();
        let mut names: Vec<String> = sub
            .read_dir(Path::new("."))
            .unwrap()
            .into_iter()
            .map(|e| e.name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["application.html.tpl", "layer1"]);
        assert!(sub.stat(Path::new("")).unwrap().is_dir);
    }

    #[test]
    fn test_dir_missing() {
        let err = dir(assets(), &["layer9"]).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_dir_on_file() {
        let err = dir(assets(), &["README"]).unwrap_err();
        assert!(matches!(err, VfsError::NotADirectory { .. }));
    }

    #[test]
    fn test_sub_cannot_escape() {
        let sub = dir(assets(), &["layer1"]).unwrap();
        let err = sub.read_file(Path::new("../README")).unwrap_err();
        assert!(matches!(err, VfsError::InvalidPath { .. }));
    }

    #[test]
    fn test_must_dir_ok() {
        let sub = must_dir(assets(), &["layer1"]);
        assert!(sub.exists(Path::new("layer1")));
    }

    #[test]
    #[should_panic(expected = "can't find subdirectory layer9")]
    fn test_must_dir_panics() {
        let _ = must_dir(assets(), &["layer9"]);
    }
}
