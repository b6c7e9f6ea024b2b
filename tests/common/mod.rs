//! Test helpers
//!
//! Fixture stacks and a tree walker that checks a stack behaves like a
//! consistent read-only file system.

#![allow(dead_code)]

use layerfs::{must_dir, DirEntry, File, FileSystem, LayerStack, MemoryFileSystem, NativeFileSystem, VfsError};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Directory holding the on-disk fixture layers
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// The three fixture layers stacked layer0 (bottom) to layer2 (top)
pub fn native_stack() -> LayerStack {
    let assets = NativeFileSystem::with_base(fixtures_dir());
    let mut stack = LayerStack::new();
    stack.add("layer0", must_dir(assets.clone(), &["layer0"]));
    stack.add("layer1", must_dir(assets.clone(), &["layer1"]));
    stack.add("layer2", must_dir(assets, &["layer2"]));
    stack
}

/// Same layout as the fixture directories, held in memory
pub fn memory_stack() -> LayerStack {
    let assets = MemoryFileSystem::with_files([
        ("layer0/layer0", "layer0\n"),
        ("layer0/application.html.tpl", "layer0\n"),
        ("layer0/config/database", "layer0\n"),
        ("layer0/config/pool", "layer0\n"),
        ("layer1/layer1", "layer1\n"),
        ("layer1/application.html.tpl", "layer1\n"),
        ("layer2/layer2", "layer2\n"),
        ("layer2/config/database", "layer2\n"),
    ]);
    LayerStack::new()
        .with_layer("layer0", must_dir(assets.clone(), &["layer0"]))
        .with_layer("layer1", must_dir(assets.clone(), &["layer1"]))
        .with_layer("layer2", must_dir(assets, &["layer2"]))
}

/// Read a file and compare its trimmed content
pub fn assert_file_content(fs: &impl FileSystem, path: &str, expected: &str) {
    let data = fs
        .read_file(Path::new(path))
        .unwrap_or_else(|e| panic!("expected {} to be a file, got error: {}", path, e));
    let content = String::from_utf8_lossy(&data);
    assert_eq!(content.trim(), expected, "content of {}", path);
}

/// Drain a directory with paged reads of `n`
pub fn drain(stack: &LayerStack, path: &str, n: usize) -> Vec<DirEntry> {
    let mut handle = stack.open(Path::new(path)).unwrap();
    let dir = handle.as_directory().expect("expected a directory");
    let mut all = Vec::new();
    loop {
        match dir.read_dir(n) {
            Ok(entries) => {
                assert!(!entries.is_empty(), "empty batch without EndOfDirectory");
                all.extend(entries);
            }
            Err(VfsError::EndOfDirectory) => break,
            Err(e) => panic!("read_dir({}) on {}: {}", n, path, e),
        }
    }
    handle.close().unwrap();
    all
}

pub fn names(entries: &[DirEntry]) -> BTreeSet<String> {
    entries.iter().map(|e| e.name().to_string()).collect()
}

fn join(dir: &str, name: &str) -> String {
    if dir == "." {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Walk the whole stack from the root and check every directory and file.
///
/// - full and paged listings agree, with no duplicate names
/// - every listed file opens, its stat matches the entry, and its content
///   matches `read_file`
/// - every listed directory opens as a directory
///
/// Returns the paths of all files found; `expected` must be among them.
pub fn check_tree(stack: &LayerStack, expected: &[&str]) -> BTreeSet<String> {
    let mut files = BTreeSet::new();
    let mut pending = vec![String::from(".")];

    while let Some(dir_path) = pending.pop() {
        let mut handle = stack.open(Path::new(&dir_path)).unwrap();
        assert!(handle.stat().unwrap().is_dir, "{} should stat as a directory", dir_path);
        let full = handle.as_directory().unwrap().read_dir(0).unwrap();
        handle.close().unwrap();

        assert_eq!(names(&full).len(), full.len(), "duplicate entries in {}", dir_path);
        for n in [1, 2, 7] {
            assert_eq!(names(&drain(stack, &dir_path, n)), names(&full), "paging {} by {}", dir_path, n);
        }

        for entry in &full {
            let path = join(&dir_path, entry.name());
            let mut handle = stack.open(Path::new(&path)).unwrap();
            let meta = handle.stat().unwrap();
            assert_eq!(meta.is_dir, entry.is_dir(), "kind of {}", path);

            if entry.is_dir() {
                assert!(handle.is_dir(), "{} should open as a directory", path);
                pending.push(path);
            } else {
                assert_eq!(meta.name, entry.name(), "name of {}", path);
                assert_eq!(meta.size, entry.metadata().size, "size of {}", path);
                let content = handle.read_to_end().unwrap();
                assert_eq!(content, stack.read_file(Path::new(&path)).unwrap());
                assert_eq!(content.len() as u64, meta.size);
                files.insert(path);
            }
            handle.close().unwrap();
        }
    }

    for path in expected {
        assert!(files.contains(*path), "expected to find file {}", path);
    }
    files
}
