//! Layerfs - a layered (union) virtual file system
//!
//! Several read-only backends are stacked into one tree. Files come from the
//! highest-priority layer that has them; directories list the union of all
//! layers, each name once.
//!
//! # Architecture
//!
//! ```text
//! layerfs-config/  - Pure configuration data (manifest, log levels)
//! layerfs-vfs/     - Backends, LayerStack, MergedDirectory
//! layerfs-cli/     - `layerfs` command line tool
//! src/             - Re-exports and logger setup for embedders
//! ```
//!
//! # Quick Start
//!
//! ```
//! use layerfs::{FileSystem, LayerStack, MemoryFileSystem};
//! use std::path::Path;
//!
//! let stack = LayerStack::new()
//!     .with_layer("defaults", MemoryFileSystem::with_files([("theme", "light")]))
//!     .with_layer("user", MemoryFileSystem::with_files([("theme", "dark")]));
//!
//! assert_eq!(stack.read_file(Path::new("theme")).unwrap(), b"dark");
//! ```

pub mod logger;

pub use layerfs_config as config;
pub use layerfs_config::{LayerSpec, LogConfig, LogLevel, StackManifest, Target};
pub use layerfs_vfs::*;
pub use logger::init_logger;
