//! Layerfs Config - Pure configuration data structures
//!
//! This crate contains only data structures, no IO or global state.
//! It serves as the shared configuration vocabulary between the library
//! and the CLI, and is deserializable from the JSON layer manifest.

use serde::Deserialize;
use std::path::PathBuf;

/// A layer manifest: the layers to stack and how to log.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackManifest {
    /// Layers in the order they are added (last = highest priority)
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

/// One layer of the manifest
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerSpec {
    /// Diagnostic label; defaults to the root path
    #[serde(default)]
    pub label: Option<String>,
    /// Directory on disk backing the layer
    pub root: PathBuf,
    /// Optional subdirectory of `root`, as path segments
    #[serde(default)]
    pub subdir: Vec<String>,
}

impl LayerSpec {
    /// The label used in logs and `which` output
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.root.to_string_lossy().into_owned(),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No output at all
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse a level name; `"silent"` is an alias for `off`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "silent" | "off" => Some(LogLevel::Off),
            "error" => Some(LogLevel::Error),
            "warn" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

/// Log targets, one per component
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Stack,
    Merge,
    Native,
    Cli,
}

impl Target {
    /// All targets, for building filters
    pub const ALL: [Target; 4] = [Target::Stack, Target::Merge, Target::Native, Target::Cli];

    /// Get the string name of the target
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Stack => "stack",
            Target::Merge => "merge",
            Target::Native => "native",
            Target::Cli => "cli",
        }
    }

    /// Get the tracing target name
    pub fn target(&self) -> String {
        format!("layerfs::{}", self.as_str())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Global default level
    #[serde(default, rename = "level")]
    pub global: LogLevel,
    /// Stack resolution level (None means global)
    #[serde(default)]
    pub stack: Option<LogLevel>,
    /// Directory merge level
    #[serde(default)]
    pub merge: Option<LogLevel>,
    /// Native backend level
    #[serde(default)]
    pub native: Option<LogLevel>,
}

impl LogConfig {
    /// Get the effective level for a target
    ///
    /// Returns the target-specific level if set, otherwise the global one.
    pub fn level_for(&self, target: Target) -> LogLevel {
        let specific = match target {
            Target::Stack => self.stack,
            Target::Merge => self.merge,
            Target::Native => self.native,
            Target::Cli => None,
        };
        specific.unwrap_or(self.global)
    }
}
