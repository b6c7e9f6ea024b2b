//! Layerfs CLI - Command line interface
//!
//! Stacks the directories listed in a JSON manifest and lets you look at the
//! merged tree: read files, list directories and find which layer owns a path.

use clap::{Parser, Subcommand};
use layerfs_config::LogLevel;
use layerfs_vfs::{File, FileSystem, Handle, LayerStack, VfsError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;

mod config;
mod logging;
mod platform;

use crate::config::{build_stack, manifest_dir, read_manifest};
use crate::logging::LogFormat;
use crate::platform::{format_entry, format_metadata, print_error};

#[derive(Parser)]
#[command(
    name = "layerfs",
    about = "Layered file system - view a stack of directories as one tree",
    version
)]
struct Cli {
    /// Layer manifest path
    #[arg(short, long, value_name = "MANIFEST", default_value = "layers.json")]
    manifest: PathBuf,

    /// Log level, overrides the manifest: off (or silent), error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Also append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Print a file from the highest-priority layer that has it
    Cat { path: PathBuf },
    /// List the merged entries of a directory
    Ls {
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Read entries in batches of this size (0 reads everything at once)
        #[arg(long, default_value_t = 0)]
        batch: usize,
    },
    /// Show metadata of the resolved path
    Stat { path: PathBuf },
    /// Show which layer owns a path
    Which { path: PathBuf },
    /// List layers, highest priority first
    Layers,
}

fn main() {
    let cli = Cli::parse();

    let mut manifest = match read_manifest(&cli.manifest) {
        Ok(m) => m,
        Err(e) => {
            print_error(&e.to_string());
            process::exit(1);
        }
    };

    if let Some(level) = &cli.log_level {
        match LogLevel::parse(level) {
            Some(level) => manifest.log.global = level,
            None => {
                print_error(&format!("unknown log level '{}'", level));
                process::exit(1);
            }
        }
    }

    if let Err(e) = logging::init_with_file(&manifest.log, cli.log_format, cli.log_file.as_ref()) {
        print_error(&format!("cannot open log file: {}", e));
        process::exit(1);
    }

    let stack = match build_stack(&manifest, &manifest_dir(&cli.manifest)) {
        Ok(stack) => stack,
        Err(e) => {
            print_error(&e.to_string());
            process::exit(1);
        }
    };
    debug!(target: "layerfs::cli", layers = stack.len(), command = ?cli.command, "running");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run(&cli.command, &stack, &mut out) {
        print_error(&e);
        process::exit(1);
    }
}

/// Execute one command against the stack, writing results to `out`
fn run(command: &Command, stack: &LayerStack, out: &mut impl Write) -> Result<(), String> {
    match command {
        Command::Cat { path } => {
            let content = stack.read_file(path).map_err(|e| e.to_string())?;
            out.write_all(&content).map_err(|e| e.to_string())
        }
        Command::Ls { path, batch } => list(stack, path, *batch, out),
        Command::Stat { path } => {
            let mut handle = stack.open(path).map_err(|e| e.to_string())?;
            let kind = match &handle {
                Handle::File(_) => "file",
                Handle::Directory(dir) if dir.is_synthetic() => "synthetic directory",
                Handle::Directory(_) => "merged directory",
            };
            let meta = handle.stat().map_err(|e| e.to_string())?;
            handle.close().map_err(|e| e.to_string())?;
            writeln!(out, "{}", format_metadata(&meta, kind)).map_err(|e| e.to_string())
        }
        Command::Which { path } => match stack.owner(path) {
            Some(layer) => writeln!(out, "{}", layer.name()).map_err(|e| e.to_string()),
            None => Err(format!("no layer has '{}'", path.display())),
        },
        Command::Layers => {
            for (i, layer) in stack.layers().enumerate() {
                writeln!(out, "{:>3} {}", i, layer.name()).map_err(|e| e.to_string())?;
            }
            Ok(())
        }
    }
}

/// List a path: directories print their merged entries, files print themselves
fn list(stack: &LayerStack, path: &Path, batch: usize, out: &mut impl Write) -> Result<(), String> {
    let mut handle = stack.open(path).map_err(|e| e.to_string())?;
    let result = match handle.as_directory() {
        Some(dir) => loop {
            match dir.read_dir(batch) {
                Ok(entries) => {
                    for entry in &entries {
                        writeln!(out, "{}", format_entry(entry)).map_err(|e| e.to_string())?;
                    }
                    if batch == 0 {
                        break Ok(());
                    }
                }
                Err(VfsError::EndOfDirectory) => break Ok(()),
                Err(e) => break Err(e.to_string()),
            }
        },
        None => {
            let meta = handle.stat().map_err(|e| e.to_string())?;
            let entry = layerfs_vfs::DirEntry::new(meta.name.clone(), meta);
            writeln!(out, "{}", format_entry(&entry)).map_err(|e| e.to_string())
        }
    };
    handle.close().map_err(|e| e.to_string())?;
    result
}
