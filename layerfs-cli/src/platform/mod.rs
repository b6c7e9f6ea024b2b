//! Platform - terminal formatting
//!
//! Everything that turns VFS data into text for the terminal lives here.

pub mod cli;

pub use cli::{format_entry, format_metadata, print_error};
