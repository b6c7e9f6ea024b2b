//! CLI output formatting

use layerfs_vfs::{DirEntry, Metadata};
use std::time::UNIX_EPOCH;

/// Print an error to stderr
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}

/// Permission string in `ls -l` style, e.g. `drwxr-xr-x`
fn mode_string(mode: u32, is_dir: bool) -> String {
    let mut out = String::with_capacity(10);
    out.push(if is_dir { 'd' } else { '-' });
    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

/// One listing line for a directory entry
pub fn format_entry(entry: &DirEntry) -> String {
    let meta = entry.metadata();
    let suffix = if entry.is_dir() { "/" } else { "" };
    format!(
        "{} {:>10} {}{}",
        mode_string(meta.mode, meta.is_dir),
        meta.size,
        entry.name(),
        suffix
    )
}

/// Multi-line description of a handle's metadata
pub fn format_metadata(meta: &Metadata, kind: &str) -> String {
    let modified = meta
        .modified
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|| String::from("-"));

    format!(
        "name:     {}\nkind:     {}\nsize:     {}\nmode:     {} ({:o})\nmodified: {}",
        meta.name,
        kind,
        meta.size,
        mode_string(meta.mode, meta.is_dir),
        meta.mode,
        modified
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_string() {
        assert_eq!(mode_string(0o755, true), "drwxr-xr-x");
        assert_eq!(mode_string(0o644, false), "-rw-r--r--");
    }

    #[test]
    fn test_format_entry() {
        let entry = DirEntry::new("config", Metadata::directory("config"));
        assert_eq!(format_entry(&entry), "drwxr-xr-x          0 config/");

        let entry = DirEntry::new("database", Metadata::file("database", 42));
        assert_eq!(format_entry(&entry), "-rw-r--r--         42 database");
    }

    #[test]
    fn test_format_metadata_without_time() {
        let text = format_metadata(&Metadata::directory("."), "synthetic directory");
        assert!(text.contains("kind:     synthetic directory"));
        assert!(text.contains("mode:     drwxr-xr-x (755)"));
        assert!(text.ends_with("modified: -"));
    }
}
