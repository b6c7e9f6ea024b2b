//! CLI logging initialization
//!
//! Based on `tracing-subscriber`, with one filter target per component.
//! Logs go to stderr so that stdout only carries command output.

use layerfs::logger::targets;
use layerfs_config::LogConfig;
use std::io;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Colored, multi-line (development)
    Pretty,
    /// One line per event
    Compact,
    /// JSON (tool integration)
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Compact
    }
}

/// Initialize logging with the given format and log configuration
///
/// # Arguments
/// * `format` - Log format for the console
/// * `file` - Log file path; `None` logs to the console only
pub fn init_with_file<P: AsRef<std::path::Path>>(
    log_config: &LogConfig,
    format: LogFormat,
    file: Option<P>,
) -> io::Result<()> {
    let targets = targets(log_config);

    // If file specified, output to both console and file
    if let Some(path) = file {
        let file_handle = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        let console_layer = create_format_layer(format, io::stderr).with_filter(targets.clone());

        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file_handle))
            .with_filter(targets);

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .init();
    } else {
        // Console only
        let console_layer = create_format_layer(format, io::stderr).with_filter(targets);
        tracing_subscriber::registry().with(console_layer).init();
    }
    Ok(())
}

/// Create formatter layer based on format
fn create_format_layer<W, F>(format: LogFormat, make_writer: F) -> Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>
where
    W: io::Write + Send + Sync + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;

    #[test]
    fn test_format_names() {
        assert_eq!(LogFormat::from_str("json", true).unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("Pretty", true).unwrap(), LogFormat::Pretty);
        assert!(LogFormat::from_str("xml", true).is_err());
    }

    #[test]
    fn test_default_format() {
        assert_eq!(LogFormat::default(), LogFormat::Compact);
    }
}
