//! Logger initialization
//!
//! Based on `tracing` and `tracing-subscriber`, with per-component target
//! filtering. The CLI builds its own output layers on top of [`targets`];
//! [`init_logger`] is for programs that embed the library and just want the
//! stack's logs.
//!
//! # Example
//! ```ignore
//! use layerfs::{init_logger, LogConfig};
//!
//! init_logger(&LogConfig::default());
//! ```

use layerfs_config::{LogConfig, LogLevel, Target};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Map a configured level onto tracing's filter
pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

/// Per-target filter: the global level by default, overrides per component
pub fn targets(cfg: &LogConfig) -> Targets {
    Target::ALL.iter().fold(
        Targets::new().with_default(level_filter(cfg.global)),
        |targets, target| targets.with_target(target.target(), level_filter(cfg.level_for(*target))),
    )
}

/// Install a global subscriber writing compact lines to stderr.
///
/// Does nothing if a subscriber is already installed.
pub fn init_logger(cfg: &LogConfig) {
    let layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(targets(cfg));
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

/// Initialize a simple logger for tests (captured by the test harness)
pub fn init_test_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .try_init();
}
