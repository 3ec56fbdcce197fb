//! Logger module
//!
//! Provides logging utilities for the development server including:
//! - Logger initialization from configuration
//! - Startup banner and shutdown notices
//! - Access logging with multiple formats

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use crate::error::Error;
use log::LevelFilter;
use std::net::SocketAddr;
use std::path::Path;

/// Environment variable holding an `env_logger` filter, applied over the configured level
pub const LOG_ENV: &str = "DEVSERVE_LOG";

/// Target used for access log lines so they can be filtered separately
pub const ACCESS_TARGET: &str = "access";

/// Target for the startup banner and shutdown notices, shown at info even
/// when the configured level is stricter
pub const LIFECYCLE_TARGET: &str = "devserve::lifecycle";

/// Initialize the global logger
///
/// Should be called once at application startup. `-v` forces debug and
/// `-vv` trace regardless of the configured level.
pub fn init(config: &LoggingConfig, verbose: u8) -> Result<(), Error> {
    builder(config, verbose).try_init()?;
    Ok(())
}

fn builder(config: &LoggingConfig, verbose: u8) -> env_logger::Builder {
    let level = level_filter(&config.level, verbose);
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .filter_module(LIFECYCLE_TARGET, level.max(LevelFilter::Info))
        .parse_env(LOG_ENV);
    builder
}

fn level_filter(level: &str, verbose: u8) -> LevelFilter {
    match verbose {
        0 => level.parse().unwrap_or(LevelFilter::Info),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn log_server_start(addr: &SocketAddr, root: &Path, config: &Config) {
    let port = addr.port();
    log::info!(target: LIFECYCLE_TARGET, "==================================================");
    log::info!(target: LIFECYCLE_TARGET, "  devserve - development file server");
    log::info!(target: LIFECYCLE_TARGET, "==================================================");
    log::info!(target: LIFECYCLE_TARGET, "Serving {} on {addr}", root.display());
    log::info!(target: LIFECYCLE_TARGET, "Server running at:");
    log::info!(target: LIFECYCLE_TARGET, "  http://localhost:{port}");
    log::info!(target: LIFECYCLE_TARGET, "  http://127.0.0.1:{port}");
    if let Some(workers) = config.server.workers {
        log::info!(target: LIFECYCLE_TARGET, "Worker threads: {workers}");
    }
    if config.logging.access_log {
        log::info!(target: LIFECYCLE_TARGET, "Access log format: {}", config.logging.access_log_format);
    }
    log::info!(target: LIFECYCLE_TARGET, "Press Ctrl+C to stop the server");
    log::info!(target: LIFECYCLE_TARGET, "==================================================");
}

pub fn log_shutdown_requested(signal: &str) {
    log::info!(target: LIFECYCLE_TARGET, "Shutdown requested ({signal})");
}

pub fn log_server_stopped() {
    log::info!(target: LIFECYCLE_TARGET, "Server stopped.");
}

pub fn log_connection_error(err: &hyper::Error) {
    if err.is_incomplete_message() {
        log::debug!("Connection closed mid-request: {err}");
    } else {
        log::error!("Failed to serve connection: {err}");
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    log::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter("warn", 0), LevelFilter::Warn);
        assert_eq!(level_filter("bogus", 0), LevelFilter::Info);
        assert_eq!(level_filter("warn", 1), LevelFilter::Debug);
        assert_eq!(level_filter("error", 3), LevelFilter::Trace);
    }

    #[test]
    fn test_lifecycle_survives_strict_level() {
        use log::{Level, Log, Metadata};

        let config = LoggingConfig {
            level: "warn".to_string(),
            ..LoggingConfig::default()
        };
        let logger = builder(&config, 0).build();
        let info_for = |target| Metadata::builder().level(Level::Info).target(target).build();

        assert!(logger.enabled(&info_for(LIFECYCLE_TARGET)));
        assert!(!logger.enabled(&info_for("devserve::handler::static_files")));
        assert!(!logger.enabled(&info_for(ACCESS_TARGET)));
    }

    #[test]
    fn test_lifecycle_follows_verbose_level() {
        use log::{Level, Log, Metadata};

        let logger = builder(&LoggingConfig::default(), 2).build();
        let trace = Metadata::builder()
            .level(Level::Trace)
            .target(LIFECYCLE_TARGET)
            .build();
        assert!(logger.enabled(&trace));
    }
}
