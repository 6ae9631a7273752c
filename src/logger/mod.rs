//! Structured logging system for FastMover
//!
//! This module provides a small, ergonomic logging API with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Dual output: colored console + rotating log file
//!
//! ## Usage
//!
//! ```ignore
//! use fastmover::logger::{self, LogTag};
//!
//! logger::error(LogTag::Telegram, "Delivery failed");
//! logger::warning(LogTag::Cache, "Cache file corrupt, starting empty");
//! logger::info(LogTag::Scanner, "Scan finished");
//! logger::debug(LogTag::Filtering, "Price changes: ..."); // Only if --debug-filtering
//! logger::verbose(LogTag::Screener, "Raw row: ...");      // Only if --verbose
//! ```
//!
//! ## Initialization
//!
//! Call once at startup, after `paths::ensure_all_directories()`:
//! ```ignore
//! logger::init();
//! ```

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, init_from_args, set_logger_config, LoggerConfig};
pub use file::{set_rotation_limits, RotatingFile};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// This must be called once at application startup, before any logging occurs.
/// It will:
/// 1. Parse command-line arguments for debug flags
/// 2. Configure per-module debug modes
/// 3. Open the rotating log file under the logs directory
pub fn init() {
    config::init_from_args();
    file::init_file_logging();
}

/// Log at ERROR level (always shown, critical issues)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (important issues)
///
/// Warnings are always shown, including with --quiet.
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
///
/// Hidden when --quiet is passed.
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level (detailed diagnostics)
///
/// Debug logs are ONLY shown when the --debug-<module> flag for the tag is provided.
///
/// # Example
/// ```ignore
/// // Only shown with --debug-cache flag
/// logger::debug(LogTag::Cache, "Loaded 12 entries");
/// ```
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (very detailed tracing)
///
/// Only shown when --verbose or --verbose-<module> is provided.
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush all pending log writes
///
/// Call this during shutdown to ensure all logs are written to disk.
pub fn flush() {
    file::flush_file_logging();
}
