/// Logger configuration derived from command-line switches
///
/// Recognized switches:
/// - `--debug-<tag>`   enable debug records for one tag (`--debug-all` for every tag)
/// - `--verbose`       enable verbose records everywhere
/// - `--verbose-<tag>` enable verbose records for one tag
/// - `--quiet`         raise the threshold to warnings, silencing debug and verbose too
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub debug_tags: HashSet<String>,
    pub verbose_tags: HashSet<String>,
    /// Empty set means every tag is enabled
    pub enabled_tags: HashSet<String>,
    pub debug_all: bool,
    pub verbose_all: bool,
    pub file_logging: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
            debug_all: false,
            verbose_all: false,
            file_logging: true,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Build the logger configuration from the process arguments
pub fn init_from_args() {
    set_logger_config(config_from_args(&arguments::get_cmd_args()));
}

fn config_from_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();
    let mut quiet = false;

    for arg in args {
        if arg == "--verbose" {
            config.verbose_all = true;
        } else if arg == "--quiet" {
            quiet = true;
        } else if arg == "--debug-all" {
            config.debug_all = true;
        } else if let Some(tag) = arg.strip_prefix("--debug-") {
            config.debug_tags.insert(tag.to_lowercase());
        } else if let Some(tag) = arg.strip_prefix("--verbose-") {
            config.verbose_tags.insert(tag.to_lowercase());
        }
    }

    // Threshold is checked before the per-tag gates
    config.min_level = if quiet {
        LogLevel::Warning
    } else if config.verbose_all || !config.verbose_tags.is_empty() {
        LogLevel::Verbose
    } else if config.debug_all || !config.debug_tags.is_empty() {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    config
}

pub fn get_logger_config() -> LoggerConfig {
    match LOGGER_CONFIG.read() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

pub fn set_logger_config(config: LoggerConfig) {
    match LOGGER_CONFIG.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    let config = get_logger_config();
    config.debug_all || config.debug_tags.contains(&tag.to_debug_key())
}

pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    get_logger_config()
        .verbose_tags
        .contains(&tag.to_debug_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_gives_defaults() {
        let config = config_from_args(&args(&["fastmover"]));
        assert_eq!(config.min_level, LogLevel::Info);
        assert!(config.debug_tags.is_empty());
        assert!(!config.debug_all);
    }

    #[test]
    fn test_debug_and_verbose_flags() {
        let config = config_from_args(&args(&[
            "fastmover",
            "--debug-Cache",
            "--verbose-screener",
            "--quiet",
        ]));
        assert!(config.debug_tags.contains("cache"));
        assert!(config.verbose_tags.contains("screener"));
        assert_eq!(config.min_level, LogLevel::Warning);
    }

    #[test]
    fn test_flags_raise_threshold() {
        let config = config_from_args(&args(&["fastmover", "--debug-cache"]));
        assert_eq!(config.min_level, LogLevel::Debug);

        let config = config_from_args(&args(&["fastmover", "--verbose-screener"]));
        assert_eq!(config.min_level, LogLevel::Verbose);
        assert!(!config.verbose_all);

        let config = config_from_args(&args(&["fastmover", "--verbose"]));
        assert_eq!(config.min_level, LogLevel::Verbose);
        assert!(config.verbose_all);
    }

    #[test]
    fn test_debug_all_flag() {
        let config = config_from_args(&args(&["fastmover", "--debug-all"]));
        assert!(config.debug_all);
        assert!(config.debug_tags.is_empty());
    }
}
