/// Core logging implementation with automatic filtering
///
/// Decides whether a record is emitted, then hands it to the format module.

use super::config::{get_logger_config, is_debug_enabled_for_tag, is_verbose_enabled_for_tag};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Check if a log message should be displayed
///
/// Filtering rules:
/// 1. Errors are always shown
/// 2. Check against minimum log level threshold
/// 3. Debug level requires --debug-<module> flag for that tag
/// 4. Verbose level requires --verbose flag OR --verbose-<module> flag for that tag
/// 5. If enabled_tags is non-empty, tag must be in the set
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    let config = get_logger_config();

    if level == LogLevel::Error {
        return true;
    }

    if level > config.min_level {
        return false;
    }

    if level == LogLevel::Debug {
        return is_debug_enabled_for_tag(tag);
    }

    if level == LogLevel::Verbose {
        return config.verbose_all || is_verbose_enabled_for_tag(tag);
    }

    if !config.enabled_tags.is_empty() && !config.enabled_tags.contains(&tag.to_debug_key()) {
        return false;
    }

    true
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(tag, level.as_str(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config::{set_logger_config, LoggerConfig};
    use std::collections::HashSet;

    // Single test so the process-wide logger config is not raced by parallel tests
    #[test]
    fn test_should_log_rules() {
        let mut config = LoggerConfig::default();
        config.min_level = LogLevel::Debug;
        config.debug_tags = HashSet::from(["cache".to_string()]);
        set_logger_config(config.clone());

        assert!(should_log(&LogTag::Scanner, LogLevel::Error));
        assert!(should_log(&LogTag::Scanner, LogLevel::Info));
        assert!(should_log(&LogTag::Cache, LogLevel::Debug));
        assert!(!should_log(&LogTag::Telegram, LogLevel::Debug));
        assert!(!should_log(&LogTag::Cache, LogLevel::Verbose));

        config.min_level = LogLevel::Verbose;
        config.verbose_tags = HashSet::from(["screener".to_string()]);
        set_logger_config(config.clone());
        assert!(should_log(&LogTag::Screener, LogLevel::Verbose));
        assert!(!should_log(&LogTag::Cache, LogLevel::Verbose));
        assert!(!should_log(&LogTag::Telegram, LogLevel::Debug));

        // --quiet wins over per-tag debug flags
        config.min_level = LogLevel::Warning;
        set_logger_config(config.clone());
        assert!(!should_log(&LogTag::Scanner, LogLevel::Info));
        assert!(should_log(&LogTag::Scanner, LogLevel::Warning));
        assert!(!should_log(&LogTag::Cache, LogLevel::Debug));
        assert!(!should_log(&LogTag::Screener, LogLevel::Verbose));

        set_logger_config(LoggerConfig::default());
    }
}
