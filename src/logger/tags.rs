/// Log tags identify the subsystem a record comes from.
///
/// The debug key of a tag is what `--debug-<key>` / `--verbose-<key>` match against.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Screener,
    Filtering,
    Cache,
    Telegram,
    Scanner,
}

impl LogTag {
    /// Key used by --debug-<key> flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Screener => "screener".to_string(),
            LogTag::Filtering => "filtering".to_string(),
            LogTag::Cache => "cache".to_string(),
            LogTag::Telegram => "telegram".to_string(),
            LogTag::Scanner => "scanner".to_string(),
        }
    }

    /// Uncolored label written to the log file
    pub fn to_plain_string(&self) -> String {
        self.to_debug_key().to_uppercase()
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
