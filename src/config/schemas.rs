/// Configuration schemas - all config structures defined once with defaults
///
/// Each struct is defined using the config_struct! macro. Secrets are never
/// expected in the file; they come from the environment (see utils.rs).
use crate::config_struct;

/// Trending Solana pairs, ranked by 5-minute trending score, 40k-800k market cap
pub const DEFAULT_SCREENER_URL: &str = "https://dexscreener.com/?rankBy=trendingScoreM5&order=desc&chainIds=solana&minMarketCap=40000&maxMarketCap=800000";

// ============================================================================
// SCREENER (PAGE SOURCE)
// ============================================================================

config_struct! {
    /// Where the dashboard rows come from
    pub struct ScreenerConfig {
        /// Dashboard page listing the candidate pairs
        url: String = DEFAULT_SCREENER_URL.to_string(),
        /// Base used to resolve relative row links
        base_url: String = "https://dexscreener.com".to_string(),
        /// Rows inspected per run
        max_rows: usize = 100,
        request_timeout_secs: u64 = 60,
        user_agent: String = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36".to_string(),
        /// Read rows from a saved HTML page instead of fetching
        snapshot_path: Option<String> = None,
        scraperapi_endpoint: String = "https://api.scraperapi.com/".to_string(),
        /// Filled from SCRAPERAPI_API_KEY
        #[serde(skip_serializing)]
        scraperapi_api_key: Option<String> = None,
    }
}

// ============================================================================
// FILTERS
// ============================================================================

config_struct! {
    /// Fast mover predicate settings
    pub struct FiltersConfig {
        /// Pairs listed in hours pass up to this age (inclusive)
        max_pair_age_hours: f64 = 24.0,
    }
}

// ============================================================================
// DEDUP CACHE
// ============================================================================

config_struct! {
    /// Sent-token cache settings
    pub struct SentCacheConfig {
        /// File name inside the data directory
        file_name: String = "sent_tokens.json".to_string(),
        dedup_window_hours: f64 = 24.0,
    }
}

// ============================================================================
// TELEGRAM
// ============================================================================

config_struct! {
    /// Telegram Bot API delivery
    pub struct TelegramConfig {
        api_base_url: String = "https://api.telegram.org".to_string(),
        /// Filled from TELEGRAM_BOT_TOKEN
        #[serde(skip_serializing)]
        bot_token: String = String::new(),
        /// Filled from TELEGRAM_CHAT_ID
        chat_id: String = String::new(),
        /// Filled from TELEGRAM_ADMIN_ID; receives run failures
        admin_chat_id: Option<String> = None,
        request_timeout_secs: u64 = 15,
    }
}

// ============================================================================
// LOGGING
// ============================================================================

config_struct! {
    /// Log file rotation
    pub struct LoggingConfig {
        max_file_bytes: u64 = 1_000_000,
        max_backups: usize = 3,
    }
}

// ============================================================================
// ROOT
// ============================================================================

config_struct! {
    /// Complete FastMover configuration
    pub struct Config {
        screener: ScreenerConfig = ScreenerConfig::default(),
        filters: FiltersConfig = FiltersConfig::default(),
        cache: SentCacheConfig = SentCacheConfig::default(),
        telegram: TelegramConfig = TelegramConfig::default(),
        logging: LoggingConfig = LoggingConfig::default(),
    }
}
