//! Configuration utilities - loading, environment overlay and validation
//!
//! Load order:
//! 1. `.env` in the working directory (if present) is merged into the environment
//! 2. `config.toml` (if present) or schema defaults
//! 3. Secrets and chat ids from environment variables

use super::schemas::Config;
use std::path::Path;

pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_ADMIN_ID: &str = "TELEGRAM_ADMIN_ID";
pub const ENV_SCRAPERAPI_KEY: &str = "SCRAPERAPI_API_KEY";

/// Load the full configuration: file (or defaults) plus environment overlay
///
/// # Returns
/// - `Ok(Config)` - Configuration ready for use
/// - `Err(String)` - The file exists but could not be read or parsed
pub fn load_config(path: &Path) -> Result<Config, String> {
    dotenv::dotenv().ok();

    let mut config = load_config_from_path(path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Load configuration from a specific TOML file, falling back to defaults
/// when the file does not exist
pub fn load_config_from_path(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

    toml::from_str::<Config>(&contents)
        .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))
}

/// Overlay environment values on top of file values
///
/// Empty variables count as unset.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(token) = get(ENV_BOT_TOKEN) {
        config.telegram.bot_token = token;
    }
    if let Some(chat_id) = get(ENV_CHAT_ID) {
        config.telegram.chat_id = chat_id;
    }
    if let Some(admin_id) = get(ENV_ADMIN_ID) {
        config.telegram.admin_chat_id = Some(admin_id);
    }
    if let Some(key) = get(ENV_SCRAPERAPI_KEY) {
        config.screener.scraperapi_api_key = Some(key);
    }
}

/// Check the values a live run depends on
pub fn validate_config(config: &Config) -> Result<(), String> {
    if config.telegram.bot_token.is_empty() {
        return Err(format!("{} is not set", ENV_BOT_TOKEN));
    }
    if config.telegram.chat_id.is_empty() {
        return Err(format!("{} is not set", ENV_CHAT_ID));
    }
    if config.screener.max_rows == 0 {
        return Err("screener.max_rows must be greater than zero".to_string());
    }
    if !(config.cache.dedup_window_hours > 0.0) {
        return Err("cache.dedup_window_hours must be positive".to_string());
    }
    if !(config.filters.max_pair_age_hours >= 0.0) {
        return Err("filters.max_pair_age_hours must not be negative".to_string());
    }
    Ok(())
}

/// Serialize a configuration for writing a starter config.toml
pub fn config_to_toml(config: &Config) -> Result<String, String> {
    toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))
}
