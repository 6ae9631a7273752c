//! Configuration system
//!
//! - `macros`: the `config_struct!` macro
//! - `schemas`: every section with its defaults
//! - `utils`: loading, environment overlay, validation

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{
    Config, FiltersConfig, LoggingConfig, ScreenerConfig, SentCacheConfig, TelegramConfig,
    DEFAULT_SCREENER_URL,
};
pub use utils::{
    apply_env_overrides, config_to_toml, load_config, load_config_from_path, validate_config,
};
