use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};
use std::time::Duration;

use fastmover::{
    arguments::{
        get_config_path_override, is_dry_run_enabled, is_help_requested, is_init_config_enabled,
        print_help,
    },
    config::{self, Config},
    logger::{self, LogTag},
    notifications::{ErrorSeverity, Notification, Notifier, TelegramNotifier},
    paths,
    scanner::{ScanSettings, ScanSummary, Scanner},
    screener,
    sent_cache::SentTokenCache,
};

/// Main entry point for FastMover
///
/// One pass: load config, fetch the dashboard, alert on fast movers, exit.
/// Exit code 0 when the pass completes (even with per-row failures), 1 when
/// configuration or the page fetch fails.
#[tokio::main]
async fn main() {
    // Ensure all directories exist BEFORE logger initialization
    // (Logger needs logs directory to create log files)
    if let Err(e) = paths::ensure_all_directories() {
        eprintln!("❌ Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    logger::init();

    if is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    let config_path = get_config_path_override()
        .map(PathBuf::from)
        .unwrap_or_else(paths::get_config_path);

    if is_init_config_enabled() {
        let code = match write_default_config(&config_path) {
            Ok(()) => 0,
            Err(e) => {
                logger::error(LogTag::Config, &format!("❌ {:#}", e));
                1
            }
        };
        logger::flush();
        std::process::exit(code);
    }

    logger::info(LogTag::System, "🚀 FastMover starting up...");

    let config = match config::load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            logger::error(LogTag::Config, &format!("❌ {}", e));
            logger::flush();
            std::process::exit(1);
        }
    };

    logger::set_rotation_limits(config.logging.max_file_bytes, config.logging.max_backups);
    logger::debug(
        LogTag::Config,
        &format!("Configuration loaded from {}", config_path.display()),
    );

    match run(&config).await {
        Ok(summary) => {
            logger::info(LogTag::System, &format!("✅ Run finished: {}", summary));
            logger::flush();
        }
        Err(e) => {
            let message = format!("{:#}", e);
            logger::error(LogTag::System, &format!("❌ Application failed: {}", message));
            notify_admin(&config, &message).await;
            logger::flush();
            std::process::exit(1);
        }
    }
}

async fn run(config: &Config) -> anyhow::Result<ScanSummary> {
    config::validate_config(config)
        .map_err(|e| anyhow!(e))
        .context("Invalid configuration")?;

    let source =
        screener::source_from_config(&config.screener).context("Failed to set up page source")?;
    let notifier = TelegramNotifier::new(&config.telegram).context("Failed to set up Telegram")?;

    let window = Duration::try_from_secs_f64(config.cache.dedup_window_hours * 3600.0)
        .context("Invalid cache.dedup_window_hours")?;
    let cache = SentTokenCache::load(paths::get_sent_tokens_path(&config.cache.file_name), window);

    let dry_run = is_dry_run_enabled();
    if dry_run {
        logger::warning(
            LogTag::System,
            "Dry run: matches are logged, nothing is sent or recorded",
        );
    }

    let mut scanner = Scanner::new(
        source,
        Box::new(notifier),
        cache,
        ScanSettings::from_config(config, dry_run),
    );

    scanner.run_once().await.context("Scraping failed")
}

/// Best-effort failure report to the admin chat
async fn notify_admin(config: &Config, message: &str) {
    let admin = match TelegramNotifier::admin(&config.telegram) {
        Ok(Some(admin)) => admin,
        Ok(None) => return,
        Err(e) => {
            logger::warning(LogTag::Telegram, &format!("Admin notifier unavailable: {}", e));
            return;
        }
    };

    let notification = Notification::system_error(message.to_string(), ErrorSeverity::Error);
    if let Err(e) = admin.send(&notification).await {
        logger::warning(
            LogTag::Telegram,
            &format!("Failed to notify admin chat: {}", e),
        );
    }
}

/// Write the default configuration unless a file is already there
fn write_default_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        logger::info(
            LogTag::Config,
            &format!("Config file already exists at {}, leaving it untouched", path.display()),
        );
        return Ok(());
    }

    let contents = config::config_to_toml(&Config::default()).map_err(|e| anyhow!(e))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    logger::info(
        LogTag::Config,
        &format!("📝 Wrote default config to {}", path.display()),
    );
    Ok(())
}
