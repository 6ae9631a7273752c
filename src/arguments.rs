/// Centralized argument handling for FastMover
///
/// The scanner needs no arguments; every flag here is an optional switch.
/// Logger switches (`--debug-<tag>`, `--verbose`, `--quiet`) are read by the
/// logger config, the rest are exposed as helpers below.
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    contains_arg(&get_cmd_args(), arg)
}

/// Gets the value of a command-line argument that follows a flag
pub fn get_arg_value(flag: &str) -> Option<String> {
    value_after(&get_cmd_args(), flag)
}

fn contains_arg(args: &[String], arg: &str) -> bool {
    args.iter().any(|a| a == arg)
}

fn value_after(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

// =============================================================================
// MODE FLAGS
// =============================================================================

/// Dry-run mode - filters and logs matches without sending or recording them
pub fn is_dry_run_enabled() -> bool {
    has_arg("--dry-run")
}

pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

/// Optional path to a config file overriding `<base>/data/config.toml`
pub fn get_config_path_override() -> Option<String> {
    get_arg_value("--config")
}

/// Write a starter config.toml with every default and exit
pub fn is_init_config_enabled() -> bool {
    has_arg("--init-config")
}

/// Displays the help menu with all available flags and their descriptions
pub fn print_help() {
    println!("FastMover - DexScreener fast mover alerts for Telegram");
    println!();
    println!("USAGE:");
    println!("    fastmover [FLAGS]");
    println!();
    println!("Runs one scan of the dashboard and exits. No flags are required.");
    println!();
    println!("FLAGS:");
    println!("    --dry-run                 Log matching tokens without sending or recording them");
    println!("    --config <PATH>           Read configuration from PATH");
    println!("    --init-config             Write a default config file (if none exists) and exit");
    println!("    --help, -h                Show this help message");
    println!();
    println!("LOGGING FLAGS:");
    println!("    --debug-<module>          Debug logs for one module");
    println!("                              (system, config, screener, filtering, cache, telegram, scanner)");
    println!("    --debug-all               Debug logs for every module");
    println!("    --verbose                 Verbose logs everywhere");
    println!("    --quiet                   Only warnings and errors");
    println!();
    println!("ENVIRONMENT:");
    println!("    TELEGRAM_BOT_TOKEN        Bot token (required)");
    println!("    TELEGRAM_CHAT_ID          Chat receiving alerts (required)");
    println!("    TELEGRAM_ADMIN_ID         Chat receiving run failures (optional)");
    println!("    SCRAPERAPI_API_KEY        Fetch the page through ScraperAPI (optional)");
    println!("    FASTMOVER_HOME            Base directory for data and logs (optional)");
}
