//! Centralized path resolution for FastMover
//!
//! All file and directory paths are resolved through this module.
//!
//! ## Path Strategy
//!
//! `FASTMOVER_HOME` wins when set. Otherwise the platform data directory is used:
//! - **macOS**: `~/Library/Application Support/FastMover/`
//! - **Windows**: `%LOCALAPPDATA%\FastMover\`
//! - **Linux**: `$XDG_DATA_HOME/FastMover/` (fallback `~/.local/share/FastMover/`)
//!
//! ## Directory Structure
//!
//! ```text
//! FastMover/
//! ├── data/
//! │ ├── config.toml
//! │ └── sent_tokens.json
//! └── logs/
//!   └── fastmover.log (+ .1 .2 .3 backups)
//! ```

use once_cell::sync::Lazy;
use std::path::PathBuf;

/// Environment variable overriding the base directory
pub const HOME_ENV_VAR: &str = "FASTMOVER_HOME";

const APP_DIR: &str = "FastMover";

static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(resolve_base_directory);

fn resolve_base_directory() -> PathBuf {
  if let Ok(home) = std::env::var(HOME_ENV_VAR) {
    if !home.trim().is_empty() {
      return PathBuf::from(home);
    }
  }

  if let Some(dir) = dirs::data_local_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(dir) = dirs::data_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(home) = dirs::home_dir() {
    return home.join(APP_DIR);
  }

  PathBuf::from(APP_DIR)
}

// =============================================================================
// DIRECTORY ACCESSORS
// =============================================================================

/// Returns the base directory for all FastMover data
pub fn get_base_directory() -> PathBuf {
  BASE_DIRECTORY.clone()
}

/// Returns the data directory path (config and cache files)
pub fn get_data_directory() -> PathBuf {
  BASE_DIRECTORY.join("data")
}

/// Returns the logs directory path
pub fn get_logs_directory() -> PathBuf {
  BASE_DIRECTORY.join("logs")
}

// =============================================================================
// FILE PATHS
// =============================================================================

/// Returns the main configuration file path
pub fn get_config_path() -> PathBuf {
  get_data_directory().join("config.toml")
}

/// Returns the dedup cache path for a configured file name
pub fn get_sent_tokens_path(file_name: &str) -> PathBuf {
  get_data_directory().join(file_name)
}

/// Returns the active log file path
pub fn get_log_file_path() -> PathBuf {
  get_logs_directory().join("fastmover.log")
}

// =============================================================================
// DIRECTORY CREATION
// =============================================================================

/// Ensures all required directories exist
///
/// Must run before logger initialization since the log file lives in logs/.
pub fn ensure_all_directories() -> Result<(), String> {
  let dirs_to_create = vec![
    ("base", get_base_directory()),
    ("data", get_data_directory()),
    ("logs", get_logs_directory()),
  ];

  for (name, dir) in dirs_to_create {
    if !dir.exists() {
      std::fs::create_dir_all(&dir).map_err(|e| {
        format!(
          "Failed to create {} directory at {}: {}",
          name,
          dir.display(),
          e
        )
      })?;
    }
  }

  Ok(())
}
