// sent_cache.rs - Dedup cache of tokens already alerted
//
// Maps token address -> last alert time (seconds since the Unix epoch, may be
// fractional). Entries older than the dedup window are pruned on load and are
// treated as absent on lookup.
use chrono::Utc;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::FastMoverResult;
use crate::logger::{self, LogTag};

/// Default suppression window for a token that was already alerted
pub const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_secs(24 * 3600);

/// Current time in epoch seconds with millisecond precision
pub fn now_secs() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Sent-token cache persisted as a flat JSON object
#[derive(Debug, Clone)]
pub struct SentTokenCache {
    path: PathBuf,
    entries: HashMap<String, f64>,
    window_secs: f64,
}

impl SentTokenCache {
    /// Empty cache bound to `path` (nothing is read)
    pub fn new(path: impl Into<PathBuf>, window: Duration) -> Self {
        Self {
            path: path.into(),
            entries: HashMap::new(),
            window_secs: window.as_secs_f64(),
        }
    }

    /// Load the cache from disk, pruning expired entries
    ///
    /// A missing or unreadable file yields an empty cache.
    pub fn load(path: impl Into<PathBuf>, window: Duration) -> Self {
        Self::load_at(path, window, now_secs())
    }

    /// Same as `load` with an explicit clock
    pub fn load_at(path: impl Into<PathBuf>, window: Duration, now: f64) -> Self {
        let mut cache = Self::new(path, window);

        if !cache.path.exists() {
            logger::debug(
                LogTag::Cache,
                &format!("Cache file {} not found, starting empty", cache.path.display()),
            );
            return cache;
        }

        match Self::read_entries(&cache.path) {
            Ok(entries) => {
                cache.entries = entries;
                let removed = cache.prune(now);
                logger::debug(
                    LogTag::Cache,
                    &format!(
                        "Loaded {} cached tokens from {} (pruned {} expired)",
                        cache.entries.len(),
                        cache.path.display(),
                        removed
                    ),
                );
            }
            Err(e) => {
                logger::error(
                    LogTag::Cache,
                    &format!(
                        "Error loading cache from {}: {} - starting empty",
                        cache.path.display(),
                        e
                    ),
                );
            }
        }

        cache
    }

    fn read_entries(path: &Path) -> FastMoverResult<HashMap<String, f64>> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Drop entries whose age is at least the window; returns how many were removed
    fn prune(&mut self, now: f64) -> usize {
        let before = self.entries.len();
        let window = self.window_secs;
        self.entries.retain(|_, sent_at| now - *sent_at < window);
        before - self.entries.len()
    }

    /// True iff `token` was alerted less than one window ago
    pub fn was_recently_sent(&self, token: &str) -> bool {
        self.was_recently_sent_at(token, now_secs())
    }

    pub fn was_recently_sent_at(&self, token: &str, now: f64) -> bool {
        match self.entries.get(token) {
            Some(sent_at) => now - *sent_at < self.window_secs,
            None => false,
        }
    }

    /// Record `token` as alerted now and persist the whole cache
    ///
    /// The in-memory entry is kept even when the write fails.
    pub fn mark_sent(&mut self, token: &str) -> FastMoverResult<()> {
        self.mark_sent_at(token, now_secs())
    }

    pub fn mark_sent_at(&mut self, token: &str, now: f64) -> FastMoverResult<()> {
        self.entries.insert(token.to_string(), now);
        self.save()
    }

    /// Write the cache to disk (temp file + rename)
    pub fn save(&self) -> FastMoverResult<()> {
        logger::debug(
            LogTag::Cache,
            &format!("Saving {} entries to {}", self.entries.len(), self.path.display()),
        );

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_string(&self.entries)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, data)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Timestamp of the last alert for `token`, expired or not
    pub fn last_sent(&self, token: &str) -> Option<f64> {
        self.entries.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: f64 = 1_700_000_000.0;
    const DAY: f64 = 86_400.0;

    fn cache_in(dir: &tempfile::TempDir) -> SentTokenCache {
        SentTokenCache::new(dir.path().join("sent_tokens.json"), DEFAULT_DEDUP_WINDOW)
    }

    #[test]
    fn test_recent_entry_within_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = cache_in(&dir);
        cache.mark_sent_at("tokenA", NOW - DAY + 0.5).unwrap();

        assert!(cache.was_recently_sent_at("tokenA", NOW));
        assert!(cache.was_recently_sent_at("tokenA", NOW - DAY + 1.0));
    }

    #[test]
    fn test_entry_expires_at_exactly_one_day() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = cache_in(&dir);
        cache.mark_sent_at("tokenA", NOW - DAY).unwrap();

        assert!(!cache.was_recently_sent_at("tokenA", NOW));
        assert!(!cache.was_recently_sent_at("tokenA", NOW + 10.0));
    }

    #[test]
    fn test_unknown_token_is_not_recent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(&dir);
        assert!(!cache.was_recently_sent_at("never-seen", NOW));
    }

    #[test]
    fn test_mark_then_check_with_real_clock() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = cache_in(&dir);
        cache.mark_sent("tokenB").unwrap();
        assert!(cache.was_recently_sent("tokenB"));
    }

    #[test]
    fn test_mark_sent_persists_whole_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = cache_in(&dir);
        cache.mark_sent_at("tokenA", NOW - 10.0).unwrap();
        cache.mark_sent_at("tokenB", NOW).unwrap();

        let data = fs::read_to_string(cache.path()).unwrap();
        let stored: HashMap<String, f64> = serde_json::from_str(&data).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored["tokenA"], NOW - 10.0);
        assert_eq!(stored["tokenB"], NOW);
        assert!(!dir.path().join("sent_tokens.json.tmp").exists());
    }

    #[test]
    fn test_load_prunes_exactly_expired_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sent_tokens.json");
        let stored = serde_json::json!({
            "fresh": NOW - 60.0,
            "almost": NOW - DAY + 1.0,
            "boundary": NOW - DAY,
            "stale": NOW - 3.0 * DAY,
        });
        fs::write(&path, stored.to_string()).unwrap();

        let cache = SentTokenCache::load_at(&path, DEFAULT_DEDUP_WINDOW, NOW);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.last_sent("fresh"), Some(NOW - 60.0));
        assert_eq!(cache.last_sent("almost"), Some(NOW - DAY + 1.0));
        assert_eq!(cache.last_sent("boundary"), None);
        assert_eq!(cache.last_sent("stale"), None);
    }

    #[test]
    fn test_load_accepts_integer_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sent_tokens.json");
        fs::write(&path, format!("{{\"tokenA\": {}}}", NOW as i64)).unwrap();

        let cache = SentTokenCache::load_at(&path, DEFAULT_DEDUP_WINDOW, NOW + 5.0);
        assert!(cache.was_recently_sent_at("tokenA", NOW + 5.0));
    }

    #[test]
    fn test_missing_file_gives_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache =
            SentTokenCache::load_at(dir.path().join("absent.json"), DEFAULT_DEDUP_WINDOW, NOW);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_corrupt_file_gives_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sent_tokens.json");
        fs::write(&path, "{ not json").unwrap();

        let mut cache = SentTokenCache::load_at(&path, DEFAULT_DEDUP_WINDOW, NOW);
        assert!(cache.is_empty());

        // The next write replaces the corrupt file
        cache.mark_sent_at("tokenA", NOW).unwrap();
        let reloaded = SentTokenCache::load_at(&path, DEFAULT_DEDUP_WINDOW, NOW);
        assert!(reloaded.was_recently_sent_at("tokenA", NOW));
    }

    #[test]
    fn test_wrong_shape_gives_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sent_tokens.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let cache = SentTokenCache::load_at(&path, DEFAULT_DEDUP_WINDOW, NOW);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("sent.json");
        let mut cache = SentTokenCache::new(&path, DEFAULT_DEDUP_WINDOW);
        cache.mark_sent_at("tokenA", NOW).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_write_keeps_entry_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("sent_tokens.json");
        fs::create_dir_all(path.join("occupied")).unwrap();

        let mut cache = SentTokenCache::new(&path, DEFAULT_DEDUP_WINDOW);
        assert!(cache.mark_sent_at("tokenA", NOW).is_err());
        assert!(cache.was_recently_sent_at("tokenA", NOW));
    }

    #[test]
    fn test_custom_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache =
            SentTokenCache::new(dir.path().join("c.json"), Duration::from_secs(3600));
        cache.mark_sent_at("tokenA", NOW).unwrap();

        assert!(cache.was_recently_sent_at("tokenA", NOW + 3599.0));
        assert!(!cache.was_recently_sent_at("tokenA", NOW + 3600.0));
    }
}
