/// One scan of the dashboard
///
/// fetch rows -> build record -> dedup check -> filters -> notify -> mark sent
///
/// Rows are handled strictly in page order, one at a time. A row-level
/// problem (no address, failed delivery, failed cache write) is logged and
/// the scan moves on; only a failed page fetch ends the run with an error.
/// A token is marked as sent only after the notifier confirms delivery.
use std::collections::BTreeMap;

use crate::coin::CoinRecord;
use crate::config::Config;
use crate::errors::{FastMoverError, FastMoverResult};
use crate::filtering;
use crate::logger::{self, LogTag};
use crate::notifications::{Notification, Notifier};
use crate::screener::RowSource;
use crate::sent_cache::SentTokenCache;

/// Per-run knobs taken from the configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    pub max_rows: usize,
    pub max_pair_age_hours: f64,
    /// Base for resolving relative row links
    pub base_url: String,
    /// Log matches without sending or recording them
    pub dry_run: bool,
}

impl ScanSettings {
    pub fn from_config(config: &Config, dry_run: bool) -> Self {
        Self {
            max_rows: config.screener.max_rows,
            max_pair_age_hours: config.filters.max_pair_age_hours,
            base_url: config.screener.base_url.clone(),
            dry_run,
        }
    }
}

/// Counters for one scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSummary {
    pub rows_found: usize,
    pub rows_inspected: usize,
    pub missing_address: usize,
    pub recently_sent: usize,
    pub matched: usize,
    pub sent: usize,
    pub send_failures: usize,
    pub cache_write_failures: usize,
    pub rejection_counts: BTreeMap<&'static str, usize>,
}

impl ScanSummary {
    fn record_rejection(&mut self, rejection: &filtering::Rejection) {
        *self.rejection_counts.entry(rejection.as_str()).or_insert(0) += 1;
    }

    pub fn rejected(&self) -> usize {
        self.rejection_counts.values().sum()
    }
}

impl std::fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "inspected {}/{} rows, matched {}, sent {}, recently sent {}, rejected {}, \
             no address {}, send failures {}, cache write failures {}",
            self.rows_inspected,
            self.rows_found,
            self.matched,
            self.sent,
            self.recently_sent,
            self.rejected(),
            self.missing_address,
            self.send_failures,
            self.cache_write_failures
        )
    }
}

pub struct Scanner {
    source: Box<dyn RowSource>,
    notifier: Box<dyn Notifier>,
    cache: SentTokenCache,
    settings: ScanSettings,
}

impl Scanner {
    pub fn new(
        source: Box<dyn RowSource>,
        notifier: Box<dyn Notifier>,
        cache: SentTokenCache,
        settings: ScanSettings,
    ) -> Self {
        Self {
            source,
            notifier,
            cache,
            settings,
        }
    }

    pub fn cache(&self) -> &SentTokenCache {
        &self.cache
    }

    /// Run a single pass over the dashboard
    pub async fn run_once(&mut self) -> FastMoverResult<ScanSummary> {
        logger::info(
            LogTag::Scanner,
            &format!(
                "Starting scan (source: {}, cached tokens: {}{})",
                self.source.name(),
                self.cache.len(),
                if self.settings.dry_run { ", dry run" } else { "" }
            ),
        );

        let rows = self.source.fetch_rows().await?;
        if rows.is_empty() {
            return Err(FastMoverError::PageParse(
                "no dashboard rows found (page blocked or markup changed)".to_string(),
            ));
        }

        let mut summary = ScanSummary {
            rows_found: rows.len(),
            ..Default::default()
        };

        for (index, row) in rows.iter().take(self.settings.max_rows).enumerate() {
            summary.rows_inspected += 1;
            let record = CoinRecord::from_row(row);
            self.process_record(index + 1, &record, &mut summary).await;
        }

        logger::info(LogTag::Scanner, &format!("Scan complete: {}", summary));
        Ok(summary)
    }

    async fn process_record(
        &mut self,
        position: usize,
        record: &CoinRecord,
        summary: &mut ScanSummary,
    ) {
        let symbol = record.display_symbol();

        let address = match record.token_address() {
            Some(address) => address,
            None => {
                summary.missing_address += 1;
                logger::warning(
                    LogTag::Scanner,
                    &format!("Row {} ({}) has no token link, skipping", position, symbol),
                );
                return;
            }
        };

        if self.cache.was_recently_sent(&address) {
            summary.recently_sent += 1;
            logger::debug(
                LogTag::Cache,
                &format!("{} ({}) already alerted within window", symbol, address),
            );
            return;
        }

        if let Err(rejection) = filtering::evaluate(record, self.settings.max_pair_age_hours) {
            summary.record_rejection(&rejection);
            logger::debug(
                LogTag::Filtering,
                &format!("{} ({}) rejected: {}", symbol, address, rejection),
            );
            return;
        }

        summary.matched += 1;

        if self.settings.dry_run {
            logger::info(
                LogTag::Scanner,
                &format!(
                    "[DRY RUN] Would alert {} ({}) age={} mcap={}",
                    symbol,
                    address,
                    record.pair_age.as_deref().unwrap_or("N/A"),
                    record.market_cap.as_deref().unwrap_or("N/A")
                ),
            );
            return;
        }

        logger::info(
            LogTag::Telegram,
            &format!("Preparing to send Telegram message for token {} ({})", symbol, address),
        );

        let notification = Notification::fast_mover(record, &address, &self.settings.base_url);
        match self.notifier.send(&notification).await {
            Ok(()) => {
                summary.sent += 1;
                logger::info(
                    LogTag::Telegram,
                    &format!("Successfully sent Telegram message for {}", symbol),
                );

                if let Err(e) = self.cache.mark_sent(&address) {
                    summary.cache_write_failures += 1;
                    logger::error(
                        LogTag::Cache,
                        &format!(
                            "Error saving cache to {}: {}",
                            self.cache.path().display(),
                            e
                        ),
                    );
                }
            }
            Err(e) => {
                summary.send_failures += 1;
                logger::error(
                    LogTag::Telegram,
                    &format!("Failed to send Telegram message for {}: {}", symbol, e),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screener::ScrapedRow;
    use crate::sent_cache::{now_secs, DEFAULT_DEDUP_WINDOW};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    struct FakeSource {
        rows: Vec<ScrapedRow>,
    }

    #[async_trait]
    impl RowSource for FakeSource {
        fn name(&self) -> &str {
            "fake"
        }

        async fn fetch_rows(&self) -> FastMoverResult<Vec<ScrapedRow>> {
            Ok(self.rows.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl RowSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch_rows(&self) -> FastMoverResult<Vec<ScrapedRow>> {
            Err(FastMoverError::HttpStatus {
                endpoint: "https://dexscreener.com".to_string(),
                status: 403,
            })
        }
    }

    /// Records every message; fails when `fail` is set
    #[derive(Clone, Default)]
    struct FakeNotifier {
        sent: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn send(&self, notification: &Notification) -> FastMoverResult<()> {
            if self.fail {
                return Err(FastMoverError::Telegram {
                    description: "Bad Request: chat not found".to_string(),
                });
            }
            self.sent.lock().unwrap().push(notification.format_html());
            Ok(())
        }
    }

    fn row(address: &str, changes: [&str; 4], age: &str) -> ScrapedRow {
        let mut fields = HashMap::new();
        fields.insert("token-symbol".to_string(), format!("SYM{}", &address[..3]));
        fields.insert("price-change-m5".to_string(), changes[0].to_string());
        fields.insert("price-change-h1".to_string(), changes[1].to_string());
        fields.insert("price-change-h6".to_string(), changes[2].to_string());
        fields.insert("price-change-h24".to_string(), changes[3].to_string());
        fields.insert("pair-age".to_string(), age.to_string());
        fields.insert("market-cap".to_string(), "$300K".to_string());
        fields.insert("volume".to_string(), "$90K".to_string());
        ScrapedRow {
            href: Some(format!("/solana/{}", address)),
            fields,
        }
    }

    const UP: [&str; 4] = ["1.2%", "0.5%", "3%", "10%"];

    fn settings(dry_run: bool) -> ScanSettings {
        ScanSettings::from_config(&Config::default(), dry_run)
    }

    fn scanner(
        rows: Vec<ScrapedRow>,
        notifier: FakeNotifier,
        cache_path: &std::path::Path,
        dry_run: bool,
    ) -> Scanner {
        Scanner::new(
            Box::new(FakeSource { rows }),
            Box::new(notifier),
            SentTokenCache::load(cache_path, DEFAULT_DEDUP_WINDOW),
            settings(dry_run),
        )
    }

    #[tokio::test]
    async fn test_match_is_sent_once_and_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("sent_tokens.json");
        let notifier = FakeNotifier::default();

        let rows = vec![row("freshAddr", UP, "10m")];
        let mut first = scanner(rows.clone(), notifier.clone(), &cache_path, false);
        let summary = first.run_once().await.unwrap();

        assert_eq!(summary.sent, 1);
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
        assert!(notifier.sent.lock().unwrap()[0]
            .contains("href=\"https://dexscreener.com/solana/freshAddr\">freshAddr</a>"));

        let stored: HashMap<String, f64> =
            serde_json::from_str(&std::fs::read_to_string(&cache_path).unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored.contains_key("freshAddr"));

        // A second run within the window loads the cache and stays quiet
        let mut second = scanner(rows, notifier.clone(), &cache_path, false);
        let summary = second.run_once().await.unwrap();
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.recently_sent, 1);
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_alerts_again() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("sent_tokens.json");
        let stale = now_secs() - 86_400.0 - 5.0;
        std::fs::write(&cache_path, format!("{{\"freshAddr\": {}}}", stale)).unwrap();

        let notifier = FakeNotifier::default();
        let mut scan = scanner(vec![row("freshAddr", UP, "2h")], notifier.clone(), &cache_path, false);
        let summary = scan.run_once().await.unwrap();

        assert_eq!(summary.sent, 1);
        assert!(scan.cache().last_sent("freshAddr").unwrap() > stale);
    }

    #[tokio::test]
    async fn test_filters_decide_what_is_sent() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = FakeNotifier::default();
        let rows = vec![
            row("goodOne", UP, "10m"),
            row("negOne", ["1%", "-0.1%", "2%", "3%"], "10m"),
            row("oldOne", UP, "3d"),
            row("bigHrs", UP, "25h"),
            row("dashOne", ["-", "1%", "2%", "3%"], "5m"),
            row("okHours", UP, "24h"),
        ];

        let mut scan = scanner(rows, notifier.clone(), &dir.path().join("c.json"), false);
        let summary = scan.run_once().await.unwrap();

        assert_eq!(summary.rows_inspected, 6);
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.sent, 2);
        assert_eq!(summary.rejected(), 4);
        assert_eq!(summary.rejection_counts.get("pair_too_old"), Some(&2));
        assert_eq!(summary.rejection_counts.get("price_change_not_positive"), Some(&1));
        assert_eq!(summary.rejection_counts.get("price_change_unparsable"), Some(&1));

        let sent = notifier.sent.lock().unwrap();
        assert!(sent[0].contains(">goodOne</a>"));
        assert!(sent[1].contains(">okHours</a>"));
    }

    #[tokio::test]
    async fn test_failed_delivery_is_not_marked() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("sent_tokens.json");
        let failing = FakeNotifier {
            fail: true,
            ..Default::default()
        };

        let rows = vec![row("retryMe", UP, "10m")];
        let mut scan = scanner(rows.clone(), failing, &cache_path, false);
        let summary = scan.run_once().await.unwrap();

        assert_eq!(summary.send_failures, 1);
        assert_eq!(summary.sent, 0);
        assert!(!scan.cache().was_recently_sent("retryMe"));
        assert!(!cache_path.exists());

        // Next run retries and succeeds
        let notifier = FakeNotifier::default();
        let mut retry = scanner(rows, notifier.clone(), &cache_path, false);
        assert_eq!(retry.run_once().await.unwrap().sent, 1);
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_sends_and_records_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("sent_tokens.json");
        let notifier = FakeNotifier::default();

        let mut scan = scanner(vec![row("dryOne", UP, "10m")], notifier.clone(), &cache_path, true);
        let summary = scan.run_once().await.unwrap();

        assert_eq!(summary.matched, 1);
        assert_eq!(summary.sent, 0);
        assert!(notifier.sent.lock().unwrap().is_empty());
        assert!(!cache_path.exists());
    }

    #[tokio::test]
    async fn test_row_without_link_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = FakeNotifier::default();
        let mut orphan = row("orphan", UP, "10m");
        orphan.href = None;

        let mut scan = scanner(
            vec![orphan, row("linked", UP, "10m")],
            notifier.clone(),
            &dir.path().join("c.json"),
            false,
        );
        let summary = scan.run_once().await.unwrap();

        assert_eq!(summary.missing_address, 1);
        assert_eq!(summary.sent, 1);
    }

    #[tokio::test]
    async fn test_duplicate_rows_alert_once() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = FakeNotifier::default();
        let rows = vec![row("twice", UP, "10m"), row("twice", UP, "10m")];

        let mut scan = scanner(rows, notifier.clone(), &dir.path().join("c.json"), false);
        let summary = scan.run_once().await.unwrap();

        assert_eq!(summary.sent, 1);
        assert_eq!(summary.recently_sent, 1);
    }

    #[tokio::test]
    async fn test_max_rows_limits_inspection() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = FakeNotifier::default();
        let rows = vec![row("first", UP, "1m"), row("second", UP, "1m"), row("third", UP, "1m")];

        let mut scan = Scanner::new(
            Box::new(FakeSource { rows }),
            Box::new(notifier.clone()),
            SentTokenCache::new(dir.path().join("c.json"), DEFAULT_DEDUP_WINDOW),
            ScanSettings {
                max_rows: 2,
                ..settings(false)
            },
        );
        let summary = scan.run_once().await.unwrap();

        assert_eq!(summary.rows_found, 3);
        assert_eq!(summary.rows_inspected, 2);
        assert_eq!(summary.sent, 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut scan = Scanner::new(
            Box::new(FailingSource),
            Box::new(FakeNotifier::default()),
            SentTokenCache::new(dir.path().join("c.json"), DEFAULT_DEDUP_WINDOW),
            settings(false),
        );
        assert!(matches!(
            scan.run_once().await,
            Err(FastMoverError::HttpStatus { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_page_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut scan = scanner(Vec::new(), FakeNotifier::default(), &dir.path().join("c.json"), false);
        assert!(matches!(scan.run_once().await, Err(FastMoverError::PageParse(_))));
    }

    #[test]
    fn test_summary_line_reports_cache_write_failures() {
        let mut summary = ScanSummary {
            rows_found: 40,
            rows_inspected: 40,
            matched: 2,
            sent: 2,
            cache_write_failures: 1,
            ..Default::default()
        };
        summary.record_rejection(&filtering::Rejection::MalformedPairAge(None));

        let line = summary.to_string();
        assert!(line.starts_with("inspected 40/40 rows, matched 2, sent 2"));
        assert!(line.contains("rejected 1"));
        assert!(line.ends_with("cache write failures 1"));
    }
}
