//! Dashboard row sources
//!
//! A run asks one `RowSource` for the rendered dashboard and gets back the
//! rows in page order. Sources differ only in how the HTML is obtained:
//! - `HttpRowSource`: live fetch, optionally through a rendering proxy
//! - `SnapshotRowSource`: a saved copy of the page on disk
//!
//! Both hand the HTML to `page::parse_rows`.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::config::ScreenerConfig;
use crate::errors::FastMoverResult;

pub mod http;
pub mod page;
pub mod snapshot;

pub use http::HttpRowSource;
pub use page::{parse_rows, ROW_SELECTOR};
pub use snapshot::SnapshotRowSource;

/// One dashboard row: its link plus the text of each labelled column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapedRow {
    /// Value of the row anchor's `href`
    pub href: Option<String>,
    /// Column label (e.g. `price-change-m5`) -> trimmed display text
    pub fields: HashMap<String, String>,
}

impl ScrapedRow {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Standard interface for anything that yields dashboard rows
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Short name for log lines
    fn name(&self) -> &str;

    /// Fetch the page and return its rows in display order
    async fn fetch_rows(&self) -> FastMoverResult<Vec<ScrapedRow>>;
}

/// Pick the source a config asks for: a snapshot file when one is set,
/// otherwise the live page
pub fn source_from_config(config: &ScreenerConfig) -> FastMoverResult<Box<dyn RowSource>> {
    match config.snapshot_path.as_deref() {
        Some(path) if !path.trim().is_empty() => Ok(Box::new(SnapshotRowSource::new(path))),
        _ => Ok(Box::new(HttpRowSource::from_config(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        let mut row = ScrapedRow::default();
        row.fields.insert("pair-age".to_string(), "5m".to_string());

        assert_eq!(row.field("pair-age"), Some("5m"));
        assert_eq!(row.field("volume"), None);
    }

    #[test]
    fn test_source_selection() {
        let mut config = ScreenerConfig::default();
        let source = source_from_config(&config).unwrap();
        assert_eq!(source.name(), "http");

        config.snapshot_path = Some("/tmp/page.html".to_string());
        let source = source_from_config(&config).unwrap();
        assert_eq!(source.name(), "snapshot");
    }
}
