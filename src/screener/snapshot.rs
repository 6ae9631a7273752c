/// Offline row source: a saved copy of the rendered dashboard
use async_trait::async_trait;
use std::path::PathBuf;

use super::{page, RowSource, ScrapedRow};
use crate::errors::FastMoverResult;
use crate::logger::{self, LogTag};

pub struct SnapshotRowSource {
    path: PathBuf,
}

impl SnapshotRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RowSource for SnapshotRowSource {
    fn name(&self) -> &str {
        "snapshot"
    }

    async fn fetch_rows(&self) -> FastMoverResult<Vec<ScrapedRow>> {
        logger::info(
            LogTag::Screener,
            &format!("Reading dashboard snapshot {}", self.path.display()),
        );
        let html = tokio::fs::read_to_string(&self.path).await?;
        page::parse_rows(&html)
    }
}
