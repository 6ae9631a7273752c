/// Live dashboard fetch
///
/// Plain GET with browser-like headers. The dashboard is rendered
/// client-side and sits behind a bot check, so a direct fetch often returns
/// a challenge page with no rows. When a ScraperAPI key is configured the
/// request is routed through ScraperAPI with JavaScript rendering enabled.
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Url};
use std::time::Duration;

use super::{page, RowSource, ScrapedRow};
use crate::config::ScreenerConfig;
use crate::errors::{FastMoverError, FastMoverResult};
use crate::logger::{self, LogTag};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.9";

/// Rendering proxy credentials
#[derive(Debug, Clone)]
struct ScraperApi {
    endpoint: String,
    api_key: String,
}

pub struct HttpRowSource {
    client: Client,
    url: String,
    scraperapi: Option<ScraperApi>,
}

impl HttpRowSource {
    pub fn from_config(config: &ScreenerConfig) -> FastMoverResult<Self> {
        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| FastMoverError::Config(format!("invalid screener.user_agent: {}", e)))?;
        headers.insert(USER_AGENT, user_agent);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));

        let client = Client::builder()
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let scraperapi = config
            .scraperapi_api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(|key| ScraperApi {
                endpoint: config.scraperapi_endpoint.clone(),
                api_key: key.clone(),
            });

        Ok(Self {
            client,
            url: config.url.clone(),
            scraperapi,
        })
    }

    /// URL actually requested: the page itself, or the proxy call wrapping it
    fn request_url(&self) -> FastMoverResult<Url> {
        let parsed = match &self.scraperapi {
            Some(proxy) => Url::parse_with_params(
                &proxy.endpoint,
                &[
                    ("api_key", proxy.api_key.as_str()),
                    ("url", self.url.as_str()),
                    ("render", "true"),
                ],
            ),
            None => Url::parse(&self.url),
        };
        parsed.map_err(|e| FastMoverError::Config(format!("invalid screener URL: {}", e)))
    }

    /// Fetch the raw page body
    pub async fn fetch_html(&self) -> FastMoverResult<String> {
        let request_url = self.request_url()?;

        logger::info(
            LogTag::Screener,
            &format!(
                "Opening URL: {}{}",
                self.url,
                if self.scraperapi.is_some() { " (via ScraperAPI)" } else { "" }
            ),
        );

        // The proxied request URL carries the ScraperAPI key
        let response = self
            .client
            .get(request_url)
            .send()
            .await
            .map_err(|e| FastMoverError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FastMoverError::HttpStatus {
                endpoint: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FastMoverError::Http(e.without_url()))?;
        logger::debug(
            LogTag::Screener,
            &format!("Fetched {} bytes from dashboard", body.len()),
        );
        Ok(body)
    }
}

#[async_trait]
impl RowSource for HttpRowSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_rows(&self) -> FastMoverResult<Vec<ScrapedRow>> {
        let html = self.fetch_html().await?;
        page::parse_rows(&html)
    }
}
