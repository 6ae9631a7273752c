/// Coin records built from dashboard rows
///
/// Every field is the text the page displays. Only the price changes and the
/// pair age are ever parsed, by the filtering module.
use serde::Serialize;
use url::Url;

use crate::screener::ScrapedRow;

// Column names as they appear in the row markup (`ds-dex-table-row-col-<name>`)
pub const FIELD_PRICE_CHANGE_M5: &str = "price-change-m5";
pub const FIELD_PRICE_CHANGE_H1: &str = "price-change-h1";
pub const FIELD_PRICE_CHANGE_H6: &str = "price-change-h6";
pub const FIELD_PRICE_CHANGE_H24: &str = "price-change-h24";
pub const FIELD_TOKEN_SYMBOL: &str = "token-symbol";
pub const FIELD_PRICE: &str = "price";
pub const FIELD_PAIR_AGE: &str = "pair-age";
pub const FIELD_TXNS: &str = "txns";
pub const FIELD_VOLUME: &str = "volume";
pub const FIELD_MAKERS: &str = "makers";
pub const FIELD_LIQUIDITY: &str = "liquidity";
pub const FIELD_MARKET_CAP: &str = "market-cap";

/// Price change columns in timeframe order: 5m, 1h, 6h, 24h
pub const PRICE_CHANGE_FIELDS: [&str; 4] = [
    FIELD_PRICE_CHANGE_M5,
    FIELD_PRICE_CHANGE_H1,
    FIELD_PRICE_CHANGE_H6,
    FIELD_PRICE_CHANGE_H24,
];

/// Every labelled column a row is expected to carry
pub const ROW_FIELDS: [&str; 12] = [
    FIELD_PRICE_CHANGE_M5,
    FIELD_PRICE_CHANGE_H1,
    FIELD_PRICE_CHANGE_H6,
    FIELD_PRICE_CHANGE_H24,
    FIELD_TOKEN_SYMBOL,
    FIELD_PRICE,
    FIELD_PAIR_AGE,
    FIELD_TXNS,
    FIELD_VOLUME,
    FIELD_MAKERS,
    FIELD_LIQUIDITY,
    FIELD_MARKET_CAP,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoinRecord {
    /// Row link as found in the page, usually `/solana/<address>`
    pub ds_url: Option<String>,
    pub token_symbol: Option<String>,
    pub price: Option<String>,
    pub price_change_m5: Option<String>,
    pub price_change_h1: Option<String>,
    pub price_change_h6: Option<String>,
    pub price_change_h24: Option<String>,
    pub pair_age: Option<String>,
    pub txns: Option<String>,
    pub volume: Option<String>,
    pub makers: Option<String>,
    pub liquidity: Option<String>,
    pub market_cap: Option<String>,
}

impl CoinRecord {
    /// Build a record from a scraped row; missing columns stay `None`
    pub fn from_row(row: &ScrapedRow) -> Self {
        let field = |name: &str| row.field(name).map(str::to_string);

        Self {
            ds_url: row.href.clone(),
            token_symbol: field(FIELD_TOKEN_SYMBOL),
            price: field(FIELD_PRICE),
            price_change_m5: field(FIELD_PRICE_CHANGE_M5),
            price_change_h1: field(FIELD_PRICE_CHANGE_H1),
            price_change_h6: field(FIELD_PRICE_CHANGE_H6),
            price_change_h24: field(FIELD_PRICE_CHANGE_H24),
            pair_age: field(FIELD_PAIR_AGE),
            txns: field(FIELD_TXNS),
            volume: field(FIELD_VOLUME),
            makers: field(FIELD_MAKERS),
            liquidity: field(FIELD_LIQUIDITY),
            market_cap: field(FIELD_MARKET_CAP),
        }
    }

    /// Price changes in timeframe order (5m, 1h, 6h, 24h)
    pub fn price_changes(&self) -> [Option<&str>; 4] {
        [
            self.price_change_m5.as_deref(),
            self.price_change_h1.as_deref(),
            self.price_change_h6.as_deref(),
            self.price_change_h24.as_deref(),
        ]
    }

    /// Token address: last non-empty path segment of the row link
    ///
    /// Query strings and fragments are ignored.
    pub fn token_address(&self) -> Option<String> {
        let link = self.ds_url.as_deref()?;
        let absolute = Url::parse(link).ok();
        let path = match &absolute {
            Some(url) => url.path(),
            None => link.split(['?', '#']).next().unwrap_or(link),
        };
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .last()
            .map(str::to_string)
    }

    /// Row link made absolute against the dashboard base URL
    ///
    /// Absolute links are returned unchanged; an unparsable base falls back
    /// to the raw link.
    pub fn contract_url(&self, base_url: &str) -> Option<String> {
        let link = self.ds_url.as_deref()?;
        match Url::parse(base_url).and_then(|base| base.join(link)) {
            Ok(resolved) => Some(resolved.to_string()),
            Err(_) => Some(link.to_string()),
        }
    }

    /// Symbol for log lines
    pub fn display_symbol(&self) -> &str {
        self.token_symbol.as_deref().unwrap_or("unknown")
    }
}
