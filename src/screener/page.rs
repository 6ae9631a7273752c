/// Dashboard page parser
///
/// Rows are the `a.ds-dex-table-row` anchors of the rendered pair table.
/// Inside a row, each column is the first descendant carrying the class
/// `ds-dex-table-row-col-<label>`; the token symbol lives in
/// `ds-dex-table-row-base-token-symbol`. A column that is missing from a row
/// is left out of that row's fields.
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

use super::ScrapedRow;
use crate::coin::{FIELD_TOKEN_SYMBOL, ROW_FIELDS};
use crate::errors::{FastMoverError, FastMoverResult};
use crate::logger::{self, LogTag};

pub const ROW_SELECTOR: &str = "a.ds-dex-table-row";
const COLUMN_CLASS_PREFIX: &str = "ds-dex-table-row-col-";
const SYMBOL_CLASS: &str = "ds-dex-table-row-base-token-symbol";

fn selector(css: &str) -> FastMoverResult<Selector> {
    Selector::parse(css)
        .map_err(|e| FastMoverError::PageParse(format!("invalid selector '{}': {}", css, e)))
}

/// Label -> selector for every column a row may carry
fn column_selectors() -> FastMoverResult<Vec<(&'static str, Selector)>> {
    ROW_FIELDS
        .iter()
        .map(|label| {
            let css = if *label == FIELD_TOKEN_SYMBOL {
                format!(".{}", SYMBOL_CLASS)
            } else {
                format!(".{}{}", COLUMN_CLASS_PREFIX, label)
            };
            selector(&css).map(|sel| (*label, sel))
        })
        .collect()
}

/// Visible text of an element with whitespace runs collapsed
fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse every row of a rendered dashboard page, in page order
pub fn parse_rows(html: &str) -> FastMoverResult<Vec<ScrapedRow>> {
    let document = Html::parse_document(html);
    let row_selector = selector(ROW_SELECTOR)?;
    let columns = column_selectors()?;

    let mut rows = Vec::new();
    for (index, anchor) in document.select(&row_selector).enumerate() {
        let mut fields = HashMap::new();

        for (label, sel) in &columns {
            match anchor.select(sel).next() {
                Some(cell) => {
                    fields.insert(label.to_string(), element_text(cell));
                }
                None => {
                    logger::debug(
                        LogTag::Screener,
                        &format!("Row {}: column {} not found", index + 1, label),
                    );
                }
            }
        }

        let row = ScrapedRow {
            href: anchor.value().attr("href").map(str::to_string),
            fields,
        };
        logger::verbose(LogTag::Screener, &format!("Row {}: {:?}", index + 1, row));
        rows.push(row);
    }

    logger::debug(LogTag::Screener, &format!("Parsed {} rows from page", rows.len()));
    Ok(rows)
}
