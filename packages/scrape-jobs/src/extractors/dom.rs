//! Selector evaluation over a parsed HTML document.
//!
//! Every field is evaluated on its own: a selector that fails to parse or
//! matches nothing becomes `null` and never stops the remaining fields.

use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::{ScrapeError, ScrapeOutcome};
use crate::types::{ScrapedData, ScrapedValue, TableTarget};

/// Evaluate each field → selector entry against the document.
pub fn extract_fields(document: &Html, selectors: &IndexMap<String, String>) -> ScrapedData {
    selectors
        .iter()
        .map(|(field, selector)| (field.clone(), extract_field(document, field, selector)))
        .collect()
}

/// Trimmed text of the first element matching `selector`, or `null`.
pub fn extract_field(document: &Html, field: &str, selector: &str) -> ScrapedValue {
    let parsed = match Selector::parse(selector) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(field = %field, selector = %selector, error = ?e, "Invalid selector, field set to null");
            return ScrapedValue::Null;
        }
    };

    let Some(element) = document.select(&parsed).next() else {
        debug!(field = %field, selector = %selector, "Selector matched nothing");
        return ScrapedValue::Null;
    };

    element_text(element)
}

/// Trimmed text content; empty text is `null`.
fn element_text(element: ElementRef<'_>) -> ScrapedValue {
    let text = element.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        ScrapedValue::Null
    } else {
        ScrapedValue::String(text.to_string())
    }
}

/// Rows of the first element matching the table selector.
///
/// Table and row selectors are structural: an unparseable one fails the
/// call and a missing table is `SelectorNeverAppeared`. Column selectors
/// behave like fields; a bad or unmatched one is `null` in that row.
pub fn extract_rows(document: &Html, table: &TableTarget) -> ScrapeOutcome<Vec<ScrapedData>> {
    let table_selector = parse_structural(table.table_selector())?;
    let row_selector = parse_structural(table.row_selector())?;

    let Some(container) = document.select(&table_selector).next() else {
        return Err(ScrapeError::SelectorNeverAppeared {
            selector: table.table_selector().to_string(),
        });
    };

    let columns: Vec<(&String, Option<Selector>)> = table
        .columns()
        .iter()
        .map(|(name, selector)| {
            let parsed = Selector::parse(selector)
                .map_err(|e| {
                    warn!(column = %name, selector = %selector, error = ?e, "Invalid column selector, cells set to null");
                })
                .ok();
            (name, parsed)
        })
        .collect();

    let rows = container
        .select(&row_selector)
        .take(table.max_rows().unwrap_or(usize::MAX))
        .map(|row| {
            columns
                .iter()
                .map(|(name, selector)| {
                    let value = selector
                        .as_ref()
                        .and_then(|selector| row.select(selector).next())
                        .map(element_text)
                        .unwrap_or(ScrapedValue::Null);
                    ((*name).clone(), value)
                })
                .collect::<ScrapedData>()
        })
        .collect();

    Ok(rows)
}

fn parse_structural(selector: &str) -> ScrapeOutcome<Selector> {
    Selector::parse(selector).map_err(|_| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
    })
}

/// Whether any element matches `selector`. Unparseable selectors never match.
pub fn has_match(document: &Html, selector: &str) -> bool {
    Selector::parse(selector)
        .map(|parsed| document.select(&parsed).next().is_some())
        .unwrap_or(false)
}
