//! Table extraction: one container, many rows, fixed columns.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::result::ScrapeMetadata;
use super::target::{Target, TargetConfig};
use super::value::{ScrapedData, ScrapedValue};
use crate::error::TargetError;

/// Unvalidated table request; also its wire shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    pub url: String,
    pub table_selector: String,
    pub row_selector: String,
    #[serde(default)]
    pub column_selectors: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl TableConfig {
    pub fn new(
        url: impl Into<String>,
        table_selector: impl Into<String>,
        row_selector: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            table_selector: table_selector.into(),
            row_selector: row_selector.into(),
            ..Default::default()
        }
    }

    /// Add a column → selector entry, evaluated inside each row.
    pub fn column(mut self, name: impl Into<String>, selector: impl Into<String>) -> Self {
        self.column_selectors.insert(name.into(), selector.into());
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    pub fn build(self) -> Result<TableTarget, TargetError> {
        TableTarget::new(self)
    }
}

/// Validated table request.
///
/// Wraps a [`Target`] whose selectors are the column selectors and whose
/// wait-for selector is the table selector, so fetch options and URL rules
/// are shared with ordinary scrapes.
#[derive(Debug, Clone, PartialEq)]
pub struct TableTarget {
    target: Target,
    table_selector: String,
    row_selector: String,
    max_rows: Option<usize>,
}

impl TableTarget {
    pub fn new(config: TableConfig) -> Result<Self, TargetError> {
        let mut target = TargetConfig::new(config.url)
            .with_wait_for_selector(config.table_selector.clone());
        target.selectors = config.column_selectors;
        target.headers = config.headers;
        target.timeout = config.timeout;
        let target = Target::new(target)?;

        for (name, selector) in [
            ("tableSelector", &config.table_selector),
            ("rowSelector", &config.row_selector),
        ] {
            if selector.trim().is_empty() {
                return Err(TargetError::EmptySelector {
                    name: name.to_string(),
                });
            }
        }

        Ok(Self {
            target,
            table_selector: config.table_selector,
            row_selector: config.row_selector,
            // Zero means no limit
            max_rows: config.max_rows.filter(|n| *n > 0),
        })
    }

    /// Fetch options and column selectors.
    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn url(&self) -> &str {
        self.target.url()
    }

    pub fn table_selector(&self) -> &str {
        &self.table_selector
    }

    pub fn row_selector(&self) -> &str {
        &self.row_selector
    }

    pub fn columns(&self) -> &IndexMap<String, String> {
        self.target.selectors()
    }

    pub fn max_rows(&self) -> Option<usize> {
        self.max_rows
    }
}

/// Rows extracted from one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResult {
    url: String,
    total_rows: usize,
    /// One `Map` per row, keyed by column name
    data: Vec<ScrapedValue>,
    scraped_at: DateTime<Utc>,
    metadata: ScrapeMetadata,
}

impl TableResult {
    pub fn new(rows: Vec<ScrapedData>, url: impl Into<String>, metadata: ScrapeMetadata) -> Self {
        let data: Vec<ScrapedValue> = rows.into_iter().map(ScrapedValue::Map).collect();
        Self {
            url: url.into(),
            total_rows: data.len(),
            data,
            scraped_at: Utc::now(),
            metadata,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn rows(&self) -> &[ScrapedValue] {
        &self.data
    }

    /// Cell lookup; `None` when the row or column does not exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&ScrapedValue> {
        self.data.get(row)?.as_map()?.get(column)
    }

    pub fn scraped_at(&self) -> DateTime<Utc> {
        self.scraped_at
    }

    pub fn metadata(&self) -> &ScrapeMetadata {
        &self.metadata
    }

    /// All rows as a single `List` value.
    pub fn to_value(&self) -> ScrapedValue {
        ScrapedValue::List(self.data.clone())
    }
}
