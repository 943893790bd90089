//! Mock extractor for testing.
//!
//! Provides a configurable mock implementation of the Extractor trait.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::error::{ScrapeError, ScrapeOutcome};
use crate::traits::extractor::Extractor;
use crate::types::{
    ScrapeMetadata, ScrapeResult, ScrapedData, ScrapedValue, TableResult, TableTarget, Target,
};

/// Record of a call made to the mock extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockExtractorCall {
    Validate { url: String },
    Scrape { url: String },
    ScrapeTable { url: String },
}

/// Mock extractor for testing.
///
/// Every URL is reachable unless marked otherwise. Scraping a URL returns
/// its canned data; fields without canned values come back as `null`.
///
/// # Example
///
/// ```rust
/// use scrape_jobs::extractors::MockExtractor;
///
/// let mock = MockExtractor::new()
///     .with_field("https://example.com", "title", "Example Domain")
///     .with_unreachable("https://down.example.com");
/// ```
#[derive(Default)]
pub struct MockExtractor {
    /// Canned field values by URL
    pages: HashMap<String, ScrapedData>,
    /// Canned table rows by URL
    tables: HashMap<String, Vec<ScrapedData>>,
    /// URLs whose scrape fails with the given message
    failures: HashMap<String, String>,
    /// URLs that fail the reachability check
    unreachable: HashSet<String>,
    /// Artificial latency applied to every scrape
    delay: Option<Duration>,
    status_code: Option<u16>,

    calls: Mutex<Vec<MockExtractorCall>>,
    close_calls: AtomicUsize,
    closed: AtomicBool,
}

impl MockExtractor {
    /// Create a new mock extractor.
    pub fn new() -> Self {
        Self {
            status_code: Some(200),
            ..Default::default()
        }
    }

    /// Set one canned field value for a URL.
    pub fn with_field(
        mut self,
        url: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<ScrapedValue>,
    ) -> Self {
        self.pages
            .entry(url.into())
            .or_default()
            .insert(field.into(), value.into());
        self
    }

    /// Set all canned data for a URL.
    pub fn with_data(mut self, url: impl Into<String>, data: ScrapedData) -> Self {
        self.pages.insert(url.into(), data);
        self
    }

    /// Set canned table rows for a URL.
    pub fn with_table(mut self, url: impl Into<String>, rows: Vec<ScrapedData>) -> Self {
        self.tables.insert(url.into(), rows);
        self
    }

    /// Make scraping a URL fail with a navigation error.
    pub fn with_failure(mut self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(url.into(), message.into());
        self
    }

    /// Make a URL fail the reachability check.
    pub fn with_unreachable(mut self, url: impl Into<String>) -> Self {
        self.unreachable.insert(url.into());
        self
    }

    /// Delay every scrape by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Status code reported in result metadata.
    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Get all calls made to this mock.
    pub async fn calls(&self) -> Vec<MockExtractorCall> {
        self.calls.lock().await.clone()
    }

    /// Number of scrape calls made.
    pub async fn scrape_count(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| matches!(call, MockExtractorCall::Scrape { .. }))
            .count()
    }

    /// Number of times `close` was called.
    pub fn close_count(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl MockExtractor {
    /// Shared scrape preamble: closed check, delay, canned failure.
    async fn navigate(&self, target: &Target) -> ScrapeOutcome<()> {
        if self.is_closed() {
            return Err(ScrapeError::SessionClosed);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.failures.get(target.url()) {
            Some(message) => Err(ScrapeError::Navigation {
                url: target.url().to_string(),
                source: message.clone().into(),
            }),
            None => Ok(()),
        }
    }

    fn metadata(&self) -> ScrapeMetadata {
        let metadata = ScrapeMetadata::new(0).with_user_agent("mock-extractor");
        match self.status_code {
            Some(status_code) => metadata.with_status_code(status_code),
            None => metadata,
        }
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn validate_target(&self, target: &Target) -> bool {
        self.calls.lock().await.push(MockExtractorCall::Validate {
            url: target.url().to_string(),
        });

        !self.is_closed() && !self.unreachable.contains(target.url())
    }

    async fn scrape(&self, target: &Target) -> ScrapeOutcome<ScrapeResult> {
        self.calls.lock().await.push(MockExtractorCall::Scrape {
            url: target.url().to_string(),
        });
        self.navigate(target).await?;

        let canned = self.pages.get(target.url());
        let data: ScrapedData = target
            .selectors()
            .keys()
            .map(|field| {
                let value = canned
                    .and_then(|page| page.get(field))
                    .cloned()
                    .unwrap_or(ScrapedValue::Null);
                (field.clone(), value)
            })
            .collect();

        Ok(ScrapeResult::new(data, target.url(), self.metadata()))
    }

    async fn scrape_table(&self, table: &TableTarget) -> ScrapeOutcome<TableResult> {
        self.calls.lock().await.push(MockExtractorCall::ScrapeTable {
            url: table.url().to_string(),
        });
        self.navigate(table.target()).await?;

        let Some(canned) = self.tables.get(table.url()) else {
            return Err(ScrapeError::SelectorNeverAppeared {
                selector: table.table_selector().to_string(),
            });
        };

        let rows: Vec<ScrapedData> = canned
            .iter()
            .take(table.max_rows().unwrap_or(usize::MAX))
            .map(|row| {
                table
                    .columns()
                    .keys()
                    .map(|column| {
                        let value = row.get(column).cloned().unwrap_or(ScrapedValue::Null);
                        (column.clone(), value)
                    })
                    .collect()
            })
            .collect();

        Ok(TableResult::new(rows, table.url(), self.metadata()))
    }

    async fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.closed.store(true, Ordering::SeqCst);
    }

    fn name(&self) -> &str {
        "mock"
    }
}
