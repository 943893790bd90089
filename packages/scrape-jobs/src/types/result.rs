//! Structured output of a successful scrape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value::{ScrapedData, ScrapedValue};

/// Fetch metadata captured alongside extracted data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeMetadata {
    /// Wall-clock time of the fetch + extract (milliseconds)
    pub response_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ScrapeMetadata {
    pub fn new(response_time: u64) -> Self {
        Self {
            response_time,
            ..Default::default()
        }
    }

    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Immutable result of one successful scrape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    data: ScrapedData,
    url: String,
    scraped_at: DateTime<Utc>,
    metadata: ScrapeMetadata,
}

impl ScrapeResult {
    /// Capture a result; `scraped_at` is set to now.
    pub fn new(data: ScrapedData, url: impl Into<String>, metadata: ScrapeMetadata) -> Self {
        Self {
            data,
            url: url.into(),
            scraped_at: Utc::now(),
            metadata,
        }
    }

    pub fn data(&self) -> &ScrapedData {
        &self.data
    }

    pub fn into_data(self) -> ScrapedData {
        self.data
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn scraped_at(&self) -> DateTime<Utc> {
        self.scraped_at
    }

    pub fn metadata(&self) -> &ScrapeMetadata {
        &self.metadata
    }

    /// Look up a field. `None` means the field is absent; a present field
    /// whose selector matched nothing is `Some(ScrapedValue::Null)`.
    pub fn get_field(&self, field: &str) -> Option<&ScrapedValue> {
        self.data.get(field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.data.contains_key(field)
    }

    /// Serialize to a JSON string (`data`, `url`, `scrapedAt`, `metadata`).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
