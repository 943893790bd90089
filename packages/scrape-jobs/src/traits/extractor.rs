//! Extractor trait: reachability checks and fetch + extract.
//!
//! Abstracts the automation engine. Implementations may keep one long-lived
//! session that is opened on first use and released by [`Extractor::close`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use scrape_jobs::{Extractor, HttpExtractor, TargetConfig};
//!
//! let extractor = HttpExtractor::new();
//! let target = TargetConfig::new("https://example.com")
//!     .selector("title", "h1")
//!     .build()?;
//!
//! if extractor.validate_target(&target).await {
//!     let result = extractor.scrape(&target).await?;
//!     println!("{:?}", result.get_field("title"));
//! }
//! extractor.close().await;
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ScrapeOutcome;
use crate::types::{ScrapeResult, TableResult, TableTarget, Target};

/// Pluggable extraction capability.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Lightweight pre-flight check against the target URL.
    ///
    /// Uses a timeout shorter than the target's own. Returns `true` only for
    /// a successful response; navigation failures, non-success statuses and
    /// timeouts all yield `false`, never an error.
    async fn validate_target(&self, target: &Target) -> bool;

    /// Fetch the target and extract every selector.
    ///
    /// Each field is extracted independently; a selector that matches
    /// nothing yields `null` for that field. Fetch-level failures fail the
    /// whole call with no partial result.
    async fn scrape(&self, target: &Target) -> ScrapeOutcome<ScrapeResult>;

    /// Fetch the target and extract one record per table row.
    ///
    /// Column selectors are evaluated inside each row; a cell that matches
    /// nothing is `null`. At most `max_rows` rows are returned.
    async fn scrape_table(&self, table: &TableTarget) -> ScrapeOutcome<TableResult>;

    /// Release the underlying session. Calling it again is a no-op.
    async fn close(&self);

    /// Get the extractor name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<E: Extractor + ?Sized> Extractor for Arc<E> {
    async fn validate_target(&self, target: &Target) -> bool {
        (**self).validate_target(target).await
    }

    async fn scrape(&self, target: &Target) -> ScrapeOutcome<ScrapeResult> {
        (**self).scrape(target).await
    }

    async fn scrape_table(&self, table: &TableTarget) -> ScrapeOutcome<TableResult> {
        (**self).scrape_table(table).await
    }

    async fn close(&self) {
        (**self).close().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
