//! Extractor implementations.
//!
//! # Available Extractors
//!
//! - `HttpExtractor` - Static HTML over HTTP with CSS selectors
//! - `MockExtractor` - For testing
//!
//! # Example
//!
//! ```rust,ignore
//! use scrape_jobs::extractors::{Extractor, HttpExtractor};
//!
//! let extractor = HttpExtractor::new();
//! let result = extractor.scrape(&target).await?;
//! ```

pub mod dom;
mod http;
mod mock;

pub use http::{HttpExtractor, DEFAULT_USER_AGENT, DEFAULT_VALIDATION_TIMEOUT_MS};
pub use mock::{MockExtractor, MockExtractorCall};

// Re-export from traits for convenience
pub use crate::traits::extractor::Extractor;
