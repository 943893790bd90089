//! Scrape Job Library
//!
//! Tracks web extraction jobs through a strict lifecycle and defines the
//! contract for turning a page into structured, null-tolerant fields.
//!
//! # Lifecycle
//!
//! ```text
//! PENDING ──execute──▶ RUNNING ──ok──▶ COMPLETED
//!                          └────err──▶ FAILED
//! ```
//!
//! A job leaves `PENDING` at most once. Scrape failures are recorded on the
//! job and returned as a normal response; only precondition failures
//! (not found, already processed) come back as errors.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scrape_jobs::{JobService, MemoryJobStore, HttpExtractor, TargetConfig};
//!
//! let service = JobService::new(
//!     Arc::new(MemoryJobStore::new()),
//!     Arc::new(HttpExtractor::new()),
//! );
//!
//! let created = service
//!     .create(TargetConfig::new("https://example.com").selector("title", "h1"))
//!     .await?;
//! let outcome = service.execute(&created.job_id).await?;
//! println!("{:?}", outcome.result);
//!
//! service.shutdown().await;
//! ```
//!
//! # Modules
//!
//! - [`types`] - Target, job, result and value types
//! - [`traits`] - `JobStore` and `Extractor` seams
//! - [`stores`] - Storage implementations (MemoryJobStore)
//! - [`extractors`] - Extractor implementations (HttpExtractor, MockExtractor)
//! - [`service`] - The `JobService` use cases

pub mod error;
pub mod extractors;
pub mod locks;
pub mod service;
pub mod stores;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{JobError, Result, ScrapeError, StoreError, TargetError, TransitionError};
pub use extractors::{HttpExtractor, MockExtractor, MockExtractorCall};
pub use service::{CreateJobResponse, ExecuteJobResponse, JobService, JobView};
pub use stores::MemoryJobStore;
pub use traits::{Extractor, JobStore};
pub use types::{
    Cookie, Job, JobId, JobStatus, ScrapeMetadata, ScrapeResult, ScrapedData, ScrapedValue,
    TableConfig, TableResult, TableTarget, Target, TargetConfig, DEFAULT_TIMEOUT_MS,
};
