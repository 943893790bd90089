//! Domain types for scrape jobs.

pub mod job;
pub mod result;
pub mod status;
pub mod table;
pub mod target;
pub mod value;

pub use job::{Job, JobId};
pub use result::{ScrapeMetadata, ScrapeResult};
pub use status::JobStatus;
pub use table::{TableConfig, TableResult, TableTarget};
pub use target::{Cookie, Target, TargetConfig, DEFAULT_TIMEOUT_MS};
pub use value::{ScrapedData, ScrapedValue};
