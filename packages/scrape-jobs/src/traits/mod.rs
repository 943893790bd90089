//! Trait seams consumed by the job service.

pub mod extractor;
pub mod store;

pub use extractor::Extractor;
pub use store::JobStore;
