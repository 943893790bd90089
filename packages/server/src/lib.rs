// Scrape Job API - Server Core
//
// HTTP transport over the scrape-jobs library: create, execute, inspect,
// list and delete extraction jobs.

pub mod config;
pub mod server;

pub use config::*;
