// HTTP routes
pub mod health;
pub mod index;
pub mod jobs;
pub mod table;

pub use health::*;
pub use index::*;
pub use jobs::*;
pub use table::*;
