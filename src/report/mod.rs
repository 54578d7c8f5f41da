//! Report module - terminal tables and JSON export of query results

pub mod aggregation_export;
pub mod summary;

pub use aggregation_export::*;
pub use summary::*;
