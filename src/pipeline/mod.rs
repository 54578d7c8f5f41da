//! Pipeline module - dictionary, classification, binning, labelling and aggregation

pub mod aggregate;
pub mod binning;
pub mod classify;
pub mod context;
pub mod dictionary;
pub mod error;
pub mod loader;
pub mod resolve;
pub mod rules;
pub mod values;

pub use aggregate::*;
pub use binning::*;
pub use classify::*;
pub use context::*;
pub use dictionary::*;
pub use error::PipelineError;
pub use loader::*;
pub use resolve::*;
pub use rules::*;
pub use values::*;
