//! Error types for the grouping pipeline.
//!
//! Load failures are reported through `anyhow` with file context. The variants
//! here cover the contract violations a caller can trigger against an already
//! built context.

use thiserror::Error;

/// Errors raised by the classification and aggregation pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A query named a group variable outside the selectable pool.
    #[error("unknown group variable '{name}'. Selectable variables: {available:?}")]
    UnknownGroupVariable { name: String, available: Vec<String> },

    /// A required column is absent from the dataset or dictionary.
    #[error("required column '{column}' not found in {source_name}")]
    MissingColumn { column: String, source_name: String },

    /// A column that must be numeric has another type.
    #[error("column '{column}' must be numeric, found {dtype}")]
    NonNumericColumn { column: String, dtype: String },

    /// Bin bounds must be ordered.
    #[error("invalid bin bounds: min_bins ({min}) exceeds max_bins ({max})")]
    InvalidBinBounds { min: u32, max: u32 },
}
