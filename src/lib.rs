//! unioutcomes: grouping and ranking library for institutional outcome data
//!
//! Classifies dataset columns into categorical and numeric variables, labels
//! coded values through a data dictionary, bins numeric variables into a
//! bounded number of intervals and computes the mean of a metric per group
//! for rows within a filter range.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
