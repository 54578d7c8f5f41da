//! Command-line argument definitions using clap

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// unioutcomes - Group institutions by categorical and binned variables and rank
/// the groups by mean income score
#[derive(Parser, Debug)]
#[command(name = "unioutcomes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Dataset file path (CSV or Parquet)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Data dictionary file path (CSV or Parquet) with variable name, VALUE
    /// and LABEL columns
    #[arg(short = 'x', long)]
    pub dictionary: PathBuf,

    /// JSON rule table overriding the built-in filter/metric columns,
    /// exclusions, recodes and display names
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Number of rows to use for schema inference of a CSV dataset.
    /// Use 0 for full table scan. The dictionary is always read as text.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Increase diagnostic output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the variables available for grouping
    Variables,

    /// Show the minimum and maximum of the filter column
    Bounds,

    /// Show how the dataset columns were classified and binned
    Summary,

    /// Compute the mean metric per group for rows within a filter range
    Aggregate {
        /// Group variable (internal name, see `variables`)
        #[arg(short, long)]
        group: String,

        /// Inclusive lower bound of the filter range (defaults to the rule
        /// table's default range)
        #[arg(long, allow_negative_numbers = true, value_parser = parse_finite)]
        low: Option<f64>,

        /// Inclusive upper bound of the filter range
        #[arg(long, allow_negative_numbers = true, value_parser = parse_finite)]
        high: Option<f64>,

        /// Also write the result as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Interactively pick group variables and ranges
    Explore,
}

/// Fill unset bounds from the default range
pub fn resolve_range(low: Option<f64>, high: Option<f64>, default: (f64, f64)) -> (f64, f64) {
    (low.unwrap_or(default.0), high.unwrap_or(default.1))
}

/// Validator for range bounds
fn parse_finite(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("range bound must be finite, got {}", value))
    }
}
