//! Dataset and data dictionary loaders for CSV and Parquet files

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::info;

use super::dictionary::DictionaryEntry;
use super::error::PipelineError;
use super::rules::{DictionaryColumns, RuleTable};
use super::values::column_to_keys;

/// Scan a file lazily (CSV or Parquet based on extension).
///
/// `schema_length` is passed to the CSV reader as is: `None` scans the full
/// table, `Some(0)` reads every column as text.
fn scan_file(path: &Path, schema_length: Option<usize>) -> Result<LazyFrame> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    Ok(lf)
}

/// Load the main dataset into memory
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    // 0 means full table scan
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let df = scan_file(path, schema_length)?
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded dataset"
    );
    Ok(df)
}

/// Load the data dictionary table and convert it to entries.
///
/// The three configured columns must be present; values and labels are
/// rendered as lookup keys, missing cells stay missing. CSV dictionaries are
/// read with every column as text, since value codes often mix integers and
/// strings within one column.
pub fn load_dictionary(path: &Path, columns: &DictionaryColumns) -> Result<Vec<DictionaryEntry>> {
    let df = scan_file(path, Some(0))?
        .collect()
        .with_context(|| format!("Failed to read data dictionary: {}", path.display()))?;

    let entries = dictionary_entries(&df, columns)
        .with_context(|| format!("Malformed data dictionary: {}", path.display()))?;

    info!(path = %path.display(), entries = entries.len(), "loaded data dictionary");
    Ok(entries)
}

/// Convert an in-memory dictionary table to entries
pub fn dictionary_entries(
    df: &DataFrame,
    columns: &DictionaryColumns,
) -> Result<Vec<DictionaryEntry>> {
    let fetch = |name: &str| -> Result<Vec<Option<String>>> {
        let col = df.column(name).map_err(|_| PipelineError::MissingColumn {
            column: name.to_string(),
            source_name: "data dictionary".to_string(),
        })?;
        column_to_keys(col)
    };

    let variables = fetch(&columns.variable)?;
    let values = fetch(&columns.value)?;
    let labels = fetch(&columns.label)?;

    let entries = variables
        .into_iter()
        .zip(values)
        .zip(labels)
        .map(|((variable, value), label)| DictionaryEntry {
            variable,
            value,
            label,
        })
        .collect();

    Ok(entries)
}

/// Check that the filter and metric columns exist and are numeric
pub fn validate_required_columns(df: &DataFrame, rules: &RuleTable) -> Result<(), PipelineError> {
    for name in [&rules.filter_column, &rules.metric_column] {
        let col = df.column(name).map_err(|_| PipelineError::MissingColumn {
            column: name.clone(),
            source_name: "dataset".to_string(),
        })?;
        if !col.dtype().is_primitive_numeric() {
            return Err(PipelineError::NonNumericColumn {
                column: name.clone(),
                dtype: col.dtype().to_string(),
            });
        }
    }
    Ok(())
}

/// Shape and estimated memory of a loaded dataset: (rows, columns, MB)
pub fn dataset_stats(df: &DataFrame) -> (usize, usize, f64) {
    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    (rows, cols, memory_mb)
}
