//! Canonical rendering of column cells as lookup keys and numbers

use std::collections::HashSet;

use anyhow::Result;
use polars::prelude::*;

/// Render a float as a lookup key. Integral values drop the fractional part so
/// that `1.0` read from one file matches `1` read from another.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Convert a column to a Vec of Option<String> keys.
///
/// Nulls and NaN become `None`; every other cell gets the canonical rendering
/// used on both sides of a dictionary lookup.
pub fn column_to_keys(col: &Column) -> Result<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.filter(|n| !n.is_nan()).map(format_number))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}

/// Convert a numeric column to a Vec of Option<f64>, treating NaN as missing.
pub fn column_to_f64(col: &Column) -> Result<Vec<Option<f64>>> {
    let cast = col.cast(&DataType::Float64)?;
    let values = cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|n| !n.is_nan()))
        .collect();
    Ok(values)
}

/// Number of distinct non-missing values in a column.
pub fn distinct_count(col: &Column) -> Result<usize> {
    let keys = column_to_keys(col)?;
    let distinct: HashSet<&str> = keys.iter().filter_map(|k| k.as_deref()).collect();
    Ok(distinct.len())
}

/// True for text columns (the classifier's non-numeric branch).
pub fn is_text_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Categorical(_, _))
}
