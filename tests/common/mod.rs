//! Shared test utilities and fixture generators
#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

use unioutcomes::pipeline::{DashboardContext, DictionaryEntry, RuleTable};

/// Create a small college dataset with known characteristics
///
/// This DataFrame includes:
/// - `id`, `name`: identifier columns (excluded by rule)
/// - `state`: text column (categorical)
/// - `ownership`: coded 1/2, recoded to Public/Private
/// - `region`: coded, labelled through the dictionary; code 9 is unlabelled
/// - `carnegie_basic`: labelled but removed by the prefix rule
/// - `admission_rate.overall`: 12 distinct values (binned into 4 intervals)
/// - `pct_pell`: 6 distinct values with two missing cells (binned)
/// - `locale_size`: 3 distinct values (numeric, too few to bin)
/// - `flag_constant`: a single value (degenerate)
/// - `usnews.median_rank`: filter column, one missing
/// - `metric`: income score, one missing
pub fn create_college_dataframe() -> DataFrame {
    df! {
        "id" => [1i64, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
        "name" => ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"],
        "state" => ["CA", "NY", "CA", "TX", "NY", "CA", "TX", "TX", "NY", "CA", "MA", "MA"],
        "ownership" => [1i64, 2, 1, 1, 2, 2, 1, 2, 1, 2, 2, 1],
        "region" => [1i64, 2, 1, 3, 2, 1, 3, 3, 2, 1, 9, 9],
        "carnegie_basic" => [15i64, 16, 15, 16, 15, 16, 15, 16, 15, 16, 15, 16],
        "admission_rate.overall" => [0.05f64, 0.10, 0.15, 0.20, 0.25, 0.30, 0.35, 0.40, 0.45, 0.50, 0.55, 0.60],
        "pct_pell" => [Some(0.1f64), Some(0.2), None, Some(0.3), Some(0.4), Some(0.5), Some(0.6), None, Some(0.1), Some(0.2), Some(0.3), Some(0.4)],
        "locale_size" => [1i64, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2, 3],
        "flag_constant" => [7i64; 12],
        "usnews.median_rank" => [Some(1.0f64), Some(5.0), Some(10.0), Some(20.0), Some(30.0), Some(40.0), Some(50.0), Some(60.0), Some(70.0), Some(80.0), None, Some(100.0)],
        "metric" => [Some(90.0f64), Some(80.0), Some(85.0), Some(70.0), Some(75.0), Some(60.0), Some(65.0), Some(50.0), None, Some(40.0), Some(30.0), Some(20.0)],
    }
    .unwrap()
}

/// Create the matching data dictionary table
pub fn create_dictionary_dataframe() -> DataFrame {
    df! {
        "developer-friendly name" => [
            Some("ownership"), Some("ownership"),
            Some("region"), Some("region"), Some("region"), Some("region"),
            Some("carnegie_basic"), Some("carnegie_basic"),
            Some("not_in_dataset"),
            Some("state"),
            None,
        ],
        "VALUE" => [
            Some("1"), Some("2"),
            Some("1"), Some("2"), Some("3"), Some("3"),
            Some("15"), Some("16"),
            Some("1"),
            None,
            Some("1"),
        ],
        "LABEL" => [
            Some("Public institution"), Some("Private nonprofit"),
            Some("New England"), Some("Mid East"), Some("Southwest (old)"), Some("Southwest"),
            Some("Doctoral"), Some("Masters"),
            Some("Ignored"),
            Some("No value"),
            Some("No variable"),
        ],
    }
    .unwrap()
}

/// Dictionary entries equivalent to [`create_dictionary_dataframe`]
pub fn create_dictionary_entries() -> Vec<DictionaryEntry> {
    vec![
        DictionaryEntry::new("ownership", "1", "Public institution"),
        DictionaryEntry::new("ownership", "2", "Private nonprofit"),
        DictionaryEntry::new("region", "1", "New England"),
        DictionaryEntry::new("region", "2", "Mid East"),
        DictionaryEntry::new("region", "3", "Southwest (old)"),
        DictionaryEntry::new("region", "3", "Southwest"),
        DictionaryEntry::new("carnegie_basic", "15", "Doctoral"),
        DictionaryEntry::new("carnegie_basic", "16", "Masters"),
        DictionaryEntry::new("not_in_dataset", "1", "Ignored"),
    ]
}

/// Build a context over the college fixture with default rules
pub fn build_college_context() -> DashboardContext {
    DashboardContext::build(
        create_college_dataframe(),
        &create_dictionary_entries(),
        RuleTable::default(),
    )
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = write_csv(&temp_dir, "test_data.csv", df);
    (temp_dir, csv_path)
}

/// Write a DataFrame as CSV into an existing directory
pub fn write_csv(dir: &TempDir, file_name: &str, df: &mut DataFrame) -> PathBuf {
    let path = dir.path().join(file_name);
    let mut file = std::fs::File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    path
}

/// Write a DataFrame as Parquet into an existing directory
pub fn write_parquet(dir: &TempDir, file_name: &str, df: &mut DataFrame) -> PathBuf {
    let path = dir.path().join(file_name);
    let file = std::fs::File::create(&path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();
    path
}

/// Labels of an aggregation result, in order
pub fn labels_of(groups: &[unioutcomes::pipeline::GroupMean]) -> Vec<&str> {
    groups.iter().map(|g| g.label.as_str()).collect()
}
