//! Tests for CLI argument parsing and end-to-end command runs

use std::path::PathBuf;

use assert_cmd::Command;
use clap::Parser;
use predicates::prelude::*;
use tempfile::TempDir;
use unioutcomes::cli::{resolve_range, Cli, Commands};

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["unioutcomes", "-d", "data.csv", "-x", "dict.csv", "variables"]);

    assert_eq!(cli.data, PathBuf::from("data.csv"));
    assert_eq!(cli.dictionary, PathBuf::from("dict.csv"));
    assert!(cli.rules.is_none());
    assert_eq!(
        cli.infer_schema_length, 10000,
        "Default schema inference should be 10000"
    );
    assert_eq!(cli.verbose, 0);
    assert!(matches!(cli.command, Commands::Variables));
}

#[test]
fn test_cli_aggregate_arguments() {
    let cli = Cli::parse_from([
        "unioutcomes",
        "-d",
        "data.csv",
        "-x",
        "dict.csv",
        "-vv",
        "aggregate",
        "-g",
        "state",
        "--low",
        "-5",
        "--high",
        "25.5",
        "--json",
        "out.json",
    ]);

    assert_eq!(cli.verbose, 2);
    match cli.command {
        Commands::Aggregate {
            group,
            low,
            high,
            json,
        } => {
            assert_eq!(group, "state");
            assert_eq!(low, Some(-5.0));
            assert_eq!(high, Some(25.5));
            assert_eq!(json, Some(PathBuf::from("out.json")));
        }
        other => panic!("Expected aggregate, got {:?}", other),
    }
}

#[test]
fn test_cli_aggregate_uses_default_range() {
    let cli = Cli::parse_from([
        "unioutcomes", "-d", "data.csv", "-x", "dict.csv", "aggregate", "-g", "state",
    ]);

    let Commands::Aggregate { low, high, .. } = cli.command else {
        panic!("Expected aggregate");
    };
    assert_eq!(resolve_range(low, high, (1.0, 50.0)), (1.0, 50.0));
}

#[test]
fn test_cli_rejects_non_finite_bounds() {
    let result = Cli::try_parse_from([
        "unioutcomes", "-d", "data.csv", "-x", "dict.csv", "aggregate", "-g", "state", "--low",
        "NaN",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_cli_requires_group() {
    let result =
        Cli::try_parse_from(["unioutcomes", "-d", "data.csv", "-x", "dict.csv", "aggregate"]);
    assert!(result.is_err());
}

/// Write the college fixtures to disk for a binary run
fn write_inputs() -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let data = write_csv(&temp_dir, "data.csv", &mut create_college_dataframe());
    let dict = write_csv(&temp_dir, "dictionary.csv", &mut create_dictionary_dataframe());
    (temp_dir, data, dict)
}

fn unioutcomes(data: &PathBuf, dict: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("unioutcomes").unwrap();
    cmd.arg("-d").arg(data).arg("-x").arg(dict);
    cmd
}

#[test]
fn test_variables_command_lists_selectable_pool() {
    let (_temp_dir, data, dict) = write_inputs();

    unioutcomes(&data, &dict)
        .arg("variables")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ownership Type"))
        .stdout(predicate::str::contains("admission_rate.overall_binned"))
        .stdout(predicate::str::contains("carnegie_basic").not());
}

#[test]
fn test_bounds_command() {
    let (_temp_dir, data, dict) = write_inputs();

    unioutcomes(&data, &dict)
        .arg("bounds")
        .assert()
        .success()
        .stdout(predicate::str::contains("100"));
}

#[test]
fn test_aggregate_command_prints_ranked_groups() {
    let (_temp_dir, data, dict) = write_inputs();

    unioutcomes(&data, &dict)
        .args(["aggregate", "-g", "ownership", "--low", "1", "--high", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Income Score by Ownership Type (Rank 1–100)"))
        .stdout(predicate::str::contains("Public"))
        .stdout(predicate::str::contains("66.00"));
}

#[test]
fn test_aggregate_command_empty_range() {
    let (_temp_dir, data, dict) = write_inputs();

    unioutcomes(&data, &dict)
        .args(["aggregate", "-g", "state", "--low", "500", "--high", "600"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No data in the selected range"));
}

#[test]
fn test_aggregate_command_unknown_group_fails() {
    let (_temp_dir, data, dict) = write_inputs();

    unioutcomes(&data, &dict)
        .args(["aggregate", "-g", "carnegie_basic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown group variable 'carnegie_basic'"));
}

#[test]
fn test_aggregate_command_writes_json() {
    let (temp_dir, data, dict) = write_inputs();
    let out = temp_dir.path().join("result.json");

    unioutcomes(&data, &dict)
        .args(["aggregate", "-g", "region", "--low", "1", "--high", "100", "--json"])
        .arg(&out)
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["metadata"]["group_variable"], "region");
    assert_eq!(value["metadata"]["group_label"], "Region");
    assert_eq!(value["groups"][0]["label"], "Mid East");
    assert_eq!(value["groups"][0]["value"], 77.5);
}

#[test]
fn test_missing_data_file_fails() {
    let (temp_dir, _data, dict) = write_inputs();
    let missing = temp_dir.path().join("nope.csv");

    unioutcomes(&missing, &dict)
        .arg("variables")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_summary_command() {
    let (_temp_dir, data, dict) = write_inputs();

    unioutcomes(&data, &dict)
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("CLASSIFICATION SUMMARY"))
        .stdout(predicate::str::contains("pct_pell_binned"));
}
