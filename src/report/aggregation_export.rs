//! Aggregation result export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{AggregationRequest, GroupMean};

/// Metadata about the query
#[derive(Serialize)]
pub struct AggregationMetadata {
    /// Timestamp of the export (ISO 8601 format)
    pub timestamp: String,
    /// unioutcomes version
    pub version: String,
    /// Dataset file path
    pub data_file: String,
    /// Internal name of the group variable
    pub group_variable: String,
    /// Display label of the group variable
    pub group_label: String,
    /// Column the range filter applied to
    pub filter_column: String,
    /// Column whose mean is reported
    pub metric_column: String,
    /// Inclusive lower bound
    pub low: f64,
    /// Inclusive upper bound
    pub high: f64,
    /// Chart caption
    pub title: String,
}

/// Complete aggregation export with metadata
#[derive(Serialize)]
pub struct AggregationExport<'a> {
    pub metadata: AggregationMetadata,
    /// Groups in result order (mean descending)
    pub groups: &'a [GroupMean],
}

/// Parameters for the export metadata
pub struct ExportParams<'a> {
    pub data_file: &'a str,
    pub group_label: &'a str,
    pub filter_column: &'a str,
    pub metric_column: &'a str,
    pub title: &'a str,
}

/// Build the export document for a query result
pub fn build_export<'a>(
    groups: &'a [GroupMean],
    request: &AggregationRequest,
    params: &ExportParams,
) -> AggregationExport<'a> {
    AggregationExport {
        metadata: AggregationMetadata {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_file: params.data_file.to_string(),
            group_variable: request.group.clone(),
            group_label: params.group_label.to_string(),
            filter_column: params.filter_column.to_string(),
            metric_column: params.metric_column.to_string(),
            low: request.low,
            high: request.high,
            title: params.title.to_string(),
        },
        groups,
    }
}

/// Export an aggregation result to a JSON file
pub fn export_aggregation(
    groups: &[GroupMean],
    request: &AggregationRequest,
    params: &ExportParams,
    output_path: &Path,
) -> Result<()> {
    let export = build_export(groups, request, params);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize aggregation result to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write aggregation result to {}",
            output_path.display()
        )
    })?;

    Ok(())
}
