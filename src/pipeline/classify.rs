//! Variable classification: categorical, numeric or excluded
//!
//! Every dataset column receives exactly one tag. Identifier/metric columns and
//! columns with fewer than two distinct values are excluded; the rest are
//! categorical when they carry dictionary labels or hold text, numeric when
//! their type is numeric, and excluded as unusable otherwise.

use anyhow::Result;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::dictionary::LabelDictionary;
use super::rules::RuleTable;
use super::values::{distinct_count, is_text_dtype};

/// Classification tag of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Categorical,
    Numeric,
    Excluded,
}

/// Why a column was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Listed in the rule table's identifier/metric set
    Rule,
    /// Fewer than two distinct non-missing values
    Degenerate,
    /// Neither text, labelled, nor numeric
    Unusable,
}

/// Classification of a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnClass {
    pub name: String,
    pub kind: VariableKind,
    /// Distinct non-missing values
    pub distinct: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ExclusionReason>,
    /// Categorical because the label dictionary covers it
    pub labelled: bool,
}

/// Classification of every dataset column, in dataset column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariableClassification {
    columns: Vec<ColumnClass>,
}

impl VariableClassification {
    pub fn columns(&self) -> &[ColumnClass] {
        &self.columns
    }

    pub fn get(&self, name: &str) -> Option<&ColumnClass> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<VariableKind> {
        self.get(name).map(|c| c.kind)
    }

    fn names_of(&self, kind: VariableKind) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn categorical(&self) -> Vec<&str> {
        self.names_of(VariableKind::Categorical)
    }

    pub fn numeric(&self) -> Vec<&str> {
        self.names_of(VariableKind::Numeric)
    }

    pub fn excluded(&self) -> Vec<&str> {
        self.names_of(VariableKind::Excluded)
    }
}

/// Classify every column of the dataset.
///
/// Columns are inspected in parallel; results come back in column order so the
/// classification is identical across runs.
pub fn classify_variables(
    df: &DataFrame,
    dictionary: &LabelDictionary,
    rules: &RuleTable,
) -> Result<VariableClassification> {
    let columns: Vec<ColumnClass> = df
        .get_columns()
        .par_iter()
        .map(|col| classify_column(col, dictionary, rules))
        .collect::<Result<Vec<_>>>()?;

    for class in &columns {
        debug!(
            column = %class.name,
            kind = ?class.kind,
            distinct = class.distinct,
            reason = ?class.reason,
            "classified column"
        );
    }

    Ok(VariableClassification { columns })
}

fn classify_column(
    col: &Column,
    dictionary: &LabelDictionary,
    rules: &RuleTable,
) -> Result<ColumnClass> {
    let name = col.name().to_string();

    if rules.is_excluded_column(&name) {
        return Ok(ColumnClass {
            name,
            kind: VariableKind::Excluded,
            distinct: 0,
            reason: Some(ExclusionReason::Rule),
            labelled: false,
        });
    }

    let distinct = distinct_count(col)?;
    let labelled = dictionary.contains(&name);

    let (kind, reason) = if distinct <= 1 {
        (VariableKind::Excluded, Some(ExclusionReason::Degenerate))
    } else if labelled || is_text_dtype(col.dtype()) {
        (VariableKind::Categorical, None)
    } else if col.dtype().is_primitive_numeric() {
        (VariableKind::Numeric, None)
    } else {
        (VariableKind::Excluded, Some(ExclusionReason::Unusable))
    };

    Ok(ColumnClass {
        name,
        kind,
        distinct,
        reason,
        labelled,
    })
}
