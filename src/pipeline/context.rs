//! Immutable query context built once at startup
//!
//! [`DashboardContext::build`] runs dictionary construction, classification and
//! binning over the loaded dataset. The result is read-only: queries borrow it
//! and never mutate it, so one context can serve any number of threads.

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use super::aggregate::{filter_rows, group_means, AggregationRequest, GroupMean};
use super::binning::{bin_numeric_variables, BinnedVariable};
use super::classify::{classify_variables, VariableClassification, VariableKind};
use super::dictionary::{DictionaryEntry, LabelDictionary};
use super::error::PipelineError;
use super::loader::validate_required_columns;
use super::resolve::LabelResolver;
use super::rules::RuleTable;
use super::values::{column_to_f64, column_to_keys};

/// Where a selectable variable's groups come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectableKind {
    /// Text column used as is
    Text,
    /// Coded column labelled through the dictionary (or a recode)
    Dictionary,
    /// Interval-valued derivative of a numeric column
    Binned,
}

/// One entry of the selectable-variable listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectableVariable {
    /// Internal column name used in queries
    pub name: String,
    /// Display label
    pub display_name: String,
    pub kind: SelectableKind,
}

/// Minimum and maximum of the filter column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterBounds {
    pub min: f64,
    pub max: f64,
}

/// Read-only state shared by every query
#[derive(Debug, Clone)]
pub struct DashboardContext {
    data: DataFrame,
    dictionary: LabelDictionary,
    classification: VariableClassification,
    binned: Vec<BinnedVariable>,
    selectable: Vec<SelectableVariable>,
    filter_values: Vec<Option<f64>>,
    metric_values: Vec<Option<f64>>,
    bounds: Option<FilterBounds>,
    rules: RuleTable,
}

impl DashboardContext {
    /// Build the context: label dictionary, classification, binned
    /// derivatives and the selectable pool.
    ///
    /// Fails when the filter or metric column is missing or non-numeric.
    pub fn build(
        mut data: DataFrame,
        dictionary_entries: &[DictionaryEntry],
        rules: RuleTable,
    ) -> Result<Self> {
        rules.validate()?;
        validate_required_columns(&data, &rules)?;

        let columns: Vec<String> = data
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let dictionary = LabelDictionary::build(dictionary_entries, &columns);
        let classification = classify_variables(&data, &dictionary, &rules)?;

        let mut binned = Vec::new();
        for (variable, column) in bin_numeric_variables(&data, &classification, &rules)? {
            debug!(
                variable = %variable.base,
                derived = %variable.name,
                bins = variable.bin_count(),
                "binned numeric variable"
            );
            data.with_column(column)?;
            binned.push(variable);
        }

        let selectable = selectable_pool(&classification, &binned, &rules);

        let filter_values = column_to_f64(data.column(&rules.filter_column)?)?;
        let metric_values = column_to_f64(data.column(&rules.metric_column)?)?;
        let bounds = bounds_of(&filter_values);

        info!(
            categorical = classification.categorical().len(),
            numeric = classification.numeric().len(),
            excluded = classification.excluded().len(),
            binned = binned.len(),
            selectable = selectable.len(),
            "context ready"
        );

        Ok(Self {
            data,
            dictionary,
            classification,
            binned,
            selectable,
            filter_values,
            metric_values,
            bounds,
            rules,
        })
    }

    /// Mean metric per resolved group label for rows whose filter value lies in
    /// `range` (inclusive), ordered by mean descending.
    pub fn compute_aggregation(&self, group: &str, range: (f64, f64)) -> Result<Vec<GroupMean>> {
        self.execute(&AggregationRequest::new(group, range))
    }

    /// Run an aggregation request.
    ///
    /// The group variable must be one of [`Self::selectable_variables`]. An
    /// empty or inverted range yields an empty result.
    pub fn execute(&self, request: &AggregationRequest) -> Result<Vec<GroupMean>> {
        if !self.is_selectable(&request.group) {
            return Err(PipelineError::UnknownGroupVariable {
                name: request.group.clone(),
                available: self.selectable.iter().map(|v| v.name.clone()).collect(),
            }
            .into());
        }

        let rows = filter_rows(&self.filter_values, request);
        if rows.is_empty() {
            debug!(group = %request.group, low = request.low, high = request.high, "no rows in range");
            return Ok(Vec::new());
        }

        let raw = column_to_keys(self.data.column(&request.group)?)?;
        let resolver = LabelResolver::new(&self.dictionary, &self.rules);
        let strategy = resolver.strategy(&request.group, self.derived_from(&request.group));

        let labels: Vec<String> = rows
            .iter()
            .map(|&i| resolver.resolve_one(strategy, raw[i].as_deref()))
            .collect();
        let metric: Vec<Option<f64>> = rows.iter().map(|&i| self.metric_values[i]).collect();

        let groups = group_means(&labels, &metric);
        debug!(
            group = %request.group,
            rows = rows.len(),
            groups = groups.len(),
            "aggregation complete"
        );
        Ok(groups)
    }

    /// Variables a consumer may group by, with display labels
    pub fn selectable_variables(&self) -> &[SelectableVariable] {
        &self.selectable
    }

    pub fn is_selectable(&self, name: &str) -> bool {
        self.selectable.iter().any(|v| v.name == name)
    }

    /// Minimum and maximum of the filter column, `None` when it has no values
    pub fn filter_bounds(&self) -> Option<FilterBounds> {
        self.bounds
    }

    /// Base variable of a binned derivative
    pub fn derived_from(&self, name: &str) -> Option<&str> {
        self.binned
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.base.as_str())
    }

    /// Chart caption for a query, e.g. `Income Score by State (Rank 1–50)`
    pub fn chart_title(&self, group: &str, range: (f64, f64)) -> String {
        let group_label = self
            .rules
            .display_names
            .get(group)
            .map(String::as_str)
            .unwrap_or(group);
        format!(
            "{} by {} ({} {}–{})",
            self.rules.metric_label, group_label, self.rules.filter_label, range.0, range.1
        )
    }

    pub fn binned_variables(&self) -> &[BinnedVariable] {
        &self.binned
    }

    pub fn classification(&self) -> &VariableClassification {
        &self.classification
    }

    pub fn dictionary(&self) -> &LabelDictionary {
        &self.dictionary
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Dataset with binned columns appended
    pub fn data(&self) -> &DataFrame {
        &self.data
    }
}

/// Categorical columns in dataset order, then binned derivatives, minus names
/// carrying an excluded prefix.
fn selectable_pool(
    classification: &VariableClassification,
    binned: &[BinnedVariable],
    rules: &RuleTable,
) -> Vec<SelectableVariable> {
    let categorical = classification
        .columns()
        .iter()
        .filter(|c| c.kind == VariableKind::Categorical)
        .map(|c| {
            let kind = if c.labelled || rules.recode_for(&c.name).is_some() {
                SelectableKind::Dictionary
            } else {
                SelectableKind::Text
            };
            (c.name.as_str(), kind)
        });
    let derived = binned
        .iter()
        .map(|b| (b.name.as_str(), SelectableKind::Binned));

    categorical
        .chain(derived)
        .filter(|(name, _)| {
            let excluded = rules.has_excluded_prefix(name);
            if excluded {
                debug!(variable = %name, "excluded by prefix rule");
            }
            !excluded
        })
        .map(|(name, kind)| SelectableVariable {
            name: name.to_string(),
            display_name: rules.display_name(name),
            kind,
        })
        .collect()
}

fn bounds_of(values: &[Option<f64>]) -> Option<FilterBounds> {
    values.iter().flatten().fold(None, |acc, &v| match acc {
        None => Some(FilterBounds { min: v, max: v }),
        Some(b) => Some(FilterBounds {
            min: b.min.min(v),
            max: b.max.max(v),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DashboardContext>();
    }

    #[test]
    fn test_bounds_of_skips_missing() {
        let bounds = bounds_of(&[None, Some(3.0), Some(-1.0), None, Some(7.5)]).unwrap();
        assert_eq!(bounds.min, -1.0);
        assert_eq!(bounds.max, 7.5);
        assert!(bounds_of(&[None, None]).is_none());
    }

    #[test]
    fn test_chart_title_uses_override_or_raw_name() {
        let df = df! {
            "state" => ["CA", "NY"],
            "usnews.median_rank" => [1.0f64, 2.0],
            "metric" => [10.0f64, 20.0],
        }
        .unwrap();
        let ctx = DashboardContext::build(df, &[], RuleTable::default()).unwrap();
        assert_eq!(ctx.chart_title("state", (1.0, 50.0)), "Income Score by State (Rank 1–50)");
        assert_eq!(
            ctx.chart_title("locale", (1.0, 50.0)),
            "Income Score by locale (Rank 1–50)"
        );
    }
}
