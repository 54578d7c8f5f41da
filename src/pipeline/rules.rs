//! Declarative business rules consulted by the classifier, binning engine and
//! label resolver.
//!
//! Every column exclusion, prefix filter, recode and display-name override lives
//! in a single [`RuleTable`] so the core algorithms stay rule-agnostic. The
//! defaults reproduce the university outcomes dashboard; a JSON file can
//! override any subset of fields.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::error::PipelineError;

/// How a variable's raw codes are turned into group labels, bypassing the
/// label dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recode {
    /// Two-way recode: `code` maps to `matched`, anything else (including a
    /// missing value) maps to `otherwise`.
    Binary {
        code: String,
        matched: String,
        otherwise: String,
    },
}

impl Recode {
    /// Apply the recode to a raw stringified value.
    pub fn apply(&self, raw: Option<&str>) -> String {
        match self {
            Recode::Binary {
                code,
                matched,
                otherwise,
            } => {
                if raw == Some(code.as_str()) {
                    matched.clone()
                } else {
                    otherwise.clone()
                }
            }
        }
    }
}

/// Column names of the auxiliary data dictionary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryColumns {
    pub variable: String,
    pub value: String,
    pub label: String,
}

impl Default for DictionaryColumns {
    fn default() -> Self {
        Self {
            variable: "developer-friendly name".to_string(),
            value: "VALUE".to_string(),
            label: "LABEL".to_string(),
        }
    }
}

/// Explicit table of the dashboard's business rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTable {
    /// Numeric column the range predicate applies to
    pub filter_column: String,
    /// Numeric column whose mean is reported per group
    pub metric_column: String,
    /// Display name of the metric in titles and tables
    pub metric_label: String,
    /// Short display name of the filter column in titles
    pub filter_label: String,
    /// Identifier and metric columns never offered for grouping
    pub excluded_columns: Vec<String>,
    /// Name prefixes removed from the selectable pool after binning
    pub excluded_prefixes: Vec<String>,
    /// Suffix appended to a numeric variable's name for its binned derivative
    pub binned_suffix: String,
    /// Variable-specific recodes that bypass the label dictionary
    pub recodes: BTreeMap<String, Recode>,
    /// Display-name overrides for the selectable-variable listing
    pub display_names: BTreeMap<String, String>,
    /// Field names of the dictionary table
    pub dictionary_columns: DictionaryColumns,
    /// Initial query range offered to consumers
    pub default_range: (f64, f64),
    /// Lower bound on the number of bins for a binned variable
    pub min_bins: u32,
    /// Upper bound on the number of bins for a binned variable
    pub max_bins: u32,
    /// Numeric variables need more distinct values than this to be binned
    pub min_binning_cardinality: usize,
}

impl Default for RuleTable {
    fn default() -> Self {
        let mut recodes = BTreeMap::new();
        recodes.insert(
            "ownership".to_string(),
            Recode::Binary {
                code: "1".to_string(),
                matched: "Public".to_string(),
                otherwise: "Private".to_string(),
            },
        );

        let display_names = [
            ("state", "State"),
            ("ownership", "Ownership Type"),
            ("degrees_awarded.highest", "Highest Degree Awarded"),
            ("admission_rate.overall_binned", "Admission Rate"),
            ("demographics.race_ethnicity.white_binned", "White Student Share"),
            ("demographics.race_ethnicity.black_binned", "Black Student Share"),
            ("demographics.race_ethnicity.hispanic_binned", "Hispanic Student Share"),
            ("demographics.race_ethnicity.asian_binned", "Asian Student Share"),
            ("completion_rate_4yr_150nt_binned", "Completion Rate"),
            ("retention_rate.four_year.full_time_binned", "Retention Rate"),
            ("usnews.median_rank_binned", "US News Rank"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            filter_column: "usnews.median_rank".to_string(),
            metric_column: "metric".to_string(),
            metric_label: "Income Score".to_string(),
            filter_label: "Rank".to_string(),
            excluded_columns: vec!["id".to_string(), "name".to_string(), "metric".to_string()],
            excluded_prefixes: vec!["carnegie_".to_string()],
            binned_suffix: "_binned".to_string(),
            recodes,
            display_names,
            dictionary_columns: DictionaryColumns::default(),
            default_range: (1.0, 50.0),
            min_bins: 4,
            max_bins: 6,
            min_binning_cardinality: 4,
        }
    }
}

impl RuleTable {
    /// Load a rule table from a JSON file. Fields absent from the file keep
    /// their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file: {}", path.display()))?;
        let rules: RuleTable = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse rules file: {}", path.display()))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Check internal consistency of the table.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.min_bins > self.max_bins {
            return Err(PipelineError::InvalidBinBounds {
                min: self.min_bins,
                max: self.max_bins,
            });
        }
        Ok(())
    }

    /// True for identifier/metric columns that never take part in grouping.
    /// The configured metric column is always excluded.
    pub fn is_excluded_column(&self, name: &str) -> bool {
        name == self.metric_column || self.excluded_columns.iter().any(|c| c == name)
    }

    /// True when the name carries an institutional-grouping prefix.
    pub fn has_excluded_prefix(&self, name: &str) -> bool {
        self.excluded_prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }

    /// Recode registered for a group variable, if any.
    pub fn recode_for(&self, variable: &str) -> Option<&Recode> {
        self.recodes.get(variable)
    }

    /// Name under which a numeric variable's binned derivative is published.
    pub fn binned_name(&self, base: &str) -> String {
        format!("{}{}", base, self.binned_suffix)
    }

    /// Display label for a variable: the override table first, then a
    /// title-cased rendering of the internal name.
    pub fn display_name(&self, variable: &str) -> String {
        self.display_names
            .get(variable)
            .cloned()
            .unwrap_or_else(|| title_case(&variable.replace('_', " ")))
    }
}

/// Title-case a string: a cased letter is upper-cased when the preceding
/// character is not a letter, lower-cased otherwise.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}
