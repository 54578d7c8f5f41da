//! Label dictionary: variable name → raw value → display label

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

/// Label returned for a value the dictionary does not cover.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One row of the auxiliary data dictionary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// Developer-facing variable name
    pub variable: Option<String>,
    /// Raw value, already rendered as a lookup key
    pub value: Option<String>,
    /// Display label
    pub label: Option<String>,
}

impl DictionaryEntry {
    pub fn new(variable: &str, value: &str, label: &str) -> Self {
        Self {
            variable: Some(variable.to_string()),
            value: Some(value.to_string()),
            label: Some(label.to_string()),
        }
    }
}

/// Immutable mapping from variable name to its value labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelDictionary {
    labels: BTreeMap<String, BTreeMap<String, String>>,
}

impl LabelDictionary {
    /// Build the dictionary from raw entries.
    ///
    /// Only entries whose variable is one of `dataset_columns` and which carry
    /// both a value and a label participate. When the same value appears more
    /// than once for a variable, the later entry wins.
    pub fn build(entries: &[DictionaryEntry], dataset_columns: &[String]) -> Self {
        let columns: HashSet<&str> = dataset_columns.iter().map(String::as_str).collect();
        let mut labels: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut skipped = 0usize;

        for entry in entries {
            let (Some(variable), Some(value), Some(label)) =
                (&entry.variable, &entry.value, &entry.label)
            else {
                skipped += 1;
                continue;
            };
            if !columns.contains(variable.as_str()) {
                skipped += 1;
                continue;
            }
            labels
                .entry(variable.clone())
                .or_default()
                .insert(value.clone(), label.clone());
        }

        debug!(
            variables = labels.len(),
            skipped, "built label dictionary"
        );
        Self { labels }
    }

    /// True when the variable has at least one labelled value.
    pub fn contains(&self, variable: &str) -> bool {
        self.labels.contains_key(variable)
    }

    /// Label for a raw value, or [`UNKNOWN_LABEL`] when the variable or value
    /// is not covered.
    pub fn lookup(&self, variable: &str, raw: Option<&str>) -> &str {
        raw.and_then(|r| self.labels.get(variable).and_then(|m| m.get(r)))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// Value labels for one variable.
    pub fn labels_for(&self, variable: &str) -> Option<&BTreeMap<String, String>> {
        self.labels.get(variable)
    }

    /// Names of all labelled variables, sorted.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
