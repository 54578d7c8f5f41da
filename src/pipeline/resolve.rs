//! Query-time resolution of raw group values into display labels

use super::dictionary::{LabelDictionary, UNKNOWN_LABEL};
use super::rules::{Recode, RuleTable};

/// How the labels of a group variable are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStrategy<'a> {
    /// A rule-table recode replaces the raw codes
    Recode(&'a Recode),
    /// Raw codes are looked up in the label dictionary under this variable
    Dictionary(&'a str),
    /// Raw values (text or interval labels) are used as they are
    Raw,
}

/// Maps raw group values to display labels using the dictionary and the rule
/// table's recodes.
#[derive(Debug, Clone, Copy)]
pub struct LabelResolver<'a> {
    dictionary: &'a LabelDictionary,
    rules: &'a RuleTable,
}

impl<'a> LabelResolver<'a> {
    pub fn new(dictionary: &'a LabelDictionary, rules: &'a RuleTable) -> Self {
        Self { dictionary, rules }
    }

    /// Pick the labelling strategy for a group variable.
    ///
    /// `derived_from` names the base variable when `group` is a binned
    /// derivative. Interval labels are never mapped through the dictionary,
    /// which is keyed by the base variable's raw codes.
    pub fn strategy(&self, group: &'a str, derived_from: Option<&'a str>) -> LabelStrategy<'a> {
        if let Some(recode) = self.rules.recode_for(group) {
            return LabelStrategy::Recode(recode);
        }
        match derived_from {
            None if self.dictionary.contains(group) => LabelStrategy::Dictionary(group),
            _ => LabelStrategy::Raw,
        }
    }

    /// Resolve one label per raw value. Every value gets a label; values the
    /// dictionary does not cover, and missing raw values, become "Unknown".
    pub fn resolve(&self, strategy: LabelStrategy<'_>, raw: &[Option<String>]) -> Vec<String> {
        raw.iter()
            .map(|value| self.resolve_one(strategy, value.as_deref()))
            .collect()
    }

    pub fn resolve_one(&self, strategy: LabelStrategy<'_>, raw: Option<&str>) -> String {
        match strategy {
            LabelStrategy::Recode(recode) => recode.apply(raw),
            LabelStrategy::Dictionary(variable) => self.dictionary.lookup(variable, raw).to_string(),
            LabelStrategy::Raw => raw.unwrap_or(UNKNOWN_LABEL).to_string(),
        }
    }
}
