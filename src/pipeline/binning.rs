//! Equal-width binning of numeric variables into derived categorical variables
//!
//! The number of bins grows with the bit length of a variable's cardinality and
//! is clamped to the rule table's bounds (4 to 6 by default). Intervals are
//! left-closed `[lower, upper)`; the last upper edge is widened by 0.1% of the
//! range so the maximum value is covered.

use anyhow::Result;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use super::classify::{VariableClassification, VariableKind};
use super::rules::RuleTable;
use super::values::column_to_f64;

/// Widening applied to the outer edge, as a fraction of the value range
const EDGE_ADJUSTMENT: f64 = 0.001;

/// Significant digits used when rendering interval labels
const LABEL_PRECISION: i32 = 3;

/// One interval of a binned variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinInterval {
    /// Lower bound (inclusive)
    pub lower: f64,
    /// Upper bound (exclusive)
    pub upper: f64,
    /// Display label, e.g. `[1.0, 25.75)`
    pub label: String,
    /// Rows whose value falls in this interval
    pub count: usize,
}

/// A derived categorical variable built from a numeric base variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinnedVariable {
    /// Published name of the derived variable
    pub name: String,
    /// Numeric variable this one is derived from
    pub base: String,
    /// Distinct non-missing values of the base variable
    pub distinct: usize,
    /// Bin count before duplicate edges were collapsed
    pub requested_bins: u32,
    /// Ordered, contiguous, non-overlapping intervals
    pub intervals: Vec<BinInterval>,
}

impl BinnedVariable {
    /// Number of effective intervals
    pub fn bin_count(&self) -> usize {
        self.intervals.len()
    }

    /// Index of the interval containing `value`, if any.
    pub fn interval_index(&self, value: f64) -> Option<usize> {
        let pos = self.intervals.partition_point(|b| b.lower <= value);
        let idx = pos.checked_sub(1)?;
        (value < self.intervals[idx].upper).then_some(idx)
    }

    /// Label of the interval containing `value`, if any.
    pub fn label_for(&self, value: f64) -> Option<&str> {
        self.interval_index(value)
            .map(|i| self.intervals[i].label.as_str())
    }
}

/// Bin count for a variable with `distinct` values: its bit length, clamped to
/// `[min_bins, max_bins]`.
pub fn bin_count(distinct: usize, min_bins: u32, max_bins: u32) -> u32 {
    let bit_length = usize::BITS - distinct.leading_zeros();
    bit_length.clamp(min_bins, max_bins)
}

/// Equal-width edges over `[min, max]` with the outer edge widened so that
/// `max` falls inside the last left-closed interval. Duplicate edges are
/// collapsed.
pub fn equal_width_edges(min: f64, max: f64, bins: u32) -> Vec<f64> {
    let bins = bins.max(1);
    let (lo, hi) = if min == max {
        let pad = if min == 0.0 {
            EDGE_ADJUSTMENT
        } else {
            min.abs() * EDGE_ADJUSTMENT
        };
        (min - pad, max + pad)
    } else {
        (min, max)
    };

    let step = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| lo + step * i as f64).collect();
    if let Some(last) = edges.last_mut() {
        *last = hi;
        if min != max {
            *last += (hi - lo) * EDGE_ADJUSTMENT;
        }
        // The widening is lost when it is below the float spacing at `max`
        if *last <= max {
            *last = next_up(max);
        }
    }

    edges.dedup();
    edges
}

/// Smallest float greater than a finite `x`.
fn next_up(x: f64) -> f64 {
    if x == 0.0 {
        f64::from_bits(1)
    } else if x > 0.0 {
        f64::from_bits(x.to_bits() + 1)
    } else {
        f64::from_bits(x.to_bits() - 1)
    }
}

/// Round `x` to `precision` significant digits after the leading zeros of its
/// fractional part.
fn round_frac(x: f64, precision: i32) -> f64 {
    if !x.is_finite() || x == 0.0 {
        return x;
    }
    let digits = if x.trunc() == 0.0 {
        -(x.abs().log10().floor() as i32) - 1 + precision
    } else {
        precision
    };
    let scale = 10f64.powi(digits);
    (x * scale).round() / scale
}

/// Render interval labels, raising precision until every edge stays distinct.
pub fn interval_labels(edges: &[f64]) -> Vec<String> {
    let mut rounded: Vec<f64> = Vec::new();
    for precision in LABEL_PRECISION..20 {
        rounded = edges.iter().map(|&e| round_frac(e, precision)).collect();
        let mut sorted = rounded.clone();
        sorted.dedup();
        if sorted.len() == edges.len() {
            break;
        }
    }

    rounded
        .windows(2)
        .map(|w| format!("[{:?}, {:?})", w[0], w[1]))
        .collect()
}

/// Build the binned derivative of one numeric column.
///
/// Returns the variable description and the derived column, whose cells hold
/// interval labels (missing where the base value is missing).
pub fn bin_column(
    col: &Column,
    name: &str,
    distinct: usize,
    rules: &RuleTable,
) -> Result<(BinnedVariable, Column)> {
    let values = column_to_f64(col)?;

    let (min, max) = values
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let requested_bins = bin_count(distinct, rules.min_bins, rules.max_bins);
    let edges = if min.is_finite() && max.is_finite() {
        equal_width_edges(min, max, requested_bins)
    } else {
        Vec::new()
    };
    let labels = interval_labels(&edges);

    let mut binned = BinnedVariable {
        name: name.to_string(),
        base: col.name().to_string(),
        distinct,
        requested_bins,
        intervals: edges
            .windows(2)
            .zip(labels)
            .map(|(w, label)| BinInterval {
                lower: w[0],
                upper: w[1],
                label,
                count: 0,
            })
            .collect(),
    };

    let mut cells: Vec<Option<String>> = Vec::with_capacity(values.len());
    for value in &values {
        let idx = value.and_then(|v| binned.interval_index(v));
        if let Some(i) = idx {
            binned.intervals[i].count += 1;
        }
        cells.push(idx.map(|i| binned.intervals[i].label.clone()));
    }

    if binned.bin_count() < requested_bins as usize {
        debug!(
            variable = %binned.base,
            requested = requested_bins,
            effective = binned.bin_count(),
            "collapsed duplicate bin edges"
        );
    }

    Ok((binned, Column::new(name.into(), cells)))
}

/// Bin every numeric variable whose cardinality exceeds the rule table's
/// threshold. Results are returned in dataset column order.
pub fn bin_numeric_variables(
    df: &DataFrame,
    classification: &VariableClassification,
    rules: &RuleTable,
) -> Result<Vec<(BinnedVariable, Column)>> {
    let existing: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let candidates: Vec<(&str, usize, String)> = classification
        .columns()
        .iter()
        .filter(|c| c.kind == VariableKind::Numeric)
        .filter_map(|c| {
            if c.distinct <= rules.min_binning_cardinality {
                debug!(variable = %c.name, distinct = c.distinct, "too few values to bin");
                return None;
            }
            let binned_name = rules.binned_name(&c.name);
            if existing.contains(&binned_name) {
                warn!(
                    variable = %c.name,
                    derived = %binned_name,
                    "derived column name already taken, skipping"
                );
                return None;
            }
            Some((c.name.as_str(), c.distinct, binned_name))
        })
        .collect();

    candidates
        .par_iter()
        .map(|(base, distinct, binned_name)| {
            let col = df.column(base)?;
            bin_column(col, binned_name, *distinct, rules)
        })
        .collect()
}
