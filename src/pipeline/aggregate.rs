//! Range filtering and per-group mean of the metric column

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One aggregation query: a group variable and an inclusive range on the
/// filter column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationRequest {
    pub group: String,
    pub low: f64,
    pub high: f64,
}

impl AggregationRequest {
    pub fn new(group: impl Into<String>, range: (f64, f64)) -> Self {
        Self {
            group: group.into(),
            low: range.0,
            high: range.1,
        }
    }

    /// True when `value` lies within `[low, high]`. An inverted range contains
    /// nothing.
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Mean metric value of one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    /// Resolved group label
    pub label: String,
    /// Arithmetic mean of the non-missing metric values
    pub value: f64,
    /// Rows contributing to the mean
    pub count: usize,
}

/// Indices of rows whose filter value lies within the request's range.
/// Rows with a missing filter value never match.
pub fn filter_rows(filter_values: &[Option<f64>], request: &AggregationRequest) -> Vec<usize> {
    filter_values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| match v {
            Some(x) if request.contains(*x) => Some(i),
            _ => None,
        })
        .collect()
}

/// Group `metric` by `labels` and compute the mean per group.
///
/// `labels` and `metric` are parallel slices. Missing metric values are
/// ignored; a group with no metric values at all is left out. Groups are
/// ordered by mean descending, ties keeping the order in which labels first
/// appear.
pub fn group_means(labels: &[String], metric: &[Option<f64>]) -> Vec<GroupMean> {
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();

    for (label, value) in labels.iter().zip(metric) {
        let entry = sums.entry(label.as_str()).or_insert_with(|| {
            order.push(label.as_str());
            (0.0, 0)
        });
        if let Some(v) = value {
            entry.0 += v;
            entry.1 += 1;
        }
    }

    let mut groups: Vec<GroupMean> = order
        .into_iter()
        .filter_map(|label| {
            let (sum, count) = sums[label];
            (count > 0).then(|| GroupMean {
                label: label.to_string(),
                value: sum / count as f64,
                count,
            })
        })
        .collect();

    // Stable sort keeps first-appearance order among equal means
    groups.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    groups
}
