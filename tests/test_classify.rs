//! Tests for variable classification and the selectable pool

use polars::prelude::*;
use unioutcomes::pipeline::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn college_columns() -> Vec<String> {
    create_college_dataframe()
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn college_classification() -> VariableClassification {
    let df = create_college_dataframe();
    let dictionary = LabelDictionary::build(&create_dictionary_entries(), &college_columns());
    classify_variables(&df, &dictionary, &RuleTable::default()).unwrap()
}

#[test]
fn test_every_column_lands_in_exactly_one_bucket() {
    let df = create_college_dataframe();
    let classification = college_classification();

    assert_eq!(classification.columns().len(), df.width());

    let categorical = classification.categorical();
    let numeric = classification.numeric();
    let excluded = classification.excluded();
    assert_eq!(
        categorical.len() + numeric.len() + excluded.len(),
        df.width(),
        "Buckets should partition the columns"
    );

    for name in df.get_column_names() {
        let hits = [&categorical, &numeric, &excluded]
            .iter()
            .filter(|bucket| bucket.contains(&name.as_str()))
            .count();
        assert_eq!(hits, 1, "Column {} should be in exactly one bucket", name);
    }
}

#[test]
fn test_identifier_and_metric_columns_are_excluded_by_rule() {
    let classification = college_classification();

    for name in ["id", "name", "metric"] {
        let class = classification.get(name).unwrap();
        assert_eq!(class.kind, VariableKind::Excluded);
        assert_eq!(class.reason, Some(ExclusionReason::Rule));
    }
}

#[test]
fn test_constant_column_is_degenerate() {
    let classification = college_classification();
    let class = classification.get("flag_constant").unwrap();

    assert_eq!(class.kind, VariableKind::Excluded);
    assert_eq!(class.reason, Some(ExclusionReason::Degenerate));
    assert_eq!(class.distinct, 1);
}

#[test]
fn test_dictionary_and_text_columns_are_categorical() {
    let classification = college_classification();

    // Text column
    assert_eq!(classification.kind_of("state"), Some(VariableKind::Categorical));
    // Integer-coded columns covered by the dictionary
    assert_eq!(classification.kind_of("ownership"), Some(VariableKind::Categorical));
    assert_eq!(classification.kind_of("region"), Some(VariableKind::Categorical));
    assert_eq!(
        classification.kind_of("carnegie_basic"),
        Some(VariableKind::Categorical)
    );
    assert!(classification.get("region").unwrap().labelled);
    assert!(!classification.get("state").unwrap().labelled);
}

#[test]
fn test_unlabelled_numeric_columns_are_numeric() {
    let classification = college_classification();

    for name in [
        "admission_rate.overall",
        "pct_pell",
        "locale_size",
        "usnews.median_rank",
    ] {
        assert_eq!(
            classification.kind_of(name),
            Some(VariableKind::Numeric),
            "{} should be numeric",
            name
        );
    }
    // Missing cells do not count as a value
    assert_eq!(classification.get("pct_pell").unwrap().distinct, 6);
}

#[test]
fn test_classification_is_deterministic() {
    let first = college_classification();
    let second = college_classification();
    assert_eq!(first, second);

    let first = LabelDictionary::build(&create_dictionary_entries(), &college_columns());
    let second = LabelDictionary::build(&create_dictionary_entries(), &college_columns());
    assert_eq!(first, second);
}

#[test]
fn test_renamed_metric_column_is_never_selectable() {
    let df = df! {
        "state" => ["CA", "NY", "TX", "CA", "NY", "TX"],
        "usnews.median_rank" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0],
        "earnings" => [30.0f64, 45.0, 52.5, 61.0, 70.0, 88.0],
    }
    .unwrap();
    let rules = RuleTable {
        metric_column: "earnings".to_string(),
        ..RuleTable::default()
    };
    let ctx = DashboardContext::build(df, &[], rules).unwrap();

    let class = ctx.classification().get("earnings").unwrap();
    assert_eq!(class.kind, VariableKind::Excluded);
    assert_eq!(class.reason, Some(ExclusionReason::Rule));
    assert!(ctx.binned_variables().iter().all(|b| b.base != "earnings"));
    assert!(!ctx.is_selectable("earnings_binned"));

    let groups = ctx.compute_aggregation("state", (1.0, 6.0)).unwrap();
    assert_eq!(labels_of(&groups), vec!["TX", "NY", "CA"]);
}

#[test]
fn test_selectable_pool_order_and_prefix_filter() {
    let ctx = build_college_context();
    let names: Vec<&str> = ctx
        .selectable_variables()
        .iter()
        .map(|v| v.name.as_str())
        .collect();

    assert_eq!(
        names,
        vec![
            "state",
            "ownership",
            "region",
            "admission_rate.overall_binned",
            "pct_pell_binned",
            "usnews.median_rank_binned",
        ]
    );
    assert!(!ctx.is_selectable("carnegie_basic"));
    assert!(!ctx.is_selectable("locale_size"));
    assert!(!ctx.is_selectable("admission_rate.overall"));
}

#[test]
fn test_selectable_display_names_and_kinds() {
    let ctx = build_college_context();
    let find = |name: &str| {
        ctx.selectable_variables()
            .iter()
            .find(|v| v.name == name)
            .cloned()
            .unwrap()
    };

    let ownership = find("ownership");
    assert_eq!(ownership.display_name, "Ownership Type");
    assert_eq!(ownership.kind, SelectableKind::Dictionary);

    let state = find("state");
    assert_eq!(state.kind, SelectableKind::Text);

    let region = find("region");
    assert_eq!(region.display_name, "Region");
    assert_eq!(region.kind, SelectableKind::Dictionary);

    let admission = find("admission_rate.overall_binned");
    assert_eq!(admission.display_name, "Admission Rate");
    assert_eq!(admission.kind, SelectableKind::Binned);

    let pell = find("pct_pell_binned");
    assert_eq!(pell.display_name, "Pct Pell Binned");
}

#[test]
fn test_prefix_rule_can_be_disabled() {
    let rules = RuleTable {
        excluded_prefixes: Vec::new(),
        ..RuleTable::default()
    };
    let ctx =
        DashboardContext::build(create_college_dataframe(), &create_dictionary_entries(), rules)
            .unwrap();

    assert!(ctx.is_selectable("carnegie_basic"));
}
