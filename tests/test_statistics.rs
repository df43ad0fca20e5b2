//! Tests for grouped means, descriptive statistics and histograms

use paystat::pipeline::{
    describe, group_mean, histogram, inner_join, AnalyticsError, BinRule, Column, ColumnType,
    Dataset, GroupOrder, Operation, Schema, Value,
};

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_describe_worked_example() {
    let summary = describe(&common::compensation(), "salary").unwrap();

    assert_eq!(summary.count, 3);
    assert!((summary.mean - 60000.0).abs() < 1e-9);
    assert!((summary.std - 10000.0).abs() < 1e-9);
    assert_eq!(summary.min, 50000.0);
    assert_eq!(summary.q25, 55000.0);
    assert_eq!(summary.q50, 60000.0);
    assert_eq!(summary.q75, 65000.0);
    assert_eq!(summary.max, 70000.0);
}

#[test]
fn test_describe_quartiles_are_ordered() {
    let (_, compensation) = common::random_tables(10, 257, 13);
    let s = describe(&compensation, "salary").unwrap();

    assert!(s.min <= s.q25);
    assert!(s.q25 <= s.q50);
    assert!(s.q50 <= s.q75);
    assert!(s.q75 <= s.max);
    assert!(s.std >= 0.0);
    assert_eq!(s.count, 257);
}

#[test]
fn test_describe_single_row_std_undefined() {
    let table = Dataset::new([("salary", Column::from(vec![42.0f64]))]).unwrap();
    let s = describe(&table, "salary").unwrap();

    assert_eq!(s.count, 1);
    assert_eq!(s.mean, 42.0);
    assert!(s.std.is_nan());
    assert_eq!(s.q25, 42.0);
}

#[test]
fn test_describe_skips_nulls() {
    let table = Dataset::new([(
        "salary",
        Column::Float(vec![Some(10.0), None, Some(30.0)]),
    )])
    .unwrap();
    let s = describe(&table, "salary").unwrap();

    assert_eq!(s.count, 2);
    assert_eq!(s.mean, 20.0);
}

#[test]
fn test_describe_errors() {
    let comp = common::compensation();
    assert_eq!(
        describe(&comp, "wage").unwrap_err(),
        AnalyticsError::UnknownColumn {
            operation: Operation::Describe,
            column: "wage".to_string(),
        }
    );

    let named = Dataset::new([("name", Column::from(vec!["Ada"]))]).unwrap();
    assert!(matches!(
        describe(&named, "name").unwrap_err(),
        AnalyticsError::TypeMismatch { operation: Operation::Describe, .. }
    ));

    let empty = common::empty_compensation();
    assert!(matches!(
        describe(&empty, "salary").unwrap_err(),
        AnalyticsError::EmptyColumn { .. }
    ));
}

#[test]
fn test_group_mean_over_merged_table() {
    let merged = inner_join(&common::employees(), &common::compensation(), "id").unwrap();
    let agg = group_mean(&merged, "department", "salary", GroupOrder::Sorted).unwrap();

    assert_eq!(agg.labels(), vec!["Eng", "Sales"]);
    assert_eq!(agg.means(), vec![55000.0, 70000.0]);
    assert_eq!(agg.iter().map(|g| g.count).collect::<Vec<_>>(), vec![2, 1]);
}

#[test]
fn test_group_mean_integer_keys_sorted_numerically() {
    let table = Dataset::new([
        ("level", Column::from(vec![10i64, 2, 10, 1])),
        ("salary", Column::from(vec![4.0f64, 2.0, 6.0, 1.0])),
    ])
    .unwrap();

    let agg = group_mean(&table, "level", "salary", GroupOrder::Sorted).unwrap();
    let keys: Vec<Value> = agg.iter().map(|g| g.key.clone()).collect();
    assert_eq!(keys, vec![Value::Int(1), Value::Int(2), Value::Int(10)]);
    assert_eq!(agg.get_value(&Value::Int(10)), Some(5.0));
}

#[test]
fn test_group_mean_all_null_keys() {
    let table = Dataset::new([
        ("department", Column::Str(vec![None, None])),
        ("salary", Column::from(vec![1.0f64, 2.0])),
    ])
    .unwrap();

    assert_eq!(
        group_mean(&table, "department", "salary", GroupOrder::Sorted).unwrap_err(),
        AnalyticsError::EmptyGroupColumn {
            column: "department".to_string()
        }
    );
}

#[test]
fn test_group_mean_empty_table_is_empty_mapping() {
    let table = Dataset::empty(&Schema::new([
        ("department", ColumnType::Str),
        ("salary", ColumnType::Float),
    ]));

    let agg = group_mean(&table, "department", "salary", GroupOrder::Sorted).unwrap();
    assert!(agg.is_empty());
}

#[test]
fn test_group_mean_rejects_text_values() {
    let table = Dataset::new([
        ("department", Column::from(vec!["Eng"])),
        ("salary", Column::from(vec!["lots"])),
    ])
    .unwrap();

    assert!(matches!(
        group_mean(&table, "department", "salary", GroupOrder::Sorted).unwrap_err(),
        AnalyticsError::TypeMismatch { found: ColumnType::Str, .. }
    ));
}

#[test]
fn test_histogram_counts_every_value() {
    let (_, compensation) = common::random_tables(10, 300, 17);
    let hist = histogram(&compensation, "salary", BinRule::Sturges).unwrap();

    // ceil(log2(300)) + 1
    assert_eq!(hist.bins.len(), 10);
    assert_eq!(hist.total(), 300);
    for pair in hist.bins.windows(2) {
        assert_eq!(pair[0].right, pair[1].left);
    }
}

#[test]
fn test_histogram_fixed_bins() {
    let table = Dataset::new([("salary", Column::from(vec![0.0f64, 1.0, 2.0, 3.0, 4.0]))]).unwrap();
    let hist = histogram(&table, "salary", BinRule::Fixed(2)).unwrap();

    assert_eq!(hist.bins.len(), 2);
    assert_eq!(hist.bins[0].count, 2);
    // Last bin is closed on the right
    assert_eq!(hist.bins[1].count, 3);
}

#[test]
fn test_histogram_empty_column() {
    let err = histogram(&common::empty_compensation(), "salary", BinRule::Sturges).unwrap_err();
    assert!(matches!(err, AnalyticsError::EmptyColumn { operation: Operation::Histogram, .. }));
}
