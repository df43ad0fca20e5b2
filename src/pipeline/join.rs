//! Inner key-based join between two datasets

use std::collections::HashMap;

use super::dataset::{Column, Dataset, Key};
use super::error::{AnalyticsError, JoinSide, Operation, Result};

/// Inner join `right` against `left` on equality of `key`.
///
/// Each output row carries every column of `right` followed by the non-key
/// columns of `left`. When a left non-key column shares a name with a right
/// column, the left value replaces the right one in place (left wins).
/// Callers should keep the two schemas disjoint apart from the key.
///
/// Output rows follow `right` order; a right row matching several left rows
/// is repeated once per match, in `left` order. Null keys never match.
pub fn inner_join(left: &Dataset, right: &Dataset, key: &str) -> Result<Dataset> {
    let left_key = left
        .column_for(Operation::Join, key)
        .map_err(|_| AnalyticsError::MissingKeyColumn {
            key: key.to_string(),
            side: JoinSide::Left,
        })?;
    let right_key = right
        .column_for(Operation::Join, key)
        .map_err(|_| AnalyticsError::MissingKeyColumn {
            key: key.to_string(),
            side: JoinSide::Right,
        })?;

    if left_key.dtype() != right_key.dtype() {
        return Err(AnalyticsError::TypeMismatch {
            operation: Operation::Join,
            column: key.to_string(),
            expected: "the left key type",
            found: right_key.dtype(),
        });
    }

    // Build: key -> left row positions, in left order
    let mut left_index: HashMap<Key<'_>, Vec<usize>> = HashMap::new();
    for pos in 0..left.size() {
        if let Some(k) = left_key.key(pos) {
            left_index.entry(k).or_default().push(pos);
        }
    }

    // Probe in right order
    let mut right_positions = Vec::new();
    let mut left_positions = Vec::new();
    for pos in 0..right.size() {
        let Some(k) = right_key.key(pos) else {
            continue;
        };
        if let Some(matches) = left_index.get(&k) {
            for &left_pos in matches {
                right_positions.push(pos);
                left_positions.push(left_pos);
            }
        }
    }

    let mut names: Vec<String> = Vec::with_capacity(right.width() + left.width());
    let mut columns: Vec<Column> = Vec::with_capacity(right.width() + left.width());
    for (name, column) in right.columns() {
        names.push(name.to_string());
        columns.push(column.take(&right_positions));
    }
    for (name, column) in left.columns().filter(|(name, _)| *name != key) {
        let gathered = column.take(&left_positions);
        match names.iter().position(|n| n == name) {
            Some(existing) => columns[existing] = gathered,
            None => {
                names.push(name.to_string());
                columns.push(gathered);
            }
        }
    }

    Ok(Dataset::from_parts(names, columns, right_positions.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::dataset::Value;

    fn employees() -> Dataset {
        Dataset::new([
            ("id", Column::from(vec![1i64, 2])),
            ("department", Column::from(vec!["Eng", "Sales"])),
        ])
        .unwrap()
    }

    fn salaries() -> Dataset {
        Dataset::new([
            ("id", Column::from(vec![1i64, 2, 1])),
            ("salary", Column::from(vec![50000.0f64, 70000.0, 60000.0])),
            ("bonus", Column::from(vec![1000.0f64, 2000.0, 1500.0])),
        ])
        .unwrap()
    }

    #[test]
    fn test_join_keeps_right_order_and_appends_left_columns() {
        let merged = inner_join(&employees(), &salaries(), "id").unwrap();

        assert_eq!(merged.size(), 3);
        assert_eq!(merged.column_names(), &["id", "salary", "bonus", "department"]);
        let departments: Vec<Value> = merged.rows().map(|r| r.get("department").unwrap()).collect();
        assert_eq!(
            departments,
            vec![Value::from("Eng"), Value::from("Sales"), Value::from("Eng")]
        );
    }

    #[test]
    fn test_unmatched_right_rows_are_dropped() {
        let right = Dataset::new([
            ("id", Column::from(vec![99i64, 2])),
            ("salary", Column::from(vec![1.0f64, 2.0])),
        ])
        .unwrap();
        let merged = inner_join(&employees(), &right, "id").unwrap();
        assert_eq!(merged.size(), 1);
        assert_eq!(merged.row(0).unwrap().get("id").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_duplicate_left_keys_multiply_rows_in_left_order() {
        let left = Dataset::new([
            ("id", Column::from(vec![1i64, 1])),
            ("department", Column::from(vec!["Eng", "Ops"])),
        ])
        .unwrap();
        let merged = inner_join(&left, &salaries(), "id").unwrap();

        // two right rows with id 1, each matching two left rows
        assert_eq!(merged.size(), 4);
        let departments: Vec<Value> = merged.rows().map(|r| r.get("department").unwrap()).collect();
        assert_eq!(
            departments,
            vec![
                Value::from("Eng"),
                Value::from("Ops"),
                Value::from("Eng"),
                Value::from("Ops")
            ]
        );
    }

    #[test]
    fn test_null_keys_never_match() {
        let left = Dataset::new([
            ("id", Column::Int(vec![None, Some(1)])),
            ("department", Column::from(vec!["Ghost", "Eng"])),
        ])
        .unwrap();
        let right = Dataset::new([
            ("id", Column::Int(vec![None, Some(1)])),
            ("salary", Column::from(vec![10.0f64, 20.0])),
        ])
        .unwrap();
        let merged = inner_join(&left, &right, "id").unwrap();
        assert_eq!(merged.size(), 1);
        assert_eq!(merged.row(0).unwrap().get("department").unwrap(), Value::from("Eng"));
    }

    #[test]
    fn test_left_value_wins_on_name_collision() {
        let left = Dataset::new([
            ("id", Column::from(vec![1i64])),
            ("note", Column::from(vec!["from-left"])),
        ])
        .unwrap();
        let right = Dataset::new([
            ("id", Column::from(vec![1i64])),
            ("note", Column::from(vec!["from-right"])),
        ])
        .unwrap();
        let merged = inner_join(&left, &right, "id").unwrap();
        assert_eq!(merged.column_names(), &["id", "note"]);
        assert_eq!(merged.row(0).unwrap().get("note").unwrap(), Value::from("from-left"));
    }

    #[test]
    fn test_missing_key_column_reports_side() {
        let no_key = Dataset::new([("department", Column::from(vec!["Eng"]))]).unwrap();

        let err = inner_join(&no_key, &salaries(), "id").unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::MissingKeyColumn {
                key: "id".to_string(),
                side: JoinSide::Left
            }
        );

        let err = inner_join(&employees(), &no_key, "id").unwrap_err();
        assert!(matches!(err, AnalyticsError::MissingKeyColumn { side: JoinSide::Right, .. }));
    }

    #[test]
    fn test_key_type_mismatch_is_an_error() {
        let string_ids = Dataset::new([
            ("id", Column::from(vec!["1"])),
            ("salary", Column::from(vec![1.0f64])),
        ])
        .unwrap();
        let err = inner_join(&employees(), &string_ids, "id").unwrap_err();
        assert_eq!(err.kind(), "TypeMismatch");
    }

    #[test]
    fn test_empty_right_yields_empty_result_with_schema() {
        let right = Dataset::new([
            ("id", Column::Int(vec![])),
            ("salary", Column::Float(vec![])),
        ])
        .unwrap();
        let merged = inner_join(&employees(), &right, "id").unwrap();
        assert_eq!(merged.size(), 0);
        assert_eq!(merged.column_names(), &["id", "salary", "department"]);
    }
}
