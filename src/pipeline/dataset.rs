//! Immutable in-memory tabular dataset
//!
//! A [`Dataset`] is a fixed set of named, typed columns of equal length.
//! Values are tagged scalars ([`Value`]) and every column carries a single
//! declared [`ColumnType`]; nulls are allowed in any column. Datasets are
//! never mutated: every pipeline stage builds a new one.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::error::{AnalyticsError, Operation, Result};

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Float,
    Str,
}

impl ColumnType {
    /// True for integer and floating-point columns
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Float)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int => "integer",
            ColumnType::Float => "float",
            ColumnType::Str => "string",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single scalar cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Type of the value, `None` for null
    pub fn dtype(&self) -> Option<ColumnType> {
        match self {
            Value::Null => None,
            Value::Int(_) => Some(ColumnType::Int),
            Value::Float(_) => Some(ColumnType::Float),
            Value::Str(_) => Some(ColumnType::Str),
        }
    }

    /// Numeric view of the value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Total order used for sorted group output.
    ///
    /// Values of the same type compare naturally (floats via `total_cmp`),
    /// nulls sort last and mixed types order as int < float < string.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Int(_) => 0,
                Value::Float(_) => 1,
                Value::Str(_) => 2,
                Value::Null => 3,
            }
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Hashable, borrowed form of a non-null cell used by joins and grouping.
///
/// Floats hash by bit pattern with `-0.0` folded into `0.0`; NaN never
/// produces a key, so it never matches anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Key<'a> {
    Int(i64),
    Float(u64),
    Str(&'a str),
}

/// Typed column storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Str(Vec<Option<String>>),
}

impl Column {
    /// An empty column of the given type
    pub fn empty(dtype: ColumnType) -> Self {
        Self::with_capacity(dtype, 0)
    }

    fn with_capacity(dtype: ColumnType, capacity: usize) -> Self {
        match dtype {
            ColumnType::Int => Column::Int(Vec::with_capacity(capacity)),
            ColumnType::Float => Column::Float(Vec::with_capacity(capacity)),
            ColumnType::Str => Column::Str(Vec::with_capacity(capacity)),
        }
    }

    pub fn dtype(&self) -> ColumnType {
        match self {
            Column::Int(_) => ColumnType::Int,
            Column::Float(_) => ColumnType::Float,
            Column::Str(_) => ColumnType::Str,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `row`, or `None` when out of bounds
    pub fn get(&self, row: usize) -> Option<Value> {
        match self {
            Column::Int(v) => v.get(row).map(|x| Value::from(*x)),
            Column::Float(v) => v.get(row).map(|x| Value::from(*x)),
            Column::Str(v) => v.get(row).map(|x| Value::from(x.clone())),
        }
    }

    pub fn null_count(&self) -> usize {
        match self {
            Column::Int(v) => v.iter().filter(|x| x.is_none()).count(),
            Column::Float(v) => v.iter().filter(|x| x.is_none()).count(),
            Column::Str(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Numeric view with nulls preserved, `None` for string columns.
    ///
    /// NaN cells are missing, the same as nulls.
    pub fn to_f64(&self) -> Option<Vec<Option<f64>>> {
        match self {
            Column::Int(v) => Some(v.iter().map(|x| x.map(|n| n as f64)).collect()),
            Column::Float(v) => Some(v.iter().map(|x| x.filter(|f| !f.is_nan())).collect()),
            Column::Str(_) => None,
        }
    }

    pub(crate) fn key(&self, row: usize) -> Option<Key<'_>> {
        match self {
            Column::Int(v) => v.get(row).copied().flatten().map(Key::Int),
            Column::Float(v) => v
                .get(row)
                .copied()
                .flatten()
                .filter(|x| !x.is_nan())
                .map(|x| if x == 0.0 { Key::Float(0f64.to_bits()) } else { Key::Float(x.to_bits()) }),
            Column::Str(v) => v.get(row).and_then(|x| x.as_deref()).map(Key::Str),
        }
    }

    /// Gather rows by position into a new column.
    pub(crate) fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Int(v) => Column::Int(indices.iter().map(|&i| v[i]).collect()),
            Column::Float(v) => Column::Float(indices.iter().map(|&i| v[i]).collect()),
            Column::Str(v) => Column::Str(indices.iter().map(|&i| v[i].clone()).collect()),
        }
    }

    /// Append a value, handing it back if its type does not fit.
    fn push(&mut self, value: Value) -> std::result::Result<(), Value> {
        match (self, value) {
            (Column::Int(v), Value::Null) => v.push(None),
            (Column::Float(v), Value::Null) => v.push(None),
            (Column::Str(v), Value::Null) => v.push(None),
            (Column::Int(v), Value::Int(x)) => v.push(Some(x)),
            (Column::Float(v), Value::Float(x)) => v.push(Some(x)),
            (Column::Str(v), Value::Str(x)) => v.push(Some(x)),
            (_, other) => return Err(other),
        }
        Ok(())
    }
}

impl From<Vec<i64>> for Column {
    fn from(values: Vec<i64>) -> Self {
        Column::Int(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Float(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<&str>> for Column {
    fn from(values: Vec<&str>) -> Self {
        Column::Str(values.into_iter().map(|s| Some(s.to_string())).collect())
    }
}

/// A named, typed column declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub dtype: ColumnType,
}

/// Ordered column declarations of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = (S, ColumnType)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, dtype)| Field {
                    name: name.into(),
                    dtype,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Immutable table of named, typed, equal-length columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    height: usize,
}

impl Dataset {
    /// Build a dataset from named columns.
    ///
    /// Fails with `DuplicateColumn` on repeated names and `LengthMismatch`
    /// when columns differ in length.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = (S, Column)>) -> Result<Self> {
        let mut names = Vec::new();
        let mut cols = Vec::new();
        let mut seen = HashSet::new();

        for (name, column) in columns {
            let name = name.into();
            if !seen.insert(name.clone()) {
                return Err(AnalyticsError::DuplicateColumn { column: name });
            }
            if let Some(first) = cols.first().map(Column::len) {
                if column.len() != first {
                    return Err(AnalyticsError::LengthMismatch {
                        operation: Operation::Construct,
                        column: name,
                        expected: first,
                        actual: column.len(),
                    });
                }
            }
            names.push(name);
            cols.push(column);
        }

        let height = cols.first().map(Column::len).unwrap_or(0);
        Ok(Self {
            names,
            columns: cols,
            height,
        })
    }

    /// Build a dataset from rows validated against `schema`.
    ///
    /// Each row must have exactly one value per field, and every non-null
    /// value must match its field's declared type.
    pub fn from_rows(schema: &Schema, rows: impl IntoIterator<Item = Vec<Value>>) -> Result<Self> {
        let rows = rows.into_iter();
        let mut columns: Vec<Column> = schema
            .fields
            .iter()
            .map(|f| Column::with_capacity(f.dtype, rows.size_hint().0))
            .collect();

        for row in rows {
            if row.len() != schema.len() {
                return Err(AnalyticsError::LengthMismatch {
                    operation: Operation::Construct,
                    column: "<row>".to_string(),
                    expected: schema.len(),
                    actual: row.len(),
                });
            }
            for ((column, field), value) in columns.iter_mut().zip(&schema.fields).zip(row) {
                if let Err(rejected) = column.push(value) {
                    return Err(AnalyticsError::TypeMismatch {
                        operation: Operation::Construct,
                        column: field.name.clone(),
                        expected: field.dtype.as_str(),
                        found: rejected.dtype().unwrap_or(field.dtype),
                    });
                }
            }
        }

        Self::new(schema.fields.iter().map(|f| f.name.clone()).zip(columns))
    }

    /// A dataset with the given schema and no rows
    pub fn empty(schema: &Schema) -> Self {
        Self {
            names: schema.fields.iter().map(|f| f.name.clone()).collect(),
            columns: schema.fields.iter().map(|f| Column::empty(f.dtype)).collect(),
            height: 0,
        }
    }

    /// Assemble from parts already known to be consistent.
    pub(crate) fn from_parts(names: Vec<String>, columns: Vec<Column>, height: usize) -> Self {
        debug_assert_eq!(names.len(), columns.len());
        debug_assert!(columns.iter().all(|c| c.len() == height));
        Self {
            names,
            columns,
            height,
        }
    }

    /// Number of rows
    pub fn size(&self) -> usize {
        self.height
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn schema(&self) -> Schema {
        Schema::new(
            self.names
                .iter()
                .zip(&self.columns)
                .map(|(n, c)| (n.clone(), c.dtype())),
        )
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.column_for(Operation::Access, name)
    }

    pub(crate) fn column_for(&self, operation: Operation, name: &str) -> Result<&Column> {
        self.column_index(name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| AnalyticsError::unknown_column(operation, name))
    }

    pub(crate) fn columns(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.names.iter().map(String::as_str).zip(&self.columns)
    }

    /// Row view at `index`
    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        (index < self.height).then_some(RowView {
            dataset: self,
            index,
        })
    }

    /// Iterate rows in order. Calling again restarts from the first row.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            dataset: self,
            next: 0,
        }
    }
}

/// Borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    dataset: &'a Dataset,
    index: usize,
}

impl<'a> RowView<'a> {
    /// Position of the row in its dataset
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value of the named column in this row
    pub fn get(&self, column: &str) -> Result<Value> {
        let col = self.dataset.column(column)?;
        Ok(col.get(self.index).unwrap_or(Value::Null))
    }

    /// Values in column order
    pub fn values(&self) -> impl Iterator<Item = Value> + 'a {
        let (dataset, index) = (self.dataset, self.index);
        dataset
            .columns
            .iter()
            .map(move |c| c.get(index).unwrap_or(Value::Null))
    }

    /// `(column name, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Value)> + 'a {
        let dataset = self.dataset;
        dataset.names.iter().map(String::as_str).zip(self.values())
    }
}

/// Lazy iterator over the rows of a dataset.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    dataset: &'a Dataset,
    next: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = RowView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.dataset.row(self.next)?;
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dataset.size() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn employees() -> Dataset {
        Dataset::new([
            ("id", Column::from(vec![1i64, 2])),
            ("department", Column::from(vec!["Eng", "Sales"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_column_access_by_name() {
        let ds = employees();
        assert_eq!(ds.size(), 2);
        assert_eq!(ds.width(), 2);
        assert_eq!(ds.column("id").unwrap().dtype(), ColumnType::Int);
        assert_eq!(
            ds.column("salary").unwrap_err(),
            AnalyticsError::UnknownColumn {
                operation: Operation::Access,
                column: "salary".to_string()
            }
        );
    }

    #[test]
    fn test_rows_are_restartable() {
        let ds = employees();
        let first: Vec<Value> = ds.rows().map(|r| r.get("department").unwrap()).collect();
        let second: Vec<Value> = ds.rows().map(|r| r.get("department").unwrap()).collect();
        assert_eq!(first, vec![Value::from("Eng"), Value::from("Sales")]);
        assert_eq!(first, second);
        assert_eq!(ds.rows().len(), 2);
    }

    #[test]
    fn test_row_iter_pairs_follow_column_order() {
        let ds = employees();
        let row = ds.row(1).unwrap();
        let pairs: Vec<(&str, Value)> = row.iter().collect();
        assert_eq!(
            pairs,
            vec![("id", Value::Int(2)), ("department", Value::from("Sales"))]
        );
        assert!(ds.row(2).is_none());
    }

    #[test]
    fn test_from_rows_validates_types() {
        let schema = Schema::new([("id", ColumnType::Int), ("salary", ColumnType::Float)]);
        let ok = Dataset::from_rows(
            &schema,
            vec![
                vec![Value::Int(1), Value::Float(50000.0)],
                vec![Value::Int(2), Value::Null],
            ],
        )
        .unwrap();
        assert_eq!(ok.size(), 2);
        assert_eq!(ok.column("salary").unwrap().null_count(), 1);

        let err = Dataset::from_rows(&schema, vec![vec![Value::Int(1), Value::from("high")]])
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::TypeMismatch { ref column, found: ColumnType::Str, .. } if column == "salary"
        ));
        assert_eq!(err.to_string(), "construct: column 'salary' expected float, found string");
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let schema = Schema::new([("id", ColumnType::Int), ("salary", ColumnType::Float)]);
        let err = Dataset::from_rows(&schema, vec![vec![Value::Int(1)]]).unwrap_err();
        assert!(matches!(err, AnalyticsError::LengthMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_new_rejects_duplicate_and_ragged_columns() {
        let dup = Dataset::new([
            ("id", Column::from(vec![1i64])),
            ("id", Column::from(vec![2i64])),
        ]);
        assert!(matches!(dup, Err(AnalyticsError::DuplicateColumn { .. })));

        let ragged = Dataset::new([
            ("id", Column::from(vec![1i64, 2])),
            ("salary", Column::from(vec![1.0f64])),
        ]);
        assert!(matches!(ragged, Err(AnalyticsError::LengthMismatch { .. })));
    }

    #[test]
    fn test_empty_dataset_keeps_schema() {
        let schema = Schema::new([("id", ColumnType::Int), ("salary", ColumnType::Float)]);
        let ds = Dataset::empty(&schema);
        assert_eq!(ds.size(), 0);
        assert_eq!(ds.schema(), schema);
        assert_eq!(ds.rows().count(), 0);
    }

    #[test]
    fn test_float_keys_fold_signed_zero_and_skip_nan() {
        let col = Column::Float(vec![Some(0.0), Some(-0.0), Some(f64::NAN), None]);
        assert_eq!(col.key(0), col.key(1));
        assert!(col.key(2).is_none());
        assert!(col.key(3).is_none());
    }

    #[test]
    fn test_numeric_view_treats_nan_as_missing() {
        let col = Column::Float(vec![Some(1.0), Some(f64::NAN), None]);
        assert_eq!(col.to_f64(), Some(vec![Some(1.0), None, None]));
        assert_eq!(Column::from(vec!["a"]).to_f64(), None);
    }

    #[test]
    fn test_sort_cmp_puts_nulls_last() {
        let mut values = vec![Value::Null, Value::from("b"), Value::from("a")];
        values.sort_by(|a, b| a.sort_cmp(b));
        assert_eq!(values, vec![Value::from("a"), Value::from("b"), Value::Null]);
    }
}
