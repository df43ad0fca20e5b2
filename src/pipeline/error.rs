//! Error types for the analytics core.
//!
//! Every variant names the operation that failed and the column or key
//! involved, so a partially failed report can print a precise message in
//! place of the missing section.

use std::fmt;

use thiserror::Error;

use super::dataset::ColumnType;

/// Operation that produced an [`AnalyticsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Building a dataset from rows or columns
    Construct,
    /// Reading a column or row value
    Access,
    /// Inner join on a key column
    Join,
    /// Grouped mean aggregation
    GroupMean,
    /// Descriptive statistics
    Describe,
    /// Pearson correlation matrix
    Correlation,
    /// Equal-width histogram
    Histogram,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Construct => "construct",
            Operation::Access => "access",
            Operation::Join => "join",
            Operation::GroupMean => "group_mean",
            Operation::Describe => "describe",
            Operation::Correlation => "correlation_matrix",
            Operation::Histogram => "histogram",
        };
        f.write_str(name)
    }
}

/// Side of a join whose key column is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSide {
    Left,
    Right,
}

impl fmt::Display for JoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinSide::Left => f.write_str("left"),
            JoinSide::Right => f.write_str("right"),
        }
    }
}

/// Structured failure of a core operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// A column referenced by name does not exist.
    #[error("{operation}: unknown column '{column}'")]
    UnknownColumn { operation: Operation, column: String },

    /// The join key is absent from one of the inputs.
    #[error("join: key column '{key}' missing from {side} table")]
    MissingKeyColumn { key: String, side: JoinSide },

    /// The table has no rows to summarize.
    #[error("{operation}: column '{column}' is empty (table has no rows)")]
    EmptyColumn { operation: Operation, column: String },

    /// The grouping column holds no usable (non-null) keys.
    #[error("group_mean: group column '{column}' contains only null values")]
    EmptyGroupColumn { column: String },

    /// Not enough rows for the statistic.
    #[error("{operation}: need at least {required} rows, got {actual}")]
    InsufficientData {
        operation: Operation,
        required: usize,
        actual: usize,
    },

    /// A column or value has the wrong type for the operation.
    #[error("{operation}: column '{column}' expected {expected}, found {found}")]
    TypeMismatch {
        operation: Operation,
        column: String,
        expected: &'static str,
        found: ColumnType,
    },

    /// Columns or rows of a dataset disagree on length.
    #[error("{operation}: column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        operation: Operation,
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Two columns share a name.
    #[error("construct: duplicate column '{column}'")]
    DuplicateColumn { column: String },
}

impl AnalyticsError {
    pub(crate) fn unknown_column(operation: Operation, column: &str) -> Self {
        AnalyticsError::UnknownColumn {
            operation,
            column: column.to_string(),
        }
    }

    pub(crate) fn numeric_expected(operation: Operation, column: &str, found: ColumnType) -> Self {
        AnalyticsError::TypeMismatch {
            operation,
            column: column.to_string(),
            expected: "numeric",
            found,
        }
    }

    /// Short identifier of the error kind, used in exports.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyticsError::UnknownColumn { .. } => "UnknownColumn",
            AnalyticsError::MissingKeyColumn { .. } => "MissingKeyColumn",
            AnalyticsError::EmptyColumn { .. } => "EmptyColumn",
            AnalyticsError::EmptyGroupColumn { .. } => "EmptyGroupColumn",
            AnalyticsError::InsufficientData { .. } => "InsufficientData",
            AnalyticsError::TypeMismatch { .. } => "TypeMismatch",
            AnalyticsError::LengthMismatch { .. } => "LengthMismatch",
            AnalyticsError::DuplicateColumn { .. } => "DuplicateColumn",
        }
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
