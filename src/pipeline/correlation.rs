//! Pearson correlation matrix over numeric columns

use faer::Mat;
use rayon::prelude::*;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::dataset::Dataset;
use super::error::{AnalyticsError, Operation, Result};

/// Square, symmetric correlation matrix indexed by column name on both axes.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: Mat<f64>,
}

impl CorrelationMatrix {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows (and columns) of the matrix
    pub fn dim(&self) -> usize {
        self.columns.len()
    }

    /// Coefficient at position `(i, j)`
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    /// Coefficient between two named columns
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[(i, j)])
    }

    /// Matrix as nested rows, in column order
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.dim())
            .map(|i| (0..self.dim()).map(|j| self.values[(i, j)]).collect())
            .collect()
    }

    /// Off-diagonal pairs `(a, b, r)` from the upper triangle
    pub fn pairs(&self) -> Vec<(&str, &str, f64)> {
        let n = self.dim();
        (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .map(|(i, j)| (self.columns[i].as_str(), self.columns[j].as_str(), self.values[(i, j)]))
            .collect()
    }
}

impl PartialEq for CorrelationMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.to_rows() == other.to_rows()
    }
}

impl Serialize for CorrelationMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CorrelationMatrix", 2)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("values", &self.to_rows())?;
        state.end()
    }
}

/// Pearson correlation for every pair of `columns`.
///
/// Each coefficient uses the rows where both columns are non-null:
/// sample covariance divided by the product of sample standard deviations.
/// The diagonal is exactly 1.0 for a column with non-zero variance; any
/// cell involving a constant column is NaN. Requires at least two rows.
pub fn correlation_matrix(table: &Dataset, columns: &[&str]) -> Result<CorrelationMatrix> {
    let mut float_columns: Vec<Vec<Option<f64>>> = Vec::with_capacity(columns.len());
    for &name in columns {
        let col = table.column_for(Operation::Correlation, name)?;
        let values = col
            .to_f64()
            .ok_or_else(|| AnalyticsError::numeric_expected(Operation::Correlation, name, col.dtype()))?;
        float_columns.push(values);
    }

    if table.size() < 2 {
        return Err(AnalyticsError::InsufficientData {
            operation: Operation::Correlation,
            required: 2,
            actual: table.size(),
        });
    }

    let n = columns.len();

    // Upper triangle including the diagonal
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i..n).map(move |j| (i, j)))
        .collect();

    let coefficients: Vec<f64> = pairs
        .par_iter()
        .map(|&(i, j)| pearson(&float_columns[i], &float_columns[j]))
        .collect();

    let mut values = Mat::<f64>::zeros(n, n);
    for (&(i, j), &r) in pairs.iter().zip(coefficients.iter()) {
        let r = if i == j && !r.is_nan() { 1.0 } else { r };
        values[(i, j)] = r;
        values[(j, i)] = r;
    }

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        values,
    })
}

/// Pearson r over pairwise-complete observations, NaN when undefined.
fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let paired: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    let n = paired.len();
    if n < 2
        || is_constant(paired.iter().map(|(x, _)| *x))
        || is_constant(paired.iter().map(|(_, y)| *y))
    {
        return f64::NAN;
    }

    let mean_x = paired.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
    let mean_y = paired.iter().map(|(_, y)| y).sum::<f64>() / n as f64;

    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;
    for &(x, y) in &paired {
        let dx = x - mean_x;
        let dy = y - mean_y;
        var_x += dx * dx;
        var_y += dy * dy;
        cov_xy += dx * dy;
    }

    // The n - 1 denominators of covariance and both deviations cancel
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }

    (cov_xy / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Every value equal; compared directly since rounding in the mean can leave
/// a constant column with a tiny non-zero variance.
fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}
