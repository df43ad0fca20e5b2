//! Descriptive statistics for a numeric column

use serde::Serialize;

use super::dataset::Dataset;
use super::error::{AnalyticsError, Operation, Result};

/// Fixed summary of a numeric column.
///
/// Statistics that cannot be computed (no non-null values, or `std` with
/// fewer than two values) are NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescribeSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q25: f64,
    #[serde(rename = "50%")]
    pub q50: f64,
    #[serde(rename = "75%")]
    pub q75: f64,
    pub max: f64,
}

impl DescribeSummary {
    /// Named statistics in display order
    pub fn entries(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.q50),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Summarize the non-null values of `column`.
///
/// Fails with `UnknownColumn` when the column is absent, `EmptyColumn` when
/// the table has no rows and `TypeMismatch` for string columns.
pub fn describe(table: &Dataset, column: &str) -> Result<DescribeSummary> {
    let col = table.column_for(Operation::Describe, column)?;
    if table.size() == 0 {
        return Err(AnalyticsError::EmptyColumn {
            operation: Operation::Describe,
            column: column.to_string(),
        });
    }
    let values = col
        .to_f64()
        .ok_or_else(|| AnalyticsError::numeric_expected(Operation::Describe, column, col.dtype()))?;

    let mut sorted: Vec<f64> = values.into_iter().flatten().collect();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = mean(&sorted);

    Ok(DescribeSummary {
        column: column.to_string(),
        count,
        mean,
        std: sample_std(&sorted, mean),
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q25: percentile_linear(&sorted, 0.25),
        q50: percentile_linear(&sorted, 0.50),
        q75: percentile_linear(&sorted, 0.75),
        max: sorted.last().copied().unwrap_or(f64::NAN),
    })
}

/// Arithmetic mean, NaN for no values
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (denominator `n - 1`), NaN for fewer than two values
pub fn sample_std(values: &[f64], mean: f64) -> f64 {
    let n = values.len();
    if n <= 1 {
        return f64::NAN;
    }
    let ss: f64 = values.iter().map(|x| (x - mean) * (x - mean)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Percentile `p` in `[0, 1]` of ascending `sorted` values.
///
/// Linear interpolation between order statistics: with virtual index
/// `i = p * (n - 1)`, the result lies between `sorted[floor(i)]` and
/// `sorted[ceil(i)]` weighted by the fractional part of `i`.
pub fn percentile_linear(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let index = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = index.floor() as usize;
    let hi = index.ceil() as usize;
    let frac = index - lo as f64;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}
