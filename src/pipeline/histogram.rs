//! Equal-width histogram of a numeric column
//!
//! Supplies the bin counts behind the salary distribution chart.

use serde::Serialize;

use super::dataset::Dataset;
use super::error::{AnalyticsError, Operation, Result};

/// Rule for choosing the number of bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BinRule {
    /// `ceil(log2(n)) + 1` bins
    Sturges,
    /// A fixed number of bins, capped at the number of values
    Fixed(usize),
}

impl BinRule {
    /// Number of bins for `n` values (at least one, at most `n`)
    pub fn bins_for(&self, n: usize) -> usize {
        match *self {
            BinRule::Fixed(bins) => bins.clamp(1, n.max(1)),
            BinRule::Sturges if n <= 1 => 1,
            BinRule::Sturges => ((n as f64).log2().ceil() as usize) + 1,
        }
    }
}

/// One bin; `left` is inclusive and `right` exclusive except for the last bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub left: f64,
    pub right: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Total number of values binned
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Bin the non-null values of `column` into equal-width bins over `[min, max]`.
///
/// A constant column produces a single bin of width 1 centred on the value.
pub fn histogram(table: &Dataset, column: &str, rule: BinRule) -> Result<Histogram> {
    let col = table.column_for(Operation::Histogram, column)?;
    let values = col
        .to_f64()
        .ok_or_else(|| AnalyticsError::numeric_expected(Operation::Histogram, column, col.dtype()))?;
    let values: Vec<f64> = values.into_iter().flatten().filter(|v| v.is_finite()).collect();

    if values.is_empty() {
        return Err(AnalyticsError::EmptyColumn {
            operation: Operation::Histogram,
            column: column.to_string(),
        });
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return Ok(Histogram {
            column: column.to_string(),
            bins: vec![HistogramBin {
                left: min - 0.5,
                right: max + 0.5,
                count: values.len(),
            }],
        });
    }

    let n_bins = rule.bins_for(values.len());
    let width = (max - min) / n_bins as f64;
    let mut counts = vec![0usize; n_bins];
    for v in &values {
        let idx = (((v - min) / width).floor() as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            left: min + width * i as f64,
            right: if i + 1 == n_bins { max } else { min + width * (i + 1) as f64 },
            count,
        })
        .collect();

    Ok(Histogram {
        column: column.to_string(),
        bins,
    })
}
