//! Grouped mean aggregation

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::dataset::{Dataset, Key, Value};
use super::error::{AnalyticsError, Operation, Result};

/// Iteration order of the groups in a [`GroupedAggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupOrder {
    /// Order in which each key first appears in the table
    #[default]
    FirstSeen,
    /// Ascending key order
    Sorted,
}

impl fmt::Display for GroupOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupOrder::FirstSeen => write!(f, "first-seen"),
            GroupOrder::Sorted => write!(f, "sorted"),
        }
    }
}

impl std::str::FromStr for GroupOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first-seen" | "first_seen" | "insertion" => Ok(GroupOrder::FirstSeen),
            "sorted" | "sort" => Ok(GroupOrder::Sorted),
            _ => Err(format!(
                "Invalid group order '{}'. Valid options: sorted, first-seen",
                s
            )),
        }
    }
}

/// Mean of one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub key: Value,
    pub mean: f64,
    /// Number of non-null values averaged
    pub count: usize,
}

/// Per-group means of a value column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedAggregate {
    pub group_column: String,
    pub value_column: String,
    pub groups: Vec<GroupMean>,
}

impl GroupedAggregate {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Mean for a string group key
    pub fn get(&self, key: &str) -> Option<f64> {
        self.groups
            .iter()
            .find(|g| g.key.as_str() == Some(key))
            .map(|g| g.mean)
    }

    /// Mean for an arbitrary group key
    pub fn get_value(&self, key: &Value) -> Option<f64> {
        self.groups.iter().find(|g| &g.key == key).map(|g| g.mean)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupMean> {
        self.groups.iter()
    }

    /// Group keys rendered as labels, in group order
    pub fn labels(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.key.to_string()).collect()
    }

    pub fn means(&self) -> Vec<f64> {
        self.groups.iter().map(|g| g.mean).collect()
    }
}

/// Mean of `value_column` within each distinct value of `group_column`.
///
/// Rows with a null group key are excluded, as are null values within a
/// group. A group whose values are all null has a NaN mean and count 0.
/// A table with no rows produces an empty aggregate.
pub fn group_mean(
    table: &Dataset,
    group_column: &str,
    value_column: &str,
    order: GroupOrder,
) -> Result<GroupedAggregate> {
    let groups_col = table.column_for(Operation::GroupMean, group_column)?;
    let values_col = table.column_for(Operation::GroupMean, value_column)?;
    let values = values_col
        .to_f64()
        .ok_or_else(|| {
            AnalyticsError::numeric_expected(Operation::GroupMean, value_column, values_col.dtype())
        })?;

    // (sum, count, first row) per key, with keys kept in first-seen order
    let mut slots: HashMap<Key<'_>, usize> = HashMap::new();
    let mut accumulators: Vec<(usize, f64, usize)> = Vec::new();

    for (row, value) in values.iter().enumerate() {
        let Some(key) = groups_col.key(row) else {
            continue;
        };
        let slot = *slots.entry(key).or_insert_with(|| {
            accumulators.push((row, 0.0, 0));
            accumulators.len() - 1
        });
        if let Some(v) = value {
            let acc = &mut accumulators[slot];
            acc.1 += v;
            acc.2 += 1;
        }
    }

    if accumulators.is_empty() && table.size() > 0 {
        return Err(AnalyticsError::EmptyGroupColumn {
            column: group_column.to_string(),
        });
    }

    let mut groups: Vec<GroupMean> = accumulators
        .into_iter()
        .map(|(first_row, sum, count)| GroupMean {
            key: groups_col.get(first_row).unwrap_or(Value::Null),
            mean: if count > 0 { sum / count as f64 } else { f64::NAN },
            count,
        })
        .collect();

    if order == GroupOrder::Sorted {
        groups.sort_by(|a, b| a.key.sort_cmp(&b.key));
    }

    Ok(GroupedAggregate {
        group_column: group_column.to_string(),
        value_column: value_column.to_string(),
        groups,
    })
}
