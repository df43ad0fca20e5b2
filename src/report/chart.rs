//! Chart intents and the charting collaborator
//!
//! The analytics core never draws anything. Each report section that wants a
//! chart carries a [`ChartSpec`]: what to draw ([`ChartIntent`]) plus the
//! finished numbers to draw it from ([`ChartData`]). A [`ChartSink`] turns
//! specs into artifacts; [`JsonChartSink`] writes one JSON document per chart
//! for an external renderer.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::pipeline::{CorrelationMatrix, GroupedAggregate, Histogram};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Histogram,
    Heatmap,
}

/// What to draw and where the artifact should go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartIntent {
    pub kind: ChartKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    /// Identifier of the rendered artifact, e.g. `avg_salary.png`
    pub output: String,
}

impl ChartIntent {
    pub fn new(kind: ChartKind, title: &str, output: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            x_label: None,
            y_label: None,
            output: output.to_string(),
        }
    }

    pub fn with_labels(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = Some(x_label.to_string());
        self.y_label = Some(y_label.to_string());
        self
    }

    /// Output identifier with its extension swapped for `.json`
    pub fn spec_file_name(&self) -> String {
        let stem = Path::new(&self.output)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("chart");
        format!("{}.json", stem)
    }
}

/// Finished numbers behind a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartData {
    Bar { labels: Vec<String>, values: Vec<f64> },
    Histogram { edges: Vec<f64>, counts: Vec<usize> },
    Heatmap { labels: Vec<String>, values: Vec<Vec<f64>> },
}

impl ChartData {
    pub fn bars(aggregate: &GroupedAggregate) -> Self {
        ChartData::Bar {
            labels: aggregate.labels(),
            values: aggregate.means(),
        }
    }

    pub fn histogram(histogram: &Histogram) -> Self {
        let mut edges: Vec<f64> = histogram.bins.iter().map(|b| b.left).collect();
        if let Some(last) = histogram.bins.last() {
            edges.push(last.right);
        }
        ChartData::Histogram {
            edges,
            counts: histogram.bins.iter().map(|b| b.count).collect(),
        }
    }

    pub fn heatmap(matrix: &CorrelationMatrix) -> Self {
        ChartData::Heatmap {
            labels: matrix.columns().to_vec(),
            values: matrix.to_rows(),
        }
    }
}

/// Intent plus data: everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(flatten)]
    pub intent: ChartIntent,
    pub data: ChartData,
}

/// Receives finished charts from the report.
pub trait ChartSink {
    /// Render one chart, returning the location of the produced artifact.
    fn render(&mut self, spec: &ChartSpec) -> Result<PathBuf>;
}

/// Writes each chart spec as pretty JSON into a directory.
#[derive(Debug)]
pub struct JsonChartSink {
    dir: PathBuf,
}

impl JsonChartSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the spec for `intent` will be written to
    pub fn path_for(&self, intent: &ChartIntent) -> PathBuf {
        self.dir.join(intent.spec_file_name())
    }
}

impl ChartSink for JsonChartSink {
    fn render(&mut self, spec: &ChartSpec) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create chart directory {}", self.dir.display()))?;

        let path = self.path_for(&spec.intent);
        let json = serde_json::to_string_pretty(spec)
            .with_context(|| format!("Failed to serialize chart '{}'", spec.intent.title))?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write chart spec to {}", path.display()))?;

        Ok(path)
    }
}
