//! JSON export of a finished report

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use super::analytics::{AnalyticsReport, JoinStats, ReportConfig, SectionOutput};
use super::chart::ChartIntent;

/// Metadata about the report run
#[derive(Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub paystat_version: String,
    pub employees_file: String,
    pub salaries_file: String,
    pub config: ReportConfig,
}

/// Structured error in place of a failed section
#[derive(Serialize)]
pub struct ExportError {
    pub kind: &'static str,
    pub message: String,
}

/// A single section: either its result or its error
#[derive(Serialize)]
pub struct ExportSection<'a> {
    pub name: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<&'a SectionOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ExportError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<&'a ChartIntent>,
}

/// Complete report export
#[derive(Serialize)]
pub struct ReportExport<'a> {
    pub metadata: ReportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<&'a JoinStats>,
    pub sections: Vec<ExportSection<'a>>,
}

/// Input file locations recorded in the export metadata
pub struct ExportParams<'a> {
    pub employees_file: &'a str,
    pub salaries_file: &'a str,
}

/// Assemble the serializable view of a report
pub fn build_export<'a>(
    report: &'a AnalyticsReport,
    config: &ReportConfig,
    params: &ExportParams,
) -> ReportExport<'a> {
    let sections = report
        .sections
        .iter()
        .map(|section| match &section.result {
            Ok(output) => ExportSection {
                name: section.kind.name(),
                status: "ok",
                result: Some(output),
                error: None,
                chart: section.chart.as_ref().map(|c| &c.intent),
            },
            Err(e) => ExportSection {
                name: section.kind.name(),
                status: "error",
                result: None,
                error: Some(ExportError {
                    kind: e.kind(),
                    message: e.to_string(),
                }),
                chart: None,
            },
        })
        .collect();

    ReportExport {
        metadata: ReportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            paystat_version: env!("CARGO_PKG_VERSION").to_string(),
            employees_file: params.employees_file.to_string(),
            salaries_file: params.salaries_file.to_string(),
            config: config.clone(),
        },
        join: report.join.as_ref().ok(),
        sections,
    }
}

/// Export the report to a JSON file.
///
/// Non-finite statistics (undefined std, constant-column correlations) are
/// written as `null`.
pub fn export_report(
    report: &AnalyticsReport,
    config: &ReportConfig,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = build_export(report, config, params);

    let json = serde_json::to_string_pretty(&export).context("Failed to serialize report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    Ok(())
}
