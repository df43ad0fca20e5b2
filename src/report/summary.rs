//! Run summary shown at the end of a report

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use super::analytics::AnalyticsReport;

/// Counts and timings of a report run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub employee_rows: usize,
    pub compensation_rows: usize,
    pub merged_rows: Option<usize>,
    pub sections_ok: usize,
    pub sections_failed: Vec<String>,
    pub charts_written: usize,
    pub load_time: Duration,
    pub analysis_time: Duration,
    pub output_time: Duration,
}

impl RunSummary {
    pub fn new(employee_rows: usize, compensation_rows: usize) -> Self {
        Self {
            employee_rows,
            compensation_rows,
            ..Default::default()
        }
    }

    /// Record section outcomes from a finished report
    pub fn record_report(&mut self, report: &AnalyticsReport) {
        self.merged_rows = report.join.as_ref().ok().map(|j| j.merged_rows);
        self.sections_ok = report.sections.iter().filter(|s| s.is_ok()).count();
        self.sections_failed = report
            .sections
            .iter()
            .filter(|s| !s.is_ok())
            .map(|s| s.kind.name().to_string())
            .collect();
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = elapsed;
    }

    pub fn set_analysis_time(&mut self, elapsed: Duration) {
        self.analysis_time = elapsed;
    }

    pub fn set_output_time(&mut self, elapsed: Duration) {
        self.output_time = elapsed;
    }

    pub fn add_charts(&mut self, count: usize) {
        self.charts_written += count;
    }

    pub fn total_time(&self) -> Duration {
        self.load_time + self.analysis_time + self.output_time
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("REPORT SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("👥 Employee Rows"),
            Cell::new(self.employee_rows),
        ]);
        table.add_row(vec![
            Cell::new("💰 Compensation Rows"),
            Cell::new(self.compensation_rows),
        ]);
        table.add_row(vec![
            Cell::new("🔗 Merged Rows"),
            match self.merged_rows {
                Some(rows) => Cell::new(rows),
                None => Cell::new("join failed").fg(Color::Red),
            },
        ]);
        table.add_row(vec![
            Cell::new("✅ Sections Computed"),
            Cell::new(self.sections_ok)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("❌ Sections Failed"),
            Cell::new(self.sections_failed.len()).fg(if self.sections_failed.is_empty() {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("📊 Charts Written"),
            Cell::new(self.charts_written),
        ]);
        table.add_row(vec![
            Cell::new("⏱️  Total Time"),
            Cell::new(format_duration(self.total_time())),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.sections_failed.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Failed Sections").yellow(),
                style(format!("({})", self.sections_failed.len())).dim()
            );
            for name in &self.sections_failed {
                println!("        {} {}", style("•").dim(), name);
            }
        }
    }
}

/// Format a duration as seconds or milliseconds
pub fn format_duration(elapsed: Duration) -> String {
    if elapsed.as_secs() >= 1 {
        format!("{:.2}s", elapsed.as_secs_f64())
    } else {
        format!("{}ms", elapsed.as_millis())
    }
}
