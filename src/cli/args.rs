//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{BinRule, GroupOrder};
use crate::report::ReportConfig;

/// PayStat - Compensation analytics over employee and salary tables
#[derive(Parser, Debug)]
#[command(name = "paystat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Employee identity table (CSV or Parquet) with id and department columns
    #[arg(short, long)]
    pub employees: PathBuf,

    /// Salary table (CSV or Parquet) with id, salary and bonus columns
    #[arg(short, long)]
    pub salaries: PathBuf,

    /// Join key column present in both tables
    #[arg(long, default_value = "id")]
    pub key_column: String,

    /// Department column in the employee table
    #[arg(long, default_value = "department")]
    pub group_column: String,

    /// Salary column in the salary table
    #[arg(long, default_value = "salary")]
    pub salary_column: String,

    /// Bonus column in the salary table
    #[arg(long, default_value = "bonus")]
    pub bonus_column: String,

    /// Order of departments in grouped results.
    /// Options: "sorted" (default) or "first-seen"
    #[arg(long, default_value = "sorted")]
    pub group_order: GroupOrder,

    /// Emit chart specifications for every successful section
    #[arg(long, default_value = "false")]
    pub charts: bool,

    /// Directory for chart specifications.
    /// Defaults to a 'charts' directory next to the salary table.
    #[arg(long)]
    pub chart_dir: Option<PathBuf>,

    /// Number of bins for the salary histogram (0 = Sturges rule)
    #[arg(long, default_value = "0")]
    pub histogram_bins: usize,

    /// Write the full report as JSON to this path
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    /// Print a preview of both input tables before the report
    #[arg(long, default_value = "false")]
    pub show_inputs: bool,

    /// Rows shown per input table with --show-inputs
    #[arg(long, default_value = "10")]
    pub preview_rows: usize,

    /// Run report sections one after another instead of in parallel
    #[arg(long, default_value = "false")]
    pub sequential: bool,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Higher values improve type detection for ambiguous columns but may be slower.
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Fold the arguments into the pipeline configuration.
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            key_column: self.key_column.clone(),
            group_column: self.group_column.clone(),
            salary_column: self.salary_column.clone(),
            bonus_column: self.bonus_column.clone(),
            group_order: self.group_order,
            charts: self.charts,
            histogram_bins: if self.histogram_bins == 0 {
                BinRule::Sturges
            } else {
                BinRule::Fixed(self.histogram_bins)
            },
            parallel: !self.sequential,
        }
    }

    /// Chart directory, derived from the salary table location if not provided.
    pub fn chart_dir(&self) -> PathBuf {
        self.chart_dir.clone().unwrap_or_else(|| {
            let parent = self
                .salaries
                .parent()
                .unwrap_or_else(|| std::path::Path::new("."));
            parent.join("charts")
        })
    }
}
