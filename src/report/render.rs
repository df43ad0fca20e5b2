//! Console rendering of report sections and input previews

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{CorrelationMatrix, Dataset, DescribeSummary, GroupedAggregate};

use super::analytics::{ReportSection, SectionOutput};

/// Format a statistic for display; NaN prints as `NaN`
pub fn format_stat(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.*}", decimals, value)
    }
}

/// Build the table for a section's successful output
pub fn section_table(output: &SectionOutput) -> Table {
    match output {
        SectionOutput::Aggregate(agg) => aggregate_table(agg),
        SectionOutput::Summary(summary) => summary_table(summary),
        SectionOutput::Correlation(matrix) => correlation_table(matrix),
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table
}

fn header(cells: impl IntoIterator<Item = String>) -> Vec<Cell> {
    cells
        .into_iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect()
}

pub fn aggregate_table(agg: &GroupedAggregate) -> Table {
    let mut table = new_table();
    table.set_header(header([
        agg.group_column.clone(),
        format!("mean {}", agg.value_column),
        "rows".to_string(),
    ]));
    for group in agg.iter() {
        table.add_row(vec![
            Cell::new(&group.key),
            Cell::new(format_stat(group.mean, 2)).set_alignment(CellAlignment::Right),
            Cell::new(group.count).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn summary_table(summary: &DescribeSummary) -> Table {
    let mut table = new_table();
    table.set_header(header(["statistic".to_string(), summary.column.clone()]));
    for (name, value) in summary.entries() {
        let decimals = if name == "count" { 0 } else { 2 };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format_stat(value, decimals)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn correlation_table(matrix: &CorrelationMatrix) -> Table {
    let mut table = new_table();
    table.set_header(header(
        std::iter::once(String::new()).chain(matrix.columns().iter().cloned()),
    ));
    for (i, name) in matrix.columns().iter().enumerate() {
        let mut row = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        for j in 0..matrix.dim() {
            let r = matrix.value(i, j);
            let color = if r.is_nan() {
                Color::DarkGrey
            } else if r.abs() >= 0.7 {
                Color::Green
            } else if r.abs() >= 0.3 {
                Color::Yellow
            } else {
                Color::White
            };
            row.push(
                Cell::new(format_stat(r, 6))
                    .fg(color)
                    .set_alignment(CellAlignment::Right),
            );
        }
        table.add_row(row);
    }
    table
}

/// First `max_rows` rows of a dataset as a table
pub fn preview_table(dataset: &Dataset, max_rows: usize) -> Table {
    let mut table = new_table();
    table.set_header(header(dataset.column_names().iter().cloned()));
    for row in dataset.rows().take(max_rows) {
        table.add_row(row.values().map(|v| Cell::new(v)).collect::<Vec<_>>());
    }
    table
}

fn print_indented(table: &Table, indent: &str) {
    for line in table.to_string().lines() {
        println!("{}{}", indent, line);
    }
}

/// Print a section heading followed by its table or its error.
pub fn display_section(section: &ReportSection) {
    println!();
    println!(
        "    {} {}",
        style(section.kind.title()).white().bold(),
        style(format!("({})", section.kind.name())).dim()
    );
    println!("    {}", style("─".repeat(50)).dim());

    match &section.result {
        Ok(output) => {
            if is_empty_output(output) {
                println!("      {}", style("(no groups)").dim());
            } else {
                print_indented(&section_table(output), "    ");
            }
        }
        Err(e) => {
            println!("      {} {}", style("✗").red().bold(), style(e).red());
        }
    }
}

fn is_empty_output(output: &SectionOutput) -> bool {
    matches!(output, SectionOutput::Aggregate(agg) if agg.is_empty())
}

/// Print a preview of an input table.
pub fn display_preview(name: &str, dataset: &Dataset, max_rows: usize) {
    println!();
    println!(
        "    {} {}",
        style(name).cyan().bold(),
        style(format!("[{} rows x {} columns]", dataset.size(), dataset.width())).dim()
    );
    print_indented(&preview_table(dataset, max_rows), "    ");
    if dataset.size() > max_rows {
        println!("      {}", style(format!("... {} more rows", dataset.size() - max_rows)).dim());
    }
}
