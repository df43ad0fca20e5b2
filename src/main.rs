//! PayStat: Compensation Analytics CLI Tool
//!
//! A command-line tool that joins employee and salary tables and reports
//! per-department averages, salary statistics and salary/bonus correlation.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use paystat::cli::{confirm_overwrite, Cli};
use paystat::pipeline::{dataset_from_frame, frame_stats, load_frame, Dataset};
use paystat::report::{
    display_preview, display_section, export_report, run_report, AnalyticsReport, ChartSink,
    ExportParams, JsonChartSink, RunSummary,
};
use paystat::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.report_config();
    let chart_dir = cli.chart_dir();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &cli.employees,
        &cli.salaries,
        &config.key_column,
        config.group_order,
        cli.charts.then_some(chart_dir.as_path()),
    );

    // Step 1: Load both tables
    print_step_header(1, "Load Tables");
    let step_start = Instant::now();
    let employees = load_table("Employees", &cli.employees, cli.infer_schema_length)?;
    let compensation = load_table("Salaries", &cli.salaries, cli.infer_schema_length)?;
    let mut summary = RunSummary::new(employees.size(), compensation.size());
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    if cli.show_inputs {
        display_preview("Employees", &employees, cli.preview_rows);
        display_preview("Salaries", &compensation, cli.preview_rows);
    }

    // Step 2: Run the analytics report
    print_step_header(2, "Compensation Analytics");
    let step_start = Instant::now();
    let spinner = create_spinner("Joining tables and computing statistics...");
    let report = run_report(&employees, &compensation, &config);
    finish_with_success(&spinner, "Analytics complete");

    match &report.join {
        Ok(stats) => print_count(
            "merged row(s)",
            stats.merged_rows,
            Some(&format!(
                "({} employees x {} salary rows on '{}')",
                stats.employee_rows, stats.compensation_rows, config.key_column
            )),
        ),
        Err(e) => print_warning(&format!("Join failed: {}", e)),
    }
    for section in &report.sections {
        display_section(section);
    }
    summary.record_report(&report);
    let analysis_elapsed = step_start.elapsed();
    summary.set_analysis_time(analysis_elapsed);
    print_step_time(analysis_elapsed);

    // Step 3: Charts and JSON export
    print_step_header(3, "Write Outputs");
    let step_start = Instant::now();
    if cli.charts {
        let written = write_charts(&report, &chart_dir, cli.no_confirm)?;
        summary.add_charts(written);
    } else {
        print_info("Chart output disabled (use --charts to enable)");
    }

    if let Some(json_path) = &cli.report_json {
        if should_write(json_path, cli.no_confirm)? {
            let employees_file = cli.employees.display().to_string();
            let salaries_file = cli.salaries.display().to_string();
            export_report(
                &report,
                &config,
                json_path,
                &ExportParams {
                    employees_file: &employees_file,
                    salaries_file: &salaries_file,
                },
            )?;
            print_success(&format!("Report saved to {}", json_path.display()));
        } else {
            print_info(&format!("Kept existing {}", json_path.display()));
        }
    }
    let output_elapsed = step_start.elapsed();
    summary.set_output_time(output_elapsed);
    print_step_time(output_elapsed);

    summary.display();
    print_completion(report.failed_sections());

    Ok(())
}

/// Load a table through polars and convert it to a dataset
fn load_table(name: &str, path: &Path, infer_schema_length: usize) -> Result<Dataset> {
    let spinner = create_spinner(&format!("Loading {}...", path.display()));
    let df = load_frame(path, infer_schema_length)?;
    let (rows, cols, memory_mb) = frame_stats(&df);
    let dataset = dataset_from_frame(&df)?;
    finish_with_success(&spinner, &format!("{} loaded", name));

    println!("\n    {} {} Statistics:", style("✧").cyan(), name);
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);

    Ok(dataset)
}

/// Write every attached chart spec, asking before replacing existing files
fn write_charts(report: &AnalyticsReport, dir: &Path, no_confirm: bool) -> Result<usize> {
    let mut sink = JsonChartSink::new(dir);
    let mut written = 0;

    for spec in report.charts() {
        let path = sink.path_for(&spec.intent);
        if !should_write(&path, no_confirm)? {
            print_info(&format!("Skipped {}", path.display()));
            continue;
        }
        let path = sink.render(spec)?;
        print_success(&format!("{} -> {}", spec.intent.title, path.display()));
        written += 1;
    }

    if written == 0 {
        print_info("No charts written");
    }
    Ok(written)
}

fn should_write(path: &Path, no_confirm: bool) -> Result<bool> {
    if no_confirm || !path.exists() {
        return Ok(true);
    }
    confirm_overwrite(path)
}
