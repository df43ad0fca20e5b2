//! Terminal styling utilities for the report console

use console::{style, Emoji};
use std::path::Path;

use crate::pipeline::GroupOrder;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

/// Print the application banner with ASCII art
pub fn print_banner(version: &str) {
    let banner = r#"
     ____             ____  _        _
    |  _ \ __ _ _   _/ ___|| |_ __ _| |_
    | |_) / _` | | | \___ \| __/ _` | __|
    |  __/ (_| | |_| |___) | || (_| | |_
    |_|   \__,_|\__, |____/ \__\__,_|\__|
                |___/
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("$").magenta().bold(),
        style("Compensation analytics by department").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(
    employees: &Path,
    salaries: &Path,
    key_column: &str,
    group_order: GroupOrder,
    chart_dir: Option<&Path>,
) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Employees: {:<36}│",
        FOLDER,
        truncate_path(employees, 35)
    );
    println!(
        "    │  {} Salaries:  {:<36}│",
        FOLDER,
        truncate_path(salaries, 35)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Join key:    {:<34}│",
        LINK,
        style(truncate_string(key_column, 33)).yellow()
    );
    println!(
        "    │  {} Group order: {:<34}│",
        CHART,
        style(group_order.to_string()).yellow()
    );
    let charts = chart_dir
        .map(|d| truncate_path(d, 33))
        .unwrap_or_else(|| "disabled".to_string());
    println!("    │  {} Charts:      {:<34}│", SAVE, style(charts).yellow());
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print elapsed time for a finished step
pub fn print_step_time(elapsed: std::time::Duration) {
    println!(
        "    {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print the final completion message
pub fn print_completion(failed_sections: usize) {
    println!();
    if failed_sections == 0 {
        println!(
            "    {} {}",
            ROCKET,
            style("PayStat report complete!").green().bold()
        );
    } else {
        println!(
            "    {} {}",
            WARN,
            style(format!(
                "PayStat report complete with {} failed section(s)",
                failed_sections
            ))
            .yellow()
            .bold()
        );
    }
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      {} {}", style(count).yellow().bold(), description);
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(len + 3 - max_len).collect();
        format!("...{}", tail)
    }
}
