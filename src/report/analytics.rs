//! Compensation report pipeline
//!
//! Runs the fixed sequence of analyses over the employee and compensation
//! tables and collects a result-or-error per section, so one failing step
//! never hides the others.

use std::fmt;

use serde::Serialize;

use crate::pipeline::{
    correlation_matrix, describe, group_mean, histogram, inner_join, AnalyticsError, BinRule,
    CorrelationMatrix, Dataset, DescribeSummary, GroupOrder, GroupedAggregate,
};

use super::chart::{ChartData, ChartIntent, ChartKind, ChartSpec};

/// Explicit configuration for one report run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportConfig {
    /// Join key present in both tables
    pub key_column: String,
    /// Categorical column on the employee side
    pub group_column: String,
    pub salary_column: String,
    pub bonus_column: String,
    pub group_order: GroupOrder,
    /// Attach chart specs to successful sections
    pub charts: bool,
    pub histogram_bins: BinRule,
    /// Run the independent sections on the rayon pool
    pub parallel: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            key_column: "id".to_string(),
            group_column: "department".to_string(),
            salary_column: "salary".to_string(),
            bonus_column: "bonus".to_string(),
            group_order: GroupOrder::Sorted,
            charts: false,
            histogram_bins: BinRule::Sturges,
            parallel: true,
        }
    }
}

/// The four named report sections, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    AvgSalaryByDepartment,
    AvgBonusByDepartment,
    SalarySummary,
    SalaryBonusCorrelation,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::AvgSalaryByDepartment,
        SectionKind::AvgBonusByDepartment,
        SectionKind::SalarySummary,
        SectionKind::SalaryBonusCorrelation,
    ];

    /// Stable result name handed to presentation collaborators
    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::AvgSalaryByDepartment => "avg_salary_by_department",
            SectionKind::AvgBonusByDepartment => "avg_bonus_by_department",
            SectionKind::SalarySummary => "salary_summary",
            SectionKind::SalaryBonusCorrelation => "salary_bonus_correlation",
        }
    }

    /// Human-readable heading
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::AvgSalaryByDepartment => "Average Salaries Per Department",
            SectionKind::AvgBonusByDepartment => "Average Bonus Per Department",
            SectionKind::SalarySummary => "Salary Distribution Statistics",
            SectionKind::SalaryBonusCorrelation => "Salary / Bonus Correlation Matrix",
        }
    }

    /// Default chart for the section
    pub fn chart_intent(&self) -> ChartIntent {
        match self {
            SectionKind::AvgSalaryByDepartment => {
                ChartIntent::new(ChartKind::Bar, "Average Salaries per Department", "avg_salary.png")
                    .with_labels("Department", "Average Salary")
            }
            SectionKind::AvgBonusByDepartment => {
                ChartIntent::new(ChartKind::Bar, "Average Bonus per Department", "avg_bonus.png")
                    .with_labels("Department", "Average Bonus")
            }
            SectionKind::SalarySummary => {
                ChartIntent::new(ChartKind::Histogram, "Distribution of Salary", "dist_salary.png")
                    .with_labels("Salary", "Count")
            }
            SectionKind::SalaryBonusCorrelation => ChartIntent::new(
                ChartKind::Heatmap,
                "Correlation Matrix Heatmap",
                "correlation_matrix.png",
            ),
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Successful output of a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionOutput {
    Aggregate(GroupedAggregate),
    Summary(DescribeSummary),
    Correlation(CorrelationMatrix),
}

/// One named report result.
#[derive(Debug, Clone)]
pub struct ReportSection {
    pub kind: SectionKind,
    pub result: Result<SectionOutput, AnalyticsError>,
    pub chart: Option<ChartSpec>,
}

impl ReportSection {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcome of the join step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinStats {
    pub employee_rows: usize,
    pub compensation_rows: usize,
    pub merged_rows: usize,
}

/// Every section of a run plus the join outcome.
#[derive(Debug, Clone)]
pub struct AnalyticsReport {
    pub join: Result<JoinStats, AnalyticsError>,
    pub sections: Vec<ReportSection>,
}

impl AnalyticsReport {
    pub fn section(&self, kind: SectionKind) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn aggregate(&self, kind: SectionKind) -> Option<&GroupedAggregate> {
        match self.section(kind)?.result.as_ref().ok()? {
            SectionOutput::Aggregate(agg) => Some(agg),
            _ => None,
        }
    }

    pub fn salary_summary(&self) -> Option<&DescribeSummary> {
        match self.section(SectionKind::SalarySummary)?.result.as_ref().ok()? {
            SectionOutput::Summary(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn correlation(&self) -> Option<&CorrelationMatrix> {
        match self.section(SectionKind::SalaryBonusCorrelation)?.result.as_ref().ok()? {
            SectionOutput::Correlation(matrix) => Some(matrix),
            _ => None,
        }
    }

    pub fn failed_sections(&self) -> usize {
        self.sections.iter().filter(|s| !s.is_ok()).count()
    }

    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.sections.iter().filter_map(|s| s.chart.as_ref())
    }
}

type Step<T> = Result<T, AnalyticsError>;

/// Run the full report over the employee and compensation tables.
///
/// Steps:
/// 1. Inner join compensation rows to employees on the key column.
/// 2. Mean salary per department over the merged table.
/// 3. Mean bonus per department over the merged table.
/// 4. Descriptive statistics of salary over the raw compensation table.
/// 5. Salary/bonus correlation over the raw compensation table.
///
/// A join failure is reported in place of steps 2 and 3; steps 4 and 5 run
/// regardless. With `config.parallel` the independent steps run on the rayon
/// pool; results are identical either way.
pub fn run_report(employees: &Dataset, compensation: &Dataset, config: &ReportConfig) -> AnalyticsReport {
    let merged = inner_join(employees, compensation, &config.key_column);

    let by_department = |value_column: &str| -> Step<GroupedAggregate> {
        let merged = merged.as_ref().map_err(Clone::clone)?;
        group_mean(merged, &config.group_column, value_column, config.group_order)
    };
    let salary_summary = || describe(compensation, &config.salary_column);
    let correlation = || {
        correlation_matrix(
            compensation,
            &[config.salary_column.as_str(), config.bonus_column.as_str()],
        )
    };

    let ((avg_salary, avg_bonus), (summary, corr)) = if config.parallel {
        rayon::join(
            || {
                rayon::join(
                    || by_department(&config.salary_column),
                    || by_department(&config.bonus_column),
                )
            },
            || rayon::join(salary_summary, correlation),
        )
    } else {
        (
            (by_department(&config.salary_column), by_department(&config.bonus_column)),
            (salary_summary(), correlation()),
        )
    };

    let sections = vec![
        aggregate_section(SectionKind::AvgSalaryByDepartment, avg_salary, config),
        aggregate_section(SectionKind::AvgBonusByDepartment, avg_bonus, config),
        summary_section(summary, compensation, config),
        correlation_section(corr, config),
    ];

    AnalyticsReport {
        join: merged.map(|m| JoinStats {
            employee_rows: employees.size(),
            compensation_rows: compensation.size(),
            merged_rows: m.size(),
        }),
        sections,
    }
}

fn aggregate_section(kind: SectionKind, result: Step<GroupedAggregate>, config: &ReportConfig) -> ReportSection {
    let chart = match &result {
        Ok(agg) if config.charts => Some(ChartSpec {
            intent: kind.chart_intent(),
            data: ChartData::bars(agg),
        }),
        _ => None,
    };
    ReportSection {
        kind,
        result: result.map(SectionOutput::Aggregate),
        chart,
    }
}

fn summary_section(result: Step<DescribeSummary>, compensation: &Dataset, config: &ReportConfig) -> ReportSection {
    let kind = SectionKind::SalarySummary;
    // Histogram failures only drop the chart, never the summary
    let chart = match &result {
        Ok(_) if config.charts => histogram(compensation, &config.salary_column, config.histogram_bins)
            .ok()
            .map(|h| ChartSpec {
                intent: kind.chart_intent(),
                data: ChartData::histogram(&h),
            }),
        _ => None,
    };
    ReportSection {
        kind,
        result: result.map(SectionOutput::Summary),
        chart,
    }
}

fn correlation_section(result: Step<CorrelationMatrix>, config: &ReportConfig) -> ReportSection {
    let kind = SectionKind::SalaryBonusCorrelation;
    let chart = match &result {
        Ok(matrix) if config.charts => Some(ChartSpec {
            intent: kind.chart_intent(),
            data: ChartData::heatmap(matrix),
        }),
        _ => None,
    };
    ReportSection {
        kind,
        result: result.map(SectionOutput::Correlation),
        chart,
    }
}
