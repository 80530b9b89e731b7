//! Plain-text rendering of summaries and the project list.

use crate::models::{Project, ProjectSummary};
use crate::registry::Portfolio;

const NOT_SET: &str = "-";

/// Render a project summary as an indented block.
///
/// Example output:
/// ```text
/// Project P-001 (user u1)
/// ├── Status: completed
/// ├── Dates
/// │   ├── Start: 2024-01-01
/// │   ├── Estimated end: 2024-03-01
/// │   └── Actual end: 2024-02-15
/// ├── Costs
/// │   ├── Total: 1750.00
/// │   └── Revenue: 2000.00
/// ├── Profitability: 14.29%
/// └── Estimate: Adequate
/// ```
pub fn render_summary(summary: &ProjectSummary) -> String {
    let actual_end = summary
        .dates
        .actual_end
        .map(|d| d.to_string())
        .unwrap_or_else(|| NOT_SET.to_string());

    let mut output = String::new();
    output.push_str(&format!(
        "Project {} (user {})\n",
        summary.project_code, summary.responsible_user_id
    ));
    output.push_str(&format!("├── Status: {}\n", summary.status.as_str()));
    output.push_str("├── Dates\n");
    output.push_str(&format!("│   ├── Start: {}\n", summary.dates.start));
    output.push_str(&format!(
        "│   ├── Estimated end: {}\n",
        summary.dates.estimated_end
    ));
    output.push_str(&format!("│   └── Actual end: {}\n", actual_end));
    output.push_str("├── Costs\n");
    output.push_str(&format!("│   ├── Total: {:.2}\n", summary.costs.total));
    output.push_str(&format!("│   └── Revenue: {:.2}\n", summary.costs.revenue));
    output.push_str(&format!(
        "├── Profitability: {:.2}%\n",
        summary.profitability_pct
    ));
    output.push_str(&format!("└── Estimate: {}\n", summary.estimate.as_str()));
    output
}

/// One line per project: code, status and estimate verdict.
pub fn render_list<'a>(projects: impl IntoIterator<Item = &'a Project>) -> String {
    let mut output = String::new();
    for project in projects {
        output.push_str(&format!(
            "{}  {:<11}  {}\n",
            project.project_code(),
            project.status().as_str(),
            project.evaluate_estimate_accuracy().as_str()
        ));
    }
    if output.is_empty() {
        output.push_str("No projects registered.\n");
    }
    output
}

pub fn render_portfolio(portfolio: &Portfolio) -> String {
    format!(
        "Projects: {} (in progress {}, completed {}, cancelled {})\n\
         Total cost: {:.2}\n\
         Total revenue: {:.2}\n\
         Profitability: {:.2}%\n",
        portfolio.project_count,
        portfolio.in_progress,
        portfolio.completed,
        portfolio.cancelled,
        portfolio.total_cost,
        portfolio.total_revenue,
        portfolio.profitability_pct,
    )
}
