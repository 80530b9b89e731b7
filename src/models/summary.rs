use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EstimateVerdict, ProjectStatus};

/// Read-only report of a project at any point in its lifecycle.
///
/// Produced by [`Project::summarize`](super::Project::summarize). Serializes as
/// a nested JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project_code: String,
    pub responsible_user_id: String,
    pub status: ProjectStatus,
    pub dates: SummaryDates,
    pub costs: SummaryCosts,
    /// Profitability percentage rounded to two decimal places.
    pub profitability_pct: f64,
    pub estimate: EstimateVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDates {
    pub start: NaiveDate,
    pub estimated_end: NaiveDate,
    pub actual_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryCosts {
    pub total: f64,
    pub revenue: f64,
}
