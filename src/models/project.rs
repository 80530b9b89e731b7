use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::{DateBound, ProjectError};
use super::summary::{ProjectSummary, SummaryCosts, SummaryDates};

/// An engineering project and the financial and schedule facts entered for it.
///
/// Projects are built through [`Project::new`], which validates the status label
/// and the date ordering. After that, state only changes through
/// [`record_actual_completion`](Project::record_actual_completion) and
/// [`cancel`](Project::cancel).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    responsible_user_id: String,
    project_code: String,
    start_date: NaiveDate,
    estimated_end_date: NaiveDate,
    actual_end_date: Option<NaiveDate>,
    /// Hours billed by the project lead.
    lead_hours: f64,
    /// Hours billed by the staff engineer.
    engineer_hours: f64,
    subcontracting_cost: f64,
    expenses: f64,
    /// Amount billed to the client.
    revenue: f64,
    lead_hourly_rate: f64,
    engineer_hourly_rate: f64,
    status: ProjectStatus,
}

/// Lifecycle state of a project.
///
/// - `InProgress`: Initial state
/// - `Completed`: An actual completion date was recorded
/// - `Cancelled`: Stopped; stamped with the cancellation date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [Self::InProgress, Self::Completed, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Accepts the snake_case labels and the variant names.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "in_progress" | "InProgress" => Some(Self::InProgress),
            "completed" | "Completed" => Some(Self::Completed),
            "cancelled" | "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Like [`from_str`](Self::from_str), but reports the allowed labels on failure.
    pub fn parse(s: &str) -> Result<Self, ProjectError> {
        Self::from_str(s).ok_or_else(|| ProjectError::InvalidStatus {
            value: s.to_string(),
            allowed: Self::ALL.iter().map(|status| status.as_str()).collect(),
        })
    }

    /// Completed and Cancelled are terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Verdict comparing the actual completion date against the estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EstimateVerdict {
    /// Not yet evaluable. Also reported for cancelled projects.
    InProgress,
    /// Finished on or before the estimated end date.
    Adequate,
    /// Finished after the estimated end date.
    Inadequate,
}

impl EstimateVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "InProgress",
            Self::Adequate => "Adequate",
            Self::Inadequate => "Inadequate",
        }
    }
}

/// How [`Project::record_actual_completion_with`] treats projects that are
/// already Completed or Cancelled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Re-completing overwrites the completion date and forces `Completed`,
    /// even from `Cancelled`.
    #[default]
    Permissive,
    /// Completing a project in a terminal state fails with
    /// [`ProjectError::TerminalState`].
    TerminalLocked,
}

/// Input for creating a new project.
///
/// Fields arrive already typed; the only text that is still validated is the
/// optional status label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectInput {
    pub responsible_user_id: String,
    pub project_code: String,
    pub start_date: NaiveDate,
    pub estimated_end_date: NaiveDate,
    pub lead_hours: f64,
    pub engineer_hours: f64,
    pub subcontracting_cost: f64,
    pub expenses: f64,
    pub revenue: f64,
    pub lead_hourly_rate: f64,
    pub engineer_hourly_rate: f64,
    /// Status label (`in_progress`, `completed`, `cancelled`, or the variant
    /// name such as `InProgress`). Defaults to `in_progress`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub actual_end_date: Option<NaiveDate>,
}

impl Project {
    /// Validate the input and build a project.
    ///
    /// The status label is checked before the dates, so an input that is wrong
    /// on both counts reports [`ProjectError::InvalidStatus`].
    pub fn new(input: CreateProjectInput) -> Result<Self, ProjectError> {
        let status = match input.status.as_deref() {
            Some(label) => ProjectStatus::parse(label)?,
            None => ProjectStatus::default(),
        };

        validate_dates(
            input.start_date,
            input.estimated_end_date,
            input.actual_end_date,
        )?;

        Ok(Self {
            responsible_user_id: input.responsible_user_id,
            project_code: input.project_code,
            start_date: input.start_date,
            estimated_end_date: input.estimated_end_date,
            actual_end_date: input.actual_end_date,
            lead_hours: input.lead_hours,
            engineer_hours: input.engineer_hours,
            subcontracting_cost: input.subcontracting_cost,
            expenses: input.expenses,
            revenue: input.revenue,
            lead_hourly_rate: input.lead_hourly_rate,
            engineer_hourly_rate: input.engineer_hourly_rate,
            status,
        })
    }

    pub fn responsible_user_id(&self) -> &str {
        &self.responsible_user_id
    }

    pub fn project_code(&self) -> &str {
        &self.project_code
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn estimated_end_date(&self) -> NaiveDate {
        self.estimated_end_date
    }

    pub fn actual_end_date(&self) -> Option<NaiveDate> {
        self.actual_end_date
    }

    pub fn lead_hours(&self) -> f64 {
        self.lead_hours
    }

    pub fn engineer_hours(&self) -> f64 {
        self.engineer_hours
    }

    pub fn subcontracting_cost(&self) -> f64 {
        self.subcontracting_cost
    }

    pub fn expenses(&self) -> f64 {
        self.expenses
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    pub fn lead_hourly_rate(&self) -> f64 {
        self.lead_hourly_rate
    }

    pub fn engineer_hourly_rate(&self) -> f64 {
        self.engineer_hourly_rate
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Labor for both roles plus subcontracting and expenses.
    pub fn calculate_total_cost(&self) -> f64 {
        self.lead_hours * self.lead_hourly_rate
            + self.engineer_hours * self.engineer_hourly_rate
            + self.subcontracting_cost
            + self.expenses
    }

    /// Markup of revenue over total cost, as a percentage.
    ///
    /// Returns `0.0` when the total cost is zero.
    pub fn calculate_profitability(&self) -> f64 {
        profitability(self.revenue, self.calculate_total_cost())
    }

    /// Record the actual completion date and mark the project `Completed`.
    ///
    /// Uses [`CompletionPolicy::Permissive`]: an already completed or cancelled
    /// project is completed again with the new date.
    pub fn record_actual_completion(&mut self, date: NaiveDate) -> Result<(), ProjectError> {
        self.record_actual_completion_with(date, CompletionPolicy::Permissive)
    }

    pub fn record_actual_completion_with(
        &mut self,
        date: NaiveDate,
        policy: CompletionPolicy,
    ) -> Result<(), ProjectError> {
        if date < self.start_date {
            return Err(ProjectError::InvalidCompletionDate {
                date,
                start: self.start_date,
            });
        }
        if policy == CompletionPolicy::TerminalLocked && self.status.is_terminal() {
            return Err(ProjectError::TerminalState {
                status: self.status,
            });
        }

        self.actual_end_date = Some(date);
        self.status = ProjectStatus::Completed;
        Ok(())
    }

    /// Cancel the project, stamping today's local date as its end date.
    pub fn cancel(&mut self) {
        self.cancel_on(Local::now().date_naive());
    }

    /// Cancel the project with an explicit cancellation date.
    ///
    /// The date is not checked against the start date.
    pub fn cancel_on(&mut self, date: NaiveDate) {
        self.status = ProjectStatus::Cancelled;
        self.actual_end_date = Some(date);
    }

    /// Compare the actual completion date to the estimate.
    ///
    /// Only `Completed` projects are evaluated; anything else, including a
    /// cancelled project that carries a cancellation date, is `InProgress`.
    pub fn evaluate_estimate_accuracy(&self) -> EstimateVerdict {
        match (self.status, self.actual_end_date) {
            (ProjectStatus::Completed, Some(actual)) if actual <= self.estimated_end_date => {
                EstimateVerdict::Adequate
            }
            (ProjectStatus::Completed, Some(_)) => EstimateVerdict::Inadequate,
            _ => EstimateVerdict::InProgress,
        }
    }

    pub fn summarize(&self) -> ProjectSummary {
        ProjectSummary {
            project_code: self.project_code.clone(),
            responsible_user_id: self.responsible_user_id.clone(),
            status: self.status,
            dates: SummaryDates {
                start: self.start_date,
                estimated_end: self.estimated_end_date,
                actual_end: self.actual_end_date,
            },
            costs: SummaryCosts {
                total: self.calculate_total_cost(),
                revenue: self.revenue,
            },
            profitability_pct: round_to_cents(self.calculate_profitability()),
            estimate: self.evaluate_estimate_accuracy(),
        }
    }
}

/// `(revenue - cost) / cost * 100`, or `0.0` for a zero cost.
pub(crate) fn profitability(revenue: f64, total_cost: f64) -> f64 {
    if total_cost == 0.0 {
        return 0.0;
    }
    (revenue - total_cost) / total_cost * 100.0
}

/// Round to two decimal places, comparing the exact binary value against the
/// halfway point and breaking exact ties to the even cent.
pub(crate) fn round_to_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() || scaled.abs() >= 4_503_599_627_370_496.0 {
        return value;
    }

    // value * 100 == scaled + residual exactly.
    let residual = value.mul_add(100.0, -scaled);
    let floor = scaled.floor();
    let above_half = (scaled - floor - 0.5) + residual;

    let cents = if above_half < 0.0 {
        floor
    } else if above_half > 0.0 || floor.rem_euclid(2.0) != 0.0 {
        floor + 1.0
    } else {
        floor
    };
    cents / 100.0
}

fn validate_dates(
    start: NaiveDate,
    estimated_end: NaiveDate,
    actual_end: Option<NaiveDate>,
) -> Result<(), ProjectError> {
    if start > estimated_end {
        return Err(ProjectError::InvalidDateRange {
            start,
            end: estimated_end,
            bound: DateBound::EstimatedEnd,
        });
    }
    if let Some(actual) = actual_end {
        if start > actual {
            return Err(ProjectError::InvalidDateRange {
                start,
                end: actual,
                bound: DateBound::ActualEnd,
            });
        }
    }
    Ok(())
}
