use chrono::NaiveDate;
use thiserror::Error;

use super::ProjectStatus;

/// Errors raised by [`Project`](super::Project) construction and lifecycle operations.
///
/// Every variant is raised before any field is touched, so a failed call leaves
/// the project exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectError {
    #[error("Invalid status '{value}'. Must be one of: {}", .allowed.join(", "))]
    InvalidStatus {
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("Start date {start} cannot be after the {bound} date {end}")]
    InvalidDateRange {
        start: NaiveDate,
        end: NaiveDate,
        bound: DateBound,
    },

    #[error("Completion date {date} cannot be before the start date {start}")]
    InvalidCompletionDate { date: NaiveDate, start: NaiveDate },

    #[error("Project is already {} and cannot be completed again", .status.as_str())]
    TerminalState { status: ProjectStatus },
}

/// Which end date a [`ProjectError::InvalidDateRange`] was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    EstimatedEnd,
    ActualEnd,
}

impl std::fmt::Display for DateBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EstimatedEnd => f.write_str("estimated end"),
            Self::ActualEnd => f.write_str("actual end"),
        }
    }
}
