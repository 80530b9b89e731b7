//! In-process collection of the projects entered during a session.
//!
//! The registry is append-only and keeps insertion order. It never edits a
//! project's fields itself; lifecycle changes go through the project's own
//! operations.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::models::*;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Project not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Project(#[from] ProjectError),
}

/// Aggregate figures across every registered project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    pub project_count: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub total_cost: f64,
    pub total_revenue: f64,
    /// Profitability over the summed cost and revenue, rounded to two decimals.
    pub profitability_pct: f64,
}

#[derive(Debug, Default)]
pub struct ProjectRegistry {
    projects: Vec<Project>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================================
    // Registration
    // ============================================================

    /// Validate the input and append the resulting project.
    pub fn register(&mut self, input: CreateProjectInput) -> Result<&Project, ProjectError> {
        let code = input.project_code.clone();
        match Project::new(input) {
            Ok(project) => {
                tracing::info!("Registered project {}", code);
                Ok(self.push(project))
            }
            Err(e) => {
                tracing::warn!("Rejected project {}: {}", code, e);
                Err(e)
            }
        }
    }

    pub fn push(&mut self, project: Project) -> &Project {
        if self.get(project.project_code()).is_some() {
            tracing::debug!(
                "Project code {} is already registered; lookups return the first entry",
                project.project_code()
            );
        }
        self.projects.push(project);
        &self.projects[self.projects.len() - 1]
    }

    // ============================================================
    // Lookup
    // ============================================================

    /// First project registered under `code`.
    pub fn get(&self, code: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.project_code() == code)
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.project_code() == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    // ============================================================
    // Lifecycle
    // ============================================================

    pub fn complete(
        &mut self,
        code: &str,
        date: NaiveDate,
        policy: CompletionPolicy,
    ) -> Result<&Project, RegistryError> {
        let project = self
            .get_mut(code)
            .ok_or_else(|| RegistryError::NotFound(code.to_string()))?;

        project.record_actual_completion_with(date, policy)?;
        tracing::info!("Project {} completed on {}", code, date);
        Ok(project)
    }

    pub fn cancel(&mut self, code: &str) -> Result<&Project, RegistryError> {
        let project = self
            .get_mut(code)
            .ok_or_else(|| RegistryError::NotFound(code.to_string()))?;

        project.cancel();
        tracing::info!("Project {} cancelled", code);
        Ok(project)
    }

    // ============================================================
    // Reporting
    // ============================================================

    pub fn portfolio(&self) -> Portfolio {
        let mut portfolio = Portfolio {
            project_count: self.projects.len(),
            in_progress: 0,
            completed: 0,
            cancelled: 0,
            total_cost: 0.0,
            total_revenue: 0.0,
            profitability_pct: 0.0,
        };

        for project in &self.projects {
            match project.status() {
                ProjectStatus::InProgress => portfolio.in_progress += 1,
                ProjectStatus::Completed => portfolio.completed += 1,
                ProjectStatus::Cancelled => portfolio.cancelled += 1,
            }
            portfolio.total_cost += project.calculate_total_cost();
            portfolio.total_revenue += project.revenue();
        }

        portfolio.profitability_pct = round_to_cents(profitability(
            portfolio.total_revenue,
            portfolio.total_cost,
        ));
        portfolio
    }
}
