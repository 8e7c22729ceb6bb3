//! Domain models for the project tracker.
//!
//! The serialized shape is `{ "projects": [...] }` with the field names
//! `name`, `status`, `start`, `end`, `tasks`, `task` and `date`, plus a stable
//! `id`. Dates are `YYYY-MM-DD` and map to `NaiveDate`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Date format used by the stored document and the form fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Project status.
///
/// The four known labels are matched exactly; any other label is kept
/// verbatim so that a document round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    Completed,
    #[default]
    InProgress,
    OnHold,
    Cancelled,
    Unknown(String),
}

impl ProjectStatus {
    /// Statuses offered by the add-project form
    #[cfg(test)]
    pub fn all() -> &'static [ProjectStatus] {
        &[
            ProjectStatus::InProgress,
            ProjectStatus::Completed,
            ProjectStatus::OnHold,
            ProjectStatus::Cancelled,
        ]
    }

    /// Cycle to the next selectable status
    pub fn next(&self) -> Self {
        match self {
            ProjectStatus::InProgress => ProjectStatus::Completed,
            ProjectStatus::Completed => ProjectStatus::OnHold,
            ProjectStatus::OnHold => ProjectStatus::Cancelled,
            ProjectStatus::Cancelled | ProjectStatus::Unknown(_) => ProjectStatus::InProgress,
        }
    }

    /// Cycle to the previous selectable status
    pub fn previous(&self) -> Self {
        match self {
            ProjectStatus::InProgress | ProjectStatus::Unknown(_) => ProjectStatus::Cancelled,
            ProjectStatus::Completed => ProjectStatus::InProgress,
            ProjectStatus::OnHold => ProjectStatus::Completed,
            ProjectStatus::Cancelled => ProjectStatus::OnHold,
        }
    }

    /// Display label, identical to the stored string
    pub fn label(&self) -> &str {
        match self {
            ProjectStatus::Completed => "Completed",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::OnHold => "On Hold",
            ProjectStatus::Cancelled => "Cancelled",
            ProjectStatus::Unknown(label) => label,
        }
    }
}

impl From<String> for ProjectStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Completed" => ProjectStatus::Completed,
            "In Progress" => ProjectStatus::InProgress,
            "On Hold" => ProjectStatus::OnHold,
            "Cancelled" => ProjectStatus::Cancelled,
            _ => ProjectStatus::Unknown(value),
        }
    }
}

impl From<ProjectStatus> for String {
    fn from(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::Unknown(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A dated task belonging to a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task: String,
    pub date: NaiveDate,
}

/// A tracked project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable identity. Records stored without one deserialize as nil and
    /// are assigned a fresh id by the store.
    #[serde(default)]
    pub id: Uuid,
    pub name: String,
    pub status: ProjectStatus,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// The persisted document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectsDocument {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// A task row as entered in the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub label: String,
    pub date: String,
}

/// Add-project submission (write side)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub status: ProjectStatus,
    pub start: String,
    pub end: String,
    pub tasks: Vec<NewTask>,
}

impl NewProject {
    /// Validate the whole submission and build the project.
    ///
    /// Any invalid field or task rejects the submission; no partial project
    /// is ever produced.
    pub fn build(&self) -> Result<Project, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let start = parse_date(&self.start, "Start date")?;
        let end = parse_date(&self.end, "End date")?;
        if start > end {
            return Err(ValidationError::EndBeforeStart);
        }
        if self.tasks.is_empty() {
            return Err(ValidationError::NoTasks);
        }

        let mut tasks = Vec::with_capacity(self.tasks.len());
        for row in &self.tasks {
            if row.label.trim().is_empty() {
                return Err(ValidationError::EmptyTaskLabel);
            }
            let date = parse_date(&row.date, "Task date")?;
            if date < start || date > end {
                return Err(ValidationError::TaskOutOfRange { start, end });
            }
            tasks.push(Task {
                task: row.label.clone(),
                date,
            });
        }

        Ok(Project {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            status: self.status.clone(),
            start,
            end,
            tasks,
        })
    }
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field: field.to_string(),
    })
}
