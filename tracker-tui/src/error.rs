//! Error types for the tracker.
//!
//! Store errors are recovered where they happen and only logged. Validation
//! errors are shown to the user and abort the submission that caused them.

use chrono::NaiveDate;
use thiserror::Error;

/// Failure reading or writing persisted project data
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored document is not valid: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("seed document unavailable: {0}")]
    Seed(String),
}

/// Reasons an add-project submission is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Project name is required")]
    EmptyName,
    #[error("{field} is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate { field: String },
    #[error("End date must be after start date")]
    EndBeforeStart,
    #[error("At least one task is required")]
    NoTasks,
    #[error("Task name is required")]
    EmptyTaskLabel,
    #[error("Task date must be between {start} and {end}")]
    TaskOutOfRange { start: NaiveDate, end: NaiveDate },
}

pub type StoreResult<T> = Result<T, StoreError>;
