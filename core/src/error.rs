use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Staff member '{staff_id}' not found")]
    StaffNotFound { staff_id: String },

    #[error("Department '{department}' has no staff on record")]
    DepartmentNotFound { department: String },

    #[error("Invalid date range: end {end} precedes start {start}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Insufficient data for {operation}: need {required} points, got {actual}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
