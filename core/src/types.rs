//! Shared primitive types used across the entire engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// The canonical staff identifier.
pub type StaffId = String;

/// A semester label, e.g. "2025-ODD". Labels must sort chronologically
/// for one staff member (the workload store relies on this for its
/// "latest record wins" lookup).
pub type Semester = String;

/// A staff roster entry. Immutable once loaded; owned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffMember {
    pub staff_id: StaffId,
    pub name: String,
    pub department: String,
    pub subject_specialty: String,
    pub years_taught: u32,
    pub phone: Option<String>,
    pub designation: Option<String>,
}

/// Severity scale shared by workload alerts and time conflicts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A half-open analysis window. `end` must not precede `start`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AnalyticsResult<Self> {
        if end < start {
            return Err(AnalyticsError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Fractional weeks covered by the range: days / 7.0, never rounded.
    pub fn weeks(&self) -> f64 {
        let days = (self.end - self.start).num_seconds() as f64 / 86_400.0;
        days / 7.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn fourteen_days_is_two_weeks() {
        let range = DateRange::new(utc(2025, 6, 1), utc(2025, 6, 15)).unwrap();
        assert!((range.weeks() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn partial_weeks_stay_fractional() {
        let range = DateRange::new(utc(2025, 6, 1), utc(2025, 6, 11)).unwrap();
        assert!((range.weeks() - 10.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = DateRange::new(utc(2025, 6, 15), utc(2025, 6, 1)).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidRange { .. }));
    }
}
