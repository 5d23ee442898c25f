//! OD request records and their approval workflow.
//!
//! A request is created Pending and moves to Approved, Rejected, or
//! Cancelled. Approval and rejection stamp `approved_at`/`approved_by`;
//! everything downstream (efficiency metrics, benchmarks) treats a
//! request as *processed* once that decision timestamp exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::StaffId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum OdStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl OdStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Statuses that carry a decision timestamp once set.
    pub fn is_decision(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// A student's request for authorized absence, assigned to one staff
/// member for review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OdRequest {
    pub request_id: String,
    pub student_id: String,
    pub student_name: String,
    pub register_number: Option<String>,
    pub staff_id: StaffId,
    /// The day the absence applies to.
    pub date: DateTime<Utc>,
    /// Period numbers covered by the absence.
    pub periods: Vec<u32>,
    pub reason: String,
    pub status: OdStatus,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub rejection_reason: Option<String>,
}

impl OdRequest {
    pub fn is_processed(&self) -> bool {
        self.approved_at.is_some()
    }

    /// Hours from submission to decision, when a decision exists.
    pub fn processing_hours(&self) -> Option<f64> {
        self.approved_at
            .map(|decided| (decided - self.created_at).num_seconds() as f64 / 3600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(status: OdStatus, decided_after_hours: Option<i64>) -> OdRequest {
        let created = Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap();
        OdRequest {
            request_id: "r-1".into(),
            student_id: "stu-1".into(),
            student_name: "Priya N".into(),
            register_number: Some("21CS042".into()),
            staff_id: "s-1".into(),
            date: created,
            periods: vec![1, 2],
            reason: "symposium".into(),
            status,
            attachment_url: None,
            created_at: created,
            approved_at: decided_after_hours.map(|h| created + chrono::Duration::hours(h)),
            approved_by: decided_after_hours.map(|_| "s-1".into()),
            rejection_reason: None,
        }
    }

    #[test]
    fn processing_hours_span_submission_to_decision() {
        let r = request(OdStatus::Approved, Some(36));
        assert_eq!(r.processing_hours(), Some(36.0));
        assert!(r.is_processed());
    }

    #[test]
    fn pending_requests_have_no_processing_time() {
        let r = request(OdStatus::Pending, None);
        assert_eq!(r.processing_hours(), None);
        assert!(!r.is_processed());
    }
}
