//! OD processing efficiency metrics.
//!
//! Derived from the request ledger for one staff member and range:
//!   1. Processing and response time statistics over decided requests.
//!   2. Approval rate across everything submitted in the window.
//!   3. The institution-wide request summary (totals, status
//!      distribution, most frequent requesters).
//!
//! An empty request set is an expected state and yields the zero
//! object, never an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    requests::{OdRequest, OdStatus},
    types::StaffId,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EfficiencyMetrics {
    pub staff_id: StaffId,
    pub total_requests: u64,
    pub approved: u64,
    pub rejected: u64,
    pub pending: u64,
    pub cancelled: u64,
    /// Percent of all requests in the window that were approved.
    pub approval_rate: f64,
    /// Mean hours from submission to decision, over decided requests.
    pub avg_processing_hours: f64,
    /// Currently identical to avg_processing_hours: the ledger has no
    /// first-touch timestamp to measure against.
    pub avg_response_hours: f64,
}

impl EfficiencyMetrics {
    pub fn zero(staff_id: &str) -> Self {
        Self {
            staff_id: staff_id.to_string(),
            total_requests: 0,
            approved: 0,
            rejected: 0,
            pending: 0,
            cancelled: 0,
            approval_rate: 0.0,
            avg_processing_hours: 0.0,
            avg_response_hours: 0.0,
        }
    }
}

/// Metrics over the requests already filtered to one staff member and
/// date range.
pub fn efficiency_metrics(staff_id: &str, requests: &[OdRequest]) -> EfficiencyMetrics {
    if requests.is_empty() {
        return EfficiencyMetrics::zero(staff_id);
    }

    let mut metrics = EfficiencyMetrics::zero(staff_id);
    metrics.total_requests = requests.len() as u64;

    let mut processing_total = 0.0f64;
    let mut processed = 0u64;

    for request in requests {
        match request.status {
            OdStatus::Approved => metrics.approved += 1,
            OdStatus::Rejected => metrics.rejected += 1,
            OdStatus::Pending => metrics.pending += 1,
            OdStatus::Cancelled => metrics.cancelled += 1,
        }
        if let Some(hours) = request.processing_hours() {
            processing_total += hours;
            processed += 1;
        }
    }

    metrics.approval_rate = metrics.approved as f64 / metrics.total_requests as f64 * 100.0;
    if processed > 0 {
        metrics.avg_processing_hours = processing_total / processed as f64;
        metrics.avg_response_hours = metrics.avg_processing_hours;
    }

    metrics
}

// ── Request summary ──────────────────────────────────────────────────────────

pub const TOP_STUDENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentRequestCount {
    pub student_id: String,
    pub requests: u64,
}

/// Institution-wide view of the request ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestSummary {
    pub total_requests: u64,
    pub status_distribution: BTreeMap<OdStatus, u64>,
    pub top_students: Vec<StudentRequestCount>,
}

/// Totals, status distribution, and the most frequent requesters.
pub fn summarize_requests(requests: &[OdRequest]) -> RequestSummary {
    let mut status_distribution: BTreeMap<OdStatus, u64> = BTreeMap::new();
    let mut per_student: BTreeMap<&str, u64> = BTreeMap::new();

    for request in requests {
        *status_distribution.entry(request.status).or_default() += 1;
        *per_student.entry(request.student_id.as_str()).or_default() += 1;
    }

    let mut counts: Vec<StudentRequestCount> = per_student
        .into_iter()
        .map(|(student_id, requests)| StudentRequestCount {
            student_id: student_id.to_string(),
            requests,
        })
        .collect();
    // Highest count first; the BTreeMap source keeps ties in id order.
    counts.sort_by(|a, b| b.requests.cmp(&a.requests));
    counts.truncate(TOP_STUDENT_LIMIT);

    RequestSummary {
        total_requests: requests.len() as u64,
        status_distribution,
        top_students: counts,
    }
}
