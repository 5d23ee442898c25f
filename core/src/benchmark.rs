//! Cohort benchmarking: percentile ranks and aggregate comparisons.
//!
//! The department cohort is everyone in the same department excluding
//! the staff member under comparison; the institution cohort is all
//! staff excluding them. Cohort averages only count members with at
//! least one decided request; members with no data are skipped, never
//! treated as zeros.

use serde::{Deserialize, Serialize};

use crate::{
    efficiency::EfficiencyMetrics,
    trend::TrendAnalysis,
    types::{Semester, StaffId},
};

/// Percentile rank of `value` within `dataset`:
/// (count below + half the count equal) / n, as a percentage.
/// An empty dataset has no rank and yields the 0.0 sentinel.
pub fn percentile_rank(value: f64, dataset: &[f64]) -> f64 {
    if dataset.is_empty() {
        return 0.0;
    }
    let below = dataset.iter().filter(|&&v| v < value).count() as f64;
    let equal = dataset.iter().filter(|&&v| v == value).count() as f64;
    (below + 0.5 * equal) / dataset.len() as f64 * 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonMetrics {
    /// Cohort members that actually carried data.
    pub cohort_size: u64,
    pub avg_processing_hours: f64,
    pub avg_approval_rate: f64,
    pub avg_response_hours: f64,
    /// This staff member's approval-rate percentile within the cohort.
    pub percentile_rank: f64,
}

impl ComparisonMetrics {
    pub fn zero() -> Self {
        Self {
            cohort_size: 0,
            avg_processing_hours: 0.0,
            avg_approval_rate: 0.0,
            avg_response_hours: 0.0,
            percentile_rank: 0.0,
        }
    }
}

/// Compare one staff member's efficiency against a cohort.
pub fn comparison_metrics(
    own: &EfficiencyMetrics,
    cohort: &[EfficiencyMetrics],
) -> ComparisonMetrics {
    let with_data: Vec<&EfficiencyMetrics> = cohort
        .iter()
        .filter(|m| m.approved + m.rejected > 0)
        .collect();
    if with_data.is_empty() {
        return ComparisonMetrics::zero();
    }

    let n = with_data.len() as f64;
    let approval_rates: Vec<f64> = with_data.iter().map(|m| m.approval_rate).collect();

    ComparisonMetrics {
        cohort_size: with_data.len() as u64,
        avg_processing_hours: with_data.iter().map(|m| m.avg_processing_hours).sum::<f64>() / n,
        avg_approval_rate: approval_rates.iter().sum::<f64>() / n,
        avg_response_hours: with_data.iter().map(|m| m.avg_response_hours).sum::<f64>() / n,
        percentile_rank: percentile_rank(own.approval_rate, &approval_rates),
    }
}

/// Cross-semester trends plus cohort comparisons for one staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparativeAnalytics {
    pub staff_id: StaffId,
    pub semesters: Vec<Semester>,
    /// None when fewer than two semesters carry workload records.
    pub workload_trend: Option<TrendAnalysis>,
    pub teaching_trend: Option<TrendAnalysis>,
    pub department: ComparisonMetrics,
    pub institution: ComparisonMetrics,
}

/// Department-wide aggregates for one semester.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentBenchmarks {
    pub department: String,
    pub semester: Semester,
    pub staff_count: u64,
    pub staff_with_workload: u64,
    pub staff_with_requests: u64,
    pub avg_weekly_hours: f64,
    pub avg_periods_per_week: f64,
    pub avg_approval_rate: f64,
    pub avg_processing_hours: f64,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Aggregate prepared per-staff series into department benchmarks.
/// `weekly_hours` and `periods_per_week` hold one entry per member with
/// a workload record; `efficiency` one entry per member overall.
pub fn department_benchmarks(
    department: &str,
    semester: &str,
    staff_count: u64,
    weekly_hours: &[f64],
    periods_per_week: &[f64],
    efficiency: &[EfficiencyMetrics],
) -> DepartmentBenchmarks {
    let with_requests: Vec<&EfficiencyMetrics> = efficiency
        .iter()
        .filter(|m| m.approved + m.rejected > 0)
        .collect();

    let approval: Vec<f64> = with_requests.iter().map(|m| m.approval_rate).collect();
    let processing: Vec<f64> = with_requests
        .iter()
        .map(|m| m.avg_processing_hours)
        .collect();

    DepartmentBenchmarks {
        department: department.to_string(),
        semester: semester.to_string(),
        staff_count,
        staff_with_workload: weekly_hours.len() as u64,
        staff_with_requests: with_requests.len() as u64,
        avg_weekly_hours: mean(weekly_hours),
        avg_periods_per_week: mean(periods_per_week),
        avg_approval_rate: mean(&approval),
        avg_processing_hours: mean(&processing),
    }
}
