//! Qualitative performance report synthesis.
//!
//! Folds the workload, teaching, and efficiency views into strengths,
//! improvement areas, and recommendations. Every cutoff comes from
//! `ReportConfig`; sections with no underlying data are skipped rather
//! than counted against the staff member.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    config::AnalyticsConfig,
    conflict::TimeConflict,
    efficiency::EfficiencyMetrics,
    teaching::TeachingAnalytics,
    types::{DateRange, Semester, StaffMember},
    workload::WorkloadAnalytics,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOptions {
    pub semester: Semester,
    pub range: DateRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffPerformanceReport {
    pub staff: StaffMember,
    pub semester: Semester,
    pub range: DateRange,
    pub generated_at: DateTime<Utc>,
    pub workload: WorkloadAnalytics,
    pub teaching: TeachingAnalytics,
    pub efficiency: EfficiencyMetrics,
    pub conflicts: Vec<TimeConflict>,
    pub strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub recommendations: Vec<String>,
}

/// The qualitative synthesis. Returns (strengths, improvement areas,
/// recommendations); recommendations map one-to-one from improvement
/// areas, with a maintain-course default when there are none.
pub fn synthesize(
    workload: &WorkloadAnalytics,
    teaching: &TeachingAnalytics,
    efficiency: &EfficiencyMetrics,
    config: &AnalyticsConfig,
) -> (Vec<String>, Vec<String>, Vec<String>) {
    let thresholds = &config.report;
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    let mut recommendations = Vec::new();

    if let Some(weekly) = workload.weekly_hours {
        if weekly > thresholds.strong_weekly_hours {
            strengths.push(format!(
                "Sustains a substantial weekly teaching load of {weekly:.1} hours"
            ));
        } else if weekly < thresholds.light_weekly_hours {
            improvements.push(format!(
                "Weekly load of {weekly:.1} hours is below the expected band"
            ));
            recommendations.push(
                "Consider additional classes or responsibilities to balance the department load"
                    .to_string(),
            );
        }
    }

    if efficiency.total_requests > 0 {
        let rate = efficiency.approval_rate;
        if rate > thresholds.strong_approval_rate {
            strengths.push(format!("High OD approval rate at {rate:.0}%"));
        } else if rate < thresholds.weak_approval_rate {
            improvements.push(format!("OD approval rate of {rate:.0}% is low"));
            recommendations.push(
                "Review frequently rejected request categories and publish clearer OD guidelines"
                    .to_string(),
            );
        }
    }

    if efficiency.approved + efficiency.rejected > 0 {
        let response = efficiency.avg_response_hours;
        if response < thresholds.fast_response_hours {
            strengths.push(format!(
                "Decides OD requests quickly, averaging {response:.0} hours"
            ));
        } else if response > thresholds.slow_response_hours {
            improvements.push(format!(
                "OD decisions average {response:.0} hours, well past the target"
            ));
            recommendations.push(
                "Triage pending OD requests daily to keep decision times within the target"
                    .to_string(),
            );
        }
    }

    let utilization = teaching.efficiency.periods_utilization_rate;
    if utilization >= thresholds.strong_utilization {
        strengths.push(format!(
            "Timetable utilization at {:.0}% of a full load",
            utilization * 100.0
        ));
    } else if utilization > 0.0 && utilization < thresholds.weak_utilization {
        improvements.push(format!(
            "Timetable utilization at {:.0}% leaves many free slots",
            utilization * 100.0
        ));
        recommendations
            .push("Fill free timetable slots with electives or remedial sessions".to_string());
    }

    if teaching.efficiency.subject_diversity_index >= thresholds.broad_subject_diversity {
        strengths.push(format!(
            "Teaches a broad mix of {} subjects",
            teaching.subjects.len()
        ));
    }

    if improvements.is_empty() {
        recommendations.push("Maintain the current balance of teaching and OD duties".to_string());
    }

    (strengths, improvements, recommendations)
}
