//! Engine configuration: every threshold the analytics pipeline
//! compares against lives here, never inline in the computation.
//!
//! Defaults carry the canonical values; `load` reads overrides from a
//! single JSON file. In tests, use `AnalyticsConfig::default()`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub workload: WorkloadConfig,
    pub activity: ActivityConfig,
    pub teaching: TeachingConfig,
    pub alerts: AlertConfig,
    pub report: ReportConfig,
    pub trend: TrendConfig,
}

/// Weekly-hours formula weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Preparation time as a fraction of teaching time.
    pub prep_ratio: f64,
    /// Evaluation time as a fraction of teaching time.
    pub eval_ratio: f64,
    /// Fixed administrative allowance per week.
    pub admin_hours_per_week: f64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            prep_ratio: 0.5,
            eval_ratio: 0.3,
            admin_hours_per_week: 5.0,
        }
    }
}

/// Fixed weekly estimates carved out of the administrative allowance
/// when the activity distribution is computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    pub od_processing_hours_per_week: f64,
    pub meeting_hours_per_week: f64,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            od_processing_hours_per_week: 2.0,
            meeting_hours_per_week: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeachingConfig {
    /// Teaching weeks in one semester; scales periods/week to periods/semester.
    pub semester_weeks: f64,
    /// Periods/week treated as a 100% utilized timetable.
    pub full_load_periods: f64,
    /// Subject count treated as maximal diversity.
    pub subject_diversity_cap: f64,
    /// Grade count treated as maximal spread.
    pub grade_span_cap: f64,
    /// Student-count estimate jitter, plus or minus.
    pub student_jitter: u32,
    pub min_class_size: u32,
    pub max_class_size: u32,
    /// Base class sizes per grade band.
    pub lower_grade_base: u32,
    pub middle_grade_base: u32,
    pub secondary_grade_base: u32,
    pub senior_grade_base: u32,
    pub unknown_grade_base: u32,
}

impl Default for TeachingConfig {
    fn default() -> Self {
        Self {
            semester_weeks: 16.0,
            full_load_periods: 40.0,
            subject_diversity_cap: 10.0,
            grade_span_cap: 12.0,
            student_jitter: 5,
            min_class_size: 15,
            max_class_size: 50,
            lower_grade_base: 25,
            middle_grade_base: 30,
            secondary_grade_base: 35,
            senior_grade_base: 40,
            unknown_grade_base: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub overload_weekly_hours: f64,
    pub severe_overload_weekly_hours: f64,
    pub underload_weekly_hours: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            overload_weekly_hours: 50.0,
            severe_overload_weekly_hours: 60.0,
            underload_weekly_hours: 20.0,
        }
    }
}

/// Qualitative-report thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub strong_weekly_hours: f64,
    pub light_weekly_hours: f64,
    pub strong_approval_rate: f64,
    pub weak_approval_rate: f64,
    pub fast_response_hours: f64,
    pub slow_response_hours: f64,
    pub strong_utilization: f64,
    pub weak_utilization: f64,
    pub broad_subject_diversity: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            strong_weekly_hours: 35.0,
            light_weekly_hours: 25.0,
            strong_approval_rate: 80.0,
            weak_approval_rate: 60.0,
            fast_response_hours: 24.0,
            slow_response_hours: 72.0,
            strong_utilization: 0.75,
            weak_utilization: 0.40,
            broad_subject_diversity: 0.40,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Normalized slope (percent of the series mean) beyond which a
    /// trend counts as improving or declining.
    pub direction_threshold_pct: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            direction_threshold_pct: 10.0,
        }
    }
}

impl AnalyticsConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: AnalyticsConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}
