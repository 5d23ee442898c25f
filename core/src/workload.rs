//! Workload records and the working-hours pipeline.
//!
//! This module owns:
//!   1. The per-semester workload record (periods per subject, classes
//!      per grade, the weekly period schedule).
//!   2. The weekly/total working-hours formula.
//!   3. The activity-time distribution and its residual invariant.
//!   4. Workload alerts derived from the weekly load.
//!
//! "No record" and "zero hours" are never conflated: callers receive
//! `Option<f64>` and must treat `None` as missing data.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::AnalyticsConfig,
    types::{DateRange, Semester, Severity, StaffId},
};

/// Residual tolerance for the distribution invariant.
pub const HOURS_TOLERANCE: f64 = 1e-6;

// ── Records ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Regular,
    Lab,
    Practical,
    Sports,
    Assembly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSlot {
    pub period_number: u32,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    pub duration_minutes: u32,
}

/// One scheduled teaching slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Period {
    pub subject_code: String,
    pub class_name: String,
    pub grade: String,
    pub slot: TimeSlot,
    pub kind: PeriodKind,
    pub estimated_students: u32,
    pub date: Option<NaiveDate>,
}

/// Per staff-member, per-semester snapshot of teaching periods and
/// assigned classes. Maps are BTreeMaps so iteration order is stable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkloadRecord {
    pub staff_id: StaffId,
    pub semester: Semester,
    /// Subject code to periods per week.
    pub periods_per_subject: BTreeMap<String, u32>,
    /// Grade label to its ordered, distinct class names.
    pub classes_per_grade: BTreeMap<String, Vec<String>>,
    /// Weekday to that day's scheduled periods.
    pub weekly_schedule: BTreeMap<DayOfWeek, Vec<Period>>,
}

impl WorkloadRecord {
    /// Store key: "{staff_id}::{semester}". Keys for one staff member
    /// sort by semester label, so the greatest key is the latest record.
    pub fn record_key(&self) -> String {
        format!("{}::{}", self.staff_id, self.semester)
    }

    /// Total teaching periods per week across all subjects.
    pub fn periods_per_week(&self) -> u32 {
        self.periods_per_subject.values().sum()
    }
}

// ── Weekly load ──────────────────────────────────────────────────────────────

/// The weekly working-hours split of one workload record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeeklyLoad {
    pub teaching: f64,
    pub preparation: f64,
    pub evaluation: f64,
    pub administration: f64,
}

impl WeeklyLoad {
    pub fn total(&self) -> f64 {
        self.teaching + self.preparation + self.evaluation + self.administration
    }
}

/// Weekly hours: teaching periods, prep and evaluation as fractions of
/// teaching, plus the fixed administrative allowance.
pub fn weekly_load(record: &WorkloadRecord, config: &AnalyticsConfig) -> WeeklyLoad {
    let teaching = record.periods_per_week() as f64;
    WeeklyLoad {
        teaching,
        preparation: teaching * config.workload.prep_ratio,
        evaluation: teaching * config.workload.eval_ratio,
        administration: config.workload.admin_hours_per_week,
    }
}

/// Total working hours over the range, or `None` when there is no record.
pub fn working_hours(
    record: Option<&WorkloadRecord>,
    range: &DateRange,
    config: &AnalyticsConfig,
) -> Option<f64> {
    record.map(|r| weekly_load(r, config).total() * range.weeks())
}

// ── Activity distribution ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Teaching,
    Preparation,
    Evaluation,
    Administration,
    OdProcessing,
    Meetings,
    Other,
}

impl ActivityKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Teaching => "teaching",
            Self::Preparation => "preparation",
            Self::Evaluation => "evaluation",
            Self::Administration => "administration",
            Self::OdProcessing => "od_processing",
            Self::Meetings => "meetings",
            Self::Other => "other",
        }
    }
}

/// Split total working hours into activity buckets.
///
/// OD-processing and meeting estimates are carved out of the weekly
/// administrative allowance; the administration bucket reports the
/// remainder and the residual bucket closes the sum to the total
/// exactly. Returns an empty map when the total is zero.
///
/// Invariant: sum of all buckets equals the total within HOURS_TOLERANCE.
/// If the fixed buckets overshoot the total, the residual is clamped to
/// zero and the overshoot is logged, never silently accepted.
pub fn activity_distribution(
    record: &WorkloadRecord,
    range: &DateRange,
    config: &AnalyticsConfig,
) -> BTreeMap<ActivityKind, f64> {
    let weeks = range.weeks();
    let weekly = weekly_load(record, config);
    let total = weekly.total() * weeks;

    let mut distribution = BTreeMap::new();
    if total.abs() < HOURS_TOLERANCE {
        return distribution;
    }

    let od_processing = config.activity.od_processing_hours_per_week * weeks;
    let meetings = config.activity.meeting_hours_per_week * weeks;
    let administration = (weekly.administration * weeks - od_processing - meetings).max(0.0);

    distribution.insert(ActivityKind::Teaching, weekly.teaching * weeks);
    distribution.insert(ActivityKind::Preparation, weekly.preparation * weeks);
    distribution.insert(ActivityKind::Evaluation, weekly.evaluation * weeks);
    distribution.insert(ActivityKind::Administration, administration);
    distribution.insert(ActivityKind::OdProcessing, od_processing);
    distribution.insert(ActivityKind::Meetings, meetings);

    let named: f64 = distribution.values().sum();
    let residual = total - named;
    if residual < -HOURS_TOLERANCE {
        log::warn!(
            "activity buckets overshoot total for {}: {:.3}h over {:.3}h, clamping residual",
            record.record_key(),
            -residual,
            total,
        );
    }
    distribution.insert(ActivityKind::Other, residual.max(0.0));

    distribution
}

// ── Alerts and analytics objects ─────────────────────────────────────────────

/// Ephemeral alert generated per analytics call; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadAlert {
    pub id: String,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl WorkloadAlert {
    fn new(message: String, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message,
            severity,
            created_at: Utc::now(),
        }
    }
}

/// Alerts for a weekly load against the configured bounds.
pub fn workload_alerts(weekly_hours: f64, config: &AnalyticsConfig) -> Vec<WorkloadAlert> {
    let mut alerts = Vec::new();
    let bounds = &config.alerts;

    if weekly_hours > bounds.severe_overload_weekly_hours {
        alerts.push(WorkloadAlert::new(
            format!(
                "Weekly load {weekly_hours:.1}h exceeds the severe overload limit of {:.1}h",
                bounds.severe_overload_weekly_hours
            ),
            Severity::High,
        ));
    } else if weekly_hours > bounds.overload_weekly_hours {
        alerts.push(WorkloadAlert::new(
            format!(
                "Weekly load {weekly_hours:.1}h exceeds the overload limit of {:.1}h",
                bounds.overload_weekly_hours
            ),
            Severity::Medium,
        ));
    }

    if weekly_hours > 0.0 && weekly_hours < bounds.underload_weekly_hours {
        alerts.push(WorkloadAlert::new(
            format!(
                "Weekly load {weekly_hours:.1}h is under the minimum engagement of {:.1}h",
                bounds.underload_weekly_hours
            ),
            Severity::Low,
        ));
    }

    alerts
}

/// Workload view over one date range. Hour fields are `None` when the
/// staff member has no workload record at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadAnalytics {
    pub staff_id: StaffId,
    pub range: DateRange,
    pub weekly_hours: Option<f64>,
    pub total_hours: Option<f64>,
    pub activity_breakdown: BTreeMap<ActivityKind, f64>,
    pub alerts: Vec<WorkloadAlert>,
}

/// Activity distribution plus each bucket's share of the total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeAllocationAnalytics {
    pub staff_id: StaffId,
    pub range: DateRange,
    pub total_hours: Option<f64>,
    pub distribution: BTreeMap<ActivityKind, f64>,
    pub shares: BTreeMap<ActivityKind, f64>,
}

/// Per-bucket share of the total, in percent. Empty when the total is zero.
pub fn bucket_shares(
    distribution: &BTreeMap<ActivityKind, f64>,
    total_hours: f64,
) -> BTreeMap<ActivityKind, f64> {
    let mut shares = BTreeMap::new();
    if total_hours.abs() < HOURS_TOLERANCE {
        return shares;
    }
    for (kind, hours) in distribution {
        shares.insert(*kind, hours / total_hours * 100.0);
    }
    shares
}
