//! Schedule conflict detection.
//!
//! Two checks run over the latest workload record:
//!   1. Per weekday, periods sharing a period number form one conflict
//!      group: two overlaps are Medium, three or more are High.
//!   2. A weekly load above the overload bound appends a workload
//!      conflict (High above the severe bound).

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::AnalyticsConfig,
    types::Severity,
    workload::{DayOfWeek, Period, WorkloadRecord},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConflict {
    pub id: String,
    pub description: String,
    /// Unset for workload-level conflicts, which have no slot.
    pub day: Option<DayOfWeek>,
    pub period_number: Option<u32>,
    pub starts_at: Option<NaiveTime>,
    /// "SUBJECT (CLASS)" labels of the overlapping assignments.
    pub conflicting_activities: Vec<String>,
    pub severity: Severity,
}

/// Scan a record's weekly schedule for overlaps and excessive load.
/// No record means no conflicts.
pub fn detect_conflicts(
    record: Option<&WorkloadRecord>,
    weekly_hours: Option<f64>,
    config: &AnalyticsConfig,
) -> Vec<TimeConflict> {
    let mut conflicts = Vec::new();

    if let Some(record) = record {
        for (day, periods) in &record.weekly_schedule {
            let mut by_slot: BTreeMap<u32, Vec<&Period>> = BTreeMap::new();
            for period in periods {
                by_slot.entry(period.slot.period_number).or_default().push(period);
            }

            for (slot_number, group) in by_slot {
                if group.len() < 2 {
                    continue;
                }
                let severity = if group.len() > 2 {
                    Severity::High
                } else {
                    Severity::Medium
                };
                conflicts.push(TimeConflict {
                    id: Uuid::new_v4().to_string(),
                    description: format!(
                        "{} assignments share period {} on {}",
                        group.len(),
                        slot_number,
                        day.label(),
                    ),
                    day: Some(*day),
                    period_number: Some(slot_number),
                    starts_at: Some(group[0].slot.starts_at),
                    conflicting_activities: group
                        .iter()
                        .map(|p| format!("{} ({})", p.subject_code, p.class_name))
                        .collect(),
                    severity,
                });
            }
        }
    }

    if let Some(weekly) = weekly_hours {
        let bounds = &config.alerts;
        if weekly > bounds.overload_weekly_hours {
            let severity = if weekly > bounds.severe_overload_weekly_hours {
                Severity::High
            } else {
                Severity::Medium
            };
            conflicts.push(TimeConflict {
                id: Uuid::new_v4().to_string(),
                description: format!(
                    "Average weekly load {weekly:.1}h exceeds the {:.1}h limit",
                    bounds.overload_weekly_hours
                ),
                day: None,
                period_number: None,
                starts_at: None,
                conflicting_activities: vec!["weekly workload".to_string()],
                severity,
            });
        }
    }

    conflicts
}
