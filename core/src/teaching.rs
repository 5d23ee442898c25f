//! Teaching-load analytics: subject and class allocation.
//!
//! Expands a workload record into:
//!   1. Per-subject allocations (periods/week, periods/semester, type).
//!   2. Per-class assignments. Each subject's weekly periods are spread
//!      over every class in every grade bucket: integer division, with
//!      the remainder going to the first classes in bucket order.
//!   3. Student-count estimates from grade-band base sizes plus bounded
//!      deterministic jitter.
//!   4. The efficiency block (utilization, diversity, spread, average
//!      class size per period).
//!
//! A missing record yields the empty analytics object; it is an
//! expected state, not an error.

use serde::{Deserialize, Serialize};

use crate::{
    config::AnalyticsConfig,
    rng::EstimateRng,
    types::{Semester, StaffId},
    workload::WorkloadRecord,
};

// ── Classification ───────────────────────────────────────────────────────────

/// Subject type, inferred from the subject code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Core,
    Lab,
    Practical,
    Honors,
}

impl SubjectKind {
    /// Substring heuristic over the subject code. The single place the
    /// rules live; everything else calls through here.
    pub fn classify(code: &str) -> Self {
        let code = code.to_ascii_uppercase();
        if code.contains("LAB") {
            Self::Lab
        } else if code.contains("PRAC") {
            Self::Practical
        } else if code.contains("HON") || code.contains("ADV") {
            Self::Honors
        } else {
            Self::Core
        }
    }
}

/// Class type, inferred from the class name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Standard,
    Honors,
}

impl ClassKind {
    pub fn classify(name: &str) -> Self {
        let name = name.to_ascii_uppercase();
        if name.contains("HON") || name.contains("ADV") {
            Self::Honors
        } else {
            Self::Standard
        }
    }
}

/// Numeric grade level parsed out of a grade label ("grade10", "Grade 7").
pub fn grade_number(grade: &str) -> Option<u32> {
    let digits: String = grade.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

// ── Student-count estimation ─────────────────────────────────────────────────

fn base_class_size(grade: &str, config: &AnalyticsConfig) -> u32 {
    let teaching = &config.teaching;
    match grade_number(grade) {
        Some(1..=5) => teaching.lower_grade_base,
        Some(6..=8) => teaching.middle_grade_base,
        Some(9..=10) => teaching.secondary_grade_base,
        Some(11..=12) => teaching.senior_grade_base,
        _ => teaching.unknown_grade_base,
    }
}

/// Grade-band base size plus jitter, clamped to the configured band.
pub fn estimate_class_size(grade: &str, rng: &mut EstimateRng, config: &AnalyticsConfig) -> u32 {
    let teaching = &config.teaching;
    let base = base_class_size(grade, config) as i64;
    let estimate = base + rng.jitter(teaching.student_jitter);
    estimate.clamp(teaching.min_class_size as i64, teaching.max_class_size as i64) as u32
}

// ── Analytics objects ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubjectAllocation {
    pub subject_code: String,
    pub kind: SubjectKind,
    pub periods_per_week: u32,
    pub total_periods_semester: f64,
    /// Classes that received at least one period of this subject.
    pub classes_covered: u32,
    /// Students reached across those classes.
    pub estimated_students: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassAssignment {
    pub class_name: String,
    pub grade: String,
    pub subject_code: String,
    pub kind: ClassKind,
    pub periods_assigned: u32,
    pub estimated_students: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeachingEfficiency {
    pub periods_utilization_rate: f64,
    pub subject_diversity_index: f64,
    pub grade_level_spread: f64,
    pub avg_students_per_period: f64,
}

impl TeachingEfficiency {
    fn zero() -> Self {
        Self {
            periods_utilization_rate: 0.0,
            subject_diversity_index: 0.0,
            grade_level_spread: 0.0,
            avg_students_per_period: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeachingAnalytics {
    pub staff_id: StaffId,
    pub semester: Semester,
    pub total_periods_per_week: u32,
    pub total_periods_semester: f64,
    pub subjects: Vec<SubjectAllocation>,
    pub classes: Vec<ClassAssignment>,
    pub grades_taught: Vec<String>,
    pub efficiency: TeachingEfficiency,
}

impl TeachingAnalytics {
    pub fn empty(staff_id: &str, semester: &str) -> Self {
        Self {
            staff_id: staff_id.to_string(),
            semester: semester.to_string(),
            total_periods_per_week: 0,
            total_periods_semester: 0.0,
            subjects: Vec::new(),
            classes: Vec::new(),
            grades_taught: Vec::new(),
            efficiency: TeachingEfficiency::zero(),
        }
    }
}

// ── Analyzer ─────────────────────────────────────────────────────────────────

/// Expand a workload record into teaching analytics.
///
/// `rng` must be the stream derived for this record's key so estimates
/// replay identically across calls.
pub fn teaching_analytics(
    record: Option<&WorkloadRecord>,
    staff_id: &str,
    semester: &str,
    rng: &mut EstimateRng,
    config: &AnalyticsConfig,
) -> TeachingAnalytics {
    let Some(record) = record else {
        return TeachingAnalytics::empty(staff_id, semester);
    };

    let teaching = &config.teaching;

    // Flatten grade buckets into one ordered class list. Bucket order is
    // the BTreeMap key order; class order within a bucket is as stored.
    let class_list: Vec<(&str, &str)> = record
        .classes_per_grade
        .iter()
        .flat_map(|(grade, classes)| {
            classes
                .iter()
                .map(move |class| (grade.as_str(), class.as_str()))
        })
        .collect();

    // One size estimate per class, shared by every subject taught to it.
    let class_sizes: Vec<u32> = class_list
        .iter()
        .map(|(grade, _)| estimate_class_size(grade, rng, config))
        .collect();

    let mut subjects = Vec::new();
    let mut classes = Vec::new();

    for (subject_code, &periods) in &record.periods_per_subject {
        let kind = SubjectKind::classify(subject_code);
        let mut covered = 0u32;
        let mut students = 0u32;

        if !class_list.is_empty() {
            let n = class_list.len() as u32;
            let per_class = periods / n;
            let remainder = periods % n;

            for (index, (grade, class_name)) in class_list.iter().enumerate() {
                let assigned = per_class + u32::from((index as u32) < remainder);
                if assigned == 0 {
                    continue;
                }
                covered += 1;
                students += class_sizes[index];
                classes.push(ClassAssignment {
                    class_name: class_name.to_string(),
                    grade: grade.to_string(),
                    subject_code: subject_code.clone(),
                    kind: ClassKind::classify(class_name),
                    periods_assigned: assigned,
                    estimated_students: class_sizes[index],
                });
            }
        }

        subjects.push(SubjectAllocation {
            subject_code: subject_code.clone(),
            kind,
            periods_per_week: periods,
            total_periods_semester: periods as f64 * teaching.semester_weeks,
            classes_covered: covered,
            estimated_students: students,
        });
    }

    let total_periods = record.periods_per_week();
    let grades_taught: Vec<String> = record.classes_per_grade.keys().cloned().collect();

    let student_periods: u64 = classes
        .iter()
        .map(|c| c.periods_assigned as u64 * c.estimated_students as u64)
        .sum();
    let avg_students_per_period = if total_periods > 0 {
        student_periods as f64 / total_periods as f64
    } else {
        0.0
    };

    let efficiency = TeachingEfficiency {
        periods_utilization_rate: total_periods as f64 / teaching.full_load_periods,
        subject_diversity_index: subjects.len() as f64 / teaching.subject_diversity_cap,
        grade_level_spread: grades_taught.len() as f64 / teaching.grade_span_cap,
        avg_students_per_period,
    };

    TeachingAnalytics {
        staff_id: staff_id.to_string(),
        semester: semester.to_string(),
        total_periods_per_week: total_periods,
        total_periods_semester: total_periods as f64 * teaching.semester_weeks,
        subjects,
        classes,
        grades_taught,
        efficiency,
    }
}
