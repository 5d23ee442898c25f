use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use odtrack_core::{
    config::AnalyticsConfig,
    engine::AnalyticsEngine,
    error::AnalyticsError,
    requests::{OdRequest, OdStatus},
    store::OdStore,
    trend::TrendDirection,
    types::StaffMember,
    workload::WorkloadRecord,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn make_engine() -> AnalyticsEngine {
    let store = OdStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    AnalyticsEngine::new(store, AnalyticsConfig::default(), 42)
}

fn add_staff(engine: &AnalyticsEngine, staff_id: &str, department: &str) {
    engine
        .store()
        .insert_staff(&StaffMember {
            staff_id: staff_id.to_string(),
            name: format!("Staff {staff_id}"),
            department: department.to_string(),
            subject_specialty: "General".to_string(),
            years_taught: 6,
            phone: None,
            designation: None,
        })
        .expect("insert staff");
}

fn add_workload(engine: &AnalyticsEngine, staff_id: &str, semester: &str, periods: u32) {
    let mut periods_per_subject = BTreeMap::new();
    periods_per_subject.insert("GEN101".to_string(), periods);
    engine
        .store()
        .upsert_workload(&WorkloadRecord {
            staff_id: staff_id.to_string(),
            semester: semester.to_string(),
            periods_per_subject,
            classes_per_grade: BTreeMap::new(),
            weekly_schedule: BTreeMap::new(),
        })
        .expect("upsert workload");
}

fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
}

/// Give a staff member `approved` approved and `rejected` rejected
/// requests, each decided 12 hours after creation.
fn add_decided_requests(engine: &AnalyticsEngine, staff_id: &str, approved: u32, rejected: u32) {
    for i in 0..approved + rejected {
        let created = utc(2025, 6, 2) + Duration::days(i as i64);
        let status = if i < approved {
            OdStatus::Approved
        } else {
            OdStatus::Rejected
        };
        engine
            .store()
            .insert_od_request(&OdRequest {
                request_id: format!("{staff_id}-r{i}"),
                student_id: format!("stu-{i}"),
                student_name: "Student".to_string(),
                register_number: None,
                staff_id: staff_id.to_string(),
                date: created,
                periods: vec![1],
                reason: "event".to_string(),
                status,
                attachment_url: None,
                created_at: created,
                approved_at: Some(created + Duration::hours(12)),
                approved_by: Some(staff_id.to_string()),
                rejection_reason: None,
            })
            .expect("insert request");
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// The department cohort excludes the staff member being compared and
/// skips peers with no decided requests instead of counting them as
/// zeros.
#[test]
fn department_cohort_excludes_self_and_skips_no_data_peers() {
    let engine = make_engine();
    add_staff(&engine, "s-self", "CSE");
    add_staff(&engine, "s-peer-low", "CSE");
    add_staff(&engine, "s-peer-high", "CSE");
    add_staff(&engine, "s-peer-idle", "CSE");

    add_decided_requests(&engine, "s-self", 1, 1); // 50% approval
    add_decided_requests(&engine, "s-peer-low", 1, 3); // 25%
    add_decided_requests(&engine, "s-peer-high", 3, 1); // 75%
    // s-peer-idle has no requests at all.

    let analytics = engine.comparative_analytics("s-self", &[]).unwrap();
    let dept = &analytics.department;

    assert_eq!(dept.cohort_size, 2);
    assert!((dept.avg_approval_rate - 50.0).abs() < 1e-9);
    assert!((dept.avg_processing_hours - 12.0).abs() < 1e-9);
    // 50% sits between 25% and 75%: one below, none equal, of two.
    assert!((dept.percentile_rank - 50.0).abs() < 1e-9);
}

/// The institution cohort spans departments.
#[test]
fn institution_cohort_spans_departments() {
    let engine = make_engine();
    add_staff(&engine, "s-self", "CSE");
    add_staff(&engine, "s-cse", "CSE");
    add_staff(&engine, "s-mech", "MECH");

    add_decided_requests(&engine, "s-self", 4, 0); // 100%
    add_decided_requests(&engine, "s-cse", 1, 1); // 50%
    add_decided_requests(&engine, "s-mech", 1, 3); // 25%

    let analytics = engine.comparative_analytics("s-self", &[]).unwrap();

    assert_eq!(analytics.department.cohort_size, 1);
    assert_eq!(analytics.institution.cohort_size, 2);
    // 100% is above both cohort members.
    assert!((analytics.institution.percentile_rank - 100.0).abs() < 1e-9);
}

/// Cross-semester workload points feed the trend; a growing period
/// count reads as improving.
#[test]
fn comparative_trends_follow_semester_records() {
    let engine = make_engine();
    add_staff(&engine, "s-001", "CSE");
    add_workload(&engine, "s-001", "2024-EVEN", 10); // weekly 23
    add_workload(&engine, "s-001", "2025-ODD", 20); // weekly 41

    let semesters = vec!["2024-EVEN".to_string(), "2025-ODD".to_string()];
    let analytics = engine.comparative_analytics("s-001", &semesters).unwrap();

    let workload_trend = analytics.workload_trend.expect("two records give a trend");
    assert_eq!(workload_trend.direction, TrendDirection::Improving);
    assert!((workload_trend.slope - 18.0).abs() < 1e-9);

    let teaching_trend = analytics.teaching_trend.expect("two records give a trend");
    assert!((teaching_trend.slope - 10.0).abs() < 1e-9);
}

/// Semesters without records are skipped; with fewer than two left
/// there is no trend, and that is not an error.
#[test]
fn sparse_semesters_leave_no_trend() {
    let engine = make_engine();
    add_staff(&engine, "s-001", "CSE");
    add_workload(&engine, "s-001", "2025-ODD", 12);

    let semesters = vec![
        "2024-EVEN".to_string(),
        "2025-ODD".to_string(),
        "2025-EVEN".to_string(),
    ];
    let analytics = engine.comparative_analytics("s-001", &semesters).unwrap();

    assert!(analytics.workload_trend.is_none());
    assert!(analytics.teaching_trend.is_none());
}

#[test]
fn department_benchmarks_average_member_records() {
    let engine = make_engine();
    add_staff(&engine, "s-a", "CSE");
    add_staff(&engine, "s-b", "CSE");
    add_staff(&engine, "s-c", "CSE");
    add_workload(&engine, "s-a", "2025-ODD", 10); // weekly 23
    add_workload(&engine, "s-b", "2025-ODD", 20); // weekly 41
    // s-c has no workload record for the semester.
    add_decided_requests(&engine, "s-a", 3, 1); // 75%
    add_decided_requests(&engine, "s-b", 1, 3); // 25%

    let benchmarks = engine.department_benchmarks("CSE", "2025-ODD").unwrap();

    assert_eq!(benchmarks.staff_count, 3);
    assert_eq!(benchmarks.staff_with_workload, 2);
    assert_eq!(benchmarks.staff_with_requests, 2);
    assert!((benchmarks.avg_weekly_hours - 32.0).abs() < 1e-9);
    assert!((benchmarks.avg_periods_per_week - 15.0).abs() < 1e-9);
    assert!((benchmarks.avg_approval_rate - 50.0).abs() < 1e-9);
    assert!((benchmarks.avg_processing_hours - 12.0).abs() < 1e-9);
}

/// An unknown department is a typed error, distinct from a department
/// whose staff merely have no data yet.
#[test]
fn unknown_department_is_a_typed_error() {
    let engine = make_engine();
    add_staff(&engine, "s-a", "CSE");

    let err = engine.department_benchmarks("CIVIL", "2025-ODD").unwrap_err();
    assert!(matches!(err, AnalyticsError::DepartmentNotFound { .. }));
}
