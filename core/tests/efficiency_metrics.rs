use chrono::{DateTime, Duration, TimeZone, Utc};
use odtrack_core::{
    config::AnalyticsConfig,
    engine::AnalyticsEngine,
    requests::{OdRequest, OdStatus},
    store::OdStore,
    types::{DateRange, StaffMember},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn make_engine() -> AnalyticsEngine {
    let store = OdStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    AnalyticsEngine::new(store, AnalyticsConfig::default(), 42)
}

fn add_staff(engine: &AnalyticsEngine, staff_id: &str) {
    engine
        .store()
        .insert_staff(&StaffMember {
            staff_id: staff_id.to_string(),
            name: "A. Fernandes".to_string(),
            department: "ECE".to_string(),
            subject_specialty: "Signals".to_string(),
            years_taught: 5,
            phone: None,
            designation: None,
        })
        .expect("insert staff");
}

fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
}

fn add_request(
    engine: &AnalyticsEngine,
    id: &str,
    staff_id: &str,
    student_id: &str,
    created_at: DateTime<Utc>,
    status: OdStatus,
    decided_after_hours: Option<i64>,
) {
    engine
        .store()
        .insert_od_request(&OdRequest {
            request_id: id.to_string(),
            student_id: student_id.to_string(),
            student_name: "Student".to_string(),
            register_number: None,
            staff_id: staff_id.to_string(),
            date: created_at,
            periods: vec![1, 2, 3],
            reason: "inter-college event".to_string(),
            status,
            attachment_url: None,
            created_at,
            approved_at: decided_after_hours.map(|h| created_at + Duration::hours(h)),
            approved_by: decided_after_hours.map(|_| staff_id.to_string()),
            rejection_reason: None,
        })
        .expect("insert request");
}

fn june() -> DateRange {
    DateRange::new(utc(2025, 6, 1), utc(2025, 6, 30)).unwrap()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// No requests in range: the all-zero object, never an error.
#[test]
fn empty_request_set_yields_the_zero_object() {
    let engine = make_engine();
    add_staff(&engine, "s-001");

    let metrics = engine.efficiency_metrics("s-001", &june()).unwrap();

    assert_eq!(metrics.total_requests, 0);
    assert_eq!(metrics.approval_rate, 0.0);
    assert_eq!(metrics.avg_processing_hours, 0.0);
    assert_eq!(metrics.avg_response_hours, 0.0);
}

#[test]
fn all_approved_rates_exactly_100() {
    let engine = make_engine();
    add_staff(&engine, "s-001");
    for i in 0..4 {
        add_request(
            &engine,
            &format!("r-{i}"),
            "s-001",
            "stu-1",
            utc(2025, 6, 2 + i),
            OdStatus::Approved,
            Some(12),
        );
    }

    let metrics = engine.efficiency_metrics("s-001", &june()).unwrap();
    assert_eq!(metrics.approval_rate, 100.0);
}

#[test]
fn all_rejected_rates_exactly_0() {
    let engine = make_engine();
    add_staff(&engine, "s-001");
    for i in 0..3 {
        add_request(
            &engine,
            &format!("r-{i}"),
            "s-001",
            "stu-1",
            utc(2025, 6, 2 + i),
            OdStatus::Rejected,
            Some(6),
        );
    }

    let metrics = engine.efficiency_metrics("s-001", &june()).unwrap();
    assert_eq!(metrics.approval_rate, 0.0);
    assert_eq!(metrics.rejected, 3);
}

/// Processing time averages decided requests; response time currently
/// mirrors it (no first-touch timestamp exists on the ledger).
#[test]
fn processing_hours_average_over_decided_requests() {
    let engine = make_engine();
    add_staff(&engine, "s-001");
    add_request(&engine, "r-1", "s-001", "stu-1", utc(2025, 6, 2), OdStatus::Approved, Some(10));
    add_request(&engine, "r-2", "s-001", "stu-2", utc(2025, 6, 3), OdStatus::Rejected, Some(30));
    add_request(&engine, "r-3", "s-001", "stu-3", utc(2025, 6, 4), OdStatus::Pending, None);

    let metrics = engine.efficiency_metrics("s-001", &june()).unwrap();

    assert_eq!(metrics.total_requests, 3);
    assert_eq!(metrics.pending, 1);
    assert!((metrics.avg_processing_hours - 20.0).abs() < 1e-9);
    assert_eq!(metrics.avg_response_hours, metrics.avg_processing_hours);
    assert!((metrics.approval_rate - 100.0 / 3.0).abs() < 1e-9);
}

/// Requests created outside the window are not counted.
#[test]
fn range_filter_excludes_outside_requests() {
    let engine = make_engine();
    add_staff(&engine, "s-001");
    add_request(&engine, "r-1", "s-001", "stu-1", utc(2025, 5, 20), OdStatus::Approved, Some(4));
    add_request(&engine, "r-2", "s-001", "stu-1", utc(2025, 6, 10), OdStatus::Approved, Some(4));
    add_request(&engine, "r-3", "s-001", "stu-1", utc(2025, 7, 2), OdStatus::Approved, Some(4));

    let metrics = engine.efficiency_metrics("s-001", &june()).unwrap();
    assert_eq!(metrics.total_requests, 1);
}

/// Approval via the store stamps the decision time and approver, and
/// the metrics pick it up.
#[test]
fn store_approval_workflow_feeds_the_metrics() {
    let engine = make_engine();
    add_staff(&engine, "s-001");
    let created = utc(2025, 6, 5);
    add_request(&engine, "r-1", "s-001", "stu-1", created, OdStatus::Pending, None);

    engine
        .store()
        .update_request_status(
            "r-1",
            OdStatus::Approved,
            "s-001",
            None,
            created + Duration::hours(18),
        )
        .unwrap();

    let stored = engine.store().get_od_request("r-1").unwrap().unwrap();
    assert_eq!(stored.status, OdStatus::Approved);
    assert_eq!(stored.approved_by.as_deref(), Some("s-001"));

    let metrics = engine.efficiency_metrics("s-001", &june()).unwrap();
    assert_eq!(metrics.approved, 1);
    assert!((metrics.avg_processing_hours - 18.0).abs() < 1e-9);
}

/// The institution-wide summary: totals, status distribution, and the
/// top requesters in descending order.
#[test]
fn request_summary_ranks_frequent_requesters() {
    let engine = make_engine();
    add_staff(&engine, "s-001");
    for i in 0..3 {
        add_request(
            &engine,
            &format!("a-{i}"),
            "s-001",
            "stu-heavy",
            utc(2025, 6, 2 + i),
            OdStatus::Approved,
            Some(5),
        );
    }
    add_request(&engine, "b-0", "s-001", "stu-light", utc(2025, 6, 9), OdStatus::Pending, None);
    add_request(&engine, "c-0", "s-001", "stu-mid", utc(2025, 6, 10), OdStatus::Rejected, Some(7));
    add_request(&engine, "c-1", "s-001", "stu-mid", utc(2025, 6, 11), OdStatus::Cancelled, None);

    let summary = engine.request_summary().unwrap();

    assert_eq!(summary.total_requests, 6);
    assert_eq!(summary.status_distribution[&OdStatus::Approved], 3);
    assert_eq!(summary.status_distribution[&OdStatus::Pending], 1);
    assert_eq!(summary.status_distribution[&OdStatus::Rejected], 1);
    assert_eq!(summary.status_distribution[&OdStatus::Cancelled], 1);

    assert_eq!(summary.top_students[0].student_id, "stu-heavy");
    assert_eq!(summary.top_students[0].requests, 3);
    assert_eq!(summary.top_students[1].student_id, "stu-mid");
}
