//! The analytics engine facade.
//!
//! PIPELINE (data flows strictly downward):
//!   store reads
//!     -> workload calculator / activity distribution
//!     -> teaching load analyzer, efficiency metrics
//!     -> trend analyzer, benchmark aggregator, conflict detector
//!     -> report synthesizer
//!
//! RULES:
//!   - Every operation is a pure query over the store snapshot; nothing
//!     mutates shared state, so calls are safe to run concurrently for
//!     different staff members.
//!   - Missing workload records and empty request sets are expected
//!     states and produce zeroed or empty results. Unknown staff or
//!     departments are typed errors, never hidden zeros.
//!   - All estimate randomness flows through streams derived from the
//!     engine's master seed.

use chrono::Utc;

use crate::{
    benchmark::{
        comparison_metrics, department_benchmarks, ComparativeAnalytics, DepartmentBenchmarks,
    },
    config::AnalyticsConfig,
    conflict::{detect_conflicts, TimeConflict},
    efficiency::{efficiency_metrics, summarize_requests, EfficiencyMetrics, RequestSummary},
    error::{AnalyticsError, AnalyticsResult},
    report::{synthesize, ReportOptions, StaffPerformanceReport},
    requests::OdRequest,
    rng::EstimateRng,
    store::{OdRequestFilter, OdStore},
    teaching::{teaching_analytics, TeachingAnalytics},
    trend::{analyze_trend, TrendPoint},
    types::{DateRange, StaffMember},
    workload::{
        activity_distribution, bucket_shares, weekly_load, workload_alerts, working_hours,
        TimeAllocationAnalytics, WorkloadAnalytics,
    },
};

pub struct AnalyticsEngine {
    store: OdStore,
    config: AnalyticsConfig,
    seed: u64,
}

impl AnalyticsEngine {
    pub fn new(store: OdStore, config: AnalyticsConfig, seed: u64) -> Self {
        Self {
            store,
            config,
            seed,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Direct store access for ingestion paths and test fixtures.
    pub fn store(&self) -> &OdStore {
        &self.store
    }

    fn require_staff(&self, staff_id: &str) -> AnalyticsResult<StaffMember> {
        self.store
            .get_staff(staff_id)?
            .ok_or_else(|| AnalyticsError::StaffNotFound {
                staff_id: staff_id.to_string(),
            })
    }

    fn requests_in_range(
        &self,
        staff_id: &str,
        range: &DateRange,
    ) -> AnalyticsResult<Vec<OdRequest>> {
        self.store.list_od_requests(&OdRequestFilter {
            staff_id: Some(staff_id.to_string()),
            created_after: Some(range.start()),
            created_before: Some(range.end()),
        })
    }

    fn all_time_efficiency(&self, staff_id: &str) -> AnalyticsResult<EfficiencyMetrics> {
        let requests = self.store.list_od_requests(&OdRequestFilter {
            staff_id: Some(staff_id.to_string()),
            ..OdRequestFilter::default()
        })?;
        Ok(efficiency_metrics(staff_id, &requests))
    }

    // ── Exposed operations ─────────────────────────────────────────

    /// Working hours and activity breakdown over a date range.
    pub fn workload_analytics(
        &self,
        staff_id: &str,
        range: &DateRange,
    ) -> AnalyticsResult<WorkloadAnalytics> {
        self.require_staff(staff_id)?;
        let record = self.store.latest_workload(staff_id)?;

        let weekly_hours = record
            .as_ref()
            .map(|r| weekly_load(r, &self.config).total());
        let total_hours = working_hours(record.as_ref(), range, &self.config);
        let activity_breakdown = record
            .as_ref()
            .map(|r| activity_distribution(r, range, &self.config))
            .unwrap_or_default();
        let alerts = weekly_hours
            .map(|w| workload_alerts(w, &self.config))
            .unwrap_or_default();

        Ok(WorkloadAnalytics {
            staff_id: staff_id.to_string(),
            range: *range,
            weekly_hours,
            total_hours,
            activity_breakdown,
            alerts,
        })
    }

    /// The activity distribution with per-bucket shares of the total.
    pub fn time_allocation(
        &self,
        staff_id: &str,
        range: &DateRange,
    ) -> AnalyticsResult<TimeAllocationAnalytics> {
        self.require_staff(staff_id)?;
        let record = self.store.latest_workload(staff_id)?;

        let total_hours = working_hours(record.as_ref(), range, &self.config);
        let distribution = record
            .as_ref()
            .map(|r| activity_distribution(r, range, &self.config))
            .unwrap_or_default();
        let shares = total_hours
            .map(|total| bucket_shares(&distribution, total))
            .unwrap_or_default();

        Ok(TimeAllocationAnalytics {
            staff_id: staff_id.to_string(),
            range: *range,
            total_hours,
            distribution,
            shares,
        })
    }

    /// Subject and class allocation analytics for one semester.
    pub fn teaching_analytics(
        &self,
        staff_id: &str,
        semester: &str,
    ) -> AnalyticsResult<TeachingAnalytics> {
        self.require_staff(staff_id)?;
        let record = self.store.get_workload(staff_id, semester)?;
        let mut rng = EstimateRng::for_record(self.seed, &format!("{staff_id}::{semester}"));
        Ok(teaching_analytics(
            record.as_ref(),
            staff_id,
            semester,
            &mut rng,
            &self.config,
        ))
    }

    /// OD processing statistics over a date range.
    pub fn efficiency_metrics(
        &self,
        staff_id: &str,
        range: &DateRange,
    ) -> AnalyticsResult<EfficiencyMetrics> {
        self.require_staff(staff_id)?;
        let requests = self.requests_in_range(staff_id, range)?;
        Ok(efficiency_metrics(staff_id, &requests))
    }

    /// Cross-semester trends plus department and institution
    /// comparisons. Semesters with no workload record are skipped; a
    /// trend needs two surviving points, otherwise it is None.
    pub fn comparative_analytics(
        &self,
        staff_id: &str,
        semesters: &[String],
    ) -> AnalyticsResult<ComparativeAnalytics> {
        let staff = self.require_staff(staff_id)?;

        let mut hours_points = Vec::new();
        let mut periods_points = Vec::new();
        for semester in semesters {
            if let Some(record) = self.store.get_workload(staff_id, semester)? {
                hours_points.push(TrendPoint {
                    label: semester.clone(),
                    value: weekly_load(&record, &self.config).total(),
                });
                periods_points.push(TrendPoint {
                    label: semester.clone(),
                    value: record.periods_per_week() as f64,
                });
            }
        }

        let workload_trend = if hours_points.len() >= 2 {
            Some(analyze_trend("weekly_hours", hours_points, &self.config)?)
        } else {
            None
        };
        let teaching_trend = if periods_points.len() >= 2 {
            Some(analyze_trend(
                "periods_per_week",
                periods_points,
                &self.config,
            )?)
        } else {
            None
        };

        let own = self.all_time_efficiency(staff_id)?;
        let department_cohort = self.cohort_efficiency(Some(&staff.department), staff_id)?;
        let institution_cohort = self.cohort_efficiency(None, staff_id)?;

        Ok(ComparativeAnalytics {
            staff_id: staff_id.to_string(),
            semesters: semesters.to_vec(),
            workload_trend,
            teaching_trend,
            department: comparison_metrics(&own, &department_cohort),
            institution: comparison_metrics(&own, &institution_cohort),
        })
    }

    /// Per-staff efficiency for every cohort member, excluding the
    /// staff member under comparison. The cohort either resolves fully
    /// or the whole call fails; partial cohorts are never returned.
    fn cohort_efficiency(
        &self,
        department: Option<&str>,
        exclude_staff_id: &str,
    ) -> AnalyticsResult<Vec<EfficiencyMetrics>> {
        let members = match department {
            Some(dept) => self.store.list_staff_by_department(dept)?,
            None => self.store.list_staff()?,
        };
        members
            .iter()
            .filter(|m| m.staff_id != exclude_staff_id)
            .map(|m| self.all_time_efficiency(&m.staff_id))
            .collect()
    }

    /// Department-wide aggregates for one semester.
    pub fn department_benchmarks(
        &self,
        department: &str,
        semester: &str,
    ) -> AnalyticsResult<DepartmentBenchmarks> {
        let members = self.store.list_staff_by_department(department)?;
        if members.is_empty() {
            return Err(AnalyticsError::DepartmentNotFound {
                department: department.to_string(),
            });
        }

        let mut weekly_hours = Vec::new();
        let mut periods_per_week = Vec::new();
        let mut efficiency = Vec::new();
        for member in &members {
            if let Some(record) = self.store.get_workload(&member.staff_id, semester)? {
                weekly_hours.push(weekly_load(&record, &self.config).total());
                periods_per_week.push(record.periods_per_week() as f64);
            }
            efficiency.push(self.all_time_efficiency(&member.staff_id)?);
        }

        Ok(department_benchmarks(
            department,
            semester,
            members.len() as u64,
            &weekly_hours,
            &periods_per_week,
            &efficiency,
        ))
    }

    /// Overlapping period assignments and excessive-load conditions.
    pub fn time_conflicts(
        &self,
        staff_id: &str,
        _range: &DateRange,
    ) -> AnalyticsResult<Vec<TimeConflict>> {
        self.require_staff(staff_id)?;
        let record = self.store.latest_workload(staff_id)?;
        let weekly_hours = record
            .as_ref()
            .map(|r| weekly_load(r, &self.config).total());
        Ok(detect_conflicts(
            record.as_ref(),
            weekly_hours,
            &self.config,
        ))
    }

    /// The full qualitative report for one staff member.
    pub fn performance_report(
        &self,
        staff_id: &str,
        options: &ReportOptions,
    ) -> AnalyticsResult<StaffPerformanceReport> {
        let staff = self.require_staff(staff_id)?;
        let workload = self.workload_analytics(staff_id, &options.range)?;
        let teaching = self.teaching_analytics(staff_id, &options.semester)?;
        let efficiency = self.efficiency_metrics(staff_id, &options.range)?;
        let conflicts = self.time_conflicts(staff_id, &options.range)?;

        let (strengths, improvement_areas, recommendations) =
            synthesize(&workload, &teaching, &efficiency, &self.config);

        log::info!(
            "performance report for {staff_id}: {} strengths, {} improvement areas, {} conflicts",
            strengths.len(),
            improvement_areas.len(),
            conflicts.len(),
        );

        Ok(StaffPerformanceReport {
            staff,
            semester: options.semester.clone(),
            range: options.range,
            generated_at: Utc::now(),
            workload,
            teaching,
            efficiency,
            conflicts,
            strengths,
            improvement_areas,
            recommendations,
        })
    }

    /// Institution-wide request totals and top requesters.
    pub fn request_summary(&self) -> AnalyticsResult<RequestSummary> {
        let requests = self.store.list_od_requests(&OdRequestFilter::default())?;
        Ok(summarize_requests(&requests))
    }
}
