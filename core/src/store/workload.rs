use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::OdStore;
use crate::{error::AnalyticsResult, workload::WorkloadRecord};

/// Raw JSON columns as read from a workload row; parsed outside the
/// rusqlite mapper so serde errors surface as serialization errors.
struct RawWorkloadRow {
    staff_id: String,
    semester: String,
    periods_per_subject: String,
    classes_per_grade: String,
    weekly_schedule: String,
}

fn workload_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawWorkloadRow> {
    Ok(RawWorkloadRow {
        staff_id: row.get(0)?,
        semester: row.get(1)?,
        periods_per_subject: row.get(2)?,
        classes_per_grade: row.get(3)?,
        weekly_schedule: row.get(4)?,
    })
}

fn parse_record(raw: RawWorkloadRow) -> AnalyticsResult<WorkloadRecord> {
    Ok(WorkloadRecord {
        staff_id: raw.staff_id,
        semester: raw.semester,
        periods_per_subject: serde_json::from_str(&raw.periods_per_subject)?,
        classes_per_grade: serde_json::from_str(&raw.classes_per_grade)?,
        weekly_schedule: serde_json::from_str(&raw.weekly_schedule)?,
    })
}

const WORKLOAD_COLUMNS: &str =
    "staff_id, semester, periods_per_subject, classes_per_grade, weekly_schedule";

impl OdStore {
    // ── Workload records ───────────────────────────────────────────

    /// Insert or replace the record under its "{staff_id}::{semester}"
    /// key. Used by the ingestion path, never by analytics reads.
    pub fn upsert_workload(&self, record: &WorkloadRecord) -> AnalyticsResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO workload_record
                 (record_key, staff_id, semester, periods_per_subject,
                  classes_per_grade, weekly_schedule, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.record_key(),
                &record.staff_id,
                &record.semester,
                serde_json::to_string(&record.periods_per_subject)?,
                serde_json::to_string(&record.classes_per_grade)?,
                serde_json::to_string(&record.weekly_schedule)?,
                Utc::now(),
            ],
        )?;
        Ok(())
    }

    pub fn get_workload(
        &self,
        staff_id: &str,
        semester: &str,
    ) -> AnalyticsResult<Option<WorkloadRecord>> {
        let raw = self
            .conn
            .query_row(
                &format!("SELECT {WORKLOAD_COLUMNS} FROM workload_record WHERE record_key = ?1"),
                params![format!("{staff_id}::{semester}")],
                workload_row_mapper,
            )
            .optional()?;
        raw.map(parse_record).transpose()
    }

    /// The staff member's record with the greatest key: latest wins.
    pub fn latest_workload(&self, staff_id: &str) -> AnalyticsResult<Option<WorkloadRecord>> {
        let raw = self
            .conn
            .query_row(
                &format!(
                    "SELECT {WORKLOAD_COLUMNS} FROM workload_record
                     WHERE staff_id = ?1
                     ORDER BY record_key DESC LIMIT 1"
                ),
                params![staff_id],
                workload_row_mapper,
            )
            .optional()?;
        raw.map(parse_record).transpose()
    }

    pub fn list_workloads(&self, staff_id: &str) -> AnalyticsResult<Vec<WorkloadRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WORKLOAD_COLUMNS} FROM workload_record
             WHERE staff_id = ?1 ORDER BY record_key"
        ))?;
        let raws = stmt
            .query_map(params![staff_id], workload_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        raws.into_iter().map(parse_record).collect()
    }
}
