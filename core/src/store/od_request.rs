use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::OdStore;
use crate::{
    error::AnalyticsResult,
    requests::{OdRequest, OdStatus},
};

/// Optional filters for the request ledger; all unset lists everything.
#[derive(Debug, Clone, Default)]
pub struct OdRequestFilter {
    pub staff_id: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

fn od_request_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<OdRequest> {
    let status_text: String = row.get(8)?;
    let status = OdStatus::parse(&status_text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            8,
            rusqlite::types::Type::Text,
            format!("unknown od status '{status_text}'").into(),
        )
    })?;
    let periods_json: String = row.get(6)?;
    let periods = serde_json::from_str(&periods_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(OdRequest {
        request_id: row.get(0)?,
        student_id: row.get(1)?,
        student_name: row.get(2)?,
        register_number: row.get(3)?,
        staff_id: row.get(4)?,
        date: row.get(5)?,
        periods,
        reason: row.get(7)?,
        status,
        attachment_url: row.get(9)?,
        created_at: row.get(10)?,
        approved_at: row.get(11)?,
        approved_by: row.get(12)?,
        rejection_reason: row.get(13)?,
    })
}

const OD_REQUEST_COLUMNS: &str = "request_id, student_id, student_name, register_number, staff_id,
     date, periods, reason, status, attachment_url, created_at,
     approved_at, approved_by, rejection_reason";

impl OdStore {
    // ── OD requests ────────────────────────────────────────────────

    pub fn insert_od_request(&self, request: &OdRequest) -> AnalyticsResult<()> {
        self.conn.execute(
            "INSERT INTO od_request
                 (request_id, student_id, student_name, register_number, staff_id,
                  date, periods, reason, status, attachment_url, created_at,
                  approved_at, approved_by, rejection_reason)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                &request.request_id,
                &request.student_id,
                &request.student_name,
                request.register_number.as_deref(),
                &request.staff_id,
                request.date,
                serde_json::to_string(&request.periods)?,
                &request.reason,
                request.status.as_str(),
                request.attachment_url.as_deref(),
                request.created_at,
                request.approved_at,
                request.approved_by.as_deref(),
                request.rejection_reason.as_deref(),
            ],
        )?;
        Ok(())
    }

    pub fn get_od_request(&self, request_id: &str) -> AnalyticsResult<Option<OdRequest>> {
        let request = self
            .conn
            .query_row(
                &format!("SELECT {OD_REQUEST_COLUMNS} FROM od_request WHERE request_id = ?1"),
                params![request_id],
                od_request_row_mapper,
            )
            .optional()?;
        Ok(request)
    }

    pub fn list_od_requests(&self, filter: &OdRequestFilter) -> AnalyticsResult<Vec<OdRequest>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {OD_REQUEST_COLUMNS} FROM od_request
             WHERE (?1 IS NULL OR staff_id = ?1)
               AND (?2 IS NULL OR created_at >= ?2)
               AND (?3 IS NULL OR created_at <= ?3)
             ORDER BY created_at DESC, request_id"
        ))?;
        let requests = stmt
            .query_map(
                params![
                    filter.staff_id.as_deref(),
                    filter.created_after,
                    filter.created_before,
                ],
                od_request_row_mapper,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(requests)
    }

    /// Move a request to a new status. Approval and rejection stamp the
    /// decision time and approver; a rejection may carry a reason.
    pub fn update_request_status(
        &self,
        request_id: &str,
        status: OdStatus,
        approver_id: &str,
        rejection_reason: Option<&str>,
        decided_at: DateTime<Utc>,
    ) -> AnalyticsResult<()> {
        if status.is_decision() {
            self.conn.execute(
                "UPDATE od_request
                 SET status = ?2, approved_at = ?3, approved_by = ?4, rejection_reason = ?5
                 WHERE request_id = ?1",
                params![
                    request_id,
                    status.as_str(),
                    decided_at,
                    approver_id,
                    rejection_reason,
                ],
            )?;
        } else {
            self.conn.execute(
                "UPDATE od_request SET status = ?2 WHERE request_id = ?1",
                params![request_id, status.as_str()],
            )?;
        }
        Ok(())
    }
}
