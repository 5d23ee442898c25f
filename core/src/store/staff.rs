use rusqlite::{params, OptionalExtension};

use super::OdStore;
use crate::{error::AnalyticsResult, types::StaffMember};

fn staff_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<StaffMember> {
    Ok(StaffMember {
        staff_id: row.get(0)?,
        name: row.get(1)?,
        department: row.get(2)?,
        subject_specialty: row.get(3)?,
        years_taught: row.get::<_, i64>(4)? as u32,
        phone: row.get(5)?,
        designation: row.get(6)?,
    })
}

const STAFF_COLUMNS: &str =
    "staff_id, name, department, subject_specialty, years_taught, phone, designation";

impl OdStore {
    // ── Staff ──────────────────────────────────────────────────────

    pub fn insert_staff(&self, staff: &StaffMember) -> AnalyticsResult<()> {
        self.conn.execute(
            "INSERT INTO staff (staff_id, name, department, subject_specialty,
                                years_taught, phone, designation)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &staff.staff_id,
                &staff.name,
                &staff.department,
                &staff.subject_specialty,
                staff.years_taught as i64,
                staff.phone.as_deref(),
                staff.designation.as_deref(),
            ],
        )?;
        Ok(())
    }

    pub fn get_staff(&self, staff_id: &str) -> AnalyticsResult<Option<StaffMember>> {
        let staff = self
            .conn
            .query_row(
                &format!("SELECT {STAFF_COLUMNS} FROM staff WHERE staff_id = ?1"),
                params![staff_id],
                staff_row_mapper,
            )
            .optional()?;
        Ok(staff)
    }

    pub fn list_staff(&self) -> AnalyticsResult<Vec<StaffMember>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {STAFF_COLUMNS} FROM staff ORDER BY staff_id"))?;
        let staff = stmt
            .query_map([], staff_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(staff)
    }

    pub fn list_staff_by_department(&self, department: &str) -> AnalyticsResult<Vec<StaffMember>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE department = ?1 ORDER BY staff_id"
        ))?;
        let staff = stmt
            .query_map(params![department], staff_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(staff)
    }
}
