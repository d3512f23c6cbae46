#![forbid(unsafe_code)]

use super::*;
use rd_core::ids::EmployeeId;
use rusqlite::{OptionalExtension, Transaction, params};

impl SqliteStore {
    pub fn shift_add(
        &mut self,
        schedule_id: &str,
        role: &str,
        start_at_ms: i64,
        end_at_ms: i64,
        headcount_required: u32,
    ) -> Result<ShiftRow, StoreError> {
        let role = role.trim();
        if role.is_empty() {
            return Err(StoreError::InvalidInput("role must not be empty"));
        }
        if headcount_required == 0 {
            return Err(StoreError::InvalidInput("headcount_required must be positive"));
        }
        if end_at_ms <= start_at_ms {
            return Err(StoreError::InvalidInterval);
        }

        let now_ms = now_ms();
        let tx = self.conn_mut().transaction()?;
        let schedule = schedule_get_tx(&tx, schedule_id)?;
        ensure_week_editable_tx(&tx, &schedule.week_id)?;
        if schedule.is_published {
            return Err(StoreError::SchedulePublished);
        }

        let shift = ShiftRow {
            id: new_id(),
            schedule_id: schedule.id,
            role: role.to_string(),
            start_at_ms,
            end_at_ms,
            headcount_required,
            created_at_ms: now_ms,
        };
        tx.execute(
            "INSERT INTO shifts(id, schedule_id, role, start_at_ms, end_at_ms, headcount_required, created_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                shift.id,
                shift.schedule_id,
                shift.role,
                shift.start_at_ms,
                shift.end_at_ms,
                i64::from(shift.headcount_required),
                shift.created_at_ms,
            ],
        )?;
        tx.commit()?;
        Ok(shift)
    }

    /// Appends one assignment. The duplicate and capacity checks run inside
    /// the insert transaction, so two concurrent fills of the last open slot
    /// resolve to one success and one `ShiftFull`; the UNIQUE index backs
    /// the duplicate check under races.
    pub fn assignment_add(
        &mut self,
        shift_id: &str,
        employee: &EmployeeId,
    ) -> Result<AssignmentRow, StoreError> {
        let now_ms = now_ms();
        let tx = self.conn_mut().transaction()?;
        let shift = shift_get_tx(&tx, shift_id)?;
        let schedule = schedule_get_tx(&tx, &shift.schedule_id)?;
        ensure_week_editable_tx(&tx, &schedule.week_id)?;
        if schedule.is_published {
            return Err(StoreError::SchedulePublished);
        }

        let already_assigned = tx
            .query_row(
                "SELECT 1 FROM shift_assignments WHERE shift_id=?1 AND employee_id=?2",
                params![shift_id, employee.as_str()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .is_some();
        if already_assigned {
            return Err(StoreError::DuplicateAssignment);
        }

        let assigned = tx.query_row(
            "SELECT COUNT(1) FROM shift_assignments WHERE shift_id=?1",
            params![shift_id],
            |row| row.get::<_, i64>(0),
        )?;
        if assigned >= i64::from(shift.headcount_required) {
            return Err(StoreError::ShiftFull);
        }

        let assignment = AssignmentRow {
            id: new_id(),
            shift_id: shift.id,
            employee_id: employee.as_str().to_string(),
            assigned_at_ms: now_ms,
        };
        let insert = tx.execute(
            "INSERT INTO shift_assignments(id, shift_id, employee_id, assigned_at_ms) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                assignment.id,
                assignment.shift_id,
                assignment.employee_id,
                assignment.assigned_at_ms,
            ],
        );
        if let Err(err) = insert {
            return Err(map_insert_conflict(err, StoreError::DuplicateAssignment));
        }

        tx.commit()?;
        Ok(assignment)
    }

    /// Removes exactly one assignment under the same lock/publish guards as
    /// adding one.
    pub fn assignment_remove(&mut self, assignment_id: &str) -> Result<(), StoreError> {
        let tx = self.conn_mut().transaction()?;
        let shift_id = tx
            .query_row(
                "SELECT shift_id FROM shift_assignments WHERE id=?1",
                params![assignment_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .ok_or(StoreError::UnknownAssignment)?;

        let shift = shift_get_tx(&tx, &shift_id)?;
        let schedule = schedule_get_tx(&tx, &shift.schedule_id)?;
        ensure_week_editable_tx(&tx, &schedule.week_id)?;
        if schedule.is_published {
            return Err(StoreError::SchedulePublished);
        }

        tx.execute(
            "DELETE FROM shift_assignments WHERE id=?1",
            params![assignment_id],
        )?;
        tx.commit()?;
        Ok(())
    }
}

pub(crate) fn shift_get_tx(tx: &Transaction<'_>, shift_id: &str) -> Result<ShiftRow, StoreError> {
    let row = tx
        .query_row(
            "SELECT id, schedule_id, role, start_at_ms, end_at_ms, headcount_required, created_at_ms \
             FROM shifts WHERE id=?1",
            params![shift_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, i64>(6)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((id, schedule_id, role, start_at_ms, end_at_ms, headcount, created_at_ms)) => {
            Ok(ShiftRow {
                id,
                schedule_id,
                role,
                start_at_ms,
                end_at_ms,
                headcount_required: u32::try_from(headcount)
                    .map_err(|_| StoreError::InvalidInput("invalid shift row"))?,
                created_at_ms,
            })
        }
        None => Err(StoreError::UnknownShift),
    }
}
