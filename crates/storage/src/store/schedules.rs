#![forbid(unsafe_code)]

use super::*;
use rd_core::ids::StoreId;
use rusqlite::{OptionalExtension, Transaction, params};

impl SqliteStore {
    /// Idempotent create: re-requesting a (store, week) pair returns the
    /// existing row, silently. Reading an existing schedule of a locked week
    /// is allowed; only the create path checks the lock.
    pub fn schedule_get_or_create(
        &mut self,
        store: &StoreId,
        week_id: &str,
    ) -> Result<ScheduleRow, StoreError> {
        let now_ms = now_ms();
        let tx = self.conn_mut().transaction()?;
        let week = week_get_tx(&tx, week_id)?;

        if let Some(existing) = schedule_by_key_tx(&tx, store.as_str(), week_id)? {
            tx.commit()?;
            return Ok(existing);
        }

        if week.is_locked {
            return Err(StoreError::WeekLocked);
        }

        tx.execute(
            "INSERT INTO schedules(id, store_id, week_id, is_published, created_at_ms) \
             VALUES (?1, ?2, ?3, 0, ?4) \
             ON CONFLICT(store_id, week_id) DO NOTHING",
            params![new_id(), store.as_str(), week_id, now_ms],
        )?;
        let schedule = schedule_by_key_tx(&tx, store.as_str(), week_id)?
            .ok_or(StoreError::UnknownSchedule)?;
        tx.commit()?;
        Ok(schedule)
    }

    pub fn schedule_by_store_week(
        &mut self,
        store: &StoreId,
        week_id: &str,
    ) -> Result<Option<ScheduleRow>, StoreError> {
        let tx = self.conn_mut().transaction()?;
        week_get_tx(&tx, week_id)?;
        let schedule = schedule_by_key_tx(&tx, store.as_str(), week_id)?;
        tx.commit()?;
        Ok(schedule)
    }

    /// The schedule with its full shift graph, shifts and assignments in
    /// creation order.
    pub fn schedule_get(&mut self, schedule_id: &str) -> Result<ScheduleDetail, StoreError> {
        let tx = self.conn_mut().transaction()?;
        let schedule = schedule_get_tx(&tx, schedule_id)?;
        let shifts = shifts_with_assignments_tx(&tx, schedule_id)?;
        tx.commit()?;
        Ok(ScheduleDetail { schedule, shifts })
    }

    /// Flips `is_published` under the week-lock guard. Writing the current
    /// value again is a normal successful write; there is deliberately no
    /// no-op short-circuit, so republishing on a locked week still fails.
    pub fn schedule_set_published(
        &mut self,
        schedule_id: &str,
        value: bool,
    ) -> Result<ScheduleRow, StoreError> {
        let tx = self.conn_mut().transaction()?;
        let schedule = schedule_get_tx(&tx, schedule_id)?;
        ensure_week_editable_tx(&tx, &schedule.week_id)?;

        tx.execute(
            "UPDATE schedules SET is_published=?2 WHERE id=?1",
            params![schedule_id, i64::from(value)],
        )?;
        let schedule = schedule_get_tx(&tx, schedule_id)?;
        tx.commit()?;
        Ok(schedule)
    }

    /// Deletes the schedule; shifts and assignments cascade through the
    /// foreign keys.
    pub fn schedule_delete(&mut self, schedule_id: &str) -> Result<(), StoreError> {
        let tx = self.conn_mut().transaction()?;
        let schedule = schedule_get_tx(&tx, schedule_id)?;
        ensure_week_editable_tx(&tx, &schedule.week_id)?;

        tx.execute("DELETE FROM schedules WHERE id=?1", params![schedule_id])?;
        tx.commit()?;
        Ok(())
    }
}

pub(crate) fn schedule_by_key_tx(
    tx: &Transaction<'_>,
    store_id: &str,
    week_id: &str,
) -> Result<Option<ScheduleRow>, StoreError> {
    Ok(tx
        .query_row(
            "SELECT id, store_id, week_id, is_published, created_at_ms \
             FROM schedules WHERE store_id=?1 AND week_id=?2",
            params![store_id, week_id],
            map_schedule_row,
        )
        .optional()?)
}

pub(crate) fn shifts_with_assignments_tx(
    tx: &Transaction<'_>,
    schedule_id: &str,
) -> Result<Vec<ShiftWithAssignments>, StoreError> {
    let mut stmt = tx.prepare(
        "SELECT id, schedule_id, role, start_at_ms, end_at_ms, headcount_required, created_at_ms \
         FROM shifts WHERE schedule_id=?1 \
         ORDER BY created_at_ms ASC, id ASC",
    )?;
    let mut rows = stmt.query(params![schedule_id])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let headcount = row.get::<_, i64>(5)?;
        out.push(ShiftWithAssignments {
            shift: ShiftRow {
                id: row.get(0)?,
                schedule_id: row.get(1)?,
                role: row.get(2)?,
                start_at_ms: row.get(3)?,
                end_at_ms: row.get(4)?,
                headcount_required: u32::try_from(headcount)
                    .map_err(|_| StoreError::InvalidInput("invalid shift row"))?,
                created_at_ms: row.get(6)?,
            },
            assignments: Vec::new(),
        });
    }
    drop(rows);
    drop(stmt);

    for entry in &mut out {
        entry.assignments = shift_assignments_tx(tx, &entry.shift.id)?;
    }
    Ok(out)
}

pub(crate) fn shift_assignments_tx(
    tx: &Transaction<'_>,
    shift_id: &str,
) -> Result<Vec<AssignmentRow>, StoreError> {
    let mut stmt = tx.prepare(
        "SELECT id, shift_id, employee_id, assigned_at_ms \
         FROM shift_assignments WHERE shift_id=?1 \
         ORDER BY assigned_at_ms ASC, id ASC",
    )?;
    let mut rows = stmt.query(params![shift_id])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(AssignmentRow {
            id: row.get(0)?,
            shift_id: row.get(1)?,
            employee_id: row.get(2)?,
            assigned_at_ms: row.get(3)?,
        });
    }
    Ok(out)
}
