#![forbid(unsafe_code)]

//! Snapshot loader for the gap-fill matcher: one read transaction collects
//! everything the pure pass in `rd_core::gapfill` consumes, so gap counts
//! are internally consistent even while unrelated mutations run.

use super::*;
use rd_core::gapfill::{
    AvailabilityRow as GapAvailability, GapFillSnapshot, LeaveSpan, ScheduleSnapshot,
    ShiftSnapshot,
};
use rd_core::ids::StoreId;
use rd_core::interval::TimeRange;
use rusqlite::{Transaction, params};
use time::Date;

impl SqliteStore {
    /// The only hard failure is an unknown week; a missing schedule, empty
    /// roster, or absent availability are all legitimate snapshot states the
    /// matcher turns into explanatory notes.
    pub fn gap_fill_snapshot(
        &mut self,
        store: &StoreId,
        week_id: &str,
    ) -> Result<GapFillSnapshot, StoreError> {
        let tx = self.conn_mut().transaction()?;
        let week = week_get_tx(&tx, week_id)?;

        let schedule = match super::schedules::schedule_by_key_tx(&tx, store.as_str(), week_id)? {
            Some(row) => {
                let shifts = super::schedules::shifts_with_assignments_tx(&tx, &row.id)?
                    .into_iter()
                    .map(|entry| {
                        let window =
                            TimeRange::new(entry.shift.start_at_ms, entry.shift.end_at_ms)
                                .ok_or(StoreError::InvalidInput("invalid shift row"))?;
                        Ok(ShiftSnapshot {
                            shift_id: entry.shift.id,
                            role: entry.shift.role,
                            window,
                            headcount_required: entry.shift.headcount_required,
                            assigned: entry
                                .assignments
                                .into_iter()
                                .map(|a| a.employee_id)
                                .collect(),
                        })
                    })
                    .collect::<Result<Vec<_>, StoreError>>()?;
                Some(ScheduleSnapshot {
                    schedule_id: row.id,
                    is_published: row.is_published,
                    shifts,
                })
            }
            None => None,
        };

        let roster = active_roster_tx(&tx, store.as_str())?;
        let availability = availability_rows_tx(&tx, store.as_str(), week_id)?;
        let leave = approved_leave_tx(&tx, store.as_str(), week.week_start, week.week_end)?;

        tx.commit()?;
        Ok(GapFillSnapshot {
            week_start: week.week_start,
            week_end: week.week_end,
            schedule,
            roster,
            availability,
            leave,
        })
    }
}

/// Active employee-role members in membership-creation order; this order is
/// the matcher's ranking tie-break.
fn active_roster_tx(tx: &Transaction<'_>, store_id: &str) -> Result<Vec<String>, StoreError> {
    let mut stmt = tx.prepare(
        "SELECT employee_id FROM store_memberships \
         WHERE store_id=?1 AND is_active=1 AND store_role=?2 \
         ORDER BY created_at_ms ASC, id ASC",
    )?;
    let mut rows = stmt.query(params![store_id, ROLE_EMPLOYEE])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(row.get::<_, String>(0)?);
    }
    Ok(out)
}

fn availability_rows_tx(
    tx: &Transaction<'_>,
    store_id: &str,
    week_id: &str,
) -> Result<Vec<GapAvailability>, StoreError> {
    let mut stmt = tx.prepare(
        "SELECT employee_id, available_start_at_ms, available_end_at_ms \
         FROM availability WHERE store_id=?1 AND week_id=?2 \
         ORDER BY day ASC, employee_id ASC",
    )?;
    let mut rows = stmt.query(params![store_id, week_id])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(GapAvailability {
            employee_id: row.get(0)?,
            start_ms: row.get(1)?,
            end_ms: row.get(2)?,
        });
    }
    Ok(out)
}

/// Approved spans for this store overlapping the week's date range. Dates are
/// stored ISO-8601, so text comparison orders correctly.
fn approved_leave_tx(
    tx: &Transaction<'_>,
    store_id: &str,
    week_start: Date,
    week_end: Date,
) -> Result<Vec<LeaveSpan>, StoreError> {
    let mut stmt = tx.prepare(
        "SELECT employee_id, start_date, end_date FROM leave_requests \
         WHERE store_id=?1 AND status=?2 AND start_date<=?3 AND end_date>=?4 \
         ORDER BY start_date ASC, id ASC",
    )?;
    let mut rows = stmt.query(params![
        store_id,
        LEAVE_APPROVED,
        encode_date(week_end),
        encode_date(week_start)
    ])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let start: String = row.get(1)?;
        let end: String = row.get(2)?;
        out.push(LeaveSpan {
            employee_id: row.get(0)?,
            start_date: decode_date(&start)?,
            end_date: decode_date(&end)?,
        });
    }
    Ok(out)
}
