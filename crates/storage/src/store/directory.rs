#![forbid(unsafe_code)]

//! Collaborator-owned data the matcher consumes: store membership, submitted
//! availability, and leave requests. These are thin seed/upsert operations;
//! the owning systems carry the real lifecycle.

use super::*;
use rd_core::ids::{EmployeeId, StoreId};
use rusqlite::params;
use time::Date;

impl SqliteStore {
    pub fn membership_upsert(
        &mut self,
        store: &StoreId,
        employee: &EmployeeId,
        store_role: &str,
        is_active: bool,
    ) -> Result<MembershipRow, StoreError> {
        if store_role != ROLE_EMPLOYEE && store_role != ROLE_MANAGER {
            return Err(StoreError::InvalidInput("store_role must be employee or manager"));
        }

        let now_ms = now_ms();
        let tx = self.conn_mut().transaction()?;
        tx.execute(
            "INSERT INTO store_memberships(id, store_id, employee_id, store_role, is_active, created_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT(store_id, employee_id) DO UPDATE SET \
               store_role=excluded.store_role, is_active=excluded.is_active",
            params![
                new_id(),
                store.as_str(),
                employee.as_str(),
                store_role,
                i64::from(is_active),
                now_ms,
            ],
        )?;
        let membership = tx.query_row(
            "SELECT id, store_id, employee_id, store_role, is_active, created_at_ms \
             FROM store_memberships WHERE store_id=?1 AND employee_id=?2",
            params![store.as_str(), employee.as_str()],
            |row| {
                Ok(MembershipRow {
                    id: row.get(0)?,
                    store_id: row.get(1)?,
                    employee_id: row.get(2)?,
                    store_role: row.get(3)?,
                    is_active: row.get::<_, i64>(4)? != 0,
                    created_at_ms: row.get(5)?,
                })
            },
        )?;
        tx.commit()?;
        Ok(membership)
    }

    /// One open window per (employee, store, week, day); re-putting the same
    /// day replaces the window.
    pub fn availability_put(
        &mut self,
        employee: &EmployeeId,
        store: &StoreId,
        week_id: &str,
        day: Date,
        available_start_at_ms: Option<i64>,
        available_end_at_ms: Option<i64>,
    ) -> Result<AvailabilityRow, StoreError> {
        let now_ms = now_ms();
        let tx = self.conn_mut().transaction()?;
        week_get_tx(&tx, week_id)?;

        tx.execute(
            "INSERT INTO availability(id, employee_id, store_id, week_id, day, \
               available_start_at_ms, available_end_at_ms, created_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
             ON CONFLICT(employee_id, store_id, week_id, day) DO UPDATE SET \
               available_start_at_ms=excluded.available_start_at_ms, \
               available_end_at_ms=excluded.available_end_at_ms",
            params![
                new_id(),
                employee.as_str(),
                store.as_str(),
                week_id,
                encode_date(day),
                available_start_at_ms,
                available_end_at_ms,
                now_ms,
            ],
        )?;
        let row = tx.query_row(
            "SELECT id, employee_id, store_id, week_id, day, \
               available_start_at_ms, available_end_at_ms, created_at_ms \
             FROM availability \
             WHERE employee_id=?1 AND store_id=?2 AND week_id=?3 AND day=?4",
            params![
                employee.as_str(),
                store.as_str(),
                week_id,
                encode_date(day)
            ],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<i64>>(5)?,
                    row.get::<_, Option<i64>>(6)?,
                    row.get::<_, i64>(7)?,
                ))
            },
        )?;
        tx.commit()?;
        Ok(AvailabilityRow {
            id: row.0,
            employee_id: row.1,
            store_id: row.2,
            week_id: row.3,
            day: decode_date(&row.4)?,
            available_start_at_ms: row.5,
            available_end_at_ms: row.6,
            created_at_ms: row.7,
        })
    }

    pub fn leave_request_add(
        &mut self,
        employee: &EmployeeId,
        store: &StoreId,
        start_date: Date,
        end_date: Date,
        status: &str,
    ) -> Result<LeaveRequestRow, StoreError> {
        if !matches!(status, LEAVE_PENDING | LEAVE_APPROVED | LEAVE_REJECTED) {
            return Err(StoreError::InvalidInput(
                "status must be pending, approved, or rejected",
            ));
        }
        if end_date < start_date {
            return Err(StoreError::InvalidInput("end_date must not precede start_date"));
        }

        let leave = LeaveRequestRow {
            id: new_id(),
            employee_id: employee.as_str().to_string(),
            store_id: store.as_str().to_string(),
            start_date,
            end_date,
            status: status.to_string(),
            created_at_ms: now_ms(),
        };
        self.conn().execute(
            "INSERT INTO leave_requests(id, employee_id, store_id, start_date, end_date, status, created_at_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                leave.id,
                leave.employee_id,
                leave.store_id,
                encode_date(leave.start_date),
                encode_date(leave.end_date),
                leave.status,
                leave.created_at_ms,
            ],
        )?;
        Ok(leave)
    }
}
