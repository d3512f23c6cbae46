#![forbid(unsafe_code)]

use super::*;
use rd_core::calendar;
use rusqlite::{OptionalExtension, Transaction, params};
use time::Date;

impl SqliteStore {
    /// Week Ledger entry point. Creates the week lazily on first sight of a
    /// window; concurrent duplicate creates collapse onto the UNIQUE
    /// constraint on `week_start` and both callers get the same row.
    pub fn week_get_or_create(&mut self, week_start: Date) -> Result<WeekRow, StoreError> {
        if !calendar::is_week_start(week_start) {
            return Err(StoreError::InvalidInput("week_start must be a Friday"));
        }
        let week_end = calendar::week_end_for(week_start);
        let now_ms = now_ms();

        let tx = self.conn_mut().transaction()?;
        tx.execute(
            "INSERT INTO weeks(id, week_start, week_end, is_locked, locked_at_ms, created_at_ms) \
             VALUES (?1, ?2, ?3, 0, NULL, ?4) \
             ON CONFLICT(week_start) DO NOTHING",
            params![
                new_id(),
                encode_date(week_start),
                encode_date(week_end),
                now_ms
            ],
        )?;
        let week = week_by_start_tx(&tx, week_start)?;
        tx.commit()?;
        Ok(week)
    }

    pub fn week_get(&mut self, week_id: &str) -> Result<WeekRow, StoreError> {
        let tx = self.conn_mut().transaction()?;
        let week = week_get_tx(&tx, week_id)?;
        tx.commit()?;
        Ok(week)
    }

    /// Idempotent: locking a locked week returns current state unchanged.
    pub fn week_lock(&mut self, week_id: &str) -> Result<WeekRow, StoreError> {
        let now_ms = now_ms();
        let tx = self.conn_mut().transaction()?;
        let week = week_get_tx(&tx, week_id)?;
        if !week.is_locked {
            tx.execute(
                "UPDATE weeks SET is_locked=1, locked_at_ms=?2 WHERE id=?1",
                params![week_id, now_ms],
            )?;
        }
        let week = week_get_tx(&tx, week_id)?;
        tx.commit()?;
        Ok(week)
    }

    /// Idempotent: unlocking an unlocked week is a no-op.
    pub fn week_unlock(&mut self, week_id: &str) -> Result<WeekRow, StoreError> {
        let tx = self.conn_mut().transaction()?;
        let week = week_get_tx(&tx, week_id)?;
        if week.is_locked {
            tx.execute(
                "UPDATE weeks SET is_locked=0, locked_at_ms=NULL WHERE id=?1",
                params![week_id],
            )?;
        }
        let week = week_get_tx(&tx, week_id)?;
        tx.commit()?;
        Ok(week)
    }
}

fn week_by_start_tx(tx: &Transaction<'_>, week_start: Date) -> Result<WeekRow, StoreError> {
    let week_id = tx
        .query_row(
            "SELECT id FROM weeks WHERE week_start=?1",
            params![encode_date(week_start)],
            |row| row.get::<_, String>(0),
        )
        .optional()?
        .ok_or(StoreError::UnknownWeek)?;
    week_get_tx(tx, &week_id)
}
