#![forbid(unsafe_code)]

mod directory;
mod error;
mod gapfill;
mod rows;
mod schedules;
mod shifts;
mod weeks;

pub use error::StoreError;
pub use rows::*;

use rusqlite::{Connection, ErrorCode, OptionalExtension, Transaction, params};
use std::path::{Path, PathBuf};
use std::time::Duration;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

pub const ROLE_EMPLOYEE: &str = "employee";
pub const ROLE_MANAGER: &str = "manager";

pub const LEAVE_PENDING: &str = "pending";
pub const LEAVE_APPROVED: &str = "approved";
pub const LEAVE_REJECTED: &str = "rejected";

const DATE_FMT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join("rosterd.db");
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

        install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub(crate) fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS weeks (
          id TEXT PRIMARY KEY,
          week_start TEXT NOT NULL UNIQUE,
          week_end TEXT NOT NULL,
          is_locked INTEGER NOT NULL DEFAULT 0,
          locked_at_ms INTEGER,
          created_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS schedules (
          id TEXT PRIMARY KEY,
          store_id TEXT NOT NULL,
          week_id TEXT NOT NULL,
          is_published INTEGER NOT NULL DEFAULT 0,
          created_at_ms INTEGER NOT NULL,
          UNIQUE(store_id, week_id),
          FOREIGN KEY(week_id) REFERENCES weeks(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS shifts (
          id TEXT PRIMARY KEY,
          schedule_id TEXT NOT NULL,
          role TEXT NOT NULL,
          start_at_ms INTEGER NOT NULL,
          end_at_ms INTEGER NOT NULL,
          headcount_required INTEGER NOT NULL DEFAULT 1,
          created_at_ms INTEGER NOT NULL,
          FOREIGN KEY(schedule_id) REFERENCES schedules(id) ON DELETE CASCADE,
          CHECK(end_at_ms > start_at_ms),
          CHECK(headcount_required > 0)
        );

        CREATE INDEX IF NOT EXISTS idx_shifts_schedule_created
          ON shifts(schedule_id, created_at_ms, id);

        CREATE TABLE IF NOT EXISTS shift_assignments (
          id TEXT PRIMARY KEY,
          shift_id TEXT NOT NULL,
          employee_id TEXT NOT NULL,
          assigned_at_ms INTEGER NOT NULL,
          UNIQUE(shift_id, employee_id),
          FOREIGN KEY(shift_id) REFERENCES shifts(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS store_memberships (
          id TEXT PRIMARY KEY,
          store_id TEXT NOT NULL,
          employee_id TEXT NOT NULL,
          store_role TEXT NOT NULL DEFAULT 'employee',
          is_active INTEGER NOT NULL DEFAULT 1,
          created_at_ms INTEGER NOT NULL,
          UNIQUE(store_id, employee_id)
        );

        CREATE TABLE IF NOT EXISTS availability (
          id TEXT PRIMARY KEY,
          employee_id TEXT NOT NULL,
          store_id TEXT NOT NULL,
          week_id TEXT NOT NULL,
          day TEXT NOT NULL,
          available_start_at_ms INTEGER,
          available_end_at_ms INTEGER,
          created_at_ms INTEGER NOT NULL,
          UNIQUE(employee_id, store_id, week_id, day),
          FOREIGN KEY(week_id) REFERENCES weeks(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS leave_requests (
          id TEXT PRIMARY KEY,
          employee_id TEXT NOT NULL,
          store_id TEXT NOT NULL,
          start_date TEXT NOT NULL,
          end_date TEXT NOT NULL,
          status TEXT NOT NULL DEFAULT 'pending',
          created_at_ms INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_leave_store_status
          ON leave_requests(store_id, status, start_date);
        "#,
    )?;

    Ok(())
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration,
        Err(_) => return 0,
    };

    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

pub(crate) fn encode_date(date: Date) -> String {
    date.format(DATE_FMT)
        .unwrap_or_else(|_| "1970-01-01".to_string())
}

pub(crate) fn decode_date(value: &str) -> Result<Date, StoreError> {
    Date::parse(value, DATE_FMT).map_err(|_| StoreError::InvalidInput("invalid stored date"))
}

/// Maps a UNIQUE/PRIMARY KEY violation to the given business conflict and
/// leaves every other SQL failure untouched.
pub(crate) fn map_insert_conflict(err: rusqlite::Error, conflict: StoreError) -> StoreError {
    if is_constraint_violation(&err) {
        return conflict;
    }
    StoreError::Sql(err)
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                || message.as_deref().is_some_and(|value| {
                    value.contains("UNIQUE constraint failed")
                        || value.contains("PRIMARY KEY constraint failed")
                })
        }
        _ => false,
    }
}

pub(crate) fn week_get_tx(tx: &Transaction<'_>, week_id: &str) -> Result<WeekRow, StoreError> {
    let row = tx
        .query_row(
            "SELECT id, week_start, week_end, is_locked, locked_at_ms, created_at_ms \
             FROM weeks WHERE id=?1",
            params![week_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, Option<i64>>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((id, week_start, week_end, is_locked, locked_at_ms, created_at_ms)) => Ok(WeekRow {
            id,
            week_start: decode_date(&week_start)?,
            week_end: decode_date(&week_end)?,
            is_locked: is_locked != 0,
            locked_at_ms,
            created_at_ms,
        }),
        None => Err(StoreError::UnknownWeek),
    }
}

/// Guard for every schedule-graph mutation: fails with `WeekLocked` inside
/// the same transaction that performs the write.
pub(crate) fn ensure_week_editable_tx(
    tx: &Transaction<'_>,
    week_id: &str,
) -> Result<(), StoreError> {
    let week = week_get_tx(tx, week_id)?;
    if week.is_locked {
        return Err(StoreError::WeekLocked);
    }
    Ok(())
}

pub(crate) fn schedule_get_tx(
    tx: &Transaction<'_>,
    schedule_id: &str,
) -> Result<ScheduleRow, StoreError> {
    schedule_row_opt_tx(tx, schedule_id)?.ok_or(StoreError::UnknownSchedule)
}

pub(crate) fn schedule_row_opt_tx(
    tx: &Transaction<'_>,
    schedule_id: &str,
) -> Result<Option<ScheduleRow>, StoreError> {
    Ok(tx
        .query_row(
            "SELECT id, store_id, week_id, is_published, created_at_ms \
             FROM schedules WHERE id=?1",
            params![schedule_id],
            map_schedule_row,
        )
        .optional()?)
}

pub(crate) fn map_schedule_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduleRow> {
    Ok(ScheduleRow {
        id: row.get(0)?,
        store_id: row.get(1)?,
        week_id: row.get(2)?,
        is_published: row.get::<_, i64>(3)? != 0,
        created_at_ms: row.get(4)?,
    })
}
