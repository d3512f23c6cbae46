#![forbid(unsafe_code)]

use rd_storage::StoreError;
use serde_json::{Value, json};

pub fn envelope_ok(action: &str, result: Value) -> Value {
    json!({
        "ok": true,
        "action": action,
        "result": result
    })
}

pub fn envelope_error(code: &str, message: &str) -> Value {
    json!({
        "ok": false,
        "error": {
            "code": code,
            "message": message.trim()
        }
    })
}

pub(crate) fn store_error_envelope(err: StoreError) -> Value {
    let (code, message) = match err {
        StoreError::Io(e) => ("STORAGE", format!("IO: {e}")),
        StoreError::Sql(e) => ("STORAGE", format!("SQL: {e}")),
        StoreError::InvalidInput(msg) => ("INVALID_INPUT", msg.to_string()),
        StoreError::InvalidInterval => {
            ("INVALID_INTERVAL", "end must be after start".to_string())
        }
        StoreError::WeekLocked => ("WEEK_LOCKED", "week is locked".to_string()),
        StoreError::SchedulePublished => {
            ("SCHEDULE_PUBLISHED", "schedule is published".to_string())
        }
        StoreError::DuplicateAssignment => (
            "DUPLICATE_ASSIGNMENT",
            "employee already assigned to this shift".to_string(),
        ),
        StoreError::ShiftFull => ("SHIFT_FULL", "shift has no open slots".to_string()),
        StoreError::UnknownWeek => ("UNKNOWN_WEEK", "unknown week".to_string()),
        StoreError::UnknownSchedule => ("UNKNOWN_SCHEDULE", "unknown schedule".to_string()),
        StoreError::UnknownShift => ("UNKNOWN_SHIFT", "unknown shift".to_string()),
        StoreError::UnknownAssignment => {
            ("UNKNOWN_ASSIGNMENT", "unknown assignment".to_string())
        }
    };
    envelope_error(code, &message)
}
