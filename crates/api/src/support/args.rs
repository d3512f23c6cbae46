#![forbid(unsafe_code)]

//! Argument extraction for action payloads. Every helper returns the ready
//! error envelope on the `Err` side so handlers can bail with `?`-free
//! early returns.

use super::envelope::envelope_error;
use super::time::{parse_date, parse_rfc3339_ms};
use rd_core::ids::{EmployeeId, StoreId};
use serde_json::Value;
use time::Date;

pub(crate) fn require_string(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<String, Value> {
    let Some(v) = args.get(key).and_then(|v| v.as_str()) else {
        return Err(envelope_error("INVALID_INPUT", &format!("{key} is required")));
    };
    Ok(v.to_string())
}

pub(crate) fn optional_string(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<String>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::String(v) => Ok(Some(v.to_string())),
        _ => Err(envelope_error(
            "INVALID_INPUT",
            &format!("{key} must be a string"),
        )),
    }
}

pub(crate) fn optional_bool(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<bool>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Bool(v) => Ok(Some(*v)),
        _ => Err(envelope_error(
            "INVALID_INPUT",
            &format!("{key} must be a boolean"),
        )),
    }
}

pub(crate) fn require_bool(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<bool, Value> {
    optional_bool(args, key)?
        .ok_or_else(|| envelope_error("INVALID_INPUT", &format!("{key} is required")))
}

pub(crate) fn optional_u32(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<u32>, Value> {
    let Some(value) = args.get(key) else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| {
                envelope_error(
                    "INVALID_INPUT",
                    &format!("{key} must be a positive integer"),
                )
            }),
        _ => Err(envelope_error(
            "INVALID_INPUT",
            &format!("{key} must be a positive integer"),
        )),
    }
}

pub(crate) fn require_u32(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<u32, Value> {
    optional_u32(args, key)?
        .ok_or_else(|| envelope_error("INVALID_INPUT", &format!("{key} is required")))
}

/// Instants arrive as RFC 3339 strings and are stored as unix milliseconds.
pub(crate) fn require_instant_ms(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<i64, Value> {
    let raw = require_string(args, key)?;
    parse_rfc3339_ms(&raw).ok_or_else(|| {
        envelope_error(
            "INVALID_INPUT",
            &format!("{key} must be an RFC 3339 timestamp"),
        )
    })
}

pub(crate) fn optional_instant_ms(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<i64>, Value> {
    let Some(raw) = optional_string(args, key)? else {
        return Ok(None);
    };
    parse_rfc3339_ms(&raw).map(Some).ok_or_else(|| {
        envelope_error(
            "INVALID_INPUT",
            &format!("{key} must be an RFC 3339 timestamp"),
        )
    })
}

pub(crate) fn require_date(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Date, Value> {
    let raw = require_string(args, key)?;
    parse_date(&raw).ok_or_else(|| {
        envelope_error(
            "INVALID_INPUT",
            &format!("{key} must be a YYYY-MM-DD date"),
        )
    })
}

pub(crate) fn require_store_id(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<StoreId, Value> {
    let raw = require_string(args, key)?;
    StoreId::try_new(&raw)
        .map_err(|e| envelope_error("INVALID_INPUT", &format!("{key}: {e}")))
}

pub(crate) fn require_employee_id(
    args: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<EmployeeId, Value> {
    let raw = require_string(args, key)?;
    EmployeeId::try_new(&raw)
        .map_err(|e| envelope_error("INVALID_INPUT", &format!("{key}: {e}")))
}

pub(crate) fn as_object(args: &Value) -> Result<&serde_json::Map<String, Value>, Value> {
    args.as_object()
        .ok_or_else(|| envelope_error("INVALID_INPUT", "args must be an object"))
}
