#![forbid(unsafe_code)]

use super::RosterServer;
use super::render::week_json;
use crate::support::args::{as_object, require_date, require_string};
use crate::support::envelope::{envelope_ok, store_error_envelope};
use crate::support::time::today_utc;
use rd_core::calendar::week_start_for;
use serde_json::Value;

impl RosterServer {
    /// The week containing today (UTC), created on first sight.
    pub(crate) fn action_week_current(&mut self, _args: Value) -> Value {
        let week_start = week_start_for(today_utc());
        match self.store_mut().week_get_or_create(week_start) {
            Ok(week) => envelope_ok("week_current", week_json(&week)),
            Err(err) => store_error_envelope(err),
        }
    }

    pub(crate) fn action_week_get_or_create(&mut self, args: Value) -> Value {
        let args = match as_object(&args) {
            Ok(args) => args,
            Err(resp) => return resp,
        };
        let week_start = match require_date(args, "week_start") {
            Ok(week_start) => week_start,
            Err(resp) => return resp,
        };
        match self.store_mut().week_get_or_create(week_start) {
            Ok(week) => envelope_ok("week_get_or_create", week_json(&week)),
            Err(err) => store_error_envelope(err),
        }
    }

    pub(crate) fn action_week_lock(&mut self, args: Value) -> Value {
        self.week_toggle(args, true)
    }

    pub(crate) fn action_week_unlock(&mut self, args: Value) -> Value {
        self.week_toggle(args, false)
    }

    fn week_toggle(&mut self, args: Value, lock: bool) -> Value {
        let args = match as_object(&args) {
            Ok(args) => args,
            Err(resp) => return resp,
        };
        let week_id = match require_string(args, "week_id") {
            Ok(week_id) => week_id,
            Err(resp) => return resp,
        };
        let (action, outcome) = if lock {
            ("week_lock", self.store_mut().week_lock(&week_id))
        } else {
            ("week_unlock", self.store_mut().week_unlock(&week_id))
        };
        match outcome {
            Ok(week) => envelope_ok(action, week_json(&week)),
            Err(err) => store_error_envelope(err),
        }
    }
}
