#![forbid(unsafe_code)]

use super::RosterServer;
use super::render::{assignment_json, shift_json};
use crate::support::args::{
    as_object, require_employee_id, require_instant_ms, require_string, require_u32,
};
use crate::support::envelope::{envelope_ok, store_error_envelope};
use serde_json::{Value, json};

impl RosterServer {
    pub(crate) fn action_shift_add(&mut self, args: Value) -> Value {
        let args = match as_object(&args) {
            Ok(args) => args,
            Err(resp) => return resp,
        };
        let schedule_id = match require_string(args, "schedule_id") {
            Ok(schedule_id) => schedule_id,
            Err(resp) => return resp,
        };
        let role = match require_string(args, "role") {
            Ok(role) => role,
            Err(resp) => return resp,
        };
        let start_at_ms = match require_instant_ms(args, "start_at") {
            Ok(start_at_ms) => start_at_ms,
            Err(resp) => return resp,
        };
        let end_at_ms = match require_instant_ms(args, "end_at") {
            Ok(end_at_ms) => end_at_ms,
            Err(resp) => return resp,
        };
        let headcount_required = match require_u32(args, "headcount_required") {
            Ok(headcount_required) => headcount_required,
            Err(resp) => return resp,
        };
        match self.store_mut().shift_add(
            &schedule_id,
            &role,
            start_at_ms,
            end_at_ms,
            headcount_required,
        ) {
            Ok(shift) => envelope_ok("shift_add", shift_json(&shift)),
            Err(err) => store_error_envelope(err),
        }
    }

    pub(crate) fn action_shift_assign(&mut self, args: Value) -> Value {
        let args = match as_object(&args) {
            Ok(args) => args,
            Err(resp) => return resp,
        };
        let shift_id = match require_string(args, "shift_id") {
            Ok(shift_id) => shift_id,
            Err(resp) => return resp,
        };
        let employee = match require_employee_id(args, "employee_id") {
            Ok(employee) => employee,
            Err(resp) => return resp,
        };
        match self.store_mut().assignment_add(&shift_id, &employee) {
            Ok(assignment) => envelope_ok("shift_assign", assignment_json(&assignment)),
            Err(err) => store_error_envelope(err),
        }
    }

    pub(crate) fn action_shift_unassign(&mut self, args: Value) -> Value {
        let args = match as_object(&args) {
            Ok(args) => args,
            Err(resp) => return resp,
        };
        let assignment_id = match require_string(args, "assignment_id") {
            Ok(assignment_id) => assignment_id,
            Err(resp) => return resp,
        };
        match self.store_mut().assignment_remove(&assignment_id) {
            Ok(()) => envelope_ok("shift_unassign", json!({ "removed": true })),
            Err(err) => store_error_envelope(err),
        }
    }
}
