#![forbid(unsafe_code)]

use super::RosterServer;
use super::render::{availability_json, leave_request_json, membership_json};
use crate::support::args::{
    as_object, optional_bool, optional_instant_ms, optional_string, require_date,
    require_employee_id, require_store_id, require_string,
};
use crate::support::envelope::{envelope_ok, store_error_envelope};
use rd_storage::{LEAVE_PENDING, ROLE_EMPLOYEE};
use serde_json::Value;

impl RosterServer {
    pub(crate) fn action_membership_upsert(&mut self, args: Value) -> Value {
        let args = match as_object(&args) {
            Ok(args) => args,
            Err(resp) => return resp,
        };
        let store_id = match require_store_id(args, "store_id") {
            Ok(store_id) => store_id,
            Err(resp) => return resp,
        };
        let employee = match require_employee_id(args, "employee_id") {
            Ok(employee) => employee,
            Err(resp) => return resp,
        };
        let store_role = match optional_string(args, "store_role") {
            Ok(store_role) => store_role.unwrap_or_else(|| ROLE_EMPLOYEE.to_string()),
            Err(resp) => return resp,
        };
        let is_active = match optional_bool(args, "is_active") {
            Ok(is_active) => is_active.unwrap_or(true),
            Err(resp) => return resp,
        };
        match self
            .store_mut()
            .membership_upsert(&store_id, &employee, &store_role, is_active)
        {
            Ok(membership) => envelope_ok("membership_upsert", membership_json(&membership)),
            Err(err) => store_error_envelope(err),
        }
    }

    pub(crate) fn action_availability_put(&mut self, args: Value) -> Value {
        let args = match as_object(&args) {
            Ok(args) => args,
            Err(resp) => return resp,
        };
        let employee = match require_employee_id(args, "employee_id") {
            Ok(employee) => employee,
            Err(resp) => return resp,
        };
        let store_id = match require_store_id(args, "store_id") {
            Ok(store_id) => store_id,
            Err(resp) => return resp,
        };
        let week_id = match require_string(args, "week_id") {
            Ok(week_id) => week_id,
            Err(resp) => return resp,
        };
        let day = match require_date(args, "day") {
            Ok(day) => day,
            Err(resp) => return resp,
        };
        let available_start_at_ms = match optional_instant_ms(args, "available_start_at") {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        let available_end_at_ms = match optional_instant_ms(args, "available_end_at") {
            Ok(v) => v,
            Err(resp) => return resp,
        };
        match self.store_mut().availability_put(
            &employee,
            &store_id,
            &week_id,
            day,
            available_start_at_ms,
            available_end_at_ms,
        ) {
            Ok(availability) => envelope_ok("availability_put", availability_json(&availability)),
            Err(err) => store_error_envelope(err),
        }
    }

    pub(crate) fn action_leave_request_put(&mut self, args: Value) -> Value {
        let args = match as_object(&args) {
            Ok(args) => args,
            Err(resp) => return resp,
        };
        let employee = match require_employee_id(args, "employee_id") {
            Ok(employee) => employee,
            Err(resp) => return resp,
        };
        let store_id = match require_store_id(args, "store_id") {
            Ok(store_id) => store_id,
            Err(resp) => return resp,
        };
        let start_date = match require_date(args, "start_date") {
            Ok(start_date) => start_date,
            Err(resp) => return resp,
        };
        let end_date = match require_date(args, "end_date") {
            Ok(end_date) => end_date,
            Err(resp) => return resp,
        };
        let status = match optional_string(args, "status") {
            Ok(status) => status.unwrap_or_else(|| LEAVE_PENDING.to_string()),
            Err(resp) => return resp,
        };
        match self
            .store_mut()
            .leave_request_add(&employee, &store_id, start_date, end_date, &status)
        {
            Ok(leave) => envelope_ok("leave_request_put", leave_request_json(&leave)),
            Err(err) => store_error_envelope(err),
        }
    }
}
