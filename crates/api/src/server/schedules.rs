#![forbid(unsafe_code)]

use super::RosterServer;
use super::render::{schedule_detail_json, schedule_json};
use crate::support::args::{as_object, require_bool, require_store_id, require_string};
use crate::support::envelope::{envelope_ok, store_error_envelope};
use serde_json::Value;

impl RosterServer {
    pub(crate) fn action_schedule_get_or_create(&mut self, args: Value) -> Value {
        let args = match as_object(&args) {
            Ok(args) => args,
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
        match self.store_mut().schedule_get_or_create(&store_id, &week_id) {
            Ok(schedule) => envelope_ok("schedule_get_or_create", schedule_json(&schedule)),
            Err(err) => store_error_envelope(err),
        }
    }

    pub(crate) fn action_schedule_get(&mut self, args: Value) -> Value {
        let args = match as_object(&args) {
            Ok(args) => args,
            Err(resp) => return resp,
        };
        let schedule_id = match require_string(args, "schedule_id") {
            Ok(schedule_id) => schedule_id,
            Err(resp) => return resp,
        };
        match self.store_mut().schedule_get(&schedule_id) {
            Ok(detail) => envelope_ok("schedule_get", schedule_detail_json(&detail)),
            Err(err) => store_error_envelope(err),
        }
    }

    pub(crate) fn action_schedule_set_published(&mut self, args: Value) -> Value {
        let args = match as_object(&args) {
            Ok(args) => args,
            Err(resp) => return resp,
        };
        let schedule_id = match require_string(args, "schedule_id") {
            Ok(schedule_id) => schedule_id,
            Err(resp) => return resp,
        };
        let is_published = match require_bool(args, "is_published") {
            Ok(is_published) => is_published,
            Err(resp) => return resp,
        };
        match self
            .store_mut()
            .schedule_set_published(&schedule_id, is_published)
        {
            Ok(schedule) => envelope_ok("schedule_set_published", schedule_json(&schedule)),
            Err(err) => store_error_envelope(err),
        }
    }
}
