#![forbid(unsafe_code)]

use crate::RosterServer;
use serde_json::{Value, json};

macro_rules! define_roster_dispatch {
    ($($action_name:literal => $method:ident),* $(,)?) => {
        /// Routes one action to its handler; `None` means the action name is
        /// unknown.
        pub fn dispatch_action(
            server: &mut RosterServer,
            name: &str,
            args: Value,
        ) -> Option<Value> {
            let resp = match name {
                $($action_name => server.$method(args),)*
                _ => return None,
            };
            Some(resp)
        }

        #[cfg(test)]
        pub(crate) fn dispatch_action_names() -> &'static [&'static str] {
            &[$($action_name),*]
        }
    };
}

define_roster_dispatch! {
    "week_current" => action_week_current,
    "week_get_or_create" => action_week_get_or_create,
    "week_lock" => action_week_lock,
    "week_unlock" => action_week_unlock,
    "schedule_get_or_create" => action_schedule_get_or_create,
    "schedule_get" => action_schedule_get,
    "schedule_set_published" => action_schedule_set_published,
    "shift_add" => action_shift_add,
    "shift_assign" => action_shift_assign,
    "shift_unassign" => action_shift_unassign,
    "membership_upsert" => action_membership_upsert,
    "availability_put" => action_availability_put,
    "leave_request_put" => action_leave_request_put,
    "gap_fill" => action_gap_fill,
}

/// One definition object per action, sorted by name. The shape mirrors what
/// tool-calling clients expect: a name, a description, and a JSON schema for
/// the args object.
pub fn action_definitions() -> Vec<Value> {
    let mut definitions = vec![
        definition(
            "week_current",
            "Get or create the week containing today (UTC).",
            json!({}),
            &[],
        ),
        definition(
            "week_get_or_create",
            "Get or create the week starting on the given Friday.",
            json!({ "week_start": { "type": "string", "format": "date" } }),
            &["week_start"],
        ),
        definition(
            "week_lock",
            "Lock a week against schedule edits.",
            json!({ "week_id": { "type": "string" } }),
            &["week_id"],
        ),
        definition(
            "week_unlock",
            "Unlock a previously locked week.",
            json!({ "week_id": { "type": "string" } }),
            &["week_id"],
        ),
        definition(
            "schedule_get_or_create",
            "Get or create the schedule for a store and week.",
            json!({
                "store_id": { "type": "string" },
                "week_id": { "type": "string" }
            }),
            &["store_id", "week_id"],
        ),
        definition(
            "schedule_get",
            "Get a schedule with its shifts and assignments.",
            json!({ "schedule_id": { "type": "string" } }),
            &["schedule_id"],
        ),
        definition(
            "schedule_set_published",
            "Publish or unpublish a schedule.",
            json!({
                "schedule_id": { "type": "string" },
                "is_published": { "type": "boolean" }
            }),
            &["schedule_id", "is_published"],
        ),
        definition(
            "shift_add",
            "Add a shift to a schedule.",
            json!({
                "schedule_id": { "type": "string" },
                "role": { "type": "string" },
                "start_at": { "type": "string", "format": "date-time" },
                "end_at": { "type": "string", "format": "date-time" },
                "headcount_required": { "type": "integer", "minimum": 1 }
            }),
            &["schedule_id", "role", "start_at", "end_at", "headcount_required"],
        ),
        definition(
            "shift_assign",
            "Assign an employee to a shift slot.",
            json!({
                "shift_id": { "type": "string" },
                "employee_id": { "type": "string" }
            }),
            &["shift_id", "employee_id"],
        ),
        definition(
            "shift_unassign",
            "Remove an assignment from its shift.",
            json!({ "assignment_id": { "type": "string" } }),
            &["assignment_id"],
        ),
        definition(
            "membership_upsert",
            "Create or update a store membership.",
            json!({
                "store_id": { "type": "string" },
                "employee_id": { "type": "string" },
                "store_role": { "type": "string", "enum": ["employee", "manager"] },
                "is_active": { "type": "boolean" }
            }),
            &["store_id", "employee_id"],
        ),
        definition(
            "availability_put",
            "Set an employee's availability window for one day of a week.",
            json!({
                "employee_id": { "type": "string" },
                "store_id": { "type": "string" },
                "week_id": { "type": "string" },
                "day": { "type": "string", "format": "date" },
                "available_start_at": { "type": "string", "format": "date-time" },
                "available_end_at": { "type": "string", "format": "date-time" }
            }),
            &["employee_id", "store_id", "week_id", "day"],
        ),
        definition(
            "leave_request_put",
            "Record a leave request for an employee.",
            json!({
                "employee_id": { "type": "string" },
                "store_id": { "type": "string" },
                "start_date": { "type": "string", "format": "date" },
                "end_date": { "type": "string", "format": "date" },
                "status": { "type": "string", "enum": ["pending", "approved", "rejected"] }
            }),
            &["employee_id", "store_id", "start_date", "end_date"],
        ),
        definition(
            "gap_fill",
            "Suggest employees for understaffed shifts of a store's week.",
            json!({
                "store_id": { "type": "string" },
                "week_id": { "type": "string" },
                "role": { "type": "string" },
                "max_per_shift": { "type": "integer", "minimum": 1, "maximum": 10 },
                "use_advisor": { "type": "boolean" }
            }),
            &["store_id", "week_id"],
        ),
    ];
    definitions.sort_by_key(|def| {
        def.get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    });
    definitions
}

fn definition(name: &str, description: &str, properties: Value, required: &[&str]) -> Value {
    json!({
        "name": name,
        "description": description,
        "inputSchema": {
            "type": "object",
            "properties": properties,
            "required": required
        }
    })
}
