#![forbid(unsafe_code)]

//! Row-to-JSON rendering. Instants go out as RFC 3339, dates as ISO 8601,
//! raw millisecond values are not exposed.

use crate::support::time::{format_date, ts_ms_to_rfc3339};
use rd_storage::{
    AssignmentRow, AvailabilityRow, LeaveRequestRow, MembershipRow, ScheduleDetail, ScheduleRow,
    ShiftRow, ShiftWithAssignments, WeekRow,
};
use serde_json::{Value, json};

pub(crate) fn week_json(week: &WeekRow) -> Value {
    json!({
        "week_id": week.id,
        "week_start": format_date(week.week_start),
        "week_end": format_date(week.week_end),
        "is_locked": week.is_locked,
        "locked_at": week.locked_at_ms.map(ts_ms_to_rfc3339),
        "created_at": ts_ms_to_rfc3339(week.created_at_ms),
    })
}

pub(crate) fn schedule_json(schedule: &ScheduleRow) -> Value {
    json!({
        "schedule_id": schedule.id,
        "store_id": schedule.store_id,
        "week_id": schedule.week_id,
        "is_published": schedule.is_published,
        "created_at": ts_ms_to_rfc3339(schedule.created_at_ms),
    })
}

pub(crate) fn shift_json(shift: &ShiftRow) -> Value {
    json!({
        "shift_id": shift.id,
        "schedule_id": shift.schedule_id,
        "role": shift.role,
        "start_at": ts_ms_to_rfc3339(shift.start_at_ms),
        "end_at": ts_ms_to_rfc3339(shift.end_at_ms),
        "headcount_required": shift.headcount_required,
        "created_at": ts_ms_to_rfc3339(shift.created_at_ms),
    })
}

pub(crate) fn assignment_json(assignment: &AssignmentRow) -> Value {
    json!({
        "assignment_id": assignment.id,
        "shift_id": assignment.shift_id,
        "employee_id": assignment.employee_id,
        "assigned_at": ts_ms_to_rfc3339(assignment.assigned_at_ms),
    })
}

pub(crate) fn schedule_detail_json(detail: &ScheduleDetail) -> Value {
    let mut schedule = schedule_json(&detail.schedule);
    if let Some(map) = schedule.as_object_mut() {
        map.insert(
            "shifts".to_string(),
            Value::Array(detail.shifts.iter().map(shift_with_assignments_json).collect()),
        );
    }
    schedule
}

fn shift_with_assignments_json(entry: &ShiftWithAssignments) -> Value {
    let mut shift = shift_json(&entry.shift);
    if let Some(map) = shift.as_object_mut() {
        map.insert(
            "assignments".to_string(),
            Value::Array(entry.assignments.iter().map(assignment_json).collect()),
        );
    }
    shift
}

pub(crate) fn membership_json(membership: &MembershipRow) -> Value {
    json!({
        "membership_id": membership.id,
        "store_id": membership.store_id,
        "employee_id": membership.employee_id,
        "store_role": membership.store_role,
        "is_active": membership.is_active,
        "created_at": ts_ms_to_rfc3339(membership.created_at_ms),
    })
}

pub(crate) fn availability_json(availability: &AvailabilityRow) -> Value {
    json!({
        "availability_id": availability.id,
        "employee_id": availability.employee_id,
        "store_id": availability.store_id,
        "week_id": availability.week_id,
        "day": format_date(availability.day),
        "available_start_at": availability.available_start_at_ms.map(ts_ms_to_rfc3339),
        "available_end_at": availability.available_end_at_ms.map(ts_ms_to_rfc3339),
        "created_at": ts_ms_to_rfc3339(availability.created_at_ms),
    })
}

pub(crate) fn leave_request_json(leave: &LeaveRequestRow) -> Value {
    json!({
        "leave_request_id": leave.id,
        "employee_id": leave.employee_id,
        "store_id": leave.store_id,
        "start_date": format_date(leave.start_date),
        "end_date": format_date(leave.end_date),
        "status": leave.status,
        "created_at": ts_ms_to_rfc3339(leave.created_at_ms),
    })
}
