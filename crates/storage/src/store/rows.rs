#![forbid(unsafe_code)]

use time::Date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeekRow {
    pub id: String,
    /// Always the anchor weekday (Friday).
    pub week_start: Date,
    /// Always `week_start + 6` (Thursday).
    pub week_end: Date,
    pub is_locked: bool,
    pub locked_at_ms: Option<i64>,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleRow {
    pub id: String,
    pub store_id: String,
    pub week_id: String,
    pub is_published: bool,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftRow {
    pub id: String,
    pub schedule_id: String,
    pub role: String,
    pub start_at_ms: i64,
    pub end_at_ms: i64,
    pub headcount_required: u32,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignmentRow {
    pub id: String,
    pub shift_id: String,
    pub employee_id: String,
    pub assigned_at_ms: i64,
}

/// A schedule with its shift graph, shifts in creation order.
#[derive(Clone, Debug)]
pub struct ScheduleDetail {
    pub schedule: ScheduleRow,
    pub shifts: Vec<ShiftWithAssignments>,
}

#[derive(Clone, Debug)]
pub struct ShiftWithAssignments {
    pub shift: ShiftRow,
    pub assignments: Vec<AssignmentRow>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MembershipRow {
    pub id: String,
    pub store_id: String,
    pub employee_id: String,
    pub store_role: String,
    pub is_active: bool,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityRow {
    pub id: String,
    pub employee_id: String,
    pub store_id: String,
    pub week_id: String,
    pub day: Date,
    pub available_start_at_ms: Option<i64>,
    pub available_end_at_ms: Option<i64>,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaveRequestRow {
    pub id: String,
    pub employee_id: String,
    pub store_id: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: String,
    pub created_at_ms: i64,
}
