#![forbid(unsafe_code)]

//! Gap-fill matching: given a loaded snapshot of one store-week, compute the
//! unmet headcount per shift and rank the employees eligible to fill it.
//!
//! The pass is read-only and best-effort. Each gapped shift is evaluated
//! independently in schedule order; there is no backtracking across shifts.
//! Availability is strict opt-in: an employee with no usable window for the
//! week is never suggested, no matter how unconstrained they otherwise are.

use std::collections::{HashMap, HashSet};

use time::Date;

use crate::calendar::date_at_ms;
use crate::interval::TimeRange;

#[derive(Clone, Debug)]
pub struct ShiftSnapshot {
    pub shift_id: String,
    pub role: String,
    pub window: TimeRange,
    pub headcount_required: u32,
    /// Employee ids currently assigned, in assignment order.
    pub assigned: Vec<String>,
}

impl ShiftSnapshot {
    pub fn needed_slots(&self) -> u32 {
        let assigned = u32::try_from(self.assigned.len()).unwrap_or(u32::MAX);
        self.headcount_required.saturating_sub(assigned)
    }
}

#[derive(Clone, Debug)]
pub struct ScheduleSnapshot {
    pub schedule_id: String,
    pub is_published: bool,
    pub shifts: Vec<ShiftSnapshot>,
}

/// One availability row as submitted; the window may be absent or inverted,
/// in which case the matcher ignores the row.
#[derive(Clone, Debug)]
pub struct AvailabilityRow {
    pub employee_id: String,
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
}

/// An approved leave span, inclusive on both dates.
#[derive(Clone, Debug)]
pub struct LeaveSpan {
    pub employee_id: String,
    pub start_date: Date,
    pub end_date: Date,
}

/// Everything the matcher reads, loaded in one logical pass.
#[derive(Clone, Debug)]
pub struct GapFillSnapshot {
    pub week_start: Date,
    pub week_end: Date,
    pub schedule: Option<ScheduleSnapshot>,
    /// Active employee-role members of the store, in membership order.
    /// This order is the ranking tie-break.
    pub roster: Vec<String>,
    pub availability: Vec<AvailabilityRow>,
    pub leave: Vec<LeaveSpan>,
}

#[derive(Clone, Debug)]
pub struct GapFillParams {
    /// Case-insensitive role filter; blank means no filter.
    pub role_filter: Option<String>,
    /// Cap on suggested employees per shift.
    pub max_per_shift: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftSuggestion {
    pub shift_id: String,
    pub needed_slots: u32,
    /// Eligible employees, best first.
    pub candidates: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct GapFillOutcome {
    pub suggestions: Vec<ShiftSuggestion>,
    pub note: String,
}

impl GapFillOutcome {
    fn empty(note: &str) -> Self {
        Self {
            suggestions: Vec::new(),
            note: note.to_string(),
        }
    }
}

const NOTE_NO_SCHEDULE: &str =
    "No schedule exists yet for this store and week. Create it first, then rerun gap-fill.";
const NOTE_FULLY_STAFFED: &str = "No gaps found. Every shift is fully staffed.";
const NOTE_NO_EMPLOYEES: &str = "No active employees are assigned to this store.";
const NOTE_NO_AVAILABILITY: &str =
    "No employees have submitted availability for this store and week.";
const NOTE_RULES: &str = "Strict availability: employees without submitted windows are excluded. \
     Filters: approved leave, full window coverage, no overlapping assignment; \
     ranked by fewest existing assignments.";

pub fn build_suggestions(snapshot: &GapFillSnapshot, params: &GapFillParams) -> GapFillOutcome {
    let Some(schedule) = snapshot.schedule.as_ref() else {
        return GapFillOutcome::empty(NOTE_NO_SCHEDULE);
    };

    let role_filter = params
        .role_filter
        .as_deref()
        .map(|role| role.trim().to_ascii_lowercase())
        .filter(|role| !role.is_empty());

    let selected: Vec<&ShiftSnapshot> = schedule
        .shifts
        .iter()
        .filter(|shift| match role_filter.as_deref() {
            Some(filter) => shift.role.trim().to_ascii_lowercase() == filter,
            None => true,
        })
        .collect();

    if !selected.iter().any(|shift| shift.needed_slots() > 0) {
        return GapFillOutcome::empty(NOTE_FULLY_STAFFED);
    }

    if snapshot.roster.is_empty() {
        return GapFillOutcome::empty(NOTE_NO_EMPLOYEES);
    }

    let availability = usable_windows(&snapshot.availability);
    if availability.is_empty() {
        return GapFillOutcome::empty(NOTE_NO_AVAILABILITY);
    }

    // Pool keeps roster order; only employees with at least one usable window
    // survive.
    let pool: Vec<&str> = snapshot
        .roster
        .iter()
        .map(String::as_str)
        .filter(|employee| availability.contains_key(employee))
        .collect();
    if pool.is_empty() {
        return GapFillOutcome::empty(NOTE_NO_AVAILABILITY);
    }

    let leave = leave_by_employee(&snapshot.leave);

    // Existing commitments span every shift of the schedule, including shifts
    // excluded by the role filter: a cashier shift still double-books against
    // a cook shift at the same hour.
    let mut commitments: HashMap<&str, Vec<TimeRange>> = HashMap::new();
    for shift in &schedule.shifts {
        for employee in &shift.assigned {
            commitments
                .entry(employee.as_str())
                .or_default()
                .push(shift.window);
        }
    }

    let mut suggestions = Vec::new();
    for shift in &selected {
        let needed = shift.needed_slots();
        if needed == 0 {
            continue;
        }

        let mut candidates: Vec<&str> = pool
            .iter()
            .copied()
            .filter(|employee| {
                !on_approved_leave(&leave, employee, shift.window)
                    && covers_shift(&availability, employee, shift.window)
                    && !has_conflict(&commitments, employee, shift.window)
            })
            .collect();

        candidates.sort_by_key(|employee| {
            commitments.get(employee).map_or(0, Vec::len)
        });
        candidates.truncate(params.max_per_shift);

        suggestions.push(ShiftSuggestion {
            shift_id: shift.shift_id.clone(),
            needed_slots: needed,
            candidates: candidates.into_iter().map(str::to_string).collect(),
        });
    }

    GapFillOutcome {
        suggestions,
        note: NOTE_RULES.to_string(),
    }
}

/// Validates an advisor-proposed ordering against the locally ranked set.
///
/// Accepted only when non-empty, free of duplicates, and drawn entirely from
/// `local` (a permutation of a subset). Anything else rejects the whole
/// response; the caller keeps the local ranking.
pub fn apply_advisor_order(local: &[String], advised: &[String]) -> Option<Vec<String>> {
    if advised.is_empty() {
        return None;
    }
    let known: HashSet<&str> = local.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    for id in advised {
        if !known.contains(id.as_str()) || !seen.insert(id.as_str()) {
            return None;
        }
    }
    Some(advised.to_vec())
}

fn usable_windows(rows: &[AvailabilityRow]) -> HashMap<&str, Vec<TimeRange>> {
    let mut map: HashMap<&str, Vec<TimeRange>> = HashMap::new();
    for row in rows {
        let (Some(start_ms), Some(end_ms)) = (row.start_ms, row.end_ms) else {
            continue;
        };
        let Some(window) = TimeRange::new(start_ms, end_ms) else {
            continue;
        };
        map.entry(row.employee_id.as_str()).or_default().push(window);
    }
    map
}

fn leave_by_employee(spans: &[LeaveSpan]) -> HashMap<&str, Vec<(Date, Date)>> {
    let mut map: HashMap<&str, Vec<(Date, Date)>> = HashMap::new();
    for span in spans {
        map.entry(span.employee_id.as_str())
            .or_default()
            .push((span.start_date, span.end_date));
    }
    map
}

/// Leave blocks a shift when a span covers the shift's start date or its end
/// date (inclusive day spans against UTC shift days).
fn on_approved_leave(
    leave: &HashMap<&str, Vec<(Date, Date)>>,
    employee: &str,
    shift: TimeRange,
) -> bool {
    let Some(spans) = leave.get(employee) else {
        return false;
    };
    let first_day = date_at_ms(shift.start_ms());
    let last_day = date_at_ms(shift.end_ms());
    spans.iter().any(|&(start, end)| {
        (start <= first_day && first_day <= end) || (start <= last_day && last_day <= end)
    })
}

fn covers_shift(
    availability: &HashMap<&str, Vec<TimeRange>>,
    employee: &str,
    shift: TimeRange,
) -> bool {
    availability
        .get(employee)
        .is_some_and(|windows| windows.iter().any(|window| window.contains(shift)))
}

fn has_conflict(
    commitments: &HashMap<&str, Vec<TimeRange>>,
    employee: &str,
    shift: TimeRange,
) -> bool {
    commitments
        .get(employee)
        .is_some_and(|ranges| ranges.iter().any(|range| range.overlaps(shift)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const HOUR_MS: i64 = 3_600_000;
    // 2024-03-01T00:00:00Z, a Friday.
    const WEEK_MS: i64 = 1_709_251_200_000;

    fn hour(h: i64) -> i64 {
        WEEK_MS + h * HOUR_MS
    }

    fn shift(id: &str, role: &str, start_h: i64, end_h: i64, headcount: u32) -> ShiftSnapshot {
        ShiftSnapshot {
            shift_id: id.to_string(),
            role: role.to_string(),
            window: TimeRange::new(hour(start_h), hour(end_h)).expect("shift window"),
            headcount_required: headcount,
            assigned: Vec::new(),
        }
    }

    fn all_day(employee: &str, day_offset: i64) -> AvailabilityRow {
        AvailabilityRow {
            employee_id: employee.to_string(),
            start_ms: Some(hour(day_offset * 24)),
            end_ms: Some(hour(day_offset * 24 + 24)),
        }
    }

    fn snapshot(
        shifts: Vec<ShiftSnapshot>,
        roster: &[&str],
        availability: Vec<AvailabilityRow>,
        leave: Vec<LeaveSpan>,
    ) -> GapFillSnapshot {
        GapFillSnapshot {
            week_start: date!(2024 - 03 - 01),
            week_end: date!(2024 - 03 - 07),
            schedule: Some(ScheduleSnapshot {
                schedule_id: "sched-1".to_string(),
                is_published: false,
                shifts,
            }),
            roster: roster.iter().map(|s| s.to_string()).collect(),
            availability,
            leave,
        }
    }

    fn params() -> GapFillParams {
        GapFillParams {
            role_filter: None,
            max_per_shift: 3,
        }
    }

    #[test]
    fn missing_schedule_is_a_note_not_an_error() {
        let snap = GapFillSnapshot {
            week_start: date!(2024 - 03 - 01),
            week_end: date!(2024 - 03 - 07),
            schedule: None,
            roster: vec!["e1".to_string()],
            availability: vec![all_day("e1", 0)],
            leave: Vec::new(),
        };
        let out = build_suggestions(&snap, &params());
        assert!(out.suggestions.is_empty());
        assert_eq!(out.note, NOTE_NO_SCHEDULE);
    }

    #[test]
    fn fully_staffed_schedule_yields_no_suggestions() {
        let mut sh = shift("s1", "cook", 9, 17, 1);
        sh.assigned.push("e1".to_string());
        let out = build_suggestions(
            &snapshot(vec![sh], &["e1", "e2"], vec![all_day("e2", 0)], Vec::new()),
            &params(),
        );
        assert!(out.suggestions.is_empty());
        assert_eq!(out.note, NOTE_FULLY_STAFFED);
    }

    #[test]
    fn empty_roster_and_empty_availability_have_distinct_notes() {
        let gapped = shift("s1", "cook", 9, 17, 1);
        let out = build_suggestions(
            &snapshot(vec![gapped.clone()], &[], Vec::new(), Vec::new()),
            &params(),
        );
        assert_eq!(out.note, NOTE_NO_EMPLOYEES);

        let out = build_suggestions(
            &snapshot(vec![gapped], &["e1"], Vec::new(), Vec::new()),
            &params(),
        );
        assert_eq!(out.note, NOTE_NO_AVAILABILITY);
    }

    #[test]
    fn leave_availability_and_coverage_filter_to_the_single_eligible_candidate() {
        // cashier shift 09:00-17:00 needing 2; e1 on leave that day, e2's
        // window stops at 16:00, e3 covers the whole shift.
        let gapped = shift("s1", "cashier", 9, 17, 2);
        let availability = vec![
            all_day("e1", 0),
            AvailabilityRow {
                employee_id: "e2".to_string(),
                start_ms: Some(hour(8)),
                end_ms: Some(hour(16)),
            },
            all_day("e3", 0),
        ];
        let leave = vec![LeaveSpan {
            employee_id: "e1".to_string(),
            start_date: date!(2024 - 03 - 01),
            end_date: date!(2024 - 03 - 02),
        }];
        let out = build_suggestions(
            &snapshot(vec![gapped], &["e1", "e2", "e3"], availability, leave),
            &params(),
        );
        assert_eq!(out.suggestions.len(), 1);
        assert_eq!(out.suggestions[0].needed_slots, 2);
        assert_eq!(out.suggestions[0].candidates, vec!["e3".to_string()]);
    }

    #[test]
    fn employee_without_availability_rows_is_never_suggested() {
        let gapped = shift("s1", "cook", 9, 17, 1);
        let out = build_suggestions(
            &snapshot(vec![gapped], &["e1", "e2"], vec![all_day("e2", 0)], Vec::new()),
            &params(),
        );
        assert_eq!(out.suggestions[0].candidates, vec!["e2".to_string()]);
    }

    #[test]
    fn inverted_availability_window_is_ignored() {
        let gapped = shift("s1", "cook", 9, 17, 1);
        let inverted = AvailabilityRow {
            employee_id: "e1".to_string(),
            start_ms: Some(hour(17)),
            end_ms: Some(hour(9)),
        };
        let out = build_suggestions(
            &snapshot(vec![gapped], &["e1"], vec![inverted], Vec::new()),
            &params(),
        );
        assert!(out.suggestions.is_empty());
        assert_eq!(out.note, NOTE_NO_AVAILABILITY);
    }

    #[test]
    fn overlapping_commitment_excludes_only_the_overlapping_gap() {
        // e1 already works 09:00-17:00 on s1; s2 overlaps it, s3 does not.
        let mut s1 = shift("s1", "cook", 9, 17, 1);
        s1.assigned.push("e1".to_string());
        let s2 = shift("s2", "cook", 16, 20, 1);
        let s3 = shift("s3", "cook", 17, 21, 1);
        let availability = vec![all_day("e1", 0)];
        let out = build_suggestions(
            &snapshot(vec![s1, s2, s3], &["e1"], availability, Vec::new()),
            &params(),
        );
        assert_eq!(out.suggestions.len(), 2);
        assert_eq!(out.suggestions[0].shift_id, "s2");
        assert!(out.suggestions[0].candidates.is_empty());
        assert_eq!(out.suggestions[1].shift_id, "s3");
        assert_eq!(out.suggestions[1].candidates, vec!["e1".to_string()]);
    }

    #[test]
    fn double_booking_considers_shifts_outside_the_role_filter() {
        let mut cook = shift("s1", "cook", 9, 17, 1);
        cook.assigned.push("e1".to_string());
        let cashier = shift("s2", "cashier", 10, 14, 1);
        let availability = vec![all_day("e1", 0), all_day("e2", 0)];
        let out = build_suggestions(
            &snapshot(vec![cook, cashier], &["e1", "e2"], availability, Vec::new()),
            &GapFillParams {
                role_filter: Some("Cashier".to_string()),
                max_per_shift: 3,
            },
        );
        assert_eq!(out.suggestions.len(), 1);
        assert_eq!(out.suggestions[0].shift_id, "s2");
        assert_eq!(out.suggestions[0].candidates, vec!["e2".to_string()]);
    }

    #[test]
    fn fewer_existing_assignments_rank_first_and_ties_keep_pool_order() {
        let mut s1 = shift("s1", "cook", 0, 4, 1);
        s1.assigned.push("e1".to_string());
        let gapped = shift("s2", "cook", 9, 17, 2);
        let availability = vec![all_day("e1", 0), all_day("e2", 0), all_day("e3", 0)];
        let out = build_suggestions(
            &snapshot(vec![s1, gapped], &["e1", "e2", "e3"], availability, Vec::new()),
            &params(),
        );
        let ranked = &out.suggestions[0].candidates;
        // e2 and e3 tie at zero assignments and keep roster order; e1 last.
        assert_eq!(
            ranked,
            &vec!["e2".to_string(), "e3".to_string(), "e1".to_string()]
        );
    }

    #[test]
    fn max_per_shift_caps_the_candidate_list() {
        let gapped = shift("s1", "cook", 9, 17, 5);
        let availability = (1..=4).map(|i| all_day(&format!("e{i}"), 0)).collect();
        let out = build_suggestions(
            &snapshot(vec![gapped], &["e1", "e2", "e3", "e4"], availability, Vec::new()),
            &GapFillParams {
                role_filter: None,
                max_per_shift: 2,
            },
        );
        assert_eq!(out.suggestions[0].candidates.len(), 2);
    }

    #[test]
    fn advisor_order_accepts_only_permutations_of_a_subset() {
        let local = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let reordered = vec!["c".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(
            apply_advisor_order(&local, &reordered),
            Some(reordered.clone())
        );

        let subset = vec!["b".to_string()];
        assert_eq!(apply_advisor_order(&local, &subset), Some(subset.clone()));

        let unknown = vec!["b".to_string(), "zz".to_string()];
        assert_eq!(apply_advisor_order(&local, &unknown), None);

        let duplicated = vec!["a".to_string(), "a".to_string()];
        assert_eq!(apply_advisor_order(&local, &duplicated), None);

        assert_eq!(apply_advisor_order(&local, &[]), None);
    }
}
