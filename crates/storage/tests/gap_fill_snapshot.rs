#![forbid(unsafe_code)]

use rd_core::gapfill::{GapFillParams, build_suggestions};
use rd_core::ids::{EmployeeId, StoreId};
use rd_storage::{LEAVE_APPROVED, ROLE_EMPLOYEE, ROLE_MANAGER, SqliteStore, StoreError};
use std::path::PathBuf;
use time::macros::date;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("rd_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn store_id() -> StoreId {
    StoreId::try_new("store-1").expect("store id")
}

fn employee(raw: &str) -> EmployeeId {
    EmployeeId::try_new(raw).expect("employee id")
}

// Friday 2024-03-01 00:00:00 UTC.
const WEEK_MS: i64 = 1_709_251_200_000;
const HOUR_MS: i64 = 3_600_000;

#[test]
fn snapshot_requires_a_known_week() {
    let mut store = SqliteStore::open(temp_dir("snap_unknown_week")).expect("open store");
    assert!(matches!(
        store
            .gap_fill_snapshot(&store_id(), "missing")
            .expect_err("unknown"),
        StoreError::UnknownWeek
    ));
}

#[test]
fn snapshot_feeds_the_matcher_end_to_end() {
    let mut store = SqliteStore::open(temp_dir("snap_e2e")).expect("open store");
    let week = store
        .week_get_or_create(date!(2024 - 03 - 01))
        .expect("week");
    let schedule = store
        .schedule_get_or_create(&store_id(), &week.id)
        .expect("schedule");

    // A cook shift, Friday 09:00-17:00, needing two heads; one already filled.
    let shift_start = WEEK_MS + 9 * HOUR_MS;
    let shift_end = WEEK_MS + 17 * HOUR_MS;
    let shift = store
        .shift_add(&schedule.id, "cook", shift_start, shift_end, 2)
        .expect("shift");
    store
        .assignment_add(&shift.id, &employee("dora"))
        .expect("pre-assigned");

    // Three members: two plain employees, one manager the roster must skip.
    for (name, role) in [
        ("alice", ROLE_EMPLOYEE),
        ("bob", ROLE_EMPLOYEE),
        ("mallory", ROLE_MANAGER),
    ] {
        store
            .membership_upsert(&store_id(), &employee(name), role, true)
            .expect("membership");
    }

    // Alice covers the whole shift; bob only the morning; mallory is ignored.
    store
        .availability_put(
            &employee("alice"),
            &store_id(),
            &week.id,
            date!(2024 - 03 - 01),
            Some(WEEK_MS + 8 * HOUR_MS),
            Some(WEEK_MS + 18 * HOUR_MS),
        )
        .expect("alice availability");
    store
        .availability_put(
            &employee("bob"),
            &store_id(),
            &week.id,
            date!(2024 - 03 - 01),
            Some(WEEK_MS + 8 * HOUR_MS),
            Some(WEEK_MS + 12 * HOUR_MS),
        )
        .expect("bob availability");

    let snapshot = store
        .gap_fill_snapshot(&store_id(), &week.id)
        .expect("snapshot");
    assert_eq!(snapshot.week_start, date!(2024 - 03 - 01));
    // Two same-instant memberships; the tie-break on row id keeps the order
    // stable per database but not across runs, so compare as a set.
    let mut roster = snapshot.roster.clone();
    roster.sort();
    assert_eq!(roster, vec!["alice".to_string(), "bob".to_string()]);

    let outcome = build_suggestions(
        &snapshot,
        &GapFillParams {
            role_filter: None,
            max_per_shift: 3,
        },
    );
    assert_eq!(outcome.suggestions.len(), 1);
    let suggestion = &outcome.suggestions[0];
    assert_eq!(suggestion.shift_id, shift.id);
    assert_eq!(suggestion.needed_slots, 1);
    // Only alice's window contains the full shift.
    assert_eq!(suggestion.candidates, vec!["alice".to_string()]);
}

#[test]
fn approved_leave_overlapping_the_week_reaches_the_snapshot() {
    let mut store = SqliteStore::open(temp_dir("snap_leave")).expect("open store");
    let week = store
        .week_get_or_create(date!(2024 - 03 - 01))
        .expect("week");

    // Overlaps the week tail; must be included.
    store
        .leave_request_add(
            &employee("alice"),
            &store_id(),
            date!(2024 - 03 - 06),
            date!(2024 - 03 - 10),
            LEAVE_APPROVED,
        )
        .expect("overlapping leave");
    // Entirely before the week; must be excluded.
    store
        .leave_request_add(
            &employee("bob"),
            &store_id(),
            date!(2024 - 02 - 20),
            date!(2024 - 02 - 25),
            LEAVE_APPROVED,
        )
        .expect("stale leave");
    // Overlapping but still pending; must be excluded.
    store
        .leave_request_add(
            &employee("carol"),
            &store_id(),
            date!(2024 - 03 - 01),
            date!(2024 - 03 - 03),
            "pending",
        )
        .expect("pending leave");

    let snapshot = store
        .gap_fill_snapshot(&store_id(), &week.id)
        .expect("snapshot");
    assert_eq!(snapshot.leave.len(), 1);
    assert_eq!(snapshot.leave[0].employee_id, "alice");
    assert_eq!(snapshot.leave[0].start_date, date!(2024 - 03 - 06));
}

#[test]
fn availability_put_replaces_the_same_day_window() {
    let mut store = SqliteStore::open(temp_dir("avail_upsert")).expect("open store");
    let week = store
        .week_get_or_create(date!(2024 - 03 - 01))
        .expect("week");

    let first = store
        .availability_put(
            &employee("alice"),
            &store_id(),
            &week.id,
            date!(2024 - 03 - 01),
            Some(WEEK_MS),
            Some(WEEK_MS + 8 * HOUR_MS),
        )
        .expect("first put");
    let second = store
        .availability_put(
            &employee("alice"),
            &store_id(),
            &week.id,
            date!(2024 - 03 - 01),
            Some(WEEK_MS + 2 * HOUR_MS),
            Some(WEEK_MS + 10 * HOUR_MS),
        )
        .expect("second put");
    assert_eq!(second.id, first.id, "same-day re-put must replace in place");
    assert_eq!(second.available_start_at_ms, Some(WEEK_MS + 2 * HOUR_MS));

    let snapshot = store
        .gap_fill_snapshot(&store_id(), &week.id)
        .expect("snapshot");
    assert_eq!(snapshot.availability.len(), 1);
    assert_eq!(
        snapshot.availability[0].end_ms,
        Some(WEEK_MS + 10 * HOUR_MS)
    );
}
