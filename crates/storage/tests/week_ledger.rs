#![forbid(unsafe_code)]

use rd_storage::{SqliteStore, StoreError};
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

#[test]
fn week_get_or_create_is_idempotent_per_week_start() {
    let mut store = SqliteStore::open(temp_dir("week_idempotent")).expect("open store");
    let friday = date!(2024 - 03 - 01);

    let first = store.week_get_or_create(friday).expect("create week");
    assert_eq!(first.week_start, friday);
    assert_eq!(first.week_end, date!(2024 - 03 - 07));
    assert!(!first.is_locked);
    assert_eq!(first.locked_at_ms, None);

    let second = store.week_get_or_create(friday).expect("re-request week");
    assert_eq!(second.id, first.id, "same window must stay one row");

    let next = store
        .week_get_or_create(date!(2024 - 03 - 08))
        .expect("next week");
    assert_ne!(next.id, first.id);
}

#[test]
fn week_get_or_create_rejects_non_anchor_dates() {
    let mut store = SqliteStore::open(temp_dir("week_anchor")).expect("open store");
    // A Saturday: snapping is the resolver's job, not the ledger's.
    let err = store
        .week_get_or_create(date!(2024 - 03 - 02))
        .expect_err("non-friday start");
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[test]
fn lock_and_unlock_are_idempotent() {
    let mut store = SqliteStore::open(temp_dir("week_lock")).expect("open store");
    let week = store
        .week_get_or_create(date!(2024 - 03 - 01))
        .expect("create week");

    let locked = store.week_lock(&week.id).expect("lock");
    assert!(locked.is_locked);
    let locked_at = locked.locked_at_ms.expect("locked_at set");

    let relocked = store.week_lock(&week.id).expect("lock again");
    assert!(relocked.is_locked);
    assert_eq!(
        relocked.locked_at_ms,
        Some(locked_at),
        "re-locking must not refresh locked_at"
    );

    let unlocked = store.week_unlock(&week.id).expect("unlock");
    assert!(!unlocked.is_locked);
    assert_eq!(unlocked.locked_at_ms, None);

    let reunlocked = store.week_unlock(&week.id).expect("unlock again");
    assert!(!reunlocked.is_locked);
}

#[test]
fn unknown_week_is_reported_as_such() {
    let mut store = SqliteStore::open(temp_dir("week_unknown")).expect("open store");
    assert!(matches!(
        store.week_get("nope").expect_err("missing week"),
        StoreError::UnknownWeek
    ));
    assert!(matches!(
        store.week_lock("nope").expect_err("missing week"),
        StoreError::UnknownWeek
    ));
}
