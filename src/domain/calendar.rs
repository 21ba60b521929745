// src/domain/calendar.rs
//
// Date arithmetic for a recurring monthly due day. The load-bearing
// rule is degrade-to-month-end: due day 31 in April means April 30,
// never a silent roll into May.

use chrono::{Datelike, NaiveDate};

/// The due date for `due_day` within a specific month, degraded to the
/// last day of that month when the nominal day does not exist there.
fn due_date_in(year: i32, month: u32, due_day: u32) -> NaiveDate {
    (1..=due_day)
        .rev()
        .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .expect("day 1 exists in every month")
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Whole days until the next occurrence of `due_day` (0 when today is
/// the effective due date). `due_day` outside 1..=31 is a contract
/// breach upstream and fails fast.
pub fn days_until_due(due_day: u32, today: NaiveDate) -> i64 {
    assert!(
        (1..=31).contains(&due_day),
        "rent due day out of range: {due_day}"
    );

    let mut candidate = due_date_in(today.year(), today.month(), due_day);
    if candidate < today {
        let (year, month) = next_month(today.year(), today.month());
        candidate = due_date_in(year, month, due_day);
    }

    (candidate - today).num_days()
}

/// Whole days since the last occurrence of `due_day` (0 when today is
/// the effective due date).
pub fn days_past_due(due_day: u32, today: NaiveDate) -> i64 {
    assert!(
        (1..=31).contains(&due_day),
        "rent due day out of range: {due_day}"
    );

    let mut candidate = due_date_in(today.year(), today.month(), due_day);
    if candidate > today {
        let (year, month) = prev_month(today.year(), today.month());
        candidate = due_date_in(year, month, due_day);
    }

    (today - candidate).num_days()
}
