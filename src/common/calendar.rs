// src/common/calendar.rs

//! Working-day arithmetic for a calendar month.
//!
//! A working day is any Monday to Friday date, plus the first Saturday of
//! the month. Weekdays are numbered 0 = Monday .. 6 = Sunday.

use chrono::{Datelike, NaiveDate};

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// `(number, name)` pairs offered by the month pickers.
pub const MONTH_CHOICES: [(u32, &str); 12] = [
    (1, "January"), (2, "February"), (3, "March"), (4, "April"),
    (5, "May"), (6, "June"), (7, "July"), (8, "August"),
    (9, "September"), (10, "October"), (11, "November"), (12, "December"),
];

pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// Length of the month, leap years included. `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Weekday of the 1st of the month, 0 = Monday .. 6 = Sunday.
fn first_weekday(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.weekday().num_days_from_monday())
}

/// Mon-Fri days of the month plus its first Saturday.
///
/// Returns 0 when `(year, month)` does not name a real month.
pub fn working_days(year: i32, month: u32) -> u32 {
    let (Some(num_days), Some(first_day)) = (days_in_month(year, month), first_weekday(year, month))
    else {
        return 0;
    };

    let first_saturday = (5 + 7 - first_day) % 7 + 1;

    let mut count = (1..=num_days)
        .filter(|day| (first_day + day - 1) % 7 < 5)
        .count() as u32;

    if first_saturday <= num_days {
        count += 1;
    }

    count
}

/// Same as [`working_days`], but both parts must be supplied.
pub fn working_days_opt(year: Option<i32>, month: Option<u32>) -> u32 {
    match (year, month) {
        (Some(y), Some(m)) => working_days(y, m),
        _ => 0,
    }
}

/// `"21 days (February 2025)"`
pub fn describe_working_days(year: i32, month: u32) -> String {
    let days = working_days(year, month);
    match month_name(month) {
        Some(name) => format!("{days} days ({name} {year})"),
        None => format!("{days} days"),
    }
}
