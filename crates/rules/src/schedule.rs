//! Due-checking for schedule triggers.
//!
//! The evaluator is a pure function of the schedule, a reference instant,
//! and the most recent run instant (derived by the caller from the latest
//! execution record). Calling it repeatedly inside one due window with an
//! up-to-date `last_run` never reports due twice.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use trigon_core::{Frequency, Schedule};

/// Decide whether a schedule trigger is due at `now`.
///
/// A trigger is due when `now` falls on the schedule's day (every day for
/// daily, the configured weekday for weekly, the configured — clamped —
/// day-of-month for monthly), the time-of-day has been reached, and no run
/// has been recorded since the start of that day.
#[must_use]
pub fn is_due(schedule: &Schedule, now: DateTime<Utc>, last_run: Option<DateTime<Utc>>) -> bool {
    let today = now.date_naive();

    let day_matches = match schedule.frequency {
        Frequency::Daily => true,
        Frequency::Weekly => schedule
            .day_of_week
            .is_some_and(|dow| today.weekday() == dow),
        Frequency::Monthly => schedule.day_of_month.is_some_and(|dom| {
            today.day() == dom.min(days_in_month(today.year(), today.month()))
        }),
    };
    if !day_matches {
        return false;
    }

    let Some(fire_at) = today
        .and_hms_opt(schedule.at.hour(), schedule.at.minute(), 0)
        .map(|naive| naive.and_utc())
    else {
        return false;
    };
    if now < fire_at {
        return false;
    }

    let Some(day_start) = today.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()) else {
        return false;
    };
    last_run.is_none_or(|run| run < day_start)
}

/// Number of days in the given month.
fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}
