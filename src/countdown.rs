//! Countdown text shown in the task table.
//!
//! A countdown is rendered as `"{days}d {hours}h {minutes}m {seconds}s"`.
//! Overdue tasks (negative remaining time) render as `"0d 0h 0m 0s"` while
//! keeping their negative remaining seconds, so they still sort before
//! everything that is not yet due.

use chrono::{NaiveDateTime, TimeDelta};

use crate::error::CountdownParseError;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

const UNITS: [(char, i64); 4] = [
    ('d', SECONDS_PER_DAY),
    ('h', SECONDS_PER_HOUR),
    ('m', SECONDS_PER_MINUTE),
    ('s', 1),
];

/// Formats a duration, returning the display text and the whole remaining seconds.
pub fn format_duration(delta: TimeDelta) -> (String, i64) {
    let total = delta.num_seconds();
    let clamped = total.max(0);

    let days = clamped / SECONDS_PER_DAY;
    let hours = (clamped % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (clamped % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = clamped % SECONDS_PER_MINUTE;

    (format!("{days}d {hours}h {minutes}m {seconds}s"), total)
}

/// Parses text produced by [`format_duration`] back into seconds.
///
/// Each of the `d`, `h`, `m` and `s` components is optional but they must
/// appear in that order.
pub fn parse_duration(text: &str) -> Result<i64, CountdownParseError> {
    let err = || CountdownParseError {
        text: text.to_string(),
    };

    let mut rest = text.trim();
    let mut total: i64 = 0;
    for (unit, scale) in UNITS {
        if let Some((value, tail)) = rest.split_once(unit) {
            let value: i64 = value.trim().parse().map_err(|_| err())?;
            total = value
                .checked_mul(scale)
                .and_then(|v| total.checked_add(v))
                .ok_or_else(err)?;
            rest = tail;
        }
    }

    if !rest.trim().is_empty() {
        return Err(err());
    }
    Ok(total)
}

/// Countdown from `now` until `due_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    pub text: String,
    pub remaining_seconds: i64,
}

impl Countdown {
    pub fn between(now: NaiveDateTime, due_date: NaiveDateTime) -> Self {
        let (text, remaining_seconds) = format_duration(due_date - now);
        Self {
            text,
            remaining_seconds,
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.remaining_seconds < 0
    }
}
