//! Time-remaining display for the next firing.
//!
//! The remaining duration is broken into days, hours, and minutes with the
//! minutes rounded up, so a countdown never reads "0m" while something is
//! still pending. Rounding near the top of an hour carries into the hour (or
//! day) instead of producing "60m" or "24h".
//!
//! Unlike the rest of the crate, "now" here keeps its seconds: the countdown
//! is meant to tick down smoothly between minute boundaries.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LESS_THAN_MARKER: &str = "<";

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Remaining time until a firing, rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

/// Compute the countdown from `now` to `firing_at`.
///
/// Returns all zeros when `firing_at` is not after `now`.
///
/// # Examples
///
/// ```
/// use alarm_engine::countdown::countdown;
/// use chrono::{Duration, NaiveDate};
///
/// let now = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap().and_hms_opt(6, 0, 0).unwrap();
/// let left = countdown(now, now + Duration::seconds(7170)); // 1h 59m 30s
/// assert_eq!(left.to_string(), "2h");
/// ```
pub fn countdown(now: NaiveDateTime, firing_at: NaiveDateTime) -> Countdown {
    if firing_at <= now {
        return Countdown::default();
    }

    let total_seconds = (firing_at - now).num_milliseconds() as f64 / 1000.0;

    let mut days = (total_seconds / SECONDS_PER_DAY).floor();
    let r1 = total_seconds - days * SECONDS_PER_DAY;
    let mut hours = (r1 / SECONDS_PER_HOUR).floor();
    let r2 = r1 - hours * SECONDS_PER_HOUR;
    let minutes_raw = r2 / SECONDS_PER_MINUTE;

    let minutes = if minutes_raw <= 59.0 {
        minutes_raw.ceil()
    } else if hours >= 23.0 {
        days += 1.0;
        hours = 0.0;
        0.0
    } else {
        hours += 1.0;
        0.0
    };

    Countdown {
        days: days as i64,
        hours: hours as i64,
        minutes: minutes as i64,
    }
}

impl Countdown {
    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0
    }

    /// Only the rounded-up final minute is left.
    pub fn is_under_a_minute(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 1
    }

    /// Render as `"1d 2h 5m"`, omitting zero units.
    ///
    /// All-zero renders as `"0m"`. The final minute is prefixed with
    /// `marker` because it may be any amount of time under a minute.
    pub fn render(&self, marker: &str) -> String {
        if self.is_zero() {
            return "0m".to_string();
        }
        if self.is_under_a_minute() {
            return format!("{marker} 1m");
        }

        let mut parts = Vec::new();
        if self.days > 0 {
            parts.push(format!("{}d", self.days));
        }
        if self.hours > 0 {
            parts.push(format!("{}h", self.hours));
        }
        if self.minutes > 0 {
            parts.push(format!("{}m", self.minutes));
        }
        parts.join(" ")
    }

    /// Spelled-out form, e.g. `"1 day, 2 hours, 5 minutes"`.
    pub fn human_readable(&self) -> String {
        if self.is_zero() {
            return "now".to_string();
        }
        if self.is_under_a_minute() {
            return "less than 1 minute".to_string();
        }

        let mut parts = Vec::new();
        if self.days > 0 {
            parts.push(plural(self.days, "day"));
        }
        if self.hours > 0 {
            parts.push(plural(self.hours, "hour"));
        }
        if self.minutes > 0 {
            parts.push(plural(self.minutes, "minute"));
        }
        parts.join(", ")
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_LESS_THAN_MARKER))
    }
}

fn plural(n: i64, unit: &str) -> String {
    format!("{} {}{}", n, unit, if n == 1 { "" } else { "s" })
}
