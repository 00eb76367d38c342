//! The single place the real clock is read.

use alarm_engine::{truncate_to_minute, AlarmError};
use anyhow::anyhow;
use chrono::{NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// "Now" as wall-clock time, sampled once per invocation.
pub struct Clock {
    now: NaiveDateTime,
}

impl Clock {
    /// Read the system clock in `timezone`, or use `fixed` when given.
    pub fn new(timezone: &str, fixed: Option<&str>) -> anyhow::Result<Self> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| anyhow!("invalid timezone '{timezone}'"))?;
        let now = match fixed {
            Some(s) => parse_datetime(s)?,
            None => Utc::now().with_timezone(&tz).naive_local(),
        };
        Ok(Self { now })
    }

    /// Full precision, for countdowns.
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn now_minute(&self) -> NaiveDateTime {
        truncate_to_minute(self.now)
    }
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime, AlarmError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| AlarmError::InvalidTime(format!("'{s}': {e}")))
}

/// Parse a wall-clock datetime with `T` or a space between date and time.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, AlarmError> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| AlarmError::InvalidDatetime(format!("'{s}'")))
}
