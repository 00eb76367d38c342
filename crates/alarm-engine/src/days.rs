//! The set of weekdays a reminder repeats on.
//!
//! [`DaySet`] is a 7-bit mask with Sunday at bit 0 and Saturday at bit 6.
//! That bit layout is the persisted representation, so it must not change:
//! stored masks written by earlier versions decode to the same days.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::AlarmError;

/// Weekdays in mask order (bit 0 first).
const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

const ALL_BITS: u8 = 0b0111_1111;

/// Day number used by the recurrence arithmetic: Sunday = 1 … Saturday = 7.
///
/// This is deliberately not ISO numbering (where Monday = 1).
pub fn day_number(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8 + 1
}

fn bit(weekday: Weekday) -> u8 {
    1 << weekday.num_days_from_sunday()
}

/// An immutable set of weekdays.
///
/// Every mutation returns a new value. Serializes as the bare integer mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct DaySet(u8);

impl DaySet {
    pub const EMPTY: DaySet = DaySet(0);
    pub const EVERY_DAY: DaySet = DaySet(ALL_BITS);
    /// Monday through Friday.
    pub const WEEKDAYS: DaySet = DaySet(0b0011_1110);
    /// Saturday and Sunday.
    pub const WEEKENDS: DaySet = DaySet(0b0100_0001);

    /// Build a set from a raw mask. Bit 7 carries no meaning and is dropped.
    pub const fn from_mask(mask: u8) -> Self {
        DaySet(mask & ALL_BITS)
    }

    pub const fn to_mask(self) -> u8 {
        self.0
    }

    /// `true` if at least one day is set.
    pub const fn has_any(self) -> bool {
        self.0 != 0
    }

    pub const fn is_every_day(self) -> bool {
        self.0 == ALL_BITS
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & bit(day) != 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        !self.has_any()
    }

    #[must_use]
    pub fn with_day(self, day: Weekday) -> Self {
        DaySet(self.0 | bit(day))
    }

    #[must_use]
    pub fn without_day(self, day: Weekday) -> Self {
        DaySet(self.0 & !bit(day))
    }

    /// Days in the set, Sunday through Saturday.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        WEEK.into_iter().filter(move |d| self.contains(*d))
    }

    /// Days in the set as an ordered list, Sunday through Saturday.
    pub fn days(self) -> Vec<Weekday> {
        self.iter().collect()
    }
}

impl From<u8> for DaySet {
    fn from(mask: u8) -> Self {
        DaySet::from_mask(mask)
    }
}

impl From<DaySet> for u8 {
    fn from(days: DaySet) -> Self {
        days.to_mask()
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(DaySet::EMPTY, DaySet::with_day)
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DaySet::EMPTY => f.write_str("Never"),
            DaySet::EVERY_DAY => f.write_str("Every day"),
            DaySet::WEEKDAYS => f.write_str("Weekdays"),
            DaySet::WEEKENDS => f.write_str("Weekends"),
            days => {
                let names: Vec<String> = days.iter().map(|d| d.to_string()).collect();
                f.write_str(&names.join(", "))
            }
        }
    }
}

impl FromStr for DaySet {
    type Err = AlarmError;

    /// Parse `"mon,wed,fri"`, `"weekdays"`, `"weekends"`, `"daily"`, or `"never"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "" | "never" | "none" => return Ok(DaySet::EMPTY),
            "daily" | "everyday" | "every day" => return Ok(DaySet::EVERY_DAY),
            "weekdays" => return Ok(DaySet::WEEKDAYS),
            "weekends" => return Ok(DaySet::WEEKENDS),
            _ => {}
        }

        normalized
            .split(',')
            .map(str::trim)
            .map(|name| {
                parse_weekday(name)
                    .ok_or_else(|| AlarmError::InvalidDays(format!("unknown day '{name}' in '{s}'")))
            })
            .collect()
    }
}

/// Parse a weekday name (lowercase, full or abbreviated).
fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "sunday" | "sun" => Some(Weekday::Sun),
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        _ => None,
    }
}
