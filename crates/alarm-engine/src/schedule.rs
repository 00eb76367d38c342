//! The scheduling state of a single reminder.
//!
//! All datetimes here are wall-clock [`NaiveDateTime`]s at minute precision.
//! The surrounding application decides which time zone the wall clock is in.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::days::DaySet;

/// Zero the seconds and sub-second part of a datetime.
pub fn truncate_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

/// The default firing time for a freshly created reminder: `lead_minutes`
/// after the current minute.
pub fn default_occurrence(now: NaiveDateTime, lead_minutes: u32) -> NaiveDateTime {
    truncate_to_minute(now) + Duration::minutes(i64::from(lead_minutes))
}

/// The subset of an alarm that the scheduling core reads and writes.
///
/// When `repeat` is non-empty, only the time-of-day of `occurrence` is
/// canonical. Its date is the most recently resolved occurrence and must be
/// re-resolved before being trusted as the firing day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSchedule {
    pub enabled: bool,
    pub occurrence: NaiveDateTime,
    #[serde(default)]
    pub repeat: DaySet,
    /// Set only while a snooze is pending. Supersedes `occurrence`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snooze_occurrence: Option<NaiveDateTime>,
}

impl ReminderSchedule {
    /// An enabled reminder with no snooze. `occurrence` is truncated to the minute.
    pub fn new(occurrence: NaiveDateTime, repeat: DaySet) -> Self {
        Self {
            enabled: true,
            occurrence: truncate_to_minute(occurrence),
            repeat,
            snooze_occurrence: None,
        }
    }

    /// The snooze occurrence if one is pending, otherwise the base occurrence.
    pub fn effective_firing(&self) -> NaiveDateTime {
        self.snooze_occurrence.unwrap_or(self.occurrence)
    }

    pub fn time_of_day(&self) -> NaiveTime {
        self.occurrence.time()
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat.has_any()
    }

    /// `true` if `occurrence` falls on a day this reminder can fire on.
    pub(crate) fn occurrence_on_repeat_day(&self) -> bool {
        !self.is_repeating() || self.repeat.contains(self.occurrence.weekday())
    }

    /// Defer the next firing by `minutes` from the current minute.
    #[must_use]
    pub fn snoozed(self, now: NaiveDateTime, minutes: u32) -> Self {
        Self {
            snooze_occurrence: Some(default_occurrence(now, minutes)),
            ..self
        }
    }

    /// Capture the effective firing for handing to a wake-up primitive.
    pub fn snapshot(&self) -> FiringSnapshot {
        FiringSnapshot {
            firing_at: self.effective_firing(),
            repeat_mask: self.repeat.to_mask(),
        }
    }
}

/// The firing a concrete wake-up was armed for.
///
/// A new snapshot is taken every time a wake-up is (re)armed; existing ones
/// are never updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiringSnapshot {
    pub firing_at: NaiveDateTime,
    pub repeat_mask: u8,
}

impl FiringSnapshot {
    pub fn repeat(&self) -> DaySet {
        DaySet::from_mask(self.repeat_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_truncate_to_minute() {
        let raw = dt(2026, 2, 18, 8, 30, 59) + Duration::milliseconds(250);
        assert_eq!(truncate_to_minute(raw), dt(2026, 2, 18, 8, 30, 0));
    }

    #[test]
    fn test_default_occurrence_is_near_future() {
        let now = dt(2026, 2, 18, 23, 59, 40);
        assert_eq!(default_occurrence(now, 1), dt(2026, 2, 19, 0, 0, 0));
    }

    #[test]
    fn test_new_truncates_occurrence() {
        let schedule = ReminderSchedule::new(dt(2026, 2, 18, 8, 30, 12), DaySet::EMPTY);
        assert!(schedule.enabled);
        assert_eq!(schedule.occurrence, dt(2026, 2, 18, 8, 30, 0));
        assert_eq!(schedule.snooze_occurrence, None);
    }

    #[test]
    fn test_effective_firing_prefers_snooze() {
        let schedule = ReminderSchedule::new(dt(2026, 2, 18, 8, 30, 0), DaySet::EMPTY);
        assert_eq!(schedule.effective_firing(), dt(2026, 2, 18, 8, 30, 0));

        let snoozed = schedule.snoozed(dt(2026, 2, 18, 8, 30, 20), 10);
        assert_eq!(snoozed.snooze_occurrence, Some(dt(2026, 2, 18, 8, 40, 0)));
        assert_eq!(snoozed.effective_firing(), dt(2026, 2, 18, 8, 40, 0));
        assert_eq!(snoozed.occurrence, schedule.occurrence);
    }

    #[test]
    fn test_snapshot_copies_repeat_mask() {
        let repeat = DaySet::EMPTY.with_day(Weekday::Wed);
        let schedule = ReminderSchedule::new(dt(2026, 2, 18, 8, 30, 0), repeat);
        let snapshot = schedule.snapshot();
        assert_eq!(snapshot.firing_at, dt(2026, 2, 18, 8, 30, 0));
        assert_eq!(snapshot.repeat_mask, repeat.to_mask());
        assert_eq!(snapshot.repeat(), repeat);
    }

    #[test]
    fn test_occurrence_on_repeat_day() {
        // 2026-02-18 is a Wednesday.
        let wed = ReminderSchedule::new(
            dt(2026, 2, 18, 8, 30, 0),
            DaySet::EMPTY.with_day(Weekday::Wed),
        );
        assert!(wed.occurrence_on_repeat_day());
        let mon = ReminderSchedule { repeat: DaySet::EMPTY.with_day(Weekday::Mon), ..wed };
        assert!(!mon.occurrence_on_repeat_day());
        let once = ReminderSchedule { repeat: DaySet::EMPTY, ..wed };
        assert!(once.occurrence_on_repeat_day());
    }

    #[test]
    fn test_serde_shape() {
        let schedule = ReminderSchedule::new(dt(2026, 2, 18, 8, 30, 0), DaySet::WEEKDAYS);
        let json = serde_json::to_value(schedule).unwrap();
        assert_eq!(json["enabled"], true);
        assert_eq!(json["occurrence"], "2026-02-18T08:30:00");
        assert_eq!(json["repeat"], 62);
        assert!(json.get("snooze_occurrence").is_none());

        let back: ReminderSchedule = serde_json::from_value(json).unwrap();
        assert_eq!(back, schedule);
    }
}
