//! Normalizing a stored occurrence into the nearest valid future one.
//!
//! Run whenever a reminder is switched on or its time of day is edited while
//! on, so that an already-past time is never armed.

use chrono::{Duration, NaiveDateTime};

use crate::recurrence::next_occurrence;
use crate::schedule::ReminderSchedule;

/// The nearest occurrence of `schedule` strictly after `now`.
///
/// An occurrence that is already in the future and lands on a day the
/// reminder can fire on is returned unchanged. Otherwise:
///
/// - repeating reminders resolve through [`next_occurrence`] with the
///   occurrence's time of day;
/// - one-shot reminders fire today at that time if it is still ahead,
///   or tomorrow.
///
/// # Examples
///
/// ```
/// use alarm_engine::days::DaySet;
/// use alarm_engine::futurize::futurize;
/// use alarm_engine::schedule::ReminderSchedule;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
/// let now = day.and_hms_opt(17, 30, 0).unwrap();
/// let stale = ReminderSchedule::new(day.and_hms_opt(8, 30, 0).unwrap(), DaySet::EMPTY);
///
/// let next = futurize(now, &stale);
/// assert_eq!(next, day.succ_opt().unwrap().and_hms_opt(8, 30, 0).unwrap());
/// ```
pub fn futurize(now: NaiveDateTime, schedule: &ReminderSchedule) -> NaiveDateTime {
    if schedule.occurrence > now && schedule.occurrence_on_repeat_day() {
        return schedule.occurrence;
    }
    next_slot(now, schedule)
}

/// The nearest slot for `schedule`'s time of day strictly after `now`,
/// ignoring the stored date entirely.
///
/// Use this after the time of day or the repeating days were edited: the
/// stored date then belongs to the old settings and may skip a nearer slot.
pub fn next_slot(now: NaiveDateTime, schedule: &ReminderSchedule) -> NaiveDateTime {
    let time_of_day = schedule.time_of_day();

    if schedule.is_repeating() {
        return next_occurrence(now, time_of_day, schedule.repeat);
    }

    let potential = now.date().and_time(time_of_day);
    if potential > now {
        potential
    } else {
        potential + Duration::days(1)
    }
}
