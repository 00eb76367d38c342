//! Detecting and repairing reminders whose scheduled firing has already passed.
//!
//! A reminder goes stale when its wake-up was missed: the device was off
//! across the firing time, the clock jumped, or the wake was delivered late.
//! Staleness is discovered at an arbitrary later "now" and repaired silently.
//!
//! [`clean`] is the only operation that switches a reminder off as a repair.
//! Its result has to be persisted by the caller before the reminder counts as
//! clean again.

use chrono::NaiveDateTime;

use crate::recurrence::next_occurrence;
use crate::schedule::ReminderSchedule;

/// `true` if `schedule` is enabled and its effective firing is not after `now`.
///
/// A pending snooze is what gets checked when present; the base occurrence is
/// ignored until the snooze is cleared.
pub fn is_dirty(now: NaiveDateTime, schedule: &ReminderSchedule) -> bool {
    if !schedule.enabled {
        return false;
    }
    match schedule.snooze_occurrence {
        Some(snooze) => snooze <= now,
        None => schedule.occurrence <= now,
    }
}

/// Repair a dirty reminder. Clean reminders are returned unchanged.
///
/// Repeating reminders move to their next occurrence after `now`. One-shot
/// reminders are disabled and keep their stored occurrence. Either way the
/// snooze is cleared.
pub fn clean(now: NaiveDateTime, schedule: ReminderSchedule) -> ReminderSchedule {
    if !is_dirty(now, &schedule) {
        return schedule;
    }

    if schedule.is_repeating() {
        ReminderSchedule {
            occurrence: next_occurrence(now, schedule.time_of_day(), schedule.repeat),
            snooze_occurrence: None,
            ..schedule
        }
    } else {
        ReminderSchedule {
            enabled: false,
            snooze_occurrence: None,
            ..schedule
        }
    }
}
