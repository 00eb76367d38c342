//! Next-occurrence resolution for weekly repeating reminders.
//!
//! Given "now", a time of day, and the set of repeating weekdays, find the
//! nearest datetime strictly after "now" that falls on a repeating day at
//! that time of day. "Now" is always an argument; nothing here reads the
//! system clock.
//!
//! The search rotates the week so it starts today, then walks forward:
//!
//! 1. Repeat days on or after today come first (ascending), then the days
//!    before today (ascending).
//! 2. If the first candidate is today but today's slot is not after "now",
//!    a single-day set jumps a full week; otherwise the next candidate is
//!    used instead.
//! 3. A candidate earlier in the week than today wraps to next week.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};

use crate::days::{day_number, DaySet};

/// Resolve the next firing of a weekly repeating reminder.
///
/// The result is strictly after `now`, carries `time_of_day` unchanged, and
/// is at most seven days away.
///
/// # Panics
///
/// Panics if `repeat` is empty. A non-repeating reminder has no weekly
/// recurrence; callers check [`DaySet::has_any`] first.
///
/// # Examples
///
/// ```
/// use alarm_engine::days::DaySet;
/// use alarm_engine::recurrence::next_occurrence;
/// use chrono::{NaiveDate, NaiveTime, Weekday};
///
/// // Wednesday 17:30, alarm at 08:30 on Wednesdays only.
/// let now = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap().and_hms_opt(17, 30, 0).unwrap();
/// let time = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
/// let next = next_occurrence(now, time, DaySet::EMPTY.with_day(Weekday::Wed));
/// assert_eq!(next.date(), NaiveDate::from_ymd_opt(2026, 2, 25).unwrap());
/// assert_eq!(next.time(), time);
/// ```
pub fn next_occurrence(now: NaiveDateTime, time_of_day: NaiveTime, repeat: DaySet) -> NaiveDateTime {
    assert!(
        repeat.has_any(),
        "next_occurrence requires at least one repeating day"
    );

    let today = i64::from(day_number(now.weekday()));
    let order = preference_order(today, repeat);

    let mut delta = order[0] - today;

    if delta == 0 {
        let potential = now.date().and_time(time_of_day);
        if potential <= now {
            // Today's slot is used up.
            if order.len() == 1 {
                return (now.date() + Duration::days(7)).and_time(time_of_day);
            }
            delta = order[1] - today;
        }
    }

    if delta < 0 {
        delta += 7;
    }

    (now.date() + Duration::days(delta)).and_time(time_of_day)
}

/// Repeating day numbers rotated so the week starts at `today`.
fn preference_order(today: i64, repeat: DaySet) -> Vec<i64> {
    let numbers = repeat.iter().map(|d| i64::from(day_number(d)));
    let (upcoming, earlier): (Vec<i64>, Vec<i64>) = numbers.partition(|n| *n >= today);
    upcoming.into_iter().chain(earlier).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};

    /// Wednesday, February 18, 2026.
    fn wed(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 18)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn days(list: &[Weekday]) -> DaySet {
        list.iter().copied().collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── preference order ────────────────────────────────────────────────

    #[test]
    fn test_preference_order_rotates_to_today() {
        // Wednesday = 4.
        let set = days(&[Weekday::Sun, Weekday::Tue, Weekday::Wed, Weekday::Fri]);
        assert_eq!(preference_order(4, set), vec![4, 6, 1, 3]);
    }

    #[test]
    fn test_preference_order_all_before_today() {
        let set = days(&[Weekday::Mon, Weekday::Tue]);
        assert_eq!(preference_order(7, set), vec![2, 3]);
    }

    // ── today ambiguity ─────────────────────────────────────────────────

    #[test]
    fn test_single_day_today_future_time_is_today() {
        let next = next_occurrence(wed(6, 0), hm(8, 30), days(&[Weekday::Wed]));
        assert_eq!(next, date(2026, 2, 18).and_time(hm(8, 30)));
    }

    #[test]
    fn test_single_day_today_past_time_is_next_week() {
        let next = next_occurrence(wed(17, 30), hm(8, 30), days(&[Weekday::Wed]));
        assert_eq!(next, date(2026, 2, 25).and_time(hm(8, 30)));
    }

    #[test]
    fn test_single_day_today_same_minute_is_next_week() {
        let next = next_occurrence(wed(8, 30), hm(8, 30), days(&[Weekday::Wed]));
        assert_eq!(next, date(2026, 2, 25).and_time(hm(8, 30)));
    }

    #[test]
    fn test_multiple_days_today_past_drops_today_and_wraps() {
        let next = next_occurrence(
            wed(17, 30),
            hm(8, 30),
            days(&[Weekday::Tue, Weekday::Wed]),
        );
        // Next Tuesday, six days out.
        assert_eq!(next, date(2026, 2, 24).and_time(hm(8, 30)));
    }

    #[test]
    fn test_multiple_days_today_past_moves_to_later_day() {
        let next = next_occurrence(
            wed(17, 30),
            hm(8, 30),
            days(&[Weekday::Wed, Weekday::Fri]),
        );
        assert_eq!(next, date(2026, 2, 20).and_time(hm(8, 30)));
    }

    #[test]
    fn test_multiple_days_today_future_is_today() {
        let next = next_occurrence(wed(7, 0), hm(8, 30), DaySet::EVERY_DAY);
        assert_eq!(next, date(2026, 2, 18).and_time(hm(8, 30)));
    }

    #[test]
    fn test_every_day_past_time_is_tomorrow() {
        let next = next_occurrence(wed(9, 0), hm(8, 30), DaySet::EVERY_DAY);
        assert_eq!(next, date(2026, 2, 19).and_time(hm(8, 30)));
    }

    // ── wrap ────────────────────────────────────────────────────────────

    #[test]
    fn test_later_day_this_week() {
        let next = next_occurrence(wed(17, 30), hm(8, 30), days(&[Weekday::Sat]));
        assert_eq!(next, date(2026, 2, 21).and_time(hm(8, 30)));
    }

    #[test]
    fn test_earlier_day_wraps_to_next_week() {
        let next = next_occurrence(wed(6, 0), hm(8, 30), days(&[Weekday::Mon]));
        assert_eq!(next, date(2026, 2, 23).and_time(hm(8, 30)));
    }

    #[test]
    fn test_sunday_from_saturday_night() {
        // Saturday, February 21, 2026, 23:59.
        let now = date(2026, 2, 21).and_hms_opt(23, 59, 0).unwrap();
        let next = next_occurrence(now, hm(0, 0), days(&[Weekday::Sun]));
        assert_eq!(next, date(2026, 2, 22).and_time(hm(0, 0)));
    }

    #[test]
    fn test_crosses_month_and_year() {
        // Thursday, December 31, 2026.
        let now = date(2026, 12, 31).and_hms_opt(22, 0, 0).unwrap();
        let next = next_occurrence(now, hm(7, 0), DaySet::WEEKDAYS);
        assert_eq!(next, date(2027, 1, 1).and_time(hm(7, 0)));
    }

    #[test]
    fn test_weekdays_from_friday_evening_skip_weekend() {
        // Friday, February 20, 2026.
        let now = date(2026, 2, 20).and_hms_opt(20, 0, 0).unwrap();
        let next = next_occurrence(now, hm(7, 0), DaySet::WEEKDAYS);
        assert_eq!(next, date(2026, 2, 23).and_time(hm(7, 0)));
    }

    #[test]
    fn test_seconds_in_now_count_as_past() {
        let now = wed(8, 30) + Duration::seconds(20);
        let next = next_occurrence(now, hm(8, 30), days(&[Weekday::Wed, Weekday::Thu]));
        assert_eq!(next, date(2026, 2, 19).and_time(hm(8, 30)));
    }

    #[test]
    #[should_panic(expected = "at least one repeating day")]
    fn test_empty_set_panics() {
        next_occurrence(wed(8, 0), hm(9, 0), DaySet::EMPTY);
    }
}
