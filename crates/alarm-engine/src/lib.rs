//! # alarm-engine
//!
//! Deterministic scheduling for repeating alarms.
//!
//! Given the weekdays an alarm repeats on, its time of day, and "now", the
//! engine finds the next valid firing, notices when a stored firing has gone
//! stale (missed wake-up, device off, clock change), repairs it, and renders
//! the time remaining. Every function takes "now" as an argument; nothing
//! reads the system clock.
//!
//! ## Modules
//!
//! - [`days`] — `DaySet`, the 7-bit weekday mask (Sunday = bit 0)
//! - [`schedule`] — `ReminderSchedule` and the `FiringSnapshot` handed to wake-ups
//! - [`recurrence`] — next occurrence of a weekly repeating time
//! - [`futurize`] — move a stored occurrence to the nearest valid future one
//! - [`staleness`] — detect and repair elapsed occurrences and snoozes
//! - [`countdown`] — rounded "1d 2h 5m" time-remaining display
//! - [`store`] — persistence and wake-scheduling ports, in-memory implementations
//! - [`service`] — orchestration of the core against those ports
//! - [`config`] — tunables (snooze length, default lead time)
//! - [`error`] — Error types

pub mod config;
pub mod countdown;
pub mod days;
pub mod error;
pub mod futurize;
pub mod recurrence;
pub mod schedule;
pub mod service;
pub mod staleness;
pub mod store;

pub use config::EngineConfig;
pub use countdown::{countdown, Countdown};
pub use days::{day_number, DaySet};
pub use error::AlarmError;
pub use futurize::{futurize, next_slot};
pub use recurrence::next_occurrence;
pub use schedule::{default_occurrence, truncate_to_minute, FiringSnapshot, ReminderSchedule};
pub use service::{AlarmService, WakeOutcome};
pub use staleness::{clean, is_dirty};
pub use store::{AlarmId, MemoryStore, MemoryWakeScheduler, ScheduleStore, WakeScheduler};
