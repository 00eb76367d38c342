//! Ports to the collaborators that own persistence and OS wake-ups.
//!
//! The scheduling functions never touch these. [`crate::service::AlarmService`]
//! reads through a [`ScheduleStore`], applies the pure core, writes back, and
//! then (re)arms through a [`WakeScheduler`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AlarmError, Result};
use crate::schedule::{FiringSnapshot, ReminderSchedule};

pub type AlarmId = u64;

/// Durable storage of reminder schedules keyed by id.
pub trait ScheduleStore {
    fn load(&self, id: AlarmId) -> Result<ReminderSchedule>;

    /// Overwrite an existing reminder.
    fn save(&mut self, id: AlarmId, schedule: ReminderSchedule) -> Result<()>;

    /// Every stored reminder, ordered by id.
    fn load_all(&self) -> Result<Vec<(AlarmId, ReminderSchedule)>>;

    /// Store a new reminder and return its id.
    fn insert(&mut self, schedule: ReminderSchedule) -> Result<AlarmId>;

    fn remove(&mut self, id: AlarmId) -> Result<()>;
}

/// Arms and cancels the platform wake-up for a reminder.
///
/// At most one wake-up is pending per id; arming again replaces it.
pub trait WakeScheduler {
    fn arm(&mut self, id: AlarmId, snapshot: FiringSnapshot) -> Result<()>;

    /// Cancel the pending wake-up for `id`. Cancelling nothing is not an error.
    fn cancel(&mut self, id: AlarmId) -> Result<()>;
}

/// A [`ScheduleStore`] held in memory. Serializable, so it doubles as a
/// simple file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    next_id: AlarmId,
    alarms: BTreeMap<AlarmId, ReminderSchedule>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            next_id: 1,
            alarms: BTreeMap::new(),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }
}

impl ScheduleStore for MemoryStore {
    fn load(&self, id: AlarmId) -> Result<ReminderSchedule> {
        self.alarms.get(&id).copied().ok_or(AlarmError::NotFound(id))
    }

    fn save(&mut self, id: AlarmId, schedule: ReminderSchedule) -> Result<()> {
        let slot = self.alarms.get_mut(&id).ok_or(AlarmError::NotFound(id))?;
        *slot = schedule;
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<(AlarmId, ReminderSchedule)>> {
        Ok(self.alarms.iter().map(|(id, s)| (*id, *s)).collect())
    }

    fn insert(&mut self, schedule: ReminderSchedule) -> Result<AlarmId> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| AlarmError::Store("alarm id space exhausted".to_string()))?;
        self.alarms.insert(id, schedule);
        Ok(id)
    }

    fn remove(&mut self, id: AlarmId) -> Result<()> {
        self.alarms
            .remove(&id)
            .map(|_| ())
            .ok_or(AlarmError::NotFound(id))
    }
}

/// A [`WakeScheduler`] that only records what is armed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryWakeScheduler {
    armed: BTreeMap<AlarmId, FiringSnapshot>,
}

impl MemoryWakeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed(&self, id: AlarmId) -> Option<&FiringSnapshot> {
        self.armed.get(&id)
    }

    pub fn pending(&self) -> impl Iterator<Item = (&AlarmId, &FiringSnapshot)> {
        self.armed.iter()
    }
}

impl WakeScheduler for MemoryWakeScheduler {
    fn arm(&mut self, id: AlarmId, snapshot: FiringSnapshot) -> Result<()> {
        self.armed.insert(id, snapshot);
        Ok(())
    }

    fn cancel(&mut self, id: AlarmId) -> Result<()> {
        self.armed.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::days::DaySet;
    use chrono::NaiveDate;

    fn schedule(h: u32) -> ReminderSchedule {
        ReminderSchedule::new(
            NaiveDate::from_ymd_opt(2026, 2, 18)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
            DaySet::EMPTY,
        )
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let mut store = MemoryStore::new();
        assert_eq!(store.insert(schedule(7)).unwrap(), 1);
        assert_eq!(store.insert(schedule(8)).unwrap(), 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut store = MemoryStore::new();
        let first = store.insert(schedule(7)).unwrap();
        store.remove(first).unwrap();
        assert_eq!(store.insert(schedule(8)).unwrap(), 2);
    }

    #[test]
    fn test_load_and_save() {
        let mut store = MemoryStore::new();
        let id = store.insert(schedule(7)).unwrap();
        let updated = ReminderSchedule {
            enabled: false,
            ..schedule(7)
        };
        store.save(id, updated).unwrap();
        assert_eq!(store.load(id).unwrap(), updated);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.load(9), Err(AlarmError::NotFound(9))));
        assert!(matches!(store.save(9, schedule(7)), Err(AlarmError::NotFound(9))));
        assert!(matches!(store.remove(9), Err(AlarmError::NotFound(9))));
    }

    #[test]
    fn test_load_all_ordered_by_id() {
        let mut store = MemoryStore::new();
        store.insert(schedule(9)).unwrap();
        store.insert(schedule(7)).unwrap();
        let ids: Vec<AlarmId> = store.load_all().unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_store_json_round_trip() {
        let mut store = MemoryStore::new();
        store.insert(schedule(7)).unwrap();
        let json = serde_json::to_string(&store).unwrap();
        let back: MemoryStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn test_wake_scheduler_replaces_and_cancels() {
        let mut waker = MemoryWakeScheduler::new();
        waker.arm(1, schedule(7).snapshot()).unwrap();
        waker.arm(1, schedule(8).snapshot()).unwrap();
        assert_eq!(waker.pending().count(), 1);
        assert_eq!(waker.armed(1), Some(&schedule(8).snapshot()));

        waker.cancel(1).unwrap();
        waker.cancel(1).unwrap();
        assert_eq!(waker.armed(1), None);
    }
}
