//! Orchestration of the scheduling core against storage and wake-ups.
//!
//! [`AlarmService`] is the one place that reads a schedule, applies the pure
//! functions, persists the result, and then arms or cancels the wake-up. The
//! caller samples the clock and passes "now" into every method.
//!
//! Each method takes `&mut self`, so one service instance never runs two
//! read-modify-write cycles at once. A store shared between several services
//! (or processes) must provide its own per-id exclusion.

use chrono::{NaiveDateTime, NaiveTime};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::countdown::{countdown, Countdown};
use crate::days::DaySet;
use crate::error::Result;
use crate::futurize::{futurize, next_slot};
use crate::schedule::{default_occurrence, truncate_to_minute, FiringSnapshot, ReminderSchedule};
use crate::staleness::{clean, is_dirty};
use crate::store::{AlarmId, ScheduleStore, WakeScheduler};

/// What a delivered wake-up turned out to mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeOutcome {
    /// The reminder was due. Carries the firing that elapsed; the stored
    /// schedule has already been repaired and re-armed.
    Fire(FiringSnapshot),
    /// Woken before the effective firing (e.g. the reminder was edited after
    /// the wake-up was armed). Re-armed for the carried snapshot.
    NotDue(FiringSnapshot),
    /// The reminder is disabled. Any pending wake-up was cancelled.
    Inactive,
}

pub struct AlarmService<S, W> {
    store: S,
    waker: W,
    config: EngineConfig,
}

impl<S: ScheduleStore, W: WakeScheduler> AlarmService<S, W> {
    pub fn new(store: S, waker: W, config: EngineConfig) -> Self {
        Self {
            store,
            waker,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn waker(&self) -> &W {
        &self.waker
    }

    pub fn into_parts(self) -> (S, W) {
        (self.store, self.waker)
    }

    pub fn get(&self, id: AlarmId) -> Result<ReminderSchedule> {
        self.store.load(id)
    }

    pub fn list(&self) -> Result<Vec<(AlarmId, ReminderSchedule)>> {
        self.store.load_all()
    }

    // ── edits ───────────────────────────────────────────────────────────

    /// Create an enabled reminder at the next valid `time_of_day`.
    pub fn create(
        &mut self,
        now: NaiveDateTime,
        time_of_day: NaiveTime,
        repeat: DaySet,
    ) -> Result<(AlarmId, ReminderSchedule)> {
        let now = truncate_to_minute(now);
        let draft = ReminderSchedule::new(now.date().and_time(time_of_day), repeat);
        let schedule = ReminderSchedule {
            occurrence: futurize(now, &draft),
            ..draft
        };
        self.insert(schedule)
    }

    /// Create a one-shot reminder a configured lead time after `now`.
    pub fn create_default(&mut self, now: NaiveDateTime) -> Result<(AlarmId, ReminderSchedule)> {
        let occurrence = default_occurrence(now, self.config.default_lead_minutes);
        self.insert(ReminderSchedule::new(occurrence, DaySet::EMPTY))
    }

    fn insert(&mut self, schedule: ReminderSchedule) -> Result<(AlarmId, ReminderSchedule)> {
        let id = self.store.insert(schedule)?;
        info!("created alarm {id} for {}", schedule.occurrence);
        self.sync_wake(id, &schedule)?;
        Ok((id, schedule))
    }

    /// Switch a reminder on or off.
    ///
    /// Turning on moves a past occurrence into the future. Turning off drops
    /// any pending snooze. Setting the current state again changes nothing.
    pub fn set_enabled(
        &mut self,
        id: AlarmId,
        enabled: bool,
        now: NaiveDateTime,
    ) -> Result<ReminderSchedule> {
        let now = truncate_to_minute(now);
        let current = self.store.load(id)?;
        if current.enabled == enabled {
            return Ok(current);
        }

        let updated = if enabled {
            ReminderSchedule {
                enabled: true,
                occurrence: futurize(now, &current),
                snooze_occurrence: None,
                ..current
            }
        } else {
            ReminderSchedule {
                enabled: false,
                snooze_occurrence: None,
                ..current
            }
        };

        debug!("alarm {id} enabled={enabled}, occurrence {}", updated.occurrence);
        self.commit(id, updated)
    }

    /// Change the time of day. An enabled reminder moves to the nearest slot
    /// for the new time right away.
    pub fn set_time_of_day(
        &mut self,
        id: AlarmId,
        time_of_day: NaiveTime,
        now: NaiveDateTime,
    ) -> Result<ReminderSchedule> {
        let current = self.store.load(id)?;
        let edited = ReminderSchedule {
            occurrence: truncate_to_minute(current.occurrence.date().and_time(time_of_day)),
            snooze_occurrence: None,
            ..current
        };
        self.refresh(id, edited, now)
    }

    /// Change the repeating days. An enabled reminder moves to the nearest
    /// slot for the new days right away.
    pub fn set_repeat(
        &mut self,
        id: AlarmId,
        repeat: DaySet,
        now: NaiveDateTime,
    ) -> Result<ReminderSchedule> {
        let current = self.store.load(id)?;
        let edited = ReminderSchedule {
            repeat,
            snooze_occurrence: None,
            ..current
        };
        self.refresh(id, edited, now)
    }

    fn refresh(
        &mut self,
        id: AlarmId,
        edited: ReminderSchedule,
        now: NaiveDateTime,
    ) -> Result<ReminderSchedule> {
        let now = truncate_to_minute(now);
        // The stored date was resolved for the old settings; never reuse it.
        let updated = if edited.enabled {
            ReminderSchedule {
                occurrence: next_slot(now, &edited),
                ..edited
            }
        } else {
            edited
        };
        self.commit(id, updated)
    }

    /// Defer the reminder by the configured snooze length.
    ///
    /// A one-shot that was just disabled by firing is switched back on until
    /// the snooze elapses. A reminder switched off by hand stays off and is
    /// returned unchanged.
    pub fn snooze(&mut self, id: AlarmId, now: NaiveDateTime) -> Result<ReminderSchedule> {
        let current = self.store.load(id)?;
        if !current.enabled && !just_fired(&current, truncate_to_minute(now)) {
            debug!("alarm {id} is off, not snoozing");
            return Ok(current);
        }
        let updated = ReminderSchedule {
            enabled: true,
            ..current.snoozed(now, self.config.snooze_minutes)
        };
        info!(
            "alarm {id} snoozed until {}",
            updated.effective_firing()
        );
        self.commit(id, updated)
    }

    /// Drop a pending snooze and settle the reminder.
    ///
    /// Repeating reminders stay on at their next occurrence; one-shots are
    /// switched off.
    pub fn dismiss(&mut self, id: AlarmId, now: NaiveDateTime) -> Result<ReminderSchedule> {
        let now = truncate_to_minute(now);
        let current = self.store.load(id)?;
        let cleared = ReminderSchedule {
            snooze_occurrence: None,
            ..current
        };
        let updated = if cleared.is_repeating() {
            ReminderSchedule {
                occurrence: futurize(now, &cleared),
                ..cleared
            }
        } else {
            ReminderSchedule {
                enabled: false,
                ..cleared
            }
        };
        debug!("alarm {id} dismissed");
        self.commit(id, updated)
    }

    pub fn delete(&mut self, id: AlarmId) -> Result<()> {
        self.waker.cancel(id)?;
        self.store.remove(id)?;
        info!("deleted alarm {id}");
        Ok(())
    }

    // ── wake-ups and maintenance ────────────────────────────────────────

    /// Handle a delivered wake-up for `id`.
    ///
    /// Staleness is repaired and persisted before the firing is reported, so
    /// a late or duplicated delivery cannot fire the same slot twice.
    pub fn on_wake(&mut self, id: AlarmId, now: NaiveDateTime) -> Result<WakeOutcome> {
        let now = truncate_to_minute(now);
        let current = self.store.load(id)?;

        if !current.enabled {
            self.waker.cancel(id)?;
            debug!("wake for disabled alarm {id}, cancelled");
            return Ok(WakeOutcome::Inactive);
        }

        if !is_dirty(now, &current) {
            let snapshot = current.snapshot();
            self.waker.arm(id, snapshot)?;
            debug!("early wake for alarm {id}, re-armed for {}", snapshot.firing_at);
            return Ok(WakeOutcome::NotDue(snapshot));
        }

        let fired = current.snapshot();
        self.commit(id, clean(now, current))?;
        info!("alarm {id} firing for {}", fired.firing_at);
        Ok(WakeOutcome::Fire(fired))
    }

    /// Repair every stale reminder and re-arm every enabled one.
    ///
    /// Run after boot, a clock change, or any time wake-ups may have been
    /// lost. Returns the ids that needed repair.
    pub fn maintain(&mut self, now: NaiveDateTime) -> Result<Vec<AlarmId>> {
        let now = truncate_to_minute(now);
        let mut repaired = Vec::new();

        for (id, schedule) in self.store.load_all()? {
            if is_dirty(now, &schedule) {
                let cleaned = clean(now, schedule);
                info!(
                    "repaired stale alarm {id}: {} -> {}",
                    schedule.effective_firing(),
                    if cleaned.enabled {
                        cleaned.occurrence.to_string()
                    } else {
                        "disabled".to_string()
                    }
                );
                self.commit(id, cleaned)?;
                repaired.push(id);
            } else {
                self.sync_wake(id, &schedule)?;
            }
        }

        Ok(repaired)
    }

    // ── display ─────────────────────────────────────────────────────────

    /// The soonest enabled reminder still ahead of `now`.
    pub fn next_firing(&self, now: NaiveDateTime) -> Result<Option<(AlarmId, FiringSnapshot)>> {
        Ok(self
            .store
            .load_all()?
            .into_iter()
            .filter(|(_, s)| s.enabled && s.effective_firing() > now)
            .map(|(id, s)| (id, s.snapshot()))
            .min_by_key(|(id, snapshot)| (snapshot.firing_at, *id)))
    }

    /// Time left until the soonest reminder. `now` keeps its seconds.
    pub fn countdown(&self, now: NaiveDateTime) -> Result<Option<Countdown>> {
        Ok(self
            .next_firing(now)?
            .map(|(_, snapshot)| countdown(now, snapshot.firing_at)))
    }

    /// [`Self::countdown`] rendered with the configured marker.
    pub fn render_countdown(&self, now: NaiveDateTime) -> Result<Option<String>> {
        Ok(self
            .countdown(now)?
            .map(|c| c.render(&self.config.less_than_marker)))
    }

    // ── internals ───────────────────────────────────────────────────────

    fn commit(&mut self, id: AlarmId, schedule: ReminderSchedule) -> Result<ReminderSchedule> {
        self.store.save(id, schedule)?;
        self.sync_wake(id, &schedule)?;
        Ok(schedule)
    }

    fn sync_wake(&mut self, id: AlarmId, schedule: &ReminderSchedule) -> Result<()> {
        if schedule.enabled {
            let snapshot = schedule.snapshot();
            debug!("arming alarm {id} for {}", snapshot.firing_at);
            self.waker.arm(id, snapshot)
        } else {
            debug!("cancelling wake-up for alarm {id}");
            self.waker.cancel(id)
        }
    }
}

/// `true` for a disabled one-shot whose firing has elapsed, the state
/// [`clean`] leaves behind after it fires.
fn just_fired(schedule: &ReminderSchedule, now: NaiveDateTime) -> bool {
    !schedule.is_repeating() && schedule.effective_firing() <= now
}
