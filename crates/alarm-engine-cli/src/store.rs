//! File-backed persistence and a logging stand-in for platform wake-ups.

use std::path::Path;

use alarm_engine::error::Result as AlarmResult;
use alarm_engine::{AlarmId, FiringSnapshot, MemoryStore, WakeScheduler};
use anyhow::Context;
use tracing::info;

/// Read the JSON store at `path`. A missing file is an empty store.
pub fn load_store(path: &Path) -> anyhow::Result<MemoryStore> {
    if !path.exists() {
        return Ok(MemoryStore::new());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read store {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse store {}", path.display()))
}

/// Write the store to `path`, replacing the previous file in one rename.
pub fn save_store(path: &Path, store: &MemoryStore) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(store)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace store {}", path.display()))?;
    Ok(())
}

/// Registers nothing with the OS; records each arm and cancel in the log.
pub struct LogWakeScheduler;

impl WakeScheduler for LogWakeScheduler {
    fn arm(&mut self, id: AlarmId, snapshot: FiringSnapshot) -> AlarmResult<()> {
        info!("wake-up for alarm {id} at {}", snapshot.firing_at);
        Ok(())
    }

    fn cancel(&mut self, id: AlarmId) -> AlarmResult<()> {
        info!("wake-up for alarm {id} cancelled");
        Ok(())
    }
}
