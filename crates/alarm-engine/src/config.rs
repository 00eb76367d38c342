//! Tunables for the orchestration layer.

use serde::{Deserialize, Serialize};

use crate::countdown::DEFAULT_LESS_THAN_MARKER;
use crate::error::{AlarmError, Result};

const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How far a snooze defers the firing.
    pub snooze_minutes: u32,
    /// Offset from the current minute given to a freshly created reminder.
    pub default_lead_minutes: u32,
    /// Prefix for a countdown with less than a minute left.
    pub less_than_marker: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snooze_minutes: 10,
            default_lead_minutes: 1,
            less_than_marker: DEFAULT_LESS_THAN_MARKER.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(s).map_err(|e| AlarmError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.snooze_minutes == 0 || self.snooze_minutes > MINUTES_PER_DAY {
            return Err(AlarmError::InvalidConfig(format!(
                "snooze_minutes must be between 1 and {MINUTES_PER_DAY}, got {}",
                self.snooze_minutes
            )));
        }
        if self.default_lead_minutes > MINUTES_PER_DAY {
            return Err(AlarmError::InvalidConfig(format!(
                "default_lead_minutes must be at most {MINUTES_PER_DAY}, got {}",
                self.default_lead_minutes
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.snooze_minutes, 10);
        assert_eq!(config.default_lead_minutes, 1);
        assert_eq!(config.less_than_marker, "<");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EngineConfig::from_json_str(r#"{"snooze_minutes": 5}"#).unwrap();
        assert_eq!(config.snooze_minutes, 5);
        assert_eq!(config.default_lead_minutes, 1);
    }

    #[test]
    fn test_zero_snooze_rejected() {
        let err = EngineConfig::from_json_str(r#"{"snooze_minutes": 0}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("Invalid config"), "got: {err}");
        assert!(err.contains("snooze_minutes"), "got: {err}");
    }

    #[test]
    fn test_oversized_lead_rejected() {
        let result = EngineConfig::from_json_str(r#"{"default_lead_minutes": 2000}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = EngineConfig::from_json_str("{snooze");
        assert!(matches!(result, Err(AlarmError::InvalidConfig(_))));
    }
}
