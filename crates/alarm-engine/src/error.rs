//! Error types for alarm-engine operations.
//!
//! The recurrence, futurization, staleness, and countdown functions are total
//! and never produce these. They come from parsing user input, validating
//! configuration, and the persistence and wake-scheduling ports.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlarmError {
    #[error("Invalid days: {0}")]
    InvalidDays(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Alarm not found: {0}")]
    NotFound(u64),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, AlarmError>;
