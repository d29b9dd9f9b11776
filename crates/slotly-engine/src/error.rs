//! Error types for slotly-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::availability::Reason;
use crate::config::{ScheduleMode, ScheduleType};

/// Structurally invalid scheduling input, raised while normalizing.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Lead time must not be negative (got {0} hours)")]
    NegativeLeadTime(i64),

    #[error("Earliest days must not be negative (got {0})")]
    NegativeEarliestDays(i64),

    #[error("Furthest days must not be negative (got {0})")]
    NegativeFurthestDays(i64),

    #[error("Lead time of {0} hours is too large")]
    LeadTimeTooLarge(i64),

    #[error("Blocked date range ends before it starts ({from} to {to})")]
    InvertedRange { from: NaiveDate, to: NaiveDate },

    #[error("Invalid timezone: {0}")]
    UnknownTimezone(String),

    #[error("Unknown weekday: {0}")]
    UnknownWeekday(String),

    #[error("Closed day index {0} is outside 0 (Sunday) to 6 (Saturday)")]
    WeekdayIndexOutOfRange(i64),

    #[error("Invalid date for {field}: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid cutoff time: {0}")]
    InvalidCutoff(String),

    #[error("Blocked date rule '{kind}' is missing {field}")]
    IncompleteRule {
        kind: &'static str,
        field: &'static str,
    },

    #[error("Unknown blocked date rule kind: {0}")]
    UnknownRuleKind(String),

    #[error("Unknown schedule mode: {0}")]
    UnknownMode(String),

    #[error("Configuration JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A candidate date or horizon the engine cannot evaluate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidCandidateError {
    #[error("Horizon must not be negative (got {0} days)")]
    NegativeHorizon(i64),

    #[error("Date out of representable range: {0}")]
    OutOfRange(String),
}

/// Rejection of a shopper's selected date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("{requested} is not offered in {mode} mode")]
    ModeNotOffered {
        mode: ScheduleMode,
        requested: ScheduleType,
    },

    #[error("{date} is not available: {reason}")]
    Unavailable { date: NaiveDate, reason: Reason },

    #[error(transparent)]
    InvalidCandidate(#[from] InvalidCandidateError),
}
