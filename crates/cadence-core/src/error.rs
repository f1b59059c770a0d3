use std::io;

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use cadence_domain::{Frequency, RecurrenceRule};

/// Broad classification of per-rule failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvariantViolation,
    MissingStartDate,
}

/// Failure attached to a single rule. Never fatal to a batch.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScheduleError {
    #[error("rule {rule_id}: unrecognized frequency `{frequency}`")]
    UnknownFrequency { rule_id: Uuid, frequency: String },
    #[error("rule {rule_id}: occurrence day {day} is out of range for {frequency} schedules")]
    OccurrenceDayOutOfRange {
        rule_id: Uuid,
        day: i32,
        frequency: Frequency,
    },
    #[error("rule {rule_id}: end date {end} precedes start date {start}")]
    EndBeforeStart {
        rule_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error(
        "rule {rule_id}: amount {amount} must be a finite, non-negative number up to {max}",
        max = crate::format::MAX_AMOUNT
    )]
    InvalidAmount { rule_id: Uuid, amount: f64 },
    #[error("rule {rule_id}: occurrence did not advance past {cursor}")]
    NonAdvancing { rule_id: Uuid, cursor: NaiveDate },
    #[error("rule {rule_id} has no start date")]
    MissingStartDate { rule_id: Uuid },
}

impl ScheduleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScheduleError::UnknownFrequency { .. }
            | ScheduleError::OccurrenceDayOutOfRange { .. }
            | ScheduleError::EndBeforeStart { .. }
            | ScheduleError::InvalidAmount { .. } => ErrorKind::Configuration,
            ScheduleError::NonAdvancing { .. } => ErrorKind::InvariantViolation,
            ScheduleError::MissingStartDate { .. } => ErrorKind::MissingStartDate,
        }
    }

    pub fn rule_id(&self) -> Uuid {
        match self {
            ScheduleError::UnknownFrequency { rule_id, .. }
            | ScheduleError::OccurrenceDayOutOfRange { rule_id, .. }
            | ScheduleError::EndBeforeStart { rule_id, .. }
            | ScheduleError::InvalidAmount { rule_id, .. }
            | ScheduleError::NonAdvancing { rule_id, .. }
            | ScheduleError::MissingStartDate { rule_id } => *rule_id,
        }
    }
}

/// A rule left out of a batch computation, reported next to the partial result.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRule {
    pub rule_id: Uuid,
    pub description: String,
    pub error: ScheduleError,
}

impl SkippedRule {
    pub(crate) fn record(rule: &RecurrenceRule, error: ScheduleError) -> Self {
        tracing::warn!(rule_id = %rule.id, description = %rule.description, %error, "skipping rule");
        Self {
            rule_id: rule.id,
            description: rule.description.clone(),
            error,
        }
    }
}

/// Failures raised by the external persistence collaborator.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Serde(err.to_string())
    }
}
