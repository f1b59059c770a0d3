//! Contracts for the external persistence collaborator.
//!
//! Fetching happens before the engine runs; the engine itself never performs
//! I/O.

use cadence_domain::{CalendarItem, DateWindow, RecurrenceRule};

use crate::SourceError;

pub trait RuleSource: Send + Sync {
    fn list_recurring_rules(&self) -> Result<Vec<RecurrenceRule>, SourceError>;
}

pub trait CalendarSource: Send + Sync {
    /// Items whose start date falls inside `window`.
    fn list_calendar_items(&self, window: DateWindow) -> Result<Vec<CalendarItem>, SourceError>;
}

/// In-memory source for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub rules: Vec<RecurrenceRule>,
    pub items: Vec<CalendarItem>,
}

impl MemorySource {
    pub fn new(rules: Vec<RecurrenceRule>, items: Vec<CalendarItem>) -> Self {
        Self { rules, items }
    }
}

impl RuleSource for MemorySource {
    fn list_recurring_rules(&self) -> Result<Vec<RecurrenceRule>, SourceError> {
        Ok(self.rules.clone())
    }
}

impl CalendarSource for MemorySource {
    fn list_calendar_items(&self, window: DateWindow) -> Result<Vec<CalendarItem>, SourceError> {
        Ok(self
            .items
            .iter()
            .filter(|item| item.starts_within(&window))
            .cloned()
            .collect())
    }
}
