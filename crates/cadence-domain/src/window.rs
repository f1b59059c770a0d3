use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a window's end falls before its start.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("window end {end} is before start {start}")]
pub struct InvalidWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidWindow> {
        if end < start {
            return Err(InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window covering `days` days starting at `today`.
    pub fn horizon(today: NaiveDate, days: u32) -> Self {
        let end = today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start: today, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Overlap of both windows; empty (starting at the later start) when disjoint.
    pub fn intersect(&self, other: &DateWindow) -> DateWindow {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end).max(start);
        DateWindow { start, end }
    }
}
