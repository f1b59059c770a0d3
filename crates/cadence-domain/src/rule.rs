//! Recurring schedule definitions as persisted by the backend store.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of money flow for financial rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Earning,
    Expense,
}

impl RuleKind {
    /// Multiplier applied to a rule's magnitude.
    pub fn sign(self) -> i64 {
        match self {
            RuleKind::Earning => 1,
            RuleKind::Expense => -1,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RuleKind::Earning => "earning",
            RuleKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

/// Cadence of a recurring rule.
///
/// Values the engine does not understand are preserved as
/// [`Frequency::Unrecognized`] so a single malformed record can be reported on
/// its own instead of failing the whole batch at deserialization time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Weekly,
    BiWeekly,
    Monthly,
    Unrecognized(String),
}

impl Frequency {
    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::BiWeekly => "bi-weekly",
            Frequency::Monthly => "monthly",
            Frequency::Unrecognized(raw) => raw,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Frequency::Weekly => "Weekly".into(),
            Frequency::BiWeekly => "Every 2 weeks".into(),
            Frequency::Monthly => "Monthly".into(),
            Frequency::Unrecognized(raw) => format!("Unknown ({raw})"),
        }
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Frequency::Weekly,
            "bi-weekly" | "biweekly" | "bi_weekly" => Frequency::BiWeekly,
            "monthly" => Frequency::Monthly,
            _ => Frequency::Unrecognized(value),
        }
    }
}

impl From<&str> for Frequency {
    fn from(value: &str) -> Self {
        Frequency::from(value.to_string())
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a monthly rule behaves when its day does not exist in a month
/// (the 31st in April, the 30th in February).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MonthOverflow {
    /// Fire on the last day of the short month.
    #[default]
    Clamp,
    /// Leave the short month without an occurrence.
    Skip,
}

/// A persisted recurring schedule.
///
/// `last_processed_date` is owned by the materialization job; this crate and
/// the engine only ever read it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurrenceRule {
    pub id: Uuid,
    pub description: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RuleKind>,
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence_day: Option<i32>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_processed_date: Option<NaiveDate>,
}

impl RecurrenceRule {
    /// Creates a calendar-only rule with no financial kind.
    pub fn new(
        description: impl Into<String>,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount: 0.0,
            kind: None,
            frequency,
            occurrence_day: None,
            start_date: Some(start_date),
            end_date: None,
            last_processed_date: None,
        }
    }

    pub fn earning(
        description: impl Into<String>,
        amount: f64,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self::new(description, frequency, start_date).with_money(RuleKind::Earning, amount)
    }

    pub fn expense(
        description: impl Into<String>,
        amount: f64,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self::new(description, frequency, start_date).with_money(RuleKind::Expense, amount)
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_money(mut self, kind: RuleKind, amount: f64) -> Self {
        self.kind = Some(kind);
        self.amount = amount;
        self
    }

    pub fn on_day(mut self, occurrence_day: i32) -> Self {
        self.occurrence_day = Some(occurrence_day);
        self
    }

    /// Sets the day-of-week using chrono's weekday, stored Sunday-based.
    pub fn on_weekday(self, weekday: Weekday) -> Self {
        self.on_day(weekday.num_days_from_sunday() as i32)
    }

    pub fn ending_on(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn processed_through(mut self, date: NaiveDate) -> Self {
        self.last_processed_date = Some(date);
        self
    }

    /// Financial rules carry a kind and participate in cash-flow forecasts.
    pub fn is_financial(&self) -> bool {
        self.kind.is_some()
    }

    /// Signed magnitude, positive for earnings and negative for expenses.
    pub fn signed_amount(&self) -> Option<f64> {
        self.kind.map(|kind| kind.sign() as f64 * self.amount)
    }

    /// Day-of-month of the start date, the monthly fallback when no day is set.
    pub fn start_day_of_month(&self) -> Option<u32> {
        self.start_date.map(|date| date.day())
    }
}

/// Maps the persisted Sunday-based index (0=Sunday..6=Saturday) to a weekday.
pub fn weekday_from_sunday_index(index: i32) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}
