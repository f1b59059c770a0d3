//! One-off calendar items and the merged timeline event shape.

use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{rule::RuleKind, window::DateWindow};

/// Categories of externally supplied calendar items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CalendarItemType {
    Event,
    Task,
    Transaction,
    HabitSummary,
    TransactionSummary,
}

/// An item created and owned outside the engine. Only ever read here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarItem {
    pub item_id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub item_type: CalendarItemType,
    #[serde(default)]
    pub data: Value,
}

impl CalendarItem {
    pub fn new(
        item_id: impl Into<String>,
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        item_type: CalendarItemType,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            title: title.into(),
            start_time,
            end_time: None,
            item_type,
            data: Value::Null,
        }
    }

    pub fn starts_within(&self, window: &DateWindow) -> bool {
        window.contains(self.start_time.date_naive())
    }
}

/// Type tag of a merged timeline entry; the multi-select filter works on these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Event,
    Task,
    Transaction,
    HabitSummary,
    TransactionSummary,
    Forecast,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        EventType::Event,
        EventType::Task,
        EventType::Transaction,
        EventType::HabitSummary,
        EventType::TransactionSummary,
        EventType::Forecast,
    ];

    pub fn all() -> BTreeSet<EventType> {
        Self::ALL.into_iter().collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Event => "event",
            EventType::Task => "task",
            EventType::Transaction => "transaction",
            EventType::HabitSummary => "habit_summary",
            EventType::TransactionSummary => "transaction_summary",
            EventType::Forecast => "forecast",
        }
    }
}

impl From<CalendarItemType> for EventType {
    fn from(value: CalendarItemType) -> Self {
        match value {
            CalendarItemType::Event => EventType::Event,
            CalendarItemType::Task => EventType::Task,
            CalendarItemType::Transaction => EventType::Transaction,
            CalendarItemType::HabitSummary => EventType::HabitSummary,
            CalendarItemType::TransactionSummary => EventType::TransactionSummary,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        EventType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("unknown event type `{}`", value.trim()))
    }
}

/// Occurrence synthesized from a recurring rule. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastEvent {
    pub id: String,
    pub rule_id: Uuid,
    pub description: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RuleKind>,
    pub date: NaiveDate,
}

impl ForecastEvent {
    /// Identifier derived from the rule and the occurrence date only, so
    /// recomputing a timeline yields the same ids.
    pub fn id_for(rule_id: Uuid, date: NaiveDate) -> String {
        format!("forecast-{}-{}", rule_id, date.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EventPayload {
    Forecast(ForecastEvent),
    Item(Value),
}

/// Common shape for every entry of the merged timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub payload: EventPayload,
}

impl TimelineEvent {
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn is_forecast(&self) -> bool {
        self.event_type == EventType::Forecast
    }
}

impl From<&CalendarItem> for TimelineEvent {
    fn from(item: &CalendarItem) -> Self {
        Self {
            id: item.item_id.clone(),
            title: item.title.clone(),
            start: item.start_time,
            end: item.end_time,
            all_day: false,
            event_type: item.item_type.into(),
            payload: EventPayload::Item(item.data.clone()),
        }
    }
}

impl From<ForecastEvent> for TimelineEvent {
    fn from(event: ForecastEvent) -> Self {
        Self {
            id: event.id.clone(),
            title: event.description.clone(),
            start: event.date.and_time(NaiveTime::MIN).and_utc(),
            end: None,
            all_day: true,
            event_type: EventType::Forecast,
            payload: EventPayload::Forecast(event),
        }
    }
}
