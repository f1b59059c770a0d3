//! Merges one-off calendar items with recurring forecasts into a single timeline.

use std::collections::BTreeSet;

use cadence_domain::{
    CalendarItem, DateWindow, EventType, ForecastEvent, RecurrenceRule, TimelineEvent,
};

use crate::{expander::WindowExpander, SkippedRule};

/// Filtered, typed timeline plus the rules that could not be expanded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    pub events: Vec<TimelineEvent>,
    pub skipped: Vec<SkippedRule>,
}

impl Timeline {
    pub fn forecasts(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter().filter(|event| event.is_forecast())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarService {
    expander: WindowExpander,
}

impl CalendarService {
    pub fn new(expander: WindowExpander) -> Self {
        Self { expander }
    }

    /// Synthesizes one forecast event per occurrence of every rule over `horizon`.
    ///
    /// Rules are processed in input order; a failing rule contributes nothing
    /// and is reported instead.
    pub fn forecast_events(
        &self,
        rules: &[RecurrenceRule],
        horizon: DateWindow,
    ) -> (Vec<ForecastEvent>, Vec<SkippedRule>) {
        let mut events = Vec::new();
        let mut skipped = Vec::new();
        for rule in rules {
            match self.expander.collect(rule, horizon) {
                Ok(dates) => events.extend(dates.into_iter().map(|date| ForecastEvent {
                    id: ForecastEvent::id_for(rule.id, date),
                    rule_id: rule.id,
                    description: rule.description.clone(),
                    amount: rule.amount,
                    kind: rule.kind,
                    date,
                })),
                Err(err) => skipped.push(SkippedRule::record(rule, err)),
            }
        }
        (events, skipped)
    }

    /// Builds the merged timeline.
    ///
    /// Base items keep their own type; forecasts are tagged
    /// [`EventType::Forecast`]. Nothing is deduplicated: forecasts only cover
    /// occurrences that have not been materialized. Order is base items first,
    /// then forecasts rule by rule.
    pub fn aggregate(
        &self,
        base_items: &[CalendarItem],
        rules: &[RecurrenceRule],
        horizon: DateWindow,
        active_types: &BTreeSet<EventType>,
    ) -> Timeline {
        let (forecasts, skipped) = self.forecast_events(rules, horizon);
        let events: Vec<TimelineEvent> = base_items
            .iter()
            .map(TimelineEvent::from)
            .chain(forecasts.into_iter().map(TimelineEvent::from))
            .filter(|event| active_types.contains(&event.event_type))
            .collect();
        tracing::debug!(
            items = base_items.len(),
            rules = rules.len(),
            events = events.len(),
            skipped = skipped.len(),
            "aggregated timeline"
        );
        Timeline { events, skipped }
    }
}
