//! Façade wiring the data sources, clock and configuration to the engine.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use cadence_config::{Config, MAX_HORIZON_DAYS};
use cadence_core::{
    AmountFormat, CalendarService, CalendarSource, CashFlowForecast, Clock, ForecastService,
    RuleSource, RuleSummary, ScheduleService, SystemClock, Timeline, WindowExpander,
};
use cadence_domain::{DateWindow, EventType};
use cadence_storage_json::JsonStore;

use crate::errors::{CadenceError, Result};

/// Fetches rules and calendar items, then runs the pure engine over them.
///
/// Source failures abort the call before any computation; per-rule problems
/// come back as skipped rules on the result.
pub struct Planner {
    rules: Box<dyn RuleSource>,
    calendar: Box<dyn CalendarSource>,
    clock: Box<dyn Clock>,
    config: Config,
}

impl Planner {
    pub fn new(
        rules: Box<dyn RuleSource>,
        calendar: Box<dyn CalendarSource>,
        clock: Box<dyn Clock>,
        config: Config,
    ) -> Self {
        Self {
            rules,
            calendar,
            clock,
            config,
        }
    }

    /// Planner reading both rules and items from one JSON data directory.
    pub fn with_json_store(store: JsonStore, config: Config) -> Self {
        Self::new(
            Box::new(store.clone()),
            Box::new(store),
            Box::new(SystemClock),
            config,
        )
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn amount_format(&self) -> AmountFormat {
        amount_format_for(&self.config)
    }

    fn expander(&self) -> WindowExpander {
        WindowExpander::new(self.config.month_overflow)
    }

    fn horizon_days(&self, requested: Option<u32>) -> Result<u32> {
        let days = requested.unwrap_or(self.config.horizon_days);
        if days > MAX_HORIZON_DAYS {
            return Err(CadenceError::InvalidInput(format!(
                "horizon of {days} days exceeds the maximum of {MAX_HORIZON_DAYS}"
            )));
        }
        Ok(days)
    }

    /// Running balance from today over `horizon_days` (config default when `None`).
    pub fn forecast(&self, horizon_days: Option<u32>) -> Result<CashFlowForecast> {
        let days = self.horizon_days(horizon_days)?;
        let today = self.today();
        let rules = self.rules.list_recurring_rules()?;
        tracing::info!(%today, days, rules = rules.len(), "running cash-flow forecast");

        let service = ForecastService::new(self.expander(), self.amount_format());
        Ok(service.forecast(&rules, today, days))
    }

    /// Merged timeline over `window`, filtered by `active_types` or the
    /// configured filter when `None`.
    ///
    /// Stored items are sliced by `window`; forecasts only cover the part of
    /// it inside the configured horizon starting today.
    pub fn timeline(
        &self,
        window: DateWindow,
        active_types: Option<&BTreeSet<EventType>>,
    ) -> Result<Timeline> {
        let horizon = DateWindow::horizon(self.today(), self.config.horizon_days);
        self.merged(window, window.intersect(&horizon), active_types)
    }

    /// Timeline from today over `days` (config default when `None`).
    pub fn upcoming(
        &self,
        days: Option<u32>,
        active_types: Option<&BTreeSet<EventType>>,
    ) -> Result<Timeline> {
        let days = self.horizon_days(days)?;
        let window = DateWindow::horizon(self.today(), days);
        self.merged(window, window, active_types)
    }

    fn merged(
        &self,
        window: DateWindow,
        forecast_window: DateWindow,
        active_types: Option<&BTreeSet<EventType>>,
    ) -> Result<Timeline> {
        let items = self.calendar.list_calendar_items(window)?;
        let rules = self.rules.list_recurring_rules()?;
        let active = active_types.unwrap_or(&self.config.active_types);
        tracing::info!(
            start = %window.start,
            end = %window.end,
            forecast_start = %forecast_window.start,
            forecast_end = %forecast_window.end,
            items = items.len(),
            rules = rules.len(),
            "building timeline"
        );

        let service = CalendarService::new(self.expander());
        Ok(service.aggregate(&items, &rules, forecast_window, active))
    }

    pub fn rule_summaries(&self) -> Result<Vec<RuleSummary>> {
        let rules = self.rules.list_recurring_rules()?;
        let today = self.today();
        tracing::info!(%today, rules = rules.len(), "summarising rules");
        Ok(ScheduleService::new(self.expander()).summaries(&rules, today))
    }
}

/// Currency symbol from the config; comma decimals for locales that use them.
pub fn amount_format_for(config: &Config) -> AmountFormat {
    let format = AmountFormat::for_currency(&config.currency);
    let language = config
        .locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match language.as_str() {
        "de" | "es" | "it" | "nl" | "pt" | "da" | "id" | "tr" => format.with_separators(',', '.'),
        "fr" | "sv" | "nb" | "fi" | "pl" | "cs" => format.with_separators(',', ' '),
        _ => format,
    }
}
