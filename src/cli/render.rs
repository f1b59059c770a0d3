//! Plain-text rendering of engine results for the terminal.

use std::fmt::Write;

use cadence_core::{
    format::to_cents, AmountFormat, CashFlowForecast, RuleSummary, Timeline,
};
use cadence_domain::{EventPayload, RuleKind, TimelineEvent};

const NO_DATE: &str = "-";

pub fn forecast_table(forecast: &CashFlowForecast, format: &AmountFormat) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}  {:>14}  {:>14}  Events",
        "Date", "Change", "Balance"
    );
    for point in &forecast.points {
        let change = to_cents(point.change);
        let change = if change == 0 {
            String::new()
        } else {
            format.signed(change)
        };
        let _ = writeln!(
            out,
            "{:<10}  {:>14}  {:>14}  {}",
            point.date,
            change,
            format.plain(to_cents(point.balance)),
            point.events.join("; ")
        );
    }
    let totals = &forecast.totals;
    let _ = writeln!(
        out,
        "\n{} occurrence(s): inflow {}, outflow {}, net {}",
        totals.occurrences,
        format.plain(to_cents(totals.projected_inflow)),
        format.plain(to_cents(totals.projected_outflow)),
        format.signed(to_cents(totals.net)),
    );
    out
}

pub fn timeline_list(timeline: &Timeline, format: &AmountFormat) -> String {
    if timeline.events.is_empty() {
        return "No events in range.\n".to_string();
    }
    let mut out = String::new();
    for event in &timeline.events {
        let _ = writeln!(
            out,
            "{}  {:<5}  {:<19}  {}{}",
            event.date(),
            time_label(event),
            event.event_type.as_str(),
            event.title,
            amount_suffix(event, format)
        );
    }
    out
}

fn time_label(event: &TimelineEvent) -> String {
    if event.all_day {
        "--:--".to_string()
    } else {
        event.start.format("%H:%M").to_string()
    }
}

fn amount_suffix(event: &TimelineEvent, format: &AmountFormat) -> String {
    match &event.payload {
        EventPayload::Forecast(forecast) => match forecast.kind {
            Some(kind) => format!("  {}", format.signed(kind.sign() * to_cents(forecast.amount))),
            None => String::new(),
        },
        EventPayload::Item(_) => String::new(),
    }
}

pub fn rules_table(summaries: &[RuleSummary], format: &AmountFormat) -> String {
    if summaries.is_empty() {
        return "No recurring rules.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}  {:<24}  {:<16}  {:>14}",
        "Next due", "Rule", "Cadence", "Amount"
    );
    for summary in summaries {
        let next_due = summary
            .next_due
            .map(|date| date.to_string())
            .unwrap_or_else(|| NO_DATE.to_string());
        let amount = match summary.kind {
            Some(RuleKind::Earning) => format.signed(to_cents(summary.amount)),
            Some(RuleKind::Expense) => format.signed(-to_cents(summary.amount)),
            None => String::new(),
        };
        let _ = write!(
            out,
            "{:<10}  {:<24}  {:<16}  {:>14}",
            next_due, summary.description, summary.interval_label, amount
        );
        if let Some(err) = &summary.error {
            let _ = write!(out, "  ({err})");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};

    use cadence_core::{CalendarService, ForecastService, ScheduleService};
    use cadence_domain::{DateWindow, EventType, Frequency, RecurrenceRule};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn takeout() -> RecurrenceRule {
        RecurrenceRule::expense("Takeout", 50.0, Frequency::Weekly, date(2024, 1, 1))
            .on_weekday(Weekday::Fri)
    }

    #[test]
    fn forecast_table_lists_every_day_and_totals() {
        let forecast = ForecastService::default().forecast(&[takeout()], date(2024, 3, 1), 14);
        let table = forecast_table(&forecast, &AmountFormat::default());
        assert_eq!(table.lines().count(), 1 + 15 + 2);
        assert!(table.contains("2024-03-08"));
        assert!(table.contains("-$50.00: Takeout"));
        assert!(table.contains("2 occurrence(s): inflow $0.00, outflow $100.00, net -$100.00"));
    }

    #[test]
    fn timeline_shows_signed_forecast_amounts() {
        let timeline = CalendarService::default().aggregate(
            &[],
            &[takeout()],
            DateWindow::horizon(date(2024, 3, 1), 7),
            &EventType::all(),
        );
        let text = timeline_list(&timeline, &AmountFormat::default());
        assert_eq!(
            text,
            "2024-03-01  --:--  forecast             Takeout  -$50.00\n"
        );
        assert_eq!(
            timeline_list(&Timeline::default(), &AmountFormat::default()),
            "No events in range.\n"
        );
    }

    #[test]
    fn rules_table_marks_ended_and_broken_rules() {
        let rules = vec![
            takeout(),
            RecurrenceRule::new("Odd", Frequency::from("hourly"), date(2024, 1, 1)),
        ];
        let summaries = ScheduleService::default().summaries(&rules, date(2024, 3, 2));
        let text = rules_table(&summaries, &AmountFormat::default());
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].starts_with("2024-03-08"));
        assert!(lines[1].contains("-$50.00"));
        assert!(lines[2].starts_with("-"));
        assert!(lines[2].contains("Unknown (hourly)"));
        assert!(lines[2].contains("hourly"));
    }
}
