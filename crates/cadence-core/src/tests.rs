use chrono::{NaiveDate, TimeZone, Utc, Weekday};

use crate::{
    calendar_service::CalendarService, expander::WindowExpander,
    forecast_service::ForecastService, next_occurrence, schedule_service::ScheduleService,
    CalendarSource, Clock, FixedClock, MemorySource, RuleSource,
};
use cadence_domain::{
    CalendarItem, CalendarItemType, DateWindow, EventType, Frequency, MonthOverflow,
    RecurrenceRule,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn household_rules() -> Vec<RecurrenceRule> {
    vec![
        RecurrenceRule::earning("Paycheck", 1800.0, Frequency::BiWeekly, date(2024, 1, 5)),
        RecurrenceRule::expense("Rent", 1450.0, Frequency::Monthly, date(2024, 1, 1)).on_day(31),
        RecurrenceRule::expense("Groceries", 120.25, Frequency::Weekly, date(2024, 1, 1))
            .on_weekday(Weekday::Sun),
        RecurrenceRule::new("Piano lesson", Frequency::Weekly, date(2024, 1, 2)),
    ]
}

#[test]
fn forecast_and_timeline_agree_on_financial_occurrences() {
    let clock = FixedClock::new(date(2024, 2, 10));
    let today = clock.today();
    let rules = household_rules();

    let forecast = ForecastService::default().forecast(&rules, today, 30);
    let timeline = CalendarService::default().aggregate(
        &[],
        &rules,
        DateWindow::horizon(today, 30),
        &EventType::all(),
    );

    let financial_forecasts = timeline
        .forecasts()
        .filter(|event| !event.title.starts_with("Piano"))
        .count();
    assert_eq!(forecast.totals.occurrences, financial_forecasts);
    let annotated: usize = forecast.points.iter().map(|p| p.events.len()).sum();
    assert_eq!(annotated, forecast.totals.occurrences);
}

#[test]
fn rent_on_the_thirty_first_clamps_in_february() {
    let rules = household_rules();
    let forecast = ForecastService::default().forecast(&rules, date(2024, 2, 10), 30);
    let feb_29 = forecast
        .points
        .iter()
        .find(|p| p.date == date(2024, 2, 29))
        .expect("leap day in horizon");
    assert!(feb_29.events.iter().any(|e| e == "-$1,450.00: Rent"));
}

#[test]
fn skip_policy_drops_february_rent() {
    let expander = WindowExpander::new(MonthOverflow::Skip);
    let service = ForecastService::new(expander, Default::default());
    let forecast = service.forecast(&household_rules(), date(2024, 2, 10), 30);
    assert!(forecast
        .points
        .iter()
        .flat_map(|p| p.events.iter())
        .all(|e| !e.ends_with("Rent")));
}

#[test]
fn memory_source_slices_items_by_window() {
    let source = MemorySource::new(
        household_rules(),
        vec![
            CalendarItem::new(
                "in",
                "Inside",
                Utc.with_ymd_and_hms(2024, 2, 12, 8, 0, 0).unwrap(),
                CalendarItemType::Event,
            ),
            CalendarItem::new(
                "out",
                "Outside",
                Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap(),
                CalendarItemType::Event,
            ),
        ],
    );
    let window = DateWindow::new(date(2024, 2, 1), date(2024, 3, 1)).unwrap();
    let items = source.list_calendar_items(window).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item_id, "in");
    assert_eq!(source.list_recurring_rules().unwrap().len(), 4);
}

#[test]
fn no_emitted_date_precedes_start_or_follows_end() {
    let start = date(2024, 2, 14);
    let end = date(2024, 4, 20);
    let rules = vec![
        RecurrenceRule::new("w", Frequency::Weekly, start).on_day(1).ending_on(end),
        RecurrenceRule::new("b", Frequency::BiWeekly, start).on_day(3).ending_on(end),
        RecurrenceRule::new("m", Frequency::Monthly, start).on_day(10).ending_on(end),
    ];
    let (events, skipped) = CalendarService::default()
        .forecast_events(&rules, DateWindow::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap());
    assert!(skipped.is_empty());
    assert!(!events.is_empty());
    for event in events {
        assert!(event.date >= start, "{} before start", event.date);
        assert!(event.date <= end, "{} after end", event.date);
    }
}

#[test]
fn next_due_matches_single_step_generator() {
    let rule = RecurrenceRule::expense("Gym", 30.0, Frequency::Monthly, date(2024, 1, 15));
    let today = date(2024, 3, 20);
    let next_due = ScheduleService::default().next_due(&rule, today).unwrap();
    let stepped = next_occurrence(today, &rule).unwrap();
    assert_eq!(next_due, Some(stepped));
    assert_eq!(stepped, date(2024, 4, 15));
}
