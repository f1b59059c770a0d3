#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use cadence::{
    config::Config,
    domain::{CalendarItem, CalendarItemType, Frequency, RecurrenceRule},
    engine::FixedClock,
    storage::JsonStore,
    Planner,
};
use chrono::{NaiveDate, TimeZone, Utc, Weekday};
use once_cell::sync::Lazy;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const TAKEOUT_ID: Uuid = Uuid::from_u128(0x1);
pub const PAYCHECK_ID: Uuid = Uuid::from_u128(0x2);
pub const RENT_ID: Uuid = Uuid::from_u128(0x3);
pub const GYM_ID: Uuid = Uuid::from_u128(0x4);
pub const BROKEN_ID: Uuid = Uuid::from_u128(0x5);

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// A Friday.
pub fn today() -> NaiveDate {
    date(2024, 3, 1)
}

pub fn fixture_rules() -> Vec<RecurrenceRule> {
    vec![
        RecurrenceRule::expense("Takeout", 50.0, Frequency::Weekly, date(2024, 1, 1))
            .with_id(TAKEOUT_ID)
            .on_weekday(Weekday::Fri),
        RecurrenceRule::earning("Paycheck", 1500.0, Frequency::BiWeekly, date(2024, 1, 5))
            .with_id(PAYCHECK_ID),
        RecurrenceRule::expense("Rent", 1200.0, Frequency::Monthly, date(2024, 1, 31))
            .with_id(RENT_ID),
        RecurrenceRule::new("Gym class", Frequency::Weekly, date(2024, 2, 1))
            .with_id(GYM_ID)
            .on_weekday(Weekday::Tue)
            .ending_on(date(2024, 3, 12)),
        RecurrenceRule::expense("Broken", 10.0, Frequency::from("hourly"), date(2024, 1, 1))
            .with_id(BROKEN_ID),
    ]
}

pub fn fixture_items() -> Vec<CalendarItem> {
    vec![
        CalendarItem::new(
            "evt-dentist",
            "Dentist",
            Utc.with_ymd_and_hms(2024, 3, 4, 15, 0, 0).unwrap(),
            CalendarItemType::Event,
        ),
        CalendarItem::new(
            "task-passport",
            "Renew passport",
            Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap(),
            CalendarItemType::Task,
        ),
        CalendarItem::new(
            "txn-old",
            "Groceries",
            Utc.with_ymd_and_hms(2024, 2, 20, 18, 0, 0).unwrap(),
            CalendarItemType::Transaction,
        ),
        CalendarItem::new(
            "habit-week",
            "Habits: 5/7",
            Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap(),
            CalendarItemType::HabitSummary,
        ),
    ]
}

/// A fresh empty directory kept alive for the whole test run.
pub fn scratch_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// A fresh data directory holding the fixture rules and items.
pub fn seeded_data_dir() -> PathBuf {
    let base = scratch_dir();
    let store = JsonStore::new(base.clone()).expect("create json store");
    store.save_rules(&fixture_rules()).expect("seed rules");
    store.save_items(&fixture_items()).expect("seed items");
    base
}

pub fn seeded_planner(config: Config) -> Planner {
    let store = JsonStore::new(seeded_data_dir()).expect("open json store");
    Planner::with_json_store(store, config).with_clock(FixedClock::new(today()))
}
