use cadence::{
    domain::{DateWindow, Frequency, RecurrenceRule},
    engine::{ForecastService, WindowExpander},
};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn build_rules(count: usize) -> Vec<RecurrenceRule> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0..count)
        .map(|idx| {
            let frequency = match idx % 3 {
                0 => Frequency::Weekly,
                1 => Frequency::BiWeekly,
                _ => Frequency::Monthly,
            };
            let day = match frequency {
                Frequency::Monthly => (idx % 31) as i32 + 1,
                _ => (idx % 7) as i32,
            };
            RecurrenceRule::expense(format!("Rule {idx}"), 10.0 + idx as f64, frequency, start)
                .on_day(day)
        })
        .collect()
}

fn bench_expansion(c: &mut Criterion) {
    let rules = build_rules(1_000);
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let expander = WindowExpander::default();

    c.bench_function("expand_1k_rules_one_year", |b| {
        let window = DateWindow::horizon(today, 365);
        b.iter(|| {
            let total: usize = rules
                .iter()
                .map(|rule| expander.collect(rule, window).map(|dates| dates.len()).unwrap_or(0))
                .sum();
            black_box(total);
        })
    });

    c.bench_function("forecast_1k_rules_90_days", |b| {
        let service = ForecastService::default();
        b.iter(|| {
            let forecast = service.forecast(black_box(&rules), today, 90);
            black_box(forecast);
        })
    });
}

criterion_group!(benches, bench_expansion);
criterion_main!(benches);
