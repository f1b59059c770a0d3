//! Day-by-day running balance projected from financial rules.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use cadence_domain::{CashFlowPoint, DateWindow, ForecastTotals, RecurrenceRule, RuleKind};

use crate::{
    expander::WindowExpander,
    format::{from_cents, to_cents, AmountFormat, MAX_AMOUNT},
    ScheduleError, SkippedRule,
};

pub const DEFAULT_HORIZON_DAYS: u32 = 30;

/// Relative cash-flow projection: balances are the change from "now", not an
/// account balance.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowForecast {
    pub today: NaiveDate,
    pub horizon_days: u32,
    pub points: Vec<CashFlowPoint>,
    pub totals: ForecastTotals,
    pub skipped: Vec<SkippedRule>,
}

impl CashFlowForecast {
    pub fn final_balance(&self) -> f64 {
        self.points.last().map(|point| point.balance).unwrap_or(0.0)
    }
}

#[derive(Debug, Default)]
struct DayBucket {
    change: i64,
    events: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ForecastService {
    expander: WindowExpander,
    format: AmountFormat,
}

impl ForecastService {
    pub fn new(expander: WindowExpander, format: AmountFormat) -> Self {
        Self { expander, format }
    }

    /// Projects `horizon_days + 1` points: today plus each following day.
    ///
    /// Occurrences are collected over `[today, today + horizon_days)`. Rules
    /// without a kind are calendar-only and ignored. Amounts are summed in
    /// whole cents; a rule whose total would overflow them is skipped.
    pub fn forecast(
        &self,
        rules: &[RecurrenceRule],
        today: NaiveDate,
        horizon_days: u32,
    ) -> CashFlowForecast {
        let window = DateWindow::horizon(today, horizon_days);
        let mut days: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
        let mut occurrences = 0usize;
        let mut inflow = 0i64;
        let mut outflow = 0i64;
        let mut skipped = Vec::new();

        for rule in rules {
            let Some(kind) = rule.kind else {
                continue;
            };
            let expanded = validated_cents(rule).and_then(|cents| {
                self.expander
                    .collect(rule, window)
                    .map(|dates| (cents, dates))
            });
            let (cents, dates) = match expanded {
                Ok(found) => found,
                Err(err) => {
                    skipped.push(SkippedRule::record(rule, err));
                    continue;
                }
            };
            let total = match kind {
                RuleKind::Earning => &mut inflow,
                RuleKind::Expense => &mut outflow,
            };
            let updated = i64::try_from(dates.len())
                .ok()
                .and_then(|count| cents.checked_mul(count))
                .and_then(|rule_total| total.checked_add(rule_total));
            let Some(updated) = updated else {
                skipped.push(SkippedRule::record(
                    rule,
                    ScheduleError::InvalidAmount {
                        rule_id: rule.id,
                        amount: rule.amount,
                    },
                ));
                continue;
            };
            *total = updated;
            occurrences += dates.len();

            // Day changes and the running balance stay within [-outflow, inflow].
            let delta = kind.sign() * cents;
            for date in dates {
                let bucket = days.entry(date).or_default();
                bucket.change += delta;
                bucket.events.push(self.format.describe(delta, &rule.description));
            }
        }

        let mut balance = 0i64;
        let points = today
            .iter_days()
            .take(horizon_days as usize + 1)
            .map(|date| {
                let bucket = days.remove(&date).unwrap_or_default();
                balance += bucket.change;
                CashFlowPoint {
                    date,
                    balance: from_cents(balance),
                    change: from_cents(bucket.change),
                    events: bucket.events,
                }
            })
            .collect();

        let totals = ForecastTotals {
            occurrences,
            projected_inflow: from_cents(inflow),
            projected_outflow: from_cents(outflow),
            net: from_cents(inflow - outflow),
        };
        tracing::debug!(%today, horizon_days, occurrences, skipped = skipped.len(), "computed forecast");

        CashFlowForecast {
            today,
            horizon_days,
            points,
            totals,
            skipped,
        }
    }
}

fn validated_cents(rule: &RecurrenceRule) -> Result<i64, ScheduleError> {
    if !(0.0..=MAX_AMOUNT).contains(&rule.amount) {
        return Err(ScheduleError::InvalidAmount {
            rule_id: rule.id,
            amount: rule.amount,
        });
    }
    Ok(to_cents(rule.amount))
}
