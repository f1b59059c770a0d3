//! Single-step occurrence generation.
//!
//! Every supported frequency compiles into a [`Schedule`] variant, and a
//! schedule answers exactly one question: which date is the first occurrence
//! strictly after a given cursor. Each step is constant time.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use cadence_domain::{weekday_from_sunday_index, Frequency, MonthOverflow, RecurrenceRule};

use crate::ScheduleError;

const BIWEEKLY_PERIOD_DAYS: i64 = 14;
// Never more than one short month in a row, so three months always contain a hit.
const MONTH_LOOKAHEAD: usize = 3;

/// Compiled form of a rule's cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Weekly {
        weekday: Weekday,
    },
    /// `anchor` is the first matching weekday on or after the rule's start.
    BiWeekly {
        weekday: Weekday,
        anchor: NaiveDate,
    },
    Monthly {
        day: u32,
        overflow: MonthOverflow,
    },
}

impl Schedule {
    /// Compiles the cadence of `rule`, validating its frequency and day.
    pub fn for_rule(rule: &RecurrenceRule, overflow: MonthOverflow) -> Result<Self, ScheduleError> {
        let start = rule
            .start_date
            .ok_or(ScheduleError::MissingStartDate { rule_id: rule.id })?;
        match &rule.frequency {
            Frequency::Weekly => Ok(Schedule::Weekly {
                weekday: resolve_weekday(rule, start)?,
            }),
            Frequency::BiWeekly => {
                let weekday = resolve_weekday(rule, start)?;
                let anchor = first_on_or_after(start, weekday).ok_or(
                    ScheduleError::NonAdvancing {
                        rule_id: rule.id,
                        cursor: start,
                    },
                )?;
                Ok(Schedule::BiWeekly { weekday, anchor })
            }
            Frequency::Monthly => Ok(Schedule::Monthly {
                day: resolve_month_day(rule, start)?,
                overflow,
            }),
            Frequency::Unrecognized(raw) => Err(ScheduleError::UnknownFrequency {
                rule_id: rule.id,
                frequency: raw.clone(),
            }),
        }
    }

    /// First occurrence strictly after `cursor`, or `None` past the end of the
    /// representable calendar.
    pub fn next_after(&self, cursor: NaiveDate) -> Option<NaiveDate> {
        match *self {
            Schedule::Weekly { weekday } => next_weekday_after(cursor, weekday),
            Schedule::BiWeekly { anchor, .. } => {
                if cursor < anchor {
                    return Some(anchor);
                }
                let elapsed = (cursor - anchor).num_days();
                let periods = elapsed / BIWEEKLY_PERIOD_DAYS + 1;
                anchor.checked_add_days(Days::new((periods * BIWEEKLY_PERIOD_DAYS) as u64))
            }
            Schedule::Monthly { day, overflow } => next_month_day_after(cursor, day, overflow),
        }
    }
}

/// Next occurrence of `rule` strictly after `cursor`, using the default
/// month-overflow policy.
pub fn next_occurrence(cursor: NaiveDate, rule: &RecurrenceRule) -> Result<NaiveDate, ScheduleError> {
    let schedule = Schedule::for_rule(rule, MonthOverflow::default())?;
    schedule
        .next_after(cursor)
        .filter(|next| *next > cursor)
        .ok_or(ScheduleError::NonAdvancing {
            rule_id: rule.id,
            cursor,
        })
}

fn resolve_weekday(rule: &RecurrenceRule, start: NaiveDate) -> Result<Weekday, ScheduleError> {
    match rule.occurrence_day {
        None => Ok(start.weekday()),
        Some(day) => weekday_from_sunday_index(day).ok_or_else(|| {
            ScheduleError::OccurrenceDayOutOfRange {
                rule_id: rule.id,
                day,
                frequency: rule.frequency.clone(),
            }
        }),
    }
}

fn resolve_month_day(rule: &RecurrenceRule, start: NaiveDate) -> Result<u32, ScheduleError> {
    match rule.occurrence_day {
        None => Ok(start.day()),
        Some(day @ 1..=31) => Ok(day as u32),
        Some(day) => Err(ScheduleError::OccurrenceDayOutOfRange {
            rule_id: rule.id,
            day,
            frequency: rule.frequency.clone(),
        }),
    }
}

fn days_until(from: Weekday, to: Weekday) -> u64 {
    u64::from((to.num_days_from_sunday() + 7 - from.num_days_from_sunday()) % 7)
}

fn first_on_or_after(date: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days_until(date.weekday(), weekday)))
}

fn next_weekday_after(cursor: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let ahead = match days_until(cursor.weekday(), weekday) {
        0 => 7,
        ahead => ahead,
    };
    cursor.checked_add_days(Days::new(ahead))
}

fn next_month_day_after(cursor: NaiveDate, day: u32, overflow: MonthOverflow) -> Option<NaiveDate> {
    let (mut year, mut month) = (cursor.year(), cursor.month());
    for _ in 0..MONTH_LOOKAHEAD {
        if let Some(candidate) = occurrence_in_month(year, month, day, overflow) {
            if candidate > cursor {
                return Some(candidate);
            }
        }
        (year, month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
    }
    None
}

fn occurrence_in_month(year: i32, month: u32, day: u32, overflow: MonthOverflow) -> Option<NaiveDate> {
    let last = days_in_month(year, month)?;
    if day <= last {
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    match overflow {
        MonthOverflow::Clamp => NaiveDate::from_ymd_opt(year, month, last),
        MonthOverflow::Skip => None,
    }
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    first_next.pred_opt().map(|last| last.day())
}
