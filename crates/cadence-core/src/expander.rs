//! Bounded, resumable expansion of a rule into the dates inside a window.

use chrono::NaiveDate;
use uuid::Uuid;

use cadence_domain::{DateWindow, MonthOverflow, RecurrenceRule};

use crate::{occurrence::Schedule, ScheduleError};

/// Expands rules over date windows with a fixed month-overflow policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowExpander {
    overflow: MonthOverflow,
}

impl WindowExpander {
    pub fn new(overflow: MonthOverflow) -> Self {
        Self { overflow }
    }

    pub fn overflow(&self) -> MonthOverflow {
        self.overflow
    }

    /// Starts a lazy expansion of `rule` over `window`.
    ///
    /// The rule's `last_processed_date` acts as the resume cursor: when it is
    /// present and not before the window start, it is itself the first
    /// candidate, otherwise the search continues strictly after the cursor.
    /// Configuration problems are reported here, before any date is produced.
    pub fn expand(
        &self,
        rule: &RecurrenceRule,
        window: DateWindow,
    ) -> Result<Occurrences, ScheduleError> {
        let schedule = Schedule::for_rule(rule, self.overflow)?;
        let start = rule
            .start_date
            .ok_or(ScheduleError::MissingStartDate { rule_id: rule.id })?;
        if let Some(end) = rule.end_date {
            if end < start {
                return Err(ScheduleError::EndBeforeStart {
                    rule_id: rule.id,
                    start,
                    end,
                });
            }
        }

        let cursor = rule.last_processed_date.unwrap_or(start).max(start);
        let resume = rule
            .last_processed_date
            .filter(|processed| *processed >= start && *processed >= window.start);

        let mut occurrences = Occurrences {
            rule_id: rule.id,
            schedule,
            window,
            end_date: rule.end_date,
            candidate: None,
            pending_error: None,
        };
        match resume {
            Some(processed) => occurrences.candidate = Some(processed),
            None => occurrences.advance_from(cursor),
        }
        tracing::debug!(
            rule_id = %rule.id,
            %cursor,
            resumed = resume.is_some(),
            window_start = %window.start,
            window_end = %window.end,
            "expanding rule"
        );
        Ok(occurrences)
    }

    /// Eagerly expands `rule`, aborting on the first invariant violation.
    pub fn collect(
        &self,
        rule: &RecurrenceRule,
        window: DateWindow,
    ) -> Result<Vec<NaiveDate>, ScheduleError> {
        self.expand(rule, window)?.collect()
    }
}

/// Expands `rule` over `window` with the default month-overflow policy.
pub fn expand(rule: &RecurrenceRule, window: DateWindow) -> Result<Occurrences, ScheduleError> {
    WindowExpander::default().expand(rule, window)
}

/// Ordered occurrence dates of one rule inside one window.
///
/// Finite and strictly increasing. If the schedule ever fails to advance, the
/// error is yielded once and the iterator ends.
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule_id: Uuid,
    schedule: Schedule,
    window: DateWindow,
    end_date: Option<NaiveDate>,
    candidate: Option<NaiveDate>,
    pending_error: Option<ScheduleError>,
}

impl Occurrences {
    fn advance_from(&mut self, cursor: NaiveDate) {
        match self.schedule.next_after(cursor) {
            Some(next) if next > cursor => self.candidate = Some(next),
            _ => {
                self.candidate = None;
                self.pending_error = Some(ScheduleError::NonAdvancing {
                    rule_id: self.rule_id,
                    cursor,
                });
            }
        }
    }
}

impl Iterator for Occurrences {
    type Item = Result<NaiveDate, ScheduleError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(err) = self.pending_error.take() {
                return Some(Err(err));
            }
            let candidate = self.candidate.take()?;
            if candidate >= self.window.end {
                return None;
            }
            if self.end_date.is_some_and(|end| candidate > end) {
                return None;
            }
            self.advance_from(candidate);
            if candidate >= self.window.start {
                return Some(Ok(candidate));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use cadence_domain::Frequency;

    use super::*;
    use crate::ErrorKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(start: NaiveDate, end: NaiveDate) -> DateWindow {
        DateWindow::new(start, end).unwrap()
    }

    fn friday_expense() -> RecurrenceRule {
        RecurrenceRule::expense("Takeout", 50.0, Frequency::Weekly, date(2024, 1, 1))
            .on_weekday(Weekday::Fri)
    }

    #[test]
    fn expands_weekly_rule_inside_window() {
        let dates = WindowExpander::default()
            .collect(&friday_expense(), window(date(2024, 3, 1), date(2024, 3, 15)))
            .unwrap();
        assert_eq!(dates, vec![date(2024, 3, 1), date(2024, 3, 8)]);
    }

    #[test]
    fn start_date_itself_is_not_a_first_candidate() {
        // Friday start with no cursor: search begins strictly after start.
        let rule = RecurrenceRule::new("Review", Frequency::Weekly, date(2024, 3, 1));
        let dates = WindowExpander::default()
            .collect(&rule, window(date(2024, 3, 1), date(2024, 3, 16)))
            .unwrap();
        assert_eq!(dates, vec![date(2024, 3, 8), date(2024, 3, 15)]);
    }

    #[test]
    fn end_date_on_an_occurrence_is_inclusive() {
        let rule = friday_expense().ending_on(date(2024, 3, 8));
        let dates = WindowExpander::default()
            .collect(&rule, window(date(2024, 3, 1), date(2024, 4, 1)))
            .unwrap();
        assert_eq!(dates, vec![date(2024, 3, 1), date(2024, 3, 8)]);
    }

    #[test]
    fn resumes_from_unconsumed_cursor() {
        let rule = friday_expense().processed_through(date(2024, 3, 8));
        let dates = WindowExpander::default()
            .collect(&rule, window(date(2024, 3, 5), date(2024, 3, 23)))
            .unwrap();
        assert_eq!(dates, vec![date(2024, 3, 8), date(2024, 3, 15), date(2024, 3, 22)]);
    }

    #[test]
    fn consumed_cursor_is_not_re_emitted() {
        let rule = friday_expense().processed_through(date(2024, 3, 1));
        let dates = WindowExpander::default()
            .collect(&rule, window(date(2024, 3, 4), date(2024, 3, 16)))
            .unwrap();
        assert_eq!(dates, vec![date(2024, 3, 8), date(2024, 3, 15)]);
    }

    #[test]
    fn cursor_before_start_is_clamped() {
        let rule = RecurrenceRule::new("Yoga", Frequency::Weekly, date(2024, 3, 4))
            .on_weekday(Weekday::Wed)
            .processed_through(date(2024, 3, 2));
        let dates = WindowExpander::default()
            .collect(&rule, window(date(2024, 3, 1), date(2024, 3, 14)))
            .unwrap();
        assert_eq!(dates, vec![date(2024, 3, 6), date(2024, 3, 13)]);
    }

    #[test]
    fn repeated_expansion_is_identical() {
        let rule = friday_expense().processed_through(date(2024, 2, 16));
        let span = window(date(2024, 2, 20), date(2024, 5, 1));
        let expander = WindowExpander::default();
        let first = expander.collect(&rule, span).unwrap();
        let second = expander.collect(&rule, span).unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn output_is_contained_and_strictly_increasing() {
        let start = date(2024, 1, 10);
        let end = date(2024, 11, 20);
        let span = window(date(2024, 2, 1), date(2025, 1, 1));
        let rules = vec![
            RecurrenceRule::new("w", Frequency::Weekly, start).ending_on(end),
            RecurrenceRule::new("b", Frequency::BiWeekly, start).on_day(0).ending_on(end),
            RecurrenceRule::new("m", Frequency::Monthly, start).on_day(31).ending_on(end),
        ];
        for rule in &rules {
            let dates = WindowExpander::default().collect(rule, span).unwrap();
            assert!(!dates.is_empty());
            for pair in dates.windows(2) {
                assert!(pair[0] < pair[1]);
            }
            for day in &dates {
                assert!(span.contains(*day));
                assert!(*day >= start && *day <= end);
            }
        }
    }

    #[test]
    fn empty_when_window_precedes_start() {
        let rule = RecurrenceRule::new("Later", Frequency::Monthly, date(2025, 1, 1));
        let dates = WindowExpander::default()
            .collect(&rule, window(date(2024, 1, 1), date(2024, 12, 31)))
            .unwrap();
        assert!(dates.is_empty());
    }

    #[test]
    fn monthly_thirty_first_across_february() {
        let rule = RecurrenceRule::expense("Rent", 900.0, Frequency::Monthly, date(2024, 1, 1))
            .on_day(31);
        let span = window(date(2024, 1, 15), date(2024, 4, 1));

        let clamped = WindowExpander::new(MonthOverflow::Clamp)
            .collect(&rule, span)
            .unwrap();
        assert_eq!(clamped, vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]);

        let skipped = WindowExpander::new(MonthOverflow::Skip)
            .collect(&rule, span)
            .unwrap();
        assert_eq!(skipped, vec![date(2024, 1, 31), date(2024, 3, 31)]);
    }

    #[test]
    fn end_before_start_is_a_configuration_error() {
        let rule = friday_expense().ending_on(date(2023, 12, 1));
        let err = WindowExpander::default()
            .expand(&rule, window(date(2024, 1, 1), date(2024, 2, 1)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn stalled_schedule_yields_error_once() {
        let rule = RecurrenceRule::new("Edge", Frequency::Weekly, NaiveDate::MAX);
        let span = DateWindow::horizon(NaiveDate::MAX, 0);
        let mut occurrences = expand(&rule, span).unwrap();
        assert!(matches!(
            occurrences.next(),
            Some(Err(ScheduleError::NonAdvancing { .. }))
        ));
        assert!(occurrences.next().is_none());
    }
}
