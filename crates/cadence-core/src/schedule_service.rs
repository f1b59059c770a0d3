//! Per-rule overview: cadence label and next due date.

use chrono::NaiveDate;
use uuid::Uuid;

use cadence_domain::{DateWindow, RecurrenceRule, RuleKind};

use crate::{expander::WindowExpander, ScheduleError};

// Any supported cadence fires at least once a year.
const SUMMARY_LOOKAHEAD_DAYS: u32 = 366;

#[derive(Debug, Clone, PartialEq)]
pub struct RuleSummary {
    pub rule_id: Uuid,
    pub description: String,
    pub interval_label: String,
    pub kind: Option<RuleKind>,
    pub amount: f64,
    pub next_due: Option<NaiveDate>,
    pub error: Option<ScheduleError>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleService {
    expander: WindowExpander,
}

impl ScheduleService {
    pub fn new(expander: WindowExpander) -> Self {
        Self { expander }
    }

    /// Next occurrence on or after `today`, honoring the resume cursor and end date.
    pub fn next_due(
        &self,
        rule: &RecurrenceRule,
        today: NaiveDate,
    ) -> Result<Option<NaiveDate>, ScheduleError> {
        let lookahead = DateWindow::horizon(today, SUMMARY_LOOKAHEAD_DAYS);
        self.expander.expand(rule, lookahead)?.next().transpose()
    }

    /// Summaries sorted by next due date; ended or broken rules go last.
    pub fn summaries(&self, rules: &[RecurrenceRule], today: NaiveDate) -> Vec<RuleSummary> {
        let mut summaries: Vec<RuleSummary> = rules
            .iter()
            .map(|rule| {
                let (next_due, error) = match self.next_due(rule, today) {
                    Ok(next) => (next, None),
                    Err(err) => (None, Some(err)),
                };
                RuleSummary {
                    rule_id: rule.id,
                    description: rule.description.clone(),
                    interval_label: rule.frequency.label(),
                    kind: rule.kind,
                    amount: rule.amount,
                    next_due,
                    error,
                }
            })
            .collect();
        summaries.sort_by(|a, b| {
            (a.next_due.is_none(), a.next_due, &a.description)
                .cmp(&(b.next_due.is_none(), b.next_due, &b.description))
        });
        summaries
    }
}
