use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Projected position for a single day of the forecast horizon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowPoint {
    pub date: NaiveDate,
    /// Cumulative signed change from the start of the horizon through this day.
    pub balance: f64,
    /// Net change landing on this day.
    pub change: f64,
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ForecastTotals {
    pub occurrences: usize,
    pub projected_inflow: f64,
    pub projected_outflow: f64,
    pub net: f64,
}
