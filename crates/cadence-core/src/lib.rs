//! cadence-core
//!
//! Occurrence generation, window expansion, timeline aggregation, and cash-flow
//! forecasting. Depends on cadence-domain. No CLI, no terminal I/O, no direct
//! storage interactions.

pub mod calendar_service;
pub mod error;
pub mod expander;
pub mod forecast_service;
pub mod format;
pub mod occurrence;
pub mod schedule_service;
pub mod source;
pub mod time;

pub use calendar_service::*;
pub use error::{ErrorKind, ScheduleError, SkippedRule, SourceError};
pub use expander::*;
pub use forecast_service::*;
pub use format::AmountFormat;
pub use occurrence::{next_occurrence, Schedule};
pub use schedule_service::*;
pub use source::*;
pub use time::{Clock, FixedClock, SystemClock};

#[cfg(test)]
mod tests;
