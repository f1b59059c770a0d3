//! cadence-domain
//!
//! Pure data types for recurring schedules, calendar items, and forecasts.
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod calendar;
pub mod forecast;
pub mod rule;
pub mod window;

pub use calendar::*;
pub use forecast::*;
pub use rule::*;
pub use window::*;
