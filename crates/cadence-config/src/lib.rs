//! cadence-config
//!
//! Persistent user preferences for the planner: locale, currency, forecast
//! horizon, month overflow policy and the timeline type filter.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, MAX_HORIZON_DAYS};
