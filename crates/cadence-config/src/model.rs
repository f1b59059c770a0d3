use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use cadence_domain::{EventType, MonthOverflow};

use crate::ConfigError;

/// Upper bound on the forecast horizon, roughly ten years.
pub const MAX_HORIZON_DAYS: u32 = 3_660;

/// User-configurable planner preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_horizon_days")]
    pub horizon_days: u32,
    #[serde(default)]
    pub month_overflow: MonthOverflow,
    #[serde(default = "EventType::all")]
    pub active_types: BTreeSet<EventType>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            horizon_days: Self::default_horizon_days(),
            month_overflow: MonthOverflow::default(),
            active_types: EventType::all(),
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub fn default_horizon_days() -> u32 {
        30
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_days > MAX_HORIZON_DAYS {
            return Err(ConfigError::Invalid(format!(
                "horizon_days {} exceeds the maximum of {}",
                self.horizon_days, MAX_HORIZON_DAYS
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("currency must not be empty".into()));
        }
        Ok(())
    }
}
