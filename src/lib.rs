#![doc(test(attr(deny(warnings))))]

//! Cadence expands recurring schedules into dated occurrences, merges them with
//! one-off calendar items, and projects a day-by-day cash-flow balance.
//!
//! The engine lives in [`engine`]; this crate wires it to a data source, a
//! clock and user configuration through [`Planner`].

pub mod cli;
pub mod errors;
pub mod planner;
pub mod utils;

pub use cadence_config as config;
pub use cadence_core as engine;
pub use cadence_domain as domain;
pub use cadence_storage_json as storage;

pub use errors::CadenceError;
pub use planner::Planner;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "cadence tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }
}
