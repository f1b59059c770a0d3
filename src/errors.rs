use thiserror::Error;

use cadence_config::ConfigError;
use cadence_core::SourceError;

/// Failures surfaced by the planner façade and the CLI.
#[derive(Debug, Error)]
pub enum CadenceError {
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, CadenceError>;
