//! Error types for experiment runs and archives.

use satqaoa_algo::AlgoError;
use satqaoa_sat::SatError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while running experiments or handling archives.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExperimentError {
    /// Reading or writing files failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive JSON could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Instance generation or analysis failed.
    #[error("SAT error: {0}")]
    Sat(#[from] SatError),

    /// Circuit construction, simulation or optimization failed.
    #[error("Algorithm error: {0}")]
    Algo(#[from] AlgoError),
}

/// Result type for experiment operations.
pub type ExperimentResult<T> = Result<T, ExperimentError>;
