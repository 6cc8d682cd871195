//! Error types for circuit construction and QAOA runs.

use satqaoa_adapter_sim::SimError;
use satqaoa_ir::IrError;
use satqaoa_sat::SatError;
use thiserror::Error;

/// Errors that can occur while building or running QAOA circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AlgoError {
    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),

    /// Simulation failed.
    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    /// Formula evaluation failed.
    #[error("SAT error: {0}")]
    Sat(#[from] SatError),

    /// Parameter vector length does not match the ansatz.
    #[error("Ansatz expects {expected} parameters, got {got}")]
    ParameterCount {
        /// Parameters the ansatz declares.
        expected: usize,
        /// Parameters supplied.
        got: usize,
    },

    /// QAOA needs at least one layer.
    #[error("Number of layers must be at least 1")]
    InvalidDepth,

    /// Objective over zero shots.
    #[error("Cannot compute an objective from empty counts")]
    EmptyCounts,

    /// Bitstring too short or containing characters other than 0/1.
    #[error("Invalid bitstring '{bitstring}' for a formula with {num_vars} variables")]
    InvalidBitstring {
        /// The offending bitstring.
        bitstring: String,
        /// Variables in the formula.
        num_vars: u32,
    },
}

/// Result type for algorithm operations.
pub type AlgoResult<T> = Result<T, AlgoError>;
