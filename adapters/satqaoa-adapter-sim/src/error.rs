//! Error types for the simulator.

use thiserror::Error;

/// Errors that can occur during simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Circuit exceeds the simulator's qubit limit.
    #[error("Circuit has {qubits} qubits but the simulator supports at most {max}")]
    CircuitTooLarge {
        /// Qubits in the circuit.
        qubits: usize,
        /// Simulator limit.
        max: u32,
    },

    /// Shot count outside `1..=max`.
    #[error("Invalid shot count {shots} (must be between 1 and {max})")]
    InvalidShots {
        /// Requested shots.
        shots: u32,
        /// Simulator limit.
        max: u32,
    },

    /// A gate still carries a symbolic angle.
    #[error("Gate '{gate}' has unbound parameter {parameter}")]
    UnboundParameter {
        /// Gate name.
        gate: String,
        /// The unresolved expression.
        parameter: String,
    },

    /// Instruction the simulator cannot execute.
    #[error("Unsupported instruction: {0}")]
    UnsupportedInstruction(String),
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;
