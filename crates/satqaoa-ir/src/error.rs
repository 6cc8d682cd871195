//! Error types for circuit construction.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors raised while building, binding or inverting circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// An operand is past the end of the quantum register.
    #[error("'{op}' uses {qubit} but the circuit has {num_qubits} qubits")]
    QubitOutOfRange {
        op: String,
        qubit: QubitId,
        num_qubits: u32,
    },

    /// A measurement target is past the end of the classical register.
    #[error("'measure' writes {clbit} but the circuit has {num_clbits} clbits")]
    ClbitOutOfRange { clbit: ClbitId, num_clbits: u32 },

    /// The operand list does not fit the operation.
    #[error("'{op}' takes {expected} qubits, got {got}")]
    OperandCount {
        op: String,
        expected: u32,
        got: u32,
    },

    /// The same qubit appears twice in one operation.
    #[error("'{op}' uses {qubit} more than once")]
    DuplicateQubit { op: String, qubit: QubitId },

    #[error("Parameter '{0}' is unbound")]
    UnboundParameter(String),

    #[error("Cannot invert non-unitary instruction '{0}'")]
    NonUnitary(String),

    /// The wire map passed to `append` does not cover the appended circuit.
    #[error("Wire map has {got} entries but the appended circuit has {expected} qubits")]
    WireMapMismatch { expected: usize, got: usize },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
