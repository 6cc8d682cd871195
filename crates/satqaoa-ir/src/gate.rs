//! Quantum gate types.

use serde::{Deserialize, Serialize};

use crate::parameter::ParameterExpression;

/// Gates with known semantics.
///
/// The multi-controlled gates take their control qubits first; for
/// [`StandardGate::MCX`] the target is the last operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around X axis.
    Rx(ParameterExpression),
    /// Rotation around Y axis.
    Ry(ParameterExpression),
    /// Rotation around Z axis.
    Rz(ParameterExpression),
    /// Phase gate diag(1, e^{iθ}).
    P(ParameterExpression),
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// Controlled phase gate.
    CP(ParameterExpression),
    /// Toffoli gate (CCX).
    CCX,
    /// Multi-controlled X with `num_controls` controls.
    MCX {
        /// Number of control qubits.
        num_controls: u32,
    },
    /// Phase e^{iθ} applied when all `num_controls + 1` qubits are |1⟩.
    MCP {
        /// Number of control qubits (the phase is symmetric in all operands).
        num_controls: u32,
        /// Phase angle.
        theta: ParameterExpression,
    },
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::CP(_) => "cp",
            StandardGate::CCX => "ccx",
            StandardGate::MCX { .. } => "mcx",
            StandardGate::MCP { .. } => "mcp",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_) => 1,

            StandardGate::CX | StandardGate::CZ | StandardGate::CP(_) => 2,

            StandardGate::CCX => 3,

            StandardGate::MCX { num_controls } | StandardGate::MCP { num_controls, .. } => {
                num_controls + 1
            }
        }
    }

    /// Check if this gate still has unbound symbols.
    pub fn is_parameterized(&self) -> bool {
        self.parameters().iter().any(|p| p.is_symbolic())
    }

    /// Get parameters of this gate.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CP(p)
            | StandardGate::MCP { theta: p, .. } => vec![p],
            _ => vec![],
        }
    }

    /// Rewrite every parameter with `f`, keeping the gate kind.
    #[must_use]
    pub fn map_parameters(&self, f: impl Fn(&ParameterExpression) -> ParameterExpression) -> Self {
        match self {
            StandardGate::Rx(p) => StandardGate::Rx(f(p)),
            StandardGate::Ry(p) => StandardGate::Ry(f(p)),
            StandardGate::Rz(p) => StandardGate::Rz(f(p)),
            StandardGate::P(p) => StandardGate::P(f(p)),
            StandardGate::CP(p) => StandardGate::CP(f(p)),
            StandardGate::MCP {
                num_controls,
                theta,
            } => StandardGate::MCP {
                num_controls: *num_controls,
                theta: f(theta),
            },
            other => other.clone(),
        }
    }

    /// The inverse (adjoint) of this gate.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::CP(_)
            | StandardGate::MCP { .. } => self.map_parameters(|p| -p.clone()),
            // Remaining gates are Hermitian.
            other => other.clone(),
        }
    }
}
