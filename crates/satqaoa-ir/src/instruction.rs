//! A gate, measurement or barrier together with the wires it touches.

use serde::{Deserialize, Serialize};

use crate::gate::StandardGate;
use crate::qubit::{ClbitId, QubitId};

/// What an [`Instruction`] does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// Unitary gate on `qubits`.
    Gate(StandardGate),
    /// `qubits[i]` is measured into `clbits[i]`.
    Measure,
    /// Layer marker, ignored by the simulator and by `depth`.
    Barrier,
}

/// One step of a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub qubits: Vec<QubitId>,
    /// Empty unless `kind` is [`InstructionKind::Measure`].
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: qubits.into_iter().collect(),
            clbits: Vec::new(),
        }
    }

    pub fn measure(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: qubits.into_iter().collect(),
            clbits: clbits.into_iter().collect(),
        }
    }

    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: Vec::new(),
        }
    }

    /// The gate, unless this is a measurement or barrier.
    pub fn as_gate(&self) -> Option<&StandardGate> {
        match &self.kind {
            InstructionKind::Gate(gate) => Some(gate),
            InstructionKind::Measure | InstructionKind::Barrier => None,
        }
    }

    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Operation name as it appears in gate histograms.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(gate) => gate.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Barrier => "barrier",
        }
    }

    /// Qubit operands as plain indices.
    pub fn qubit_indices(&self) -> Vec<usize> {
        self.qubits.iter().map(|q| q.index()).collect()
    }

    /// Same wires, gate replaced by `f(gate)`. Measurements and barriers are
    /// returned unchanged.
    pub fn map_gate(&self, f: impl FnOnce(&StandardGate) -> StandardGate) -> Self {
        let kind = match &self.kind {
            InstructionKind::Gate(gate) => InstructionKind::Gate(f(gate)),
            other => other.clone(),
        };
        Self {
            kind,
            qubits: self.qubits.clone(),
            clbits: self.clbits.clone(),
        }
    }

    /// Same operation with qubit `i` moved to `qubit_map[i]`.
    ///
    /// The caller guarantees every operand indexes into `qubit_map`.
    pub fn remapped(&self, qubit_map: &[QubitId]) -> Self {
        Self {
            kind: self.kind.clone(),
            qubits: self.qubits.iter().map(|q| qubit_map[q.index()]).collect(),
            clbits: self.clbits.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::ParameterExpression;

    #[test]
    fn test_names() {
        assert_eq!(Instruction::gate(StandardGate::H, [QubitId(0)]).name(), "h");
        assert_eq!(
            Instruction::measure([QubitId(0)], [ClbitId(0)]).name(),
            "measure"
        );
        assert!(Instruction::barrier([QubitId(0), QubitId(1)]).is_barrier());
    }

    #[test]
    fn test_kind_predicates() {
        let measure = Instruction::measure([QubitId(0)], [ClbitId(0)]);
        assert!(measure.is_measure());
        assert!(!measure.is_barrier());
        assert!(measure.as_gate().is_none());

        let h = Instruction::gate(StandardGate::H, [QubitId(0)]);
        assert!(!h.is_measure());
        assert!(!Instruction::barrier([QubitId(0)]).is_measure());
    }

    #[test]
    fn test_map_gate_keeps_wires() {
        let rx = Instruction::gate(
            StandardGate::Rx(ParameterExpression::symbol("beta_0")),
            [QubitId(2)],
        );
        let bound = rx.map_gate(|_| StandardGate::Rx(ParameterExpression::constant(0.5)));
        assert_eq!(bound.qubits, vec![QubitId(2)]);
        assert_eq!(
            bound.as_gate(),
            Some(&StandardGate::Rx(ParameterExpression::constant(0.5)))
        );

        let measure = Instruction::measure([QubitId(1)], [ClbitId(1)]);
        assert_eq!(measure.map_gate(|g| g.inverse()), measure);
    }

    #[test]
    fn test_remapped() {
        let cx = Instruction::gate(StandardGate::CX, [QubitId(0), QubitId(1)]);
        let moved = cx.remapped(&[QubitId(4), QubitId(2)]);
        assert_eq!(moved.qubit_indices(), vec![4, 2]);
        assert_eq!(moved.as_gate(), Some(&StandardGate::CX));
    }
}
