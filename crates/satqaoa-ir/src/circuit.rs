//! High-level circuit builder API.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::ParameterExpression;
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit.
///
/// Instructions are kept in program order. Every instruction is validated
/// against the circuit's wires when it is appended, so a constructed circuit
/// never references a qubit or clbit it does not own. Decoding replays the
/// same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCircuit")]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

/// Wire form of [`Circuit`] before validation.
#[derive(Deserialize)]
struct RawCircuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

impl TryFrom<RawCircuit> for Circuit {
    type Error = IrError;

    fn try_from(raw: RawCircuit) -> IrResult<Self> {
        let mut circuit = Circuit::with_size(raw.name, raw.num_qubits, raw.num_clbits);
        for instruction in raw.instructions {
            circuit.apply(instruction)?;
        }
        Ok(circuit)
    }
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_qubits: 0,
            num_clbits: 0,
            instructions: vec![],
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: vec![],
        }
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.num_qubits);
        self.num_qubits += 1;
        id
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.num_clbits);
        self.num_clbits += 1;
        id
    }

    /// Validate and append an instruction.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let op = || instruction.name().to_string();

        let mut seen = BTreeSet::new();
        for &qubit in &instruction.qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    op: op(),
                    qubit,
                    num_qubits: self.num_qubits,
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit { op: op(), qubit });
            }
        }
        for &clbit in &instruction.clbits {
            if clbit.0 >= self.num_clbits {
                return Err(IrError::ClbitOutOfRange {
                    clbit,
                    num_clbits: self.num_clbits,
                });
            }
        }

        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let got = instruction.qubits.len() as u32;
                if got != gate.num_qubits() {
                    return Err(IrError::OperandCount {
                        op: op(),
                        expected: gate.num_qubits(),
                        got,
                    });
                }
            }
            InstructionKind::Measure => {
                if instruction.qubits.len() != instruction.clbits.len() {
                    return Err(IrError::OperandCount {
                        op: op(),
                        expected: instruction.clbits.len() as u32,
                        got: instruction.qubits.len() as u32,
                    });
                }
            }
            InstructionKind::Barrier => {}
        }
        Ok(())
    }

    fn gate1(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, [qubit]))
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate1(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate1(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate1(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate1(StandardGate::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate1(StandardGate::S, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate1(StandardGate::T, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate1(StandardGate::Rx(theta.into()), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate1(StandardGate::Ry(theta.into()), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate1(StandardGate::Rz(theta.into()), qubit)
    }

    /// Apply phase gate.
    pub fn p(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate1(StandardGate::P(theta.into()), qubit)
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::CX, [control, target]))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::CZ, [control, target]))
    }

    /// Apply controlled-phase gate.
    pub fn cp(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(
            StandardGate::CP(theta.into()),
            [control, target],
        ))
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::CCX, [c1, c2, target]))
    }

    /// Apply an X on `target` controlled by all of `controls`.
    ///
    /// Zero, one and two controls are emitted as X, CX and CCX.
    pub fn mcx(&mut self, controls: &[QubitId], target: QubitId) -> IrResult<&mut Self> {
        match controls {
            [] => self.x(target),
            [c] => self.cx(*c, target),
            [c1, c2] => self.ccx(*c1, *c2, target),
            _ => {
                let gate = StandardGate::MCX {
                    num_controls: controls.len() as u32,
                };
                let operands = controls.iter().copied().chain(std::iter::once(target));
                self.apply(Instruction::gate(gate, operands))
            }
        }
    }

    /// Apply phase e^{iθ} to basis states where every qubit in `qubits` is |1⟩.
    pub fn mcp(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubits: &[QubitId],
    ) -> IrResult<&mut Self> {
        let theta = theta.into();
        match qubits {
            [] => Err(IrError::OperandCount {
                op: "mcp".into(),
                expected: 1,
                got: 0,
            }),
            [q] => self.p(theta, *q),
            [c, t] => self.cp(theta, *c, *t),
            _ => {
                let gate = StandardGate::MCP {
                    num_controls: qubits.len() as u32 - 1,
                    theta,
                };
                self.apply(Instruction::gate(gate, qubits.iter().copied()))
            }
        }
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure([qubit], [clbit]))
    }

    /// Measure every qubit `i` into clbit `i`, adding clbits when needed.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.num_clbits < self.num_qubits {
            self.add_clbit();
        }
        let qubits = (0..self.num_qubits).map(QubitId);
        let clbits = (0..self.num_qubits).map(ClbitId);
        self.apply(Instruction::measure(qubits, clbits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = (0..self.num_qubits).map(QubitId).collect();
        self.apply(Instruction::barrier(qubits))
    }

    /// Append `other` onto this circuit, sending its qubit `i` to `qubit_map[i]`.
    ///
    /// Classical bits are kept as-is.
    pub fn append(&mut self, other: &Circuit, qubit_map: &[QubitId]) -> IrResult<&mut Self> {
        if qubit_map.len() != other.num_qubits() {
            return Err(IrError::WireMapMismatch {
                expected: other.num_qubits(),
                got: qubit_map.len(),
            });
        }
        for instruction in &other.instructions {
            self.apply(instruction.remapped(qubit_map))?;
        }
        Ok(self)
    }

    /// The adjoint circuit: reversed order, each gate inverted.
    pub fn inverse(&self) -> IrResult<Circuit> {
        let mut inverted = Circuit::with_size(
            format!("{}_dg", self.name),
            self.num_qubits,
            self.num_clbits,
        );
        for instruction in self.instructions.iter().rev() {
            if matches!(instruction.kind, InstructionKind::Measure) {
                return Err(IrError::NonUnitary(instruction.name().to_string()));
            }
            inverted
                .instructions
                .push(instruction.map_gate(StandardGate::inverse));
        }
        Ok(inverted)
    }

    /// Symbol names used by the circuit, sorted.
    pub fn parameters(&self) -> BTreeSet<String> {
        self.instructions
            .iter()
            .filter_map(Instruction::as_gate)
            .flat_map(|gate| gate.parameters())
            .filter_map(ParameterExpression::symbol_name)
            .map(str::to_owned)
            .collect()
    }

    /// Check whether any gate still has an unbound symbol.
    pub fn is_parameterized(&self) -> bool {
        self.instructions
            .iter()
            .filter_map(Instruction::as_gate)
            .any(StandardGate::is_parameterized)
    }

    /// Bind symbols to values and fold every angle to a constant.
    ///
    /// Fails with [`IrError::UnboundParameter`] if a symbol has no value.
    pub fn bind_parameters(&self, values: &FxHashMap<String, f64>) -> IrResult<Circuit> {
        if let Some(missing) = self
            .parameters()
            .into_iter()
            .find(|name| !values.contains_key(name))
        {
            return Err(IrError::UnboundParameter(missing));
        }

        let instructions = self
            .instructions
            .iter()
            .map(|instruction| {
                instruction.map_gate(|gate| gate.map_parameters(|p| p.bind_all(values)))
            })
            .collect();

        Ok(Circuit {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            instructions,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of operations, barriers excluded.
    pub fn num_ops(&self) -> usize {
        self.instructions.iter().filter(|i| !i.is_barrier()).count()
    }

    /// Histogram of operation names, barriers excluded.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for instruction in self.instructions.iter().filter(|i| !i.is_barrier()) {
            *counts.entry(instruction.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Length of the longest chain of operations sharing a wire.
    ///
    /// Barriers do not count as a layer.
    pub fn depth(&self) -> usize {
        let mut qubit_level = vec![0usize; self.num_qubits()];
        let mut clbit_level = vec![0usize; self.num_clbits()];
        let mut depth = 0;

        for instruction in &self.instructions {
            let start = instruction
                .qubits
                .iter()
                .map(|q| qubit_level[q.index()])
                .chain(instruction.clbits.iter().map(|c| clbit_level[c.index()]))
                .max()
                .unwrap_or(0);
            let level = if instruction.is_barrier() {
                start
            } else {
                start + 1
            };
            for q in &instruction.qubits {
                qubit_level[q.index()] = level;
            }
            for c in &instruction.clbits {
                clbit_level[c.index()] = level;
            }
            depth = depth.max(level);
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn bell() -> Circuit {
        let mut circuit = Circuit::with_size("bell", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap();
        circuit
    }

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
    }

    #[test]
    fn test_bell_depth() {
        let circuit = bell();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.depth(), 3); // H, CX, parallel measures
        assert_eq!(circuit.num_ops(), 4);
    }

    #[test]
    fn test_invalid_operands() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        assert!(matches!(
            circuit.h(QubitId(2)),
            Err(IrError::QubitOutOfRange { .. })
        ));
        assert!(matches!(
            circuit.cx(QubitId(1), QubitId(1)),
            Err(IrError::DuplicateQubit { .. })
        ));
        assert!(matches!(
            circuit.measure(QubitId(0), ClbitId(0)),
            Err(IrError::ClbitOutOfRange { .. })
        ));
    }

    #[test]
    fn test_mcx_normalizes_small_control_counts() {
        let mut circuit = Circuit::with_size("test", 5, 0);
        circuit.mcx(&[], QubitId(0)).unwrap();
        circuit.mcx(&[QubitId(0)], QubitId(1)).unwrap();
        circuit.mcx(&[QubitId(0), QubitId(1)], QubitId(2)).unwrap();
        circuit
            .mcx(&[QubitId(0), QubitId(1), QubitId(2)], QubitId(4))
            .unwrap();

        let ops = circuit.count_ops();
        assert_eq!(ops.get("x"), Some(&1));
        assert_eq!(ops.get("cx"), Some(&1));
        assert_eq!(ops.get("ccx"), Some(&1));
        assert_eq!(ops.get("mcx"), Some(&1));
    }

    #[test]
    fn test_measure_all_adds_clbits() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.measure_all().unwrap();
        assert_eq!(circuit.num_clbits(), 3);
    }

    #[test]
    fn test_append_with_map() {
        let mut inner = Circuit::with_size("inner", 2, 0);
        inner.cx(QubitId(0), QubitId(1)).unwrap();

        let mut outer = Circuit::with_size("outer", 3, 0);
        outer.append(&inner, &[QubitId(2), QubitId(0)]).unwrap();
        assert_eq!(
            outer.instructions()[0].qubits,
            vec![QubitId(2), QubitId(0)]
        );

        assert!(matches!(
            outer.append(&inner, &[QubitId(0)]),
            Err(IrError::WireMapMismatch { .. })
        ));
    }

    #[test]
    fn test_inverse_reverses_and_negates() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.h(QubitId(0)).unwrap().p(PI / 3.0, QubitId(0)).unwrap();

        let inverse = circuit.inverse().unwrap();
        assert_eq!(inverse.instructions()[1].as_gate(), Some(&StandardGate::H));
        let angle = inverse.instructions()[0].as_gate().unwrap().parameters()[0]
            .as_f64()
            .unwrap();
        assert!((angle + PI / 3.0).abs() < 1e-12);

        assert!(matches!(bell().inverse(), Err(IrError::NonUnitary(_))));
    }

    #[test]
    fn test_bind_parameters() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit
            .rx(ParameterExpression::symbol("beta_0").scaled(2.0), QubitId(0))
            .unwrap()
            .p(-ParameterExpression::symbol("gamma_0"), QubitId(1))
            .unwrap();

        assert!(circuit.is_parameterized());
        assert_eq!(
            circuit.parameters().into_iter().collect::<Vec<_>>(),
            vec!["beta_0", "gamma_0"]
        );

        let mut values = FxHashMap::default();
        values.insert("beta_0".to_string(), 0.5);
        assert!(matches!(
            circuit.bind_parameters(&values),
            Err(IrError::UnboundParameter(name)) if name == "gamma_0"
        ));

        values.insert("gamma_0".to_string(), 0.25);
        let bound = circuit.bind_parameters(&values).unwrap();
        assert!(!bound.is_parameterized());
        let rx = bound.instructions()[0].as_gate().unwrap().parameters()[0].as_f64();
        assert_eq!(rx, Some(1.0));
    }

    #[test]
    fn test_serde_roundtrip_preserves_instructions() {
        let circuit = bell();
        let json = serde_json::to_string(&circuit).unwrap();
        let restored: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, circuit);
    }

    #[test]
    fn test_deserialize_rejects_foreign_wires() {
        let mut circuit = Circuit::with_size("wide", 3, 0);
        circuit.h(QubitId(2)).unwrap();
        let json = serde_json::to_string(&circuit).unwrap();

        let narrowed = json.replace("\"num_qubits\":3", "\"num_qubits\":1");
        assert_ne!(narrowed, json);
        let err = serde_json::from_str::<Circuit>(&narrowed).unwrap_err();
        assert!(err.to_string().contains("q2"), "{err}");

        let bell_json = serde_json::to_string(&bell()).unwrap();
        let no_clbits = bell_json.replace("\"num_clbits\":2", "\"num_clbits\":0");
        assert_ne!(no_clbits, bell_json);
        assert!(serde_json::from_str::<Circuit>(&no_clbits).is_err());
    }
}
