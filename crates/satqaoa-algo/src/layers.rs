//! Phase-separation and mixing layers.

use satqaoa_ir::{Circuit, ParameterExpression, QubitId};

use crate::error::AlgoResult;
use crate::oracle::BitflipOracle;

/// Phase-separation layer built from a bitflip oracle.
///
/// Unsatisfying inputs pick up `e^{-i·phase}`, satisfying inputs are left
/// alone, and every ancilla and the result qubit end clean. With
/// `phase = π` this is the Grover phase oracle.
pub fn cost_circuit(
    oracle: &BitflipOracle,
    phase: impl Into<ParameterExpression>,
) -> AlgoResult<Circuit> {
    let phase: ParameterExpression = phase.into();
    let num_qubits = oracle.num_qubits();
    let wires: Vec<QubitId> = (0..num_qubits).map(QubitId::from).collect();
    let result = oracle.result_qubit;

    let mut circuit = Circuit::with_size("cost", num_qubits as u32, 0);
    // result ← NOT f(x)
    circuit.x(result)?;
    circuit.append(&oracle.circuit, &wires)?;
    circuit.p(-phase, result)?;
    // uncompute
    circuit.append(&oracle.circuit, &wires)?;
    circuit.x(result)?;
    Ok(circuit)
}

/// Transverse-field mixer: `RX(2β)` on each of `num_qubits` qubits.
pub fn standard_mixer(
    num_qubits: usize,
    beta: impl Into<ParameterExpression>,
) -> AlgoResult<Circuit> {
    let beta: ParameterExpression = beta.into();
    let mut circuit = Circuit::with_size("mixer", num_qubits as u32, 0);
    for q in 0..num_qubits {
        circuit.rx(beta.clone().scaled(2.0), QubitId::from(q))?;
    }
    Ok(circuit)
}

/// Grover mixer: `H X MCP(-β) X H`, a phase of `e^{-iβ}` on `|+…+⟩`.
pub fn grover_mixer(
    num_qubits: usize,
    beta: impl Into<ParameterExpression>,
) -> AlgoResult<Circuit> {
    let beta: ParameterExpression = beta.into();
    let qubits: Vec<QubitId> = (0..num_qubits).map(QubitId::from).collect();
    let mut circuit = Circuit::with_size("grover_mixer", num_qubits as u32, 0);
    for &q in &qubits {
        circuit.h(q)?;
        circuit.x(q)?;
    }
    circuit.mcp(-beta, &qubits)?;
    for &q in &qubits {
        circuit.x(q)?;
        circuit.h(q)?;
    }
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{OracleSynthesis, bitflip_oracle};
    use num_complex::Complex64;
    use satqaoa_adapter_sim::Statevector;
    use satqaoa_sat::Cnf;
    use std::f64::consts::PI;

    fn run(sv: &mut Statevector, circuit: &Circuit) {
        for inst in circuit.instructions() {
            sv.apply(inst).unwrap();
        }
    }

    #[test]
    fn test_cost_circuit_phases_unsat_inputs_only() {
        // (x1) and (x2): only 0b11 satisfies
        let cnf = Cnf::parse_dimacs("p cnf 2 2\n1 0\n2 0\n").unwrap();
        for synthesis in OracleSynthesis::ALL {
            let oracle = bitflip_oracle(&cnf, synthesis).unwrap();
            let cost = cost_circuit(&oracle, 0.5).unwrap();
            for x in 0..4 {
                let mut sv = Statevector::basis(oracle.num_qubits(), x);
                run(&mut sv, &cost);
                assert!((sv.probabilities()[x] - 1.0).abs() < 1e-9, "ancillas stay clean");
                let expected = if x == 0b11 { 0.0 } else { -0.5 };
                let phase = sv.amplitudes()[x].arg();
                assert!((phase - expected).abs() < 1e-9, "{synthesis} input {x:b}");
            }
        }
    }

    #[test]
    fn test_grover_phase_is_minus_one() {
        let cnf = Cnf::parse_dimacs("p cnf 1 1\n1 0\n").unwrap();
        let oracle = bitflip_oracle(&cnf, OracleSynthesis::Fprm).unwrap();
        let cost = cost_circuit(&oracle, PI).unwrap();

        let mut sv = Statevector::basis(2, 0);
        run(&mut sv, &cost);
        assert!((sv.amplitudes()[0].re + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_standard_mixer_parameters() {
        let mixer = standard_mixer(3, ParameterExpression::symbol("beta_0")).unwrap();
        assert_eq!(mixer.num_ops(), 3);
        assert_eq!(
            mixer.parameters().into_iter().collect::<Vec<_>>(),
            vec!["beta_0"]
        );
    }

    #[test]
    fn test_grover_mixer_phases_uniform_superposition() {
        let n = 3;
        let beta = 0.7;
        let mixer = grover_mixer(n, beta).unwrap();

        let mut h = Circuit::with_size("h", n as u32, 0);
        for q in 0..n {
            h.h(QubitId::from(q)).unwrap();
        }
        let mut sv = Statevector::new(n);
        run(&mut sv, &h);
        let before = sv.amplitudes().to_vec();
        run(&mut sv, &mixer);

        let rotation = Complex64::from_polar(1.0, -beta);
        for (a, b) in before.iter().zip(sv.amplitudes()) {
            assert!((a * rotation - b).norm() < 1e-9);
        }
    }
}
