//! Bitflip oracle synthesis for CNF formulas.
//!
//! A bitflip oracle maps `|x⟩|r⟩ → |x⟩|r ⊕ f(x)⟩`. Inputs sit on qubits
//! `0..n` (qubit `i` carries x(i+1)), ancillas follow, and the result qubit
//! is always the last one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use satqaoa_ir::{Circuit, QubitId};
use satqaoa_sat::{Clause, Cnf};

use crate::error::AlgoResult;
use crate::esop::{self, Cube};

/// How the oracle circuit is synthesized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleSynthesis {
    /// Cheapest fixed-polarity Reed-Muller ESOP, no ancillas.
    #[default]
    Fprm,
    /// Positive-polarity Reed-Muller ESOP, no ancillas.
    Pprm,
    /// One MCX per satisfying assignment, no ancillas.
    Minterm,
    /// One ancilla per clause, computed and uncomputed around an AND.
    ClauseAncilla,
}

impl OracleSynthesis {
    /// All strategies.
    pub const ALL: [OracleSynthesis; 4] = [
        OracleSynthesis::Fprm,
        OracleSynthesis::Pprm,
        OracleSynthesis::Minterm,
        OracleSynthesis::ClauseAncilla,
    ];

    /// Short name used in configs and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            OracleSynthesis::Fprm => "fprm",
            OracleSynthesis::Pprm => "pprm",
            OracleSynthesis::Minterm => "minterm",
            OracleSynthesis::ClauseAncilla => "clause_ancilla",
        }
    }
}

impl fmt::Display for OracleSynthesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OracleSynthesis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|v| v.name() == normalized)
            .ok_or_else(|| {
                format!("unknown oracle synthesis '{s}' (expected fprm, pprm, minterm or clause_ancilla)")
            })
    }
}

/// A synthesized bitflip oracle.
#[derive(Debug, Clone)]
pub struct BitflipOracle {
    /// The reversible circuit.
    pub circuit: Circuit,
    /// Number of input qubits (one per variable).
    pub num_inputs: usize,
    /// Number of clean ancillas between inputs and result.
    pub num_ancillas: usize,
    /// The qubit that receives `f(x)`.
    pub result_qubit: QubitId,
    /// Strategy used.
    pub synthesis: OracleSynthesis,
}

impl BitflipOracle {
    /// Total qubits.
    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }

    /// Input qubits in variable order.
    pub fn input_qubits(&self) -> Vec<QubitId> {
        (0..self.num_inputs).map(QubitId::from).collect()
    }
}

/// Synthesize the bitflip oracle of `cnf`.
pub fn bitflip_oracle(cnf: &Cnf, synthesis: OracleSynthesis) -> AlgoResult<BitflipOracle> {
    let n = cnf.num_vars() as usize;

    let oracle = match synthesis {
        OracleSynthesis::ClauseAncilla => clause_ancilla_oracle(cnf)?,
        _ => {
            let truth_table = cnf.truth_table()?;
            let cubes = match synthesis {
                OracleSynthesis::Pprm => esop::pprm(&truth_table),
                OracleSynthesis::Minterm => esop::minterms(&truth_table),
                _ => esop::best_fprm(&truth_table),
            };
            let mut circuit = Circuit::with_size("oracle", n as u32 + 1, 0);
            let result = QubitId::from(n);
            for cube in &cubes {
                append_cube(&mut circuit, cube, n, result)?;
            }
            BitflipOracle {
                circuit,
                num_inputs: n,
                num_ancillas: 0,
                result_qubit: result,
                synthesis,
            }
        }
    };

    debug!(
        synthesis = %synthesis,
        qubits = oracle.num_qubits(),
        ops = oracle.circuit.num_ops(),
        "synthesized bitflip oracle"
    );
    Ok(oracle)
}

/// Toggle `target` when `cube` holds on the inputs.
fn append_cube(circuit: &mut Circuit, cube: &Cube, n: usize, target: QubitId) -> AlgoResult<()> {
    let controls: Vec<QubitId> = (0..n)
        .filter(|&j| (cube.mask >> j) & 1 == 1)
        .map(QubitId::from)
        .collect();
    let flipped: Vec<QubitId> = (0..n)
        .filter(|&j| ((cube.negated & cube.mask) >> j) & 1 == 1)
        .map(QubitId::from)
        .collect();

    for &q in &flipped {
        circuit.x(q)?;
    }
    circuit.mcx(&controls, target)?;
    for &q in &flipped {
        circuit.x(q)?;
    }
    Ok(())
}

/// Literal set of a clause after removing duplicates; `None` for a tautology.
fn clause_literals(clause: &Clause) -> Option<Vec<(usize, bool)>> {
    let mut literals: Vec<(usize, bool)> = Vec::with_capacity(clause.len());
    for lit in clause.literals() {
        let var = lit.var() as usize - 1;
        match literals.iter().find(|(v, _)| *v == var) {
            Some(&(_, negated)) if negated != lit.is_negated() => return None,
            Some(_) => {}
            None => literals.push((var, lit.is_negated())),
        }
    }
    Some(literals)
}

/// `ancilla ← OR(clause)`, via De Morgan: X the positive literals, MCX, X back,
/// X the ancilla.
fn compute_clause(circuit: &mut Circuit, clause: &Clause, ancilla: QubitId) -> AlgoResult<()> {
    let Some(literals) = clause_literals(clause) else {
        circuit.x(ancilla)?;
        return Ok(());
    };
    let controls: Vec<QubitId> = literals.iter().map(|&(v, _)| QubitId::from(v)).collect();
    let positive: Vec<QubitId> = literals
        .iter()
        .filter(|(_, negated)| !negated)
        .map(|&(v, _)| QubitId::from(v))
        .collect();

    for &q in &positive {
        circuit.x(q)?;
    }
    circuit.mcx(&controls, ancilla)?;
    for &q in &positive {
        circuit.x(q)?;
    }
    circuit.x(ancilla)?;
    Ok(())
}

fn clause_ancilla_oracle(cnf: &Cnf) -> AlgoResult<BitflipOracle> {
    let n = cnf.num_vars() as usize;
    let m = cnf.num_clauses();
    let result = QubitId::from(n + m);
    let ancillas: Vec<QubitId> = (n..n + m).map(QubitId::from).collect();

    let mut compute = Circuit::with_size("clauses", (n + m + 1) as u32, 0);
    for (clause, &ancilla) in cnf.clauses().iter().zip(&ancillas) {
        compute_clause(&mut compute, clause, ancilla)?;
    }
    let identity: Vec<QubitId> = (0..n + m + 1).map(QubitId::from).collect();

    let mut circuit = Circuit::with_size("oracle", (n + m + 1) as u32, 0);
    circuit.append(&compute, &identity)?;
    circuit.mcx(&ancillas, result)?;
    circuit.append(&compute.inverse()?, &identity)?;

    Ok(BitflipOracle {
        circuit,
        num_inputs: n,
        num_ancillas: m,
        result_qubit: result,
        synthesis: OracleSynthesis::ClauseAncilla,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use satqaoa_adapter_sim::Statevector;
    use satqaoa_sat::RandomKSat;
    use proptest::prelude::*;

    /// Run the oracle on every basis input and check it flips exactly on
    /// satisfying assignments with ancillas returned to zero.
    fn assert_oracle_correct(cnf: &Cnf, oracle: &BitflipOracle) {
        let n = oracle.num_inputs;
        let result_bit = 1usize << oracle.result_qubit.index();
        for x in 0..1usize << n {
            for r in [0, result_bit] {
                let mut sv = Statevector::basis(oracle.num_qubits(), x | r);
                for inst in oracle.circuit.instructions() {
                    sv.apply(inst).unwrap();
                }
                let expected = if cnf.evaluate_index(x) { (x | r) ^ result_bit } else { x | r };
                let p = sv.probabilities()[expected];
                assert!(
                    (p - 1.0).abs() < 1e-9,
                    "{:?}: input {x:b}, r={r}, expected {expected:b}",
                    oracle.synthesis
                );
            }
        }
    }

    #[test]
    fn test_all_strategies_on_small_formula() {
        let cnf = Cnf::parse_dimacs("p cnf 3 3\n1 -2 3 0\n-1 2 0\n2 3 0\n").unwrap();
        for synthesis in OracleSynthesis::ALL {
            let oracle = bitflip_oracle(&cnf, synthesis).unwrap();
            assert_oracle_correct(&cnf, &oracle);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_every_strategy_matches_formula(
            num_vars in 1u32..=5,
            num_clauses in 1usize..=8,
            k in 1u32..=3,
            seed in any::<u64>(),
        ) {
            let cnf = RandomKSat::new(num_vars, num_clauses, seed)
                .with_k(k.min(num_vars))
                .generate()
                .unwrap();
            for synthesis in OracleSynthesis::ALL {
                let oracle = bitflip_oracle(&cnf, synthesis).unwrap();
                prop_assert_eq!(oracle.num_inputs, num_vars as usize);
                assert_oracle_correct(&cnf, &oracle);
            }
        }
    }

    #[test]
    fn test_qubit_layout() {
        let cnf = RandomKSat::new(3, 5, 1).generate().unwrap();

        let esop = bitflip_oracle(&cnf, OracleSynthesis::Fprm).unwrap();
        assert_eq!(esop.num_qubits(), 4);
        assert_eq!(esop.result_qubit, QubitId(3));
        assert_eq!(esop.num_ancillas, 0);

        let ancilla = bitflip_oracle(&cnf, OracleSynthesis::ClauseAncilla).unwrap();
        assert_eq!(ancilla.num_qubits(), 3 + 5 + 1);
        assert_eq!(ancilla.result_qubit, QubitId(8));
        assert_eq!(ancilla.num_ancillas, 5);
    }

    #[test]
    fn test_tautological_and_duplicate_literals() {
        let cnf = Cnf::parse_dimacs("p cnf 2 2\n1 -1 0\n2 2 0\n").unwrap();
        let oracle = bitflip_oracle(&cnf, OracleSynthesis::ClauseAncilla).unwrap();
        assert_oracle_correct(&cnf, &oracle);
    }

    #[test]
    fn test_unsatisfiable_formula_gives_empty_esop() {
        let cnf = Cnf::parse_dimacs("p cnf 1 2\n1 0\n-1 0\n").unwrap();
        let oracle = bitflip_oracle(&cnf, OracleSynthesis::Fprm).unwrap();
        assert_eq!(oracle.circuit.num_ops(), 0);
    }

    #[test]
    fn test_parse_synthesis() {
        assert_eq!("clause-ancilla".parse(), Ok(OracleSynthesis::ClauseAncilla));
        assert_eq!("FPRM".parse(), Ok(OracleSynthesis::Fprm));
        assert!("kronecker".parse::<OracleSynthesis>().is_err());
    }
}
