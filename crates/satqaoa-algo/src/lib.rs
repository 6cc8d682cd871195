//! QAOA for 3SAT with a bitflip-oracle phase separator.
//!
//! The phase separator of every layer is derived from a reversible circuit
//! that flips a result qubit when the formula is satisfied:
//!
//! ```text
//! |x⟩|0⟩  ──  oracle  ──  |x⟩|f(x)⟩
//! ```
//!
//! Conjugating a phase gate on the result qubit with the oracle marks the
//! unsatisfying assignments with `e^{-iγ}`. At `γ = π` this is the Grover
//! oracle, which is where the amplitude-amplification flavour comes from.
//!
//! # Variants
//!
//! | Variant | Phase separator | Mixer | Parameters |
//! |---------|-----------------|-------|------------|
//! | [`QaoaVariant::Standard`] | oracle, `γ_k` | `RX(2β_k)` | `2p` |
//! | [`QaoaVariant::GroverPhase`] | oracle, `π` | `RX(2β_k)` | `p` |
//! | [`QaoaVariant::GroverMixer`] | oracle, `γ_k` | Grover, `β_k` | `2p` |
//!
//! # Example
//!
//! ```rust
//! use satqaoa_algo::{OracleSynthesis, QaoaAnsatz, QaoaVariant, bitflip_oracle};
//! use satqaoa_sat::Cnf;
//!
//! let cnf = Cnf::parse_dimacs("p cnf 3 2\n1 -2 3 0\n-1 2 0\n").unwrap();
//!
//! let oracle = bitflip_oracle(&cnf, OracleSynthesis::Fprm).unwrap();
//! assert_eq!(oracle.num_qubits(), 4);
//!
//! let ansatz = QaoaAnsatz::new(&cnf, QaoaVariant::Standard, 2).unwrap();
//! assert_eq!(ansatz.num_parameters(), 4);
//! let bound = ansatz.bind(&[0.1, 0.2, 0.3, 0.4]).unwrap();
//! assert!(!bound.is_parameterized());
//! ```

pub mod ansatz;
pub mod error;
pub mod esop;
pub mod layers;
pub mod objective;
pub mod optimizers;
pub mod oracle;
pub mod runner;

pub use ansatz::{QaoaAnsatz, QaoaVariant, beta_name, gamma_name};
pub use error::{AlgoError, AlgoResult};
pub use layers::{cost_circuit, grover_mixer, standard_mixer};
pub use objective::{
    assignment_from_bitstring, exact_success_probability, mean_objective, objective_value,
    success_probability,
};
pub use optimizers::{Cobyla, OptimizationResult, Optimizer, OptimizerKind, Spsa};
pub use oracle::{BitflipOracle, OracleSynthesis, bitflip_oracle};
pub use runner::{BEST_VALUE_SENTINEL, QaoaBitflip, RunOutcome};
