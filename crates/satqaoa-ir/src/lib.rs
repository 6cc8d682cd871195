//! Circuit representation for bitflip-oracle QAOA experiments.
//!
//! This crate provides the data structures every other satqaoa crate builds
//! on: typed wires, symbolic angles, a small standard gate set that includes
//! multi-controlled X and phase gates, and a flat [`Circuit`] with a
//! validating builder API.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`], including [`StandardGate::MCX`] and
//!   [`StandardGate::MCP`] for oracle and Grover-mixer synthesis
//! - **Parameters**: [`ParameterExpression`] for `gamma_k` / `beta_k` angles
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Circuit**: [`Circuit`] builder, composition, inversion and binding
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use satqaoa_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_clbits(), 2);
//! assert_eq!(circuit.depth(), 3);
//! ```
//!
//! # Example: Parameterized Circuit
//!
//! ```rust
//! use rustc_hash::FxHashMap;
//! use satqaoa_ir::{Circuit, ParameterExpression, QubitId};
//!
//! let mut circuit = Circuit::with_size("mixer", 1, 0);
//! let beta = ParameterExpression::symbol("beta_0");
//! circuit.rx(beta.scaled(2.0), QubitId(0)).unwrap();
//!
//! let mut values = FxHashMap::default();
//! values.insert("beta_0".to_string(), 0.4);
//! let bound = circuit.bind_parameters(&values).unwrap();
//! assert!(!bound.is_parameterized());
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | Clifford+T phases |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates |
//! | `P` | 1 | Phase gate |
//! | `CX`, `CZ`, `CP` | 2 | Controlled gates |
//! | `CCX` | 3 | Toffoli gate |
//! | `MCX` | n+1 | Multi-controlled X |
//! | `MCP` | n+1 | Multi-controlled phase |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use parameter::ParameterExpression;
pub use qubit::{ClbitId, QubitId};
