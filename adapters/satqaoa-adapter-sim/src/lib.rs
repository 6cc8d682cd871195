//! Local Statevector Simulator
//!
//! Executes satqaoa circuits exactly and samples measurement shots from a
//! seeded RNG, so experiment runs can be reproduced bit for bit.
//!
//! # Features
//!
//! - **Exact Simulation**: full statevector, including multi-controlled gates
//! - **Deterministic Sampling**: evolve once, draw all shots from a seeded RNG
//! - **Register Convention**: clbit 0 is the rightmost bitstring character
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 24 | ~256 MB | Slow |
//!
//! # Example
//!
//! ```rust
//! use satqaoa_adapter_sim::{Backend, SimulatorBackend};
//! use satqaoa_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! let backend = SimulatorBackend::with_seed(7);
//! let result = backend.run(&circuit, 1000).unwrap();
//! assert_eq!(result.counts.get("00") + result.counts.get("11"), 1000);
//! ```

mod backend;
mod error;
mod result;
mod simulator;
mod statevector;

pub use backend::{Backend, Capabilities};
pub use error::{SimError, SimResult};
pub use result::{Counts, ExecutionResult};
pub use simulator::{DEFAULT_MAX_QUBITS, DEFAULT_MAX_SHOTS, SimulatorBackend};
pub use statevector::{Sampler, Statevector};
