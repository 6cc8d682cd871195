//! Backend trait definition.

use serde::{Deserialize, Serialize};

use satqaoa_ir::Circuit;

use crate::error::SimResult;
use crate::result::ExecutionResult;

/// What a backend can execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Maximum number of shots per run.
    pub max_shots: u32,
    /// Whether this is a simulator.
    pub is_simulator: bool,
    /// Additional capability flags such as `"statevector"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for a statevector simulator.
    pub fn simulator(num_qubits: u32, max_shots: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            max_shots,
            is_simulator: true,
            features: vec!["statevector".into(), "seeded".into()],
        }
    }
}

/// Something that turns a bound circuit into measurement counts.
///
/// Runs are synchronous: the experiment loop evaluates one circuit per
/// optimizer step and needs the counts before it can continue.
pub trait Backend {
    /// Name of this backend.
    fn name(&self) -> &str;

    /// Capabilities of this backend.
    fn capabilities(&self) -> Capabilities;

    /// Execute `circuit` for `shots` shots.
    fn run(&self, circuit: &Circuit, shots: u32) -> SimResult<ExecutionResult>;
}
