//! One optimization result.

use serde::{Deserialize, Serialize};

use satqaoa_adapter_sim::Counts;
use satqaoa_algo::{OracleSynthesis, QaoaVariant};

/// Outcome of optimizing one variant at one depth on one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub variant: QaoaVariant,
    pub synthesis: OracleSynthesis,
    /// Index of the instance within the sweep.
    pub instance: usize,
    /// Seed the formula was generated from.
    pub instance_seed: u64,
    pub num_vars: u32,
    pub num_clauses: usize,
    /// Number of QAOA layers.
    pub p: usize,
    pub repetition: usize,
    pub shots: u32,
    /// The formula in DIMACS CNF.
    pub dimacs: String,
    pub num_satisfying: usize,
    pub initial_params: Vec<f64>,
    pub best_params: Vec<f64>,
    /// Lowest mean objective seen (fraction of unsatisfying shots).
    pub best_value: f64,
    /// Satisfying fraction when re-running `best_params`.
    pub success_probability: f64,
    /// Satisfying probability of the final state at `best_params`.
    pub exact_success_probability: f64,
    /// Success probability of guessing uniformly at random.
    pub classical_baseline: f64,
    pub num_evaluations: usize,
    pub converged: bool,
    /// Counts from re-running `best_params`.
    pub counts: Counts,
}

impl ExperimentRecord {
    /// `success_probability` relative to random guessing.
    ///
    /// `None` for unsatisfiable formulas.
    pub fn amplification(&self) -> Option<f64> {
        (self.classical_baseline > 0.0).then(|| self.success_probability / self.classical_baseline)
    }
}
