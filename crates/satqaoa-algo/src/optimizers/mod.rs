//! Classical optimizers for variational circuits.

mod cobyla;
mod spsa;

pub use cobyla::Cobyla;
pub use spsa::Spsa;

use serde::{Deserialize, Serialize};

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Optimal parameter values.
    pub optimal_params: Vec<f64>,
    /// Optimal objective value.
    pub optimal_value: f64,
    /// Number of function evaluations.
    pub num_evaluations: usize,
    /// Number of iterations.
    pub num_iterations: usize,
    /// Best objective value after each improving iteration.
    pub history: Vec<f64>,
    /// Whether the optimization converged.
    pub converged: bool,
}

/// A derivative-free minimizer.
pub trait Optimizer {
    /// Minimize `objective` starting from `initial_params`.
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> f64;
}

/// Optimizer selection, as it appears in experiment configs.
///
/// ```yaml
/// optimizer:
///   method: cobyla
///   maxiter: 200
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum OptimizerKind {
    /// [`Cobyla`].
    Cobyla(Cobyla),
    /// [`Spsa`].
    Spsa(Spsa),
}

impl Default for OptimizerKind {
    fn default() -> Self {
        OptimizerKind::Cobyla(Cobyla::default())
    }
}

impl OptimizerKind {
    /// Method name.
    pub fn name(&self) -> &'static str {
        match self {
            OptimizerKind::Cobyla(_) => "cobyla",
            OptimizerKind::Spsa(_) => "spsa",
        }
    }

    /// Default settings for a method name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "cobyla" => Some(OptimizerKind::Cobyla(Cobyla::default())),
            "spsa" => Some(OptimizerKind::Spsa(Spsa::default())),
            _ => None,
        }
    }

    /// Iteration budget.
    pub fn maxiter(&self) -> usize {
        match self {
            OptimizerKind::Cobyla(o) => o.maxiter,
            OptimizerKind::Spsa(o) => o.maxiter,
        }
    }

    /// Same method with a different iteration budget.
    #[must_use]
    pub fn with_maxiter(self, maxiter: usize) -> Self {
        match self {
            OptimizerKind::Cobyla(o) => OptimizerKind::Cobyla(o.with_maxiter(maxiter)),
            OptimizerKind::Spsa(o) => OptimizerKind::Spsa(o.with_maxiter(maxiter)),
        }
    }

    /// Same method with its stochastic parts reseeded. COBYLA is deterministic.
    #[must_use]
    pub fn reseeded(self, seed: u64) -> Self {
        match self {
            OptimizerKind::Spsa(o) => OptimizerKind::Spsa(o.with_seed(seed)),
            other => other,
        }
    }
}

impl Optimizer for OptimizerKind {
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> f64,
    {
        match self {
            OptimizerKind::Cobyla(o) => o.minimize(objective, initial_params),
            OptimizerKind::Spsa(o) => o.minimize(objective, initial_params),
        }
    }
}
