//! QAOA runner: optimize the ansatz parameters against a backend.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, info};

use satqaoa_adapter_sim::{Backend, Counts};
use satqaoa_sat::Cnf;

use crate::ansatz::{QaoaAnsatz, QaoaVariant};
use crate::error::{AlgoError, AlgoResult};
use crate::objective::{mean_objective, success_probability};
use crate::optimizers::{OptimizationResult, Optimizer};
use crate::oracle::OracleSynthesis;

/// Starting value for the best objective seen. Real objectives lie in `[0, 1]`.
pub const BEST_VALUE_SENTINEL: f64 = 1000.0;

/// Result of a QAOA optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// What the optimizer reported.
    pub optimization: OptimizationResult,
    /// Counts from re-running the best parameters.
    pub best_counts: Counts,
    /// Lowest mean objective seen across all evaluations.
    pub best_value: f64,
    /// Parameters that produced `best_value`.
    pub best_params: Vec<f64>,
    /// Satisfying fraction of `best_counts`.
    pub success_probability: f64,
    /// Where the optimizer started.
    pub initial_parameters: Vec<f64>,
}

/// QAOA with a bitflip-oracle phase separator for one formula.
///
/// # Example
///
/// ```
/// use satqaoa_adapter_sim::SimulatorBackend;
/// use satqaoa_algo::{Cobyla, QaoaBitflip, QaoaVariant};
/// use satqaoa_sat::Cnf;
/// use rand::SeedableRng;
///
/// let cnf = Cnf::parse_dimacs("p cnf 2 1\n1 2 0\n").unwrap();
/// let qaoa = QaoaBitflip::new(cnf, QaoaVariant::Standard);
/// let backend = SimulatorBackend::with_seed(1);
/// let optimizer = Cobyla::new().with_maxiter(20);
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
///
/// let outcome = qaoa.run(1, 256, &backend, &optimizer, None, &mut rng).unwrap();
/// assert!(outcome.best_value <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct QaoaBitflip {
    cnf: Cnf,
    variant: QaoaVariant,
    synthesis: OracleSynthesis,
}

impl QaoaBitflip {
    /// Create a runner with the default oracle synthesis.
    pub fn new(cnf: Cnf, variant: QaoaVariant) -> Self {
        Self {
            cnf,
            variant,
            synthesis: OracleSynthesis::default(),
        }
    }

    /// Set the oracle synthesis strategy.
    #[must_use]
    pub fn with_synthesis(mut self, synthesis: OracleSynthesis) -> Self {
        self.synthesis = synthesis;
        self
    }

    /// The formula.
    pub fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// The variant.
    pub fn variant(&self) -> QaoaVariant {
        self.variant
    }

    /// The oracle synthesis strategy.
    pub fn synthesis(&self) -> OracleSynthesis {
        self.synthesis
    }

    /// Build the symbolic circuit for `p` layers.
    pub fn build_circuit(&self, p: usize) -> AlgoResult<QaoaAnsatz> {
        QaoaAnsatz::with_synthesis(&self.cnf, self.variant, p, self.synthesis)
    }

    /// Uniform random parameters in `[0, π)`.
    pub fn random_parameters<R: Rng + ?Sized>(&self, p: usize, rng: &mut R) -> Vec<f64> {
        (0..self.variant.num_parameters(p))
            .map(|_| rng.gen_range(0.0..PI))
            .collect()
    }

    /// Run `p` layers at fixed parameters and return the counts.
    pub fn get_outputs<B: Backend + ?Sized>(
        &self,
        p: usize,
        params: &[f64],
        shots: u32,
        backend: &B,
    ) -> AlgoResult<Counts> {
        let ansatz = self.build_circuit(p)?;
        execute(&ansatz, params, shots, backend)
    }

    /// Optimize `p` layers.
    ///
    /// Every objective evaluation samples `shots` shots. The outcome reports
    /// the best evaluation seen, which for sampled objectives can differ
    /// from the point the optimizer finished on.
    pub fn run<B, O, R>(
        &self,
        p: usize,
        shots: u32,
        backend: &B,
        optimizer: &O,
        initial_parameters: Option<Vec<f64>>,
        rng: &mut R,
    ) -> AlgoResult<RunOutcome>
    where
        B: Backend + ?Sized,
        O: Optimizer,
        R: Rng + ?Sized,
    {
        let ansatz = self.build_circuit(p)?;
        let initial = match initial_parameters {
            Some(params) if params.len() != ansatz.num_parameters() => {
                return Err(AlgoError::ParameterCount {
                    expected: ansatz.num_parameters(),
                    got: params.len(),
                });
            }
            Some(params) => params,
            None => self.random_parameters(p, rng),
        };

        info!(
            variant = %self.variant,
            p,
            shots,
            qubits = ansatz.circuit().num_qubits(),
            backend = backend.name(),
            "starting QAOA optimization"
        );

        let mut best_value = BEST_VALUE_SENTINEL;
        let mut best_params = initial.clone();
        let mut failure: Option<AlgoError> = None;

        let mut evaluate = |params: &[f64]| -> f64 {
            if failure.is_some() {
                return BEST_VALUE_SENTINEL;
            }
            let value = execute(&ansatz, params, shots, backend)
                .and_then(|counts| mean_objective(&self.cnf, &counts));
            match value {
                Ok(value) => {
                    if value < best_value {
                        debug!(value, ?params, "new best objective");
                        best_value = value;
                        best_params = params.to_vec();
                    }
                    value
                }
                Err(e) => {
                    failure = Some(e);
                    BEST_VALUE_SENTINEL
                }
            }
        };

        let optimization = optimizer.minimize(&mut evaluate, initial.clone());
        if let Some(e) = failure {
            return Err(e);
        }

        let best_counts = execute(&ansatz, &best_params, shots, backend)?;
        let success_probability = success_probability(&self.cnf, &best_counts)?;

        info!(
            best_value,
            success_probability,
            evaluations = optimization.num_evaluations,
            "QAOA optimization finished"
        );

        Ok(RunOutcome {
            optimization,
            best_counts,
            best_value,
            best_params,
            success_probability,
            initial_parameters: initial,
        })
    }
}

fn execute<B: Backend + ?Sized>(
    ansatz: &QaoaAnsatz,
    params: &[f64],
    shots: u32,
    backend: &B,
) -> AlgoResult<Counts> {
    let circuit = ansatz.bind(params)?;
    Ok(backend.run(&circuit, shots)?.counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizers::{Cobyla, Spsa};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use satqaoa_adapter_sim::SimulatorBackend;

    fn cnf() -> Cnf {
        // (x1 or x2) and (not x1 or x2): satisfied iff x2
        Cnf::parse_dimacs("p cnf 2 2\n1 2 0\n-1 2 0\n").unwrap()
    }

    #[test]
    fn test_random_parameters_in_range() {
        let qaoa = QaoaBitflip::new(cnf(), QaoaVariant::GroverPhase);
        let mut rng = StdRng::seed_from_u64(3);
        let params = qaoa.random_parameters(3, &mut rng);
        assert_eq!(params.len(), 3);
        assert!(params.iter().all(|&x| (0.0..PI).contains(&x)));
    }

    #[test]
    fn test_get_outputs_totals_shots() {
        let qaoa = QaoaBitflip::new(cnf(), QaoaVariant::Standard);
        let backend = SimulatorBackend::with_seed(5);
        let counts = qaoa.get_outputs(1, &[0.4, 0.2], 100, &backend).unwrap();
        assert_eq!(counts.total(), 100);
        assert!(qaoa.get_outputs(1, &[0.4], 100, &backend).is_err());
    }

    #[test]
    fn test_run_tracks_best_evaluation() {
        let qaoa = QaoaBitflip::new(cnf(), QaoaVariant::Standard);
        let backend = SimulatorBackend::with_seed(11);
        let mut rng = StdRng::seed_from_u64(11);
        let outcome = qaoa
            .run(1, 200, &backend, &Cobyla::new().with_maxiter(30), None, &mut rng)
            .unwrap();

        assert!(outcome.best_value < BEST_VALUE_SENTINEL);
        assert!(outcome.best_value <= outcome.optimization.history[0]);
        assert_eq!(outcome.best_params.len(), 2);
        assert_eq!(outcome.initial_parameters.len(), 2);
        assert_eq!(outcome.best_counts.total(), 200);
        assert!((0.0..=1.0).contains(&outcome.success_probability));
    }

    #[test]
    fn test_run_is_reproducible() {
        let qaoa = QaoaBitflip::new(cnf(), QaoaVariant::GroverMixer);
        let run = || {
            let backend = SimulatorBackend::with_seed(2);
            let mut rng = StdRng::seed_from_u64(2);
            qaoa.run(1, 64, &backend, &Spsa::new().with_maxiter(5), None, &mut rng)
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_run_rejects_wrong_initial_parameters() {
        let qaoa = QaoaBitflip::new(cnf(), QaoaVariant::GroverPhase);
        let backend = SimulatorBackend::with_seed(0);
        let mut rng = StdRng::seed_from_u64(0);
        let err = qaoa
            .run(2, 10, &backend, &Cobyla::new(), Some(vec![0.1]), &mut rng)
            .unwrap_err();
        assert!(matches!(err, AlgoError::ParameterCount { expected: 2, got: 1 }));
    }

    #[test]
    fn test_backend_failure_surfaces() {
        let qaoa = QaoaBitflip::new(cnf(), QaoaVariant::Standard);
        // three qubits needed, one allowed
        let backend = SimulatorBackend::with_seed(0).with_max_qubits(1);
        let mut rng = StdRng::seed_from_u64(0);
        let err = qaoa
            .run(1, 10, &backend, &Cobyla::new().with_maxiter(3), None, &mut rng)
            .unwrap_err();
        assert!(matches!(err, AlgoError::Sim(_)));
    }
}
