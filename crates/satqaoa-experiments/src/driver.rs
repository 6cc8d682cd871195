//! Sequential experiment driver.
//!
//! Seeds form a tree rooted at `config.seed`:
//!
//! ```text
//! config.seed
//! └── instance i ─────────── formula
//!     └── depth p
//!         └── repetition r ── shot sampling, initial parameters, optimizer
//! ```
//!
//! Instances depend only on the base seed and their index, so every variant
//! is evaluated on the same formulas.

use indicatif::ProgressBar;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use satqaoa_adapter_sim::SimulatorBackend;
use satqaoa_algo::{QaoaBitflip, QaoaVariant, exact_success_probability};
use satqaoa_sat::{Cnf, RandomKSat, derive_seed};

use crate::archive::{ExperimentArchive, archive_path, save_archive};
use crate::config::ExperimentConfig;
use crate::error::ExperimentResult;
use crate::record::ExperimentRecord;

const STREAM_SHOTS: u64 = 0;
const STREAM_INIT: u64 = 1;
const STREAM_OPTIMIZER: u64 = 2;

/// A generated formula and the seed it came from.
#[derive(Debug, Clone)]
pub struct Instance {
    pub index: usize,
    pub seed: u64,
    pub cnf: Cnf,
}

/// Generate instance `index` of the sweep.
pub fn generate_instance(config: &ExperimentConfig, index: usize) -> ExperimentResult<Instance> {
    let generator = RandomKSat::new(
        config.num_vars,
        config.clauses_per_instance(),
        derive_seed(config.seed, index as u64),
    );
    let (cnf, seed) = if config.require_satisfiable {
        let generated = generator.generate_satisfiable(config.max_generation_attempts)?;
        debug!(
            index,
            attempts = generated.attempts,
            "generated satisfiable instance"
        );
        (generated.cnf, generated.seed)
    } else {
        (generator.generate()?, generator.seed)
    };
    Ok(Instance { index, seed, cnf })
}

/// Run every instance, depth and repetition of `variant`.
///
/// Records come back in loop order: instance, then depth, then repetition.
pub fn run_variant(
    config: &ExperimentConfig,
    variant: QaoaVariant,
    progress: Option<&ProgressBar>,
) -> ExperimentResult<Vec<ExperimentRecord>> {
    config.validate()?;
    let mut records = Vec::with_capacity(config.runs_per_variant());

    for index in 0..config.instances {
        let instance = generate_instance(config, index)?;
        let qaoa = QaoaBitflip::new(instance.cnf.clone(), variant).with_synthesis(config.synthesis);
        let num_satisfying = instance.cnf.count_satisfying()?;
        let classical_baseline = instance.cnf.satisfying_fraction()?;
        let dimacs = instance.cnf.to_dimacs();

        for &p in &config.depths {
            let ansatz = qaoa.build_circuit(p)?;

            for repetition in 0..config.repetitions {
                if let Some(pb) = progress {
                    pb.set_message(format!("{variant} instance {index} p={p} rep {repetition}"));
                }

                let run_seed = derive_seed(derive_seed(instance.seed, p as u64), repetition as u64);
                let backend = SimulatorBackend::with_seed(derive_seed(run_seed, STREAM_SHOTS));
                let mut rng = StdRng::seed_from_u64(derive_seed(run_seed, STREAM_INIT));
                let optimizer = config
                    .optimizer
                    .clone()
                    .reseeded(derive_seed(run_seed, STREAM_OPTIMIZER));

                let outcome = qaoa.run(p, config.shots, &backend, &optimizer, None, &mut rng)?;
                let exact =
                    exact_success_probability(&instance.cnf, &ansatz, &outcome.best_params, &backend)?;

                debug!(
                    %variant,
                    index,
                    p,
                    repetition,
                    success = outcome.success_probability,
                    exact,
                    "run finished"
                );

                records.push(ExperimentRecord {
                    variant,
                    synthesis: config.synthesis,
                    instance: index,
                    instance_seed: instance.seed,
                    num_vars: instance.cnf.num_vars(),
                    num_clauses: instance.cnf.num_clauses(),
                    p,
                    repetition,
                    shots: config.shots,
                    dimacs: dimacs.clone(),
                    num_satisfying,
                    initial_params: outcome.initial_parameters,
                    best_params: outcome.best_params,
                    best_value: outcome.best_value,
                    success_probability: outcome.success_probability,
                    exact_success_probability: exact,
                    classical_baseline,
                    num_evaluations: outcome.optimization.num_evaluations,
                    converged: outcome.optimization.converged,
                    counts: outcome.best_counts,
                });

                if let Some(pb) = progress {
                    pb.inc(1);
                }
            }
        }
    }

    Ok(records)
}

/// Run `variant` and write its archive to `path`.
pub fn run_and_save(
    config: &ExperimentConfig,
    variant: QaoaVariant,
    path: impl AsRef<Path>,
    progress: Option<&ProgressBar>,
) -> ExperimentResult<ExperimentArchive> {
    let records = run_variant(config, variant, progress)?;
    let archive = ExperimentArchive::new(variant, config.clone(), records);
    save_archive(path, &archive)?;
    Ok(archive)
}

/// Runs every configured variant into `<output_dir>/<variant>.json.gz`.
#[derive(Debug, Clone)]
pub struct ExperimentSuite {
    config: ExperimentConfig,
}

impl ExperimentSuite {
    /// Create a suite for a validated configuration.
    pub fn new(config: ExperimentConfig) -> ExperimentResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration.
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Optimizations across all variants.
    pub fn total_runs(&self) -> usize {
        self.config.variants.len() * self.config.runs_per_variant()
    }

    /// Where `variant`'s archive goes.
    pub fn archive_path(&self, variant: QaoaVariant) -> PathBuf {
        archive_path(&self.config.output_dir, variant)
    }

    /// Run all variants in order and return the archive paths.
    pub fn run(&self, progress: Option<&ProgressBar>) -> ExperimentResult<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let mut paths = Vec::with_capacity(self.config.variants.len());
        for &variant in &self.config.variants {
            let path = self.archive_path(variant);
            info!("Running variant {} -> {}", variant, path.display());
            run_and_save(&self.config, variant, &path, progress)?;
            paths.push(path);
        }
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satqaoa_algo::{Cobyla, OptimizerKind};

    fn small_config() -> ExperimentConfig {
        ExperimentConfig {
            variants: vec![QaoaVariant::Standard, QaoaVariant::GroverPhase],
            num_vars: 3,
            num_clauses: Some(6),
            instances: 2,
            depths: vec![1, 2],
            shots: 64,
            repetitions: 2,
            optimizer: OptimizerKind::Cobyla(Cobyla::new().with_maxiter(8)),
            ..ExperimentConfig::default()
        }
    }

    #[test]
    fn test_instances_are_satisfiable_and_shared() {
        let config = small_config();
        for index in 0..config.instances {
            let a = generate_instance(&config, index).unwrap();
            let b = generate_instance(&config, index).unwrap();
            assert_eq!(a.cnf, b.cnf);
            assert!(a.cnf.is_satisfiable().unwrap());
            assert_eq!(a.cnf.num_clauses(), 6);
        }
    }

    #[test]
    fn test_run_variant_record_layout() {
        let config = small_config();
        let records = run_variant(&config, QaoaVariant::GroverPhase, None).unwrap();
        assert_eq!(records.len(), config.runs_per_variant());

        let order: Vec<_> = records
            .iter()
            .map(|r| (r.instance, r.p, r.repetition))
            .collect();
        assert_eq!(order[..4], [(0, 1, 0), (0, 1, 1), (0, 2, 0), (0, 2, 1)]);

        for r in &records {
            assert_eq!(r.best_params.len(), r.p);
            assert_eq!(r.counts.total(), 64);
            assert!((0.0..=1.0).contains(&r.exact_success_probability));
            assert!(r.classical_baseline > 0.0);
            assert_eq!(Cnf::parse_dimacs(&r.dimacs).unwrap().num_clauses(), 6);
        }
    }

    #[test]
    fn test_progress_counts_runs() {
        let config = small_config();
        let pb = ProgressBar::hidden();
        run_variant(&config, QaoaVariant::Standard, Some(&pb)).unwrap();
        assert_eq!(pb.position(), config.runs_per_variant() as u64);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config();
        config.depths.clear();
        assert!(run_variant(&config, QaoaVariant::Standard, None).is_err());
        assert!(ExperimentSuite::new(config).is_err());
    }
}
