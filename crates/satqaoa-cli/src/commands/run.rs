//! Run command implementation.

use std::path::PathBuf;

use anyhow::Result;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;

use satqaoa_adapter_sim::SimulatorBackend;
use satqaoa_algo::{
    OptimizerKind, OracleSynthesis, QaoaBitflip, QaoaVariant, exact_success_probability,
    objective_value,
};
use satqaoa_sat::derive_seed;

use super::common::{
    create_spinner, load_cnf, print_counts, print_header, print_result, print_section,
};
use crate::OutputFormat;

/// Arguments of the run command.
pub struct RunArgs {
    pub input: PathBuf,
    pub variant: QaoaVariant,
    pub layers: usize,
    pub shots: u32,
    pub seed: u64,
    pub optimizer: String,
    pub maxiter: usize,
    pub synthesis: OracleSynthesis,
    pub top: usize,
    pub format: OutputFormat,
}

/// Execute the run command.
pub fn execute(args: &RunArgs) -> Result<()> {
    let cnf = load_cnf(&args.input)?;
    let optimizer = OptimizerKind::from_name(&args.optimizer)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown optimizer: '{}'. Available: cobyla, spsa",
                args.optimizer
            )
        })?
        .with_maxiter(args.maxiter)
        .reseeded(derive_seed(args.seed, 2));

    let qaoa = QaoaBitflip::new(cnf.clone(), args.variant).with_synthesis(args.synthesis);
    let ansatz = qaoa.build_circuit(args.layers)?;
    let backend = SimulatorBackend::with_seed(derive_seed(args.seed, 0));
    let mut rng = StdRng::seed_from_u64(derive_seed(args.seed, 1));

    let table = args.format == OutputFormat::Table;
    if table {
        println!(
            "{} Optimizing {} QAOA (p = {}) on {} with {} ({} shots per evaluation)",
            style("→").cyan().bold(),
            style(args.variant).yellow(),
            args.layers,
            style(args.input.display()).green(),
            optimizer.name(),
            args.shots
        );
        println!(
            "  Circuit: {} qubits, depth {}, {} parameters",
            ansatz.circuit().num_qubits(),
            ansatz.circuit().depth(),
            ansatz.num_parameters()
        );
    }

    let spinner = table.then(|| create_spinner("Optimizing...")).transpose()?;
    let outcome = qaoa.run(args.layers, args.shots, &backend, &optimizer, None, &mut rng)?;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let exact = exact_success_probability(&cnf, &ansatz, &outcome.best_params, &backend)?;
    let baseline = cnf.satisfying_fraction()?;

    if !table {
        let report = serde_json::json!({
            "variant": args.variant,
            "layers": args.layers,
            "synthesis": args.synthesis,
            "parameter_names": ansatz.parameter_names(),
            "exact_success_probability": exact,
            "classical_baseline": baseline,
            "outcome": outcome,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header("QAOA result");
    print_section("Parameters");
    for (name, value) in ansatz.parameter_names().iter().zip(&outcome.best_params) {
        print_result(name, format!("{value:.6}"));
    }

    print_section("Statistics");
    print_result("Best objective", format!("{:.4}", outcome.best_value));
    print_result(
        "Success probability",
        format!("{:.4}", outcome.success_probability),
    );
    print_result("Exact success probability", format!("{exact:.4}"));
    print_result("Random guessing", format!("{baseline:.4}"));
    print_result("Evaluations", outcome.optimization.num_evaluations);
    print_result("Converged", outcome.optimization.converged);

    print_section(&format!("Top outcomes ({} shots)", outcome.best_counts.total()));
    print_counts(&outcome.best_counts, args.top, |bits| {
        objective_value(&cnf, bits).is_ok_and(|v| v == 0.0)
    });

    Ok(())
}
