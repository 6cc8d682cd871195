//! Generate command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use satqaoa_sat::RandomKSat;

const MAX_SATISFIABLE_ATTEMPTS: u32 = 10_000;

/// Execute the generate command.
pub fn execute(
    vars: u32,
    clauses: Option<usize>,
    ratio: f64,
    k: u32,
    seed: u64,
    satisfiable: bool,
    output: Option<&Path>,
) -> Result<()> {
    let clauses = match clauses {
        Some(m) => m,
        None if ratio.is_finite() && ratio > 0.0 => (ratio * f64::from(vars)).round() as usize,
        None => anyhow::bail!("--ratio must be positive, got {ratio}"),
    };

    let generator = RandomKSat::new(vars, clauses, seed).with_k(k);
    let (cnf, used_seed) = if satisfiable {
        let generated = generator.generate_satisfiable(MAX_SATISFIABLE_ATTEMPTS)?;
        (generated.cnf, generated.seed)
    } else {
        (generator.generate()?, seed)
    };

    let dimacs = format!(
        "c random {k}-SAT, seed {used_seed}\n{}",
        cnf.to_dimacs()
    );

    match output {
        Some(path) => {
            fs::write(path, &dimacs)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Wrote {} variables, {} clauses (ratio {:.2}) to {}",
                style("✓").green().bold(),
                cnf.num_vars(),
                cnf.num_clauses(),
                cnf.ratio(),
                style(path.display()).green()
            );
        }
        None => print!("{dimacs}"),
    }

    Ok(())
}
