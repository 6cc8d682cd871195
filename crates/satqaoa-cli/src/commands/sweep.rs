//! Sweep command implementation.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use satqaoa_experiments::{ExperimentConfig, ExperimentSuite, load_archive, summarize};

use super::common::{create_progress_bar, print_header, print_result, print_section, print_success};
use super::summarize::print_table;

/// Execute the sweep command.
pub fn execute(config: Option<&Path>, output_dir: Option<PathBuf>, seed: Option<u64>) -> Result<()> {
    let mut config = ExperimentConfig::load(config)?;
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    info!(?config, "loaded experiment config");

    let suite = ExperimentSuite::new(config)?;
    let config = suite.config();

    print_header("QAOA experiment sweep");
    let variants: Vec<String> = config.variants.iter().map(ToString::to_string).collect();
    print_result("Variants", variants.join(", "));
    print_result(
        "Instances",
        format!(
            "{} × {} variables, {} clauses",
            config.instances,
            config.num_vars,
            config.clauses_per_instance()
        ),
    );
    let depths: Vec<String> = config.depths.iter().map(ToString::to_string).collect();
    print_result("Depths", depths.join(", "));
    print_result("Repetitions", config.repetitions);
    print_result("Shots", config.shots);
    print_result(
        "Optimizer",
        format!("{} (maxiter {})", config.optimizer.name(), config.optimizer.maxiter()),
    );
    print_result("Synthesis", config.synthesis);
    print_result("Seed", config.seed);
    print_result("Output", config.output_dir.display());
    println!();

    let pb = create_progress_bar(suite.total_runs() as u64, "starting")?;
    let paths = suite.run(Some(&pb))?;
    pb.finish_with_message("done");

    print_section("Archives");
    let mut rows = Vec::new();
    for path in &paths {
        print_success(&path.display().to_string());
        rows.extend(summarize(&load_archive(path)?));
    }

    print_section("Summary");
    print_table(&rows);

    Ok(())
}
