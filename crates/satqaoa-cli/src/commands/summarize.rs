//! Summarize command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use satqaoa_experiments::{SummaryRow, load_archive, summarize_records};

use crate::OutputFormat;

/// Execute the summarize command.
pub fn execute(archives: &[PathBuf], format: OutputFormat) -> Result<()> {
    let mut loaded = Vec::with_capacity(archives.len());
    for path in archives {
        let archive =
            load_archive(path).with_context(|| format!("Failed to load {}", path.display()))?;
        loaded.push(archive);
    }

    let rows = summarize_records(loaded.iter().flat_map(|a| &a.records));

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => print_table(&rows),
    }
    Ok(())
}

/// Print summary rows as an aligned table.
pub fn print_table(rows: &[SummaryRow]) {
    if rows.is_empty() {
        println!("  {}", style("(no records)").dim());
        return;
    }

    println!(
        "  {:<14} {:>3} {:>5} {:>9} {:>9} {:>9} {:>9} {:>9} {:>7}",
        style("variant").bold(),
        style("p").bold(),
        style("n").bold(),
        style("mean").bold(),
        style("min").bold(),
        style("max").bold(),
        style("exact").bold(),
        style("random").bold(),
        style("gain").bold(),
    );
    for row in rows {
        let gain = row
            .amplification
            .map_or_else(|| "-".to_string(), |g| format!("{g:.2}x"));
        println!(
            "  {:<14} {:>3} {:>5} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>7}",
            style(row.variant).cyan(),
            row.p,
            row.count,
            row.mean_success,
            row.min_success,
            row.max_success,
            row.mean_exact_success,
            row.mean_baseline,
            style(gain).green(),
        );
    }
}
