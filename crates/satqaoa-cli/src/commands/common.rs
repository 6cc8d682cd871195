//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use satqaoa_adapter_sim::Counts;
use satqaoa_sat::Cnf;

/// Load a formula from a DIMACS file.
pub fn load_cnf(path: &Path) -> Result<Cnf> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    Cnf::parse_dimacs(&source).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Progress bar for sweeps.
pub fn create_progress_bar(len: u64, message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    Ok(pb)
}

/// Spinner for single long-running operations.
pub fn create_spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(spinner)
}

pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
}

pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print the `top` most frequent outcomes with a bar per outcome.
///
/// `satisfies` marks outcomes that decode to a satisfying assignment.
pub fn print_counts(counts: &Counts, top: usize, satisfies: impl Fn(&str) -> bool) {
    let total = counts.total().max(1) as f64;

    for (bitstring, count) in counts.top(top) {
        let prob = count as f64 / total * 100.0;
        let bar: String = "█".repeat((prob / 2.0).round() as usize);
        let marker = if satisfies(bitstring) {
            style("sat").green()
        } else {
            style("   ").dim()
        };

        println!(
            "  {} {}: {:>6} ({:>5.2}%) {}",
            marker,
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if counts.len() > top {
        println!(
            "  {} ({} more outcomes)",
            style("...").dim(),
            counts.len() - top
        );
    }
}
