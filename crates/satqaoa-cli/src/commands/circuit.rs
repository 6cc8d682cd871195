//! Circuit command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use satqaoa_algo::{OracleSynthesis, QaoaAnsatz, QaoaVariant};

use super::common::{load_cnf, print_header, print_result, print_section, print_success};

/// Execute the circuit command.
pub fn execute(
    input: &Path,
    variant: QaoaVariant,
    layers: usize,
    synthesis: OracleSynthesis,
    output: Option<&Path>,
) -> Result<()> {
    let cnf = load_cnf(input)?;
    let ansatz = QaoaAnsatz::with_synthesis(&cnf, variant, layers, synthesis)?;
    let oracle = ansatz.oracle();
    let circuit = ansatz.circuit();

    print_header(&format!("{variant} QAOA, p = {layers}"));
    print_result("Formula", format!("{} variables, {} clauses", cnf.num_vars(), cnf.num_clauses()));

    print_section("Oracle");
    print_result("Synthesis", synthesis);
    print_result("Input qubits", oracle.num_inputs);
    print_result("Ancillas", oracle.num_ancillas);
    print_result("Result qubit", oracle.result_qubit);
    print_result("Gates", oracle.circuit.num_ops());
    print_result("Depth", oracle.circuit.depth());

    print_section("Circuit");
    print_result("Qubits", circuit.num_qubits());
    print_result("Clbits", circuit.num_clbits());
    print_result("Depth", circuit.depth());
    print_result("Operations", circuit.num_ops());
    print_result("Parameters", ansatz.parameter_names().join(", "));

    print_section("Gate counts");
    for (name, count) in circuit.count_ops() {
        println!("  {:<10} {:>8}", style(name).cyan(), count);
    }

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(circuit)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        println!();
        print_success(&format!("Circuit written to {}", path.display()));
    }

    Ok(())
}
