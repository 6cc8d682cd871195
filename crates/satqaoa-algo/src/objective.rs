//! Objective functions over measurement outcomes.
//!
//! A measured bitstring carries clbit 0 in its rightmost character, so the
//! input qubits (x1..xn) are the last `n` characters read right to left.
//! Ancilla and result characters on the left are ignored.

use satqaoa_adapter_sim::{Counts, SimulatorBackend};
use satqaoa_sat::Cnf;

use crate::ansatz::QaoaAnsatz;
use crate::error::{AlgoError, AlgoResult};

/// Decode the variable assignment from a measured bitstring.
pub fn assignment_from_bitstring(num_vars: u32, bitstring: &str) -> AlgoResult<Vec<bool>> {
    let invalid = || AlgoError::InvalidBitstring {
        bitstring: bitstring.to_string(),
        num_vars,
    };
    let bytes = bitstring.as_bytes();
    let n = num_vars as usize;
    if bytes.len() < n {
        return Err(invalid());
    }
    bytes[bytes.len() - n..]
        .iter()
        .rev()
        .map(|b| match b {
            b'0' => Ok(false),
            b'1' => Ok(true),
            _ => Err(invalid()),
        })
        .collect()
}

/// 0 if the bitstring's assignment satisfies `cnf`, 1 otherwise.
pub fn objective_value(cnf: &Cnf, bitstring: &str) -> AlgoResult<f64> {
    let assignment = assignment_from_bitstring(cnf.num_vars(), bitstring)?;
    Ok(if cnf.evaluate(&assignment) { 0.0 } else { 1.0 })
}

/// Count-weighted mean of [`objective_value`]: the fraction of unsatisfying shots.
pub fn mean_objective(cnf: &Cnf, counts: &Counts) -> AlgoResult<f64> {
    let total = counts.total();
    if total == 0 {
        return Err(AlgoError::EmptyCounts);
    }
    let mut weighted = 0.0;
    for (bitstring, count) in counts.iter() {
        weighted += objective_value(cnf, bitstring)? * count as f64;
    }
    Ok(weighted / total as f64)
}

/// Fraction of shots that measured a satisfying assignment.
pub fn success_probability(cnf: &Cnf, counts: &Counts) -> AlgoResult<f64> {
    Ok(1.0 - mean_objective(cnf, counts)?)
}

/// Probability of measuring a satisfying assignment, without shot noise.
pub fn exact_success_probability(
    cnf: &Cnf,
    ansatz: &QaoaAnsatz,
    params: &[f64],
    backend: &SimulatorBackend,
) -> AlgoResult<f64> {
    let circuit = ansatz.bind(params)?;
    let state = backend.simulate(&circuit)?;
    let input_mask = (1usize << ansatz.num_vars()) - 1;
    Ok(state.probability_of(|index| cnf.evaluate_index(index & input_mask)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansatz::QaoaVariant;

    fn cnf() -> Cnf {
        // (x1 or x2) and (not x1): only x1=0, x2=1
        Cnf::parse_dimacs("p cnf 2 2\n1 2 0\n-1 0\n").unwrap()
    }

    #[test]
    fn test_objective_reads_rightmost_bits_reversed() {
        let cnf = cnf();
        // x1 is the rightmost character
        assert_eq!(objective_value(&cnf, "10").unwrap(), 0.0);
        assert_eq!(objective_value(&cnf, "01").unwrap(), 1.0);
        // a leading result/ancilla character is ignored
        assert_eq!(objective_value(&cnf, "110").unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_bitstrings() {
        let cnf = cnf();
        assert!(matches!(
            objective_value(&cnf, "1"),
            Err(AlgoError::InvalidBitstring { .. })
        ));
        assert!(objective_value(&cnf, "1x").is_err());
    }

    #[test]
    fn test_mean_objective() {
        let cnf = cnf();
        let counts: Counts = [("010", 3), ("000", 1)].into_iter().collect();
        assert!((mean_objective(&cnf, &counts).unwrap() - 0.25).abs() < 1e-12);
        assert!((success_probability(&cnf, &counts).unwrap() - 0.75).abs() < 1e-12);
        assert!(matches!(
            mean_objective(&cnf, &Counts::new()),
            Err(AlgoError::EmptyCounts)
        ));
    }

    #[test]
    fn test_exact_success_probability_at_zero_angles() {
        // With all angles 0 the ansatz leaves |+…+⟩, so the success
        // probability is the satisfying fraction.
        let cnf = cnf();
        let ansatz = QaoaAnsatz::new(&cnf, QaoaVariant::Standard, 1).unwrap();
        let backend = SimulatorBackend::with_seed(0);
        let p = exact_success_probability(&cnf, &ansatz, &[0.0, 0.0], &backend).unwrap();
        assert!((p - 0.25).abs() < 1e-9);
    }
}
