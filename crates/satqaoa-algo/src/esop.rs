//! Exclusive-sum-of-products forms of a truth table.
//!
//! A truth table is indexed by packed assignments (bit `j` is x(j+1)). Every
//! form returned here satisfies `f(x) = XOR over cubes of cube(x)`, so each
//! cube maps onto one multi-controlled X in the oracle.

/// Largest variable count for the exhaustive polarity search.
pub const MAX_POLARITY_SEARCH_VARS: u32 = 10;

/// A product term: the AND of the literals selected by `mask`.
///
/// Bit `j` of `negated` (only meaningful where `mask` has bit `j`) turns
/// the literal into ¬x(j+1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cube {
    /// Variables present in the cube.
    pub mask: usize,
    /// Variables that appear complemented.
    pub negated: usize,
}

impl Cube {
    /// Number of literals.
    pub fn num_literals(&self) -> u32 {
        self.mask.count_ones()
    }

    /// Evaluate the cube on a packed assignment.
    #[inline]
    pub fn evaluate(&self, index: usize) -> bool {
        (index ^ self.negated) & self.mask == self.mask
    }
}

/// XOR-Möbius transform over GF(2), in place.
///
/// Turns a truth table into its positive-polarity Reed-Muller coefficients
/// (and back: the transform is an involution).
fn mobius(values: &mut [bool]) {
    let n = values.len().trailing_zeros();
    for j in 0..n {
        let bit = 1usize << j;
        for i in 0..values.len() {
            if i & bit != 0 {
                values[i] ^= values[i ^ bit];
            }
        }
    }
}

/// Fixed-polarity Reed-Muller expansion.
///
/// Bit `j` of `polarity` selects ¬x(j+1) as the basis literal for variable
/// `j`.
pub fn fprm(truth_table: &[bool], polarity: usize) -> Vec<Cube> {
    let mut coefficients: Vec<bool> = (0..truth_table.len())
        .map(|i| truth_table[i ^ polarity])
        .collect();
    mobius(&mut coefficients);
    coefficients
        .iter()
        .enumerate()
        .filter(|(_, c)| **c)
        .map(|(mask, _)| Cube {
            mask,
            negated: polarity & mask,
        })
        .collect()
}

/// Positive-polarity Reed-Muller expansion.
pub fn pprm(truth_table: &[bool]) -> Vec<Cube> {
    fprm(truth_table, 0)
}

/// Cheapest fixed-polarity expansion: fewest cubes, then fewest literals.
///
/// Falls back to [`pprm`] above [`MAX_POLARITY_SEARCH_VARS`] variables.
pub fn best_fprm(truth_table: &[bool]) -> Vec<Cube> {
    let num_vars = truth_table.len().trailing_zeros();
    if num_vars > MAX_POLARITY_SEARCH_VARS {
        return pprm(truth_table);
    }

    let cost = |cubes: &[Cube]| {
        (
            cubes.len(),
            cubes.iter().map(Cube::num_literals).sum::<u32>(),
        )
    };

    let mut best = pprm(truth_table);
    let mut best_cost = cost(&best);
    for polarity in 1..truth_table.len() {
        let candidate = fprm(truth_table, polarity);
        let candidate_cost = cost(&candidate);
        if candidate_cost < best_cost {
            best = candidate;
            best_cost = candidate_cost;
        }
    }
    best
}

/// One full-width cube per true row.
pub fn minterms(truth_table: &[bool]) -> Vec<Cube> {
    let all = truth_table.len() - 1;
    truth_table
        .iter()
        .enumerate()
        .filter(|(_, v)| **v)
        .map(|(index, _)| Cube {
            mask: all,
            negated: !index & all,
        })
        .collect()
}

/// Evaluate an ESOP on a packed assignment.
pub fn evaluate(cubes: &[Cube], index: usize) -> bool {
    cubes.iter().fold(false, |acc, c| acc ^ c.evaluate(index))
}
