//! Seeded random k-SAT generation.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cnf::{Clause, Cnf, Literal};
use crate::error::{SatError, SatResult};

/// Mix `stream` into `base` to get an independent seed (SplitMix64 finalizer).
pub fn derive_seed(base: u64, stream: u64) -> u64 {
    let mut z = base
        .wrapping_add(stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Uniform random k-SAT: each clause has `k` distinct variables with
/// independent random polarity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomKSat {
    /// Number of variables.
    pub num_vars: u32,
    /// Number of clauses.
    pub num_clauses: usize,
    /// Literals per clause.
    pub k: u32,
    /// RNG seed.
    pub seed: u64,
}

/// A generated formula with the seed that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedInstance {
    /// The formula.
    pub cnf: Cnf,
    /// Seed passed to [`RandomKSat::generate`] for this formula.
    pub seed: u64,
    /// Number of formulas drawn, including this one.
    pub attempts: u32,
}

impl RandomKSat {
    /// Random 3-SAT.
    pub fn new(num_vars: u32, num_clauses: usize, seed: u64) -> Self {
        Self {
            num_vars,
            num_clauses,
            k: 3,
            seed,
        }
    }

    /// Set the clause width.
    #[must_use]
    pub fn with_k(mut self, k: u32) -> Self {
        self.k = k;
        self
    }

    /// Draw a formula.
    pub fn generate(&self) -> SatResult<Cnf> {
        if self.k == 0 {
            return Err(SatError::InvalidParameters("k must be positive".into()));
        }
        if self.k > self.num_vars {
            return Err(SatError::InvalidParameters(format!(
                "k = {} exceeds the number of variables ({})",
                self.k, self.num_vars
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let clauses = (0..self.num_clauses)
            .map(|_| {
                let mut vars: Vec<u32> =
                    index::sample(&mut rng, self.num_vars as usize, self.k as usize)
                        .into_iter()
                        .map(|i| i as u32 + 1)
                        .collect();
                vars.sort_unstable();
                Clause::new(
                    vars.into_iter()
                        .map(|v| {
                            if rng.r#gen::<bool>() {
                                Literal::negative(v)
                            } else {
                                Literal::positive(v)
                            }
                        })
                        .collect(),
                )
            })
            .collect();

        Cnf::new(self.num_vars, clauses)
    }

    /// Draw formulas with derived seeds until one is satisfiable.
    ///
    /// The first attempt uses `self.seed` unchanged.
    pub fn generate_satisfiable(&self, max_attempts: u32) -> SatResult<GeneratedInstance> {
        for attempt in 0..max_attempts {
            let seed = if attempt == 0 {
                self.seed
            } else {
                derive_seed(self.seed, u64::from(attempt))
            };
            let cnf = Self { seed, ..self.clone() }.generate()?;
            if cnf.is_satisfiable()? {
                debug!(seed, attempt, "found satisfiable formula");
                return Ok(GeneratedInstance {
                    cnf,
                    seed,
                    attempts: attempt + 1,
                });
            }
        }
        Err(SatError::NoSatisfiableInstance {
            attempts: max_attempts,
        })
    }
}
