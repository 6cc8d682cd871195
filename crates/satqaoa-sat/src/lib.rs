//! Boolean satisfiability primitives for QAOA experiments.
//!
//! Formulas are plain CNF over 1-based variables. Assignments come in two
//! shapes: `&[bool]` slices where `assignment[i]` is x(i+1), and packed
//! `usize` indices where bit `i` is x(i+1). The packed form is what the
//! brute-force enumerators and the oracle synthesizers consume.
//!
//! ```rust
//! use satqaoa_sat::{Cnf, RandomKSat};
//!
//! let cnf = Cnf::parse_dimacs("p cnf 2 2\n1 2 0\n-1 0\n").unwrap();
//! assert_eq!(cnf.to_string(), "(x1 or x2) and (not x1)");
//! assert_eq!(cnf.satisfying_assignments().unwrap(), vec![0b10]);
//!
//! let random = RandomKSat::new(5, 21, 1).generate().unwrap();
//! assert_eq!(random.num_clauses(), 21);
//! ```

pub mod cnf;
pub mod dimacs;
pub mod error;
pub mod random;

pub use cnf::{Clause, Cnf, Literal, MAX_ENUMERATION_VARS, assignment_from_index};
pub use error::{SatError, SatResult};
pub use random::{GeneratedInstance, RandomKSat, derive_seed};
