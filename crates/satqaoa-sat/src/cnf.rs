//! Literals, clauses and CNF formulas.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SatError, SatResult};

/// Largest formula that brute-force enumeration will accept.
pub const MAX_ENUMERATION_VARS: u32 = 24;

/// A DIMACS-style literal: `3` is x3, `-3` is ¬x3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Literal(i32);

impl Literal {
    /// Create a literal from its DIMACS integer.
    pub fn new(value: i32) -> SatResult<Self> {
        if value == 0 {
            return Err(SatError::ZeroLiteral);
        }
        Ok(Literal(value))
    }

    /// The positive literal of a 1-based variable.
    pub fn positive(var: u32) -> Self {
        Literal(var as i32)
    }

    /// The negated literal of a 1-based variable.
    pub fn negative(var: u32) -> Self {
        Literal(-(var as i32))
    }

    /// The 1-based variable.
    #[inline]
    pub fn var(self) -> u32 {
        self.0.unsigned_abs()
    }

    /// True for ¬x.
    #[inline]
    pub fn is_negated(self) -> bool {
        self.0 < 0
    }

    /// The DIMACS integer.
    pub fn to_dimacs(self) -> i32 {
        self.0
    }

    /// Value of the literal given the value of its variable.
    #[inline]
    pub fn holds(self, var_value: bool) -> bool {
        var_value != self.is_negated()
    }
}

impl TryFrom<i32> for Literal {
    type Error = SatError;

    fn try_from(value: i32) -> SatResult<Self> {
        Literal::new(value)
    }
}

impl From<Literal> for i32 {
    fn from(lit: Literal) -> i32 {
        lit.0
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negated() {
            write!(f, "not x{}", self.var())
        } else {
            write!(f, "x{}", self.var())
        }
    }
}

/// A disjunction of literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clause(Vec<Literal>);

impl Clause {
    /// Create a clause.
    pub fn new(literals: Vec<Literal>) -> Self {
        Clause(literals)
    }

    /// Build a clause from DIMACS integers.
    pub fn from_dimacs(values: &[i32]) -> SatResult<Self> {
        values
            .iter()
            .map(|&v| Literal::new(v))
            .collect::<SatResult<Vec<_>>>()
            .map(Clause)
    }

    /// The literals of this clause.
    pub fn literals(&self) -> &[Literal] {
        &self.0
    }

    /// Number of literals.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// An empty clause is unsatisfiable.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest variable mentioned, or 0 for the empty clause.
    pub fn max_var(&self) -> u32 {
        self.0.iter().map(|l| l.var()).max().unwrap_or(0)
    }

    /// Evaluate against a `bool` assignment (`assignment[i]` is x(i+1)).
    pub fn evaluate(&self, assignment: &[bool]) -> bool {
        self.0.iter().any(|lit| {
            let value = assignment
                .get(lit.var() as usize - 1)
                .copied()
                .unwrap_or(false);
            lit.holds(value)
        })
    }

    /// Evaluate against a packed assignment (bit `i` is x(i+1)).
    #[inline]
    pub fn evaluate_index(&self, index: usize) -> bool {
        self.0
            .iter()
            .any(|lit| lit.holds((index >> (lit.var() - 1)) & 1 == 1))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " or ")?;
            }
            write!(f, "{lit}")?;
        }
        write!(f, ")")
    }
}

/// A formula in conjunctive normal form over variables `x1..=x{num_vars}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cnf {
    num_vars: u32,
    clauses: Vec<Clause>,
}

impl Cnf {
    /// Create a formula, checking that every literal is in range.
    pub fn new(num_vars: u32, clauses: Vec<Clause>) -> SatResult<Self> {
        for clause in &clauses {
            let var = clause.max_var();
            if var > num_vars {
                return Err(SatError::VariableOutOfRange { var, num_vars });
            }
        }
        Ok(Self { num_vars, clauses })
    }

    /// Number of variables.
    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    /// Number of clauses.
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// The clauses.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Clause-to-variable ratio.
    pub fn ratio(&self) -> f64 {
        if self.num_vars == 0 {
            return 0.0;
        }
        self.clauses.len() as f64 / f64::from(self.num_vars)
    }

    /// Evaluate the formula. Variables missing from `assignment` read as false.
    pub fn evaluate(&self, assignment: &[bool]) -> bool {
        self.clauses.iter().all(|c| c.evaluate(assignment))
    }

    /// Evaluate with bit `i` of `index` as the value of x(i+1).
    #[inline]
    pub fn evaluate_index(&self, index: usize) -> bool {
        self.clauses.iter().all(|c| c.evaluate_index(index))
    }

    /// Number of clauses violated by `assignment`.
    pub fn num_unsatisfied(&self, assignment: &[bool]) -> usize {
        self.clauses
            .iter()
            .filter(|c| !c.evaluate(assignment))
            .count()
    }

    fn check_enumerable(&self) -> SatResult<()> {
        if self.num_vars > MAX_ENUMERATION_VARS {
            return Err(SatError::TooManyVariables {
                num_vars: self.num_vars,
                max: MAX_ENUMERATION_VARS,
            });
        }
        Ok(())
    }

    /// The full truth table, indexed like [`Cnf::evaluate_index`].
    pub fn truth_table(&self) -> SatResult<Vec<bool>> {
        self.check_enumerable()?;
        Ok((0..1usize << self.num_vars)
            .map(|i| self.evaluate_index(i))
            .collect())
    }

    /// Packed indices of all satisfying assignments, ascending.
    pub fn satisfying_assignments(&self) -> SatResult<Vec<usize>> {
        self.check_enumerable()?;
        Ok((0..1usize << self.num_vars)
            .filter(|&i| self.evaluate_index(i))
            .collect())
    }

    /// Number of satisfying assignments.
    pub fn count_satisfying(&self) -> SatResult<usize> {
        self.check_enumerable()?;
        Ok((0..1usize << self.num_vars)
            .filter(|&i| self.evaluate_index(i))
            .count())
    }

    /// Whether any assignment satisfies the formula.
    pub fn is_satisfiable(&self) -> SatResult<bool> {
        self.check_enumerable()?;
        Ok((0..1usize << self.num_vars).any(|i| self.evaluate_index(i)))
    }

    /// Fraction of all assignments that satisfy the formula.
    ///
    /// This is the success probability of guessing uniformly at random.
    pub fn satisfying_fraction(&self) -> SatResult<f64> {
        let count = self.count_satisfying()?;
        Ok(count as f64 / (1u64 << self.num_vars) as f64)
    }
}

/// Unpack an index into a `bool` assignment of `num_vars` variables.
pub fn assignment_from_index(index: usize, num_vars: u32) -> Vec<bool> {
    (0..num_vars).map(|i| (index >> i) & 1 == 1).collect()
}

impl fmt::Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " and ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lits(values: &[i32]) -> Clause {
        Clause::from_dimacs(values).unwrap()
    }

    fn sample() -> Cnf {
        // (x1 or not x2) and (x2 or x3)
        Cnf::new(3, vec![lits(&[1, -2]), lits(&[2, 3])]).unwrap()
    }

    #[test]
    fn test_literal() {
        let lit = Literal::new(-3).unwrap();
        assert_eq!(lit.var(), 3);
        assert!(lit.is_negated());
        assert!(lit.holds(false));
        assert!(!lit.holds(true));
        assert!(matches!(Literal::new(0), Err(SatError::ZeroLiteral)));
    }

    #[test]
    fn test_display_matches_classical_function_notation() {
        assert_eq!(sample().to_string(), "(x1 or not x2) and (x2 or x3)");
    }

    #[test]
    fn test_evaluate() {
        let cnf = sample();
        assert!(cnf.evaluate(&[true, true, false]));
        assert!(!cnf.evaluate(&[false, true, false]));
        assert_eq!(cnf.num_unsatisfied(&[false, false, false]), 1);
    }

    #[test]
    fn test_evaluate_index_lsb_is_x1() {
        let cnf = sample();
        // x1=1, x2=1, x3=0 -> 0b011
        assert!(cnf.evaluate_index(0b011));
        // x1=0, x2=1 -> violates first clause
        assert!(!cnf.evaluate_index(0b010));
    }

    #[test]
    fn test_enumeration() {
        let cnf = sample();
        let sat = cnf.satisfying_assignments().unwrap();
        assert_eq!(sat, vec![0b011, 0b100, 0b101, 0b111]);
        assert_eq!(cnf.count_satisfying().unwrap(), 4);
        assert!(cnf.is_satisfiable().unwrap());
        assert!((cnf.satisfying_fraction().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unsatisfiable() {
        let cnf = Cnf::new(1, vec![lits(&[1]), lits(&[-1])]).unwrap();
        assert!(!cnf.is_satisfiable().unwrap());
        assert_eq!(cnf.satisfying_fraction().unwrap(), 0.0);
    }

    #[test]
    fn test_empty_formula_and_empty_clause() {
        let tautology = Cnf::new(2, vec![]).unwrap();
        assert_eq!(tautology.count_satisfying().unwrap(), 4);

        let contradiction = Cnf::new(2, vec![Clause::new(vec![])]).unwrap();
        assert!(!contradiction.is_satisfiable().unwrap());
    }

    #[test]
    fn test_variable_out_of_range() {
        let err = Cnf::new(2, vec![lits(&[1, 3])]).unwrap_err();
        assert!(matches!(
            err,
            SatError::VariableOutOfRange { var: 3, num_vars: 2 }
        ));
    }

    #[test]
    fn test_enumeration_limit() {
        let cnf = Cnf::new(MAX_ENUMERATION_VARS + 1, vec![]).unwrap();
        assert!(matches!(
            cnf.count_satisfying(),
            Err(SatError::TooManyVariables { .. })
        ));
    }

    #[test]
    fn test_serde_literal_as_integer() {
        let json = serde_json::to_string(&lits(&[1, -2])).unwrap();
        assert_eq!(json, "[1,-2]");
        assert!(serde_json::from_str::<Clause>("[0]").is_err());
    }

    proptest! {
        #[test]
        fn prop_index_and_bool_evaluation_agree(
            clauses in prop::collection::vec(
                prop::collection::vec((1u32..=5, any::<bool>()), 1..4),
                0..8,
            ),
            index in 0usize..32,
        ) {
            let clauses = clauses
                .into_iter()
                .map(|c| Clause::new(
                    c.into_iter()
                        .map(|(v, neg)| if neg { Literal::negative(v) } else { Literal::positive(v) })
                        .collect(),
                ))
                .collect();
            let cnf = Cnf::new(5, clauses).unwrap();
            let assignment = assignment_from_index(index, 5);
            prop_assert_eq!(cnf.evaluate_index(index), cnf.evaluate(&assignment));
        }
    }
}
