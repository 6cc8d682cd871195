//! Error types for formula construction and parsing.

use thiserror::Error;

/// Errors that can occur while building, parsing or generating formulas.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SatError {
    /// A literal of zero has no variable.
    #[error("Literal 0 is not a variable")]
    ZeroLiteral,

    /// A clause mentions a variable outside `1..=num_vars`.
    #[error("Variable x{var} out of range (formula has {num_vars} variables)")]
    VariableOutOfRange {
        /// The offending variable.
        var: u32,
        /// Number of declared variables.
        num_vars: u32,
    },

    /// Brute-force enumeration refused.
    #[error("Formula has {num_vars} variables, enumeration is limited to {max}")]
    TooManyVariables {
        /// Number of variables in the formula.
        num_vars: u32,
        /// Enumeration limit.
        max: u32,
    },

    /// DIMACS input has clauses before (or without) a `p cnf` line.
    #[error("DIMACS input is missing the 'p cnf' header")]
    MissingHeader,

    /// Malformed `p` line.
    #[error("Invalid DIMACS header on line {line}: {content}")]
    InvalidHeader {
        /// 1-based line number.
        line: usize,
        /// The header line.
        content: String,
    },

    /// Token that is not an integer literal.
    #[error("Invalid token '{token}' on line {line}")]
    InvalidToken {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// Header clause count disagrees with the body.
    #[error("Header declares {expected} clauses, found {got}")]
    ClauseCountMismatch {
        /// Clause count from the header.
        expected: usize,
        /// Clauses actually parsed.
        got: usize,
    },

    /// Generator parameters cannot produce a formula.
    #[error("Invalid generator parameters: {0}")]
    InvalidParameters(String),

    /// No satisfiable formula found within the attempt budget.
    #[error("No satisfiable formula found after {attempts} attempts")]
    NoSatisfiableInstance {
        /// Attempts made.
        attempts: u32,
    },
}

/// Result type for SAT operations.
pub type SatResult<T> = Result<T, SatError>;
