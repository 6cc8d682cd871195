//! DIMACS CNF reading and writing.
//!
//! Accepts the dialect found in SATLIB benchmark files: `c` comment lines,
//! a single `p cnf <vars> <clauses>` header, clauses that span lines, and a
//! trailing `%` line that ends the formula.

use std::fmt::Write;

use crate::cnf::{Clause, Cnf, Literal};
use crate::error::{SatError, SatResult};

impl Cnf {
    /// Parse a DIMACS CNF document.
    pub fn parse_dimacs(input: &str) -> SatResult<Cnf> {
        let mut header: Option<(u32, usize)> = None;
        let mut clauses = Vec::new();
        let mut current = Vec::new();

        for (idx, raw) in input.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('c') {
                continue;
            }
            if line.starts_with('%') {
                break;
            }
            if line.starts_with('p') {
                if header.is_some() {
                    return Err(invalid_header(line_no, line));
                }
                header = Some(parse_header(line_no, line)?);
                continue;
            }

            let Some((num_vars, _)) = header else {
                return Err(SatError::MissingHeader);
            };

            for token in line.split_whitespace() {
                let value: i32 = token.parse().map_err(|_| SatError::InvalidToken {
                    line: line_no,
                    token: token.to_string(),
                })?;
                if value == 0 {
                    clauses.push(Clause::new(std::mem::take(&mut current)));
                    continue;
                }
                let lit = Literal::new(value)?;
                if lit.var() > num_vars {
                    return Err(SatError::VariableOutOfRange {
                        var: lit.var(),
                        num_vars,
                    });
                }
                current.push(lit);
            }
        }

        let (num_vars, expected) = header.ok_or(SatError::MissingHeader)?;

        // Tolerate a final clause without its terminating 0.
        if !current.is_empty() {
            clauses.push(Clause::new(current));
        }

        if clauses.len() != expected {
            return Err(SatError::ClauseCountMismatch {
                expected,
                got: clauses.len(),
            });
        }

        Cnf::new(num_vars, clauses)
    }

    /// Render as DIMACS CNF.
    pub fn to_dimacs(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "p cnf {} {}", self.num_vars(), self.num_clauses());
        for clause in self.clauses() {
            for lit in clause.literals() {
                let _ = write!(out, "{} ", lit.to_dimacs());
            }
            out.push_str("0\n");
        }
        out
    }
}

fn invalid_header(line: usize, content: &str) -> SatError {
    SatError::InvalidHeader {
        line,
        content: content.to_string(),
    }
}

fn parse_header(line_no: usize, line: &str) -> SatResult<(u32, usize)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["p", "cnf", vars, clauses] => {
            let vars = vars.parse().map_err(|_| invalid_header(line_no, line))?;
            let clauses = clauses.parse().map_err(|_| invalid_header(line_no, line))?;
            Ok((vars, clauses))
        }
        _ => Err(invalid_header(line_no, line)),
    }
}
