//! Gate angles for variational circuits.
//!
//! QAOA layers only ever need a named angle times a constant (`2·beta_k`,
//! `-gamma_k`) or a plain number (`π` for the Grover phase), so an angle is
//! either a constant or `factor · symbol`. Symbols are bound to numbers
//! once per optimizer evaluation.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// A concrete angle or a scaled symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    Constant(f64),
    /// `factor · symbol`
    Scaled { symbol: String, factor: f64 },
}

impl ParameterExpression {
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// The bare symbol `name` (factor 1).
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Scaled {
            symbol: name.into(),
            factor: 1.0,
        }
    }

    pub fn pi() -> Self {
        ParameterExpression::Constant(PI)
    }

    /// Multiply by a constant factor.
    #[must_use]
    pub fn scaled(self, by: f64) -> Self {
        match self {
            ParameterExpression::Constant(v) => ParameterExpression::Constant(v * by),
            ParameterExpression::Scaled { symbol, factor } => ParameterExpression::Scaled {
                symbol,
                factor: factor * by,
            },
        }
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, ParameterExpression::Scaled { .. })
    }

    /// The numeric value, once no symbol remains.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Scaled { .. } => None,
        }
    }

    /// Name of the unbound symbol, if any.
    pub fn symbol_name(&self) -> Option<&str> {
        match self {
            ParameterExpression::Constant(_) => None,
            ParameterExpression::Scaled { symbol, .. } => Some(symbol),
        }
    }

    /// Bind `name` to `value`; other symbols are left alone.
    pub fn bind(&self, name: &str, value: f64) -> Self {
        self.substitute(|symbol| (symbol == name).then_some(value))
    }

    /// Bind whichever symbol `values` knows about.
    pub fn bind_all(&self, values: &FxHashMap<String, f64>) -> Self {
        self.substitute(|symbol| values.get(symbol).copied())
    }

    fn substitute(&self, lookup: impl Fn(&str) -> Option<f64>) -> Self {
        match self {
            ParameterExpression::Scaled { symbol, factor } => match lookup(symbol) {
                Some(value) => ParameterExpression::Constant(factor * value),
                None => self.clone(),
            },
            ParameterExpression::Constant(_) => self.clone(),
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) if *v == PI => write!(f, "π"),
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Scaled { symbol, factor } if *factor == 1.0 => {
                write!(f, "{symbol}")
            }
            ParameterExpression::Scaled { symbol, factor } if *factor == -1.0 => {
                write!(f, "-{symbol}")
            }
            ParameterExpression::Scaled { symbol, factor } => write!(f, "{factor}*{symbol}"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl From<&str> for ParameterExpression {
    fn from(name: &str) -> Self {
        ParameterExpression::symbol(name)
    }
}

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.scaled(-1.0)
    }
}
