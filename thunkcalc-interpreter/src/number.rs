//! Numeric model of the thunkcalc interpreter.
//!
//! Every value is a [`Number`]: either a 64-bit integer or a 64-bit
//! float. Mixed operands are promoted to float before an operator runs,
//! so a float never turns back into an integer inside an expression.
//! Integer-only operators go the other way and truncate floats.

use std::fmt;
use thunkcalc_parser::Literal;

/// Runtime value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// Two operands brought to the same representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Promoted {
    Ints(i64, i64),
    Floats(f64, f64),
}

impl Number {
    /// Result of statements that produce no meaningful value
    pub const ZERO: Number = Number::Int(0);

    /// Comparison and logical results are the integers 0 and 1
    pub fn from_bool(value: bool) -> Self {
        Number::Int(i64::from(value))
    }

    /// Nonzero is true. NaN counts as nonzero.
    pub fn is_truthy(self) -> bool {
        match self {
            Number::Int(value) => value != 0,
            Number::Float(value) => value != 0.0,
        }
    }

    /// Integer view; floats truncate toward zero and saturate at the `i64` range
    pub fn as_int(self) -> i64 {
        match self {
            Number::Int(value) => value,
            Number::Float(value) => value as i64,
        }
    }

    pub fn as_float(self) -> f64 {
        match self {
            Number::Int(value) => value as f64,
            Number::Float(value) => value,
        }
    }

    /// Bring both operands to float if either one is a float
    pub fn promote(left: Number, right: Number) -> Promoted {
        match (left, right) {
            (Number::Int(a), Number::Int(b)) => Promoted::Ints(a, b),
            (a, b) => Promoted::Floats(a.as_float(), b.as_float()),
        }
    }
}

impl From<Literal> for Number {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Integer(value) => Number::Int(value),
            Literal::Float(value) => Number::Float(value),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(value) => write!(f, "{value}"),
            Number::Float(value) => write_float(f, value),
        }
    }
}

/// Shortest representation that reads back to the same float, switching to
/// exponent form when the decimal exponent is below -4 or at least 6:
/// `0.0001`, `123456`, `1.5e+06`, `1e-05`.
fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        return f.write_str("NaN");
    }
    if value.is_infinite() {
        return f.write_str(if value > 0.0 { "+Inf" } else { "-Inf" });
    }

    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return write!(f, "{value}");
    };
    let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;

    if (-4..6).contains(&exponent) {
        write!(f, "{value}")
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}
