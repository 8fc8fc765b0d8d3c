//! Operator table.
//!
//! Maps every semantic [`Operator`] to the functions that implement it on
//! [`Number`]s. Arithmetic operators are a pair of integer and float
//! functions; the float half is missing for the integer-only operators,
//! which truncate their operands instead of promoting them.

use crate::error::{EvalError, Result};
use crate::number::{Number, Promoted};
use thunkcalc_parser::{LogicalMode, Operator, Relation};

pub type UnaryFn = fn(Number) -> Number;
pub type IntFn = fn(i64, i64) -> Result<i64>;
pub type FloatFn = fn(f64, f64) -> f64;

/// A binary arithmetic operator
#[derive(Debug, Clone, Copy)]
pub struct Arithmetic {
    int: IntFn,
    float: Option<FloatFn>,
}

impl Arithmetic {
    const fn new(int: IntFn, float: FloatFn) -> Self {
        Self {
            int,
            float: Some(float),
        }
    }

    const fn int_only(int: IntFn) -> Self {
        Self { int, float: None }
    }

    pub fn is_int_only(&self) -> bool {
        self.float.is_none()
    }

    pub fn apply(&self, left: Number, right: Number) -> Result<Number> {
        let Some(float) = self.float else {
            return Ok(Number::Int((self.int)(left.as_int(), right.as_int())?));
        };
        match Number::promote(left, right) {
            Promoted::Ints(a, b) => Ok(Number::Int((self.int)(a, b)?)),
            Promoted::Floats(a, b) => Ok(Number::Float(float(a, b))),
        }
    }
}

/// What an operator does once its operands are known
#[derive(Debug, Clone, Copy)]
pub enum Descriptor {
    Unary(UnaryFn),
    Binary(Arithmetic),
    /// Division and modulo: the right operand is checked for zero first
    DivMod(Arithmetic),
    /// `-` and `^`: unary with one operand, binary with two
    MultiRole { unary: UnaryFn, binary: Arithmetic },
    Comparison(Relation),
    /// Short-circuiting `&&` and `||`
    Logical(LogicalMode),
    Print,
}

pub fn descriptor(operator: Operator) -> Descriptor {
    use Descriptor as D;

    match operator {
        Operator::Add => D::Binary(Arithmetic::new(add, |a, b| a + b)),
        Operator::Sub => D::MultiRole {
            unary: negate,
            binary: Arithmetic::new(sub, |a, b| a - b),
        },
        Operator::Mul => D::Binary(Arithmetic::new(mul, |a, b| a * b)),
        Operator::Div => D::DivMod(Arithmetic::new(div, |a, b| a / b)),
        Operator::Rem => D::DivMod(Arithmetic::new(rem, |a, b| a % b)),
        Operator::BitAnd => D::Binary(Arithmetic::int_only(|a, b| Ok(a & b))),
        Operator::BitOr => D::Binary(Arithmetic::int_only(|a, b| Ok(a | b))),
        Operator::BitXor => D::MultiRole {
            unary: complement,
            binary: Arithmetic::int_only(|a, b| Ok(a ^ b)),
        },
        Operator::BitClear => D::Binary(Arithmetic::int_only(|a, b| Ok(a & !b))),
        Operator::ShiftLeft => D::Binary(Arithmetic::int_only(shift_left)),
        Operator::ShiftRight => D::Binary(Arithmetic::int_only(shift_right)),
        Operator::Not => D::Unary(not),
        Operator::Compare(relation) => D::Comparison(relation),
        Operator::Logical(mode) => D::Logical(mode),
        Operator::Increment => D::Unary(increment),
        Operator::Decrement => D::Unary(decrement),
        Operator::Print => D::Print,
    }
}

fn add(a: i64, b: i64) -> Result<i64> {
    Ok(a.wrapping_add(b))
}

fn sub(a: i64, b: i64) -> Result<i64> {
    Ok(a.wrapping_sub(b))
}

fn mul(a: i64, b: i64) -> Result<i64> {
    Ok(a.wrapping_mul(b))
}

// `i64::MIN / -1` wraps like the other integer operators
fn div(a: i64, b: i64) -> Result<i64> {
    if b == 0 {
        return Err(EvalError::ZeroDivision);
    }
    Ok(a.wrapping_div(b))
}

fn rem(a: i64, b: i64) -> Result<i64> {
    if b == 0 {
        return Err(EvalError::ZeroDivision);
    }
    Ok(a.wrapping_rem(b))
}

fn shift_count(count: i64) -> Result<Option<u32>> {
    if count < 0 {
        return Err(EvalError::NegativeShift { count });
    }
    Ok(u32::try_from(count).ok())
}

fn shift_left(a: i64, count: i64) -> Result<i64> {
    Ok(shift_count(count)?
        .and_then(|count| a.checked_shl(count))
        .unwrap_or(0))
}

fn shift_right(a: i64, count: i64) -> Result<i64> {
    let fill = if a < 0 { -1 } else { 0 };
    Ok(shift_count(count)?
        .and_then(|count| a.checked_shr(count))
        .unwrap_or(fill))
}

fn negate(a: Number) -> Number {
    match a {
        Number::Int(value) => Number::Int(value.wrapping_neg()),
        Number::Float(value) => Number::Float(-value),
    }
}

fn complement(a: Number) -> Number {
    Number::Int(!a.as_int())
}

fn not(a: Number) -> Number {
    Number::from_bool(!a.is_truthy())
}

fn increment(a: Number) -> Number {
    match a {
        Number::Int(value) => Number::Int(value.wrapping_add(1)),
        Number::Float(value) => Number::Float(value + 1.0),
    }
}

fn decrement(a: Number) -> Number {
    match a {
        Number::Int(value) => Number::Int(value.wrapping_sub(1)),
        Number::Float(value) => Number::Float(value - 1.0),
    }
}

/// Evaluate a comparison.
///
/// Composite relations are the negation of the primitive they exclude:
/// `<=` is "not greater", `!=` is "not equal". This holds for NaN too,
/// so `NaN != NaN` and `NaN <= 1` are both true.
pub fn compare(relation: Relation, left: Number, right: Number) -> Number {
    if relation.is_single() {
        Number::from_bool(primitive(relation, left, right))
    } else {
        Number::from_bool(!primitive(relation.complement(), left, right))
    }
}

fn primitive(relation: Relation, left: Number, right: Number) -> bool {
    match relation {
        Relation::EQUAL => match Number::promote(left, right) {
            Promoted::Ints(a, b) => a == b,
            Promoted::Floats(a, b) => a == b,
        },
        Relation::LESS => less(left, right),
        Relation::GREATER => less(right, left),
        _ => false,
    }
}

fn less(left: Number, right: Number) -> bool {
    match Number::promote(left, right) {
        Promoted::Ints(a, b) => a < b,
        Promoted::Floats(a, b) => a < b,
    }
}
