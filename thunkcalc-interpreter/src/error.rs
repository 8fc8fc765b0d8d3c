//! Runtime error types for the thunkcalc interpreter.
//!
//! Any of these aborts the statement being executed. The session reports
//! it and carries on with the next parse cycle.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while running thunks
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("division by zero")]
    #[diagnostic(
        code(thunkcalc::runtime::division_by_zero),
        help("The right operand of '/' and '%' must not be zero")
    )]
    ZeroDivision,

    #[error("unknown variable {name}")]
    #[diagnostic(
        code(thunkcalc::runtime::unknown_variable),
        help("Assign the variable before reading it")
    )]
    UnknownVariable { name: String },

    #[error("negative shift count {count}")]
    #[diagnostic(code(thunkcalc::runtime::negative_shift))]
    NegativeShift { count: i64 },

    #[error("operator {operator} needs two operands")]
    #[diagnostic(code(thunkcalc::runtime::missing_operand))]
    MissingOperand { operator: String },

    #[error("failed to write output: {message}")]
    #[diagnostic(code(thunkcalc::runtime::output))]
    Output { message: String },
}

impl EvalError {
    /// Create an unknown variable error
    pub fn unknown_variable(name: &str) -> Self {
        Self::UnknownVariable {
            name: name.to_string(),
        }
    }

    /// Create a missing operand error
    pub fn missing_operand(operator: impl ToString) -> Self {
        Self::MissingOperand {
            operator: operator.to_string(),
        }
    }
}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        Self::Output {
            message: err.to_string(),
        }
    }
}

/// Type alias for evaluation results
pub type Result<T> = std::result::Result<T, EvalError>;
