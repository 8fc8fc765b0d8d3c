// Thunkcalc Parser Error Handling
// Syntax and lexical errors with miette integration

use miette::Diagnostic;
use thiserror::Error;

/// Syntax errors reported by the parser
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("syntax error: unexpected {found}, expecting {expected}")]
    #[diagnostic(
        code(thunkcalc::parse::unexpected_token),
        help("Statements are separated by ';' or newlines; blocks are enclosed in '{{' '}}'")
    )]
    UnexpectedToken { found: String, expected: String },

    #[error("syntax error: cannot apply {operator} to {target}")]
    #[diagnostic(
        code(thunkcalc::parse::invalid_assignment_target),
        help("Only a variable name can be assigned, incremented or decremented")
    )]
    InvalidAssignmentTarget { operator: String, target: String },
}

impl ParseError {
    /// Create an unexpected token error
    pub fn unexpected(found: impl ToString, expected: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            found: found.to_string(),
            expected: expected.into(),
        }
    }

    /// Create an invalid assignment target error
    pub fn invalid_target(operator: impl ToString, target: impl Into<String>) -> Self {
        Self::InvalidAssignmentTarget {
            operator: operator.to_string(),
            target: target.into(),
        }
    }
}

/// Problems found while turning input lines into tokens.
///
/// None of these stop the session: a malformed number becomes a zero
/// literal and a read failure ends the input.
#[derive(Error, Diagnostic, Debug)]
pub enum LexError {
    #[error("invalid number {text:?}: {reason}")]
    #[diagnostic(
        code(thunkcalc::lex::invalid_number),
        severity(Warning),
        help("Numbers are digits with at most one decimal point; the value 0 was used instead")
    )]
    InvalidNumber { text: String, reason: String },

    #[error("failed to read input: {source}")]
    #[diagnostic(code(thunkcalc::lex::read_failure))]
    Read {
        #[from]
        source: std::io::Error,
    },
}

/// Type alias for parser results
pub type Result<T> = std::result::Result<T, ParseError>;
