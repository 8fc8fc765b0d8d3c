//! Test harness for driving a session from program text.
//!
//! Every call to [`CalcTestHarness::evaluate`] is a complete session run
//! over the given text, in batch mode unless the harness was made
//! interactive. Variables persist between calls, and the printed output
//! and error messages of each run are captured separately.

use crate::number::Number;
use crate::session::{Session, SessionConfig, SessionStats};
use miette::Diagnostic;
use thiserror::Error;
use thunkcalc_parser::{Diagnostics, ReaderSource, SharedBuffer};

/// Errors that can occur during test harness operations
#[derive(Debug, Error, Diagnostic)]
pub enum TestHarnessError {
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Assertion failed: expected {expected}, but got {actual}")]
    AssertionFailed { expected: String, actual: String },

    #[error("Variable {name} is not set")]
    MissingVariable { name: String },
}

/// What one run printed and reported
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub output: Vec<String>,
    pub errors: Vec<String>,
    pub stats: SessionStats,
}

pub struct CalcTestHarness {
    session: Session,
    output: SharedBuffer,
    errors: SharedBuffer,
    output_seen: usize,
    errors_seen: usize,
}

impl CalcTestHarness {
    /// A batch-mode harness
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn interactive() -> Self {
        Self::with_config(SessionConfig { interactive: true })
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let output = SharedBuffer::default();
        let (diagnostics, errors) = Diagnostics::capture();
        Self {
            session: Session::new(config, output.clone(), diagnostics),
            output,
            errors,
            output_seen: 0,
            errors_seen: 0,
        }
    }

    /// Run `source` through a fresh token stream
    pub fn evaluate(&mut self, source: &str) -> Result<Evaluation, TestHarnessError> {
        let stats = self.session.run(ReaderSource::from_text(source))?;
        let output = self.output.lines();
        let errors = self.errors.lines();
        let evaluation = Evaluation {
            output: output[self.output_seen..].to_vec(),
            errors: errors[self.errors_seen..].to_vec(),
            stats,
        };
        self.output_seen = output.len();
        self.errors_seen = errors.len();
        Ok(evaluation)
    }

    /// Run `source` and check everything it printed
    pub fn assert_prints(&mut self, source: &str, expected: &[&str]) -> Result<(), TestHarnessError> {
        let evaluation = self.evaluate(source)?;
        if evaluation.output != expected {
            return Err(TestHarnessError::AssertionFailed {
                expected: format!("{expected:?}"),
                actual: format!("{:?}", evaluation.output),
            });
        }
        Ok(())
    }

    /// Run `source` and check the one line it printed
    pub fn assert_evaluates_to(&mut self, source: &str, expected: &str) -> Result<(), TestHarnessError> {
        self.assert_prints(source, &[expected])
    }

    /// Run `source` and check that it reported an error containing `fragment`
    pub fn assert_error(&mut self, source: &str, fragment: &str) -> Result<(), TestHarnessError> {
        let evaluation = self.evaluate(source)?;
        if !evaluation.errors.iter().any(|line| line.contains(fragment)) {
            return Err(TestHarnessError::AssertionFailed {
                expected: format!("an error containing {fragment:?}"),
                actual: format!("{:?}", evaluation.errors),
            });
        }
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Result<Number, TestHarnessError> {
        self.session
            .environment()
            .get(name)
            .map_err(|_| TestHarnessError::MissingVariable {
                name: name.to_string(),
            })
    }

    pub fn assert_variable(&self, name: &str, expected: Number) -> Result<(), TestHarnessError> {
        let actual = self.variable(name)?;
        if actual != expected {
            return Err(TestHarnessError::AssertionFailed {
                expected: format!("{name} = {expected:?}"),
                actual: format!("{name} = {actual:?}"),
            });
        }
        Ok(())
    }
}

impl Default for CalcTestHarness {
    fn default() -> Self {
        Self::new()
    }
}
