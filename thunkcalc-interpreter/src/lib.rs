//! Thunkcalc interpreter
//!
//! Evaluates the programs the thunkcalc parser recognises. Parser
//! reductions build closures ("thunks") straight away, so a parsed program
//! is already executable:
//!
//! - [`number`]: the int/float numeric model
//! - [`operators`]: the operator table
//! - [`thunk`]: thunks, programs and the runtime they run against
//! - [`builder`]: the reductions that assemble thunks
//! - [`session`]: the parse-and-run loop driven by the token stream

pub mod builder;
pub mod environment;
pub mod error;
pub mod number;
pub mod operators;
pub mod session;
pub mod test_harness;
pub mod thunk;

// Include tests directory with all test modules
#[cfg(test)]
#[path = "tests/mod.rs"]
pub mod tests;

// Re-export public API
pub use builder::ThunkBuilder;
pub use environment::Environment;
pub use error::EvalError;
pub use number::Number;
pub use session::{Session, SessionConfig, SessionStats};
pub use test_harness::{CalcTestHarness, Evaluation, TestHarnessError};
pub use thunk::{Program, Runtime, Thunk};
