//! Closure based evaluation engine.
//!
//! The parser's reductions build [`Thunk`]s directly: each one is a boxed
//! closure owning the thunks of its operands, so running a program is just
//! calling the top level closures in order. Nothing is interpreted by
//! walking a tree.

use crate::environment::Environment;
use crate::error::{EvalError, Result};
use crate::number::Number;
use crate::operators::{self, Arithmetic, Descriptor, UnaryFn};
use std::fmt;
use std::io::Write;
use thunkcalc_parser::{LogicalMode, Operator, Relation};

/// Everything a running thunk may touch
pub struct Runtime {
    environment: Environment,
    output: Box<dyn Write>,
    end_of_session: bool,
}

impl Runtime {
    pub fn new(output: impl Write + 'static) -> Self {
        Self {
            environment: Environment::new(),
            output: Box::new(output),
            end_of_session: false,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    /// Write a number on its own line of the session output
    pub fn print(&mut self, value: Number) -> Result<()> {
        writeln!(self.output, "{value}")?;
        self.output.flush()?;
        Ok(())
    }

    pub fn end_session(&mut self) {
        self.end_of_session = true;
    }

    pub fn is_session_over(&self) -> bool {
        self.end_of_session
    }

    /// Allow another session to start on this runtime
    pub fn restart(&mut self) {
        self.end_of_session = false;
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("environment", &self.environment)
            .field("end_of_session", &self.end_of_session)
            .finish_non_exhaustive()
    }
}

type Closure = dyn Fn(&mut Runtime) -> Result<Number>;

/// A deferred computation producing a number
pub struct Thunk(Box<Closure>);

impl Thunk {
    pub fn new(f: impl Fn(&mut Runtime) -> Result<Number> + 'static) -> Self {
        Thunk(Box::new(f))
    }

    pub fn call(&self, runtime: &mut Runtime) -> Result<Number> {
        (self.0)(runtime)
    }

    pub fn constant(value: Number) -> Self {
        Thunk::new(move |_| Ok(value))
    }

    /// Always fails with `err`
    pub fn failure(err: EvalError) -> Self {
        Thunk::new(move |_| Err(err.clone()))
    }

    /// Looked up when run, not when built
    pub fn variable(name: impl Into<String>) -> Self {
        let name = name.into();
        Thunk::new(move |runtime| runtime.environment.get(&name))
    }

    /// Store the value of `value` in `name` and return it
    pub fn assign(name: impl Into<String>, value: Thunk) -> Self {
        let name = name.into();
        Thunk::new(move |runtime| {
            let result = value.call(runtime)?;
            runtime.environment.set(&name, result);
            Ok(result)
        })
    }

    /// Same value, but zero is a division error
    pub fn denominator(self) -> Self {
        Thunk::new(move |runtime| {
            let value = self.call(runtime)?;
            if value.is_truthy() {
                Ok(value)
            } else {
                Err(EvalError::ZeroDivision)
            }
        })
    }

    pub fn unary(f: UnaryFn, operand: Thunk) -> Self {
        Thunk::new(move |runtime| Ok(f(operand.call(runtime)?)))
    }

    /// Left operand first, then the right one
    pub fn arithmetic(arithmetic: Arithmetic, left: Thunk, right: Thunk) -> Self {
        Thunk::new(move |runtime| {
            let a = left.call(runtime)?;
            let b = right.call(runtime)?;
            arithmetic.apply(a, b)
        })
    }

    pub fn compare(relation: Relation, left: Thunk, right: Thunk) -> Self {
        Thunk::new(move |runtime| {
            let a = left.call(runtime)?;
            let b = right.call(runtime)?;
            Ok(operators::compare(relation, a, b))
        })
    }

    /// `right` only runs when `left` does not settle the result
    pub fn logical(mode: LogicalMode, left: Thunk, right: Thunk) -> Self {
        let proceed_on = mode == LogicalMode::And;
        Thunk::new(move |runtime| {
            let mut result = left.call(runtime)?.is_truthy();
            if result == proceed_on {
                result = right.call(runtime)?.is_truthy();
            }
            Ok(Number::from_bool(result))
        })
    }

    pub fn print(operand: Thunk) -> Self {
        Thunk::new(move |runtime| {
            let value = operand.call(runtime)?;
            runtime.print(value)?;
            Ok(value)
        })
    }

    /// Build the thunk for `operator` applied to one or two operands
    pub fn operator(operator: Operator, left: Thunk, right: Option<Thunk>) -> Self {
        match (operators::descriptor(operator), right) {
            (Descriptor::Unary(f), _) | (Descriptor::MultiRole { unary: f, .. }, None) => {
                Thunk::unary(f, left)
            }
            (Descriptor::Print, _) => Thunk::print(left),
            (
                Descriptor::Binary(arithmetic)
                | Descriptor::MultiRole {
                    binary: arithmetic, ..
                },
                Some(right),
            ) => Thunk::arithmetic(arithmetic, left, right),
            (Descriptor::DivMod(arithmetic), Some(right)) => {
                Thunk::arithmetic(arithmetic, left, right.denominator())
            }
            (Descriptor::Comparison(relation), Some(right)) => {
                Thunk::compare(relation, left, right)
            }
            (Descriptor::Logical(mode), Some(right)) => Thunk::logical(mode, left, right),
            (_, None) => Thunk::failure(EvalError::missing_operand(operator)),
        }
    }

    /// `init` once, then `body` and `post` for as long as `condition` holds.
    /// Without a condition the loop only ends through an error.
    pub fn for_loop(
        init: Option<Thunk>,
        condition: Option<Thunk>,
        post: Option<Thunk>,
        body: Thunk,
    ) -> Self {
        Thunk::new(move |runtime| {
            if let Some(init) = &init {
                init.call(runtime)?;
            }
            loop {
                if let Some(condition) = &condition {
                    if !condition.call(runtime)?.is_truthy() {
                        return Ok(Number::ZERO);
                    }
                }
                body.call(runtime)?;
                if let Some(post) = &post {
                    post.call(runtime)?;
                }
            }
        })
    }

    /// Statements in order, stopping at the first error
    pub fn block(statements: Vec<Thunk>) -> Self {
        let program = Program::new(statements);
        Thunk::new(move |runtime| {
            program.run(runtime)?;
            Ok(Number::ZERO)
        })
    }

    pub fn end_of_session() -> Self {
        Thunk::new(|runtime| {
            runtime.end_session();
            Ok(Number::ZERO)
        })
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Thunk(..)")
    }
}

/// The statements of one successful parse
#[derive(Debug, Default)]
pub struct Program {
    statements: Vec<Thunk>,
}

impl Program {
    pub fn new(statements: Vec<Thunk>) -> Self {
        Self { statements }
    }

    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    /// Run every statement; the first error aborts the rest
    pub fn run(&self, runtime: &mut Runtime) -> Result<()> {
        for statement in &self.statements {
            statement.call(runtime)?;
        }
        Ok(())
    }
}
