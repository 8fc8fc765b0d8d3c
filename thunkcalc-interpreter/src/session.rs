//! Interpreter session: the parse-and-run loop on the primary thread.
//!
//! Each cycle pulls one program out of the token stream, runs it when it
//! parsed, and reports the parse status back to the lexer. The loop ends
//! after the cycle in which the end-of-session command ran.

use crate::builder::ThunkBuilder;
use crate::environment::Environment;
use crate::thunk::{Program, Runtime};
use log::{debug, info};
use std::io::{self, Write};
use thunkcalc_parser::{Diagnostics, LineSource, ParseStatus, ReaderSource, TokenStream, parse};

/// Session configuration options
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// A human is typing: submit complete lines at block depth zero and
    /// recover from syntax errors at the next line
    pub interactive: bool,
}

/// Session statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Parse cycles completed, including empty ones
    pub cycles: usize,

    /// Statements run by programs that parsed
    pub statements: usize,

    /// Cycles that ended in a syntax error
    pub syntax_errors: usize,

    /// Programs aborted by a runtime error
    pub runtime_errors: usize,
}

/// Interpreter state that outlives a single input source
pub struct Session {
    config: SessionConfig,
    runtime: Runtime,
    diagnostics: Diagnostics,
}

impl Session {
    /// Create a session printing to `output` and reporting errors to `diagnostics`
    pub fn new(
        config: SessionConfig,
        output: impl Write + 'static,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            config,
            runtime: Runtime::new(output),
            diagnostics,
        }
    }

    pub fn environment(&self) -> &Environment {
        self.runtime.environment()
    }

    /// Read and run everything `source` produces
    pub fn run<S>(&mut self, source: S) -> io::Result<SessionStats>
    where
        S: LineSource + Send + 'static,
    {
        let stream = TokenStream::spawn(source, self.config.interactive, self.diagnostics.clone())?;
        Ok(self.drive(stream))
    }

    /// Like [`Session::run`], with the source built on the reader thread
    pub fn run_with<F, S>(&mut self, make_source: F) -> io::Result<SessionStats>
    where
        F: FnOnce() -> io::Result<S> + Send + 'static,
        S: LineSource,
    {
        let stream =
            TokenStream::spawn_with(make_source, self.config.interactive, self.diagnostics.clone())?;
        Ok(self.drive(stream))
    }

    /// Run program text as if it were read from a file
    pub fn evaluate_text(&mut self, text: &str) -> io::Result<SessionStats> {
        self.run(ReaderSource::from_text(text))
    }

    fn drive(&mut self, mut stream: TokenStream) -> SessionStats {
        let mut stats = SessionStats::default();
        self.runtime.restart();

        loop {
            let mut builder = ThunkBuilder::new();
            let status = match parse(&mut stream, &mut builder) {
                Ok(statements) => {
                    let program = Program::new(statements);
                    stats.statements += program.statement_count();
                    if let Err(err) = program.run(&mut self.runtime) {
                        debug!("program aborted: {err}");
                        self.diagnostics.report(&err);
                        stats.runtime_errors += 1;
                    }
                    ParseStatus::Success
                }
                Err(err) => {
                    // Already reported through the token stream
                    debug!("parse failed: {err}");
                    stats.syntax_errors += 1;
                    ParseStatus::Failure
                }
            };
            stats.cycles += 1;

            // The lexer waits for this status even after the last cycle
            let open = stream.finish_cycle(status);
            if self.runtime.is_session_over() || !open {
                break;
            }
        }

        stream.join();
        info!(
            "session finished after {} cycles ({} syntax errors, {} runtime errors)",
            stats.cycles, stats.syntax_errors, stats.runtime_errors
        );
        stats
    }
}
