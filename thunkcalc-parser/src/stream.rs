// Thunkcalc Token Stream
// Rendezvous between the line reader, the tokenizer task and the parsing thread
//
// Two worker threads feed the parser:
//
//   line reader --(lines)--> lexer --(tokens)--> parser thread
//                                 <--(status)--
//
// All three channels have zero capacity, so every line, token and parse
// status is a blocking handoff between exactly two parties. The status
// message is the only traffic flowing against the token direction: one is
// sent per parse cycle and the lexer always consumes it before producing
// the first token of the next cycle.

use crate::diagnostics::Diagnostics;
use crate::error::LexError;
use crate::parser::TokenSource;
use crate::source::LineSource;
use crate::token::{Command, Token, TokenKind};
use crate::tokenizer;
use crossbeam_channel::{bounded, select, Receiver, Sender};
use log::{debug, error, trace, warn};
use std::io;
use std::thread::{self, JoinHandle};

/// Outcome of one parse cycle, reported back to the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    Success,
    Failure,
}

/// Parser-side end of the rendezvous
#[derive(Debug)]
pub struct TokenStream {
    tokens: Receiver<Token>,
    status: Sender<ParseStatus>,
    last: Option<Token>,
    closed: bool,
    diagnostics: Diagnostics,
    lexer: Option<JoinHandle<()>>,
}

impl TokenStream {
    /// Start the line reader and lexer threads over `source`
    pub fn spawn<S>(source: S, interactive: bool, diagnostics: Diagnostics) -> io::Result<Self>
    where
        S: LineSource + Send + 'static,
    {
        Self::spawn_with(move || Ok(source), interactive, diagnostics)
    }

    /// Like [`TokenStream::spawn`], but the source is built on the reader thread.
    ///
    /// Useful for sources that cannot be moved between threads, such as
    /// terminal line editors.
    pub fn spawn_with<F, S>(
        make_source: F,
        interactive: bool,
        diagnostics: Diagnostics,
    ) -> io::Result<Self>
    where
        F: FnOnce() -> io::Result<S> + Send + 'static,
        S: LineSource,
    {
        let (line_tx, line_rx) = bounded(0);
        let (token_tx, token_rx) = bounded(0);
        let (status_tx, status_rx) = bounded(0);

        let reader_diagnostics = diagnostics.clone();
        // The reader is never joined: it may sit in a blocking read long
        // after the session is over.
        thread::Builder::new()
            .name("thunkcalc-lines".to_string())
            .spawn(move || match make_source() {
                Ok(source) => read_lines(source, &line_tx, &reader_diagnostics),
                Err(err) => {
                    report_read_error(err, &reader_diagnostics);
                    let _ = line_tx.send(String::new());
                }
            })?;

        let lexer = Lexer::new(
            interactive,
            line_rx,
            token_tx,
            status_rx,
            diagnostics.clone(),
        );
        let handle = thread::Builder::new()
            .name("thunkcalc-lexer".to_string())
            .spawn(move || lexer.run())?;

        Ok(Self {
            tokens: token_rx,
            status: status_tx,
            last: None,
            closed: false,
            diagnostics,
            lexer: Some(handle),
        })
    }

    /// Report the outcome of a parse cycle to the lexer.
    ///
    /// Blocks until the lexer takes it. Returns false when the lexer has
    /// already finished, in which case no further cycle can start.
    pub fn finish_cycle(&mut self, status: ParseStatus) -> bool {
        trace!("parse cycle finished: {status:?}");
        if self.status.send(status).is_err() {
            self.closed = true;
        }
        !self.closed
    }

    /// True once the lexer has gone away
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The most recently lexed token
    pub fn last_token(&self) -> Option<&Token> {
        self.last.as_ref()
    }

    /// Wait for the lexer thread to finish
    pub fn join(self) {
        let Self {
            tokens,
            status,
            lexer,
            ..
        } = self;
        // Hanging up first unblocks a lexer still waiting on a handoff
        drop(tokens);
        drop(status);
        if let Some(handle) = lexer {
            if handle.join().is_err() {
                error!("lexer thread panicked");
            }
        }
    }
}

impl TokenSource for TokenStream {
    fn lex(&mut self) -> Token {
        let token = match self.tokens.recv() {
            Ok(token) => token,
            Err(_) => {
                self.closed = true;
                Token::end()
            }
        };
        trace!("lexed {token}");
        self.last = Some(token.clone());
        token
    }

    fn error(&mut self, message: &str) {
        self.diagnostics.report(message);
        if let Some(last) = &self.last {
            self.diagnostics.report(format_args!("last token: {last}"));
        }
    }
}

fn read_lines<S: LineSource>(mut source: S, lines: &Sender<String>, diagnostics: &Diagnostics) {
    loop {
        let line = match source.next_line() {
            // An empty line would read as the end-of-input sentinel
            Ok(Some(line)) if line.is_empty() => " ".to_string(),
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                report_read_error(err, diagnostics);
                break;
            }
        };
        if lines.send(line).is_err() {
            debug!("lexer gone, line reader stopping");
            return;
        }
    }
    let _ = lines.send(String::new());
}

fn report_read_error(err: io::Error, diagnostics: &Diagnostics) {
    let err = LexError::from(err);
    error!("{err}");
    diagnostics.report(&err);
}

/// States of the tokenize-and-send task
#[derive(Debug)]
pub(crate) enum State {
    /// Waiting for the next input line (or a parse status)
    AwaitLine,
    /// Scanning the next token off the current line
    Tokenizing { first: bool },
    /// Handing `token` to the parser
    Sending { token: Token, first: bool },
    /// The current line has no tokens left
    EndOfLine,
    /// Discard the rest of the line after a parse cycle ended early
    Reset,
    /// Physical end of input: flush the parser and end the session
    EndOfInput,
}

/// Result of a handoff that can be cut short by a parse status
#[derive(Debug)]
enum Handoff {
    Delivered,
    Interrupted(ParseStatus),
}

/// The parser side has hung up
#[derive(Debug)]
pub(crate) struct Disconnected;

pub(crate) struct Lexer {
    interactive: bool,
    lines: Receiver<String>,
    tokens: Sender<Token>,
    status: Receiver<ParseStatus>,
    diagnostics: Diagnostics,
    /// Unconsumed remainder of the current line
    line: String,
    last: TokenKind,
    /// Open blocks on the lines sent so far
    pub(crate) depth: i32,
}

impl Lexer {
    pub(crate) fn new(
        interactive: bool,
        lines: Receiver<String>,
        tokens: Sender<Token>,
        status: Receiver<ParseStatus>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            interactive,
            lines,
            tokens,
            status,
            diagnostics,
            line: String::new(),
            last: TokenKind::End,
            depth: 0,
        }
    }

    fn run(mut self) {
        let mut state = State::AwaitLine;
        loop {
            trace!("lexer {state:?} (depth {})", self.depth);
            state = match self.step(state) {
                Ok(Some(next)) => next,
                Ok(None) => break,
                Err(Disconnected) => {
                    debug!("parser gone, lexer stopping");
                    return;
                }
            };
        }
        debug!("lexer finished");
    }

    pub(crate) fn step(&mut self, state: State) -> Result<Option<State>, Disconnected> {
        let next = match state {
            State::AwaitLine => match self.await_line()? {
                None => State::Reset,
                Some(line) if line.is_empty() => State::EndOfInput,
                Some(line) => {
                    self.line = line;
                    State::Tokenizing { first: true }
                }
            },

            State::Tokenizing { first } => match self.scan() {
                Some(token) => State::Sending { token, first },
                None => State::EndOfLine,
            },

            State::Sending { token, first } => match self.send(&token)? {
                Handoff::Delivered => {
                    match token.kind {
                        TokenKind::End | TokenKind::Unknown => {
                            self.await_status()?;
                            return Ok(Some(State::Reset));
                        }
                        TokenKind::LeftBrace => self.depth += 1,
                        TokenKind::RightBrace => self.depth -= 1,
                        _ => {}
                    }
                    State::Tokenizing { first: false }
                }
                // The parser finished on the previous line; this token
                // belongs to a fresh cycle with no open blocks.
                Handoff::Interrupted(status) if self.interactive && first => {
                    debug!("parse ended before line start ({status:?}), resending {token}");
                    self.depth = 0;
                    State::Sending { token, first }
                }
                Handoff::Interrupted(status) => {
                    debug!("parse ended mid-line ({status:?})");
                    State::Reset
                }
            },

            State::EndOfLine => {
                match self.last {
                    // Nothing sent since the last reset
                    TokenKind::End | TokenKind::Unknown => return Ok(Some(State::AwaitLine)),
                    TokenKind::Semicolon => {}
                    _ => {
                        if let Handoff::Interrupted(_) = self.send(&Token::semicolon())? {
                            return Ok(Some(State::Reset));
                        }
                    }
                }
                if self.interactive && self.depth <= 0 {
                    self.send_end()?;
                    self.depth = 0;
                }
                State::AwaitLine
            }

            State::Reset => {
                if !self.interactive {
                    State::EndOfInput
                } else {
                    self.depth = 0;
                    State::AwaitLine
                }
            }

            State::EndOfInput => {
                // The first end marker flushes whatever is pending; the
                // command then runs in a cycle of its own.
                self.send_end()?;
                self.send(&Token::command(Command::EndOfSession))?;
                self.send_end()?;
                return Ok(None);
            }
        };
        Ok(Some(next))
    }

    fn scan(&mut self) -> Option<Token> {
        let scanned = tokenizer::scan(&self.line)?;
        if let Some(err) = &scanned.error {
            warn!("{err}");
            self.diagnostics.report(err);
        }
        let consumed = self.line.len() - scanned.rest.len();
        let token = scanned.token;
        self.line.drain(..consumed);
        Some(token)
    }

    /// Receive a line, unless a parse status arrives first (`None`)
    fn await_line(&mut self) -> Result<Option<String>, Disconnected> {
        select! {
            recv(self.status) -> status => status.map(|_| None).map_err(|_| Disconnected),
            // A vanished reader is end of input
            recv(self.lines) -> line => Ok(Some(line.unwrap_or_default())),
        }
    }

    fn send(&mut self, token: &Token) -> Result<Handoff, Disconnected> {
        let outcome = select! {
            recv(self.status) -> status => status.map(Handoff::Interrupted).map_err(|_| Disconnected),
            send(self.tokens, token.clone()) -> sent => sent.map(|()| Handoff::Delivered).map_err(|_| Disconnected),
        };
        if let Ok(Handoff::Delivered) = outcome {
            self.last = token.kind;
        }
        outcome
    }

    /// Send an end marker and wait for the status of the cycle it closes
    fn send_end(&mut self) -> Result<ParseStatus, Disconnected> {
        match self.send(&Token::end())? {
            Handoff::Delivered => self.await_status(),
            Handoff::Interrupted(status) => Ok(status),
        }
    }

    fn await_status(&mut self) -> Result<ParseStatus, Disconnected> {
        self.status.recv().map_err(|_| Disconnected)
    }
}
