// Thunkcalc Parser Library
// Tokenizer, lexer/parser rendezvous and pull parser for thunkcalc

pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod sexpr;
pub mod source;
pub mod stream;
pub mod token;
pub mod tokenizer;

pub use diagnostics::{Diagnostics, SharedBuffer};
pub use error::{LexError, ParseError};
pub use parser::{parse, Reductions, TokenSource};
pub use sexpr::SexprReductions;
pub use source::{ChainedSource, LineSource, ReaderSource};
pub use stream::{ParseStatus, TokenStream};
pub use token::*;
pub use tokenizer::{scan, tokenize, Scanned};

// Include tests directory with all test modules
#[cfg(test)]
#[path = "tests/mod.rs"]
pub mod tests;
