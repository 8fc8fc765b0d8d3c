//! Unit tests for the thunkcalc parser crate

pub mod test_source;
pub mod test_stream;

use crate::parser::TokenSource;
use crate::token::Token;
use crate::tokenizer::tokenize;
use std::collections::VecDeque;

/// Token source replaying a fixed token list, then end markers forever
#[derive(Debug, Default)]
pub struct ScriptedLexer {
    pub tokens: VecDeque<Token>,
    pub errors: Vec<String>,
}

impl ScriptedLexer {
    /// Tokens of `source` (newlines count as plain whitespace) followed by an end marker
    pub fn from_source(source: &str) -> Self {
        let mut tokens: VecDeque<Token> = tokenize(source).collect();
        tokens.push_back(Token::end());
        Self {
            tokens,
            errors: Vec::new(),
        }
    }

    pub fn from_tokens(tokens: impl IntoIterator<Item = Token>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
            errors: Vec::new(),
        }
    }
}

impl TokenSource for ScriptedLexer {
    fn lex(&mut self) -> Token {
        self.tokens.pop_front().unwrap_or_else(Token::end)
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
