// Thunkcalc Tokenizer
// Turns the remainder of an input line into one token at a time

use crate::error::LexError;
use crate::token::{lookup_keyword, lookup_operator, Literal, Token, TokenKind, TokenValue};

/// Characters that start an operator or punctuation token
pub const OPERATOR_ALPHABET: &str = "!%&()*+-/;<=>^{|}";

/// Longest operator spelling in the operator table
const MAX_OPERATOR_LEN: usize = 3;

/// Result of scanning one token off the front of a line
#[derive(Debug)]
pub struct Scanned<'a> {
    pub token: Token,
    /// Unconsumed remainder of the line
    pub rest: &'a str,
    /// Set when a numeric literal could not be parsed (the token is then a zero literal)
    pub error: Option<LexError>,
}

/// Scan one token from `input`.
///
/// Returns `None` when the line holds nothing more to tokenize: it is blank
/// or the remainder is a `#` comment.
pub fn scan(input: &str) -> Option<Scanned<'_>> {
    let line = input.trim_start();
    let first = line.chars().next()?;
    if first == '#' {
        return None;
    }

    let (token, len, error) = if OPERATOR_ALPHABET.contains(first) {
        let (token, len) = scan_operator(line, first);
        (token, len, None)
    } else if first.is_ascii_digit() {
        scan_number(line)
    } else if first.is_ascii_lowercase() {
        let (token, len) = scan_word(line);
        (token, len, None)
    } else {
        let len = first.len_utf8();
        let token = Token::new(TokenKind::Unknown, &line[..len], TokenValue::None);
        (token, len, None)
    };

    Some(Scanned {
        token,
        rest: &line[len..],
        error,
    })
}

/// Longest-prefix match against the operator table, falling back to bare punctuation
fn scan_operator(line: &str, first: char) -> (Token, usize) {
    for len in (1..=MAX_OPERATOR_LEN.min(line.len())).rev() {
        let Some(spelling) = line.get(..len) else {
            continue;
        };
        if let Some((kind, operator)) = lookup_operator(spelling) {
            return (
                Token::new(kind, spelling, TokenValue::Operator(operator)),
                len,
            );
        }
    }

    let kind = TokenKind::from_punctuation(first).unwrap_or(TokenKind::Unknown);
    (Token::new(kind, &line[..1], TokenValue::None), 1)
}

fn scan_number(line: &str) -> (Token, usize, Option<LexError>) {
    let len = line
        .bytes()
        .take_while(|b| b.is_ascii_digit() || *b == b'.')
        .count();
    let text = &line[..len];

    let (literal, error) = match text.parse::<i64>() {
        Ok(value) => (Literal::Integer(value), None),
        Err(_) => match text.parse::<f64>() {
            Ok(value) => (Literal::Float(value), None),
            Err(err) => (
                Literal::Integer(0),
                Some(LexError::InvalidNumber {
                    text: text.to_string(),
                    reason: err.to_string(),
                }),
            ),
        },
    };

    (
        Token::new(TokenKind::Number, text, TokenValue::Literal(literal)),
        len,
        error,
    )
}

fn scan_word(line: &str) -> (Token, usize) {
    let len = line.bytes().take_while(u8::is_ascii_lowercase).count();
    let word = &line[..len];

    let token = match lookup_keyword(word) {
        Some((kind, value)) => Token::new(kind, word, value),
        None => Token::new(TokenKind::Ident, word, TokenValue::None),
    };
    (token, len)
}

/// Iterator over every token of a single line
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let scanned = scan(self.rest)?;
        self.rest = scanned.rest;
        Some(scanned.token)
    }
}

/// Tokenize a whole line, discarding literal errors
pub fn tokenize(line: &str) -> Tokens<'_> {
    Tokens { rest: line }
}
