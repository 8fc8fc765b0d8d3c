use crate::source::{ChainedSource, LineSource, ReaderSource};
use crate::token::TokenKind;
use crate::tokenizer::tokenize;
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn read_all(mut source: impl LineSource) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(line) = source.next_line().unwrap() {
        lines.push(line);
    }
    lines
}

#[test]
fn test_line_terminators_are_stripped() {
    let source = ReaderSource::from_text("a = 1\r\n\nb\n  c");
    assert_eq!(read_all(source), vec!["a = 1", "", "b", "  c"]);
}

#[test]
fn test_invalid_utf8_is_replaced_not_fatal() {
    let source = ReaderSource::new(Cursor::new(b"1\nx = \xff\n2\n".to_vec()));
    let lines = read_all(source);
    assert_eq!(lines, vec!["1", "x = \u{FFFD}", "2"]);

    let kinds: Vec<TokenKind> = tokenize(&lines[1]).map(|token| token.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::Assign, TokenKind::Unknown]);
}

#[test]
fn test_chained_sources_read_in_order() {
    let mut source = ChainedSource::new();
    source.push(ReaderSource::from_text("a\nb"));
    source.push(ReaderSource::from_text(""));
    source.push(ReaderSource::from_text("c\n"));
    assert_eq!(read_all(source), vec!["a", "b", "c"]);
}
