use crate::diagnostics::Diagnostics;
use crate::error::ParseError;
use crate::parser::{parse, TokenSource};
use crate::sexpr::SexprReductions;
use crate::source::ReaderSource;
use crate::tokenizer::tokenize;
use crate::stream::{Lexer, ParseStatus, State, TokenStream};
use crate::token::{Token, TokenKind};
use pretty_assertions::assert_eq;
use std::thread;
use std::time::Duration;

type Cycle = Result<Vec<String>, ParseError>;

/// Run `f` on its own thread, failing the test if it does not finish in time
fn with_timeout<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(Duration::from_secs(10))
        .expect("token stream deadlocked")
}

/// Parse cycle after cycle until the end-of-session command, like a session does
fn drive(source: &str, interactive: bool) -> (Vec<Cycle>, Vec<String>) {
    run_cycles(source, interactive, true)
}

/// Parse cycle after cycle until the lexer hangs up, ignoring end-of-session
fn drain(source: &str, interactive: bool) -> Vec<Cycle> {
    run_cycles(source, interactive, false).0
}

fn run_cycles(source: &str, interactive: bool, stop_at_end: bool) -> (Vec<Cycle>, Vec<String>) {
    let source = source.to_string();
    with_timeout(move || {
        let (diagnostics, buffer) = Diagnostics::capture();
        let mut stream =
            TokenStream::spawn(ReaderSource::from_text(&source), interactive, diagnostics)
                .unwrap();
        let mut cycles = Vec::new();
        loop {
            let mut reductions = SexprReductions::new();
            let result = parse(&mut stream, &mut reductions);
            let status = match result {
                Ok(_) => ParseStatus::Success,
                Err(_) => ParseStatus::Failure,
            };
            cycles.push(result);
            let open = stream.finish_cycle(status);
            if (stop_at_end && reductions.saw_end_of_session()) || !open {
                break;
            }
        }
        stream.join();
        (cycles, buffer.lines())
    })
}

fn ok(statements: &[&str]) -> Cycle {
    Ok(statements.iter().map(|s| s.to_string()).collect())
}

fn end_of_session() -> Cycle {
    ok(&["(end-of-session)"])
}

#[test]
fn test_batch_input_is_one_program() {
    let (cycles, errors) = drive("a = 1\nb = 2\n", false);
    assert_eq!(
        cycles,
        vec![ok(&["(= a 1)", "(= b 2)"]), end_of_session()]
    );
    assert!(errors.is_empty());
}

#[test]
fn test_empty_input_ends_the_session() {
    let (cycles, _) = drive("", false);
    assert_eq!(cycles, vec![ok(&[]), end_of_session()]);

    let (cycles, _) = drive("", true);
    assert_eq!(cycles, vec![ok(&[]), end_of_session()]);
}

#[test]
fn test_interactive_lines_are_parsed_one_at_a_time() {
    let (cycles, _) = drive("a = 1\nb = a + 1\n", true);
    assert_eq!(
        cycles,
        vec![
            ok(&["(= a 1)"]),
            ok(&["(= b (+ a 1))"]),
            ok(&[]),
            end_of_session(),
        ]
    );
}

#[test]
fn test_interactive_block_spans_lines() {
    let (cycles, _) = drive("a = 1\n{\nb\n}\n", true);
    assert_eq!(
        cycles,
        vec![
            ok(&["(= a 1)"]),
            ok(&["(block (print b))"]),
            ok(&[]),
            end_of_session(),
        ]
    );
}

#[test]
fn test_interactive_for_loop_spans_lines() {
    let (cycles, _) = drive("for i = 0; i < 2; i++ {\n  i\n}\nz\n", true);
    assert_eq!(
        cycles,
        vec![
            ok(&["(for (= i 0) (< i 2) (++ i) (block (print i)))"]),
            ok(&["(print z)"]),
            ok(&[]),
            end_of_session(),
        ]
    );
}

#[test]
fn test_comment_and_blank_lines_send_nothing() {
    let (cycles, _) = drive("# note\n\n   \nx # trailing\n", true);
    assert_eq!(
        cycles,
        vec![ok(&["(print x)"]), ok(&[]), end_of_session()]
    );
}

#[test]
fn test_explicit_semicolon_at_end_of_line() {
    let (cycles, _) = drive("a = 1;\n", true);
    assert_eq!(cycles, vec![ok(&["(= a 1)"]), ok(&[]), end_of_session()]);
}

#[test]
fn test_interactive_unknown_character_skips_to_next_line() {
    let (cycles, errors) = drive("a @ b\nc\n", true);
    assert_eq!(cycles.len(), 4);
    assert!(cycles[0].is_err());
    assert_eq!(cycles[1], ok(&["(print c)"]));
    assert_eq!(cycles[2], ok(&[]));
    assert_eq!(cycles[3], end_of_session());

    assert_eq!(
        errors,
        vec![
            "syntax error: unexpected unknown character \"@\", expecting ';' or end of input",
            "last token: unknown character \"@\"",
        ]
    );
}

#[test]
fn test_error_on_previous_line_restarts_at_line_start() {
    // `x =` is completed by an injected ';', so the first cycle fails while
    // the lexer already holds the next line.
    let (cycles, errors) = drive("{\nx =\ny\n}\n", true);
    assert_eq!(cycles.len(), 5);
    assert!(cycles[0].is_err());
    assert_eq!(cycles[1], ok(&["(print y)"]));
    // The dangling '}' fails on its own
    assert!(cycles[2].is_err());
    assert_eq!(cycles[3], ok(&[]));
    assert_eq!(cycles[4], end_of_session());

    assert_eq!(errors.len(), 4);
    assert_eq!(
        errors[0],
        "syntax error: unexpected ';', expecting expression"
    );
    assert_eq!(errors[1], "last token: ';'");
}

#[test]
fn test_batch_syntax_error_discards_remaining_input() {
    let (cycles, errors) = drive("a = 1\n1 @ 2\nb = 3\n", false);
    assert_eq!(cycles.len(), 3);
    assert!(cycles[0].is_err());
    assert_eq!(cycles[1], ok(&[]));
    assert_eq!(cycles[2], end_of_session());
    assert_eq!(errors.len(), 2);
}

#[test]
fn test_batch_error_before_line_end_discards_remaining_input() {
    let (cycles, _) = drive("1 + ) 2\nb\n", false);
    assert_eq!(cycles.len(), 3);
    assert!(cycles[0].is_err());
    assert_eq!(cycles[1], ok(&[]));
    assert_eq!(cycles[2], end_of_session());
}

#[test]
fn test_malformed_number_is_reported_and_lexed_as_zero() {
    let (cycles, errors) = drive("1.2.3\n", false);
    assert_eq!(cycles, vec![ok(&["(print 0)"]), end_of_session()]);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("invalid number \"1.2.3\""));
}

#[test]
fn test_stream_closes_after_end_of_session() {
    with_timeout(|| {
        let mut stream =
            TokenStream::spawn(ReaderSource::from_text("x\n"), false, Diagnostics::silent())
                .unwrap();

        let kinds: Vec<TokenKind> = (0..3).map(|_| stream.lex().kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Ident, TokenKind::Semicolon, TokenKind::End]
        );
        assert!(stream.finish_cycle(ParseStatus::Success));

        assert_eq!(stream.lex().kind, TokenKind::Command);
        assert_eq!(stream.last_token().map(|t| t.kind), Some(TokenKind::Command));
        assert_eq!(stream.lex().kind, TokenKind::End);
        assert!(stream.finish_cycle(ParseStatus::Success));

        // The lexer is done; any further pull yields an end marker
        assert_eq!(stream.lex().kind, TokenKind::End);
        assert!(stream.is_closed());
        assert!(!stream.finish_cycle(ParseStatus::Success));
        stream.join();
    });
}

#[test]
fn test_join_after_abandoned_cycle_does_not_hang() {
    with_timeout(|| {
        let stream = TokenStream::spawn(
            ReaderSource::from_text("a = 1\nb = 2\n"),
            true,
            Diagnostics::silent(),
        )
        .unwrap();
        // Hanging up mid-session must release the lexer
        stream.join();
    });
}

#[test]
fn test_end_of_session_is_sent_exactly_once() {
    let inputs = [
        "",
        "\n\n\n",
        "1 +",
        "{",
        "for i = 0; i < 2; i++ {",
        ")))",
        "x\n@\n1 / 0\n{ }\n}\n",
        "a = 1\n# only a comment\n",
    ];
    for source in inputs {
        for interactive in [false, true] {
            let cycles = drain(source, interactive);
            let ends: Vec<usize> = cycles
                .iter()
                .enumerate()
                .filter(|(_, cycle)| **cycle == end_of_session())
                .map(|(index, _)| index)
                .collect();
            // Only the empty cycle seen after the lexer hung up follows it
            assert_eq!(ends, vec![cycles.len() - 2], "{source:?} {interactive}: {cycles:?}");
            assert_eq!(cycles.last(), Some(&ok(&[])), "{source:?} {interactive}");
        }
    }
}

/// A status arriving while the first token of a line waits to be sent
fn step_with_pending_status(interactive: bool) -> (Option<State>, i32) {
    with_timeout(move || {
        let (_line_tx, line_rx) = crossbeam_channel::bounded::<String>(0);
        let (token_tx, _token_rx) = crossbeam_channel::bounded::<Token>(0);
        let (status_tx, status_rx) = crossbeam_channel::bounded(0);
        let mut lexer = Lexer::new(interactive, line_rx, token_tx, status_rx, Diagnostics::silent());
        lexer.depth = 2;

        // Nobody receives tokens, so the status is the only ready operation
        let parser = thread::spawn(move || status_tx.send(ParseStatus::Failure).is_ok());
        let token = tokenize("{").next().unwrap();
        let next = lexer.step(State::Sending { token, first: true }).unwrap();
        assert!(parser.join().unwrap());
        (next, lexer.depth)
    })
}

#[test]
fn test_interactive_first_token_is_resent_at_depth_zero() {
    let (next, depth) = step_with_pending_status(true);
    assert!(
        matches!(
            &next,
            Some(State::Sending { token, first: true }) if token.kind == TokenKind::LeftBrace
        ),
        "{next:?}"
    );
    assert_eq!(depth, 0);
}

#[test]
fn test_batch_first_token_is_dropped_on_pending_status() {
    let (next, depth) = step_with_pending_status(false);
    assert!(matches!(next, Some(State::Reset)), "{next:?}");
    assert_eq!(depth, 2);
}
