//! Parsing whole scripts through the public API

use pretty_assertions::assert_eq;
use std::thread;
use std::time::Duration;
use thunkcalc_parser::{
    Diagnostics, ParseStatus, ReaderSource, SexprReductions, TokenStream, parse,
};

/// Statements of every cycle of a batch run, with the end-of-session cycle left out
fn dump(script: &'static str) -> Vec<String> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::spawn(move || {
        let mut stream =
            TokenStream::spawn(ReaderSource::from_text(script), false, Diagnostics::silent())
                .unwrap();
        let mut lines = Vec::new();
        loop {
            let mut reductions = SexprReductions::new();
            let status = match parse(&mut stream, &mut reductions) {
                Ok(statements) => {
                    if !reductions.saw_end_of_session() {
                        lines.extend(statements);
                    }
                    ParseStatus::Success
                }
                Err(err) => {
                    lines.push(format!("error: {err}"));
                    ParseStatus::Failure
                }
            };
            if !stream.finish_cycle(status) || reductions.saw_end_of_session() {
                break;
            }
        }
        stream.join();
        let _ = tx.send(lines);
    });
    rx.recv_timeout(Duration::from_secs(10))
        .expect("parse did not terminate")
}

#[test]
fn test_script_with_loops_and_comments() {
    let script = "\
# sum of squares
total = 0
for i = 1; i <= 3; i++ {
    total += i * i   # accumulate
}
print total
";
    assert_eq!(
        dump(script),
        vec![
            "(= total 0)",
            "(for (= i 1) (<= i 3) (++ i) (block (+= total (* i i))))",
            "(print total)",
        ]
    );
}

#[test]
fn test_script_with_syntax_error() {
    assert_eq!(
        dump("a = 1\nb = = 2\nc = 3\n"),
        vec!["error: syntax error: unexpected '=', expecting expression"]
    );
}
