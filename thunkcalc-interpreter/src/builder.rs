//! Parser reductions that build thunks.

use crate::number::Number;
use crate::thunk::Thunk;
use thunkcalc_parser::{Command, Literal, Operator, Reductions};

/// Turns every grammar reduction into the matching [`Thunk`]
#[derive(Debug, Default)]
pub struct ThunkBuilder;

impl ThunkBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl Reductions for ThunkBuilder {
    type Node = Thunk;

    fn number(&mut self, literal: Literal) -> Thunk {
        Thunk::constant(Number::from(literal))
    }

    fn variable(&mut self, name: &str) -> Thunk {
        Thunk::variable(name)
    }

    fn unary(&mut self, operator: Operator, operand: Thunk) -> Thunk {
        Thunk::operator(operator, operand, None)
    }

    fn binary(&mut self, operator: Operator, left: Thunk, right: Thunk) -> Thunk {
        Thunk::operator(operator, left, Some(right))
    }

    fn assign(&mut self, name: &str, operator: Option<Operator>, value: Option<Thunk>) -> Thunk {
        let value = match (operator, value) {
            (None, Some(value)) => value,
            // `x += v` and `x++` read the current value of `x` first
            (Some(operator), value) => Thunk::operator(operator, Thunk::variable(name), value),
            (None, None) => Thunk::variable(name),
        };
        Thunk::assign(name, value)
    }

    fn for_loop(
        &mut self,
        init: Option<Thunk>,
        condition: Option<Thunk>,
        post: Option<Thunk>,
        body: Thunk,
    ) -> Thunk {
        Thunk::for_loop(init, condition, post, body)
    }

    fn block(&mut self, statements: Vec<Thunk>) -> Thunk {
        Thunk::block(statements)
    }

    fn command(&mut self, command: Command) -> Thunk {
        match command {
            Command::EndOfSession => Thunk::end_of_session(),
        }
    }
}
