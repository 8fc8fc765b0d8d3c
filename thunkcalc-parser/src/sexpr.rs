// S-expression reductions
// Renders each reduction as Lisp-like text instead of building thunks

use crate::parser::Reductions;
use crate::token::{Command, Literal, Operator};

/// Reductions producing a readable S-expression per statement.
///
/// Used by the `parse` command and throughout the parser tests.
#[derive(Debug, Default)]
pub struct SexprReductions {
    end_of_session: bool,
}

impl SexprReductions {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the end-of-session command has been reduced
    pub fn saw_end_of_session(&self) -> bool {
        self.end_of_session
    }
}

fn optional(node: Option<String>) -> String {
    node.unwrap_or_else(|| "_".to_string())
}

impl Reductions for SexprReductions {
    type Node = String;

    fn number(&mut self, literal: Literal) -> String {
        match literal {
            Literal::Integer(value) => value.to_string(),
            Literal::Float(value) => format!("{value:?}"),
        }
    }

    fn variable(&mut self, name: &str) -> String {
        name.to_string()
    }

    fn unary(&mut self, operator: Operator, operand: String) -> String {
        format!("({operator} {operand})")
    }

    fn binary(&mut self, operator: Operator, left: String, right: String) -> String {
        format!("({operator} {left} {right})")
    }

    fn assign(&mut self, name: &str, operator: Option<Operator>, value: Option<String>) -> String {
        match (operator, value) {
            (None, Some(value)) => format!("(= {name} {value})"),
            (Some(operator), Some(value)) => format!("({operator}= {name} {value})"),
            (Some(operator), None) => format!("({operator} {name})"),
            (None, None) => format!("(= {name} _)"),
        }
    }

    fn for_loop(
        &mut self,
        init: Option<String>,
        condition: Option<String>,
        post: Option<String>,
        body: String,
    ) -> String {
        format!(
            "(for {} {} {} {body})",
            optional(init),
            optional(condition),
            optional(post)
        )
    }

    fn block(&mut self, statements: Vec<String>) -> String {
        if statements.is_empty() {
            "(block)".to_string()
        } else {
            format!("(block {})", statements.join(" "))
        }
    }

    fn command(&mut self, command: Command) -> String {
        match command {
            Command::EndOfSession => {
                self.end_of_session = true;
                "(end-of-session)".to_string()
            }
        }
    }
}
