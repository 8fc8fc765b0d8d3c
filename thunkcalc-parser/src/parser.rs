// Thunkcalc Parser
// Pull parser that reduces straight into caller-built nodes
//
// The parser never sees the input text. It pulls one token at a time from a
// `TokenSource`, stops pulling at the end marker or at the first offending
// token, and hands every reduction to a `Reductions` implementation. There
// is no intermediate syntax tree: whatever `Reductions::Node` is (a thunk,
// an S-expression, ...) gets built as the input is recognised.

use crate::error::{ParseError, Result};
use crate::token::{Command, Literal, Operator, Token, TokenKind, TokenValue};
use log::trace;

/// Token supply and error reporting hooks required by the parser
pub trait TokenSource {
    /// Pull the next token
    fn lex(&mut self) -> Token;

    /// Report a syntax error
    fn error(&mut self, message: &str);
}

/// One constructor per grammar reduction
pub trait Reductions {
    type Node;

    fn number(&mut self, literal: Literal) -> Self::Node;

    fn variable(&mut self, name: &str) -> Self::Node;

    /// Prefix operator; multi-role operators (`-`, `^`) take their unary form here
    fn unary(&mut self, operator: Operator, operand: Self::Node) -> Self::Node;

    fn binary(&mut self, operator: Operator, left: Self::Node, right: Self::Node) -> Self::Node;

    /// Assignment to `name`:
    /// - `operator == None`: plain `=`, `value` is the new value
    /// - `value == None`: `++`/`--`, the operator is applied to the current value
    /// - both present: compound assignment such as `+=`
    fn assign(
        &mut self,
        name: &str,
        operator: Option<Operator>,
        value: Option<Self::Node>,
    ) -> Self::Node;

    fn for_loop(
        &mut self,
        init: Option<Self::Node>,
        condition: Option<Self::Node>,
        post: Option<Self::Node>,
        body: Self::Node,
    ) -> Self::Node;

    fn block(&mut self, statements: Vec<Self::Node>) -> Self::Node;

    fn command(&mut self, command: Command) -> Self::Node;
}

/// Parse one program: statements up to the next end marker.
///
/// Syntax errors are reported through [`TokenSource::error`] before being
/// returned.
pub fn parse<L, R>(lexer: &mut L, reductions: &mut R) -> Result<Vec<R::Node>>
where
    L: TokenSource,
    R: Reductions,
{
    let mut parser = Parser {
        lexer,
        reductions,
        lookahead: None,
    };
    let result = parser.program();
    if let Err(err) = &result {
        parser.lexer.error(&err.to_string());
    }
    result
}

/// Binding strength of binary operators, weakest first
fn binary_precedence(kind: TokenKind) -> Option<u8> {
    use TokenKind as K;

    let level = match kind {
        // Level 1: Logical OR
        K::OrOr => 1,
        // Level 2: Logical AND
        K::AndAnd => 2,
        // Level 3: Comparison
        K::EqualEqual | K::BangEqual | K::Less | K::LessEqual | K::Greater | K::GreaterEqual => 3,
        // Level 4: Additive
        K::Plus | K::Minus | K::Pipe | K::Caret => 4,
        // Level 5: Multiplicative
        K::Star | K::Slash | K::Percent | K::ShiftLeft | K::ShiftRight | K::Amp | K::AmpCaret => 5,
        _ => return None,
    };
    Some(level)
}

fn is_assignment(kind: TokenKind) -> bool {
    use TokenKind as K;

    matches!(
        kind,
        K::Assign
            | K::PlusAssign
            | K::MinusAssign
            | K::StarAssign
            | K::SlashAssign
            | K::PercentAssign
            | K::AmpAssign
            | K::PipeAssign
            | K::CaretAssign
            | K::AmpCaretAssign
            | K::ShiftLeftAssign
            | K::ShiftRightAssign
    )
}

/// What kind of expression was reduced, as far as statements care
#[derive(Debug, Clone, PartialEq)]
enum Form {
    /// A bare variable reference, which may still become an assignment target
    Variable(String),
    /// Assignment, increment/decrement or print: produces no implicit output
    Effect,
    Value,
}

struct Expr<N> {
    node: N,
    form: Form,
}

impl<N> Expr<N> {
    fn value(node: N) -> Self {
        Self {
            node,
            form: Form::Value,
        }
    }

    fn effect(node: N) -> Self {
        Self {
            node,
            form: Form::Effect,
        }
    }
}

struct Parser<'a, L, R> {
    lexer: &'a mut L,
    reductions: &'a mut R,
    lookahead: Option<Token>,
}

impl<L, R> Parser<'_, L, R>
where
    L: TokenSource,
    R: Reductions,
{
    fn peek(&mut self) -> TokenKind {
        match &self.lookahead {
            Some(token) => token.kind,
            None => {
                let token = self.lexer.lex();
                let kind = token.kind;
                self.lookahead = Some(token);
                kind
            }
        }
    }

    fn advance(&mut self) -> Token {
        match self.lookahead.take() {
            Some(token) => token,
            None => self.lexer.lex(),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        let token = self.advance();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(ParseError::unexpected(&token, kind.describe()))
        }
    }

    fn program(&mut self) -> Result<Vec<R::Node>> {
        let statements = self.statements(TokenKind::End)?;
        self.expect(TokenKind::End)?;
        trace!("parsed program of {} statements", statements.len());
        Ok(statements)
    }

    /// Statements separated by `;`, up to (not including) `terminator`
    fn statements(&mut self, terminator: TokenKind) -> Result<Vec<R::Node>> {
        let mut statements = Vec::new();
        loop {
            let kind = self.peek();
            if kind == terminator {
                return Ok(statements);
            }
            if kind == TokenKind::Semicolon {
                self.advance();
                continue;
            }

            statements.push(self.statement()?);

            match self.peek() {
                TokenKind::Semicolon => {
                    self.advance();
                }
                kind if kind == terminator => {}
                _ => {
                    let token = self.advance();
                    return Err(ParseError::unexpected(
                        &token,
                        format!("';' or {}", terminator.describe()),
                    ));
                }
            }
        }
    }

    fn statement(&mut self) -> Result<R::Node> {
        match self.peek() {
            TokenKind::For => self.for_statement(),
            TokenKind::LeftBrace => self.block(),
            TokenKind::Command => {
                let token = self.advance();
                match token.value {
                    TokenValue::Command(command) => Ok(self.reductions.command(command)),
                    _ => Err(ParseError::unexpected(&token, "statement")),
                }
            }
            _ => {
                let expr = self.expression()?;
                Ok(match expr.form {
                    Form::Effect => expr.node,
                    // A bare value at statement level is shown to the user
                    Form::Value | Form::Variable(_) => {
                        self.reductions.unary(Operator::Print, expr.node)
                    }
                })
            }
        }
    }

    fn block(&mut self) -> Result<R::Node> {
        self.expect(TokenKind::LeftBrace)?;
        let statements = self.statements(TokenKind::RightBrace)?;
        self.expect(TokenKind::RightBrace)?;
        Ok(self.reductions.block(statements))
    }

    /// `for [init]; [cond]; [post] { ... }`, `for cond { ... }`, or either
    /// header wrapped in parentheses
    fn for_statement(&mut self) -> Result<R::Node> {
        self.expect(TokenKind::For)?;

        let (init, condition, post) = if self.peek() == TokenKind::LeftParen {
            self.advance();
            let clauses = self.for_clauses(TokenKind::RightParen)?;
            self.expect(TokenKind::RightParen)?;
            clauses
        } else {
            self.for_clauses(TokenKind::LeftBrace)?
        };

        let body = self.block()?;
        Ok(self.reductions.for_loop(init, condition, post, body))
    }

    #[allow(clippy::type_complexity)]
    fn for_clauses(
        &mut self,
        terminator: TokenKind,
    ) -> Result<(Option<R::Node>, Option<R::Node>, Option<R::Node>)> {
        let first = self.optional_expression(&[TokenKind::Semicolon, terminator])?;
        if self.peek() != TokenKind::Semicolon {
            // Condition-only loop
            return Ok((None, first, None));
        }
        self.advance();

        let condition = self.optional_expression(&[TokenKind::Semicolon])?;
        self.expect(TokenKind::Semicolon)?;
        let post = self.optional_expression(&[terminator])?;
        Ok((first, condition, post))
    }

    fn optional_expression(&mut self, stops: &[TokenKind]) -> Result<Option<R::Node>> {
        if stops.contains(&self.peek()) {
            return Ok(None);
        }
        Ok(Some(self.expression()?.node))
    }

    fn expression(&mut self) -> Result<Expr<R::Node>> {
        let left = self.binary(1)?;
        if !is_assignment(self.peek()) {
            return Ok(left);
        }

        let token = self.advance();
        let Form::Variable(name) = left.form else {
            return Err(ParseError::invalid_target(token.kind, "an expression"));
        };
        // Right associative: `a = b = 1`
        let value = self.expression()?;
        let node = self
            .reductions
            .assign(&name, token.operator(), Some(value.node));
        Ok(Expr::effect(node))
    }

    fn binary(&mut self, min_precedence: u8) -> Result<Expr<R::Node>> {
        let mut left = self.unary()?;
        while let Some(precedence) = binary_precedence(self.peek()) {
            if precedence < min_precedence {
                break;
            }
            let token = self.advance();
            let Some(operator) = token.operator() else {
                return Err(ParseError::unexpected(&token, "binary operator"));
            };
            let right = self.binary(precedence + 1)?;
            left = Expr::value(self.reductions.binary(operator, left.node, right.node));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr<R::Node>> {
        match self.peek() {
            TokenKind::Minus | TokenKind::Bang | TokenKind::Caret => {
                let token = self.advance();
                let Some(operator) = token.operator() else {
                    return Err(ParseError::unexpected(&token, "unary operator"));
                };
                let operand = self.unary()?;
                Ok(Expr::value(self.reductions.unary(operator, operand.node)))
            }
            TokenKind::Increment | TokenKind::Decrement => {
                let token = self.advance();
                let target = self.advance();
                if target.kind != TokenKind::Ident {
                    return Err(ParseError::invalid_target(token.kind, target.to_string()));
                }
                let node = self
                    .reductions
                    .assign(&target.text, token.operator(), None);
                Ok(Expr::effect(node))
            }
            TokenKind::Print => {
                self.advance();
                let value = self.expression()?;
                Ok(Expr::effect(
                    self.reductions.unary(Operator::Print, value.node),
                ))
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<Expr<R::Node>> {
        let primary = self.primary()?;
        if !matches!(self.peek(), TokenKind::Increment | TokenKind::Decrement) {
            return Ok(primary);
        }

        let token = self.advance();
        match primary.form {
            Form::Variable(name) => {
                let node = self.reductions.assign(&name, token.operator(), None);
                Ok(Expr::effect(node))
            }
            _ => Err(ParseError::invalid_target(token.kind, "an expression")),
        }
    }

    fn primary(&mut self) -> Result<Expr<R::Node>> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number => match token.literal() {
                Some(literal) => Ok(Expr::value(self.reductions.number(literal))),
                None => Err(ParseError::unexpected(&token, "number")),
            },
            TokenKind::Ident => {
                let node = self.reductions.variable(&token.text);
                Ok(Expr {
                    node,
                    form: Form::Variable(token.text),
                })
            }
            TokenKind::LeftParen => {
                let inner = self.expression()?;
                self.expect(TokenKind::RightParen)?;
                // Grouping keeps side effects unprinted but is no longer a target
                Ok(match inner.form {
                    Form::Effect => Expr::effect(inner.node),
                    Form::Value | Form::Variable(_) => Expr::value(inner.node),
                })
            }
            _ => Err(ParseError::unexpected(&token, "expression")),
        }
    }
}
