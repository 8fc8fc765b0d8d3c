// Thunkcalc Tokens
// Token kinds, token payloads and the operator lookup table

use std::fmt;
use std::ops::BitOr;

/// Every kind of token the tokenizer can hand to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of the current parse unit (`$end`)
    End,
    /// A character outside the language alphabet
    Unknown,
    Number,
    Ident,
    For,
    Print,
    /// Synthetic command token injected by the lexer (never typed by users)
    Command,

    // Punctuation
    Semicolon,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    Assign,

    // Arithmetic and bitwise operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    AmpCaret,
    ShiftLeft,
    ShiftRight,
    Bang,

    // Comparison and logical operators
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    EqualEqual,
    BangEqual,
    AndAnd,
    OrOr,

    // Compound assignment
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    AmpCaretAssign,
    ShiftLeftAssign,
    ShiftRightAssign,

    Increment,
    Decrement,
}

impl TokenKind {
    /// Kind of a single bare punctuation character that has no operator meaning
    pub fn from_punctuation(c: char) -> Option<TokenKind> {
        match c {
            ';' => Some(TokenKind::Semicolon),
            '{' => Some(TokenKind::LeftBrace),
            '}' => Some(TokenKind::RightBrace),
            '(' => Some(TokenKind::LeftParen),
            ')' => Some(TokenKind::RightParen),
            '=' => Some(TokenKind::Assign),
            _ => None,
        }
    }

    /// Human readable description used in syntax errors
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::End => "end of input",
            TokenKind::Unknown => "unknown character",
            TokenKind::Number => "number",
            TokenKind::Ident => "identifier",
            TokenKind::For => "'for'",
            TokenKind::Print => "'print'",
            TokenKind::Command => "command",
            TokenKind::Semicolon => "';'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Assign => "'='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::AmpCaret => "'&^'",
            TokenKind::ShiftLeft => "'<<'",
            TokenKind::ShiftRight => "'>>'",
            TokenKind::Bang => "'!'",
            TokenKind::Less => "'<'",
            TokenKind::Greater => "'>'",
            TokenKind::LessEqual => "'<='",
            TokenKind::GreaterEqual => "'>='",
            TokenKind::EqualEqual => "'=='",
            TokenKind::BangEqual => "'!='",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::PlusAssign => "'+='",
            TokenKind::MinusAssign => "'-='",
            TokenKind::StarAssign => "'*='",
            TokenKind::SlashAssign => "'/='",
            TokenKind::PercentAssign => "'%='",
            TokenKind::AmpAssign => "'&='",
            TokenKind::PipeAssign => "'|='",
            TokenKind::CaretAssign => "'^='",
            TokenKind::AmpCaretAssign => "'&^='",
            TokenKind::ShiftLeftAssign => "'<<='",
            TokenKind::ShiftRightAssign => "'>>='",
            TokenKind::Increment => "'++'",
            TokenKind::Decrement => "'--'",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Primitive relations a comparison operator is composed of.
///
/// Stored as bit flags so that `<=`, `>=` and `!=` are unions of the
/// three primitives rather than separate comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relation(u8);

impl Relation {
    pub const EQUAL: Relation = Relation(1);
    pub const LESS: Relation = Relation(1 << 1);
    pub const GREATER: Relation = Relation(1 << 2);
    pub const ALL: Relation = Relation(0b111);

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True when exactly one primitive relation is set
    pub const fn is_single(self) -> bool {
        self.0.count_ones() == 1
    }

    /// The relations not contained in `self`
    pub const fn complement(self) -> Relation {
        Relation(self.0 ^ Relation::ALL.0)
    }
}

impl BitOr for Relation {
    type Output = Relation;

    fn bitor(self, rhs: Relation) -> Relation {
        Relation(self.0 | rhs.0)
    }
}

/// Whether a logical operator continues to its right operand on a true or a false left operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalMode {
    And,
    Or,
}

/// Semantic operator carried by an operator token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    /// Binary subtraction or unary negation
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    /// Binary xor or unary bitwise complement
    BitXor,
    BitClear,
    ShiftLeft,
    ShiftRight,
    Not,
    Compare(Relation),
    Logical(LogicalMode),
    Increment,
    Decrement,
    Print,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Rem => "%",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::BitClear => "&^",
            Operator::ShiftLeft => "<<",
            Operator::ShiftRight => ">>",
            Operator::Not => "!",
            Operator::Compare(relation) => match relation.bits() {
                1 => "==",
                2 => "<",
                4 => ">",
                3 => "<=",
                5 => ">=",
                6 => "!=",
                _ => "<=>",
            },
            Operator::Logical(LogicalMode::And) => "&&",
            Operator::Logical(LogicalMode::Or) => "||",
            Operator::Increment => "++",
            Operator::Decrement => "--",
            Operator::Print => "print",
        };
        f.write_str(symbol)
    }
}

/// Numeric literal as written in the source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
}

/// Commands the lexer can inject into the token stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Marks the physical end of the input; running it ends the session
    EndOfSession,
}

/// The one meaningful payload of a token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    None,
    Literal(Literal),
    Operator(Operator),
    Command(Command),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token; the name for identifiers
    pub text: String,
    pub value: TokenValue,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, value: TokenValue) -> Self {
        Self {
            kind,
            text: text.into(),
            value,
        }
    }

    pub fn end() -> Self {
        Self::new(TokenKind::End, "", TokenValue::None)
    }

    pub fn semicolon() -> Self {
        Self::new(TokenKind::Semicolon, ";", TokenValue::None)
    }

    pub fn command(command: Command) -> Self {
        Self::new(TokenKind::Command, "", TokenValue::Command(command))
    }

    pub fn literal(&self) -> Option<Literal> {
        match self.value {
            TokenValue::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn operator(&self) -> Option<Operator> {
        match self.value {
            TokenValue::Operator(operator) => Some(operator),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::End => write!(f, "end of input"),
            TokenKind::Command => write!(f, "end-of-session command"),
            TokenKind::Number => write!(f, "number {}", self.text),
            TokenKind::Ident => write!(f, "identifier {}", self.text),
            TokenKind::Unknown => write!(f, "unknown character {:?}", self.text),
            kind => write!(f, "{kind}"),
        }
    }
}

/// Operator table keyed by the 1-3 character spelling of each operator
pub fn lookup_operator(spelling: &str) -> Option<(TokenKind, Operator)> {
    use TokenKind as K;

    let entry = match spelling {
        "+" => (K::Plus, Operator::Add),
        "-" => (K::Minus, Operator::Sub),
        "*" => (K::Star, Operator::Mul),
        "/" => (K::Slash, Operator::Div),
        "%" => (K::Percent, Operator::Rem),
        "&" => (K::Amp, Operator::BitAnd),
        "|" => (K::Pipe, Operator::BitOr),
        "^" => (K::Caret, Operator::BitXor),
        "&^" => (K::AmpCaret, Operator::BitClear),
        "<<" => (K::ShiftLeft, Operator::ShiftLeft),
        ">>" => (K::ShiftRight, Operator::ShiftRight),
        "!" => (K::Bang, Operator::Not),
        "<" => (K::Less, Operator::Compare(Relation::LESS)),
        ">" => (K::Greater, Operator::Compare(Relation::GREATER)),
        "<=" => (
            K::LessEqual,
            Operator::Compare(Relation::LESS | Relation::EQUAL),
        ),
        ">=" => (
            K::GreaterEqual,
            Operator::Compare(Relation::GREATER | Relation::EQUAL),
        ),
        "==" => (K::EqualEqual, Operator::Compare(Relation::EQUAL)),
        "!=" => (
            K::BangEqual,
            Operator::Compare(Relation::LESS | Relation::GREATER),
        ),
        "&&" => (K::AndAnd, Operator::Logical(LogicalMode::And)),
        "||" => (K::OrOr, Operator::Logical(LogicalMode::Or)),
        "+=" => (K::PlusAssign, Operator::Add),
        "-=" => (K::MinusAssign, Operator::Sub),
        "*=" => (K::StarAssign, Operator::Mul),
        "/=" => (K::SlashAssign, Operator::Div),
        "%=" => (K::PercentAssign, Operator::Rem),
        "&=" => (K::AmpAssign, Operator::BitAnd),
        "|=" => (K::PipeAssign, Operator::BitOr),
        "^=" => (K::CaretAssign, Operator::BitXor),
        "&^=" => (K::AmpCaretAssign, Operator::BitClear),
        "<<=" => (K::ShiftLeftAssign, Operator::ShiftLeft),
        ">>=" => (K::ShiftRightAssign, Operator::ShiftRight),
        "++" => (K::Increment, Operator::Increment),
        "--" => (K::Decrement, Operator::Decrement),
        _ => return None,
    };
    Some(entry)
}

/// Keyword table
pub fn lookup_keyword(word: &str) -> Option<(TokenKind, TokenValue)> {
    match word {
        "for" => Some((TokenKind::For, TokenValue::None)),
        "print" => Some((TokenKind::Print, TokenValue::Operator(Operator::Print))),
        _ => None,
    }
}
