use logos::Logos;
use tracing::trace;

use crate::error::LexError;

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexFailure)]
pub enum Token {
    /// Numeric literal tokens, such as `42` or `3.14`. Both forms are stored as
    /// `f64`.
    #[regex(r"[0-9]+(\.[0-9]+)?", parse_number)]
    Number(f64),
    /// String literal tokens, such as `"hello"`, with escapes resolved.
    #[regex(r#""([^"\\]|\\(.|\n))*""#, parse_string, allow_greedy = true)]
    #[regex(r#""([^"\\]|\\(.|\n))*"#, unterminated_string, allow_greedy = true)]
    String(String),
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `nil`
    #[token("nil")]
    Nil,
    /// `func`
    #[token("func")]
    Func,
    /// `let`
    #[token("let")]
    Let,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `return`
    #[token("return")]
    Return,
    /// Identifier tokens; variable or function names such as `x` or `fibTwo`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    MulAssign,
    /// `/=`
    #[token("/=")]
    DivAssign,
    /// `++`
    #[token("++")]
    PlusPlus,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `?`
    #[token("?")]
    Question,
    /// `:`
    #[token(":")]
    Colon,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `!`
    #[token("!")]
    Bang,
    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,

    /// Line breaks only advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
/// Incremented as newlines are processed, including those inside string
/// literals.
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line: 1 }
    }
}

/// Reasons the lexer can stop on a slice of input.
///
/// This is the raw error reported by the generated lexer; [`tokenize`] turns it
/// into a [`LexError`] carrying the offending text and line.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexFailure {
    /// No token pattern matches the input.
    #[default]
    UnexpectedCharacter,
    /// A string literal reaches the end of input without a closing quote.
    UnterminatedString,
    /// A backslash is followed by a character that has no escape meaning.
    InvalidEscape(char),
}

impl LexFailure {
    fn into_error(self, slice: &str, line: usize) -> LexError {
        match self {
            Self::UnexpectedCharacter => LexError::UnexpectedCharacter { character: slice.to_string(),
                                                                         line },
            Self::UnterminatedString => LexError::UnterminatedString { line },
            Self::InvalidEscape(escape) => LexError::InvalidEscape { escape, line },
        }
    }
}

/// Parses a numeric literal from the current token slice.
///
/// # Parameters
/// - `lex`: Reference to the Logos lexer at the current token.
///
/// # Returns
/// - `Some(f64)`: The parsed value. Integer spellings such as `10` are stored
///   as `10.0`.
/// - `None`: If the token slice is not a valid number.
fn parse_number(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses a string literal, resolving escape sequences.
///
/// The surrounding quotes are stripped. Newlines inside the literal are
/// counted so that later tokens report the right line.
fn parse_string(lex: &mut logos::Lexer<Token>) -> Result<String, LexFailure> {
    let slice = lex.slice();
    lex.extras.line += slice.matches('\n').count();

    let body = &slice[1..slice.len() - 1];
    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('"') => value.push('"'),
            Some('\\') => value.push('\\'),
            Some(other) => return Err(LexFailure::InvalidEscape(other)),
            None => return Err(LexFailure::UnterminatedString),
        }
    }

    Ok(value)
}

/// Reports a string literal that runs to the end of input.
fn unterminated_string(lex: &mut logos::Lexer<Token>) -> Result<String, LexFailure> {
    lex.extras.line += lex.slice().matches('\n').count();
    Err(LexFailure::UnterminatedString)
}

/// Converts source text into a list of `(token, line)` pairs.
///
/// Comments and whitespace are discarded. Lexing stops at the first error; no
/// tokens are returned for a malformed input.
///
/// # Errors
/// - `LexError::UnterminatedString` if a string literal is never closed.
/// - `LexError::UnexpectedCharacter` for characters that begin no token.
/// - `LexError::InvalidEscape` for an unknown `\` escape.
///
/// # Example
/// ```
/// use flax::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("let x = 1;\nx += 2;").unwrap();
///
/// assert_eq!(tokens[0], (Token::Let, 1));
/// assert_eq!(tokens[3], (Token::Number(1.0), 1));
/// assert_eq!(tokens[6], (Token::PlusAssign, 2));
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, LexError> {
    let mut lexer = Token::lexer_with_extras(source, LexerExtras::default());
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        // Multi-line string literals have already advanced the counter past
        // their own newlines.
        let line = lexer.extras.line - lexer.slice().matches('\n').count();

        match result {
            Ok(token) => tokens.push((token, line)),
            Err(failure) => return Err(failure.into_error(lexer.slice(), line)),
        }
    }

    trace!(count = tokens.len(), lines = lexer.extras.line, "tokenized source");
    Ok(tokens)
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Number(n) => return write!(f, "{n}"),
            Self::String(s) => return write!(f, "\"{s}\""),
            Self::Identifier(name) => return write!(f, "{name}"),
            Self::True => "true",
            Self::False => "false",
            Self::Nil => "nil",
            Self::Func => "func",
            Self::Let => "let",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::Return => "return",
            Self::Comment => "//",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::MulAssign => "*=",
            Self::DivAssign => "/=",
            Self::PlusPlus => "++",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Question => "?",
            Self::Colon => ":",
            Self::Equals => "=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Bang => "!",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::NewLine => "\\n",
            Self::Ignored => " ",
        };
        write!(f, "{text}")
    }
}
