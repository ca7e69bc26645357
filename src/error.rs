/// Lexical errors.
///
/// Raised while turning source text into tokens: unterminated string literals,
/// characters that do not start any token, and unknown escape sequences.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the syntax tree from
/// a token stream. Parse errors include unexpected tokens, missing
/// delimiters, and invalid assignment targets.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation: unknown
/// variables, operand type mismatches, wrong argument counts, calls to
/// non-callable values and exhausted recursion depth.
pub mod runtime_error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any failure produced while running a Flax program.
///
/// Lexical and parse errors are detected before execution starts, so a program
/// that fails with either of them has produced no output. Runtime errors abort
/// the program at the failing statement.
#[derive(Debug)]
pub enum FlaxError {
    /// The source text could not be tokenized.
    Lex(LexError),
    /// The token stream does not match the grammar.
    Parse(ParseError),
    /// Evaluation failed.
    Runtime(RuntimeError),
}

impl FlaxError {
    /// The diagnostic name of the error, as printed before the message.
    ///
    /// ## Example
    /// ```
    /// use flax::error::{FlaxError, RuntimeError};
    ///
    /// let err = FlaxError::Runtime(RuntimeError::UndefinedVariable { name: "x".into(),
    ///                                                                line: 3, });
    /// assert_eq!(err.kind(), "UndefinedVariable");
    /// ```
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Lex(_) => "LexError",
            Self::Parse(_) => "ParseError",
            Self::Runtime(e) => e.kind(),
        }
    }

    /// The source line where the error originated.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Lex(e) => e.line(),
            Self::Parse(e) => e.line(),
            Self::Runtime(e) => e.line(),
        }
    }
}

impl FlaxError {
    /// The process exit status that reports this error.
    ///
    /// Follows the BSD `sysexits` convention: `65` (bad input data) for
    /// lexical and parse errors, `70` (internal software error) for runtime
    /// errors.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Lex(_) | Self::Parse(_) => 65,
            Self::Runtime(_) => 70,
        }
    }
}

impl From<LexError> for FlaxError {
    fn from(e: LexError) -> Self {
        Self::Lex(e)
    }
}

impl From<ParseError> for FlaxError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<RuntimeError> for FlaxError {
    fn from(e: RuntimeError) -> Self {
        Self::Runtime(e)
    }
}

impl std::fmt::Display for FlaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lex(e) => write!(f, "{e}"),
            Self::Parse(e) => write!(f, "{e}"),
            Self::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FlaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lex(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Runtime(e) => Some(e),
        }
    }
}
