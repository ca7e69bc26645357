#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while tokenizing source text.
pub enum LexError {
    /// A string literal was opened with `"` but never closed.
    UnterminatedString {
        /// The source line where the string starts.
        line: usize,
    },
    /// A character that does not begin any token.
    UnexpectedCharacter {
        /// The offending text.
        character: String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// A backslash escape inside a string literal is not recognized.
    InvalidEscape {
        /// The character following the backslash.
        escape: char,
        /// The source line where the error occurred.
        line:   usize,
    },
}

impl LexError {
    /// The source line where the error occurred.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnterminatedString { line }
            | Self::UnexpectedCharacter { line, .. }
            | Self::InvalidEscape { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedString { line } => {
                write!(f, "LexError: Unterminated string literal (line {line})")
            },
            Self::UnexpectedCharacter { character, line } => {
                write!(f, "LexError: Unexpected character '{character}' (line {line})")
            },
            Self::InvalidEscape { escape, line } => {
                write!(f, "LexError: Invalid escape sequence '\\{escape}' (line {line})")
            },
        }
    }
}

impl std::error::Error for LexError {}
