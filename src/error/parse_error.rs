#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while parsing a token stream.
pub enum ParseError {
    /// Found a token that does not fit the grammar at this position.
    UnexpectedToken {
        /// The token encountered.
        token:    String,
        /// What the parser was looking for.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Reached the end of input in the middle of a construct.
    UnexpectedEndOfInput {
        /// What the parser was looking for.
        expected: String,
        /// The line of the last token read.
        line:     usize,
    },
    /// The left-hand side of `=` or a compound assignment is not a variable.
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A function declaration or call lists more than
    /// [`MAX_PARAMETERS`](crate::interpreter::parser::core::MAX_PARAMETERS)
    /// entries.
    TooManyParameters {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl ParseError {
    /// The source line where the error occurred.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEndOfInput { line, .. }
            | Self::InvalidAssignmentTarget { line }
            | Self::TooManyParameters { line } => *line,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { token,
                                    expected,
                                    line, } => {
                write!(f, "ParseError: Expected {expected}, found '{token}' (line {line})")
            },
            Self::UnexpectedEndOfInput { expected, line } => {
                write!(f, "ParseError: Expected {expected}, found end of input (line {line})")
            },
            Self::InvalidAssignmentTarget { line } => {
                write!(f, "ParseError: Invalid assignment target (line {line})")
            },
            Self::TooManyParameters { line } => write!(f,
                                                       "ParseError: Can't have more than 255 parameters or arguments (line {line})"),
        }
    }
}

impl std::error::Error for ParseError {}
