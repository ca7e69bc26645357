#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during evaluation.
pub enum RuntimeError {
    /// Read or assigned a name that no enclosing scope binds.
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An operand had a kind the operator does not accept.
    TypeMismatch {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// The number of call arguments differs from the parameter count.
    ArityMismatch {
        /// The number of declared parameters.
        expected: usize,
        /// The number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// The call target is neither a function nor a native function.
    NotCallable {
        /// The kind of the value that was called.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// The call depth exceeded the configured limit.
    StackOverflow {
        /// The depth that was reached.
        depth: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Writing program output failed.
    Output {
        /// The underlying I/O error message.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
}

impl RuntimeError {
    /// The diagnostic name of the error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UndefinedVariable { .. } => "UndefinedVariable",
            Self::TypeMismatch { .. } => "TypeMismatch",
            Self::ArityMismatch { .. } => "ArityMismatch",
            Self::NotCallable { .. } => "NotCallable",
            Self::StackOverflow { .. } => "StackOverflow",
            Self::Output { .. } => "IoError",
        }
    }

    /// The source line where the error occurred.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UndefinedVariable { line, .. }
            | Self::TypeMismatch { line, .. }
            | Self::ArityMismatch { line, .. }
            | Self::NotCallable { line, .. }
            | Self::StackOverflow { line, .. }
            | Self::Output { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = self.kind();
        match self {
            Self::UndefinedVariable { name, line } => {
                write!(f, "{kind}: Undefined variable '{name}' (line {line})")
            },
            Self::TypeMismatch { details, line } => write!(f, "{kind}: {details} (line {line})"),
            Self::ArityMismatch { expected,
                                  found,
                                  line, } => write!(f,
                                                    "{kind}: Expected {expected} argument(s) but got {found} (line {line})"),
            Self::NotCallable { found, line } => {
                write!(f, "{kind}: Can only call functions, found {found} (line {line})")
            },
            Self::StackOverflow { depth, line } => write!(f,
                                                          "{kind}: Maximum call depth of {depth} exceeded (line {line})"),
            Self::Output { details, line } => {
                write!(f, "{kind}: Failed to write output: {details} (line {line})")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
