use std::rc::Rc;

use crate::{
    ast::LiteralValue,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::function::{Closure, NativeFunction},
    },
};

/// Represents a runtime value in the interpreter.
///
/// This enum models all the possible types that can appear in expressions,
/// assignments, function returns, and conditional evaluations. Cloning a
/// value is cheap: strings and functions are shared behind an `Rc`.
#[derive(Debug, Clone)]
pub enum Value {
    /// A numeric value (double precision floating-point).
    Number(f64),
    /// An immutable string.
    String(Rc<str>),
    /// A boolean value (`true` or `false`).
    /// Produced by comparison operators (`<`, `==`, `!=`, etc.) or logical
    /// operations (`!`, `&&`, `||`). Conditions of `if`, `while` and `?:` must
    /// evaluate to `Bool`; there is no truthiness.
    Bool(bool),
    /// The absence of a value. Produced by `nil`, a `let` without an
    /// initializer, and functions that finish without `return`.
    Nil,
    /// A user-defined function together with the environment it closes over.
    Function(Rc<Closure>),
    /// A built-in function implemented in Rust.
    Native(NativeFunction),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v.into())
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Number(n) => Self::Number(*n),
            LiteralValue::String(s) => Self::String(Rc::clone(s)),
            LiteralValue::Bool(b) => Self::Bool(*b),
            LiteralValue::Nil => Self::Nil,
        }
    }
}

impl Value {
    /// The name of the value's kind, as used in error messages.
    ///
    /// # Example
    /// ```
    /// use flax::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Number(1.0).type_name(), "number");
    /// assert_eq!(Value::Nil.type_name(), "nil");
    /// ```
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Nil => "nil",
            Self::Function(_) => "function",
            Self::Native(_) => "native function",
        }
    }

    /// Extracts the number, or fails with a `TypeMismatch`.
    ///
    /// # Parameters
    /// - `context`: What needed the number, e.g. `"operand of '-'"`.
    /// - `line`: Source code line number for error reporting.
    ///
    /// # Returns
    /// - `Ok(f64)`: If the value is a number.
    /// - `Err(RuntimeError::TypeMismatch)`: Otherwise.
    pub fn as_number(&self, context: &str, line: usize) -> EvalResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            other => Err(other.mismatch("number", context, line)),
        }
    }

    /// Extracts the boolean, or fails with a `TypeMismatch`.
    ///
    /// Used for conditions and logical operators, which never coerce.
    ///
    /// # Parameters
    /// - `context`: What needed the boolean, e.g. `"if condition"`.
    /// - `line`: Source code line number for error reporting.
    ///
    /// # Returns
    /// - `Ok(bool)`: The boolean value.
    /// - `Err(RuntimeError::TypeMismatch)`: If not boolean.
    ///
    /// # Example
    /// ```
    /// use flax::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Bool(true).as_bool("condition", 1), Ok(true));
    /// assert!(Value::Number(1.0).as_bool("condition", 1).is_err());
    /// ```
    pub fn as_bool(&self, context: &str, line: usize) -> EvalResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(other.mismatch("bool", context, line)),
        }
    }

    fn mismatch(&self, expected: &str, context: &str, line: usize) -> RuntimeError {
        RuntimeError::TypeMismatch { details: format!("Expected {expected} for {context}, found {}",
                                                      self.type_name()),
                                     line }
    }

    /// Returns `true` if the value can be called.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Function(..) | Self::Native(..))
    }
}

/// Equality as seen by `==` and `!=`.
///
/// Numbers compare by value (so `NaN != NaN`), strings by content and
/// functions by identity. Values of different kinds are never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Nil, Self::Nil) => true,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => a == b,
            _ => false,
        }
    }
}

/// The canonical text of a value, used by `println` and `++`.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Nil => write!(f, "nil"),
            Self::Function(closure) => write!(f, "<func {}>", closure.decl.name),
            Self::Native(native) => write!(f, "<native {}>", native.name),
        }
    }
}
