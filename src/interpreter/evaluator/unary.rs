use crate::{
    ast::UnaryOperator,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: numeric negation; the operand must be a number.
    /// - `Not`: boolean negation; the operand must be a boolean.
    ///
    /// # Parameters
    /// - `op`: Unary operator.
    /// - `value`: Input value.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// The computed `Value`, or `RuntimeError::TypeMismatch` for an operand of
    /// the wrong kind.
    ///
    /// # Example
    /// ```
    /// use flax::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let v = Context::eval_unary(UnaryOperator::Negate, &Value::Number(5.0), 1).unwrap();
    /// assert_eq!(v, Value::Number(-5.0));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Not, &Value::Bool(false), 1).unwrap();
    /// assert_eq!(v, Value::Bool(true));
    ///
    /// assert!(Context::eval_unary(UnaryOperator::Not, &Value::Nil, 1).is_err());
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::Negate => Ok(Value::Number(-value.as_number("operand of '-'", line)?)),
            UnaryOperator::Not => Ok(Value::Bool(!value.as_bool("operand of '!'", line)?)),
        }
    }
}
