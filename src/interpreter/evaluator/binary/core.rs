use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a strict binary operation between two values.
    ///
    /// This function routes the operation to specialized handlers depending on
    /// the operator. Arithmetic requires two numbers. Relational operators use
    /// `eval_comparison`, which also implements the total `==` and `!=`.
    /// Concatenation joins the canonical text of both operands and accepts
    /// values of any kind.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the evaluated result.
    ///
    /// # Example
    /// ```
    /// use flax::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let sum = Context::eval_binary(BinaryOperator::Add,
    ///                                &Value::Number(3.0),
    ///                                &Value::Number(4.0),
    ///                                1);
    /// assert_eq!(sum.unwrap(), Value::Number(7.0));
    ///
    /// let text = Context::eval_binary(BinaryOperator::Concat,
    ///                                 &Value::Number(1.0),
    ///                                 &Value::from("s"),
    ///                                 1);
    /// assert_eq!(text.unwrap(), Value::from("1s"));
    /// ```
    pub fn eval_binary(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, Concat, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Sub,
        };

        match op {
            Add | Sub | Mul | Div => Self::eval_arithmetic(op, left, right, line),
            Less | Greater | LessEqual | GreaterEqual | Equal | NotEqual => {
                Self::eval_comparison(op, left, right, line)
            },
            Concat => Ok(Value::from(format!("{left}{right}"))),
        }
    }

    /// Applies `+`, `-`, `*` or `/` to two numbers.
    ///
    /// Division follows IEEE 754, so dividing by zero yields an infinity or
    /// `NaN` rather than an error.
    pub(crate) fn eval_arithmetic(op: BinaryOperator,
                                  left: &Value,
                                  right: &Value,
                                  line: usize)
                                  -> EvalResult<Value> {
        let (Value::Number(a), Value::Number(b)) = (left, right) else {
            return Err(operand_mismatch(op, left, right, line));
        };

        let result = match op {
            BinaryOperator::Add => a + b,
            BinaryOperator::Sub => a - b,
            BinaryOperator::Mul => a * b,
            BinaryOperator::Div => a / b,
            _ => return Err(operand_mismatch(op, left, right, line)),
        };
        Ok(Value::Number(result))
    }
}

/// Builds the `TypeMismatch` reported when an operator requires two numbers.
pub(crate) fn operand_mismatch(op: BinaryOperator,
                               left: &Value,
                               right: &Value,
                               line: usize)
                               -> RuntimeError {
    RuntimeError::TypeMismatch { details: format!("Operands of '{op}' must be numbers, found {} and {}",
                                                  left.type_name(),
                                                  right.type_name()),
                                 line }
}
