use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::{
            binary::core::operand_mismatch,
            core::{Context, EvalResult},
        },
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a comparison between two values.
    ///
    /// `==` and `!=` accept any two values and never fail; see the
    /// `PartialEq` implementation of [`Value`] for the rules. The ordering
    /// operators `<`, `<=`, `>` and `>=` require two numbers.
    ///
    /// # Parameters
    /// - `op`: The comparison operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// A `Value::Bool` with the result.
    ///
    /// # Example
    /// ```
    /// use flax::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let lt = Context::eval_comparison(BinaryOperator::Less,
    ///                                   &Value::Number(1.0),
    ///                                   &Value::Number(2.0),
    ///                                   1);
    /// assert_eq!(lt.unwrap(), Value::Bool(true));
    ///
    /// let eq = Context::eval_comparison(BinaryOperator::Equal, &Value::Nil, &Value::Bool(false), 1);
    /// assert_eq!(eq.unwrap(), Value::Bool(false));
    ///
    /// let mixed = Context::eval_comparison(BinaryOperator::Less,
    ///                                      &Value::Number(1.0),
    ///                                      &Value::from("2"),
    ///                                      1);
    /// assert!(mixed.is_err());
    /// ```
    pub fn eval_comparison(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        use BinaryOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

        if op == Equal {
            return Ok(Value::Bool(left == right));
        }
        if op == NotEqual {
            return Ok(Value::Bool(left != right));
        }

        let (Value::Number(a), Value::Number(b)) = (left, right) else {
            return Err(operand_mismatch(op, left, right, line));
        };

        let result = match op {
            Less => a < b,
            Greater => a > b,
            LessEqual => a <= b,
            GreaterEqual => a >= b,
            _ => return Err(operand_mismatch(op, left, right, line)),
        };
        Ok(Value::Bool(result))
    }
}
