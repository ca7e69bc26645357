use crate::{
    ast::{Expr, LogicalOperator},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates `&&` or `||` with short-circuiting.
    ///
    /// The left operand is always evaluated and must be a boolean. The right
    /// operand is evaluated only when the left one does not decide the result
    /// (`true` for `&&`, `false` for `||`), and must then be a boolean too.
    ///
    /// # Parameters
    /// - `left`: Left operand expression.
    /// - `op`: The logical operator.
    /// - `right`: Right operand expression.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// A `Value::Bool` with the result.
    pub fn eval_logical(&mut self,
                        left: &Expr,
                        op: LogicalOperator,
                        right: &Expr,
                        line: usize)
                        -> EvalResult<Value> {
        let left = self.eval(left)?
                       .as_bool(&format!("left operand of '{op}'"), line)?;

        match (op, left) {
            (LogicalOperator::And, false) => Ok(Value::Bool(false)),
            (LogicalOperator::Or, true) => Ok(Value::Bool(true)),
            _ => {
                let right = self.eval(right)?
                                .as_bool(&format!("right operand of '{op}'"), line)?;
                Ok(Value::Bool(right))
            },
        }
    }
}
