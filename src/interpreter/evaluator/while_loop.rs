use std::rc::Rc;

use crate::{
    ast::{Expr, Statement},
    interpreter::evaluator::core::{Context, EvalResult, Flow},
};

impl Context {
    /// Executes a `while` loop.
    ///
    /// The condition is evaluated before every iteration and must be a
    /// boolean. Each iteration runs the body in a fresh scope, so a `let` in
    /// the body starts over on every pass. A `return` inside the body ends
    /// the loop and is passed on to the caller.
    ///
    /// # Parameters
    /// - `condition`: Loop condition.
    /// - `body`: Statements of the loop body.
    /// - `line`: Line number for error reporting.
    ///
    /// # Example
    /// ```
    /// use flax::interpreter::{
    ///     evaluator::core::{Config, Context},
    ///     lexer::tokenize,
    ///     parser::core::parse_program,
    ///     value::core::Value,
    /// };
    ///
    /// let tokens = tokenize("let n = 0; while n < 5 { n += 1; }").unwrap();
    /// let program = parse_program(&tokens).unwrap();
    ///
    /// let mut ctx = Context::with_output(Config::default(), Box::new(std::io::sink()));
    /// ctx.run(&program).unwrap();
    ///
    /// assert_eq!(ctx.lookup("n"), Some(Value::Number(5.0)));
    /// ```
    pub fn exec_while(&mut self,
                      condition: &Expr,
                      body: &[Statement],
                      line: usize)
                      -> EvalResult<Flow> {
        while self.eval(condition)?.as_bool("while condition", line)? {
            let env = self.new_environment(Rc::clone(&self.env));
            if let Flow::Return(value) = self.exec_block(body, env)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }
}
