use std::rc::Rc;

use tracing::debug;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Flow},
            function::{clock, println},
            utils::check_arity,
        },
        value::{
            core::Value,
            function::{Closure, NativeFunction},
        },
        stack::ensure_sufficient_stack,
    },
};

/// Defines native functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - the exact number of arguments,
/// - a function pointer implementing the native.
///
/// The macro produces:
/// - `NATIVE_TABLE` (the values bound in every new global environment),
/// - `NATIVE_FUNCTIONS` (public list of native names).
macro_rules! native_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        pub(crate) static NATIVE_TABLE: &[NativeFunction] = &[
            $(
                NativeFunction { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of the functions bound in the global environment at startup.
        pub const NATIVE_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

native_functions! {
    "clock"   => { arity: 0, func: clock::clock },
    "println" => { arity: 1, func: println::println },
}

impl Context {
    /// Evaluates a call expression.
    ///
    /// The callee is evaluated first, then each argument from left to right.
    /// The call itself is made by [`call_value`](Self::call_value).
    ///
    /// # Parameters
    /// - `callee`: Expression producing the function.
    /// - `arguments`: Argument expressions.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// The value produced by the call.
    pub(crate) fn eval_call(&mut self,
                            callee: &Expr,
                            arguments: &[Expr],
                            line: usize)
                            -> EvalResult<Value> {
        let callee = self.eval(callee)?;
        let args = self.holding(&callee, |ctx| ctx.eval_arguments(arguments))?;

        self.call_value(&callee, &args, line)
    }

    /// Calls a function value with already evaluated arguments.
    ///
    /// Arity is checked before anything else runs.
    ///
    /// # Errors
    /// - `RuntimeError::NotCallable` if `callee` is not a function.
    /// - `RuntimeError::ArityMismatch` if the argument count is wrong.
    /// - `RuntimeError::StackOverflow` if the call would exceed the configured
    ///   depth.
    /// - Any error raised while running the body.
    ///
    /// # Example
    /// ```
    /// use flax::{
    ///     error::RuntimeError,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let mut ctx = Context::new();
    /// let clock = ctx.lookup("clock").unwrap();
    ///
    /// assert!(matches!(ctx.call_value(&clock, &[], 1), Ok(Value::Number(_))));
    /// assert!(matches!(ctx.call_value(&clock, &[Value::Nil], 1),
    ///                  Err(RuntimeError::ArityMismatch { expected: 0, found: 1, .. })));
    /// assert!(matches!(ctx.call_value(&Value::Nil, &[], 1),
    ///                  Err(RuntimeError::NotCallable { .. })));
    /// ```
    pub fn call_value(&mut self, callee: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
        match callee {
            Value::Function(closure) => self.call_closure(closure, args, line),
            Value::Native(native) => {
                check_arity(native.arity, args.len(), line)?;
                (native.func)(self, args, line)
            },
            other => Err(RuntimeError::NotCallable { found: other.type_name().to_string(),
                                                     line }),
        }
    }

    /// Executes a user-defined function.
    ///
    /// The body runs in a new environment enclosed by the environment the
    /// closure captured, not by the caller's. Parameters are bound there
    /// positionally. A body that finishes without `return` yields `nil`.
    fn call_closure(&mut self, closure: &Rc<Closure>, args: &[Value], line: usize) -> EvalResult<Value> {
        check_arity(closure.arity(), args.len(), line)?;

        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::StackOverflow { depth: self.config.max_call_depth,
                                                     line });
        }

        let env = self.new_environment(Rc::clone(&closure.env));
        {
            let mut env = env.borrow_mut();
            for (param, arg) in closure.decl.params.iter().zip(args) {
                env.define(param, arg.clone());
            }
        }

        debug!(name = %closure.decl.name, depth = self.depth + 1, line, "calling function");

        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.exec_block(&closure.decl.body, env));
        self.depth -= 1;

        match result? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }
}
