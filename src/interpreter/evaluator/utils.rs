use std::{cell::RefCell, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::environment::Environment,
    },
};

impl Context {
    /// Runs `f` with `env` as the current environment.
    ///
    /// The previous environment waits on the frame stack, where reclamation
    /// can see it, and is restored afterwards whether `f` succeeds or fails.
    ///
    /// # Parameters
    /// - `env`: The environment to make current.
    /// - `f`: The work to run inside it.
    ///
    /// # Returns
    /// Whatever `f` returns.
    pub(crate) fn in_scope<T>(&mut self,
                              env: Rc<RefCell<Environment>>,
                              f: impl FnOnce(&mut Self) -> EvalResult<T>)
                              -> EvalResult<T> {
        let previous = std::mem::replace(&mut self.env, env);
        self.frames.push(previous);
        let result = f(self);
        if let Some(previous) = self.frames.pop() {
            self.env = previous;
        }
        result
    }

    /// Creates and registers an empty environment nested in `enclosing`.
    pub(crate) fn new_environment(&mut self,
                                  enclosing: Rc<RefCell<Environment>>)
                                  -> Rc<RefCell<Environment>> {
        let env = Rc::new(RefCell::new(Environment::with_enclosing(enclosing)));
        self.registry.register(&env);
        env
    }
}

/// Ensures that a call passes exactly the expected number of arguments.
///
/// # Parameters
/// - `expected`: The number of declared parameters.
/// - `found`: The number of arguments supplied.
/// - `line`: Line number for error reporting.
///
/// # Returns
/// `Ok(())` if the counts match, or `RuntimeError::ArityMismatch`.
///
/// # Example
/// ```
/// use flax::{error::RuntimeError, interpreter::evaluator::utils::check_arity};
///
/// assert!(check_arity(2, 2, 1).is_ok());
/// assert_eq!(check_arity(2, 1, 7),
///            Err(RuntimeError::ArityMismatch { expected: 2,
///                                              found:    1,
///                                              line:     7, }));
/// ```
pub const fn check_arity(expected: usize, found: usize, line: usize) -> EvalResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(RuntimeError::ArityMismatch { expected,
                                          found,
                                          line })
    }
}
