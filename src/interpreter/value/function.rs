use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::FunctionDecl,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{core::Value, environment::Environment},
    },
};

/// A user-defined function value.
///
/// The declaration is shared with the syntax tree. The environment is the one
/// that was current when `func` ran, so the body sees the bindings of its
/// defining scope for as long as the closure lives.
pub struct Closure {
    /// The declaration this closure was created from.
    pub decl: Rc<FunctionDecl>,
    /// The captured defining environment.
    pub env:  Rc<RefCell<Environment>>,
}

impl Closure {
    /// Creates a closure over `env`.
    #[must_use]
    pub const fn new(decl: Rc<FunctionDecl>, env: Rc<RefCell<Environment>>) -> Self {
        Self { decl, env }
    }

    /// The number of declared parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }
}

// Captured environments can contain the closure itself.
impl std::fmt::Debug for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Closure")
         .field("name", &self.decl.name)
         .field("params", &self.decl.params)
         .finish_non_exhaustive()
    }
}

/// Signature shared by all built-in functions.
///
/// Receives the evaluation context, the already evaluated arguments and the
/// line of the call expression.
pub type NativeFn = fn(&mut Context, &[Value], usize) -> EvalResult<Value>;

/// A built-in function bound in the global environment.
#[derive(Debug, Clone, Copy)]
pub struct NativeFunction {
    /// The name the function is bound to.
    pub name:  &'static str,
    /// The exact number of arguments it accepts.
    pub arity: usize,
    /// The implementation.
    pub func:  NativeFn,
}

/// Built-ins are bound once under a unique name, so the name identifies them.
impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arity == other.arity
    }
}
