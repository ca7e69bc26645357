use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::{Rc, Weak},
};

use tracing::debug;

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// A single lexical scope.
///
/// Holds the bindings declared directly in the scope and a link to the
/// enclosing one. Lookups and assignments that miss here continue outward
/// until the global environment, which has no enclosing scope.
#[derive(Default)]
pub struct Environment {
    values:    HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Self>>>,
}

impl Environment {
    /// Creates an empty top-level environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty environment nested inside `enclosing`.
    #[must_use]
    pub fn with_enclosing(enclosing: Rc<RefCell<Self>>) -> Self {
        Self { values:    HashMap::new(),
               enclosing: Some(enclosing), }
    }

    /// Binds `name` in this scope, replacing any existing binding of the same
    /// name here and shadowing bindings in enclosing scopes.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Looks `name` up, innermost scope first.
    ///
    /// # Returns
    /// The bound value, or `None` if no scope on the chain binds it.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            return Some(value.clone());
        }
        let mut next = self.enclosing.clone();
        while let Some(scope) = next {
            let scope = scope.borrow();
            if let Some(value) = scope.values.get(name) {
                return Some(value.clone());
            }
            next = scope.enclosing.clone();
        }
        None
    }

    /// Looks `name` up like [`lookup`](Self::lookup), failing if it is not
    /// bound.
    ///
    /// # Errors
    /// `RuntimeError::UndefinedVariable` if no scope on the chain binds it.
    ///
    /// # Example
    /// ```
    /// use std::{cell::RefCell, rc::Rc};
    ///
    /// use flax::interpreter::value::{core::Value, environment::Environment};
    ///
    /// let globals = Rc::new(RefCell::new(Environment::new()));
    /// globals.borrow_mut().define("x", Value::Number(1.0));
    ///
    /// let inner = Environment::with_enclosing(Rc::clone(&globals));
    /// assert_eq!(inner.get("x", 1), Ok(Value::Number(1.0)));
    /// assert!(inner.get("y", 1).is_err());
    /// ```
    pub fn get(&self, name: &str, line: usize) -> EvalResult<Value> {
        self.lookup(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.to_string(),
                                                             line })
    }

    /// Replaces the value of the nearest existing binding of `name`.
    ///
    /// # Errors
    /// `RuntimeError::UndefinedVariable` if no scope on the chain binds it;
    /// assignment never creates a binding.
    pub fn assign(&mut self, name: &str, value: Value, line: usize) -> EvalResult<()> {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        let mut next = self.enclosing.clone();
        while let Some(scope) = next {
            let mut scope = scope.borrow_mut();
            if let Some(slot) = scope.values.get_mut(name) {
                *slot = value;
                return Ok(());
            }
            next = scope.enclosing.clone();
        }
        Err(RuntimeError::UndefinedVariable { name: name.to_string(),
                                              line })
    }

    /// The scope this one is nested in, if any.
    #[must_use]
    pub const fn enclosing(&self) -> Option<&Rc<RefCell<Self>>> {
        self.enclosing.as_ref()
    }

    /// The number of bindings declared directly in this scope.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if this scope declares no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Environments directly referenced from this one: the enclosing scope and
    /// the captured scopes of every closure bound here.
    fn referenced(&self) -> impl Iterator<Item = Rc<RefCell<Self>>> + '_ {
        let captured = self.values.values().filter_map(|value| match value {
                                               Value::Function(closure) => Some(Rc::clone(&closure.env)),
                                               _ => None,
                                           });
        self.enclosing.iter().cloned().chain(captured)
    }
}

// A long chain of scopes freed at once would otherwise recurse per scope.
impl Drop for Environment {
    fn drop(&mut self) {
        let mut next = self.enclosing.take();
        while let Some(scope) = next {
            next = match Rc::try_unwrap(scope) {
                Ok(cell) => {
                    let mut env = cell.into_inner();
                    env.enclosing.take()
                },
                Err(_) => None,
            };
        }
    }
}

// Bindings can hold closures that capture this environment.
impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.values.keys().collect();
        names.sort();
        f.debug_struct("Environment")
         .field("names", &names)
         .field("nested", &self.enclosing.is_some())
         .finish()
    }
}

/// Smallest number of tracked environments before pruning or collecting.
const INITIAL_THRESHOLD: usize = 1024;

/// Tracks every environment created during a run so that reference cycles
/// between environments and closures can be broken.
///
/// A closure stored in the scope it captures keeps that scope alive through
/// its own `Rc`, so reference counting alone never frees it. The registry
/// holds only weak references; [`collect`](Self::collect) marks everything
/// reachable from the roots and empties the rest, which drops the closures and
/// lets the counts reach zero.
pub struct EnvironmentRegistry {
    entries:    Vec<Weak<RefCell<Environment>>>,
    prune_at:   usize,
    collect_at: usize,
}

impl Default for EnvironmentRegistry {
    fn default() -> Self {
        Self { entries:    Vec::new(),
               prune_at:   INITIAL_THRESHOLD,
               collect_at: INITIAL_THRESHOLD, }
    }
}

impl EnvironmentRegistry {
    /// Starts tracking `env`.
    ///
    /// Entries whose environment has already been freed are dropped from time
    /// to time, so the registry stays proportional to the live environments.
    pub fn register(&mut self, env: &Rc<RefCell<Environment>>) {
        if self.entries.len() >= self.prune_at {
            self.prune();
            self.prune_at = INITIAL_THRESHOLD.max(self.entries.len() * 2);
        }
        self.entries.push(Rc::downgrade(env));
    }

    /// Returns `true` once enough environments have been created since the
    /// last collection to make another one worthwhile.
    #[must_use]
    pub fn needs_collection(&self) -> bool {
        self.entries.len() >= self.collect_at
    }

    /// The number of environments still alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }

    /// Empties every tracked environment not reachable from `roots`.
    ///
    /// Reachability follows enclosing links and the environments captured by
    /// closures. Every environment the caller may still use has to be
    /// reachable from `roots`; anything else is emptied.
    ///
    /// # Returns
    /// The number of environments that were emptied.
    pub fn collect(&mut self, roots: &[Rc<RefCell<Environment>>]) -> usize {
        self.prune();

        let mut marked: HashSet<*const RefCell<Environment>> = HashSet::new();
        let mut pending: Vec<Rc<RefCell<Environment>>> = roots.to_vec();
        while let Some(env) = pending.pop() {
            if !marked.insert(Rc::as_ptr(&env)) {
                continue;
            }
            pending.extend(env.borrow().referenced());
        }

        let mut cleared = 0;
        for entry in &self.entries {
            let Some(env) = entry.upgrade() else {
                continue;
            };
            if marked.contains(&Rc::as_ptr(&env)) {
                continue;
            }
            // Take the contents out first; dropping them can free other
            // environments and must not happen under this borrow.
            let (values, enclosing) = {
                let mut env = env.borrow_mut();
                (std::mem::take(&mut env.values), env.enclosing.take())
            };
            drop(values);
            drop(enclosing);
            cleared += 1;
        }

        self.prune();
        self.collect_at = INITIAL_THRESHOLD.max(self.entries.len() * 2);
        debug!(cleared, live = self.entries.len(), "collected environments");
        cleared
    }

    fn prune(&mut self) {
        self.entries.retain(|entry| entry.strong_count() > 0);
    }
}
