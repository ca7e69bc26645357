use std::{cell::RefCell, io::Write, rc::Rc, time::Instant};

use tracing::{debug, info};

use crate::{
    ast::{Expr, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::function::core::NATIVE_TABLE,
        value::{
            core::Value,
            environment::{Environment, EnvironmentRegistry},
            function::Closure,
        },
        stack::ensure_sufficient_stack,
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Default limit on nested user function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Settings that shape a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// The deepest allowed nesting of user function calls. A call that would
    /// go beyond it fails with `RuntimeError::StackOverflow`.
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_call_depth: DEFAULT_MAX_CALL_DEPTH }
    }
}

/// How a statement finished.
///
/// `return` unwinds through enclosing blocks and loops as a `Flow::Return`
/// until the function call that owns it turns it back into a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Execution continues with the next statement.
    Normal,
    /// A `return` was executed with this value.
    Return(Value),
}

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the global environment, the
/// environment of the code currently running, the output sink used by
/// `println`, and the bookkeeping for call depth and environment reclamation.
///
/// Everything the evaluator still needs while a nested statement runs is
/// reachable from the context itself: the environments of suspended scopes
/// are kept in `frames` and partly evaluated operands in `operands`. That is
/// what allows reclamation at any statement boundary.
///
/// ## Usage
///
/// A `Context` is created once per program. Built-in functions are bound in
/// its global environment on creation. [`run`](Self::run) executes top-level
/// statements; [`eval`](Self::eval) and [`exec`](Self::exec) evaluate single
/// nodes against the current environment.
pub struct Context {
    pub(crate) env:      Rc<RefCell<Environment>>,
    globals:             Rc<RefCell<Environment>>,
    pub(crate) frames:   Vec<Rc<RefCell<Environment>>>,
    pub(crate) operands: Vec<Value>,
    pub(crate) registry: EnvironmentRegistry,
    pub(crate) out:      Box<dyn Write>,
    pub(crate) started:  Instant,
    pub(crate) depth:    usize,
    pub(crate) config:   Config,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Creates a context with the default configuration that prints to
    /// standard output.
    #[must_use]
    pub fn new() -> Self {
        Self::with_output(Config::default(), Box::new(std::io::stdout()))
    }

    /// Creates a context that writes `println` output to `out`.
    ///
    /// # Example
    /// ```
    /// use flax::interpreter::{
    ///     evaluator::core::{Config, Context},
    ///     value::core::Value,
    /// };
    ///
    /// let ctx = Context::with_output(Config::default(), Box::new(std::io::sink()));
    ///
    /// assert!(ctx.lookup("println").unwrap().is_callable());
    /// assert!(ctx.lookup("clock").unwrap().is_callable());
    /// ```
    #[must_use]
    pub fn with_output(config: Config, out: Box<dyn Write>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::new()));
        let mut registry = EnvironmentRegistry::default();
        registry.register(&globals);

        for native in NATIVE_TABLE {
            globals.borrow_mut()
                   .define(native.name, Value::Native(*native));
        }

        Self { env: Rc::clone(&globals),
               globals,
               frames: Vec::new(),
               operands: Vec::new(),
               registry,
               out,
               started: Instant::now(),
               depth: 0,
               config }
    }

    /// Executes a program's top-level statements in order.
    ///
    /// After each statement, here and in every nested block, environments
    /// made unreachable by closure cycles are reclaimed once enough of them
    /// have accumulated. A top-level `return` ends the program early.
    ///
    /// # Errors
    /// The first `RuntimeError` raised; statements after it do not run.
    pub fn run(&mut self, program: &[Statement]) -> EvalResult<()> {
        info!(statements = program.len(), "running program");
        let mut last_line = 0;

        for statement in program {
            last_line = statement.line_number();
            if let Flow::Return(_) = self.exec(statement)? {
                debug!(line = last_line, "top-level return");
                break;
            }
            self.safe_point();
        }

        self.out
            .flush()
            .map_err(|err| RuntimeError::Output { details: err.to_string(),
                                                  line:    last_line, })?;
        info!(elapsed = ?self.started.elapsed(), "program finished");
        Ok(())
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation.
    /// The evaluator dispatches based on expression variant: literals,
    /// variables, assignment, unary and binary operations, the short-circuit
    /// operators, conditionals and calls.
    ///
    /// # Example
    /// ```
    /// use flax::{
    ///     ast::{BinaryOperator, Expr},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let mut ctx = Context::new();
    /// let expr = Expr::BinaryOp { left:  Box::new(Expr::Literal { value: 2.0.into(),
    ///                                                             line:  1, }),
    ///                             op:    BinaryOperator::Mul,
    ///                             right: Box::new(Expr::Literal { value: 21.0.into(),
    ///                                                             line:  1, }),
    ///                             line:  1, };
    ///
    /// assert_eq!(ctx.eval(&expr), Ok(Value::Number(42.0)));
    /// ```
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        ensure_sufficient_stack(|| self.eval_expr(expr))
    }

    fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Variable { name, line } => self.env.borrow().get(name, *line),
            Expr::Assign { name, value, line } => {
                let value = self.eval(value)?;
                self.env
                    .borrow_mut()
                    .assign(name, value.clone(), *line)?;
                Ok(value)
            },
            Expr::UnaryOp { op, expr, line } => {
                let value = self.eval(expr)?;
                Self::eval_unary(*op, &value, *line)
            },
            Expr::BinaryOp { left,
                             op,
                             right,
                             line, } => {
                let left = self.eval(left)?;
                let right = self.holding(&left, |ctx| ctx.eval(right))?;
                Self::eval_binary(*op, &left, &right, *line)
            },
            Expr::Logical { left,
                            op,
                            right,
                            line, } => self.eval_logical(left, *op, right, *line),
            Expr::Conditional { condition,
                                then_expr,
                                else_expr,
                                line, } => {
                if self.eval(condition)?
                       .as_bool("conditional expression", *line)?
                {
                    self.eval(then_expr)
                } else {
                    self.eval(else_expr)
                }
            },
            Expr::Call { callee,
                         arguments,
                         line, } => self.eval_call(callee, arguments, *line),
        }
    }

    /// Executes a single statement.
    ///
    /// # Returns
    /// `Flow::Return` if a `return` ran inside the statement, otherwise
    /// `Flow::Normal`.
    pub fn exec(&mut self, statement: &Statement) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| self.exec_statement(statement))
    }

    fn exec_statement(&mut self, statement: &Statement) -> EvalResult<Flow> {
        match statement {
            Statement::Function(decl) => {
                debug!(name = %decl.name, line = decl.line, "declared function");
                let closure = Closure::new(Rc::clone(decl), Rc::clone(&self.env));
                self.env
                    .borrow_mut()
                    .define(&decl.name, Value::Function(Rc::new(closure)));
                Ok(Flow::Normal)
            },
            Statement::VariableDeclaration { name, initializer, .. } => {
                let value = match initializer {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Nil,
                };
                self.env.borrow_mut().define(name, value);
                Ok(Flow::Normal)
            },
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            line, } => {
                if self.eval(condition)?.as_bool("if condition", *line)? {
                    self.exec_scoped(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_scoped(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            },
            Statement::While { condition,
                               body,
                               line, } => self.exec_while(condition, body, *line),
            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            },
            Statement::Expression { expr, .. } => {
                self.eval(expr)?;
                Ok(Flow::Normal)
            },
            Statement::Block { statements, .. } => self.exec_scoped(statements),
        }
    }

    /// Executes `statements` in order inside `env`, stopping at the first
    /// `return`.
    pub(crate) fn exec_block(&mut self,
                             statements: &[Statement],
                             env: Rc<RefCell<Environment>>)
                             -> EvalResult<Flow> {
        self.in_scope(env, |ctx| {
                for statement in statements {
                    if let Flow::Return(value) = ctx.exec(statement)? {
                        return Ok(Flow::Return(value));
                    }
                    ctx.safe_point();
                }
                Ok(Flow::Normal)
            })
    }

    /// Runs `f` while keeping `value` reachable for reclamation.
    ///
    /// A value returned by one call, such as a closure over the scope of that
    /// call, may have nothing else referring to it while the next operand
    /// runs.
    pub(crate) fn holding<T>(&mut self, value: &Value, f: impl FnOnce(&mut Self) -> T) -> T {
        self.operands.push(value.clone());
        let result = f(self);
        self.operands.pop();
        result
    }

    /// Evaluates call arguments left to right, each one held until the last
    /// has been evaluated.
    pub(crate) fn eval_arguments(&mut self, arguments: &[Expr]) -> EvalResult<Vec<Value>> {
        let mark = self.operands.len();
        let evaluated = self.push_operands(arguments);
        let values = self.operands.split_off(mark);
        evaluated.map(|()| values)
    }

    fn push_operands(&mut self, exprs: &[Expr]) -> EvalResult<()> {
        for expr in exprs {
            let value = self.eval(expr)?;
            self.operands.push(value);
        }
        Ok(())
    }

    /// Executes `statements` in a fresh scope nested in the current one.
    fn exec_scoped(&mut self, statements: &[Statement]) -> EvalResult<Flow> {
        let env = self.new_environment(Rc::clone(&self.env));
        self.exec_block(statements, env)
    }

    /// Looks a name up in the current environment.
    ///
    /// # Returns
    /// The bound value, or `None` if nothing on the scope chain binds it.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.env.borrow().lookup(name)
    }

    /// The global environment.
    #[must_use]
    pub const fn globals(&self) -> &Rc<RefCell<Environment>> {
        &self.globals
    }

    /// Reclaims environments kept alive only by reference cycles.
    ///
    /// Safe whenever a statement has just finished, even inside a call: the
    /// scopes and operands the evaluator is still holding are all reachable
    /// from the context. [`run`](Self::run) collects automatically once
    /// enough environments have been created.
    ///
    /// # Returns
    /// The number of environments that were emptied.
    pub fn collect_garbage(&mut self) -> usize {
        let mut roots = vec![Rc::clone(&self.globals), Rc::clone(&self.env)];
        roots.extend(self.frames.iter().cloned());
        for value in &self.operands {
            if let Value::Function(closure) = value {
                roots.push(Rc::clone(&closure.env));
            }
        }
        self.registry.collect(&roots)
    }

    fn safe_point(&mut self) {
        if self.registry.needs_collection() {
            self.collect_garbage();
        }
    }

    /// The number of environments currently alive, the global one included.
    #[must_use]
    pub fn live_environments(&self) -> usize {
        self.registry.live_count()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        let _ = self.out.flush();
        let cleared = self.registry.collect(&[]);
        debug!(cleared, "released environments");
    }
}
