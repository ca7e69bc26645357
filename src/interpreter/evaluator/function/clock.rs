use crate::interpreter::{
    evaluator::{
        core::{Context, EvalResult},
        utils::check_arity,
    },
    value::core::Value,
};

/// Returns the number of seconds since the context was created.
///
/// The value comes from a monotonic clock, so successive calls never
/// decrease.
///
/// # Parameters
/// - `ctx`: The evaluation context whose start time is used.
/// - `args`: Must be empty.
/// - `line`: Line number for error reporting.
///
/// # Returns
/// `Value::Number` with fractional seconds.
///
/// # Example
/// ```
/// use flax::interpreter::{
///     evaluator::{core::Context, function::clock::clock},
///     value::core::Value,
/// };
///
/// let mut ctx = Context::new();
/// let Value::Number(first) = clock(&mut ctx, &[], 1).unwrap() else { panic!() };
/// let Value::Number(second) = clock(&mut ctx, &[], 1).unwrap() else { panic!() };
///
/// assert!(first >= 0.0);
/// assert!(second >= first);
/// ```
pub fn clock(ctx: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    check_arity(0, args.len(), line)?;

    Ok(Value::Number(ctx.started.elapsed().as_secs_f64()))
}
