//! Host stack growth for deeply nested programs.
//!
//! Parsing, evaluation and execution recurse once per level of nesting in the
//! source, and function calls once per call. Each recursive entry point runs
//! through [`ensure_sufficient_stack`], so nesting is bounded by memory and by
//! [`Config::max_call_depth`](crate::interpreter::Config) rather than by the
//! size of the thread's stack.

/// Remaining stack below which work moves to a freshly allocated segment.
const RED_ZONE: usize = 100 * 1024;

/// Size of each additional stack segment.
const STACK_GROWTH: usize = 1024 * 1024;

/// Runs `f`, first switching to a new stack segment if less than the red zone
/// remains on the current one.
///
/// # Example
/// ```
/// use flax::interpreter::stack::ensure_sufficient_stack;
///
/// fn depth(n: u32) -> u32 {
///     ensure_sufficient_stack(|| if n == 0 { 0 } else { 1 + depth(n - 1) })
/// }
///
/// assert_eq!(depth(100_000), 100_000);
/// ```
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_GROWTH, f)
}
