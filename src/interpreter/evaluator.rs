/// Binary operator evaluation logic.
///
/// Handles the execution of all binary operations in expressions, including
/// arithmetic, comparisons, concatenation and the short-circuit operators.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation and logical NOT.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the main evaluation engine, the runtime context, run
/// configuration and the control-flow signal returned by statements.
pub mod core;

/// Evaluation of `while` loops.
pub mod while_loop;

/// Utility functions for evaluation.
///
/// Provides scope switching, environment creation and arity checks shared by
/// the evaluator and the built-ins.
pub mod utils;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls, argument checking, the
/// call depth limit and return value computation.
pub mod function;
