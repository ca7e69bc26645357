/// Core parsing entry points.
///
/// Contains the program and expression entry points together with the two
/// lowest precedence levels: assignment and the conditional operator.
pub mod core;

/// Unary, call and primary expression parsing.
///
/// Handles prefix operators, call suffixes and the atomic expressions at the
/// bottom of the precedence hierarchy.
pub mod unary;

/// Binary operator parsing.
///
/// One function per precedence level, from logical or down to
/// multiplication.
pub mod binary;

/// Block parsing.
///
/// Parses brace-delimited statement lists used by function bodies, control
/// flow and standalone blocks.
pub mod block;

/// Utility functions for the parser.
///
/// Provides token expectations, identifier parsing and comma-separated lists.
pub mod utils;

/// Statement parsing.
///
/// Implements declarations (`func`, `let`) and statements (`if`, `while`,
/// `return`, blocks and expression statements).
pub mod statement;
