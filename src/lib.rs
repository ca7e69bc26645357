//! # flax
//!
//! flax is a small dynamically typed scripting language written in Rust.
//! It has numbers, strings, booleans and `nil`, first-class functions with
//! lexical closures, `if`/`while` control flow and two built-ins, `clock()`
//! and `println(value)`.
//!
//! Source text goes through three phases: [`tokenize`] turns it into tokens,
//! [`parse`] builds the syntax tree, and a tree-walking
//! [`Context`](interpreter::Context) runs it. The first two phases finish
//! before any statement executes, so a malformed program produces no output.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::io::Write;

use tracing::info;

use crate::{
    ast::Statement,
    error::FlaxError,
    interpreter::{
        Config, Context,
        lexer::{self, Token},
        parser::core::parse_program,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums and related types
/// that represent the syntactic structure of source code as a tree. The AST is
/// built by the parser and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source lines to AST nodes for error reporting.
pub mod ast;
/// Provides unified error types for lexing, parsing and evaluation.
///
/// This module defines all errors that can be raised while running code. It
/// standardizes error reporting and carries detailed information about
/// failures, including error kinds, descriptions, and source lines.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Maps failures to process exit codes.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation and value
/// representations to provide a complete runtime for Flax programs.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;

/// Tokenizes source text.
///
/// # Errors
/// Returns `FlaxError::Lex` for the first lexical error.
///
/// # Example
/// ```
/// use flax::{interpreter::lexer::Token, tokenize};
///
/// let tokens = tokenize("println(\"hi\");").unwrap();
///
/// assert_eq!(tokens[0], (Token::Identifier("println".to_string()), 1));
/// assert_eq!(tokens.len(), 5);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, FlaxError> {
    Ok(lexer::tokenize(source)?)
}

/// Tokenizes and parses source text into a program.
///
/// # Errors
/// Returns `FlaxError::Lex` or `FlaxError::Parse` for the first error found.
///
/// # Example
/// ```
/// use flax::{ast::Statement, parse};
///
/// let program = parse("let x = 1; { x = 2; }").unwrap();
/// assert!(matches!(program[1], Statement::Block { .. }));
///
/// assert!(parse("let = 1;").is_err());
/// ```
pub fn parse(source: &str) -> Result<Vec<Statement>, FlaxError> {
    let tokens = lexer::tokenize(source)?;
    Ok(parse_program(&tokens)?)
}

/// Runs a program, printing to standard output.
///
/// # Errors
/// Returns the first lexical, parse or runtime error.
///
/// # Examples
/// ```
/// use flax::run;
///
/// assert!(run("let result = 2 + 2;").is_ok());
///
/// // `x` is not defined.
/// let err = run("let y = x + 1;").unwrap_err();
/// assert_eq!(err.kind(), "UndefinedVariable");
/// ```
pub fn run(source: &str) -> Result<(), FlaxError> {
    run_with_output(source, Box::new(std::io::stdout()))
}

/// Runs a program, sending `println` output to `out`.
///
/// # Errors
/// Returns the first lexical, parse or runtime error.
pub fn run_with_output(source: &str, out: Box<dyn Write>) -> Result<(), FlaxError> {
    run_with_config(source, Config::default(), out)
}

/// Runs a program with explicit settings, sending `println` output to `out`.
///
/// The whole source is tokenized and parsed before the first statement runs.
///
/// # Errors
/// Returns the first lexical, parse or runtime error.
///
/// # Example
/// ```
/// use flax::{interpreter::Config, run_with_config};
///
/// let source = "func down(n) { return n == 0 ? 0 : down(n - 1); } down(50);";
/// let config = Config { max_call_depth: 10 };
///
/// let err = run_with_config(source, config, Box::new(std::io::sink())).unwrap_err();
/// assert_eq!(err.kind(), "StackOverflow");
/// ```
pub fn run_with_config(source: &str, config: Config, out: Box<dyn Write>) -> Result<(), FlaxError> {
    let program = parse(source)?;
    info!(statements = program.len(), max_call_depth = config.max_call_depth, "parsed program");

    let mut context = Context::with_output(config, out);
    context.run(&program)?;
    Ok(())
}
