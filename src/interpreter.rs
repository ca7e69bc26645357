/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// manages scopes and closures, and hosts the built-in functions. It is the
/// core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles variables, functions, closures and control flow.
/// - Reports runtime errors such as undefined variables or operand type
///   mismatches.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// strings, identifiers, operators, delimiters, and keywords. This is the
/// first stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with their source line.
/// - Handles numeric and string literals, identifiers, and operators.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of declarations,
/// statements and expressions.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Validates correct grammar and syntax, reporting errors with location info.
/// - Desugars compound assignment into plain assignment.
pub mod parser;
/// Stack growth for the recursive parts of the interpreter.
pub mod stack;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values a program computes with, the closures
/// that carry their defining scope, and the environments that hold bindings.
///
/// # Responsibilities
/// - Defines the `Value` enum and its canonical text form.
/// - Defines closures and native functions.
/// - Implements lexical scopes and the reclamation of cyclic ones.
pub mod value;

pub use evaluator::core::{Config, Context};
