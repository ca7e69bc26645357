use std::iter::Peekable;

use crate::{
    ast::Statement,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, statement::parse_declaration, utils::expect},
        stack::ensure_sufficient_stack,
    },
};

/// Parses a block delimited by braces.
///
/// A block consists of zero or more declarations. Parsing continues until a
/// closing `}` token is encountered. Function and variable declarations are
/// allowed anywhere a statement is, so nested functions are written inside
/// blocks like any other declaration.
///
/// Grammar: `block := "{" declaration* "}"`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the opening brace.
/// - `line`: Line reported if the stream ends before the opening brace.
///
/// # Returns
/// The statements of the block, in source order.
///
/// # Errors
/// - `ParseError::UnexpectedToken` if the block does not start with `{`.
/// - `ParseError::UnexpectedEndOfInput` if the closing `}` is missing.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let open_line = expect(tokens, &Token::LBrace, "'{'", line)?;
    let mut statements = Vec::new();

    loop {
        match tokens.peek() {
            Some((Token::RBrace, _)) => {
                tokens.next();
                break;
            },
            Some(_) => statements.push(ensure_sufficient_stack(|| parse_declaration(tokens))?),
            None => {
                return Err(ParseError::UnexpectedEndOfInput { expected: "'}' after block".to_string(),
                                                              line:     open_line, });
            },
        }
    }

    Ok(statements)
}
