use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{lexer::Token, parser::core::ParseResult},
};

/// Consumes the next token, requiring it to be `expected_token`.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the required token.
/// - `expected_token`: The token that must come next.
/// - `expected`: Human-readable description used in the error message.
/// - `line`: Line reported if the input ends here.
///
/// # Returns
/// The line number of the consumed token.
///
/// # Errors
/// - `ParseError::UnexpectedToken` if a different token is found.
/// - `ParseError::UnexpectedEndOfInput` if the stream is exhausted.
pub fn expect<'a, I>(tokens: &mut Peekable<I>,
                     expected_token: &Token,
                     expected: &str,
                     line: usize)
                     -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((token, found_line)) if token == expected_token => Ok(*found_line),
        Some((token, found_line)) => Err(unexpected(token, expected, *found_line)),
        None => Err(ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                       line }),
    }
}

/// Builds an `UnexpectedToken` error for `token`.
pub(in crate::interpreter::parser) fn unexpected(token: &Token,
                                                 expected: &str,
                                                 line: usize)
                                                 -> ParseError {
    ParseError::UnexpectedToken { token: token.to_string(),
                                  expected: expected.to_string(),
                                  line }
}

/// Returns the line of the next token, or `fallback` at the end of input.
pub(in crate::interpreter::parser) fn peek_line<'a, I>(tokens: &mut Peekable<I>,
                                                       fallback: usize)
                                                       -> usize
    where I: Iterator<Item = &'a (Token, usize)>
{
    tokens.peek().map_or(fallback, |(_, line)| *line)
}

/// Parses a comma-separated list of items until a closing token.
///
/// Used by parameter lists and call arguments. It repeatedly calls
/// `parse_item` to parse one element, expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list. A trailing
/// comma is rejected.
///
/// Grammar (simplified): `list := (item ("," item)*)? closing`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list.
/// - `line`: Line of the opening token, reported if the input ends.
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - more than [`MAX_PARAMETERS`](super::core::MAX_PARAMETERS) items are
///   listed,
/// - an unexpected token is encountered,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token,
    line: usize)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut items = Vec::new();
    if let Some((tok, _)) = tokens.peek()
       && tok == closing
    {
        tokens.next();

        return Ok(items);
    }
    loop {
        if items.len() >= super::core::MAX_PARAMETERS {
            return Err(ParseError::TooManyParameters { line: peek_line(tokens, line) });
        }
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((tok, _)) if tok == closing => break,
            Some((tok, found_line)) => {
                return Err(unexpected(tok, &format!("',' or '{closing}'"), *found_line));
            },
            None => {
                return Err(ParseError::UnexpectedEndOfInput { expected: format!("'{closing}'"),
                                                              line });
            },
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name.
///
/// Keywords are lexed as their own tokens, so they are rejected here without
/// a separate reserved-word check.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at an identifier.
/// - `expected`: What the identifier names, for the error message.
/// - `line`: Line reported if the input ends here.
///
/// # Returns
/// A `String` containing the identifier.
///
/// # Errors
/// Returns a `ParseError` if:
/// - the next token is not an identifier,
/// - the input ends unexpectedly.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              expected: &str,
                                                              line: usize)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Identifier(s), _)) => Ok(s.clone()),
        Some((tok, found_line)) => Err(unexpected(tok, expected, *found_line)),
        None => Err(ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                       line }),
    }
}
