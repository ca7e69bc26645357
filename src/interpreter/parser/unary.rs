use std::iter::Peekable;

use crate::{
    ast::{Expr, LiteralValue, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_expression},
            utils::{expect, parse_comma_separated, unexpected},
        },
        stack::ensure_sufficient_stack,
    },
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`  (numeric negation)
/// - `!`  (logical not)
///
/// Unary operators are right-associative, so an input like `!-x` is parsed as
/// `!( -x )`.
///
/// If no unary operator is present, the function delegates to [`parse_call`].
///
/// Grammar:
/// ```text
///     unary := ("-" | "!") unary
///            | call
/// ```
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// An [`Expr::UnaryOp`] or a call/primary expression.
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let op = match tokens.peek() {
        Some((Token::Minus, _)) => UnaryOperator::Negate,
        Some((Token::Bang, _)) => UnaryOperator::Not,
        _ => return parse_call(tokens),
    };
    let line = tokens.next().map_or(0, |(_, line)| *line);
    let expr = ensure_sufficient_stack(|| parse_unary(tokens))?;

    Ok(Expr::UnaryOp { op,
                       expr: Box::new(expr),
                       line })
}

/// Parses a primary expression followed by any number of argument lists.
///
/// Calls chain to the left, so `make()(1)` calls the result of `make()`.
///
/// Grammar: `call := primary ("(" (expression ("," expression)*)? ")")*`
///
/// # Errors
/// `ParseError::TooManyParameters` if a single call passes more than
/// [`MAX_PARAMETERS`](super::core::MAX_PARAMETERS) arguments.
pub(crate) fn parse_call<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut expr = parse_primary(tokens)?;

    while let Some((Token::LParen, line)) = tokens.peek() {
        let line = *line;
        tokens.next();
        let arguments = parse_comma_separated(tokens, parse_expression, &Token::RParen, line)?;
        expr = Expr::Call { callee: Box::new(expr),
                            arguments,
                            line };
    }

    Ok(expr)
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include:
/// - numeric, string and boolean literals, and `nil`
/// - identifiers
/// - parenthesized expressions
///
/// Grammar (simplified):
/// ```text
///     primary := NUMBER | STRING | "true" | "false" | "nil"
///              | IDENT
///              | "(" expression ")"
/// ```
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of a primary expression.
///
/// # Returns
/// The parsed primary [`Expr`] or a `ParseError` on failure.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((token, line)) = tokens.next() else {
        return Err(ParseError::UnexpectedEndOfInput { expected: "expression".to_string(),
                                                      line:     0, });
    };
    let line = *line;

    let value = match token {
        Token::Number(n) => LiteralValue::Number(*n),
        Token::String(s) => LiteralValue::String(s.as_str().into()),
        Token::True => LiteralValue::Bool(true),
        Token::False => LiteralValue::Bool(false),
        Token::Nil => LiteralValue::Nil,
        Token::Identifier(name) => {
            return Ok(Expr::Variable { name: name.clone(),
                                       line });
        },
        Token::LParen => {
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::RParen, "')' after expression", line)?;
            return Ok(expr);
        },
        other => return Err(unexpected(other, "expression", line)),
    };

    Ok(Expr::Literal { value, line })
}
