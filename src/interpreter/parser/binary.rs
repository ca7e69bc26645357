use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr, LogicalOperator},
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// Parses logical OR expressions.
///
/// `||` binds more loosely than `&&`, so `a || b && c` parses as
/// `a || (b && c)`.
///
/// The rule is: `logical_or := logical_and ("||" logical_and)*`
pub fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_logical_and(tokens)?;
    while let Some((Token::OrOr, line)) = tokens.peek() {
        let line = *line;
        tokens.next();
        let right = parse_logical_and(tokens)?;
        left = Expr::Logical { left: Box::new(left),
                               op: LogicalOperator::Or,
                               right: Box::new(right),
                               line };
    }
    Ok(left)
}

/// Parses logical AND expressions.
///
/// The rule is: `logical_and := concatenation ("&&" concatenation)*`
pub fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_concatenation(tokens)?;
    while let Some((Token::AndAnd, line)) = tokens.peek() {
        let line = *line;
        tokens.next();
        let right = parse_concatenation(tokens)?;
        left = Expr::Logical { left: Box::new(left),
                               op: LogicalOperator::And,
                               right: Box::new(right),
                               line };
    }
    Ok(left)
}

/// Parses string concatenation.
///
/// `++` has the lowest precedence of the strict binary operators, so
/// `"n = " ++ n + 1` concatenates the sum.
///
/// The rule is: `concatenation := equality ("++" equality)*`
pub fn parse_concatenation<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens, &[BinaryOperator::Concat], parse_equality)
}

/// Parses equality operators `==` and `!=`.
///
/// The rule is: `equality := comparison (("==" | "!=") comparison)*`
pub fn parse_equality<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens,
                           &[BinaryOperator::Equal, BinaryOperator::NotEqual],
                           parse_comparison)
}

/// Parses relational operators.
///
/// The rule is: `comparison := additive (("<" | "<=" | ">" | ">=") additive)*`
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens,
                           &[BinaryOperator::Less,
                             BinaryOperator::LessEqual,
                             BinaryOperator::Greater,
                             BinaryOperator::GreaterEqual],
                           parse_additive)
}

/// Parses addition and subtraction expressions.
///
/// Handles left-associative binary operators: `+` and `-`.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
///
/// # Parameters
/// - `tokens`: Token stream with line information.
///
/// # Returns
/// An `Expr::BinaryOp` tree representing the parsed expression.
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens,
                           &[BinaryOperator::Add, BinaryOperator::Sub],
                           parse_multiplicative)
}

/// Parses multiplication-level expressions.
///
/// The rule is: `multiplicative := unary (("*" | "/") unary)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_associative(tokens,
                           &[BinaryOperator::Mul, BinaryOperator::Div],
                           parse_unary)
}

/// Folds a run of same-precedence operators into a left-leaning tree.
///
/// `a - b - c` becomes `(a - b) - c`.
///
/// # Parameters
/// - `tokens`: Token stream with line information.
/// - `operators`: The operators accepted at this level.
/// - `operand`: Parser for the next-higher precedence level.
fn parse_left_associative<'a, I>(tokens: &mut Peekable<I>,
                                 operators: &[BinaryOperator],
                                 operand: fn(&mut Peekable<I>) -> ParseResult<Expr>)
                                 -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = operand(tokens)?;
    loop {
        if let Some((token, line)) = tokens.peek()
           && let Some(op) = token_to_binary_operator(token)
           && operators.contains(&op)
        {
            let line = *line;
            tokens.next();
            let right = operand(tokens)?;
            left = Expr::BinaryOp { left: Box::new(left),
                                    op,
                                    right: Box::new(right),
                                    line };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Maps a token to the strict binary operator it spells, if any.
///
/// ## Example
/// ```
/// use flax::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&Token::PlusPlus), Some(BinaryOperator::Concat));
/// assert_eq!(token_to_binary_operator(&Token::Comma), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::PlusPlus => Some(BinaryOperator::Concat),
        Token::Less => Some(BinaryOperator::Less),
        Token::Greater => Some(BinaryOperator::Greater),
        Token::LessEqual => Some(BinaryOperator::LessEqual),
        Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        Token::EqualEqual => Some(BinaryOperator::Equal),
        Token::BangEqual => Some(BinaryOperator::NotEqual),
        _ => None,
    }
}
