use std::iter::Peekable;

use tracing::trace;

use crate::{
    ast::{BinaryOperator, Expr, Statement},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{binary::parse_logical_or, statement::parse_declaration, utils::expect},
        stack::ensure_sufficient_stack,
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// The largest number of parameters a function may declare, and of arguments
/// a call may pass.
pub const MAX_PARAMETERS: usize = 255;

/// Parses a complete program.
///
/// Declarations are parsed until the token stream is exhausted. Parsing stops
/// at the first error; no partial program is returned. Running out of tokens
/// mid-construct is reported on the line of the last token.
///
/// Grammar: `program := declaration* EOF`
///
/// # Parameters
/// - `tokens`: The `(Token, line)` pairs produced by the lexer.
///
/// # Returns
/// The top-level statements in source order.
///
/// # Example
/// ```
/// use flax::interpreter::{lexer::tokenize, parser::core::parse_program};
///
/// let tokens = tokenize("func add(a, b) { return a + b; }\nlet x = add(1, 2);").unwrap();
/// let program = parse_program(&tokens).unwrap();
///
/// assert_eq!(program.len(), 2);
/// ```
pub fn parse_program(tokens: &[(Token, usize)]) -> ParseResult<Vec<Statement>> {
    let mut iter = tokens.iter().peekable();
    let mut statements = Vec::new();

    let last_line = tokens.last().map_or(1, |(_, line)| *line);

    while iter.peek().is_some() {
        let statement = parse_declaration(&mut iter).map_err(|err| at_end_of_source(err, last_line))?;
        statements.push(statement);
    }

    trace!(statements = statements.len(), "parsed program");
    Ok(statements)
}

fn at_end_of_source(err: ParseError, last_line: usize) -> ParseError {
    match err {
        ParseError::UnexpectedEndOfInput { expected, .. } => {
            ParseError::UnexpectedEndOfInput { expected,
                                               line: last_line }
        },
        other => other,
    }
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, assignment, and recursively
/// descends through the precedence hierarchy.
///
/// Grammar: `expression := assignment`
///
/// Every nested sub-expression passes through here, so this is where the
/// parser makes sure enough stack remains for the next level.
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    ensure_sufficient_stack(|| parse_assignment(tokens))
}

/// Parses an assignment or compound assignment.
///
/// Assignment is right-associative, so `a = b = 1` assigns `1` to `b` and
/// then to `a`. Compound forms are desugared on the spot:
///
/// ```text
///     x += e   =>   x = x + e
///     x -= e   =>   x = x - e
///     x *= e   =>   x = x * e
///     x /= e   =>   x = x / e
/// ```
///
/// Grammar:
/// ```text
///     assignment := IDENT ("=" | "+=" | "-=" | "*=" | "/=") assignment
///                 | conditional
/// ```
///
/// # Errors
/// `ParseError::InvalidAssignmentTarget` when the left-hand side is anything
/// other than a plain variable.
pub fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let target = parse_conditional(tokens)?;

    let Some((token, line)) = tokens.peek() else {
        return Ok(target);
    };
    let op = match token {
        Token::Equals => None,
        Token::PlusAssign => Some(BinaryOperator::Add),
        Token::MinusAssign => Some(BinaryOperator::Sub),
        Token::MulAssign => Some(BinaryOperator::Mul),
        Token::DivAssign => Some(BinaryOperator::Div),
        _ => return Ok(target),
    };
    let line = *line;
    tokens.next();

    let value = ensure_sufficient_stack(|| parse_assignment(tokens))?;

    let Expr::Variable { name, .. } = &target else {
        return Err(ParseError::InvalidAssignmentTarget { line });
    };
    let name = name.clone();

    let value = match op {
        Some(op) => Expr::BinaryOp { left: Box::new(Expr::Variable { name: name.clone(),
                                                                     line }),
                                     op,
                                     right: Box::new(value),
                                     line },
        None => value,
    };

    Ok(Expr::Assign { name,
                      value: Box::new(value),
                      line })
}

/// Parses a conditional expression of the form `cond ? a : b`.
///
/// The operator is right-associative: `a ? b : c ? d : e` parses as
/// `a ? b : (c ? d : e)`. The middle operand may be any expression.
///
/// Grammar: `conditional := logical_or ("?" expression ":" conditional)?`
pub fn parse_conditional<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let condition = parse_logical_or(tokens)?;

    if let Some((Token::Question, line)) = tokens.peek() {
        let line = *line;
        tokens.next();

        let then_expr = parse_expression(tokens)?;
        expect(tokens, &Token::Colon, "':' in conditional expression", line)?;
        let else_expr = ensure_sufficient_stack(|| parse_conditional(tokens))?;

        return Ok(Expr::Conditional { condition: Box::new(condition),
                                      then_expr: Box::new(then_expr),
                                      else_expr: Box::new(else_expr),
                                      line });
    }

    Ok(condition)
}
