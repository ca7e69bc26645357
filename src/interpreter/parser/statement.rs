use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{FunctionDecl, Statement},
    interpreter::{
        lexer::Token,
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression},
            utils::{expect, parse_comma_separated, parse_identifier, peek_line},
        },
        stack::ensure_sufficient_stack,
    },
};

/// Parses a single declaration.
///
/// A declaration may be one of:
/// - a function declaration (`func name(params) { ... }`).
/// - a variable declaration (`let name = value;`).
/// - any other statement.
///
/// Parsing is attempted in that order; the first matching construct is
/// returned.
///
/// # Parameters
/// - `tokens`: Token iterator containing `(Token, line)` pairs.
///
/// # Returns
/// A parsed [`Statement`] node.
pub fn parse_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some(statement) = parse_function_declaration(tokens)? {
        return Ok(statement);
    }
    if let Some(statement) = parse_variable_declaration(tokens)? {
        return Ok(statement);
    }

    parse_statement(tokens)
}

/// Parses a function declaration.
///
/// Grammar: `funcDecl := "func" IDENT "(" (IDENT ("," IDENT)*)? ")" block`
///
/// The body is stored behind an `Rc` so that every closure created from this
/// declaration shares it.
///
/// # Returns
/// - `Ok(Some(statement))` if a declaration was parsed,
/// - `Ok(None)` if the next token is not `func`.
///
/// # Errors
/// Returns a `ParseError` if the name, the parameter list or the body is
/// malformed, or if more than
/// [`MAX_PARAMETERS`](super::core::MAX_PARAMETERS) parameters are declared.
fn parse_function_declaration<'a, I>(tokens: &mut Peekable<I>)
                                     -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((Token::Func, line)) = tokens.peek() else {
        return Ok(None);
    };
    let line = *line;
    tokens.next();

    let name = parse_identifier(tokens, "function name", line)?;
    let paren_line = expect(tokens, &Token::LParen, "'(' after function name", line)?;
    let params = parse_comma_separated(tokens,
                                       |tokens| parse_identifier(tokens, "parameter name", paren_line),
                                       &Token::RParen,
                                       paren_line)?;
    let body_line = peek_line(tokens, paren_line);
    let body = parse_block(tokens, body_line)?;

    Ok(Some(Statement::Function(Rc::new(FunctionDecl { name,
                                                       params,
                                                       body,
                                                       line }))))
}

/// Parses a variable declaration of the form `let name = value;`.
///
/// The initializer is optional; `let x;` binds `nil`.
///
/// # Returns
/// - `Ok(Some(statement))` if a declaration was parsed,
/// - `Ok(None)` if the next token is not `let`.
fn parse_variable_declaration<'a, I>(tokens: &mut Peekable<I>)
                                     -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((Token::Let, line)) = tokens.peek() else {
        return Ok(None);
    };
    let line = *line;
    tokens.next();

    let name = parse_identifier(tokens, "variable name", line)?;

    let initializer = if let Some((Token::Equals, _)) = tokens.peek() {
        tokens.next();
        Some(parse_expression(tokens)?)
    } else {
        None
    };

    expect(tokens, &Token::Semicolon, "';' after variable declaration", line)?;

    Ok(Some(Statement::VariableDeclaration { name,
                                             initializer,
                                             line }))
}

/// Parses a statement that is not a declaration.
///
/// Grammar:
/// ```text
///     statement := ifStmt | whileStmt | returnStmt | block | exprStmt
/// ```
///
/// The statement's source line is taken from its first token.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = peek_line(tokens, 0);

    match tokens.peek() {
        Some((Token::If, _)) => parse_if(tokens),
        Some((Token::While, _)) => {
            tokens.next();
            let condition = parse_expression(tokens)?;
            let body = parse_block(tokens, line)?;

            Ok(Statement::While { condition,
                                  body,
                                  line })
        },
        Some((Token::Return, _)) => {
            tokens.next();
            let value = match tokens.peek() {
                Some((Token::Semicolon, _)) => None,
                _ => Some(parse_expression(tokens)?),
            };
            expect(tokens, &Token::Semicolon, "';' after return value", line)?;

            Ok(Statement::Return { value, line })
        },
        Some((Token::LBrace, _)) => {
            let statements = parse_block(tokens, line)?;

            Ok(Statement::Block { statements, line })
        },
        _ => {
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::Semicolon, "';' after expression", expr.line_number())?;

            Ok(Statement::Expression { expr, line })
        },
    }
}

/// Parses an `if` statement.
///
/// The condition is an ordinary expression; parentheses are only needed for
/// grouping. An `else if` is stored as an `else` branch holding a single
/// nested `If`, so evaluation needs no special case for chains.
///
/// Grammar: `ifStmt := "if" expression block ("else" (ifStmt | block))?`
fn parse_if<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = expect(tokens, &Token::If, "'if'", 0)?;
    let condition = parse_expression(tokens)?;
    let then_branch = parse_block(tokens, line)?;

    let else_branch = if let Some((Token::Else, else_line)) = tokens.peek() {
        let else_line = *else_line;
        tokens.next();
        match tokens.peek() {
            Some((Token::If, _)) => Some(vec![ensure_sufficient_stack(|| parse_if(tokens))?]),
            _ => Some(parse_block(tokens, else_line)?),
        }
    } else {
        None
    };

    Ok(Statement::If { condition,
                       then_branch,
                       else_branch,
                       line })
}
