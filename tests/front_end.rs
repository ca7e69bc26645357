use flax::{
    ast::{BinaryOperator, Expr, LiteralValue, LogicalOperator, Statement, UnaryOperator},
    error::{FlaxError, LexError, ParseError},
    interpreter::lexer::Token,
    parse, tokenize,
};
use pretty_assertions::assert_eq;

fn expression_of(src: &str) -> Expr {
    let program = parse(src).unwrap_or_else(|e| panic!("Failed to parse {src:?}: {e}"));
    assert_eq!(program.len(), 1);
    match &program[0] {
        Statement::Expression { expr, .. } => expr.clone(),
        other => panic!("Expected an expression statement, found {other:?}"),
    }
}

fn number(value: f64, line: usize) -> Box<Expr> {
    Box::new(Expr::Literal { value: LiteralValue::Number(value),
                             line })
}

fn variable(name: &str, line: usize) -> Box<Expr> {
    Box::new(Expr::Variable { name: name.to_string(),
                              line })
}

fn parse_error_of(src: &str) -> ParseError {
    match parse(src) {
        Err(FlaxError::Parse(e)) => e,
        other => panic!("Expected a parse error for {src:?}, got {other:?}"),
    }
}

#[test]
fn tokens_carry_their_line() {
    let tokens = tokenize("let x = 1;\n// comment\n\nx += 2.5;").unwrap();

    assert_eq!(tokens,
               vec![(Token::Let, 1),
                    (Token::Identifier("x".to_string()), 1),
                    (Token::Equals, 1),
                    (Token::Number(1.0), 1),
                    (Token::Semicolon, 1),
                    (Token::Identifier("x".to_string()), 4),
                    (Token::PlusAssign, 4),
                    (Token::Number(2.5), 4),
                    (Token::Semicolon, 4)]);
}

#[test]
fn keywords_and_operators() {
    let tokens: Vec<Token> = tokenize("func funcs if else while return true false nil ++ + == = != ! \
                                       && || ? : <= < >= > -= *= /=")
        .unwrap()
        .into_iter()
        .map(|(token, _)| token)
        .collect();

    assert_eq!(tokens,
               vec![Token::Func,
                    Token::Identifier("funcs".to_string()),
                    Token::If,
                    Token::Else,
                    Token::While,
                    Token::Return,
                    Token::True,
                    Token::False,
                    Token::Nil,
                    Token::PlusPlus,
                    Token::Plus,
                    Token::EqualEqual,
                    Token::Equals,
                    Token::BangEqual,
                    Token::Bang,
                    Token::AndAnd,
                    Token::OrOr,
                    Token::Question,
                    Token::Colon,
                    Token::LessEqual,
                    Token::Less,
                    Token::GreaterEqual,
                    Token::Greater,
                    Token::MinusAssign,
                    Token::MulAssign,
                    Token::DivAssign]);
}

#[test]
fn strings_resolve_escapes_and_advance_lines() {
    let tokens = tokenize("\"a\\nb\"\n\"two\nlines\" x").unwrap();

    assert_eq!(tokens,
               vec![(Token::String("a\nb".to_string()), 1),
                    (Token::String("two\nlines".to_string()), 2),
                    (Token::Identifier("x".to_string()), 3)]);
}

#[test]
fn lexer_fails_fast() {
    assert!(matches!(tokenize("let a = 1;\nlet b = #;"),
                     Err(FlaxError::Lex(LexError::UnexpectedCharacter { line: 2, .. }))));
    assert!(matches!(tokenize("\"abc"),
                     Err(FlaxError::Lex(LexError::UnterminatedString { line: 1 }))));
    assert!(matches!(tokenize("\"\\x\""),
                     Err(FlaxError::Lex(LexError::InvalidEscape { escape: 'x', line: 1 }))));
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(expression_of("1 + 2 * 3;"),
               Expr::BinaryOp { left:  number(1.0, 1),
                                op:    BinaryOperator::Add,
                                right: Box::new(Expr::BinaryOp { left:  number(2.0, 1),
                                                                 op:    BinaryOperator::Mul,
                                                                 right: number(3.0, 1),
                                                                 line:  1, }),
                                line:  1, });
}

#[test]
fn binary_operators_are_left_associative() {
    assert_eq!(expression_of("a - b - c;"),
               Expr::BinaryOp { left:  Box::new(Expr::BinaryOp { left:  variable("a", 1),
                                                                 op:    BinaryOperator::Sub,
                                                                 right: variable("b", 1),
                                                                 line:  1, }),
                                op:    BinaryOperator::Sub,
                                right: variable("c", 1),
                                line:  1, });
}

#[test]
fn concatenation_binds_looser_than_arithmetic_and_equality() {
    let expr = expression_of("\"x\" ++ 1 + 2 == 3;");
    let Expr::BinaryOp { op, right, .. } = &expr else {
        panic!("Expected a binary operation");
    };

    assert_eq!(*op, BinaryOperator::Concat);
    assert!(matches!(**right,
                     Expr::BinaryOp { op: BinaryOperator::Equal,
                                      .. }));
}

#[test]
fn logical_operators_nest_by_precedence() {
    let expr = expression_of("a || b && c;");
    let Expr::Logical { op, right, .. } = &expr else {
        panic!("Expected a logical operation");
    };

    assert_eq!(*op, LogicalOperator::Or);
    assert!(matches!(**right,
                     Expr::Logical { op: LogicalOperator::And,
                                     .. }));
}

#[test]
fn unary_operators_nest() {
    assert_eq!(expression_of("!-x;"),
               Expr::UnaryOp { op:   UnaryOperator::Not,
                               expr: Box::new(Expr::UnaryOp { op:   UnaryOperator::Negate,
                                                              expr: variable("x", 1),
                                                              line: 1, }),
                               line: 1, });
}

#[test]
fn compound_assignment_desugars() {
    assert_eq!(expression_of("x *= 2;"),
               Expr::Assign { name:  "x".to_string(),
                              value: Box::new(Expr::BinaryOp { left:  variable("x", 1),
                                                               op:    BinaryOperator::Mul,
                                                               right: number(2.0, 1),
                                                               line:  1, }),
                              line:  1, });
}

#[test]
fn assignment_is_right_associative() {
    let expr = expression_of("a = b = 1;");
    let Expr::Assign { name, value, .. } = &expr else {
        panic!("Expected an assignment");
    };

    assert_eq!(name, "a");
    assert!(matches!(&**value, Expr::Assign { name, .. } if name == "b"));
}

#[test]
fn calls_chain() {
    let expr = expression_of("make(1)(2, 3);");
    let Expr::Call { callee, arguments, .. } = &expr else {
        panic!("Expected a call");
    };

    assert_eq!(arguments.len(), 2);
    assert!(matches!(&**callee, Expr::Call { arguments, .. } if arguments.len() == 1));
}

#[test]
fn else_if_nests_inside_else_branch() {
    let program = parse("if a { } else if b { } else { x; }").unwrap();

    let Statement::If { else_branch: Some(else_branch),
                        .. } = &program[0]
    else {
        panic!("Expected an if statement with an else branch");
    };
    assert_eq!(else_branch.len(), 1);
    assert!(matches!(&else_branch[0],
                     Statement::If { else_branch: Some(inner), .. } if inner.len() == 1));
}

#[test]
fn function_declarations_record_parameters() {
    let program = parse("func add(a, b) {\n  return a + b;\n}").unwrap();

    let Statement::Function(decl) = &program[0] else {
        panic!("Expected a function declaration");
    };
    assert_eq!(decl.name, "add");
    assert_eq!(decl.params, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(decl.line, 1);
    assert!(matches!(decl.body[0], Statement::Return { value: Some(_), line: 2 }));
}

#[test]
fn invalid_assignment_target() {
    assert_eq!(parse_error_of("1 = 2;"),
               ParseError::InvalidAssignmentTarget { line: 1 });
    assert_eq!(parse_error_of("f() += 1;"),
               ParseError::InvalidAssignmentTarget { line: 1 });
}

#[test]
fn missing_semicolon_reports_found_token() {
    assert_eq!(parse_error_of("let x = 1\nlet y = 2;"),
               ParseError::UnexpectedToken { token:    "let".to_string(),
                                             expected: "';' after variable declaration".to_string(),
                                             line:     2, });
}

#[test]
fn end_of_input_reports_last_line() {
    let err = parse_error_of("func f(a) {\n  return a;\n");

    assert!(matches!(err, ParseError::UnexpectedEndOfInput { line: 2, .. }));
    assert_eq!(err.to_string(),
               "ParseError: Expected '}' after block, found end of input (line 2)");
}

#[test]
fn too_many_parameters() {
    let params: Vec<String> = (0..256).map(|i| format!("p{i}")).collect();
    let src = format!("func f({}) {{ }}", params.join(", "));
    assert!(matches!(parse_error_of(&src), ParseError::TooManyParameters { .. }));

    let src = format!("func f({}) {{ }}", params[..255].join(", "));
    assert!(parse(&src).is_ok());

    let args: Vec<&str> = vec!["1"; 256];
    let src = format!("f({});", args.join(", "));
    assert!(matches!(parse_error_of(&src), ParseError::TooManyParameters { .. }));
}

#[test]
fn trailing_comma_is_rejected() {
    assert!(matches!(parse_error_of("f(1, );"), ParseError::UnexpectedToken { .. }));
}

fn only_expression(program: &[Statement]) -> &Expr {
    match program {
        [Statement::Expression { expr, .. }] => expr,
        other => panic!("Expected one expression statement, found {} statements", other.len()),
    }
}

#[test]
fn deep_nesting_parses() {
    let depth = 10_000;
    let parens = format!("{}1{};", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(expression_of(&parens),
               Expr::Literal { value: LiteralValue::Number(1.0),
                               line:  1, });

    let program = parse(&format!("{}x;", "-".repeat(depth))).unwrap();
    let mut node = only_expression(&program);
    let mut levels = 0;
    while let Expr::UnaryOp { op: UnaryOperator::Negate,
                              expr,
                              .. } = node
    {
        levels += 1;
        node = &**expr;
    }
    assert_eq!(levels, depth);

    let blocks = format!("{}x;{}", "{".repeat(depth), "}".repeat(depth));
    assert_eq!(parse(&blocks).unwrap().len(), 1);
}

#[test]
fn long_operator_chains_parse() {
    let program = parse(&format!("x{};", " ++ x".repeat(50_000))).unwrap();

    let Expr::BinaryOp { op, left, .. } = only_expression(&program) else {
        panic!("Expected a binary operation");
    };
    assert_eq!(*op, BinaryOperator::Concat);
    assert!(matches!(**left,
                     Expr::BinaryOp { op: BinaryOperator::Concat,
                                      .. }));
}
