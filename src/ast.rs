use std::{mem, rc::Rc};

/// Represents a literal value in the language.
///
/// `LiteralValue` covers all raw, constant values that can appear directly in
/// source code: numbers, strings, booleans and `nil`.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit floating-point literal. Integer spellings are stored here too.
    Number(f64),
    /// A string literal with escapes already resolved.
    String(Rc<str>),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// The `nil` literal.
    Nil,
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// Each variant models a distinct syntactic construct and records the source
/// line it started on, which is attached to any runtime error it raises.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string, boolean or nil).
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// Assignment to an existing variable. Compound assignments such as
    /// `x += 1` are desugared into `x = x + 1` by the parser.
    Assign {
        /// Name of the assigned variable.
        name:  String,
        /// The value expression.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A unary operation (negation or logical not).
    UnaryOp {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A strict binary operation; both operands are always evaluated.
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A short-circuiting `&&` or `||`.
    Logical {
        /// Left operand, always evaluated.
        left:  Box<Self>,
        /// The operator.
        op:    LogicalOperator,
        /// Right operand, evaluated only when the left does not decide.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Conditional expression `condition ? then_expr : else_expr`.
    Conditional {
        /// The boolean condition.
        condition: Box<Self>,
        /// Expression evaluated if the condition is true.
        then_expr: Box<Self>,
        /// Expression evaluated if the condition is false.
        else_expr: Box<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// Call expression (e.g. `fib(n - 1)`).
    Call {
        /// The expression producing the function being called.
        callee:    Box<Self>,
        /// Arguments to the function, evaluated left to right.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use flax::ast::Expr;
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Variable { line, .. }
            | Self::Assign { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::Logical { line, .. }
            | Self::Conditional { line, .. }
            | Self::Call { line, .. } => *line,
        }
    }
}

impl Expr {
    /// A childless node left behind when a subtree is detached.
    const fn placeholder() -> Self {
        Self::Literal { value: LiteralValue::Nil,
                        line:  0, }
    }

    const fn has_children(&self) -> bool {
        !matches!(self, Self::Literal { .. } | Self::Variable { .. })
    }

    /// Moves every child that has children of its own into `pending`.
    fn detach_children(&mut self, pending: &mut Vec<Self>) {
        match self {
            Self::Literal { .. } | Self::Variable { .. } => {},
            Self::Assign { value: child, .. } | Self::UnaryOp { expr: child, .. } => {
                child.detach_into(pending);
            },
            Self::BinaryOp { left, right, .. } | Self::Logical { left, right, .. } => {
                left.detach_into(pending);
                right.detach_into(pending);
            },
            Self::Conditional { condition,
                                then_expr,
                                else_expr,
                                .. } => {
                condition.detach_into(pending);
                then_expr.detach_into(pending);
                else_expr.detach_into(pending);
            },
            Self::Call { callee, arguments, .. } => {
                callee.detach_into(pending);
                for argument in arguments {
                    argument.detach_into(pending);
                }
            },
        }
    }

    fn detach_into(&mut self, pending: &mut Vec<Self>) {
        if self.has_children() {
            pending.push(mem::replace(self, Self::placeholder()));
        }
    }
}

// Long operator chains and deep nesting would otherwise be freed by one
// recursive call per level.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

/// Represents a user-defined function declaration.
///
/// Declarations are shared between the syntax tree and every closure created
/// from them, so evaluating `func` never copies the body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// The name of the function.
    pub name:   String,
    /// The parameter names, in declaration order.
    pub params: Vec<String>,
    /// The statements of the function body.
    pub body:   Vec<Statement>,
    /// Line number in the source code.
    pub line:   usize,
}

/// Represents a statement.
///
/// A program is an ordered list of statements; blocks nest further lists.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A function declaration using `func`.
    Function(Rc<FunctionDecl>),
    /// A variable declaration using `let`.
    VariableDeclaration {
        /// The name of the variable.
        name:        String,
        /// The initial value; `nil` when omitted.
        initializer: Option<Expr>,
        /// Line number in the source code.
        line:        usize,
    },
    /// An `if` statement with an optional `else` branch.
    If {
        /// The boolean condition.
        condition:   Expr,
        /// Statements run when the condition is true.
        then_branch: Vec<Self>,
        /// Statements run when the condition is false. An `else if` chain is
        /// stored as a single nested `If`.
        else_branch: Option<Vec<Self>>,
        /// Line number in the source code.
        line:        usize,
    },
    /// A `while` loop.
    While {
        /// The condition, checked before each iteration.
        condition: Expr,
        /// The loop body.
        body:      Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A `return` with an optional value.
    Return {
        /// The returned value; `nil` when omitted.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A standalone expression evaluated for its side effects.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// A braced block introducing a new scope.
    Block {
        /// Statements inside the block.
        statements: Vec<Self>,
        /// Line number in the source code.
        line:       usize,
    },
}

impl Statement {
    /// Gets the line the statement starts on.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::Function(decl) => decl.line,
            Self::VariableDeclaration { line, .. }
            | Self::If { line, .. }
            | Self::While { line, .. }
            | Self::Return { line, .. }
            | Self::Expression { line, .. }
            | Self::Block { line, .. } => *line,
        }
    }
}

impl Statement {
    /// Moves the statements nested in this one into `pending`.
    fn detach_nested(&mut self, pending: &mut Vec<Self>) {
        match self {
            Self::If { then_branch,
                       else_branch,
                       .. } => {
                pending.append(then_branch);
                if let Some(else_branch) = else_branch {
                    pending.append(else_branch);
                }
            },
            Self::While { body: statements, .. } | Self::Block { statements, .. } => {
                pending.append(statements);
            },
            Self::Function(_)
            | Self::VariableDeclaration { .. }
            | Self::Return { .. }
            | Self::Expression { .. } => {},
        }
    }
}

// Nested blocks are freed the same way as nested expressions.
impl Drop for Statement {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_nested(&mut pending);
        while let Some(mut statement) = pending.pop() {
            statement.detach_nested(&mut pending);
        }
    }
}

/// Represents a binary operator.
///
/// Binary operators include arithmetic, comparisons and concatenation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// String concatenation (`++`)
    Concat,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
}

/// Represents a short-circuiting logical operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogicalOperator {
    /// Logical and (`&&`)
    And,
    /// Logical or (`||`)
    Or,
}

/// Represents a unary operator.
///
/// Unary operators include negation and logical NOT.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Logical NOT (e.g. `!x`).
    Not,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, Concat, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Concat => "++",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
        }
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "!"),
        }
    }
}
