//! Syntax tree produced by [`crate::stmt::StmtParser`].
//!
//! Grammar subset (newlines separate statements):
//!
//! ```text
//! program    := statement*
//! statement  := if | while | for | loop | class | function | return
//!             | break | continue | hotkey | directive | expression
//! if         := ("if" | "elseif") expr body (("elseif" | "else" "if") ... | "else" body)?
//! for        := "for" "("? IDENT ("," IDENT)* "in" expr ")"? body
//! loop       := "loop" expr? body
//! class      := "class" IDENT ("extends" IDENT)? block
//! function   := "static"? IDENT "(" params? ")" block
//! body       := block | statement* (until EOF, "}", "else", "elseif")
//! expr       := assignment
//! assignment := or (":=" assignment)?
//! or         := and ("or" and)*
//! and        := equality ("and" equality)*
//! equality   := comparison (("=" | "!=") comparison)*
//! comparison := term (("<" | ">" | "<=" | ">=") term)*
//! term       := factor (("+" | "-") factor)*
//! factor     := unary (("*" | "/" | "mod") unary)*
//! unary      := ("not" | "-") unary | call
//! call       := primary ("(" args? ")" | "." IDENT)*
//! ```

use crate::token::Span;
use serde::Serialize;


#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Stmt {
    #[serde(rename = "IfStatement")]
    If(IfStatement),
    #[serde(rename = "WhileStatement")]
    While(WhileStatement),
    #[serde(rename = "ForStatement")]
    For(ForStatement),
    #[serde(rename = "LoopStatement")]
    Loop(LoopStatement),
    #[serde(rename = "ClassDeclaration")]
    Class(ClassDeclaration),
    #[serde(rename = "FunctionDeclaration")]
    Function(FunctionDeclaration),
    #[serde(rename = "ReturnStatement")]
    Return(ReturnStatement),
    #[serde(rename = "BreakStatement")]
    Break { span: Span },
    #[serde(rename = "ContinueStatement")]
    Continue { span: Span },
    #[serde(rename = "HotkeyStatement")]
    Hotkey(HotkeyStatement),
    #[serde(rename = "DirectiveStatement")]
    Directive(DirectiveStatement),
    #[serde(rename = "ExpressionStatement")]
    Expression(ExpressionStatement),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStatement {
    pub test: Expr,
    pub consequent: Vec<Stmt>,
    pub alternate: Option<Alternate>,
    pub span: Span,
}

/// What follows an `if` body: another `if` in the chain or a final `else` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "node")]
pub enum Alternate {
    ElseIf(Box<IfStatement>),
    Else(Vec<Stmt>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStatement {
    pub test: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForStatement {
    pub variables: Vec<String>,
    pub iterable: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoopStatement {
    /// Repeat count or loop argument; `None` loops forever.
    pub count: Option<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDeclaration {
    pub name: String,
    pub name_span: Span,
    pub super_class: Option<String>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDeclaration {
    pub name: String,
    pub name_span: Span,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub is_static: bool,
    pub span: Span,
}

impl FunctionDeclaration {
    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    pub name: String,
    /// `&name`
    pub by_ref: bool,
    /// `name*`
    pub variadic: bool,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStatement {
    pub argument: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotkeyStatement {
    /// Trigger text including the trailing `::`.
    pub trigger: String,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectiveStatement {
    pub directive: String,
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionStatement {
    pub expression: Expr,
    pub span: Span,
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::Loop(s) => s.span,
            Stmt::Class(s) => s.span,
            Stmt::Function(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Break { span } | Stmt::Continue { span } => *span,
            Stmt::Hotkey(s) => s.span,
            Stmt::Directive(s) => s.span,
            Stmt::Expression(s) => s.span,
        }
    }

    /// Statement lists directly nested in this statement (an `else if` chain
    /// contributes every link's bodies).
    pub fn child_bodies(&self) -> Vec<&[Stmt]> {
        match self {
            Stmt::If(s) => {
                let mut bodies = Vec::new();
                let mut current = s;
                loop {
                    bodies.push(current.consequent.as_slice());
                    match &current.alternate {
                        Some(Alternate::ElseIf(next)) => current = next,
                        Some(Alternate::Else(body)) => {
                            bodies.push(body.as_slice());
                            break;
                        }
                        None => break,
                    }
                }
                bodies
            }
            Stmt::While(s) => vec![&s.body],
            Stmt::For(s) => vec![&s.body],
            Stmt::Loop(s) => vec![&s.body],
            Stmt::Class(s) => vec![&s.body],
            Stmt::Function(s) => vec![&s.body],
            Stmt::Hotkey(s) => vec![&s.body],
            Stmt::Return(_) | Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Directive(_) | Stmt::Expression(_) => {
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expr {
    #[serde(rename = "AssignmentExpression")]
    Assignment {
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },
    #[serde(rename = "BinaryExpression")]
    Binary {
        operator: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    #[serde(rename = "UnaryExpression")]
    Unary {
        operator: UnaryOp,
        argument: Box<Expr>,
        span: Span,
    },
    #[serde(rename = "CallExpression")]
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        span: Span,
    },
    #[serde(rename = "MemberExpression")]
    Member {
        object: Box<Expr>,
        property: String,
        span: Span,
    },
    Literal {
        value: LiteralValue,
        raw: String,
        span: Span,
    },
    Identifier {
        name: String,
        /// `A_*` engine variable.
        builtin: bool,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Assignment { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Call { span, .. }
            | Expr::Member { span, .. }
            | Expr::Literal { span, .. }
            | Expr::Identifier { span, .. } => *span,
        }
    }

    /// Name and span of the callee when this is a call to a bare identifier.
    pub fn called_name(&self) -> Option<(&str, Span)> {
        match self {
            Expr::Call { callee, .. } => match callee.as_ref() {
                Expr::Identifier { name, span, .. } => Some((name, *span)),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    #[serde(rename = "or")]
    Or,
    #[serde(rename = "and")]
    And,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "mod")]
    Modulo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    #[serde(rename = "not")]
    Not,
    #[serde(rename = "-")]
    Negate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
}
