use indexmap::IndexSet;

use crate::diagnostic::Span;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Concat,
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    And,
    Or,
    /// `andn't` / `!&`
    Nand,
    /// `orn't` / `!|`
    Nor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Value),
    /// Bare identifier, resolved against the declarations.
    Reference(String),
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        negate_condition: bool,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
        invert_else: bool,
    },
    /// The `isn't` transform applied to an inner expression.
    Inequality(Box<Expr>),
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn literal(value: Value, span: Span) -> Self {
        Self::new(ExprKind::Literal(value), span)
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match &self.kind {
            ExprKind::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        self.as_literal().is_some()
    }

    /// Collect every variable name this expression mentions.
    pub fn collect_references(&self, out: &mut IndexSet<String>) {
        match &self.kind {
            ExprKind::Literal(_) => {}
            ExprKind::Reference(name) => {
                out.insert(name.clone());
            }
            ExprKind::Binary { left, right, .. } => {
                left.collect_references(out);
                right.collect_references(out);
            }
            ExprKind::Unary { expr, .. } | ExprKind::Inequality(expr) => expr.collect_references(out),
            ExprKind::Conditional {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                condition.collect_references(out);
                then_branch.collect_references(out);
                else_branch.collect_references(out);
            }
            ExprKind::Call { args, .. } => {
                for arg in args {
                    arg.collect_references(out);
                }
            }
        }
    }

    pub fn references(&self) -> IndexSet<String> {
        let mut names = IndexSet::new();
        self.collect_references(&mut names);
        names
    }
}

/// `<name> is <expr>` and its variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub expr: Expr,
    pub references: IndexSet<String>,
    pub offset: usize,
}

impl Declaration {
    pub fn new(name: impl Into<String>, expr: Expr, offset: usize) -> Self {
        let references = expr.references();
        Self {
            name: name.into(),
            expr,
            references,
            offset,
        }
    }

    pub fn is_self_referencing(&self) -> bool {
        self.references.contains(&self.name)
    }
}

/// A top-level directive or side-effecting command, executed while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub name: String,
    pub args: Vec<Value>,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declaration(Declaration),
    Command(Command),
}
