use crate::ast::prelude::{BinaryOperator, UnaryOperator};
use std::fmt;

/// Value written directly in an instruction. Containers are materialised
/// into fresh runtime values every time the literal is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(Vec<Literal>),
    Map(Vec<(String, Literal)>),
    Null,
}

/// Restricted expression: literals, variable references and binary
/// arithmetic/comparison. There are no calls and no host evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Variable(Path),
    /// A lone bare name in value position: the variable when it is bound,
    /// otherwise the name itself as text.
    Name(Path),
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// A name with optional `.field` and `[index]` accessors, e.g. `config.ports[2]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    pub root: String,
    pub segments: Vec<PathSegment>,
}

impl Path {
    pub fn simple(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            segments: Vec::new(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Argument position: either a literal or the name of an existing variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Literal),
    Variable(Path),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(literal) => write!(f, "{:?}", literal),
            Operand::Variable(path) => write!(f, "{}", path),
        }
    }
}
