//! Control symbol definitions.
//!
//! A flattened program is a collection of δ blocks, each a flat list of
//! `ControlOp`s. The machine splices a block onto its control in list
//! order and pops from the right, so a symbol always sits to the left of
//! the operands it consumes.

use std::fmt;

use serde::Serialize;

/// Index of a δ block within a [`Program`](crate::Program).
///
/// Block 0 is the program entry. Lambda bodies and conditional branches
/// get their own blocks, referenced by index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct DeltaId(pub u32);

impl DeltaId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DeltaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Constant operand pushed verbatim onto the machine stack.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub enum Literal {
    Int(i64),
    /// String contents with delimiters stripped and escapes decoded.
    Str(String),
    Bool(bool),
    /// The empty tuple.
    Nil,
    Dummy,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Str(s) => write!(f, "'{s}'"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Nil => write!(f, "nil"),
            Literal::Dummy => write!(f, "dummy"),
        }
    }
}

/// Unary rator.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum UnaryOp {
    /// Integer negation (`neg`).
    Neg,
    /// Boolean complement (`not`).
    Not,
}

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Not => "not",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary rator. Pops the right operand first, then the left.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// Right-associative exponentiation (`**`).
    Pow,
    Gr,
    Ge,
    Ls,
    Le,
    Eq,
    Ne,
    Or,
    And,
    /// Tuple extension (`aug`).
    Aug,
}

impl BinaryOp {
    /// Source-level spelling, used by dumps and error messages.
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
            BinaryOp::Gr => "gr",
            BinaryOp::Ge => "ge",
            BinaryOp::Ls => "ls",
            BinaryOp::Le => "le",
            BinaryOp::Eq => "eq",
            BinaryOp::Ne => "ne",
            BinaryOp::Or => "or",
            BinaryOp::And => "&",
            BinaryOp::Aug => "aug",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One control symbol within a δ block.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub enum ControlOp {
    /// Push a constant.
    Lit(Literal),
    /// Look up an identifier in the current environment and push the value.
    Name(String),
    /// Push a closure over the current environment.
    Lambda {
        params: Vec<String>,
        body: DeltaId,
    },
    /// Apply: pop the rator, then the rand.
    Gamma,
    /// Conditional selection: pop the condition, then consume the two
    /// `Delta` references sitting on control (else on top).
    Beta,
    /// Branch reference consumed by `Beta`.
    Delta(DeltaId),
    /// Build an n-tuple; the first value popped is the last element.
    Tau(usize),
    /// The fixed-point combinator; consumed by `Gamma` applied to a closure.
    Ystar,
    Unary(UnaryOp),
    Binary(BinaryOp),
}

impl fmt::Display for ControlOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlOp::Lit(lit) => write!(f, "{lit}"),
            ControlOp::Name(name) => f.write_str(name),
            ControlOp::Lambda { params, body } => {
                write!(f, "lambda{{{}.{}}}", params.join(","), body)
            }
            ControlOp::Gamma => f.write_str("gamma"),
            ControlOp::Beta => f.write_str("beta"),
            ControlOp::Delta(id) => write!(f, "delta({id})"),
            ControlOp::Tau(n) => write!(f, "tau({n})"),
            ControlOp::Ystar => f.write_str("<Y*>"),
            ControlOp::Unary(op) => write!(f, "{op}"),
            ControlOp::Binary(op) => write!(f, "{op}"),
        }
    }
}
