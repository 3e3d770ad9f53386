//! Runtime values.

use std::fmt;

use rpal_control::{DeltaId, Literal};

use super::env::EnvId;
use super::intrinsics::Builtin;

/// A lambda body paired with its captured environment. The same shape
/// backs both plain closures and the lazily unfolding `Eta` form.
#[derive(Clone, PartialEq, Debug)]
pub struct Closure {
    pub params: Vec<String>,
    pub body: DeltaId,
    pub env: EnvId,
}

/// A value on the machine stack or bound in an environment.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Int(i64),
    Str(String),
    Bool(bool),
    /// The empty tuple.
    Nil,
    Dummy,
    Tuple(Vec<Value>),
    Closure(Closure),
    /// Recursive closure produced by applying `Y*`; unfolds on application.
    Eta(Closure),
    /// The fixed-point combinator awaiting its closure.
    Ystar,
    Builtin(Builtin),
}

impl Value {
    pub fn from_literal(lit: Literal) -> Self {
        match lit {
            Literal::Int(n) => Value::Int(n),
            Literal::Str(s) => Value::Str(s),
            Literal::Bool(b) => Value::Bool(b),
            Literal::Nil => Value::Nil,
            Literal::Dummy => Value::Dummy,
        }
    }

    /// Type name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Bool(_) => "truthvalue",
            Value::Nil => "nil",
            Value::Dummy => "dummy",
            Value::Tuple(_) => "tuple",
            Value::Closure(_) => "function",
            Value::Eta(_) => "function",
            Value::Ystar => "Y*",
            Value::Builtin(_) => "function",
        }
    }
}

/// Canonical printed form, as emitted by `Print`. Strings render bare;
/// tuple elements are comma-separated.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Nil => f.write_str("nil"),
            Value::Dummy => f.write_str("dummy"),
            Value::Tuple(elements) => {
                f.write_str("(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str(")")
            }
            Value::Closure(c) => {
                write!(f, "[lambda closure: {}: {}]", c.params.join(","), c.body)
            }
            Value::Eta(c) => {
                write!(f, "[eta closure: {}: {}]", c.params.join(","), c.body)
            }
            Value::Ystar => f.write_str("<Y*>"),
            Value::Builtin(b) => write!(f, "[builtin: {}]", b.name()),
        }
    }
}
