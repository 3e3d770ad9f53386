//! Primitive bindings of the environment `E(0)`.

use std::io::Write;

use indexmap::IndexMap;

use super::error::RuntimeError;
use super::value::Value;

/// A primitive function value. All primitives take one argument;
/// `Conc` is curried through [`Builtin::ConcWith`].
#[derive(Clone, PartialEq, Debug)]
pub enum Builtin {
    Print,
    Isinteger,
    Isstring,
    Istruthvalue,
    Isfunction,
    Istuple,
    Isdummy,
    Order,
    Null,
    Stem,
    Stern,
    Conc,
    /// `Conc` applied once, holding its first string.
    ConcWith(String),
    ItoS,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Print => "Print",
            Builtin::Isinteger => "Isinteger",
            Builtin::Isstring => "Isstring",
            Builtin::Istruthvalue => "Istruthvalue",
            Builtin::Isfunction => "Isfunction",
            Builtin::Istuple => "Istuple",
            Builtin::Isdummy => "Isdummy",
            Builtin::Order => "Order",
            Builtin::Null => "Null",
            Builtin::Stem => "Stem",
            Builtin::Stern => "Stern",
            Builtin::Conc | Builtin::ConcWith(_) => "Conc",
            Builtin::ItoS => "ItoS",
        }
    }
}

/// Install the primitive bindings into `E(0)`.
pub(super) fn install(bindings: &mut IndexMap<String, Value>) {
    let primitives = [
        Builtin::Print,
        Builtin::Isinteger,
        Builtin::Isstring,
        Builtin::Istruthvalue,
        Builtin::Isfunction,
        Builtin::Istuple,
        Builtin::Isdummy,
        Builtin::Order,
        Builtin::Null,
        Builtin::Stem,
        Builtin::Stern,
        Builtin::Conc,
        Builtin::ItoS,
    ];
    for builtin in primitives {
        bindings.insert(builtin.name().to_string(), Value::Builtin(builtin));
    }
}

/// Apply a primitive to its argument. `Print` writes to `out` and flushes
/// line-at-a-time.
pub(super) fn apply<W: Write>(
    builtin: Builtin,
    arg: Value,
    out: &mut W,
) -> Result<Value, RuntimeError> {
    match builtin {
        Builtin::Print => {
            writeln!(out, "{arg}")?;
            out.flush()?;
            Ok(Value::Dummy)
        }
        Builtin::Isinteger => Ok(Value::Bool(matches!(arg, Value::Int(_)))),
        Builtin::Isstring => Ok(Value::Bool(matches!(arg, Value::Str(_)))),
        Builtin::Istruthvalue => Ok(Value::Bool(matches!(arg, Value::Bool(_)))),
        Builtin::Isfunction => Ok(Value::Bool(matches!(
            arg,
            Value::Closure(_) | Value::Eta(_) | Value::Builtin(_) | Value::Ystar
        ))),
        Builtin::Istuple => Ok(Value::Bool(matches!(arg, Value::Tuple(_) | Value::Nil))),
        Builtin::Isdummy => Ok(Value::Bool(matches!(arg, Value::Dummy))),
        Builtin::Order => match arg {
            Value::Tuple(elements) => Ok(Value::Int(elements.len() as i64)),
            Value::Nil => Ok(Value::Int(0)),
            other => Err(RuntimeError::TypeMismatch {
                op: "Order",
                expected: "a tuple",
                found: other.kind_name(),
            }),
        },
        Builtin::Null => Ok(Value::Bool(match &arg {
            Value::Nil => true,
            Value::Tuple(elements) => elements.is_empty(),
            _ => false,
        })),
        Builtin::Stem => match arg {
            Value::Str(s) => match s.chars().next() {
                Some(first) => Ok(Value::Str(first.to_string())),
                None => Err(RuntimeError::EmptyString("Stem")),
            },
            other => Err(RuntimeError::TypeMismatch {
                op: "Stem",
                expected: "a string",
                found: other.kind_name(),
            }),
        },
        Builtin::Stern => match arg {
            Value::Str(s) => {
                let mut chars = s.chars();
                match chars.next() {
                    Some(_) => Ok(Value::Str(chars.collect())),
                    None => Err(RuntimeError::EmptyString("Stern")),
                }
            }
            other => Err(RuntimeError::TypeMismatch {
                op: "Stern",
                expected: "a string",
                found: other.kind_name(),
            }),
        },
        Builtin::Conc => match arg {
            Value::Str(s) => Ok(Value::Builtin(Builtin::ConcWith(s))),
            other => Err(RuntimeError::TypeMismatch {
                op: "Conc",
                expected: "a string",
                found: other.kind_name(),
            }),
        },
        Builtin::ConcWith(first) => match arg {
            Value::Str(second) => Ok(Value::Str(first + &second)),
            other => Err(RuntimeError::TypeMismatch {
                op: "Conc",
                expected: "a string",
                found: other.kind_name(),
            }),
        },
        Builtin::ItoS => match arg {
            Value::Int(n) => Ok(Value::Str(n.to_string())),
            other => Err(RuntimeError::TypeMismatch {
                op: "ItoS",
                expected: "an integer",
                found: other.kind_name(),
            }),
        },
    }
}
