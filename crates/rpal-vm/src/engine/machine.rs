//! The control-stack-environment evaluation loop.

use std::io::Write;

use rpal_control::{BinaryOp, ControlOp, DeltaId, Program, UnaryOp};

use super::env::{EnvId, EnvTree};
use super::error::RuntimeError;
use super::intrinsics;
use super::value::{Closure, Value};

/// An item on the control stack: a pending symbol or an environment
/// marker delimiting a call.
#[derive(Clone, Debug)]
enum Ctrl {
    Op(ControlOp),
    Mark(EnvId),
}

/// An item on the value stack.
#[derive(Clone, Debug)]
enum Slot {
    Value(Value),
    Mark(EnvId),
}

/// The CSE machine. Created over an immutable program; `run` drives it to
/// completion.
pub struct Machine<'p, W> {
    program: &'p Program,
    control: Vec<Ctrl>,
    stack: Vec<Slot>,
    envs: EnvTree,
    /// Live environments, current on the right.
    env_stack: Vec<EnvId>,
    out: W,
}

impl<'p, W: Write> Machine<'p, W> {
    pub fn new(program: &'p Program, out: W) -> Self {
        let (envs, primitive) = EnvTree::with_primitives();
        let mut machine = Machine {
            program,
            control: vec![Ctrl::Mark(primitive)],
            stack: vec![Slot::Mark(primitive)],
            envs,
            env_stack: vec![primitive],
            out,
        };
        machine.splice(DeltaId(0));
        machine
    }

    /// Run to completion; the final stack value is the program result.
    pub fn run(mut self) -> Result<Value, RuntimeError> {
        while let Some(item) = self.control.pop() {
            match item {
                Ctrl::Op(op) => self.step(op)?,
                Ctrl::Mark(env) => self.exit_env(env)?,
            }
        }
        match self.stack.pop() {
            Some(Slot::Value(value)) => Ok(value),
            _ => Err(RuntimeError::MalformedState("no result on the stack")),
        }
    }

    fn step(&mut self, op: ControlOp) -> Result<(), RuntimeError> {
        match op {
            ControlOp::Lit(lit) => {
                self.push(Value::from_literal(lit));
                Ok(())
            }
            ControlOp::Name(name) => {
                let value = self
                    .envs
                    .lookup(self.current_env()?, &name)
                    .ok_or(RuntimeError::UnboundIdentifier(name))?;
                self.push(value);
                Ok(())
            }
            ControlOp::Lambda { params, body } => {
                let env = self.current_env()?;
                self.push(Value::Closure(Closure { params, body, env }));
                Ok(())
            }
            ControlOp::Gamma => self.apply(),
            ControlOp::Beta => self.branch(),
            ControlOp::Tau(n) => {
                let mut elements = Vec::with_capacity(n);
                for _ in 0..n {
                    elements.push(self.pop_value()?);
                }
                // Popped last-element-first; restore source order.
                elements.reverse();
                self.push(Value::Tuple(elements));
                Ok(())
            }
            ControlOp::Ystar => {
                self.push(Value::Ystar);
                Ok(())
            }
            ControlOp::Delta(_) => Err(RuntimeError::MalformedState(
                "branch reference outside a conditional",
            )),
            ControlOp::Unary(op) => self.unary(op),
            ControlOp::Binary(op) => self.binary(op),
        }
    }

    // ------------------------------------------------------------------
    // Application
    // ------------------------------------------------------------------

    fn apply(&mut self) -> Result<(), RuntimeError> {
        let rator = self.pop_value()?;
        let rand = self.pop_value()?;
        match rator {
            Value::Closure(closure) => self.call(closure, rand),
            Value::Eta(closure) => {
                // η A unfolds to f (η f) A: re-queue the argument, the
                // eta, and the underlying closure, under two gammas.
                self.push(rand);
                self.push(Value::Eta(closure.clone()));
                self.push(Value::Closure(closure));
                self.control.push(Ctrl::Op(ControlOp::Gamma));
                self.control.push(Ctrl::Op(ControlOp::Gamma));
                Ok(())
            }
            Value::Ystar => match rand {
                Value::Closure(closure) => {
                    self.push(Value::Eta(closure));
                    Ok(())
                }
                other => Err(RuntimeError::TypeMismatch {
                    op: "Y*",
                    expected: "a lambda",
                    found: other.kind_name(),
                }),
            },
            Value::Tuple(elements) => self.select(elements, rand),
            Value::Builtin(builtin) => {
                let result = intrinsics::apply(builtin, rand, &mut self.out)?;
                self.push(result);
                Ok(())
            }
            other => Err(RuntimeError::NotCallable(other.kind_name())),
        }
    }

    fn call(&mut self, closure: Closure, rand: Value) -> Result<(), RuntimeError> {
        let env = self.envs.push(closure.env);
        match closure.params.as_slice() {
            [] => {}
            [param] => self.envs.bind(env, param.clone(), rand),
            params => match rand {
                Value::Tuple(elements) if elements.len() == params.len() => {
                    for (param, value) in params.iter().zip(elements) {
                        self.envs.bind(env, param.clone(), value);
                    }
                }
                Value::Tuple(elements) => {
                    return Err(RuntimeError::TupleArityMismatch {
                        expected: params.len(),
                        found: elements.len(),
                    });
                }
                other => {
                    return Err(RuntimeError::TypeMismatch {
                        op: "tuple parameter",
                        expected: "a tuple argument",
                        found: other.kind_name(),
                    });
                }
            },
        }

        self.stack.push(Slot::Mark(env));
        self.env_stack.push(env);
        self.control.push(Ctrl::Mark(env));
        self.splice(closure.body);
        Ok(())
    }

    /// 1-based tuple selection.
    fn select(&mut self, elements: Vec<Value>, rand: Value) -> Result<(), RuntimeError> {
        let index = match rand {
            Value::Int(i) => i,
            other => {
                return Err(RuntimeError::TypeMismatch {
                    op: "tuple selection",
                    expected: "an integer",
                    found: other.kind_name(),
                });
            }
        };
        if index < 1 || index as usize > elements.len() {
            return Err(RuntimeError::TupleIndexOutOfRange {
                index,
                order: elements.len(),
            });
        }
        self.push(elements[index as usize - 1].clone());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Control flow
    // ------------------------------------------------------------------

    /// Conditional selection: the else-branch reference is on top of
    /// control, the then-branch beneath it.
    fn branch(&mut self) -> Result<(), RuntimeError> {
        let condition = match self.pop_value()? {
            Value::Bool(b) => b,
            other => {
                return Err(RuntimeError::TypeMismatch {
                    op: "->",
                    expected: "a truthvalue",
                    found: other.kind_name(),
                });
            }
        };
        let else_branch = self.pop_branch()?;
        let then_branch = self.pop_branch()?;
        self.splice(if condition { then_branch } else { else_branch });
        Ok(())
    }

    fn pop_branch(&mut self) -> Result<DeltaId, RuntimeError> {
        match self.control.pop() {
            Some(Ctrl::Op(ControlOp::Delta(id))) => Ok(id),
            _ => Err(RuntimeError::MalformedState(
                "conditional without branch references",
            )),
        }
    }

    /// An environment marker resurfaced: the call it delimits is done.
    fn exit_env(&mut self, env: EnvId) -> Result<(), RuntimeError> {
        let value = self.pop_value()?;
        match self.stack.pop() {
            Some(Slot::Mark(mark)) if mark == env => {}
            _ => {
                return Err(RuntimeError::MalformedState(
                    "environment marker out of place",
                ));
            }
        }
        self.envs.mark_removed(env);
        while let Some(&top) = self.env_stack.last() {
            if self.envs.is_removed(top) {
                self.env_stack.pop();
            } else {
                break;
            }
        }
        self.stack.push(Slot::Value(value));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Operators
    // ------------------------------------------------------------------

    fn unary(&mut self, op: UnaryOp) -> Result<(), RuntimeError> {
        let operand = self.pop_value()?;
        let result = match (op, operand) {
            (UnaryOp::Neg, Value::Int(n)) => {
                Value::Int(n.checked_neg().ok_or(RuntimeError::Overflow("neg"))?)
            }
            (UnaryOp::Not, Value::Bool(b)) => Value::Bool(!b),
            (UnaryOp::Neg, other) => {
                return Err(RuntimeError::TypeMismatch {
                    op: "neg",
                    expected: "an integer",
                    found: other.kind_name(),
                });
            }
            (UnaryOp::Not, other) => {
                return Err(RuntimeError::TypeMismatch {
                    op: "not",
                    expected: "a truthvalue",
                    found: other.kind_name(),
                });
            }
        };
        self.push(result);
        Ok(())
    }

    fn binary(&mut self, op: BinaryOp) -> Result<(), RuntimeError> {
        let rhs = self.pop_value()?;
        let lhs = self.pop_value()?;
        let result = match op {
            BinaryOp::Add => Value::Int(arith(op, lhs, rhs, i64::checked_add)?),
            BinaryOp::Sub => Value::Int(arith(op, lhs, rhs, i64::checked_sub)?),
            BinaryOp::Mul => Value::Int(arith(op, lhs, rhs, i64::checked_mul)?),
            BinaryOp::Div => {
                let (a, b) = int_pair(op, lhs, rhs)?;
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                Value::Int(a.checked_div(b).ok_or(RuntimeError::Overflow("/"))?)
            }
            BinaryOp::Pow => {
                let (base, exponent) = int_pair(op, lhs, rhs)?;
                if exponent < 0 {
                    return Err(RuntimeError::NegativeExponent);
                }
                let exponent =
                    u32::try_from(exponent).map_err(|_| RuntimeError::Overflow("**"))?;
                Value::Int(
                    base.checked_pow(exponent)
                        .ok_or(RuntimeError::Overflow("**"))?,
                )
            }
            BinaryOp::Gr => Value::Bool(int_pair(op, lhs, rhs).map(|(a, b)| a > b)?),
            BinaryOp::Ge => Value::Bool(int_pair(op, lhs, rhs).map(|(a, b)| a >= b)?),
            BinaryOp::Ls => Value::Bool(int_pair(op, lhs, rhs).map(|(a, b)| a < b)?),
            BinaryOp::Le => Value::Bool(int_pair(op, lhs, rhs).map(|(a, b)| a <= b)?),
            BinaryOp::Eq => Value::Bool(equal(op, lhs, rhs)?),
            BinaryOp::Ne => Value::Bool(!equal(op, lhs, rhs)?),
            BinaryOp::Or => {
                let (a, b) = bool_pair(op, lhs, rhs)?;
                Value::Bool(a || b)
            }
            BinaryOp::And => {
                let (a, b) = bool_pair(op, lhs, rhs)?;
                Value::Bool(a && b)
            }
            BinaryOp::Aug => Value::Tuple(augment(lhs, rhs)),
        };
        self.push(result);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stack and environment access
    // ------------------------------------------------------------------

    fn push(&mut self, value: Value) {
        self.stack.push(Slot::Value(value));
    }

    fn pop_value(&mut self) -> Result<Value, RuntimeError> {
        match self.stack.pop() {
            Some(Slot::Value(value)) => Ok(value),
            Some(Slot::Mark(_)) => Err(RuntimeError::MalformedState(
                "popped an environment marker where a value was expected",
            )),
            None => Err(RuntimeError::MalformedState("value stack underflow")),
        }
    }

    fn current_env(&self) -> Result<EnvId, RuntimeError> {
        self.env_stack
            .last()
            .copied()
            .ok_or(RuntimeError::MalformedState("no live environment"))
    }

    /// Append a δ block to control; its first symbol ends up deepest.
    fn splice(&mut self, delta: DeltaId) {
        self.control.extend(
            self.program
                .block(delta)
                .ops
                .iter()
                .cloned()
                .map(Ctrl::Op),
        );
    }
}

fn arith(
    op: BinaryOp,
    lhs: Value,
    rhs: Value,
    f: impl Fn(i64, i64) -> Option<i64>,
) -> Result<i64, RuntimeError> {
    let (a, b) = int_pair(op, lhs, rhs)?;
    f(a, b).ok_or(RuntimeError::Overflow(op.name()))
}

fn int_pair(op: BinaryOp, lhs: Value, rhs: Value) -> Result<(i64, i64), RuntimeError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok((a, b)),
        (Value::Int(_), other) | (other, _) => Err(RuntimeError::TypeMismatch {
            op: op.name(),
            expected: "integer operands",
            found: other.kind_name(),
        }),
    }
}

fn bool_pair(op: BinaryOp, lhs: Value, rhs: Value) -> Result<(bool, bool), RuntimeError> {
    match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => Ok((a, b)),
        (Value::Bool(_), other) | (other, _) => Err(RuntimeError::TypeMismatch {
            op: op.name(),
            expected: "truthvalue operands",
            found: other.kind_name(),
        }),
    }
}

/// `eq`/`ne` compare integers, strings, and truthvalues of matching type.
fn equal(op: BinaryOp, lhs: Value, rhs: Value) -> Result<bool, RuntimeError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        (Value::Str(a), Value::Str(b)) => Ok(a == b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (lhs, rhs) => {
            let found = match &lhs {
                Value::Int(_) | Value::Str(_) | Value::Bool(_) => rhs.kind_name(),
                _ => lhs.kind_name(),
            };
            Err(RuntimeError::TypeMismatch {
                op: op.name(),
                expected: "two integers, strings or truthvalues",
                found,
            })
        }
    }
}

/// `aug` extends a tuple on the right; a non-tuple left operand forms a
/// pair.
fn augment(lhs: Value, rhs: Value) -> Vec<Value> {
    match lhs {
        Value::Nil => vec![rhs],
        Value::Tuple(mut elements) => {
            elements.push(rhs);
            elements
        }
        other => vec![other, rhs],
    }
}
