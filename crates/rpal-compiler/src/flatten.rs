//! Standard tree → control structures.
//!
//! Emission order is dictated by the machine: a δ splices onto control in
//! list order and the machine pops from the right, so a symbol is emitted
//! before the operands it consumes, and operands pop in emission order.
//! Binary rators therefore emit right-then-left (the right operand pops
//! first), `gamma` emits rator-then-rand, and `tau` emits its elements
//! reversed so the first value popped is the last element.

use thiserror::Error;

use rpal_control::{BinaryOp, ControlOp, DeltaId, Literal, Program, UnaryOp};

use crate::ast::{Ast, CompareOp, NodeId, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlattenError {
    #[error("integer literal `{0}` is out of range")]
    IntOutOfRange(String),

    /// A node kind that cannot appear in a standardized tree.
    #[error("unexpected `{0}` node in the standardized tree")]
    UnexpectedNode(&'static str),
}

/// Linearize a standard tree into δ blocks; block 0 is the entry.
pub fn flatten(ast: &Ast) -> Result<Program, FlattenError> {
    let mut flattener = Flattener {
        ast,
        program: Program::new(),
    };
    let entry = flattener.program.alloc();
    flattener.walk(ast.root(), entry)?;
    Ok(flattener.program)
}

struct Flattener<'a> {
    ast: &'a Ast,
    program: Program,
}

impl Flattener<'_> {
    fn emit(&mut self, delta: DeltaId, op: ControlOp) {
        self.program.block_mut(delta).push(op);
    }

    fn walk(&mut self, id: NodeId, delta: DeltaId) -> Result<(), FlattenError> {
        let ast = self.ast;
        match ast.kind(id) {
            NodeKind::Lambda => {
                let &[param, body] = ast.children(id) else {
                    return Err(FlattenError::UnexpectedNode("lambda"));
                };
                let params = self.param_names(param)?;
                let body_delta = self.program.alloc();
                self.emit(
                    delta,
                    ControlOp::Lambda {
                        params,
                        body: body_delta,
                    },
                );
                self.walk(body, body_delta)
            }
            NodeKind::Cond => {
                let &[cond, then_arm, else_arm] = ast.children(id) else {
                    return Err(FlattenError::UnexpectedNode("->"));
                };
                let then_delta = self.program.alloc();
                let else_delta = self.program.alloc();
                self.walk(then_arm, then_delta)?;
                self.walk(else_arm, else_delta)?;
                self.emit(delta, ControlOp::Delta(then_delta));
                self.emit(delta, ControlOp::Delta(else_delta));
                self.emit(delta, ControlOp::Beta);
                self.walk(cond, delta)
            }
            NodeKind::Gamma => {
                let &[rator, rand] = ast.children(id) else {
                    return Err(FlattenError::UnexpectedNode("gamma"));
                };
                self.emit(delta, ControlOp::Gamma);
                self.walk(rator, delta)?;
                self.walk(rand, delta)
            }
            NodeKind::Tau => {
                let children = ast.children(id).to_vec();
                self.emit(delta, ControlOp::Tau(children.len()));
                for &element in children.iter().rev() {
                    self.walk(element, delta)?;
                }
                Ok(())
            }
            NodeKind::Or => self.binary(id, delta, BinaryOp::Or),
            NodeKind::Amp => self.binary(id, delta, BinaryOp::And),
            NodeKind::Aug => self.binary(id, delta, BinaryOp::Aug),
            NodeKind::Add => self.binary(id, delta, BinaryOp::Add),
            NodeKind::Sub => self.binary(id, delta, BinaryOp::Sub),
            NodeKind::Mul => self.binary(id, delta, BinaryOp::Mul),
            NodeKind::Div => self.binary(id, delta, BinaryOp::Div),
            NodeKind::Pow => self.binary(id, delta, BinaryOp::Pow),
            NodeKind::Compare(op) => self.binary(id, delta, compare_op(*op)),
            NodeKind::Not => self.unary(id, delta, UnaryOp::Not),
            NodeKind::Neg => self.unary(id, delta, UnaryOp::Neg),
            NodeKind::Id(name) => {
                let name = name.clone();
                self.emit(delta, ControlOp::Name(name));
                Ok(())
            }
            NodeKind::Int(lexeme) => {
                let value: i64 = lexeme
                    .parse()
                    .map_err(|_| FlattenError::IntOutOfRange(lexeme.clone()))?;
                self.emit(delta, ControlOp::Lit(Literal::Int(value)));
                Ok(())
            }
            NodeKind::Str(lexeme) => {
                let decoded = decode_string(lexeme);
                self.emit(delta, ControlOp::Lit(Literal::Str(decoded)));
                Ok(())
            }
            NodeKind::True => {
                self.emit(delta, ControlOp::Lit(Literal::Bool(true)));
                Ok(())
            }
            NodeKind::False => {
                self.emit(delta, ControlOp::Lit(Literal::Bool(false)));
                Ok(())
            }
            NodeKind::Nil => {
                self.emit(delta, ControlOp::Lit(Literal::Nil));
                Ok(())
            }
            NodeKind::Dummy => {
                self.emit(delta, ControlOp::Lit(Literal::Dummy));
                Ok(())
            }
            NodeKind::Ystar => {
                self.emit(delta, ControlOp::Ystar);
                Ok(())
            }
            NodeKind::Let => Err(FlattenError::UnexpectedNode("let")),
            NodeKind::Where => Err(FlattenError::UnexpectedNode("where")),
            NodeKind::Within => Err(FlattenError::UnexpectedNode("within")),
            NodeKind::And => Err(FlattenError::UnexpectedNode("and")),
            NodeKind::Rec => Err(FlattenError::UnexpectedNode("rec")),
            NodeKind::Bind => Err(FlattenError::UnexpectedNode("=")),
            NodeKind::FcnForm => Err(FlattenError::UnexpectedNode("function_form")),
            NodeKind::At => Err(FlattenError::UnexpectedNode("@")),
            NodeKind::Comma => Err(FlattenError::UnexpectedNode(",")),
            NodeKind::Unit => Err(FlattenError::UnexpectedNode("()")),
        }
    }

    fn binary(&mut self, id: NodeId, delta: DeltaId, op: BinaryOp) -> Result<(), FlattenError> {
        let &[lhs, rhs] = self.ast.children(id) else {
            return Err(FlattenError::UnexpectedNode(op.name()));
        };
        self.emit(delta, ControlOp::Binary(op));
        self.walk(rhs, delta)?;
        self.walk(lhs, delta)
    }

    fn unary(&mut self, id: NodeId, delta: DeltaId, op: UnaryOp) -> Result<(), FlattenError> {
        let &[operand] = self.ast.children(id) else {
            return Err(FlattenError::UnexpectedNode(op.name()));
        };
        self.emit(delta, ControlOp::Unary(op));
        self.walk(operand, delta)
    }

    /// Formal parameters of a lambda: a single name, a comma list of
    /// names (tuple parameter), or `()` for none.
    fn param_names(&self, param: NodeId) -> Result<Vec<String>, FlattenError> {
        match self.ast.kind(param) {
            NodeKind::Id(name) => Ok(vec![name.clone()]),
            NodeKind::Unit => Ok(Vec::new()),
            NodeKind::Comma => self
                .ast
                .children(param)
                .iter()
                .map(|&child| match self.ast.kind(child) {
                    NodeKind::Id(name) => Ok(name.clone()),
                    _ => Err(FlattenError::UnexpectedNode("parameter")),
                })
                .collect(),
            _ => Err(FlattenError::UnexpectedNode("parameter")),
        }
    }
}

fn compare_op(op: CompareOp) -> BinaryOp {
    match op {
        CompareOp::Gr => BinaryOp::Gr,
        CompareOp::Ge => BinaryOp::Ge,
        CompareOp::Ls => BinaryOp::Ls,
        CompareOp::Le => BinaryOp::Le,
        CompareOp::Eq => BinaryOp::Eq,
        CompareOp::Ne => BinaryOp::Ne,
    }
}

/// Strip the delimiters and decode escapes. The lexer only guarantees
/// `\'`; `\n`, `\t` and `\\` are decoded as well, anything else keeps its
/// backslash.
fn decode_string(lexeme: &str) -> String {
    let body = &lexeme[1..lexeme.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
