//! AST → standard tree rewriter.
//!
//! A bottom-up pass that eliminates the syntactic binding forms in favor
//! of the minimal combinator set (`gamma`, `lambda`, `=`, `Y*`). Each rule
//! fires after its children are already standard, so the shapes it
//! destructures are guaranteed by the earlier rewrites.

use thiserror::Error;

use crate::ast::{Ast, NodeId, NodeKind};

/// Invariant violation during standardization. The parser only produces
/// shapes these rewrites accept, so any of these indicates a bug rather
/// than bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StandardizeError {
    #[error("`{construct}` did not standardize to a binding")]
    NotABinding { construct: &'static str },

    #[error("`{construct}` has {found} children, expected {expected}")]
    WrongArity {
        construct: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Rewrite the tree in place into its standard form.
pub fn standardize(ast: &mut Ast) -> Result<(), StandardizeError> {
    standardize_node(ast, ast.root())
}

fn standardize_node(ast: &mut Ast, id: NodeId) -> Result<(), StandardizeError> {
    for child in ast.children(id).to_vec() {
        standardize_node(ast, child)?;
    }

    match ast.kind(id) {
        NodeKind::Let => rewrite_let(ast, id),
        NodeKind::Where => rewrite_where(ast, id),
        NodeKind::FcnForm => rewrite_fcn_form(ast, id),
        NodeKind::Lambda => rewrite_lambda(ast, id),
        NodeKind::Within => rewrite_within(ast, id),
        NodeKind::At => rewrite_at(ast, id),
        NodeKind::And => rewrite_and(ast, id),
        NodeKind::Rec => rewrite_rec(ast, id),
        _ => Ok(()),
    }
}

/// Split an already-standardized definition into its name and value.
fn binding_parts(
    ast: &Ast,
    def: NodeId,
    construct: &'static str,
) -> Result<(NodeId, NodeId), StandardizeError> {
    if *ast.kind(def) != NodeKind::Bind {
        return Err(StandardizeError::NotABinding { construct });
    }
    match ast.children(def) {
        &[name, value] => Ok((name, value)),
        children => Err(StandardizeError::WrongArity {
            construct,
            expected: 2,
            found: children.len(),
        }),
    }
}

fn child_pair(
    ast: &Ast,
    id: NodeId,
    construct: &'static str,
) -> Result<(NodeId, NodeId), StandardizeError> {
    match ast.children(id) {
        &[a, b] => Ok((a, b)),
        children => Err(StandardizeError::WrongArity {
            construct,
            expected: 2,
            found: children.len(),
        }),
    }
}

/// `let (= X P) E  =>  gamma (lambda X E) P`
fn rewrite_let(ast: &mut Ast, id: NodeId) -> Result<(), StandardizeError> {
    let (def, body) = child_pair(ast, id, "let")?;
    let (name, value) = binding_parts(ast, def, "let")?;

    let lambda = ast.push(NodeKind::Lambda, vec![name, body]);
    let node = ast.node_mut(id);
    node.kind = NodeKind::Gamma;
    node.children = vec![lambda, value];
    Ok(())
}

/// `where E (= X P)  =>  gamma (lambda X E) P`
fn rewrite_where(ast: &mut Ast, id: NodeId) -> Result<(), StandardizeError> {
    let (body, def) = child_pair(ast, id, "where")?;
    let (name, value) = binding_parts(ast, def, "where")?;

    let lambda = ast.push(NodeKind::Lambda, vec![name, body]);
    let node = ast.node_mut(id);
    node.kind = NodeKind::Gamma;
    node.children = vec![lambda, value];
    Ok(())
}

/// `fcn_form F V1 … Vn E  =>  = F (lambda V1 (… (lambda Vn E)))`
fn rewrite_fcn_form(ast: &mut Ast, id: NodeId) -> Result<(), StandardizeError> {
    let children = ast.children(id).to_vec();
    if children.len() < 3 {
        return Err(StandardizeError::WrongArity {
            construct: "fcn_form",
            expected: 3,
            found: children.len(),
        });
    }

    let name = children[0];
    let body = curry(ast, &children[1..children.len() - 1], children[children.len() - 1]);
    let node = ast.node_mut(id);
    node.kind = NodeKind::Bind;
    node.children = vec![name, body];
    Ok(())
}

/// Multi-parameter `lambda V1 … Vn E` curries into a single-parameter chain.
fn rewrite_lambda(ast: &mut Ast, id: NodeId) -> Result<(), StandardizeError> {
    let children = ast.children(id).to_vec();
    if children.len() < 2 {
        return Err(StandardizeError::WrongArity {
            construct: "lambda",
            expected: 2,
            found: children.len(),
        });
    }
    if children.len() == 2 {
        return Ok(());
    }

    let body = curry(ast, &children[1..children.len() - 1], children[children.len() - 1]);
    let node = ast.node_mut(id);
    node.children = vec![children[0], body];
    Ok(())
}

/// Wrap `body` in nested single-parameter lambdas, innermost last.
fn curry(ast: &mut Ast, params: &[NodeId], body: NodeId) -> NodeId {
    let mut result = body;
    for &param in params.iter().rev() {
        result = ast.push(NodeKind::Lambda, vec![param, result]);
    }
    result
}

/// `within (= X1 E1) (= X2 E2)  =>  = X2 (gamma (lambda X1 E2) E1)`
fn rewrite_within(ast: &mut Ast, id: NodeId) -> Result<(), StandardizeError> {
    let (outer, inner) = child_pair(ast, id, "within")?;
    let (x1, e1) = binding_parts(ast, outer, "within")?;
    let (x2, e2) = binding_parts(ast, inner, "within")?;

    let lambda = ast.push(NodeKind::Lambda, vec![x1, e2]);
    let gamma = ast.push(NodeKind::Gamma, vec![lambda, e1]);
    let node = ast.node_mut(id);
    node.kind = NodeKind::Bind;
    node.children = vec![x2, gamma];
    Ok(())
}

/// `@ E1 N E2  =>  gamma (gamma N E1) E2`
fn rewrite_at(ast: &mut Ast, id: NodeId) -> Result<(), StandardizeError> {
    let children = ast.children(id).to_vec();
    let &[e1, n, e2] = children.as_slice() else {
        return Err(StandardizeError::WrongArity {
            construct: "@",
            expected: 3,
            found: children.len(),
        });
    };

    let inner = ast.push(NodeKind::Gamma, vec![n, e1]);
    let node = ast.node_mut(id);
    node.kind = NodeKind::Gamma;
    node.children = vec![inner, e2];
    Ok(())
}

/// `and (= X1 E1) … (= Xn En)  =>  = (, X1 … Xn) (tau E1 … En)`
///
/// The left side is a comma list so the enclosing binder receives a tuple
/// parameter.
fn rewrite_and(ast: &mut Ast, id: NodeId) -> Result<(), StandardizeError> {
    let defs = ast.children(id).to_vec();
    let mut names = Vec::with_capacity(defs.len());
    let mut values = Vec::with_capacity(defs.len());
    for def in defs {
        let (name, value) = binding_parts(ast, def, "and")?;
        names.push(name);
        values.push(value);
    }

    let comma = ast.push(NodeKind::Comma, names);
    let tau = ast.push(NodeKind::Tau, values);
    let node = ast.node_mut(id);
    node.kind = NodeKind::Bind;
    node.children = vec![comma, tau];
    Ok(())
}

/// `rec (= X E)  =>  = X (gamma Y* (lambda X E))`
fn rewrite_rec(ast: &mut Ast, id: NodeId) -> Result<(), StandardizeError> {
    let def = match ast.children(id) {
        &[def] => def,
        children => {
            return Err(StandardizeError::WrongArity {
                construct: "rec",
                expected: 1,
                found: children.len(),
            });
        }
    };
    let (name, value) = binding_parts(ast, def, "rec")?;

    let param = ast.duplicate(name);
    let lambda = ast.push(NodeKind::Lambda, vec![param, value]);
    let ystar = ast.push(NodeKind::Ystar, Vec::new());
    let gamma = ast.push(NodeKind::Gamma, vec![ystar, lambda]);
    let node = ast.node_mut(id);
    node.kind = NodeKind::Bind;
    node.children = vec![name, gamma];
    Ok(())
}
