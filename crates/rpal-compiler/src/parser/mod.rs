//! Recursive-descent parser over the RPAL grammar.
//!
//! This module holds the parser state machine and low-level operations:
//! token access and lookahead, the post-order node stack, error
//! construction, and the recursion limit. The grammar productions live in
//! `grammar.rs`.
//!
//! The AST is built bottom-up: leaves push themselves onto the node
//! stack, and finishing a production pops its children (leftmost deepest)
//! into a fresh inner node.

mod grammar;

#[cfg(test)]
mod grammar_tests;

use crate::ast::{Ast, Node, NodeId, NodeKind};
use crate::diagnostics::{Diagnostic, Span};
use crate::lexer::{self, Token, TokenKind};

/// Maximum grammar nesting before parsing gives up. Keeps pathological
/// inputs from overflowing the host stack.
const RECURSION_LIMIT: u32 = 512;

/// Parse source text into an [`Ast`], aborting on the first error.
pub fn parse(source: &str) -> Result<Ast, Diagnostic> {
    let tokens = lexer::lex(source)?;
    Parser::new(tokens, source.len()).run()
}

pub(crate) struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    /// Current position in `tokens`. Monotonically increases.
    pos: usize,
    nodes: Vec<Node>,
    /// Post-order build stack of arena indices.
    stack: Vec<NodeId>,
    /// Current grammar nesting depth.
    depth: u32,
    /// Source length, for end-of-input spans.
    eof: usize,
}

impl<'src> Parser<'src> {
    fn new(tokens: Vec<Token<'src>>, eof: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            nodes: Vec::new(),
            stack: Vec::new(),
            depth: 0,
            eof,
        }
    }

    fn run(mut self) -> Result<Ast, Diagnostic> {
        self.parse_expr()?;

        if let Some(token) = self.peek() {
            return Err(Diagnostic::new(
                token.span,
                format!("unexpected {} after the expression", token.kind.describe()),
            ));
        }

        let root = match (self.stack.pop(), self.stack.is_empty()) {
            (Some(root), true) => root,
            _ => {
                return Err(self.error_here("expression did not reduce to a single tree"));
            }
        };
        Ok(Ast::from_parts(self.nodes, root))
    }

    // ------------------------------------------------------------------
    // Token access
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind<'src>> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    /// Lookahead by `n` tokens (0 = current).
    fn nth_kind(&self, n: usize) -> Option<TokenKind<'src>> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn bump(&mut self) -> Option<Token<'src>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: TokenKind<'static>) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn at_op(&self, text: &str) -> bool {
        matches!(self.peek_kind(), Some(kind) if kind.is_op(text))
    }

    /// Consume the current token when it matches.
    fn eat(&mut self, kind: TokenKind<'static>) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_op(&mut self, text: &str) -> bool {
        if self.at_op(text) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume `kind` or fail with `expected` (a human-readable phrase).
    fn expect(
        &mut self,
        kind: TokenKind<'static>,
        expected: &str,
    ) -> Result<(), Diagnostic> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.expected_here(expected))
        }
    }

    fn expect_op(&mut self, text: &str, expected: &str) -> Result<(), Diagnostic> {
        if self.eat_op(text) {
            Ok(())
        } else {
            Err(self.expected_here(expected))
        }
    }

    // ------------------------------------------------------------------
    // Node stack
    // ------------------------------------------------------------------

    fn alloc(&mut self, kind: NodeKind, children: Vec<NodeId>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node { kind, children });
        id
    }

    /// Push a leaf node onto the build stack.
    fn leaf(&mut self, kind: NodeKind) {
        let id = self.alloc(kind, Vec::new());
        self.stack.push(id);
    }

    /// Reduce the top `arity` stack entries into a new inner node.
    fn reduce(&mut self, kind: NodeKind, arity: usize) {
        debug_assert!(self.stack.len() >= arity, "parser stack underflow");
        let split = self.stack.len() - arity;
        let children = self.stack.split_off(split);
        let id = self.alloc(kind, children);
        self.stack.push(id);
    }

    // ------------------------------------------------------------------
    // Errors and limits
    // ------------------------------------------------------------------

    fn here(&self) -> Span {
        self.peek()
            .map(|t| t.span)
            .unwrap_or_else(|| Span::point(self.eof))
    }

    fn error_here(&self, message: impl Into<String>) -> Diagnostic {
        Diagnostic::new(self.here(), message.into())
    }

    /// "expected X" error, naming what is actually there.
    fn expected_here(&self, expected: &str) -> Diagnostic {
        let found = match self.peek() {
            Some(token) => format!("found {}", token.kind.describe()),
            None => "found end of input".to_string(),
        };
        Diagnostic::new(self.here(), format!("expected {expected}, {found}"))
    }

    /// Bump the nesting depth, erroring past the limit. Paired with
    /// [`Parser::leave`].
    fn enter(&mut self) -> Result<(), Diagnostic> {
        self.depth += 1;
        if self.depth > RECURSION_LIMIT {
            return Err(self.error_here("expression is nested too deeply"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}
