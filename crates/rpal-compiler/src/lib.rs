#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! RPAL front-end: lexer, parser, standardizer, and flattener.
//!
//! The pipeline turns source text into the control structures executed by
//! the CSE machine:
//! - `lexer` - logos token table
//! - `ast` - arena-backed syntax tree with the dotted dump format
//! - `parser` - recursive descent over the RPAL grammar
//! - `standardize` - AST → standard tree rewriter
//! - `flatten` - standard tree → δ control structures
//! - `diagnostics` - spans and source-snippet rendering

pub mod ast;
pub mod diagnostics;
pub mod flatten;
pub mod lexer;
pub mod parser;
pub mod standardize;


pub use ast::Ast;
pub use diagnostics::{Diagnostic, DiagnosticPrinter, Span};
pub use flatten::FlattenError;
pub use rpal_control::Program;
pub use standardize::StandardizeError;

/// Errors from the front-end pipeline.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Lexical or syntax error anchored to a source span.
    #[error("{0}")]
    Syntax(#[from] Diagnostic),

    /// Invariant violation while standardizing; indicates a parser bug.
    #[error("internal error: {0}")]
    Standardize(#[from] StandardizeError),

    /// Malformed literal or unexpected node while emitting control structures.
    #[error("{0}")]
    Flatten(#[from] FlattenError),
}

/// Result type for front-end operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Parse source text into an abstract syntax tree.
pub fn parse(source: &str) -> Result<Ast> {
    Ok(parser::parse(source)?)
}

/// Parse and standardize, yielding the standard tree.
pub fn standard_tree(source: &str) -> Result<Ast> {
    let mut ast = parser::parse(source)?;
    standardize::standardize(&mut ast)?;
    Ok(ast)
}

/// Run the whole front-end: lex, parse, standardize, flatten.
pub fn compile(source: &str) -> Result<Program> {
    let mut ast = parser::parse(source)?;
    standardize::standardize(&mut ast)?;
    Ok(flatten::flatten(&ast)?)
}
