//! Token table for the RPAL lexer.
//!
//! Keywords get dedicated variants; maximal munch makes an identifier that
//! merely starts with a keyword win by length, which is exactly the
//! word-boundary rule. Operators lex as maximal runs over the historical
//! operator character class. The class includes both quote
//! characters, so an unmatched `'` becomes (part of) an operator run and
//! is rejected by the parser rather than the lexer.

use logos::Logos;

use crate::diagnostics::{Diagnostic, Span};

/// One lexical token kind; payload variants borrow their lexeme.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(test, derive(serde::Serialize))]
#[logos(skip(r"[ \t\r\n]+|//[^\n]*", allow_greedy = true, priority = 3))]
pub enum TokenKind<'src> {
    #[token("let")]
    Let,

    #[token("in")]
    In,

    #[token("fn")]
    Fn,

    #[token("where")]
    Where,

    #[token("aug")]
    Aug,

    #[token("or")]
    Or,

    #[token("not")]
    Not,

    #[token("gr")]
    Gr,

    #[token("ge")]
    Ge,

    #[token("ls")]
    Ls,

    #[token("le")]
    Le,

    #[token("eq")]
    Eq,

    #[token("ne")]
    Ne,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("nil")]
    Nil,

    #[token("dummy")]
    Dummy,

    #[token("within")]
    Within,

    #[token("and")]
    And,

    #[token("rec")]
    Rec,

    /// String literal; the lexeme retains its delimiters.
    #[regex(r"'(?:\\'|[^'])*'", priority = 10)]
    Str(&'src str),

    #[regex(r"[A-Za-z][A-Za-z0-9_]*")]
    Ident(&'src str),

    #[regex(r"[0-9]+")]
    Int(&'src str),

    /// Maximal run of operator characters.
    #[regex(r#"[+\-*<>&.@/:=~|$#!%^_\[\]{}"'?]+"#)]
    Op(&'src str),

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(";")]
    Semi,

    #[token(",")]
    Comma,
}

impl<'src> TokenKind<'src> {
    /// True when this token is the given operator run.
    pub fn is_op(&self, text: &str) -> bool {
        matches!(self, TokenKind::Op(s) if *s == text)
    }

    /// Human description for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Str(s) => format!("string {s}"),
            TokenKind::Ident(s) => format!("identifier `{s}`"),
            TokenKind::Int(s) => format!("integer `{s}`"),
            TokenKind::Op(s) => format!("`{s}`"),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::Semi => "`;`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            keyword => format!("`{}`", keyword_text(keyword)),
        }
    }
}

fn keyword_text(kind: &TokenKind<'_>) -> &'static str {
    match kind {
        TokenKind::Let => "let",
        TokenKind::In => "in",
        TokenKind::Fn => "fn",
        TokenKind::Where => "where",
        TokenKind::Aug => "aug",
        TokenKind::Or => "or",
        TokenKind::Not => "not",
        TokenKind::Gr => "gr",
        TokenKind::Ge => "ge",
        TokenKind::Ls => "ls",
        TokenKind::Le => "le",
        TokenKind::Eq => "eq",
        TokenKind::Ne => "ne",
        TokenKind::True => "true",
        TokenKind::False => "false",
        TokenKind::Nil => "nil",
        TokenKind::Dummy => "dummy",
        TokenKind::Within => "within",
        TokenKind::And => "and",
        TokenKind::Rec => "rec",
        _ => unreachable!("not a keyword"),
    }
}

/// A token with its source span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind<'src>,
    pub span: Span,
}

/// Tokenize the whole source.
///
/// Adjacent unlexable bytes coalesce into a single diagnostic naming the
/// offending run; the first such run aborts lexing.
pub fn lex(source: &str) -> Result<Vec<Token<'_>>, Diagnostic> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();
    let mut bad: Option<Span> = None;

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        match result {
            Ok(kind) => {
                if let Some(run) = bad.take() {
                    return Err(untokenizable(source, run));
                }
                tokens.push(Token { kind, span });
            }
            Err(()) => match &mut bad {
                None => bad = Some(span),
                Some(run) => run.end = span.end,
            },
        }
    }

    if let Some(run) = bad.take() {
        return Err(untokenizable(source, run));
    }

    Ok(tokens)
}

fn untokenizable(source: &str, span: Span) -> Diagnostic {
    let fragment = &source[span.start..span.end];
    Diagnostic::new(span, format!("cannot tokenize input `{fragment}`"))
}
