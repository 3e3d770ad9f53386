//! Spans and diagnostic rendering.
//!
//! Lex and parse errors carry a byte span into the source; the printer
//! renders them with a source snippet via `annotate-snippets`.

use std::fmt;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

/// A byte range into the source text.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span at a single offset (e.g. end of input).
    pub fn point(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// A single error message anchored to a source span.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
#[error("{message}")]
pub struct Diagnostic {
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }

    pub fn printer(&self) -> DiagnosticPrinter<'_, '_> {
        DiagnosticPrinter::new(self)
    }
}

/// Builder-pattern printer for rendering a diagnostic.
pub struct DiagnosticPrinter<'d, 's> {
    diagnostic: &'d Diagnostic,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticPrinter<'d, 's> {
    pub fn new(diagnostic: &'d Diagnostic) -> Self {
        Self {
            diagnostic,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl fmt::Write) -> fmt::Result {
        let Some(source) = self.source else {
            return write!(w, "{}", self.diagnostic);
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let range = adjust_range(self.diagnostic.span, source.len());
        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(range)
                .label(&self.diagnostic.message),
        );

        if let Some(p) = self.path {
            snippet = snippet.path(p);
        }

        let report = [Level::ERROR
            .primary_title(&self.diagnostic.message)
            .element(snippet)];

        write!(w, "{}", renderer.render(&report))
    }
}

/// Widen empty spans so the annotation has something to point at.
fn adjust_range(span: Span, limit: usize) -> std::ops::Range<usize> {
    if span.start == span.end {
        return span.start..(span.start + 1).min(limit);
    }
    span.start..span.end
}
