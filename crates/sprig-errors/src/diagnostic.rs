use std::fmt::Display;

use annotate_snippets::{Level, Renderer, Snippet};
use text_size::{TextRange, TextSize};

use crate::{DiagnosticCode, Severity};

/// A diagnostic stored on a syntax node. `offset` is measured from the full
/// start of the node that owns it, so the node can move without the diagnostic
/// being rewritten.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SyntaxDiagnostic {
    offset: TextSize,
    width: TextSize,
    code: DiagnosticCode,
    severity: Severity,
    message: Box<str>,
    suggestion: Option<Box<str>>,
}

impl SyntaxDiagnostic {
    pub fn new(code: DiagnosticCode, range: TextRange, message: impl Into<Box<str>>) -> Self {
        Self {
            offset: range.start(),
            width: range.len(),
            code,
            severity: code.default_severity(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<Box<str>>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Same diagnostic, re-anchored at `offset`.
    pub fn with_offset(&self, offset: TextSize) -> Self {
        Self { offset, ..self.clone() }
    }

    pub fn offset(&self) -> TextSize {
        self.offset
    }

    pub fn width(&self) -> TextSize {
        self.width
    }

    pub fn relative_range(&self) -> TextRange {
        TextRange::at(self.offset, self.width)
    }

    /// Absolute range once the owning node is known to start at `node_start`.
    pub fn range_in(&self, node_start: TextSize) -> TextRange {
        TextRange::at(node_start + self.offset, self.width)
    }

    pub fn code(&self) -> DiagnosticCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }
}

/// Where a diagnostic points in a source text. `line` and `column` are zero
/// based and describe `range.start()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub range: TextRange,
    pub line: u32,
    pub column: u32,
}

/// A diagnostic resolved against a concrete tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    code: DiagnosticCode,
    severity: Severity,
    location: Location,
    message: Box<str>,
    suggestion: Option<Box<str>>,
}

impl Diagnostic {
    pub fn new(
        code: DiagnosticCode,
        severity: Severity,
        location: Location,
        message: impl Into<Box<str>>,
    ) -> Self {
        Self { code, severity, location, message: message.into(), suggestion: None }
    }

    pub fn from_syntax(diagnostic: &SyntaxDiagnostic, location: Location) -> Self {
        Self {
            code: diagnostic.code,
            severity: diagnostic.severity,
            location,
            message: diagnostic.message.clone(),
            suggestion: diagnostic.suggestion.clone(),
        }
    }

    pub fn code(&self) -> DiagnosticCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn range(&self) -> TextRange {
        self.location.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let level = self.severity.level();
        let mut message = level.title(&self.message).id(self.code.as_str()).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(level.span(self.location.range.into()).label("here"))
                .fold(true),
        );

        if let Some(suggestion) = &self.suggestion {
            message = message.footer(Level::Help.title(suggestion));
        }

        renderer.render(message)
    }
}
