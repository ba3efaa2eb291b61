use std::fmt::Display;

use sprig_errors::{DiagnosticCode, SyntaxDiagnostic};
use sprig_tokenizer::{LexedToken, Tokenizer};
use sprig_yellow::factory::{missing_token, skipped_tokens_trivia};
use sprig_yellow::{Parsed, ShapeListBuilder, ShapeNode, SyntaxKind, SyntaxSet};
use text_size::{TextRange, TextSize};

use crate::blender::Blender;

pub(crate) struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    blender: Option<Blender>,
    current: LexedToken,
    /// Tokens given up on, waiting to become leading trivia of the next
    /// token that is consumed.
    skipped: ShapeListBuilder,
    diagnostics: Vec<SyntaxDiagnostic>,
    builders: Vec<ShapeListBuilder>,
    reused_tokens: usize,
    reused_statements: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str, blender: Option<Blender>) -> Self {
        let mut tokenizer = Tokenizer::new(text);
        let mut reused_tokens = 0;
        let current = match blender.as_ref().and_then(|b| b.token_at(TextSize::new(0))) {
            Some(shape) => {
                reused_tokens += 1;
                LexedToken { shape, start: TextSize::new(0) }
            }
            None => tokenizer.next_token(),
        };

        Self {
            tokenizer,
            blender,
            current,
            skipped: ShapeListBuilder::new(),
            diagnostics: Vec::new(),
            builders: Vec::new(),
            reused_tokens,
            reused_statements: 0,
        }
    }

    pub(crate) fn finish(self, root: ShapeNode) -> Parsed {
        debug_assert!(self.skipped.is_empty(), "skipped tokens were never attached");
        tracing::debug!(
            reused_tokens = self.reused_tokens,
            reused_statements = self.reused_statements,
            diagnostics = self.diagnostics.len(),
            "parsed"
        );
        Parsed { root, diagnostics: self.diagnostics }
    }

    #[inline]
    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.current.kind()
    }

    #[inline]
    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    #[inline]
    pub(crate) fn at_set(&self, set: SyntaxSet) -> bool {
        set.contains(self.peek_kind())
    }

    fn token_at(&mut self, position: TextSize) -> LexedToken {
        if let Some(shape) = self.blender.as_ref().and_then(|b| b.token_at(position)) {
            self.reused_tokens += 1;
            return LexedToken { shape, start: position };
        }

        if self.tokenizer.offset() == position {
            self.tokenizer.next_token()
        } else {
            self.tokenizer.lex_at(position)
        }
    }

    fn advance(&mut self) -> ShapeNode {
        let next = self.token_at(self.current.end());
        std::mem::replace(&mut self.current, next).shape
    }

    /// Consumes the current token. Pending skipped tokens become its leading
    /// trivia.
    pub(crate) fn bump(&mut self) -> ShapeNode {
        let token = self.advance();
        if self.skipped.is_empty() {
            return token;
        }
        token.prepend_leading_trivia(&self.skipped.take_list())
    }

    /// Consumes a token of `kind`, or stands in a missing one.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> ShapeNode {
        if self.at(kind) {
            return self.bump();
        }
        let diagnostic = self.unexpected(kind.description());
        missing_token(kind).set_diagnostics(vec![diagnostic])
    }

    /// A missing `kind` reported as "expected `what`".
    pub(crate) fn missing(&mut self, kind: SyntaxKind, what: &str) -> ShapeNode {
        let range = self.current_range();
        let diagnostic =
            SyntaxDiagnostic::new(DiagnosticCode::ExpectedToken, range, format!("expected {what}"));
        missing_token(kind).set_diagnostics(vec![diagnostic])
    }

    /// "unexpected token X, expected Y" for a missing token, placed on the
    /// current token but measured from where the missing token will sit.
    fn unexpected(&self, expected: impl Display) -> SyntaxDiagnostic {
        let range = self.current_range();
        let message = if self.at(SyntaxKind::EOF) {
            format!("expected {expected} at end of input")
        } else {
            format!("unexpected token {}, expected {expected}", self.peek_kind().description())
        };
        SyntaxDiagnostic::new(DiagnosticCode::UnexpectedToken, range, message)
    }

    /// Range of the current token's text relative to the position a missing
    /// token inserted now would have.
    fn current_range(&self) -> TextRange {
        let skipped: TextSize = self.skipped.items().iter().map(ShapeNode::full_width).sum();
        let lead = skipped + self.current.shape.leading_trivia_width();
        TextRange::at(lead, TextSize::of(self.current.shape.text()))
    }

    /// Turns the current token into skipped trivia.
    pub(crate) fn skip(&mut self) {
        let start = self.current.start + self.current.shape.leading_trivia_width();
        let kind = self.peek_kind();
        let token = self.advance();

        if kind != SyntaxKind::BAD_TOKEN {
            let range = TextRange::at(start, TextSize::of(token.text()));
            let message = format!("unexpected token {}", kind.description());
            self.error(SyntaxDiagnostic::new(DiagnosticCode::UnexpectedToken, range, message));
        }
        self.skipped.push(skipped_tokens_trivia(&token));
    }

    /// Records a diagnostic with an absolute range.
    pub(crate) fn error(&mut self, diagnostic: SyntaxDiagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// A statement from the previous tree that starts here, if any. Only
    /// asked at statement positions.
    pub(crate) fn reuse_statement(&mut self) -> Option<ShapeNode> {
        if !self.skipped.is_empty() {
            return None;
        }

        let start = self.current.start;
        let statement = self.blender.as_ref()?.statement_at(start)?;
        self.current = self.token_at(start + statement.full_width());
        self.reused_statements += 1;
        Some(statement)
    }

    pub(crate) fn builder(&mut self) -> ShapeListBuilder {
        self.builders.pop().unwrap_or_default()
    }

    pub(crate) fn recycle(&mut self, mut builder: ShapeListBuilder) {
        builder.clear();
        self.builders.push(builder);
    }

    /// Builds a node around a list taken from `builder`, which goes back to
    /// the pool.
    pub(crate) fn finish_list(&mut self, mut builder: ShapeListBuilder) -> Option<ShapeNode> {
        let list = builder.take_list();
        self.recycle(builder);
        list.into_slot()
    }
}
