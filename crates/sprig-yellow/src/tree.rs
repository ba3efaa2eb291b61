use std::fmt;
use std::sync::Arc;

use sprig_errors::{Diagnostic, SyntaxDiagnostic};
use sprig_text::{SourceText, TextChange, TextChangeRange};
use text_size::TextSize;

use crate::diagnostics::attach_diagnostics;
use crate::shape::ShapeNode;
use crate::view::{ViewNode, ViewToken};

/// The parsing side of a [`SyntaxTree`].
pub trait SyntaxParser {
    fn parse(&self, text: &SourceText) -> Parsed;

    /// Parses `text`, reusing what it can from `old_root`. `changes` describe
    /// how the text of `old_root` became `text`.
    fn reparse(&self, old_root: &ShapeNode, changes: &[TextChangeRange], text: &SourceText)
    -> Parsed;
}

/// A root shape and the diagnostics still to be attached to it. Diagnostic
/// offsets are relative to the root.
#[derive(Clone, Debug)]
pub struct Parsed {
    pub root: ShapeNode,
    pub diagnostics: Vec<SyntaxDiagnostic>,
}

impl Parsed {
    pub fn into_root(self) -> ShapeNode {
        if self.diagnostics.is_empty() {
            return self.root;
        }
        tracing::trace!(count = self.diagnostics.len(), "attaching diagnostics");
        attach_diagnostics(&self.root, self.diagnostics)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeOrigin {
    Fresh,
    Derived { changes: Box<[TextChangeRange]> },
}

/// A parsed file: its text, the root view and the parser to go back to
/// when the text changes.
#[derive(Clone)]
pub struct SyntaxTree {
    text: SourceText,
    root: ViewNode,
    origin: TreeOrigin,
    parser: Arc<dyn SyntaxParser + Send + Sync>,
}

impl SyntaxTree {
    pub fn parse(parser: Arc<dyn SyntaxParser + Send + Sync>, text: impl Into<SourceText>) -> Self {
        let text = text.into();
        let _span = tracing::debug_span!("parse", len = u32::from(text.len())).entered();
        let parsed = parser.parse(&text);
        Self::from_parsed(parser, text, parsed)
    }

    pub fn from_parsed(
        parser: Arc<dyn SyntaxParser + Send + Sync>,
        text: SourceText,
        parsed: Parsed,
    ) -> Self {
        Self::from_root(parser, text, parsed.into_root())
    }

    /// A tree over a root shape whose diagnostics are already attached.
    pub fn from_root(
        parser: Arc<dyn SyntaxParser + Send + Sync>,
        text: SourceText,
        root: ShapeNode,
    ) -> Self {
        debug_assert_eq!(root.full_width(), text.len(), "root does not cover the text");
        Self::new(parser, text, root, TreeOrigin::Fresh)
    }

    fn new(
        parser: Arc<dyn SyntaxParser + Send + Sync>,
        text: SourceText,
        shape: ShapeNode,
        origin: TreeOrigin,
    ) -> Self {
        let root = ViewNode::new_root(shape, text.clone());
        Self { text, root, origin, parser }
    }

    /// A tree for `new_text`, which is this tree's text with `changes`
    /// applied.
    pub fn with_changes(&self, new_text: impl Into<SourceText>, changes: &[TextChangeRange]) -> Self {
        let text = new_text.into();
        let old_len = self.text.len();

        if changes.is_empty() {
            debug_assert_eq!(text, self.text, "no changes but the text differs");
            let shape = self.root.shape().clone();
            return Self::new(self.parser.clone(), text, shape, TreeOrigin::Derived {
                changes: Box::default(),
            });
        }

        let origin = TreeOrigin::Derived { changes: changes.into() };
        let replaces_everything = matches!(changes, [change]
            if change.span() == self.text.full_range() && change.new_len() == text.len());

        let parsed = if replaces_everything {
            tracing::debug!("whole text replaced, parsing from scratch");
            self.parser.parse(&text)
        } else {
            let _span = tracing::debug_span!(
                "reparse",
                changes = changes.len(),
                old_len = u32::from(old_len),
                new_len = u32::from(text.len()),
            )
            .entered();
            self.parser.reparse(self.root.shape(), changes, &text)
        };

        Self::new(self.parser.clone(), text, parsed.into_root(), origin)
    }

    pub fn with_text_changes(&self, changes: &[TextChange]) -> Self {
        let text = self.text.with_changes(changes);
        let ranges: Vec<_> = changes.iter().map(TextChange::to_range).collect();
        self.with_changes(text, &ranges)
    }

    /// Diffs `new_text` against the current text and reparses the difference.
    pub fn with_changed_text(&self, new_text: impl Into<SourceText>) -> Self {
        let text = new_text.into();
        let changes = text.diff(&self.text);
        self.with_changes(text, &changes)
    }

    #[inline]
    pub fn root(&self) -> &ViewNode {
        &self.root
    }

    #[inline]
    pub fn shape(&self) -> &ShapeNode {
        self.root.shape()
    }

    #[inline]
    pub fn text(&self) -> &SourceText {
        &self.text
    }

    #[inline]
    pub fn origin(&self) -> &TreeOrigin {
        &self.origin
    }

    #[track_caller]
    pub fn find_token(&self, position: TextSize) -> ViewToken {
        self.root.find_token(position)
    }

    /// Every diagnostic in the tree, ordered by start offset. For a
    /// left-to-right parser this is discovery order; diagnostics attached
    /// after the parse (skipped tokens) sort in by position too.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.root.diagnostics()
    }

    pub fn tokens(&self) -> impl Iterator<Item = ViewToken> + use<> {
        self.root.descendant_tokens()
    }

    pub fn write_to(&self, sink: &mut impl fmt::Write) -> fmt::Result {
        self.root.write_to(sink)
    }

    pub fn full_text(&self) -> String {
        self.root.shape().full_text()
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("root", &self.root)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}
