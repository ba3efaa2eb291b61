//! Positioned, parented views over shapes.
//!
//! Views are created lazily, one node at a time, the first time a consumer
//! walks into them. A parent keeps only weak references to the children it
//! has handed out, so a view subtree lives exactly as long as someone holds
//! on to it.

mod children;
mod separated;
mod walk;

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

pub use children::{ChildView, ChildViewIter};
pub use separated::SeparatedView;
use sprig_errors::{Diagnostic, Location};
use sprig_text::SourceText;
use text_size::{TextRange, TextSize};
pub use walk::{Preorder, PreorderWithTokens, WalkEvent, WalkEventWithTokens};

use crate::shape::{ShapeNode, TokenValue};
use crate::{NodeOrToken, SyntaxKind};

pub type ViewElement = NodeOrToken<ViewNode, ViewToken>;

/// A shape at a specific position in a specific tree.
#[derive(Clone)]
pub struct ViewNode(Rc<ViewData>);

struct ViewData {
    shape: ShapeNode,
    position: TextSize,
    parent: Option<(ViewNode, usize)>,
    source: SourceText,
    children: Box<[Cell<Weak<ViewData>>]>,
}

impl ViewNode {
    pub(crate) fn new_root(shape: ShapeNode, source: SourceText) -> Self {
        debug_assert_eq!(shape.full_width(), source.len(), "root shape does not cover the text");
        Self::alloc(shape, TextSize::new(0), None, source)
    }

    fn alloc(
        shape: ShapeNode,
        position: TextSize,
        parent: Option<(Self, usize)>,
        source: SourceText,
    ) -> Self {
        let children = (0..shape.slot_count()).map(|_| Cell::new(Weak::new())).collect();
        Self(Rc::new(ViewData { shape, position, parent, source, children }))
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.0.shape.kind()
    }

    #[inline]
    pub fn shape(&self) -> &ShapeNode {
        &self.0.shape
    }

    #[inline]
    pub fn parent(&self) -> Option<&Self> {
        self.0.parent.as_ref().map(|(parent, _)| parent)
    }

    /// Slot of this node in its parent; `0` for the root.
    #[inline]
    pub fn slot_index(&self) -> usize {
        self.0.parent.as_ref().map_or(0, |&(_, slot)| slot)
    }

    /// This node followed by its parent, grandparent and so on.
    pub fn ancestors(&self) -> impl Iterator<Item = Self> + use<> {
        std::iter::successors(Some(self.clone()), |node| node.parent().cloned())
    }

    /// Absolute offset of the first character, leading trivia included.
    #[inline]
    pub fn position(&self) -> TextSize {
        self.0.position
    }

    #[inline]
    pub fn end_position(&self) -> TextSize {
        self.position() + self.shape().full_width()
    }

    pub fn full_span(&self) -> TextRange {
        TextRange::new(self.position(), self.end_position())
    }

    /// Span without the leading trivia of the first token and the trailing
    /// trivia of the last.
    pub fn span(&self) -> TextRange {
        let start = self.position() + self.shape().leading_trivia_width();
        let end = self.end_position() - self.shape().trailing_trivia_width();
        TextRange::new(start, end.max(start))
    }

    pub fn source(&self) -> &SourceText {
        &self.0.source
    }

    pub fn text(&self) -> &str {
        self.source().slice(self.span())
    }

    pub fn full_text(&self) -> &str {
        self.source().slice(self.full_span())
    }

    pub fn location(&self) -> Location {
        location(self.source(), self.span())
    }

    pub fn is_missing(&self) -> bool {
        self.shape().is_missing()
    }

    pub fn contains_diagnostics(&self) -> bool {
        self.shape().contains_diagnostics()
    }

    /// Absolute offset where slot `slot` starts.
    pub fn child_position(&self, slot: usize) -> TextSize {
        self.position() + self.shape().slot_offset(slot)
    }

    /// Slot whose full span contains `position`, together with the absolute
    /// start of that slot.
    #[track_caller]
    pub fn child_position_index(&self, position: TextSize) -> (usize, TextSize) {
        assert!(
            self.full_span().contains(position),
            "position {position:?} outside {:?} {:?}",
            self.kind(),
            self.full_span()
        );

        let slot = self.shape().slot_containing_offset(position - self.position());
        (slot, self.child_position(slot))
    }

    /// View of the non-terminal in slot `slot`. `None` if the slot is empty
    /// or holds a token.
    pub fn node_slot(&self, slot: usize) -> Option<Self> {
        let shape = self.shape().slot(slot)?;
        if shape.is_token() {
            return None;
        }

        let cell = &self.0.children[slot];
        let cached = cell.take();
        if let Some(data) = cached.upgrade() {
            cell.set(cached);
            return Some(Self(data));
        }

        let child = Self::alloc(
            shape.clone(),
            self.child_position(slot),
            Some((self.clone(), slot)),
            self.source().clone(),
        );
        cell.set(Rc::downgrade(&child.0));
        Some(child)
    }

    /// Node or token in slot `slot`, without flattening lists.
    pub fn slot_element(&self, slot: usize) -> Option<ViewElement> {
        let shape = self.shape().slot(slot)?;
        if shape.is_token() {
            let token = ViewToken {
                parent: self.clone(),
                shape: shape.clone(),
                position: self.child_position(slot),
                slot,
            };
            return Some(NodeOrToken::Token(token));
        }
        self.node_slot(slot).map(NodeOrToken::Node)
    }

    /// Children with list slots flattened into their elements.
    pub fn child_nodes_and_tokens(&self) -> ChildView {
        ChildView::new(self.clone())
    }

    /// Reads slot `slot` as an `element (separator element)*` list.
    pub fn separated_slot(&self, slot: usize) -> SeparatedView {
        SeparatedView::new(self.clone(), slot)
    }

    /// Finds the token whose full span contains `position`. A position equal
    /// to the end of this node yields the last token, which for a whole file
    /// is the end-of-file token.
    ///
    /// # Panics
    ///
    /// Panics if `position` lies outside `[start, end]` of this node or if the
    /// node has no tokens.
    #[track_caller]
    pub fn find_token(&self, position: TextSize) -> ViewToken {
        assert!(
            self.full_span().contains_inclusive(position),
            "position {position:?} outside {:?} {:?}",
            self.kind(),
            self.full_span()
        );

        if position == self.end_position() {
            return self.last_token().expect("find_token on a node without tokens");
        }

        let mut node = self.clone();
        loop {
            let (slot, _) = node.child_position_index(position);
            match node.slot_element(slot) {
                Some(NodeOrToken::Token(token)) => return token,
                Some(NodeOrToken::Node(child)) => node = child,
                None => unreachable!("offset lookup returned an empty slot"),
            }
        }
    }

    pub fn first_token(&self) -> Option<ViewToken> {
        self.first_token_from(0)
    }

    pub fn last_token(&self) -> Option<ViewToken> {
        self.last_token_before(self.shape().slot_count())
    }

    fn first_token_from(&self, slot: usize) -> Option<ViewToken> {
        (slot..self.shape().slot_count()).find_map(|slot| match self.slot_element(slot)? {
            NodeOrToken::Token(token) => Some(token),
            NodeOrToken::Node(node) => node.first_token(),
        })
    }

    fn last_token_before(&self, slot: usize) -> Option<ViewToken> {
        (0..slot).rev().find_map(|slot| match self.slot_element(slot)? {
            NodeOrToken::Token(token) => Some(token),
            NodeOrToken::Node(node) => node.last_token(),
        })
    }

    pub fn descendant_tokens(&self) -> impl Iterator<Item = ViewToken> + use<> {
        self.preorder_with_tokens().filter_map(|event| match event {
            WalkEventWithTokens::Token(token) => Some(token),
            _ => None,
        })
    }

    pub fn preorder(&self) -> Preorder {
        Preorder::new(self.clone())
    }

    pub fn preorder_with_tokens(&self) -> PreorderWithTokens {
        PreorderWithTokens::new(self.clone())
    }

    /// Every diagnostic in this subtree with absolute locations, in document
    /// order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.shape()
            .descendant_diagnostics()
            .iter()
            .map(|diagnostic| {
                let range = diagnostic.range_in(self.position());
                Diagnostic::from_syntax(diagnostic, location(self.source(), range))
            })
            .collect()
    }
}

fn location(source: &SourceText, range: TextRange) -> Location {
    let line_col = source.line_col(range.start());
    Location { range, line: line_col.line, column: line_col.col }
}

impl PartialEq for ViewNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
            || (self.position() == other.position() && self.shape().ptr_eq(other.shape()))
    }
}

impl Eq for ViewNode {}

impl fmt::Debug for ViewNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.full_span())
    }
}

impl fmt::Display for ViewNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_text())
    }
}

/// A token at a specific position. Tokens are not cached; two lookups of the
/// same token compare equal but are distinct values.
#[derive(Clone)]
pub struct ViewToken {
    parent: ViewNode,
    shape: ShapeNode,
    position: TextSize,
    slot: usize,
}

impl ViewToken {
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.shape.kind()
    }

    #[inline]
    pub fn shape(&self) -> &ShapeNode {
        &self.shape
    }

    /// The node holding this token; a `LIST` node for list elements.
    #[inline]
    pub fn parent(&self) -> &ViewNode {
        &self.parent
    }

    #[inline]
    pub fn slot_index(&self) -> usize {
        self.slot
    }

    #[inline]
    pub fn position(&self) -> TextSize {
        self.position
    }

    pub fn full_span(&self) -> TextRange {
        TextRange::at(self.position, self.shape.full_width())
    }

    pub fn span(&self) -> TextRange {
        let start = self.position + self.shape.leading_trivia().full_width();
        TextRange::at(start, TextSize::of(self.text()))
    }

    pub fn text(&self) -> &str {
        self.shape.text()
    }

    pub fn full_text(&self) -> &str {
        self.parent.source().slice(self.full_span())
    }

    pub fn value(&self) -> Option<&TokenValue> {
        self.shape.value()
    }

    pub fn is_missing(&self) -> bool {
        self.shape.is_missing()
    }

    pub fn location(&self) -> Location {
        location(self.parent.source(), self.span())
    }

    pub fn leading_trivia(&self) -> TriviaIter {
        TriviaIter { token: self.clone(), leading: true, index: 0, position: self.position }
    }

    pub fn trailing_trivia(&self) -> TriviaIter {
        let position = self.span().end();
        TriviaIter { token: self.clone(), leading: false, index: 0, position }
    }

    /// The token that follows this one in the tree, if any. Zero-width
    /// tokens are included.
    pub fn next_token(&self) -> Option<Self> {
        if let Some(token) = self.parent.first_token_from(self.slot + 1) {
            return Some(token);
        }
        self.parent
            .ancestors()
            .find_map(|node| node.parent()?.first_token_from(node.slot_index() + 1))
    }

    /// The token that precedes this one in the tree, if any.
    pub fn prev_token(&self) -> Option<Self> {
        if let Some(token) = self.parent.last_token_before(self.slot) {
            return Some(token);
        }
        self.parent.ancestors().find_map(|node| node.parent()?.last_token_before(node.slot_index()))
    }

    pub fn ancestors(&self) -> impl Iterator<Item = ViewNode> + use<> {
        self.parent.ancestors()
    }
}

impl PartialEq for ViewToken {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.shape.ptr_eq(&other.shape)
    }
}

impl Eq for ViewToken {}

impl fmt::Debug for ViewToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.span(), self.text())
    }
}

impl fmt::Display for ViewToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A trivia piece attached to a token.
#[derive(Clone, Debug)]
pub struct ViewTrivia {
    token: ViewToken,
    shape: ShapeNode,
    position: TextSize,
}

impl ViewTrivia {
    pub fn kind(&self) -> SyntaxKind {
        self.shape.kind()
    }

    pub fn shape(&self) -> &ShapeNode {
        &self.shape
    }

    pub fn token(&self) -> &ViewToken {
        &self.token
    }

    pub fn span(&self) -> TextRange {
        TextRange::at(self.position, self.shape.full_width())
    }

    pub fn text(&self) -> &str {
        self.shape.text()
    }
}

/// Iterator over the leading or trailing trivia of a token.
#[derive(Clone)]
pub struct TriviaIter {
    token: ViewToken,
    leading: bool,
    index: usize,
    position: TextSize,
}

impl Iterator for TriviaIter {
    type Item = ViewTrivia;

    fn next(&mut self) -> Option<Self::Item> {
        let list = if self.leading {
            self.token.shape.leading_trivia()
        } else {
            self.token.shape.trailing_trivia()
        };

        let shape = list.get(self.index)?.clone();
        let position = self.position;
        self.index += 1;
        self.position += shape.full_width();

        Some(ViewTrivia { token: self.token.clone(), shape, position })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let list = if self.leading {
            self.token.shape.leading_trivia()
        } else {
            self.token.shape.trailing_trivia()
        };
        let len = list.len() - self.index;
        (len, Some(len))
    }
}

impl ExactSizeIterator for TriviaIter {}

impl ViewElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn span(&self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.span(),
            NodeOrToken::Token(token) => token.span(),
        }
    }

    pub fn full_span(&self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.full_span(),
            NodeOrToken::Token(token) => token.full_span(),
        }
    }

    pub fn shape(&self) -> &ShapeNode {
        match self {
            NodeOrToken::Node(node) => node.shape(),
            NodeOrToken::Token(token) => token.shape(),
        }
    }

    pub fn parent(&self) -> Option<&ViewNode> {
        match self {
            NodeOrToken::Node(node) => node.parent(),
            NodeOrToken::Token(token) => Some(token.parent()),
        }
    }
}

#[cfg(test)]
mod tests {
    use sprig_errors::{DiagnosticCode, SyntaxDiagnostic};

    use super::*;
    use crate::SyntaxKind::*;
    use crate::attach_diagnostics;
    use crate::factory::{list, node, token};
    use crate::fixtures::{SAMPLE, sample, sample_shape};
    use crate::shape::ShapeList;

    fn token_kind_at(root: &ViewNode, offset: u32) -> SyntaxKind {
        root.find_token(offset.into()).kind()
    }

    #[test]
    fn find_token_descends_by_full_span() {
        let root = sample();

        assert_eq!(token_kind_at(&root, 0), NAME);
        assert_eq!(token_kind_at(&root, 1), NAME);
        assert_eq!(token_kind_at(&root, 3), PLUS);
        assert_eq!(token_kind_at(&root, 8), SEMICOLON);
        assert_eq!(token_kind_at(&root, 13), NAME);
        assert_eq!(root.find_token(13.into()).text(), "c");
    }

    #[test]
    fn find_token_at_end_is_eof() {
        let root = sample();
        let eof = root.find_token(root.end_position());
        assert_eq!(eof.kind(), EOF);
        assert_eq!(eof.span(), TextRange::empty(14.into()));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn find_token_past_end_panics() {
        sample().find_token(15.into());
    }

    #[test]
    fn spans_trim_outer_trivia() {
        let root = sample();
        let first = root.child_nodes_and_tokens().at(0).into_node().unwrap();

        assert_eq!(first.kind(), EXPR_STMT);
        assert_eq!(first.full_span(), TextRange::new(0.into(), 13.into()));
        assert_eq!(first.span(), TextRange::new(0.into(), 6.into()));
        assert_eq!(first.text(), "a + b;");
        assert_eq!(first.full_text(), "a + b; // hi\n");
        assert_eq!(root.full_text(), SAMPLE);
    }

    #[test]
    fn children_flatten_lists() {
        let root = sample();
        let children = root.child_nodes_and_tokens();

        assert_eq!(children.len(), 3);
        let kinds: Vec<_> = children.iter().map(|child| child.kind()).collect();
        assert_eq!(kinds, [EXPR_STMT, EXPR_STMT, EOF]);
        let reversed: Vec<_> = children.iter().rev().map(|child| child.kind()).collect();
        assert_eq!(reversed, [EOF, EXPR_STMT, EXPR_STMT]);

        let second = children.at(1);
        assert_eq!(second.parent().map(ViewNode::kind), Some(LIST));
        assert_eq!(second.full_span(), TextRange::new(13.into(), 14.into()));
        assert_eq!(children.last().map(|child| child.kind()), Some(EOF));
        assert!(children.get(3).is_none());
    }

    #[test]
    fn child_that_contains_position_looks_into_lists() {
        let root = sample();
        let children = root.child_nodes_and_tokens();

        let hit = children.child_that_contains_position(10.into());
        assert_eq!(hit.kind(), EXPR_STMT);
        assert_eq!(hit.full_span().start(), TextSize::new(0));
        assert_eq!(children.child_that_contains_position(13.into()).full_span().start(), 13.into());
    }

    #[test]
    fn child_views_are_cached_while_alive() {
        let root = sample();
        let first = root.node_slot(0).unwrap();
        let again = root.node_slot(0).unwrap();
        assert!(Rc::ptr_eq(&first.0, &again.0));
        assert_eq!(first.parent(), Some(&root));

        drop((first, again));
        let rebuilt = root.node_slot(0).unwrap();
        assert_eq!(rebuilt.kind(), LIST);
        assert!(root.node_slot(1).is_none(), "token slots have no node view");
    }

    #[test]
    fn chain_from_position_to_child() {
        let root = sample();
        let list = root.node_slot(0).unwrap();

        assert_eq!(list.child_position_index(4.into()), (0, 0.into()));
        assert_eq!(list.child_position_index(13.into()), (1, 13.into()));
        assert_eq!(list.child_position(1), TextSize::new(13));
    }

    #[test]
    fn token_navigation() {
        let root = sample();
        let first = root.first_token().unwrap();

        let kinds: Vec<_> =
            std::iter::successors(Some(first), ViewToken::next_token).map(|t| t.kind()).collect();
        assert_eq!(kinds, [NAME, PLUS, NAME, SEMICOLON, NAME, SEMICOLON, EOF]);

        let last = root.last_token().unwrap();
        let back: Vec<_> =
            std::iter::successors(Some(last), ViewToken::prev_token).map(|t| t.kind()).collect();
        assert_eq!(back.len(), 7);
        assert_eq!(back[0], EOF);
        assert!(root.find_token(14.into()).prev_token().unwrap().is_missing());
    }

    #[test]
    fn trivia_positions() {
        let root = sample();
        let semicolon = root.find_token(5.into());

        let trailing: Vec<_> =
            semicolon.trailing_trivia().map(|trivia| (trivia.kind(), trivia.span())).collect();
        assert_eq!(
            trailing,
            [
                (WHITESPACE, TextRange::new(6.into(), 7.into())),
                (LINE_COMMENT, TextRange::new(7.into(), 12.into())),
                (NEWLINE, TextRange::new(12.into(), 13.into())),
            ]
        );
        assert_eq!(semicolon.leading_trivia().len(), 0);
    }

    #[test]
    fn preorder_skips_lists() {
        let root = sample();
        let entered: Vec<_> = root
            .preorder()
            .filter_map(|event| match event {
                WalkEvent::Enter(node) => Some(node.kind()),
                WalkEvent::Leave(_) => None,
            })
            .collect();

        assert_eq!(
            entered,
            [COMPILATION_UNIT, EXPR_STMT, BINARY_EXPR, NAME_EXPR, NAME_EXPR, EXPR_STMT, NAME_EXPR]
        );
        assert_eq!(root.descendant_tokens().count(), 7);
    }

    #[test]
    fn diagnostics_have_absolute_locations() {
        let shape = attach_diagnostics(
            &sample_shape(),
            [SyntaxDiagnostic::new(
                DiagnosticCode::ExpectedToken,
                TextRange::empty(14.into()),
                "expected ';' at end of input",
            )],
        );
        let root = ViewNode::new_root(shape, SourceText::new(SAMPLE));

        let diagnostics = root.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        let location = diagnostics[0].location();
        assert_eq!(location.range, TextRange::empty(14.into()));
        assert_eq!((location.line, location.column), (1, 1));
        assert!(root.contains_diagnostics());
        assert!(sample().diagnostics().is_empty());
    }

    #[test]
    fn separated_slot() {
        let name = |text| {
            let name = token(NAME, ShapeList::EMPTY, text, None, ShapeList::EMPTY);
            node(PARAMETER, [Some(name)])
        };
        let punct = |kind, text| token(kind, ShapeList::EMPTY, text, None, ShapeList::EMPTY);
        let items = list([name("x"), punct(COMMA, ","), name("y")]);
        let parameters = node(
            PARAMETER_LIST,
            [Some(punct(LEFT_PAREN, "(")), items.into_slot(), Some(punct(RIGHT_PAREN, ")"))],
        );
        let root = ViewNode::new_root(parameters, SourceText::new("(x,y)"));

        let separated = root.separated_slot(1);
        assert_eq!(separated.count(), 2);
        assert_eq!(separated.separator_count(), 1);
        assert_eq!(separated.separator(0).map(|t| t.position()), Some(2.into()));
        let starts: Vec<_> = separated.elements().map(|e| e.full_span().start()).collect();
        assert_eq!(starts, [TextSize::new(1), TextSize::new(3)]);
        assert!(separated.element(2).is_none());
    }
}
