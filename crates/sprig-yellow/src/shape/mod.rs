//! Immutable, position-free syntax shapes.
//!
//! A shape knows its kind, its full width and its children, never where it
//! sits in a file. Identical subtrees can therefore be shared between trees,
//! threads and successive versions of the same document.

mod builder;
pub mod factory;
mod flags;
mod list;

use std::fmt;

pub use builder::ShapeListBuilder;
pub use flags::NodeFlags;
pub use list::{ListRepr, SeparatedShapeList, ShapeList};
use sprig_errors::SyntaxDiagnostic;
use text_size::TextSize;
use triomphe::Arc;

use crate::SyntaxKind;

/// Decoded value of a literal token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenValue {
    Int(i64),
    Str(Box<str>),
    Bool(bool),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// A reference-counted handle to an immutable shape.
#[derive(Clone)]
pub struct ShapeNode(Arc<ShapeData>);

#[derive(PartialEq, Eq)]
struct ShapeData {
    kind: SyntaxKind,
    full_width: TextSize,
    flags: NodeFlags,
    diagnostics: Box<[SyntaxDiagnostic]>,
    body: Body,
}

#[derive(Clone, PartialEq, Eq)]
enum Body {
    Token(TokenBody),
    Trivia(Box<str>),
    Node(Box<[Option<ShapeNode>]>),
    List(ListBody),
}

#[derive(Clone, PartialEq, Eq)]
struct TokenBody {
    text: Box<str>,
    value: Option<TokenValue>,
    leading: ShapeList,
    trailing: ShapeList,
}

#[derive(Clone, PartialEq, Eq)]
enum ListBody {
    Two([ShapeNode; 2]),
    /// `offsets[i]` is the start of `items[i]` relative to the list.
    Many { items: Box<[ShapeNode]>, offsets: Box<[TextSize]> },
}

impl ListBody {
    fn many(items: Box<[ShapeNode]>) -> Self {
        let mut offset = TextSize::new(0);
        let offsets = items
            .iter()
            .map(|item| {
                let start = offset;
                offset += item.full_width();
                start
            })
            .collect();

        Self::Many { items, offsets }
    }

    fn items(&self) -> &[ShapeNode] {
        match self {
            Self::Two(items) => items,
            Self::Many { items, .. } => items,
        }
    }
}

impl Body {
    /// Width and flags contributed by the children.
    fn inherited(&self) -> (TextSize, NodeFlags) {
        fn fold<'a>(children: impl Iterator<Item = &'a ShapeNode>) -> (TextSize, NodeFlags) {
            children.fold((TextSize::new(0), NodeFlags::NONE), |(width, flags), child| {
                (width + child.full_width(), flags | child.flags())
            })
        }

        match self {
            Self::Token(token) => (
                token.leading.full_width()
                    + TextSize::of(&*token.text)
                    + token.trailing.full_width(),
                token.leading.flags() | token.trailing.flags(),
            ),
            Self::Trivia(text) => (TextSize::of(&**text), NodeFlags::NONE),
            Self::Node(slots) => fold(slots.iter().flatten()),
            Self::List(list) => fold(list.items().iter()),
        }
    }
}

static EMPTY_LIST: ShapeList = ShapeList::EMPTY;

impl ShapeNode {
    fn alloc(
        kind: SyntaxKind,
        body: Body,
        own_flags: NodeFlags,
        diagnostics: Box<[SyntaxDiagnostic]>,
    ) -> Self {
        let (full_width, mut flags) = body.inherited();
        flags |= own_flags;
        if !diagnostics.is_empty() {
            flags |= NodeFlags::CONTAINS_DIAGNOSTICS;
        }

        Self(Arc::new(ShapeData { kind, full_width, flags, diagnostics, body }))
    }

    pub(crate) fn new_token(
        kind: SyntaxKind,
        leading: ShapeList,
        text: Box<str>,
        value: Option<TokenValue>,
        trailing: ShapeList,
        own_flags: NodeFlags,
    ) -> Self {
        debug_assert!(kind.is_token(), "{kind:?} is not a token kind");
        let body = Body::Token(TokenBody { text, value, leading, trailing });
        Self::alloc(kind, body, own_flags, Box::default())
    }

    pub(crate) fn new_trivia(
        kind: SyntaxKind,
        text: Box<str>,
        own_flags: NodeFlags,
        diagnostics: Box<[SyntaxDiagnostic]>,
    ) -> Self {
        debug_assert!(kind.is_trivia(), "{kind:?} is not a trivia kind");
        Self::alloc(kind, Body::Trivia(text), own_flags, diagnostics)
    }

    pub(crate) fn new_node(kind: SyntaxKind, slots: Box<[Option<Self>]>) -> Self {
        debug_assert!(!kind.is_token() && !kind.is_trivia(), "{kind:?} is not a node kind");
        Self::alloc(kind, Body::Node(slots), NodeFlags::NONE, Box::default())
    }

    pub(crate) fn new_list_two(first: Self, second: Self) -> Self {
        Self::alloc(
            SyntaxKind::LIST,
            Body::List(ListBody::Two([first, second])),
            NodeFlags::NONE,
            Box::default(),
        )
    }

    pub(crate) fn new_list_many(items: Box<[Self]>) -> Self {
        debug_assert!(items.len() > 2, "short lists use a cheaper representation");
        let body = Body::List(ListBody::many(items));
        Self::alloc(SyntaxKind::LIST, body, NodeFlags::NONE, Box::default())
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.0.kind
    }

    /// Width including leading and trailing trivia.
    #[inline]
    pub fn full_width(&self) -> TextSize {
        self.0.full_width
    }

    /// Width excluding the leading trivia of the first token and the trailing
    /// trivia of the last one.
    pub fn width(&self) -> TextSize {
        self.full_width() - self.leading_trivia_width() - self.trailing_trivia_width()
    }

    pub fn leading_trivia_width(&self) -> TextSize {
        self.first_token().map_or(TextSize::new(0), |token| token.leading_trivia().full_width())
    }

    pub fn trailing_trivia_width(&self) -> TextSize {
        self.last_token().map_or(TextSize::new(0), |token| token.trailing_trivia().full_width())
    }

    #[inline]
    pub fn flags(&self) -> NodeFlags {
        self.0.flags
    }

    /// `true` for shapes synthesized by error recovery that cover no text.
    pub fn is_missing(&self) -> bool {
        self.flags().contains(NodeFlags::IS_MISSING) && self.width() == TextSize::new(0)
    }

    #[inline]
    pub fn contains_diagnostics(&self) -> bool {
        self.flags().contains(NodeFlags::CONTAINS_DIAGNOSTICS)
    }

    #[inline]
    pub fn contains_skipped_text(&self) -> bool {
        self.flags().contains(NodeFlags::CONTAINS_SKIPPED_TEXT)
    }

    /// Diagnostics owned by this shape, relative to its full start.
    #[inline]
    pub fn diagnostics(&self) -> &[SyntaxDiagnostic] {
        &self.0.diagnostics
    }

    #[inline]
    pub fn is_token(&self) -> bool {
        matches!(self.0.body, Body::Token(_))
    }

    #[inline]
    pub fn is_trivia(&self) -> bool {
        matches!(self.0.body, Body::Trivia(_))
    }

    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self.0.body, Body::List(_))
    }

    /// Text of a token without its trivia, or the text of a trivia piece.
    /// Empty for composite shapes.
    pub fn text(&self) -> &str {
        match &self.0.body {
            Body::Token(token) => &token.text,
            Body::Trivia(text) => text,
            Body::Node(_) | Body::List(_) => "",
        }
    }

    pub fn value(&self) -> Option<&TokenValue> {
        match &self.0.body {
            Body::Token(token) => token.value.as_ref(),
            _ => None,
        }
    }

    pub fn leading_trivia(&self) -> &ShapeList {
        match &self.0.body {
            Body::Token(token) => &token.leading,
            _ => &EMPTY_LIST,
        }
    }

    pub fn trailing_trivia(&self) -> &ShapeList {
        match &self.0.body {
            Body::Token(token) => &token.trailing,
            _ => &EMPTY_LIST,
        }
    }

    /// Number of child slots. Tokens and trivia have none.
    pub fn slot_count(&self) -> usize {
        match &self.0.body {
            Body::Node(slots) => slots.len(),
            Body::List(list) => list.items().len(),
            Body::Token(_) | Body::Trivia(_) => 0,
        }
    }

    /// Returns the child in slot `index`; `None` marks an absent optional
    /// element.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.slot_count()`.
    #[track_caller]
    pub fn slot(&self, index: usize) -> Option<&Self> {
        let count = self.slot_count();
        assert!(index < count, "slot {index} out of range for {:?} with {count} slots", self.kind());

        match &self.0.body {
            Body::Node(slots) => slots[index].as_ref(),
            Body::List(list) => Some(&list.items()[index]),
            Body::Token(_) | Body::Trivia(_) => unreachable!(),
        }
    }

    pub fn slots(&self) -> Slots<'_> {
        Slots { shape: self, front: 0, back: self.slot_count() }
    }

    /// Start of slot `index` relative to this shape's full start.
    #[track_caller]
    pub fn slot_offset(&self, index: usize) -> TextSize {
        assert!(index <= self.slot_count(), "slot {index} out of range for {:?}", self.kind());

        match &self.0.body {
            Body::List(ListBody::Many { offsets, .. }) if index < offsets.len() => offsets[index],
            _ => self.slots().take(index).flatten().map(Self::full_width).sum(),
        }
    }

    /// Index of the slot whose full span contains `offset`, relative to this
    /// shape. Zero-width slots never contain anything.
    ///
    /// # Panics
    ///
    /// Panics unless `offset < self.full_width()`.
    #[track_caller]
    pub fn slot_containing_offset(&self, offset: TextSize) -> usize {
        assert!(
            offset < self.full_width(),
            "offset {offset:?} outside {:?} of width {:?}",
            self.kind(),
            self.full_width()
        );

        if let Body::List(ListBody::Many { offsets, .. }) = &self.0.body {
            return offsets.partition_point(|&start| start <= offset) - 1;
        }

        let mut start = TextSize::new(0);
        for (index, slot) in self.slots().enumerate() {
            let Some(child) = slot else { continue };
            let end = start + child.full_width();
            if offset < end {
                return index;
            }
            start = end;
        }

        unreachable!("children widths do not add up to the width of {:?}", self.kind())
    }

    pub fn first_token(&self) -> Option<&Self> {
        if self.is_token() {
            return Some(self);
        }
        self.slots().flatten().find_map(Self::first_token)
    }

    pub fn last_token(&self) -> Option<&Self> {
        if self.is_token() {
            return Some(self);
        }
        self.slots().rev().flatten().find_map(Self::last_token)
    }

    /// Every token below this shape, in document order.
    pub fn tokens(&self) -> ShapeTokens<'_> {
        ShapeTokens { stack: Vec::new(), root: Some(self) }
    }

    /// Returns a copy of this shape that owns `diagnostics` instead of its
    /// current ones. Children are shared with `self`.
    pub fn set_diagnostics(&self, diagnostics: impl Into<Box<[SyntaxDiagnostic]>>) -> Self {
        let diagnostics = diagnostics.into();
        let kept = self.flags().without(NodeFlags::CONTAINS_DIAGNOSTICS);
        Self::alloc(self.kind(), self.0.body.clone(), kept, diagnostics)
    }

    pub fn add_diagnostic(&self, diagnostic: SyntaxDiagnostic) -> Self {
        let mut diagnostics = self.diagnostics().to_vec();
        diagnostics.push(diagnostic);
        self.set_diagnostics(diagnostics)
    }

    /// Returns a copy with slot `index` replaced. Width and flags are
    /// recomputed; the other children are shared.
    ///
    /// # Panics
    ///
    /// Panics for tokens and trivia, for an out of range `index`, and when
    /// removing an element from a list.
    #[track_caller]
    pub fn with_slot(&self, index: usize, child: Option<Self>) -> Self {
        assert!(index < self.slot_count(), "slot {index} out of range for {:?}", self.kind());

        let body = match &self.0.body {
            Body::Node(slots) => {
                let mut slots = slots.clone();
                slots[index] = child;
                Body::Node(slots)
            }
            Body::List(list) => {
                let child = child.expect("list elements cannot be removed in place");
                let mut items = list.items().to_vec();
                items[index] = child;
                match <[Self; 2]>::try_from(items) {
                    Ok(two) => Body::List(ListBody::Two(two)),
                    Err(items) => Body::List(ListBody::many(items.into_boxed_slice())),
                }
            }
            Body::Token(_) | Body::Trivia(_) => unreachable!(),
        };

        Self::alloc(self.kind(), body, NodeFlags::NONE, self.0.diagnostics.clone())
    }

    /// Returns a copy of this token with `trivia` placed in front of its
    /// leading trivia. Own diagnostics move along with the token text.
    #[track_caller]
    pub fn prepend_leading_trivia(&self, trivia: &ShapeList) -> Self {
        let Body::Token(token) = &self.0.body else {
            panic!("{:?} is not a token", self.kind());
        };

        if trivia.is_empty() {
            return self.clone();
        }

        let shift = trivia.full_width();
        let diagnostics = self
            .diagnostics()
            .iter()
            .map(|diagnostic| diagnostic.with_offset(diagnostic.offset() + shift))
            .collect();

        let body = Body::Token(TokenBody {
            leading: ShapeList::concat(trivia, &token.leading),
            ..token.clone()
        });
        let own = if self.flags().contains(NodeFlags::IS_MISSING) {
            NodeFlags::IS_MISSING
        } else {
            NodeFlags::NONE
        };
        Self::alloc(self.kind(), body, own, diagnostics)
    }

    /// Every diagnostic in this subtree, re-anchored relative to this shape's
    /// full start, in document order.
    pub fn descendant_diagnostics(&self) -> Vec<SyntaxDiagnostic> {
        let mut out = Vec::new();
        self.collect_diagnostics(TextSize::new(0), &mut out);
        out.sort_by_key(SyntaxDiagnostic::offset);
        out
    }

    fn collect_diagnostics(&self, base: TextSize, out: &mut Vec<SyntaxDiagnostic>) {
        if !self.contains_diagnostics() {
            return;
        }

        out.extend(self.diagnostics().iter().map(|d| d.with_offset(base + d.offset())));
        self.for_each_child(base, &mut |offset, child| child.collect_diagnostics(offset, out));
    }

    /// Calls `f` with every direct child and its offset, trivia included.
    fn for_each_child(&self, base: TextSize, f: &mut dyn FnMut(TextSize, &Self)) {
        let mut offset = base;

        if let Body::Token(token) = &self.0.body {
            for trivia in token.leading.iter() {
                f(offset, trivia);
                offset += trivia.full_width();
            }
            offset += TextSize::of(&*token.text);
            for trivia in token.trailing.iter() {
                f(offset, trivia);
                offset += trivia.full_width();
            }
            return;
        }

        for child in self.slots().flatten() {
            f(offset, child);
            offset += child.full_width();
        }
    }

    /// Writes the exact source text this shape was built from.
    pub fn write_text(&self, sink: &mut impl fmt::Write) -> fmt::Result {
        match &self.0.body {
            Body::Token(token) => {
                token.leading.iter().try_for_each(|trivia| sink.write_str(trivia.text()))?;
                sink.write_str(&token.text)?;
                token.trailing.iter().try_for_each(|trivia| sink.write_str(trivia.text()))
            }
            Body::Trivia(text) => sink.write_str(text),
            Body::Node(_) | Body::List(_) => {
                self.tokens().try_for_each(|token| token.write_text(sink))
            }
        }
    }

    pub fn full_text(&self) -> String {
        let mut text = String::with_capacity(u32::from(self.full_width()) as usize);
        _ = self.write_text(&mut text);
        text
    }

    /// `true` when both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared allocation, for identity maps.
    #[inline]
    pub fn as_ptr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast()
    }

    pub(crate) fn list_items(&self) -> Option<&[Self]> {
        match &self.0.body {
            Body::List(list) => Some(list.items()),
            _ => None,
        }
    }
}

impl PartialEq for ShapeNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl Eq for ShapeNode {}

impl fmt::Debug for ShapeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.body {
            Body::Token(token) => write!(f, "{:?} {:?}", self.kind(), token.text),
            Body::Trivia(text) => write!(f, "{:?} {:?}", self.kind(), text),
            Body::Node(_) | Body::List(_) => {
                write!(f, "{:?}@{}", self.kind(), u32::from(self.full_width()))
            }
        }
    }
}

impl fmt::Display for ShapeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_text(f)
    }
}

/// Iterator over the slots of a shape.
#[derive(Clone)]
pub struct Slots<'a> {
    shape: &'a ShapeNode,
    front: usize,
    back: usize,
}

impl<'a> Iterator for Slots<'a> {
    type Item = Option<&'a ShapeNode>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let slot = self.shape.slot(self.front);
        self.front += 1;
        Some(slot)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Slots<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.shape.slot(self.back))
    }
}

impl ExactSizeIterator for Slots<'_> {}

/// Preorder iterator over the tokens of a shape.
#[derive(Clone)]
pub struct ShapeTokens<'a> {
    stack: Vec<Slots<'a>>,
    root: Option<&'a ShapeNode>,
}

impl<'a> Iterator for ShapeTokens<'a> {
    type Item = &'a ShapeNode;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            if root.is_token() {
                return Some(root);
            }
            self.stack.push(root.slots());
        }

        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(Some(child)) if child.is_token() => return Some(child),
                Some(Some(child)) => self.stack.push(child.slots()),
                Some(None) => {}
                None => _ = self.stack.pop(),
            }
        }
    }
}
