use super::{ViewElement, ViewNode, ViewToken};
use crate::NodeOrToken;

/// A node slot read as `element (separator element)*`.
///
/// The slot may be empty, a single element, or a list.
#[derive(Clone)]
pub struct SeparatedView {
    parent: ViewNode,
    slot: usize,
    len: usize,
}

impl SeparatedView {
    pub(super) fn new(parent: ViewNode, slot: usize) -> Self {
        let len = match parent.shape().slot(slot) {
            None => 0,
            Some(child) if child.is_list() => child.slot_count(),
            Some(_) => 1,
        };
        Self { parent, slot, len }
    }

    fn raw(&self, index: usize) -> Option<ViewElement> {
        if index >= self.len {
            return None;
        }
        match self.parent.node_slot(self.slot) {
            Some(list) if list.shape().is_list() => list.slot_element(index),
            _ => self.parent.slot_element(self.slot),
        }
    }

    /// Number of elements, `ceil(len / 2)`.
    pub fn count(&self) -> usize {
        self.len.div_ceil(2)
    }

    /// Number of separators, `floor(len / 2)`.
    pub fn separator_count(&self) -> usize {
        self.len / 2
    }

    pub fn element(&self, index: usize) -> Option<ViewElement> {
        self.raw(index * 2)
    }

    pub fn separator(&self, index: usize) -> Option<ViewToken> {
        self.raw(index * 2 + 1).and_then(NodeOrToken::into_token)
    }

    pub fn elements(&self) -> impl Iterator<Item = ViewElement> + use<> {
        let view = self.clone();
        (0..self.count()).filter_map(move |index| view.element(index))
    }

    pub fn separators(&self) -> impl Iterator<Item = ViewToken> + use<> {
        let view = self.clone();
        (0..self.separator_count()).filter_map(move |index| view.separator(index))
    }
}
