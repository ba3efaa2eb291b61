use text_size::TextSize;

use super::{ViewElement, ViewNode};

/// The children of a node with list slots flattened, so a caller sees the
/// elements of a list as direct children. Empty slots are skipped.
#[derive(Clone)]
pub struct ChildView {
    node: ViewNode,
    len: usize,
}

impl ChildView {
    pub(super) fn new(node: ViewNode) -> Self {
        let len = node
            .shape()
            .slots()
            .map(|slot| match slot {
                None => 0,
                Some(child) if child.is_list() => child.slot_count(),
                Some(_) => 1,
            })
            .sum();
        Self { node, len }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<ViewElement> {
        if index >= self.len {
            return None;
        }
        if self.node.shape().is_list() {
            return self.node.slot_element(index);
        }

        let mut index = index;
        for (slot, child) in self.node.shape().slots().enumerate() {
            let Some(child) = child else { continue };
            if !child.is_list() {
                if index == 0 {
                    return self.node.slot_element(slot);
                }
                index -= 1;
                continue;
            }

            let count = child.slot_count();
            if index < count {
                return self.node.node_slot(slot)?.slot_element(index);
            }
            index -= count;
        }

        None
    }

    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[track_caller]
    pub fn at(&self, index: usize) -> ViewElement {
        match self.get(index) {
            Some(element) => element,
            None => panic!("child {index} out of range for {} children", self.len),
        }
    }

    pub fn iter(&self) -> ChildViewIter {
        ChildViewIter { view: self.clone(), front: 0, back: self.len }
    }

    pub fn first(&self) -> Option<ViewElement> {
        self.get(0)
    }

    pub fn last(&self) -> Option<ViewElement> {
        self.len.checked_sub(1).and_then(|index| self.get(index))
    }

    /// The child whose full span contains `position`.
    #[track_caller]
    pub fn child_that_contains_position(&self, position: TextSize) -> ViewElement {
        let (slot, _) = self.node.child_position_index(position);
        let Some(list) = self.node.node_slot(slot).filter(|node| node.shape().is_list()) else {
            return self.node.slot_element(slot).expect("offset lookup returned an empty slot");
        };

        let (index, _) = list.child_position_index(position);
        list.slot_element(index).expect("list elements are never absent")
    }
}

impl IntoIterator for &ChildView {
    type Item = ViewElement;
    type IntoIter = ChildViewIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone)]
pub struct ChildViewIter {
    view: ChildView,
    front: usize,
    back: usize,
}

impl Iterator for ChildViewIter {
    type Item = ViewElement;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let element = self.view.get(self.front);
        self.front += 1;
        element
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for ChildViewIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.view.get(self.back)
    }
}

impl ExactSizeIterator for ChildViewIter {}
