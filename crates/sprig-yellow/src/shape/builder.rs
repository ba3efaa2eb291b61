use super::{ShapeList, ShapeNode};
use crate::SyntaxKind;

/// Accumulates siblings and hands them out as a [`ShapeList`].
///
/// Builders are meant to be recycled: [`take_list`](Self::take_list) leaves
/// the allocation behind for the next list.
#[derive(Debug, Default, Clone)]
pub struct ShapeListBuilder {
    items: Vec<ShapeNode>,
}

impl ShapeListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { items: Vec::with_capacity(capacity) }
    }

    /// Appends `node`; a `LIST` shape contributes its elements instead.
    pub fn push(&mut self, node: ShapeNode) {
        match node.list_items() {
            Some(items) => self.items.extend_from_slice(items),
            None => self.items.push(node),
        }
    }

    pub fn push_opt(&mut self, node: Option<ShapeNode>) {
        if let Some(node) = node {
            self.push(node);
        }
    }

    pub fn extend_from_list(&mut self, list: &ShapeList) {
        self.items.extend_from_slice(list.as_slice());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ShapeNode] {
        &self.items
    }

    pub fn any(&self, kind: SyntaxKind) -> bool {
        self.items.iter().any(|item| item.kind() == kind)
    }

    pub fn remove_last(&mut self) -> Option<ShapeNode> {
        self.items.pop()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn to_list(&self) -> ShapeList {
        ShapeList::from_items(&self.items)
    }

    /// Builds the list and empties the builder, keeping its capacity.
    pub fn take_list(&mut self) -> ShapeList {
        let list = self.to_list();
        self.items.clear();
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;
    use crate::shape::ListRepr;
    use crate::shape::factory::trivia;

    #[test]
    fn nested_lists_are_flattened() {
        let mut inner = ShapeListBuilder::new();
        inner.push(trivia(WHITESPACE, " "));
        inner.push(trivia(LINE_COMMENT, "// a"));
        let inner = inner.to_list();

        let mut builder = ShapeListBuilder::new();
        builder.push(trivia(NEWLINE, "\n"));
        builder.push_opt(inner.into_slot());
        builder.push_opt(None);

        assert_eq!(builder.len(), 3);
        assert!(builder.any(LINE_COMMENT));
        assert!(!builder.any(BLOCK_COMMENT));

        let list = builder.take_list();
        assert!(builder.is_empty());
        assert!(matches!(list.repr(), ListRepr::Many(items) if !items.iter().any(ShapeNode::is_list)));
        assert_eq!(list.full_width(), 6.into());
    }

    #[test]
    fn remove_last_shrinks_representation() {
        let mut builder = ShapeListBuilder::with_capacity(2);
        builder.push(trivia(WHITESPACE, " "));
        builder.push(trivia(NEWLINE, "\n"));
        assert!(matches!(builder.to_list().repr(), ListRepr::Two(..)));

        assert_eq!(builder.remove_last().map(|node| node.kind()), Some(NEWLINE));
        assert!(matches!(builder.to_list().repr(), ListRepr::One(_)));

        builder.clear();
        assert!(builder.to_list().is_empty());
    }
}
