use text_size::TextSize;

use super::{NodeFlags, ShapeListBuilder, ShapeNode};

/// An ordered run of sibling shapes.
///
/// The representation depends only on the number of elements: nothing for an
/// empty list, the bare element for one, and a `LIST` shape holding either two
/// inline children or a boxed slice with precomputed offsets.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ShapeList(Option<ShapeNode>);

/// Borrowed view of a list's representation.
#[derive(Clone, Copy, Debug)]
pub enum ListRepr<'a> {
    Empty,
    One(&'a ShapeNode),
    Two(&'a ShapeNode, &'a ShapeNode),
    Many(&'a [ShapeNode]),
}

impl ShapeList {
    pub const EMPTY: Self = Self(None);

    /// A list holding exactly `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is itself a list.
    #[track_caller]
    pub fn one(node: ShapeNode) -> Self {
        assert!(!node.is_list(), "lists do not nest");
        Self(Some(node))
    }

    /// Interprets a node slot as a list: an absent slot is empty, a `LIST`
    /// shape is itself, and anything else is a single element.
    pub fn from_slot(slot: Option<ShapeNode>) -> Self {
        Self(slot)
    }

    pub(crate) fn from_items(items: &[ShapeNode]) -> Self {
        match items {
            [] => Self::EMPTY,
            [single] => Self(Some(single.clone())),
            [first, second] => Self(Some(ShapeNode::new_list_two(first.clone(), second.clone()))),
            _ => Self(Some(ShapeNode::new_list_many(items.into()))),
        }
    }

    pub fn repr(&self) -> ListRepr<'_> {
        match &self.0 {
            None => ListRepr::Empty,
            Some(node) => match node.list_items() {
                Some([first, second]) => ListRepr::Two(first, second),
                Some(items) => ListRepr::Many(items),
                None => ListRepr::One(node),
            },
        }
    }

    pub fn as_slice(&self) -> &[ShapeNode] {
        match &self.0 {
            None => &[],
            Some(node) => node.list_items().unwrap_or(std::slice::from_ref(node)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self, index: usize) -> Option<&ShapeNode> {
        self.as_slice().get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShapeNode> {
        self.as_slice().iter()
    }

    pub fn first(&self) -> Option<&ShapeNode> {
        self.as_slice().first()
    }

    pub fn last(&self) -> Option<&ShapeNode> {
        self.as_slice().last()
    }

    pub fn full_width(&self) -> TextSize {
        self.0.as_ref().map_or(TextSize::new(0), ShapeNode::full_width)
    }

    pub fn flags(&self) -> NodeFlags {
        self.0.as_ref().map_or(NodeFlags::NONE, ShapeNode::flags)
    }

    /// The shape to store in a node slot.
    pub fn as_slot(&self) -> Option<&ShapeNode> {
        self.0.as_ref()
    }

    pub fn into_slot(self) -> Option<ShapeNode> {
        self.0
    }

    /// Joins two lists without touching either, picking the cheapest
    /// representation for the result.
    pub fn concat(left: &Self, right: &Self) -> Self {
        if left.is_empty() {
            return right.clone();
        }
        if right.is_empty() {
            return left.clone();
        }

        let mut builder = ShapeListBuilder::with_capacity(left.len() + right.len());
        builder.extend_from_list(left);
        builder.extend_from_list(right);
        builder.to_list()
    }

    /// A new list with `node` appended.
    pub fn with_appended(&self, node: ShapeNode) -> Self {
        Self::concat(self, &Self::from_slot(Some(node)))
    }

    /// `true` if elements sit at even indices and separator tokens at odd ones.
    pub fn has_alternating_pattern(&self) -> bool {
        self.iter().enumerate().all(|(index, item)| item.is_token() == (index % 2 == 1))
    }

    pub fn as_separated(&self) -> SeparatedShapeList<'_> {
        SeparatedShapeList { items: self.as_slice() }
    }
}

impl std::fmt::Debug for ShapeList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a ShapeList {
    type Item = &'a ShapeNode;
    type IntoIter = std::slice::Iter<'a, ShapeNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A list read as `element (separator element)*`.
#[derive(Clone, Copy, Debug)]
pub struct SeparatedShapeList<'a> {
    items: &'a [ShapeNode],
}

impl<'a> SeparatedShapeList<'a> {
    /// Number of elements, `ceil(len / 2)`.
    pub fn count(&self) -> usize {
        self.items.len().div_ceil(2)
    }

    /// Number of separators, `floor(len / 2)`.
    pub fn separator_count(&self) -> usize {
        self.items.len() / 2
    }

    pub fn element(&self, index: usize) -> Option<&'a ShapeNode> {
        self.items.get(index * 2)
    }

    pub fn separator(&self, index: usize) -> Option<&'a ShapeNode> {
        self.items.get(index * 2 + 1)
    }

    pub fn elements(&self) -> impl Iterator<Item = &'a ShapeNode> + use<'a> {
        self.items.iter().step_by(2)
    }

    pub fn separators(&self) -> impl Iterator<Item = &'a ShapeNode> + use<'a> {
        self.items.iter().skip(1).step_by(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;
    use crate::shape::factory::{node, token};

    fn name(text: &str) -> ShapeNode {
        node(PARAMETER, [Some(token(NAME, ShapeList::EMPTY, text, None, ShapeList::EMPTY))])
    }

    fn comma() -> ShapeNode {
        token(COMMA, ShapeList::EMPTY, ",", None, ShapeList::EMPTY)
    }

    fn list(items: &[ShapeNode]) -> ShapeList {
        ShapeList::from_items(items)
    }

    #[test]
    fn representation_follows_arity() {
        let a = name("a");
        let b = name("b");
        let c = name("c");

        assert!(matches!(list(&[]).repr(), ListRepr::Empty));
        assert!(matches!(list(&[a.clone()]).repr(), ListRepr::One(node) if node.ptr_eq(&a)));
        assert!(matches!(list(&[a.clone(), b.clone()]).repr(), ListRepr::Two(..)));
        assert!(matches!(list(&[a.clone(), b, c]).repr(), ListRepr::Many(its) if its.len() == 3));

        assert_eq!(list(&[]).into_slot(), None);
        assert!(list(&[a.clone()]).into_slot().is_some_and(|slot| slot.ptr_eq(&a)));
    }

    #[test]
    fn list_width_is_sum_of_elements() {
        let items = [name("ab"), comma(), name("c"), comma(), name("def")];
        let list = list(&items);

        assert_eq!(list.full_width(), TextSize::new(8));
        assert_eq!(list.len(), 5);
        assert_eq!(list.as_slot().unwrap().kind(), LIST);
        assert_eq!(list.as_slot().unwrap().slot_offset(4), TextSize::new(5));
        assert_eq!(list.as_slot().unwrap().slot_containing_offset(TextSize::new(4)), 3);
        assert_eq!(list.as_slot().unwrap().slot_containing_offset(TextSize::new(7)), 4);
    }

    #[test]
    fn concat_never_mutates_inputs() {
        let left = list(&[name("a"), comma()]);
        let right = list(&[name("b")]);

        let joined = ShapeList::concat(&left, &right);
        assert_eq!(joined.len(), 3);
        assert!(matches!(joined.repr(), ListRepr::Many(_)));
        assert_eq!(left.len(), 2);
        assert_eq!(right.len(), 1);

        assert!(ShapeList::concat(&ShapeList::EMPTY, &right).as_slot() == right.as_slot());
        assert_eq!(left.with_appended(name("z")).len(), 3);
    }

    #[test]
    fn separated_arithmetic() {
        for len in 0..6usize {
            let items: Vec<_> =
                (0..len).map(|i| if i % 2 == 0 { name("x") } else { comma() }).collect();
            let list = list(&items);
            let separated = list.as_separated();

            assert!(list.has_alternating_pattern());
            assert_eq!(separated.count(), len.div_ceil(2));
            assert_eq!(separated.separator_count(), len / 2);
            assert_eq!(separated.elements().count(), separated.count());
            assert_eq!(separated.separators().count(), separated.separator_count());
        }
    }

    #[test]
    fn broken_alternation() {
        assert!(!list(&[name("a"), name("b")]).has_alternating_pattern());
        assert!(!list(&[comma(), name("b")]).has_alternating_pattern());
    }
}
