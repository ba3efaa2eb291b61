use super::{ChildViewIter, ViewNode, ViewToken};
use crate::NodeOrToken;

/// Preorder traversal over nodes. List nodes are looked through.
#[derive(Clone)]
pub struct Preorder {
    inner: PreorderWithTokens,
}

impl Preorder {
    #[inline]
    pub(super) fn new(start: ViewNode) -> Self {
        Self { inner: PreorderWithTokens::new(start) }
    }

    /// Skips the subtree of the node entered last.
    #[inline]
    pub fn skip_subtree(&mut self) {
        self.inner.skip_subtree();
    }
}

impl Iterator for Preorder {
    type Item = WalkEvent;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|item| match item {
            WalkEventWithTokens::EnterNode(it) => Some(WalkEvent::Enter(it)),
            WalkEventWithTokens::LeaveNode(it) => Some(WalkEvent::Leave(it)),
            WalkEventWithTokens::Token(_) => None,
        })
    }
}

#[derive(Clone, Debug)]
pub enum WalkEvent {
    Enter(ViewNode),
    Leave(ViewNode),
}

/// Preorder traversal over nodes and tokens.
#[derive(Clone)]
pub struct PreorderWithTokens {
    stack: Vec<(ViewNode, ChildViewIter)>,
    root: Option<ViewNode>,
}

impl PreorderWithTokens {
    #[inline]
    pub(super) fn new(start: ViewNode) -> Self {
        Self { stack: Vec::with_capacity(32), root: Some(start) }
    }

    /// Skips the subtree of the node entered last.
    #[inline]
    pub fn skip_subtree(&mut self) {
        assert!(self.stack.pop().is_some(), "must have a subtree to skip");
    }
}

impl Iterator for PreorderWithTokens {
    type Item = WalkEventWithTokens;

    fn next(&mut self) -> Option<Self::Item> {
        let Some((_, active_node)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push((root.clone(), root.child_nodes_and_tokens().iter()));
            return Some(WalkEventWithTokens::EnterNode(root));
        };

        match active_node.next() {
            Some(NodeOrToken::Node(child)) => {
                self.stack.push((child.clone(), child.child_nodes_and_tokens().iter()));
                Some(WalkEventWithTokens::EnterNode(child))
            }
            Some(NodeOrToken::Token(child)) => Some(WalkEventWithTokens::Token(child)),
            None => {
                let (exited_node, _) = self.stack.pop()?;
                Some(WalkEventWithTokens::LeaveNode(exited_node))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub enum WalkEventWithTokens {
    EnterNode(ViewNode),
    LeaveNode(ViewNode),
    Token(ViewToken),
}
