use std::fmt;

/// One child of a view node: either a composite node or a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    pub fn into_node(self) -> Option<N> {
        if let Self::Node(node) = self { Some(node) } else { None }
    }

    pub fn into_token(self) -> Option<T> {
        if let Self::Token(token) = self { Some(token) } else { None }
    }
}

impl<N: fmt::Display, T: fmt::Display> fmt::Display for NodeOrToken<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => node.fmt(f),
            Self::Token(token) => token.fmt(f),
        }
    }
}
