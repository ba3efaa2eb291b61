//! Lossless syntax trees in two layers.
//!
//! Shapes are immutable, position-free and shared between trees and threads.
//! Views wrap a shape with its absolute position and parent, and are built
//! lazily as a consumer walks down from the root of a [`SyntaxTree`].

mod diagnostics;
#[cfg(test)]
mod fixtures;
mod node_or_token;
mod printer;
pub mod shape;
mod syntax_kind;
mod syntax_set;
mod tree;
pub mod view;

pub use diagnostics::attach_diagnostics;
pub use node_or_token::NodeOrToken;
pub use shape::factory;
pub use shape::{
    ListRepr, NodeFlags, SeparatedShapeList, ShapeList, ShapeListBuilder, ShapeNode, TokenValue,
};
pub use syntax_kind::{DescribeKind, SyntaxKind};
pub use syntax_set::SyntaxSet;
pub use tree::{Parsed, SyntaxParser, SyntaxTree, TreeOrigin};
pub use view::{
    ChildView, SeparatedView, TriviaIter, ViewElement, ViewNode, ViewToken, ViewTrivia, WalkEvent,
    WalkEventWithTokens,
};
