//! Constructors for every kind of shape.
//!
//! Width and flags are always derived from the children, so a shape built here
//! is consistent by construction.

use sprig_errors::SyntaxDiagnostic;

use super::{NodeFlags, ShapeList, ShapeNode, TokenValue};
use crate::SyntaxKind;

/// A token with its own text and surrounding trivia.
pub fn token(
    kind: SyntaxKind,
    leading: ShapeList,
    text: &str,
    value: Option<TokenValue>,
    trailing: ShapeList,
) -> ShapeNode {
    ShapeNode::new_token(kind, leading, text.into(), value, trailing, NodeFlags::NONE)
}

/// A zero-width token standing in for one the parser expected but did not
/// find.
pub fn missing_token(kind: SyntaxKind) -> ShapeNode {
    ShapeNode::new_token(
        kind,
        ShapeList::EMPTY,
        "".into(),
        None,
        ShapeList::EMPTY,
        NodeFlags::IS_MISSING,
    )
}

pub fn trivia(kind: SyntaxKind, text: &str) -> ShapeNode {
    ShapeNode::new_trivia(kind, text.into(), NodeFlags::NONE, Box::default())
}

/// A trivia piece carrying diagnostics, e.g. an unterminated comment.
pub fn trivia_with_diagnostics(
    kind: SyntaxKind,
    text: &str,
    diagnostics: Vec<SyntaxDiagnostic>,
) -> ShapeNode {
    ShapeNode::new_trivia(kind, text.into(), NodeFlags::NONE, diagnostics.into())
}

/// Turns a token the parser gave up on into trivia. Its text and every
/// diagnostic inside it are preserved.
pub fn skipped_tokens_trivia(token: &ShapeNode) -> ShapeNode {
    ShapeNode::new_trivia(
        SyntaxKind::SKIPPED_TOKENS_TRIVIA,
        token.full_text().into(),
        NodeFlags::CONTAINS_SKIPPED_TEXT,
        token.descendant_diagnostics().into(),
    )
}

/// A composite shape; `None` marks an absent optional slot.
pub fn node(kind: SyntaxKind, slots: impl IntoIterator<Item = Option<ShapeNode>>) -> ShapeNode {
    ShapeNode::new_node(kind, slots.into_iter().collect())
}

pub fn list(items: impl IntoIterator<Item = ShapeNode>) -> ShapeList {
    let items: Vec<_> = items.into_iter().collect();
    ShapeList::from_items(&items)
}
