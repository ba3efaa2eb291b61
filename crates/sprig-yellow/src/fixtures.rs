//! Hand-built trees shared by unit tests.

use sprig_text::SourceText;

use crate::SyntaxKind::{self, *};
use crate::factory::{list, missing_token, node, token, trivia};
use crate::{ShapeList, ShapeNode, ViewNode};

pub(crate) const SAMPLE: &str = "a + b; // hi\nc";

fn tok(kind: SyntaxKind, text: &str, trailing: &[(SyntaxKind, &str)]) -> ShapeNode {
    let trailing = list(trailing.iter().map(|&(kind, text)| trivia(kind, text)));
    token(kind, ShapeList::EMPTY, text, None, trailing)
}

/// `a + b; // hi\nc` with the second statement missing its semicolon.
pub(crate) fn sample_shape() -> ShapeNode {
    let a = node(NAME_EXPR, [Some(tok(NAME, "a", &[(WHITESPACE, " ")]))]);
    let plus = tok(PLUS, "+", &[(WHITESPACE, " ")]);
    let b = node(NAME_EXPR, [Some(tok(NAME, "b", &[]))]);
    let comment = [(WHITESPACE, " "), (LINE_COMMENT, "// hi"), (NEWLINE, "\n")];
    let semicolon = tok(SEMICOLON, ";", &comment);
    let first = node(
        EXPR_STMT,
        [Some(node(BINARY_EXPR, [Some(a), Some(plus), Some(b)])), Some(semicolon)],
    );

    let c = node(NAME_EXPR, [Some(tok(NAME, "c", &[]))]);
    let second = node(EXPR_STMT, [Some(c), Some(missing_token(SEMICOLON))]);

    let statements = list([first, second]);
    node(COMPILATION_UNIT, [statements.into_slot(), Some(tok(EOF, "", &[]))])
}

pub(crate) fn sample() -> ViewNode {
    ViewNode::new_root(sample_shape(), SourceText::new(SAMPLE))
}
