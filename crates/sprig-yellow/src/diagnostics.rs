use sprig_errors::SyntaxDiagnostic;
use text_size::{TextRange, TextSize};

use crate::ShapeNode;

/// Stores each diagnostic on the smallest non-terminal whose full span covers
/// it. Offsets are relative to `root`.
///
/// Tokens and lists never receive diagnostics here, so they can be shared
/// between trees without dragging stale messages along.
pub fn attach_diagnostics(
    root: &ShapeNode,
    diagnostics: impl IntoIterator<Item = SyntaxDiagnostic>,
) -> ShapeNode {
    diagnostics.into_iter().fold(root.clone(), |root, diagnostic| {
        match attach(&root, &diagnostic) {
            Some(root) => root,
            None => root.add_diagnostic(diagnostic),
        }
    })
}

fn attach(shape: &ShapeNode, diagnostic: &SyntaxDiagnostic) -> Option<ShapeNode> {
    let range = diagnostic.relative_range();
    let mut start = TextSize::new(0);

    for (slot, child) in shape.slots().enumerate() {
        let Some(child) = child else { continue };
        let child_range = TextRange::at(start, child.full_width());
        start = child_range.end();

        if child.is_token() || !covers(child_range, range) {
            continue;
        }

        let rebased = diagnostic.with_offset(range.start() - child_range.start());
        if let Some(child) = attach(child, &rebased) {
            return Some(shape.with_slot(slot, Some(child)));
        }
        break;
    }

    if shape.is_list() {
        return None;
    }
    Some(shape.add_diagnostic(diagnostic.clone()))
}

fn covers(outer: TextRange, inner: TextRange) -> bool {
    if inner.is_empty() {
        outer.start() <= inner.start() && inner.start() < outer.end()
    } else {
        outer.contains_range(inner)
    }
}

#[cfg(test)]
mod tests {
    use sprig_errors::DiagnosticCode;

    use super::*;
    use crate::ShapeList;
    use crate::SyntaxKind::*;
    use crate::shape::factory::{list, missing_token, node, token};

    fn tok(kind: crate::SyntaxKind, text: &str) -> ShapeNode {
        token(kind, ShapeList::EMPTY, text, None, ShapeList::EMPTY)
    }

    fn diagnostic(start: u32, len: u32) -> SyntaxDiagnostic {
        let range = TextRange::at(start.into(), len.into());
        SyntaxDiagnostic::new(DiagnosticCode::UnexpectedToken, range, "unexpected token")
    }

    // a+b;c;
    fn unit() -> ShapeNode {
        let binary = node(
            BINARY_EXPR,
            [
                Some(node(NAME_EXPR, [Some(tok(NAME, "a"))])),
                Some(tok(PLUS, "+")),
                Some(node(NAME_EXPR, [Some(tok(NAME, "b"))])),
            ],
        );
        let first = node(EXPR_STMT, [Some(binary), Some(tok(SEMICOLON, ";"))]);
        let second = node(
            EXPR_STMT,
            [Some(node(NAME_EXPR, [Some(tok(NAME, "c"))])), Some(missing_token(SEMICOLON))],
        );
        let third = node(EXPR_STMT, [Some(tok(SEMICOLON, ";"))]);
        let statements = list([first, second, third]);
        node(COMPILATION_UNIT, [statements.into_slot(), Some(tok(EOF, ""))])
    }

    fn kinds_with_diagnostics(shape: &ShapeNode, out: &mut Vec<crate::SyntaxKind>) {
        if !shape.diagnostics().is_empty() {
            out.push(shape.kind());
        }
        for child in shape.slots().flatten() {
            kinds_with_diagnostics(child, out);
        }
    }

    #[test]
    fn lands_on_smallest_covering_node() {
        let root = attach_diagnostics(&unit(), [diagnostic(2, 1)]);

        let mut owners = Vec::new();
        kinds_with_diagnostics(&root, &mut owners);
        assert_eq!(owners, [NAME_EXPR]);
        assert_eq!(root.descendant_diagnostics()[0].offset(), TextSize::new(2));
    }

    #[test]
    fn spanning_siblings_goes_to_parent() {
        let root = attach_diagnostics(&unit(), [diagnostic(0, 3)]);

        let mut owners = Vec::new();
        kinds_with_diagnostics(&root, &mut owners);
        assert_eq!(owners, [BINARY_EXPR]);
    }

    #[test]
    fn zero_width_between_statements() {
        // Zero-width ranges belong to the node starting there.
        let root = attach_diagnostics(&unit(), [diagnostic(5, 0)]);

        let mut owners = Vec::new();
        kinds_with_diagnostics(&root, &mut owners);
        assert_eq!(owners, [EXPR_STMT]);
        assert_eq!(root.descendant_diagnostics()[0].offset(), TextSize::new(5));
    }

    #[test]
    fn single_token_node_keeps_token_clean() {
        let root = attach_diagnostics(&unit(), [diagnostic(5, 1)]);

        let mut owners = Vec::new();
        kinds_with_diagnostics(&root, &mut owners);
        assert_eq!(owners, [EXPR_STMT]);
        assert!(root.tokens().all(|token| token.diagnostics().is_empty()));
    }

    #[test]
    fn outside_everything_goes_to_root() {
        let root = attach_diagnostics(&unit(), [diagnostic(6, 0)]);
        assert_eq!(root.diagnostics().len(), 1);
    }
}
