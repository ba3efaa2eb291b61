use sprig_yellow::SyntaxKind::{self, *};
use sprig_yellow::factory::missing_token;
use sprig_yellow::{ShapeNode, SyntaxSet};

use crate::parser::Parser;

mod exprs;
mod stmts;

pub(crate) use stmts::compilation_unit;

pub(crate) const EXPR_FIRST: SyntaxSet =
    SyntaxSet::new([NAME, NUMBER, STRING, TRUE_KW, FALSE_KW, LEFT_PAREN, MINUS, BANG, TILDE, PLUS]);

pub(crate) const STMT_FIRST: SyntaxSet =
    EXPR_FIRST.union(&SyntaxSet::new([LEFT_BRACE, VAR_KW, FN_KW, IF_KW, WHILE_KW, RETURN_KW]));

/// Tokens a delimited list gives up at instead of skipping.
const LIST_RECOVERY: SyntaxSet = SyntaxSet::new([
    SEMICOLON,
    LEFT_BRACE,
    RIGHT_BRACE,
    VAR_KW,
    FN_KW,
    IF_KW,
    ELSE_KW,
    WHILE_KW,
    RETURN_KW,
]);

/// `bra (item (delim item)*)? ket`, with `,` as the delimiter. Returns the
/// three slots: the opening token, the separated list and the closing token.
pub(crate) fn delimited(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    first_set: &SyntaxSet,
    mut item: impl FnMut(&mut Parser<'_>) -> ShapeNode,
) -> [Option<ShapeNode>; 3] {
    if !p.at(bra) {
        return [Some(p.expect(bra)), None, Some(missing_token(ket))];
    }
    let open = p.bump();

    let mut items = p.builder();
    let mut expecting_item = true;
    loop {
        let kind = p.peek_kind();
        if kind == ket || kind == EOF || p.at_set(LIST_RECOVERY) {
            break;
        }

        if kind == COMMA && !expecting_item {
            items.push(p.bump());
            expecting_item = true;
        } else if expecting_item && (kind == COMMA || first_set.contains(kind)) {
            items.push(item(p));
            expecting_item = false;
        } else if first_set.contains(kind) {
            items.push(p.expect(COMMA));
            expecting_item = true;
        } else {
            p.skip();
        }
    }

    let items = p.finish_list(items);
    let close = p.expect(ket);
    [Some(open), items, Some(close)]
}
