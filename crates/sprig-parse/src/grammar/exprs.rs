use sprig_yellow::SyntaxKind::{self, *};
use sprig_yellow::factory::node;
use sprig_yellow::{ShapeNode, SyntaxSet};

use super::{EXPR_FIRST, delimited};
use crate::parser::Parser;

const PREFIX_OPERATORS: SyntaxSet = SyntaxSet::new([MINUS, BANG, TILDE, PLUS]);

/// Binding power of a binary operator; higher binds tighter.
fn binding_power(kind: SyntaxKind) -> Option<u8> {
    let power = match kind {
        PIPE_PIPE => 1,
        AMP_AMP => 2,
        PIPE => 3,
        CARET => 4,
        AMP => 5,
        EQ_EQ | BANG_EQ => 6,
        LT | LT_EQ | GT | GT_EQ => 7,
        PLUS | MINUS => 8,
        STAR | SLASH | PERCENT => 9,
        _ => return None,
    };
    Some(power)
}

/// An expression. Assignment is right associative and only a bare name can
/// be assigned to.
pub(crate) fn expr(p: &mut Parser<'_>) -> ShapeNode {
    let lhs = binary_expr(p, 0);
    if lhs.kind() != NAME_EXPR || !p.at(EQ) {
        return lhs;
    }

    let eq = p.bump();
    let rhs = expr(p);
    node(ASSIGN_EXPR, [Some(lhs), Some(eq), Some(rhs)])
}

fn binary_expr(p: &mut Parser<'_>, min_power: u8) -> ShapeNode {
    let mut lhs = unary_expr(p);

    while let Some(power) = binding_power(p.peek_kind()) {
        if power <= min_power {
            break;
        }
        let op = p.bump();
        let rhs = binary_expr(p, power);
        lhs = node(BINARY_EXPR, [Some(lhs), Some(op), Some(rhs)]);
    }

    lhs
}

fn unary_expr(p: &mut Parser<'_>) -> ShapeNode {
    if !p.at_set(PREFIX_OPERATORS) {
        return postfix_expr(p);
    }

    let op = p.bump();
    let operand = unary_expr(p);
    node(UNARY_EXPR, [Some(op), Some(operand)])
}

fn postfix_expr(p: &mut Parser<'_>) -> ShapeNode {
    let mut callee = primary_expr(p);

    while p.at(LEFT_PAREN) {
        let args = delimited(p, LEFT_PAREN, RIGHT_PAREN, &EXPR_FIRST, expr);
        let args = node(ARG_LIST, args);
        callee = node(CALL_EXPR, [Some(callee), Some(args)]);
    }

    callee
}

fn primary_expr(p: &mut Parser<'_>) -> ShapeNode {
    match p.peek_kind() {
        NUMBER | STRING | TRUE_KW | FALSE_KW => {
            let literal = p.bump();
            node(LITERAL_EXPR, [Some(literal)])
        }
        NAME => {
            let name = p.bump();
            node(NAME_EXPR, [Some(name)])
        }
        LEFT_PAREN => {
            let open = p.bump();
            let inner = expr(p);
            let close = p.expect(RIGHT_PAREN);
            node(PAREN_EXPR, [Some(open), Some(inner), Some(close)])
        }
        _ => {
            let name = p.missing(NAME, "expression");
            node(NAME_EXPR, [Some(name)])
        }
    }
}
