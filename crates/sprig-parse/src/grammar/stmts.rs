use sprig_yellow::factory::{missing_token, node};
use sprig_yellow::SyntaxKind::{self, *};
use sprig_yellow::{ShapeListBuilder, ShapeNode, SyntaxSet};

use super::{EXPR_FIRST, STMT_FIRST, delimited, exprs};
use crate::parser::Parser;

const PARAMETER_FIRST: SyntaxSet = SyntaxSet::new([NAME]);

pub(crate) fn compilation_unit(p: &mut Parser<'_>) -> ShapeNode {
    let mut statements = p.builder();
    statement_list(p, &mut statements, EOF);

    let statements = p.finish_list(statements);
    let eof = p.expect(EOF);
    node(COMPILATION_UNIT, [statements, Some(eof)])
}

/// Statements up to `end` or the end of input. Anything else that cannot
/// start a statement is skipped.
fn statement_list(p: &mut Parser<'_>, statements: &mut ShapeListBuilder, end: SyntaxKind) {
    while !p.at(EOF) && !p.at(end) {
        if let Some(statement) = p.reuse_statement() {
            statements.push(statement);
        } else if p.at_set(STMT_FIRST) {
            statements.push(statement(p));
        } else {
            p.skip();
        }
    }
}

fn statement(p: &mut Parser<'_>) -> ShapeNode {
    match p.peek_kind() {
        LEFT_BRACE => block(p),
        VAR_KW => variable_decl(p),
        FN_KW => function_decl(p),
        IF_KW => if_stmt(p),
        WHILE_KW => while_stmt(p),
        RETURN_KW => return_stmt(p),
        _ => expr_stmt(p),
    }
}

/// The body of `if`, `else` and `while`. Something always stands there, even
/// when nothing was written.
fn embedded_statement(p: &mut Parser<'_>) -> ShapeNode {
    if p.at_set(STMT_FIRST) {
        return statement(p);
    }
    let name = p.missing(NAME, "statement");
    let expr = node(NAME_EXPR, [Some(name)]);
    node(EXPR_STMT, [Some(expr), None])
}

fn block(p: &mut Parser<'_>) -> ShapeNode {
    if !p.at(LEFT_BRACE) {
        let open = p.expect(LEFT_BRACE);
        return node(BLOCK, [Some(open), None, Some(missing_token(RIGHT_BRACE))]);
    }
    let open = p.bump();

    let mut statements = p.builder();
    statement_list(p, &mut statements, RIGHT_BRACE);

    let statements = p.finish_list(statements);
    let close = p.expect(RIGHT_BRACE);
    node(BLOCK, [Some(open), statements, Some(close)])
}

fn variable_decl(p: &mut Parser<'_>) -> ShapeNode {
    let var_kw = p.bump();
    let name = p.expect(NAME);
    let eq = p.expect(EQ);
    let init = exprs::expr(p);
    let semicolon = p.expect(SEMICOLON);
    node(VARIABLE_DECL, [Some(var_kw), Some(name), Some(eq), Some(init), Some(semicolon)])
}

fn function_decl(p: &mut Parser<'_>) -> ShapeNode {
    let fn_kw = p.bump();
    let name = p.expect(NAME);
    let params = delimited(p, LEFT_PAREN, RIGHT_PAREN, &PARAMETER_FIRST, |p| {
        let name = p.expect(NAME);
        node(PARAMETER, [Some(name)])
    });
    let params = node(PARAMETER_LIST, params);
    let body = block(p);
    node(FUNCTION_DECL, [Some(fn_kw), Some(name), Some(params), Some(body)])
}

fn if_stmt(p: &mut Parser<'_>) -> ShapeNode {
    let if_kw = p.bump();
    let [open, condition, close] = paren_condition(p);
    let then_branch = embedded_statement(p);

    let else_clause = p.at(ELSE_KW).then(|| {
        let else_kw = p.bump();
        let body = embedded_statement(p);
        node(ELSE_CLAUSE, [Some(else_kw), Some(body)])
    });

    node(IF_STMT, [Some(if_kw), open, condition, close, Some(then_branch), else_clause])
}

fn while_stmt(p: &mut Parser<'_>) -> ShapeNode {
    let while_kw = p.bump();
    let [open, condition, close] = paren_condition(p);
    let body = embedded_statement(p);
    node(WHILE_STMT, [Some(while_kw), open, condition, close, Some(body)])
}

/// `( expr )` after `if` and `while`.
fn paren_condition(p: &mut Parser<'_>) -> [Option<ShapeNode>; 3] {
    let open = p.expect(LEFT_PAREN);
    let condition = exprs::expr(p);
    let close = p.expect(RIGHT_PAREN);
    [Some(open), Some(condition), Some(close)]
}

fn return_stmt(p: &mut Parser<'_>) -> ShapeNode {
    let return_kw = p.bump();
    let value = p.at_set(EXPR_FIRST).then(|| exprs::expr(p));
    let semicolon = p.expect(SEMICOLON);
    node(RETURN_STMT, [Some(return_kw), value, Some(semicolon)])
}

/// The `;` after an expression statement is optional.
fn expr_stmt(p: &mut Parser<'_>) -> ShapeNode {
    let expr = exprs::expr(p);
    let semicolon = p.at(SEMICOLON).then(|| p.bump());
    node(EXPR_STMT, [Some(expr), semicolon])
}
