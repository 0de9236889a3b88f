//! Statement parsers: declarations, control flow, blocks and expression
//! statements.

use crate::syntax_kind::SyntaxKind;

use super::{expressions, patterns, Parser};

const DECL_KEYWORDS: &[SyntaxKind] = &[SyntaxKind::VAR_KW, SyntaxKind::LET_KW, SyntaxKind::CONST_KW];

/// Parse a single statement.
pub(crate) fn stmt(p: &mut Parser) {
    match p.current() {
        SyntaxKind::VAR_KW | SyntaxKind::LET_KW | SyntaxKind::CONST_KW => {
            var_decl(p, false);
        }
        SyntaxKind::FUNCTION_KW if p.nth(1) == SyntaxKind::IDENT => fn_decl(p),
        SyntaxKind::RETURN_KW => return_stmt(p),
        SyntaxKind::IF_KW => if_stmt(p),
        SyntaxKind::FOR_KW => for_stmt(p),
        SyntaxKind::WHILE_KW => while_stmt(p),
        SyntaxKind::BREAK_KW => jump_stmt(p, SyntaxKind::BREAK_STMT),
        SyntaxKind::CONTINUE_KW => jump_stmt(p, SyntaxKind::CONTINUE_STMT),
        SyntaxKind::L_BRACE => block(p),
        SyntaxKind::SEMICOLON => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::EMPTY_STMT);
        }
        _ => {
            let m = p.open();
            expressions::expr(p);
            stmt_end(p);
            p.close(m, SyntaxKind::EXPR_STMT);
        }
    }
}

/// Consume a statement terminator: `;`, or nothing before `}`, end of file
/// or a line break.
fn stmt_end(p: &mut Parser) {
    if p.eat(SyntaxKind::SEMICOLON) {
        return;
    }
    if p.at(SyntaxKind::R_BRACE) || p.at(SyntaxKind::EOF) || p.newline_before_current() {
        return;
    }
    p.error("expected `;` or a line break");
}

/// `{ stmt* }`
pub(crate) fn block(p: &mut Parser) {
    let m = p.open();
    let open_span = p.current_span();
    if !p.expect(SyntaxKind::L_BRACE) {
        p.close(m, SyntaxKind::BLOCK);
        return;
    }

    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        stmt(p);
        if p.has_error() {
            break;
        }
    }

    if !p.eat(SyntaxKind::R_BRACE) {
        p.error_with_related("expected `}`", open_span, "block opened here");
    }
    p.close(m, SyntaxKind::BLOCK);
}

/// `var|let|const declarator, ...`
///
/// Inside a `for (...)` head the terminator is left to the loop parser and
/// the last declarator may be followed by `of`/`in`.
fn var_decl(p: &mut Parser, in_for_head: bool) {
    let m = p.open();
    p.advance(); // var / let / const

    loop {
        let d = p.open();
        patterns::pattern(p);
        if p.eat(SyntaxKind::EQ) {
            expressions::expr(p);
        }
        p.close(d, SyntaxKind::DECLARATOR);
        if p.has_error() || !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }

    if !in_for_head {
        stmt_end(p);
    }
    p.close(m, SyntaxKind::VAR_DECL);
}

/// `function name(params) { ... }`
fn fn_decl(p: &mut Parser) {
    let m = p.open();
    p.advance(); // function

    let name = p.open();
    p.expect(SyntaxKind::IDENT);
    p.close(name, SyntaxKind::NAME);

    expressions::param_list(p);
    block(p);
    p.close(m, SyntaxKind::FN_DECL);
}

/// `return expr?`; a line break right after `return` ends the statement.
fn return_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // return

    let ends_here = p.at_any(&[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE, SyntaxKind::EOF])
        || p.newline_before_current();
    if !ends_here {
        expressions::expr(p);
    }

    stmt_end(p);
    p.close(m, SyntaxKind::RETURN_STMT);
}

/// `break label?` / `continue label?`
fn jump_stmt(p: &mut Parser, kind: SyntaxKind) {
    let m = p.open();
    p.advance();
    if p.at(SyntaxKind::IDENT) && !p.newline_before_current() {
        p.advance();
    }
    stmt_end(p);
    p.close(m, kind);
}

/// `( expr )` after `if` / `while`.
fn condition(p: &mut Parser) {
    p.expect(SyntaxKind::L_PAREN);
    expressions::expr(p);
    p.expect(SyntaxKind::R_PAREN);
}

fn if_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // if
    condition(p);
    stmt(p);

    if !p.has_error() && p.at(SyntaxKind::ELSE_KW) {
        let e = p.open();
        p.advance();
        stmt(p);
        p.close(e, SyntaxKind::ELSE_BRANCH);
    }

    p.close(m, SyntaxKind::IF_STMT);
}

fn while_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // while
    condition(p);
    if !p.has_error() {
        stmt(p);
    }
    p.close(m, SyntaxKind::WHILE_STMT);
}

/// Classic `for (init; cond; update) body` or `for (decl of|in expr) body`.
fn for_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // for
    p.expect(SyntaxKind::L_PAREN);

    let mut kind = SyntaxKind::FOR_STMT;
    if p.at_any(DECL_KEYWORDS) {
        var_decl(p, true);
        if p.at_contextual("of") || p.at(SyntaxKind::IN_KW) {
            p.advance();
            expressions::expr(p);
            kind = SyntaxKind::FOR_OF_STMT;
        } else {
            p.expect(SyntaxKind::SEMICOLON);
        }
    } else if !p.eat(SyntaxKind::SEMICOLON) {
        expressions::expr(p);
        p.expect(SyntaxKind::SEMICOLON);
    }

    if kind == SyntaxKind::FOR_STMT {
        if !p.at(SyntaxKind::SEMICOLON) {
            expressions::expr(p);
        }
        p.expect(SyntaxKind::SEMICOLON);
        if !p.at(SyntaxKind::R_PAREN) {
            expressions::expr(p);
        }
    }

    p.expect(SyntaxKind::R_PAREN);
    if !p.has_error() {
        stmt(p);
    }
    p.close(m, kind);
}
