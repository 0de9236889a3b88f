//! Pratt expression parser.
//!
//! Implements operator precedence parsing using binding power tables and
//! handles every expression form of the supported subset: literals, names,
//! array/object literals, functions and arrows, calls, `new`, member and
//! index access (optionally chained), unary/update/binary operators, the
//! conditional operator and assignment.

use crate::syntax_kind::SyntaxKind;

use super::{patterns, statements, MarkClosed, Parser};

// ── Binding Power Tables ───────────────────────────────────────────────

/// Returns (left_bp, right_bp) for infix operators.
///
/// Left < right means left-associative; left > right means right-associative
/// (assignment and `**`).
fn infix_binding_power(op: SyntaxKind) -> Option<(u8, u8)> {
    match op {
        SyntaxKind::EQ
        | SyntaxKind::PLUS_EQ
        | SyntaxKind::MINUS_EQ
        | SyntaxKind::STAR_EQ
        | SyntaxKind::SLASH_EQ
        | SyntaxKind::PERCENT_EQ
        | SyntaxKind::STAR_STAR_EQ
        | SyntaxKind::AMP_EQ
        | SyntaxKind::PIPE_EQ
        | SyntaxKind::CARET_EQ
        | SyntaxKind::SHL_EQ
        | SyntaxKind::SHR_EQ
        | SyntaxKind::USHR_EQ
        | SyntaxKind::AMP_AMP_EQ
        | SyntaxKind::PIPE_PIPE_EQ
        | SyntaxKind::QUESTION_QUESTION_EQ => Some((2, 1)),

        SyntaxKind::QUESTION_QUESTION | SyntaxKind::PIPE_PIPE => Some((5, 6)),
        SyntaxKind::AMP_AMP => Some((7, 8)),
        SyntaxKind::PIPE => Some((9, 10)),
        SyntaxKind::CARET => Some((11, 12)),
        SyntaxKind::AMP => Some((13, 14)),

        SyntaxKind::EQ_EQ | SyntaxKind::NOT_EQ | SyntaxKind::EQ_EQ_EQ | SyntaxKind::NOT_EQ_EQ => {
            Some((15, 16))
        }

        SyntaxKind::LT
        | SyntaxKind::GT
        | SyntaxKind::LT_EQ
        | SyntaxKind::GT_EQ
        | SyntaxKind::INSTANCEOF_KW
        | SyntaxKind::IN_KW => Some((17, 18)),

        SyntaxKind::SHL | SyntaxKind::SHR | SyntaxKind::USHR => Some((19, 20)),
        SyntaxKind::PLUS | SyntaxKind::MINUS => Some((21, 22)),
        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT => Some((23, 24)),
        SyntaxKind::STAR_STAR => Some((26, 25)),

        _ => None,
    }
}

fn prefix_binding_power(op: SyntaxKind) -> Option<((), u8)> {
    match op {
        SyntaxKind::BANG
        | SyntaxKind::MINUS
        | SyntaxKind::PLUS
        | SyntaxKind::TILDE
        | SyntaxKind::TYPEOF_KW
        | SyntaxKind::VOID_KW
        | SyntaxKind::PLUS_PLUS
        | SyntaxKind::MINUS_MINUS => Some(((), 27)),
        _ => None,
    }
}

fn is_assign_op(op: SyntaxKind) -> bool {
    matches!(infix_binding_power(op), Some((2, 1)))
}

/// `cond ? a : b` binds looser than `??` and tighter than assignment; the
/// alternate is parsed at `TERNARY_BP - 1` so nested conditionals associate
/// to the right.
const TERNARY_BP: u8 = 4;

/// Postfix `++`/`--`.
const UPDATE_BP: u8 = 29;

/// Calls, member access and indexing bind tighter than everything else.
const POSTFIX_BP: u8 = 31;

// ── Expression Entry Point ─────────────────────────────────────────────

/// Parse an expression at the lowest binding power (assignment included).
pub(crate) fn expr(p: &mut Parser) {
    expr_bp(p, 0);
}

/// The core Pratt loop: an atom or prefix expression, then postfix and
/// infix operators as long as their binding power reaches `min_bp`.
fn expr_bp(p: &mut Parser, min_bp: u8) -> Option<MarkClosed> {
    let mut lhs = lhs(p)?;

    loop {
        if p.has_error() {
            break;
        }

        let current = p.current();

        // ── Postfix: call ──
        if current == SyntaxKind::L_PAREN && POSTFIX_BP >= min_bp {
            let m = p.open_before(lhs);
            arg_list(p);
            lhs = p.close(m, SyntaxKind::CALL_EXPR);
            continue;
        }

        // ── Postfix: member access ──
        if current == SyntaxKind::DOT && POSTFIX_BP >= min_bp {
            lhs = member_access(p, lhs);
            continue;
        }

        // ── Postfix: index access ──
        if current == SyntaxKind::L_BRACKET && POSTFIX_BP >= min_bp {
            lhs = index_access(p, lhs);
            continue;
        }

        // ── Postfix: optional chain `?.b`, `?.[i]`, `?.(args)` ──
        if current == SyntaxKind::QUESTION_DOT && POSTFIX_BP >= min_bp {
            let m = p.open_before(lhs);
            p.advance(); // ?.
            lhs = match p.current() {
                SyntaxKind::L_PAREN => {
                    arg_list(p);
                    p.close(m, SyntaxKind::CALL_EXPR)
                }
                SyntaxKind::L_BRACKET => {
                    p.advance();
                    expr(p);
                    p.expect(SyntaxKind::R_BRACKET);
                    p.close(m, SyntaxKind::INDEX_EXPR)
                }
                _ => {
                    property_name(p);
                    p.close(m, SyntaxKind::MEMBER_EXPR)
                }
            };
            continue;
        }

        // ── Postfix: update (no line break allowed before the operator) ──
        if matches!(current, SyntaxKind::PLUS_PLUS | SyntaxKind::MINUS_MINUS)
            && UPDATE_BP >= min_bp
            && !p.newline_before_current()
        {
            let m = p.open_before(lhs);
            p.advance();
            lhs = p.close(m, SyntaxKind::POSTFIX_EXPR);
            continue;
        }

        // ── Conditional ──
        if current == SyntaxKind::QUESTION {
            if TERNARY_BP < min_bp {
                break;
            }
            let m = p.open_before(lhs);
            p.advance(); // ?
            expr(p);
            p.expect(SyntaxKind::COLON);
            expr_bp(p, TERNARY_BP - 1);
            lhs = p.close(m, SyntaxKind::CONDITIONAL_EXPR);
            continue;
        }

        // ── Infix operators ──
        if let Some((l_bp, r_bp)) = infix_binding_power(current) {
            if l_bp < min_bp {
                break;
            }

            let m = p.open_before(lhs);
            p.advance(); // operator
            expr_bp(p, r_bp);

            let kind = if is_assign_op(current) {
                SyntaxKind::ASSIGN_EXPR
            } else {
                SyntaxKind::BINARY_EXPR
            };
            lhs = p.close(m, kind);
            continue;
        }

        break;
    }

    Some(lhs)
}

/// Parse the left-hand side of an expression: an atom or a prefix operator.
fn lhs(p: &mut Parser) -> Option<MarkClosed> {
    let current = p.current();

    if let Some(((), r_bp)) = prefix_binding_power(current) {
        let m = p.open();
        p.advance(); // operator
        expr_bp(p, r_bp);
        return Some(p.close(m, SyntaxKind::UNARY_EXPR));
    }

    let closed = match current {
        SyntaxKind::NUMBER
        | SyntaxKind::STRING
        | SyntaxKind::TEMPLATE
        | SyntaxKind::REGEX
        | SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW
        | SyntaxKind::NULL_KW => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::LITERAL)
        }

        SyntaxKind::IDENT if p.nth(1) == SyntaxKind::FAT_ARROW => arrow_fn(p),

        SyntaxKind::IDENT => name_ref(p),

        SyntaxKind::THIS_KW => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::THIS_EXPR)
        }

        SyntaxKind::L_PAREN if p.at_arrow_params() => arrow_fn(p),

        SyntaxKind::L_PAREN => {
            let m = p.open();
            p.advance(); // (
            expr(p);
            p.expect(SyntaxKind::R_PAREN);
            p.close(m, SyntaxKind::PAREN_EXPR)
        }

        SyntaxKind::L_BRACKET => array_literal(p),

        SyntaxKind::L_BRACE => object_literal(p),

        SyntaxKind::FUNCTION_KW => fn_expr(p),

        SyntaxKind::NEW_KW => new_expr(p),

        SyntaxKind::ERROR => {
            let message = match p.current_text().chars().next() {
                Some('"' | '\'') => "unterminated string literal",
                Some('`') => "unterminated template literal",
                Some('/') if p.current_text().starts_with("/*") => "unterminated block comment",
                Some('/') => "unterminated regular expression",
                _ => "unexpected character",
            };
            p.advance_with_error(message);
            return None;
        }

        SyntaxKind::EOF => {
            p.error("expected expression, found end of file");
            return None;
        }

        _ => {
            p.error("expected expression");
            return None;
        }
    };

    Some(closed)
}

// ── Atoms ──────────────────────────────────────────────────────────────

fn name_ref(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // IDENT
    p.close(m, SyntaxKind::NAME_REF)
}

/// Property name after `.` or `?.`; keywords are allowed (`xs.new`).
fn property_name(p: &mut Parser) {
    if p.at(SyntaxKind::IDENT) || p.current().is_keyword() {
        p.advance();
    } else {
        p.error("expected property name");
    }
}

fn member_access(p: &mut Parser, lhs: MarkClosed) -> MarkClosed {
    let m = p.open_before(lhs);
    p.advance(); // .
    property_name(p);
    p.close(m, SyntaxKind::MEMBER_EXPR)
}

fn index_access(p: &mut Parser, lhs: MarkClosed) -> MarkClosed {
    let m = p.open_before(lhs);
    p.advance(); // [
    expr(p);
    p.expect(SyntaxKind::R_BRACKET);
    p.close(m, SyntaxKind::INDEX_EXPR)
}

/// `new Callee(args)`; the argument list is optional and the callee may be
/// a member chain (`new Intl.Collator()`).
fn new_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // new

    if let Some(mut callee) = lhs(p) {
        loop {
            if p.has_error() {
                break;
            }
            callee = match p.current() {
                SyntaxKind::DOT => member_access(p, callee),
                SyntaxKind::L_BRACKET => index_access(p, callee),
                _ => break,
            };
        }
    }

    if p.at(SyntaxKind::L_PAREN) {
        arg_list(p);
    }
    p.close(m, SyntaxKind::NEW_EXPR)
}

/// `...expr` inside arrays, objects and argument lists.
fn spread_element(p: &mut Parser) {
    let m = p.open();
    p.advance(); // ...
    expr(p);
    p.close(m, SyntaxKind::SPREAD_ELEMENT);
}

/// `(a, ...b)`
fn arg_list(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_PAREN);

    while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        if p.at(SyntaxKind::DOT_DOT_DOT) {
            spread_element(p);
        } else {
            expr(p);
        }
        if p.has_error() {
            break;
        }
        if p.at(SyntaxKind::R_PAREN) || p.at(SyntaxKind::EOF) {
            break;
        }
        if !p.expect(SyntaxKind::COMMA) {
            break;
        }
    }

    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::ARG_LIST);
}

/// `[a, , ...b]`; holes are skipped.
fn array_literal(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // [

    while !p.at(SyntaxKind::R_BRACKET) && !p.at(SyntaxKind::EOF) {
        if p.eat(SyntaxKind::COMMA) {
            continue;
        }
        if p.at(SyntaxKind::DOT_DOT_DOT) {
            spread_element(p);
        } else {
            expr(p);
        }
        if p.has_error() {
            break;
        }
        if !p.at(SyntaxKind::R_BRACKET) && !p.expect(SyntaxKind::COMMA) {
            break;
        }
    }

    p.expect(SyntaxKind::R_BRACKET);
    p.close(m, SyntaxKind::ARRAY_EXPR)
}

fn object_literal(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // {

    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        if p.at(SyntaxKind::DOT_DOT_DOT) {
            spread_element(p);
        } else {
            property(p);
        }
        if p.has_error() {
            break;
        }
        if !p.at(SyntaxKind::R_BRACE) && !p.expect(SyntaxKind::COMMA) {
            break;
        }
    }

    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::OBJECT_EXPR)
}

/// One object literal member: `key: value`, shorthand `key`, computed
/// `[k]: v`, or method `key(params) { ... }`.
fn property(p: &mut Parser) {
    let m = p.open();

    match p.current() {
        SyntaxKind::IDENT if matches!(p.nth(1), SyntaxKind::COMMA | SyntaxKind::R_BRACE) => {
            name_ref(p);
            p.close(m, SyntaxKind::PROPERTY);
            return;
        }
        SyntaxKind::L_BRACKET => computed_key(p),
        SyntaxKind::IDENT | SyntaxKind::STRING | SyntaxKind::NUMBER => p.advance(),
        kind if kind.is_keyword() => p.advance(),
        _ => p.error("expected property name"),
    }

    if p.at(SyntaxKind::L_PAREN) {
        let f = p.open();
        param_list(p);
        statements::block(p);
        p.close(f, SyntaxKind::FN_EXPR);
    } else {
        p.expect(SyntaxKind::COLON);
        expr(p);
    }

    p.close(m, SyntaxKind::PROPERTY);
}

/// `[expr]` in key position, shared with object patterns.
pub(crate) fn computed_key(p: &mut Parser) {
    let m = p.open();
    p.advance(); // [
    expr(p);
    p.expect(SyntaxKind::R_BRACKET);
    p.close(m, SyntaxKind::COMPUTED_KEY);
}

// ── Functions ──────────────────────────────────────────────────────────

/// `(a, b = 1, {c}, ...rest)`
pub(crate) fn param_list(p: &mut Parser) {
    let m = p.open();
    let open_span = p.current_span();
    p.expect(SyntaxKind::L_PAREN);

    while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        let param = p.open();
        if p.at(SyntaxKind::DOT_DOT_DOT) {
            patterns::rest_pattern(p);
        } else {
            patterns::binding_element(p);
        }
        p.close(param, SyntaxKind::PARAM);
        if p.has_error() {
            break;
        }
        if !p.at(SyntaxKind::R_PAREN) && !p.expect(SyntaxKind::COMMA) {
            break;
        }
    }

    if !p.eat(SyntaxKind::R_PAREN) {
        p.error_with_related("expected `)`", open_span, "parameter list opened here");
    }
    p.close(m, SyntaxKind::PARAM_LIST);
}

/// `x => body` or `(params) => body`; the body is a block or an expression.
fn arrow_fn(p: &mut Parser) -> MarkClosed {
    let m = p.open();

    if p.at(SyntaxKind::IDENT) {
        let list = p.open();
        let param = p.open();
        patterns::pattern(p);
        p.close(param, SyntaxKind::PARAM);
        p.close(list, SyntaxKind::PARAM_LIST);
    } else {
        param_list(p);
    }

    p.expect(SyntaxKind::FAT_ARROW);

    if p.at(SyntaxKind::L_BRACE) {
        statements::block(p);
    } else {
        expr(p);
    }

    p.close(m, SyntaxKind::ARROW_FN)
}

/// `function name?(params) { ... }` in expression position.
fn fn_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // function

    if p.at(SyntaxKind::IDENT) {
        let name = p.open();
        p.advance();
        p.close(name, SyntaxKind::NAME);
    }

    param_list(p);
    statements::block(p);
    p.close(m, SyntaxKind::FN_EXPR)
}
