//! Binding pattern parsers for declarations and parameters.
//!
//! Patterns: identifiers, array patterns with holes and rest, object
//! patterns with shorthand, rename (`a: b`), computed keys and rest, and
//! defaults (`a = 1`) at any element position.

use crate::syntax_kind::SyntaxKind;

use super::{expressions, MarkClosed, Parser};

pub(crate) fn pattern(p: &mut Parser) -> Option<MarkClosed> {
    match p.current() {
        SyntaxKind::IDENT => {
            let m = p.open();
            p.advance();
            Some(p.close(m, SyntaxKind::IDENT_PAT))
        }
        SyntaxKind::L_BRACKET => Some(array_pattern(p)),
        SyntaxKind::L_BRACE => Some(object_pattern(p)),
        _ => {
            p.error("expected a binding name or destructuring pattern");
            None
        }
    }
}

/// A pattern with an optional `= default`, wrapped in ASSIGN_PAT when present.
pub(crate) fn binding_element(p: &mut Parser) {
    if let Some(pat) = pattern(p) {
        if p.at(SyntaxKind::EQ) {
            let m = p.open_before(pat);
            p.advance(); // =
            expressions::expr(p);
            p.close(m, SyntaxKind::ASSIGN_PAT);
        }
    }
}

/// `...pattern`
pub(crate) fn rest_pattern(p: &mut Parser) {
    let m = p.open();
    p.advance(); // ...
    pattern(p);
    p.close(m, SyntaxKind::REST_PAT);
}

fn array_pattern(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // [

    while !p.at(SyntaxKind::R_BRACKET) && !p.at(SyntaxKind::EOF) {
        if p.eat(SyntaxKind::COMMA) {
            continue;
        }
        if p.at(SyntaxKind::DOT_DOT_DOT) {
            rest_pattern(p);
        } else {
            binding_element(p);
        }
        if p.has_error() {
            break;
        }
        if !p.at(SyntaxKind::R_BRACKET) && !p.expect(SyntaxKind::COMMA) {
            break;
        }
    }

    p.expect(SyntaxKind::R_BRACKET);
    p.close(m, SyntaxKind::ARRAY_PAT)
}

fn object_pattern(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // {

    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        if p.at(SyntaxKind::DOT_DOT_DOT) {
            rest_pattern(p);
        } else {
            prop_pattern(p);
        }
        if p.has_error() {
            break;
        }
        if !p.at(SyntaxKind::R_BRACE) && !p.expect(SyntaxKind::COMMA) {
            break;
        }
    }

    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::OBJECT_PAT)
}

/// `a`, `a = 1`, `key: pattern`, `[expr]: pattern`
fn prop_pattern(p: &mut Parser) {
    let m = p.open();

    match p.current() {
        SyntaxKind::IDENT if p.nth(1) != SyntaxKind::COLON => binding_element(p),
        SyntaxKind::L_BRACKET => {
            expressions::computed_key(p);
            p.expect(SyntaxKind::COLON);
            binding_element(p);
        }
        SyntaxKind::IDENT | SyntaxKind::STRING | SyntaxKind::NUMBER => {
            p.advance();
            p.expect(SyntaxKind::COLON);
            binding_element(p);
        }
        kind if kind.is_keyword() => {
            p.advance();
            p.expect(SyntaxKind::COLON);
            binding_element(p);
        }
        _ => p.error("expected property name in object pattern"),
    }

    p.close(m, SyntaxKind::PROP_PAT);
}
