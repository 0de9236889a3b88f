//! Event-based parser.
//!
//! The parser consumes a token stream and produces events (Open/Close/Advance)
//! that are later converted into a rowan green tree. This decouples parsing
//! logic from tree construction.
//!
//! # Architecture
//!
//! 1. Parse functions call `open()` to start a node, `advance()` to consume
//!    tokens, and `close()` to finish a node with its actual kind.
//! 2. Events are collected into a flat `Vec<Event>`.
//! 3. `build_tree()` converts events into a rowan `GreenNode`.
//!
//! `open_before()` wraps a previously completed node (turning `xs` into
//! `call_expr(xs, arg_list)`) using the "forward parent" technique.
//!
//! # Trivia
//!
//! Whitespace and comments are skipped by lookahead. `open()` flushes pending
//! trivia before starting a node, so a node's range begins at its first
//! significant token; `advance()` emits any remaining trivia before the token
//! it consumes.
//!
//! # Line breaks
//!
//! Semicolons are optional. `newline_before_current()` lets statement parsers
//! treat a line break as a terminator where automatic semicolon insertion
//! would (after `return`, before postfix `++`, ...).

pub(crate) mod expressions;
pub(crate) mod patterns;
pub(crate) mod statements;

use tyflow_common::span::Span;
use tyflow_common::token::{Token, TokenKind};

use crate::error::ParseError;
use crate::syntax_kind::SyntaxKind;

#[derive(Debug)]
enum Event {
    /// Start a new CST node. The `kind` is TOMBSTONE until `close()` patches it.
    ///
    /// `forward_parent` is set by `open_before()`: the node at that event
    /// index must be opened before this one.
    Open {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },
    Close,
    /// Consume the next token in the stream.
    Advance,
}

/// A started but not-yet-closed CST node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkOpened {
    index: usize,
}

/// A completed CST node, usable with `open_before()`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkClosed {
    index: usize,
}

pub(crate) struct Parser<'src> {
    /// All tokens from the lexer (including trivia and Eof).
    tokens: Vec<Token>,
    pos: usize,
    events: Vec<Event>,
    source: &'src str,
    errors: Vec<ParseError>,
    /// Set by the first error; parse functions bail out once it is set.
    has_error: bool,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            source,
            errors: Vec::new(),
            has_error: false,
        }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Kind of the Nth significant token ahead, or `EOF` past the end.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map_or(SyntaxKind::EOF, |t| SyntaxKind::from(t.kind))
    }

    pub(crate) fn current_text(&self) -> &str {
        let pos = self.skip_to_significant(self.pos);
        match self.tokens.get(pos) {
            Some(token) => token.span.text(self.source),
            None => "",
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        let pos = self.skip_to_significant(self.pos);
        match self.tokens.get(pos) {
            Some(token) => token.span,
            None => Span::empty_at(self.source.len() as u32),
        }
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    /// Whether the current token is the identifier `word` (`of`, ...).
    pub(crate) fn at_contextual(&self, word: &str) -> bool {
        self.at(SyntaxKind::IDENT) && self.current_text() == word
    }

    /// Whether a line break separates the previous token from the current one.
    pub(crate) fn newline_before_current(&self) -> bool {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .take_while(|t| t.kind.is_trivia())
            .any(|t| t.span.text(self.source).contains('\n'))
    }

    /// Whether the `(` at the cursor opens an arrow function parameter list,
    /// i.e. its matching `)` is followed by `=>`.
    pub(crate) fn at_arrow_params(&self) -> bool {
        let mut depth = 0u32;
        let mut significant = self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .filter(|t| !t.kind.is_trivia());
        for token in significant.by_ref() {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
        }
        significant.next().is_some_and(|t| t.kind == TokenKind::FatArrow)
    }

    // ── Mutation: node management ──────────────────────────────────────

    /// Start a new CST node. The kind is patched in by `close()`.
    pub(crate) fn open(&mut self) -> MarkOpened {
        if !self.events.is_empty() {
            self.eat_trivia();
        }
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        mark
    }

    /// Start a new CST node BEFORE a previously completed node, making the
    /// completed node its first child.
    pub(crate) fn open_before(&mut self, completed: MarkClosed) -> MarkOpened {
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        if let Event::Open { forward_parent, .. } = &mut self.events[completed.index] {
            *forward_parent = Some(mark.index);
        }
        mark
    }

    pub(crate) fn close(&mut self, m: MarkOpened, kind: SyntaxKind) -> MarkClosed {
        if let Event::Open {
            kind: slot_kind, ..
        } = &mut self.events[m.index]
        {
            *slot_kind = kind;
        }
        self.events.push(Event::Close);
        MarkClosed { index: m.index }
    }

    // ── Mutation: token consumption ────────────────────────────────────

    fn eat_trivia(&mut self) {
        while self
            .tokens
            .get(self.pos)
            .is_some_and(|t| t.kind.is_trivia())
        {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    /// Consume the current significant token along with the trivia before it.
    pub(crate) fn advance(&mut self) {
        self.eat_trivia();
        if self.pos < self.tokens.len() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    /// Consume the current token wrapped in an ERROR_NODE.
    pub(crate) fn advance_with_error(&mut self, message: &str) {
        let m = self.open();
        self.error(message);
        self.advance();
        self.close(m, SyntaxKind::ERROR_NODE);
    }

    /// Consume `kind` or record an error.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            self.error(&format!("expected {}", describe(kind)));
            false
        }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Error reporting ────────────────────────────────────────────────

    /// Record a parse error at the current token. Only the first error is kept.
    pub(crate) fn error(&mut self, message: &str) {
        if self.has_error {
            return;
        }
        let span = self.current_span();
        self.errors.push(ParseError::new(message, span));
        self.has_error = true;
    }

    pub(crate) fn error_with_related(&mut self, message: &str, related_span: Span, related_msg: &str) {
        if self.has_error {
            return;
        }
        let span = self.current_span();
        self.errors
            .push(ParseError::with_related(message, span, related_msg, related_span));
        self.has_error = true;
    }

    pub(crate) fn has_error(&self) -> bool {
        self.has_error
    }

    fn skip_to_significant(&self, mut pos: usize) -> usize {
        while self.tokens.get(pos).is_some_and(|t| t.kind.is_trivia()) {
            pos += 1;
        }
        pos
    }

    // ── Tree building ──────────────────────────────────────────────────

    /// Convert collected events into a rowan `GreenNode` and errors.
    ///
    /// When an Open event carries a forward parent, the chain is followed,
    /// the wrappers are opened outermost first, and their own Open events are
    /// turned into TOMBSTONEs so they are skipped when reached later.
    pub(crate) fn build_tree(mut self) -> (rowan::GreenNode, Vec<ParseError>) {
        let mut builder = rowan::GreenNodeBuilder::new();
        let mut token_pos: usize = 0;
        let mut forward_parents: Vec<SyntaxKind> = Vec::new();

        for i in 0..self.events.len() {
            match self.events[i] {
                Event::Open {
                    kind,
                    forward_parent: Some(_),
                } => {
                    forward_parents.clear();
                    forward_parents.push(kind);
                    let mut next = self.take_forward_parent(i);
                    while let Some(idx) = next {
                        if let Event::Open { kind, .. } = self.events[idx] {
                            forward_parents.push(kind);
                        }
                        next = self.take_forward_parent(idx);
                        if let Event::Open { kind, .. } = &mut self.events[idx] {
                            *kind = SyntaxKind::TOMBSTONE;
                        }
                    }
                    for &kind in forward_parents.iter().rev() {
                        if kind != SyntaxKind::TOMBSTONE {
                            builder.start_node(rowan::SyntaxKind(kind as u16));
                        }
                    }
                }
                Event::Open { kind, .. } => {
                    if kind != SyntaxKind::TOMBSTONE {
                        builder.start_node(rowan::SyntaxKind(kind as u16));
                    }
                }
                Event::Close => builder.finish_node(),
                Event::Advance => {
                    if let Some(token) = self.tokens.get(token_pos) {
                        let kind = SyntaxKind::from(token.kind);
                        builder.token(rowan::SyntaxKind(kind as u16), token.span.text(self.source));
                        token_pos += 1;
                    }
                }
            }
        }

        (builder.finish(), self.errors)
    }

    fn take_forward_parent(&mut self, idx: usize) -> Option<usize> {
        match &mut self.events[idx] {
            Event::Open { forward_parent, .. } => forward_parent.take(),
            _ => None,
        }
    }
}

/// Human-readable name of a token kind for "expected ..." messages.
fn describe(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::L_PAREN => "`(`",
        SyntaxKind::R_PAREN => "`)`",
        SyntaxKind::L_BRACKET => "`[`",
        SyntaxKind::R_BRACKET => "`]`",
        SyntaxKind::L_BRACE => "`{`",
        SyntaxKind::R_BRACE => "`}`",
        SyntaxKind::COLON => "`:`",
        SyntaxKind::SEMICOLON => "`;`",
        SyntaxKind::COMMA => "`,`",
        SyntaxKind::FAT_ARROW => "`=>`",
        SyntaxKind::EQ => "`=`",
        SyntaxKind::IDENT => "identifier",
        _ => "token",
    }
}

// ── Top-level parsing ──────────────────────────────────────────────────

/// Parse a complete source file into a SOURCE_FILE root.
pub(crate) fn parse_source_file(p: &mut Parser) {
    let root = p.open();

    while !p.at(SyntaxKind::EOF) {
        statements::stmt(p);
        if p.has_error() {
            break;
        }
    }

    // Consume remaining tokens (including EOF), even after an error, so the
    // tree stays lossless.
    while p.pos < p.tokens.len() {
        p.advance();
    }

    p.close(root, SyntaxKind::SOURCE_FILE);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(source: &str) -> Parser<'_> {
        Parser::new(tyflow_lexer::Lexer::tokenize(source), source)
    }

    #[test]
    fn lookahead_skips_trivia() {
        let p = parser("a /* c */ + // x\n b");
        assert_eq!(p.current(), SyntaxKind::IDENT);
        assert_eq!(p.nth(1), SyntaxKind::PLUS);
        assert_eq!(p.nth(2), SyntaxKind::IDENT);
        assert_eq!(p.nth(3), SyntaxKind::EOF);
        assert_eq!(p.nth(10), SyntaxKind::EOF);
    }

    #[test]
    fn newline_detection() {
        let mut p = parser("return\nx");
        p.advance();
        assert!(p.newline_before_current());
        let mut p = parser("return x");
        p.advance();
        assert!(!p.newline_before_current());
    }

    #[test]
    fn arrow_params_lookahead() {
        assert!(parser("(a, [b, c]) => a").at_arrow_params());
        assert!(parser("() => 1").at_arrow_params());
        assert!(!parser("(a + b) * 2").at_arrow_params());
        assert!(!parser("(a").at_arrow_params());
    }

    #[test]
    fn only_first_error_is_kept() {
        let mut p = parser(")");
        let root = p.open();
        p.expect(SyntaxKind::L_PAREN);
        p.expect(SyntaxKind::IDENT);
        p.advance();
        p.advance();
        p.close(root, SyntaxKind::SOURCE_FILE);
        let (_, errors) = p.build_tree();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "expected `(`");
    }
}
