//! Typed AST layer on top of the rowan CST.
//!
//! The wrappers are newtype structs around `SyntaxNode` with typed accessor
//! methods that navigate to children by kind, following the rust-analyzer
//! pattern. `cast()` is a single kind check and accessors walk the rowan tree
//! directly.

pub mod expr;
pub mod pat;
pub mod stmt;

pub use expr::*;
pub use pat::*;
pub use stmt::*;

use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

/// Trait for typed AST nodes that wrap a rowan `SyntaxNode`.
pub trait AstNode: Sized {
    /// Try to cast a generic `SyntaxNode` into this typed AST node.
    fn cast(node: SyntaxNode) -> Option<Self>;

    fn syntax(&self) -> &SyntaxNode;
}

/// Generate boilerplate for a typed AST node wrapper.
macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub(crate) syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn cast(node: SyntaxNode) -> Option<Self> {
                if node.kind() == SyntaxKind::$kind {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

pub(crate) use ast_node;

/// Find the first child node that can be cast to type `N`.
pub fn child_node<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

/// Find all child nodes that can be cast to type `N`.
pub fn child_nodes<'a, N: AstNode + 'a>(parent: &'a SyntaxNode) -> impl Iterator<Item = N> + 'a {
    parent.children().filter_map(N::cast)
}

/// Find the first child token with the given kind.
pub fn child_token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|it| it.kind() == kind)
}

/// First direct child token that is not trivia.
pub(crate) fn first_significant_token(parent: &SyntaxNode) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|it| !it.kind().is_trivia())
}

/// Key of an object literal member or object pattern member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropKey {
    /// Identifier, string or number key, normalized to its string value.
    Static(String),
    /// `[expr]`; the key is only known at run time.
    Computed(ComputedKey),
}

impl PropKey {
    /// Read a static key from a name, string or number token.
    pub(crate) fn from_token(token: &SyntaxToken) -> Option<PropKey> {
        match token.kind() {
            SyntaxKind::IDENT | SyntaxKind::NUMBER => Some(PropKey::Static(token.text().to_string())),
            SyntaxKind::STRING => Some(PropKey::Static(unquote(token.text()))),
            kind if kind.is_keyword() => Some(PropKey::Static(token.text().to_string())),
            _ => None,
        }
    }

    pub fn as_static(&self) -> Option<&str> {
        match self {
            PropKey::Static(name) => Some(name),
            PropKey::Computed(_) => None,
        }
    }
}

/// Strip the quotes off a string literal and resolve simple escapes.
pub fn unquote(text: &str) -> String {
    let inner = text
        .get(1..text.len().saturating_sub(1))
        .unwrap_or_default();
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
