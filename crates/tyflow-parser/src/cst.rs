//! Rowan-based concrete syntax tree types.
//!
//! Defines the `JsLanguage` marker type that connects [`SyntaxKind`] to
//! rowan's generic tree infrastructure, plus type aliases for convenience.

use crate::syntax_kind::SyntaxKind;

/// Marker type for the parsed language in rowan's generic tree system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JsLanguage {}

impl rowan::Language for JsLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ASSIGN_PAT as u16);
        // Safety: SyntaxKind is #[repr(u16)] with contiguous discriminants,
        // and the bound is checked above. Rowan only stores kinds that we
        // previously gave it via kind_to_raw.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

pub type SyntaxNode = rowan::SyntaxNode<JsLanguage>;

pub type SyntaxToken = rowan::SyntaxToken<JsLanguage>;

pub type SyntaxElement = rowan::SyntaxElement<JsLanguage>;
