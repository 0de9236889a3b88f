//! Typed AST nodes for binding patterns.

use crate::ast::expr::Expr;
use crate::ast::{ast_node, child_node, child_nodes, child_token, first_significant_token, AstNode, PropKey};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

/// Any binding pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    Ident(IdentPat),
    Array(ArrayPat),
    Object(ObjectPat),
    Rest(RestPat),
    Assign(AssignPat),
}

impl Pattern {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        let pat = match node.kind() {
            SyntaxKind::IDENT_PAT => Pattern::Ident(IdentPat { syntax: node }),
            SyntaxKind::ARRAY_PAT => Pattern::Array(ArrayPat { syntax: node }),
            SyntaxKind::OBJECT_PAT => Pattern::Object(ObjectPat { syntax: node }),
            SyntaxKind::REST_PAT => Pattern::Rest(RestPat { syntax: node }),
            SyntaxKind::ASSIGN_PAT => Pattern::Assign(AssignPat { syntax: node }),
            _ => return None,
        };
        Some(pat)
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Pattern::Ident(n) => &n.syntax,
            Pattern::Array(n) => &n.syntax,
            Pattern::Object(n) => &n.syntax,
            Pattern::Rest(n) => &n.syntax,
            Pattern::Assign(n) => &n.syntax,
        }
    }

    /// Every identifier this pattern binds, in source order.
    pub fn bindings(&self) -> Vec<IdentPat> {
        let mut out = Vec::new();
        collect_bindings(self, &mut out);
        out
    }
}

/// Walk pattern positions only, so names bound inside a default value's
/// own functions are not picked up.
fn collect_bindings(pat: &Pattern, out: &mut Vec<IdentPat>) {
    match pat {
        Pattern::Ident(ident) => out.push(ident.clone()),
        Pattern::Array(array) => {
            for element in array.elements() {
                collect_bindings(&element, out);
            }
        }
        Pattern::Object(object) => {
            for prop in object.props() {
                if let Some(target) = prop.pattern() {
                    collect_bindings(&target, out);
                }
            }
            if let Some(rest) = object.rest() {
                collect_bindings(&Pattern::Rest(rest), out);
            }
        }
        Pattern::Rest(rest) => {
            if let Some(inner) = rest.pattern() {
                collect_bindings(&inner, out);
            }
        }
        Pattern::Assign(assign) => {
            if let Some(inner) = assign.pattern() {
                collect_bindings(&inner, out);
            }
        }
    }
}

ast_node!(IdentPat, IDENT_PAT);

impl IdentPat {
    pub fn ident(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn text(&self) -> String {
        self.ident().map(|t| t.text().to_string()).unwrap_or_default()
    }
}

ast_node!(ArrayPat, ARRAY_PAT);

impl ArrayPat {
    /// Element patterns; holes are skipped and a trailing rest appears as
    /// [`Pattern::Rest`].
    pub fn elements(&self) -> impl Iterator<Item = Pattern> + '_ {
        self.syntax.children().filter_map(Pattern::cast)
    }
}

ast_node!(ObjectPat, OBJECT_PAT);

impl ObjectPat {
    pub fn props(&self) -> impl Iterator<Item = PropPat> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn rest(&self) -> Option<RestPat> {
        child_node(&self.syntax)
    }
}

ast_node!(PropPat, PROP_PAT);

impl PropPat {
    /// Source key; for shorthand `{ a }` / `{ a = 1 }` it is the bound name.
    pub fn key(&self) -> Option<PropKey> {
        if child_token(&self.syntax, SyntaxKind::COLON).is_none() {
            let name = match self.pattern()? {
                Pattern::Ident(ident) => ident.text(),
                Pattern::Assign(assign) => match assign.pattern()? {
                    Pattern::Ident(ident) => ident.text(),
                    _ => return None,
                },
                _ => return None,
            };
            return Some(PropKey::Static(name));
        }
        if let Some(computed) = child_node(&self.syntax) {
            return Some(PropKey::Computed(computed));
        }
        PropKey::from_token(&first_significant_token(&self.syntax)?)
    }

    /// The target pattern, including any `= default` wrapper.
    pub fn pattern(&self) -> Option<Pattern> {
        self.syntax.children().find_map(Pattern::cast)
    }
}

ast_node!(RestPat, REST_PAT);

impl RestPat {
    pub fn pattern(&self) -> Option<Pattern> {
        self.syntax.children().find_map(Pattern::cast)
    }
}

ast_node!(AssignPat, ASSIGN_PAT);

impl AssignPat {
    pub fn pattern(&self) -> Option<Pattern> {
        self.syntax.children().find_map(Pattern::cast)
    }

    pub fn default_value(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}
