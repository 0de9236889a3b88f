//! Recursive descent parser producing a rowan-based CST.
//!
//! This crate transforms the token stream from `tyflow-lexer` into a lossless
//! concrete syntax tree. Whitespace and comments are kept as trivia, so every
//! node's text range is a byte range of the original source. The typed
//! [`ast`] layer sits on top of the raw tree.

pub mod ast;
pub mod cst;
pub mod error;
mod parser;
pub mod syntax_kind;

pub use cst::{SyntaxElement, SyntaxNode, SyntaxToken};
pub use error::ParseError;
pub use syntax_kind::SyntaxKind;

/// Result of parsing a source file.
///
/// With the first-error-only strategy, `errors` holds at most one error.
#[derive(Debug, Clone)]
pub struct Parse {
    green: rowan::GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Build the syntax tree root from the green node.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The root as a typed [`ast::SourceFile`].
    pub fn tree(&self) -> ast::SourceFile {
        ast::SourceFile {
            syntax: self.syntax(),
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a source file into a CST.
pub fn parse(source: &str) -> Parse {
    let tokens = tyflow_lexer::Lexer::tokenize(source);
    let mut p = parser::Parser::new(tokens, source);
    parser::parse_source_file(&mut p);
    let (green, errors) = p.build_tree();
    Parse { green, errors }
}

/// Render a tree as an indented list of node kinds and ranges, skipping
/// trivia. Used by tests and `--debug` style tooling.
pub fn debug_tree(node: &SyntaxNode) -> String {
    let mut out = String::new();
    write_node(node, 0, &mut out);
    out
}

fn write_node(node: &SyntaxNode, depth: usize, out: &mut String) {
    use std::fmt::Write;

    let _ = writeln!(out, "{:indent$}{:?}@{:?}", "", node.kind(), node.text_range(), indent = depth * 2);
    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Node(n) => write_node(&n, depth + 1, out),
            rowan::NodeOrToken::Token(t) if !t.kind().is_trivia() && t.kind() != SyntaxKind::EOF => {
                let _ = writeln!(
                    out,
                    "{:indent$}{:?} {:?}",
                    "",
                    t.kind(),
                    t.text(),
                    indent = (depth + 1) * 2
                );
            }
            rowan::NodeOrToken::Token(_) => {}
        }
    }
}
