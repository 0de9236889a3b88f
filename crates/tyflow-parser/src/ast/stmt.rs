//! Typed AST nodes for statements and declarations.

use crate::ast::expr::{Expr, ParamList};
use crate::ast::pat::Pattern;
use crate::ast::{ast_node, child_node, child_nodes, child_token, first_significant_token, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.syntax.children().filter_map(Stmt::cast)
    }
}

/// Any statement node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    VarDecl(VarDecl),
    FnDecl(FnDecl),
    Return(ReturnStmt),
    If(IfStmt),
    For(ForStmt),
    ForOf(ForOfStmt),
    While(WhileStmt),
    Block(Block),
    Expr(ExprStmt),
    Empty(EmptyStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
}

impl Stmt {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        let stmt = match node.kind() {
            SyntaxKind::VAR_DECL => Stmt::VarDecl(VarDecl { syntax: node }),
            SyntaxKind::FN_DECL => Stmt::FnDecl(FnDecl { syntax: node }),
            SyntaxKind::RETURN_STMT => Stmt::Return(ReturnStmt { syntax: node }),
            SyntaxKind::IF_STMT => Stmt::If(IfStmt { syntax: node }),
            SyntaxKind::FOR_STMT => Stmt::For(ForStmt { syntax: node }),
            SyntaxKind::FOR_OF_STMT => Stmt::ForOf(ForOfStmt { syntax: node }),
            SyntaxKind::WHILE_STMT => Stmt::While(WhileStmt { syntax: node }),
            SyntaxKind::BLOCK => Stmt::Block(Block { syntax: node }),
            SyntaxKind::EXPR_STMT => Stmt::Expr(ExprStmt { syntax: node }),
            SyntaxKind::EMPTY_STMT => Stmt::Empty(EmptyStmt { syntax: node }),
            SyntaxKind::BREAK_STMT => Stmt::Break(BreakStmt { syntax: node }),
            SyntaxKind::CONTINUE_STMT => Stmt::Continue(ContinueStmt { syntax: node }),
            _ => return None,
        };
        Some(stmt)
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Stmt::VarDecl(n) => &n.syntax,
            Stmt::FnDecl(n) => &n.syntax,
            Stmt::Return(n) => &n.syntax,
            Stmt::If(n) => &n.syntax,
            Stmt::For(n) => &n.syntax,
            Stmt::ForOf(n) => &n.syntax,
            Stmt::While(n) => &n.syntax,
            Stmt::Block(n) => &n.syntax,
            Stmt::Expr(n) => &n.syntax,
            Stmt::Empty(n) => &n.syntax,
            Stmt::Break(n) => &n.syntax,
            Stmt::Continue(n) => &n.syntax,
        }
    }
}

// ── Declarations ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

ast_node!(VarDecl, VAR_DECL);

impl VarDecl {
    pub fn kind(&self) -> DeclKind {
        match first_significant_token(&self.syntax).map(|t| t.kind()) {
            Some(SyntaxKind::LET_KW) => DeclKind::Let,
            Some(SyntaxKind::CONST_KW) => DeclKind::Const,
            _ => DeclKind::Var,
        }
    }

    pub fn declarators(&self) -> impl Iterator<Item = Declarator> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(Declarator, DECLARATOR);

impl Declarator {
    pub fn pattern(&self) -> Option<Pattern> {
        self.syntax.children().find_map(Pattern::cast)
    }

    pub fn init(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(FnDecl, FN_DECL);

impl FnDecl {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}

ast_node!(Name, NAME);

impl Name {
    pub fn ident(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn text(&self) -> String {
        self.ident().map(|t| t.text().to_string()).unwrap_or_default()
    }
}

// ── Control flow ────────────────────────────────────────────────────────

ast_node!(Block, BLOCK);

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.syntax.children().filter_map(Stmt::cast)
    }
}

ast_node!(ExprStmt, EXPR_STMT);

impl ExprStmt {
    pub fn expr(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(ReturnStmt, RETURN_STMT);

impl ReturnStmt {
    pub fn expr(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    pub fn condition(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn then_branch(&self) -> Option<Stmt> {
        self.syntax.children().find_map(Stmt::cast)
    }

    pub fn else_branch(&self) -> Option<Stmt> {
        let branch = child_node::<ElseBranch>(&self.syntax)?;
        branch.syntax.children().find_map(Stmt::cast)
    }
}

ast_node!(ElseBranch, ELSE_BRANCH);

ast_node!(WhileStmt, WHILE_STMT);

impl WhileStmt {
    pub fn condition(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn body(&self) -> Option<Stmt> {
        self.syntax.children().find_map(Stmt::cast)
    }
}

ast_node!(ForStmt, FOR_STMT);

impl ForStmt {
    pub fn init_decl(&self) -> Option<VarDecl> {
        child_node(&self.syntax)
    }

    /// Init, condition and update expressions, in source order.
    pub fn head_exprs(&self) -> impl Iterator<Item = Expr> + '_ {
        self.syntax.children().filter_map(Expr::cast)
    }

    pub fn body(&self) -> Option<Stmt> {
        self.syntax
            .children()
            .filter(|n| n.kind() != SyntaxKind::VAR_DECL)
            .find_map(Stmt::cast)
    }
}

ast_node!(ForOfStmt, FOR_OF_STMT);

impl ForOfStmt {
    pub fn decl(&self) -> Option<VarDecl> {
        child_node(&self.syntax)
    }

    /// The loop binding pattern.
    pub fn pattern(&self) -> Option<Pattern> {
        self.decl()?.declarators().next()?.pattern()
    }

    /// `for (k in obj)` rather than `for (x of xs)`.
    pub fn is_for_in(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::IN_KW).is_some()
    }

    pub fn iterable(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn body(&self) -> Option<Stmt> {
        self.syntax
            .children()
            .filter(|n| n.kind() != SyntaxKind::VAR_DECL)
            .find_map(Stmt::cast)
    }
}

ast_node!(EmptyStmt, EMPTY_STMT);
ast_node!(BreakStmt, BREAK_STMT);
ast_node!(ContinueStmt, CONTINUE_STMT);
