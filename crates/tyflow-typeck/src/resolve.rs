//! Name resolution.
//!
//! One walk over the tree before inference starts. It builds the scope
//! arena, declares every binding, and maps each identifier reference and
//! each declaring identifier to its [`BindingId`]. Inference afterwards
//! only ever goes through these ids, so consistent renaming cannot change
//! its results.
//!
//! Hoisting follows the usual rules: `var` goes to the nearest function
//! scope, `let`/`const`/function declarations to the enclosing block,
//! parameters to the function scope, and a `for` head gets its own block.

use rowan::{TextRange, WalkEvent};
use rustc_hash::FxHashMap;
use tyflow_parser::ast::{
    AstNode, Block, DeclKind, Expr, FnLike, IdentPat, NameRef, Pattern, SourceFile, Stmt, VarDecl,
};
use tyflow_parser::{SyntaxKind, SyntaxNode};

use crate::env::{BindingId, BindingKind, ScopeId, ScopeKind, TypeEnv};

/// Identifier ranges mapped to bindings.
#[derive(Debug, Default)]
pub struct NameTable {
    /// `NAME_REF` range to the binding it reads. Missing means global.
    pub refs: FxHashMap<TextRange, BindingId>,
    /// Declaring identifier (`IDENT_PAT` or function `NAME`) range to its
    /// binding.
    pub decls: FxHashMap<TextRange, BindingId>,
    /// Bindings that hold a user function, with the function node.
    pub functions: FxHashMap<BindingId, SyntaxNode>,
}

impl NameTable {
    pub fn reference(&self, name: &NameRef) -> Option<BindingId> {
        self.refs.get(&name.syntax().text_range()).copied()
    }

    pub fn declaration(&self, ident: &IdentPat) -> Option<BindingId> {
        self.decls.get(&ident.syntax().text_range()).copied()
    }

    pub fn function(&self, binding: BindingId) -> Option<FnLike> {
        self.functions.get(&binding).cloned().and_then(FnLike::cast)
    }
}

/// Build the scope arena in `env` and resolve every name in `file`.
pub fn resolve(file: &SourceFile, env: &mut TypeEnv) -> NameTable {
    let mut resolver = Resolver {
        env,
        table: NameTable::default(),
    };
    let root = resolver.env.root();
    resolver.hoist_vars(file.syntax(), root);
    let stmts: Vec<Stmt> = file.statements().collect();
    resolver.declare_lexical(&stmts, root);
    for stmt in &stmts {
        resolver.stmt(stmt, root);
    }
    resolver.table
}

struct Resolver<'e> {
    env: &'e mut TypeEnv,
    table: NameTable,
}

impl Resolver<'_> {
    fn declare_ident(&mut self, ident: &IdentPat, scope: ScopeId, kind: BindingKind) -> BindingId {
        let range = ident.syntax().text_range();
        let id = self.env.declare(scope, &ident.text(), range, kind);
        self.table.decls.insert(range, id);
        id
    }

    fn declare_pattern(&mut self, pattern: &Pattern, scope: ScopeId, kind: BindingKind) {
        for ident in pattern.bindings() {
            self.declare_ident(&ident, scope, kind);
        }
    }

    /// Declare every `var` under `node` in `scope`, without entering
    /// nested functions.
    fn hoist_vars(&mut self, node: &SyntaxNode, scope: ScopeId) {
        let mut walk = node.preorder();
        while let Some(event) = walk.next() {
            let WalkEvent::Enter(n) = event else {
                continue;
            };
            match n.kind() {
                SyntaxKind::ARROW_FN | SyntaxKind::FN_EXPR | SyntaxKind::FN_DECL => {
                    walk.skip_subtree();
                }
                SyntaxKind::VAR_DECL => {
                    let Some(decl) = VarDecl::cast(n) else {
                        continue;
                    };
                    if decl.kind() != DeclKind::Var {
                        continue;
                    }
                    for declarator in decl.declarators() {
                        if let Some(pattern) = declarator.pattern() {
                            self.declare_pattern(&pattern, scope, BindingKind::Var);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Declare the `let`/`const`/function declarations of a statement list.
    fn declare_lexical(&mut self, stmts: &[Stmt], scope: ScopeId) {
        for stmt in stmts {
            match stmt {
                Stmt::VarDecl(decl) if decl.kind() != DeclKind::Var => {
                    let kind = binding_kind(decl.kind());
                    for declarator in decl.declarators() {
                        if let Some(pattern) = declarator.pattern() {
                            self.declare_pattern(&pattern, scope, kind);
                        }
                    }
                }
                Stmt::FnDecl(decl) => self.declare_fn_name(&FnLike::Decl(decl.clone()), scope),
                _ => {}
            }
        }
    }

    fn declare_fn_name(&mut self, func: &FnLike, scope: ScopeId) {
        let name = match func {
            FnLike::Decl(decl) => decl.name(),
            FnLike::Expr(expr) => expr.name(),
            FnLike::Arrow(_) => None,
        };
        let Some(name) = name else {
            return;
        };
        let range = name.syntax().text_range();
        if self.table.decls.contains_key(&range) {
            return;
        }
        let id = self.env.declare(scope, &name.text(), range, BindingKind::Function);
        self.table.decls.insert(range, id);
        self.table.functions.insert(id, func.syntax().clone());
    }

    fn stmt(&mut self, stmt: &Stmt, scope: ScopeId) {
        match stmt {
            Stmt::VarDecl(decl) => self.var_decl(decl, scope),
            Stmt::FnDecl(decl) => {
                let func = FnLike::Decl(decl.clone());
                self.declare_fn_name(&func, scope);
                self.function(&func, scope);
            }
            Stmt::Return(ret) => {
                if let Some(expr) = ret.expr() {
                    self.expr(&expr, scope);
                }
            }
            Stmt::If(if_stmt) => {
                if let Some(cond) = if_stmt.condition() {
                    self.expr(&cond, scope);
                }
                if let Some(then_branch) = if_stmt.then_branch() {
                    self.stmt(&then_branch, scope);
                }
                if let Some(else_branch) = if_stmt.else_branch() {
                    self.stmt(&else_branch, scope);
                }
            }
            Stmt::For(for_stmt) => {
                let head = self.env.push_scope(scope, ScopeKind::Block);
                if let Some(decl) = for_stmt.init_decl() {
                    self.declare_lexical(&[Stmt::VarDecl(decl.clone())], head);
                    self.var_decl(&decl, head);
                }
                for expr in for_stmt.head_exprs() {
                    self.expr(&expr, head);
                }
                if let Some(body) = for_stmt.body() {
                    self.stmt(&body, head);
                }
            }
            Stmt::ForOf(for_of) => {
                let head = self.env.push_scope(scope, ScopeKind::Block);
                if let Some(decl) = for_of.decl() {
                    self.declare_lexical(&[Stmt::VarDecl(decl.clone())], head);
                    self.var_decl(&decl, head);
                }
                if let Some(iterable) = for_of.iterable() {
                    self.expr(&iterable, head);
                }
                if let Some(body) = for_of.body() {
                    self.stmt(&body, head);
                }
            }
            Stmt::While(while_stmt) => {
                if let Some(cond) = while_stmt.condition() {
                    self.expr(&cond, scope);
                }
                if let Some(body) = while_stmt.body() {
                    self.stmt(&body, scope);
                }
            }
            Stmt::Block(block) => {
                let inner = self.env.push_scope(scope, ScopeKind::Block);
                self.block_body(block, inner);
            }
            Stmt::Expr(expr_stmt) => {
                if let Some(expr) = expr_stmt.expr() {
                    self.expr(&expr, scope);
                }
            }
            Stmt::Empty(_) | Stmt::Break(_) | Stmt::Continue(_) => {}
        }
    }

    fn block_body(&mut self, block: &Block, scope: ScopeId) {
        let stmts: Vec<Stmt> = block.statements().collect();
        self.declare_lexical(&stmts, scope);
        for stmt in &stmts {
            self.stmt(stmt, scope);
        }
    }

    /// Resolve the expressions of a declaration. Its names were declared
    /// by hoisting or by the enclosing block.
    fn var_decl(&mut self, decl: &VarDecl, scope: ScopeId) {
        for declarator in decl.declarators() {
            self.walk(declarator.syntax(), scope, None);

            let (Some(Pattern::Ident(ident)), Some(init)) = (declarator.pattern(), declarator.init())
            else {
                continue;
            };
            let init = init.unparenthesized();
            if matches!(init, Expr::Arrow(_) | Expr::Function(_)) {
                if let Some(id) = self.table.declaration(&ident) {
                    self.table.functions.insert(id, init.syntax().clone());
                }
            }
        }
    }

    fn function(&mut self, func: &FnLike, scope: ScopeId) {
        let fn_scope = self.env.push_scope(scope, ScopeKind::Function);
        if let FnLike::Expr(_) = func {
            self.declare_fn_name(func, fn_scope);
        }
        for param in func.params() {
            self.walk(param.syntax(), fn_scope, Some(BindingKind::Param));
        }
        if let Some(block) = func.body_block() {
            self.hoist_vars(block.syntax(), fn_scope);
            self.block_body(&block, fn_scope);
        } else if let Some(expr) = func.body_expr() {
            self.expr(&expr, fn_scope);
        }
    }

    fn expr(&mut self, expr: &Expr, scope: ScopeId) {
        self.walk(expr.syntax(), scope, None);
    }

    /// Resolve references under `node`. Identifier patterns are declared
    /// with `declare` when given; nested functions get their own scopes.
    fn walk(&mut self, node: &SyntaxNode, scope: ScopeId, declare: Option<BindingKind>) {
        let mut walk = node.preorder();
        while let Some(event) = walk.next() {
            let WalkEvent::Enter(n) = event else {
                continue;
            };
            match n.kind() {
                SyntaxKind::NAME_REF => {
                    let Some(name) = NameRef::cast(n) else {
                        continue;
                    };
                    if let Some(id) = self.env.lookup(scope, &name.text()) {
                        self.table.refs.insert(name.syntax().text_range(), id);
                    }
                }
                SyntaxKind::IDENT_PAT => {
                    if let (Some(kind), Some(ident)) = (declare, IdentPat::cast(n)) {
                        self.declare_ident(&ident, scope, kind);
                    }
                }
                SyntaxKind::ARROW_FN | SyntaxKind::FN_EXPR => {
                    if let Some(func) = FnLike::cast(n) {
                        self.function(&func, scope);
                    }
                    walk.skip_subtree();
                }
                _ => {}
            }
        }
    }
}

fn binding_kind(kind: DeclKind) -> BindingKind {
    match kind {
        DeclKind::Var => BindingKind::Var,
        DeclKind::Let => BindingKind::Let,
        DeclKind::Const => BindingKind::Const,
    }
}
