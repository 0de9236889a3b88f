//! The flow propagator.
//!
//! Pass 0 seeds every binding whose initializer is closed (a literal, or an
//! array/object of literals). Each later pass walks the whole program in
//! source order, evaluating every expression against the current
//! environment and writing what it learns back into bindings. The run stops
//! at the first pass that changes nothing, or at the pass ceiling.
//!
//! Expression types are kept per pass; only the final pass's table
//! survives. Function return types are tracked across passes so that a call
//! can see the return type computed on an earlier visit of the body.

use rowan::TextRange;
use rustc_hash::FxHashMap;
use tracing::{debug, debug_span};
use tyflow_parser::ast::{
    AssignExpr, AstNode, BinaryExpr, CallExpr, Declarator, Element, Expr, FnLike, IndexExpr,
    MemberExpr, NameRef, NewExpr, ObjectExpr, ObjectMember, Pattern, PropKey, SourceFile, Stmt,
    UnaryExpr, VarDecl,
};
use tyflow_parser::SyntaxKind;

use crate::builtins::{CallContext, Catalog, MatchLevel};
use crate::env::{Provenance, TypeEnv};
use crate::literal::{self, ShapeBuilder};
use crate::resolve::{self, NameTable};
use crate::ty::Ty;

/// Cap on confidence for anything learned through a user function call.
pub(crate) const CALL_CONFIDENCE: f32 = 0.8;

/// A type together with how sure the engine is of it.
#[derive(Clone, Debug, PartialEq)]
pub struct Inferred {
    pub ty: Ty,
    pub confidence: f32,
}

impl Inferred {
    pub fn new(ty: Ty, confidence: f32) -> Self {
        if ty.is_unknown() {
            return Inferred::unknown();
        }
        Inferred { ty, confidence }
    }

    pub fn certain(ty: Ty) -> Self {
        Inferred::new(ty, 1.0)
    }

    pub fn unknown() -> Self {
        Inferred {
            ty: Ty::Unknown,
            confidence: 0.0,
        }
    }

    pub fn is_known(&self) -> bool {
        !self.ty.is_unknown()
    }

    pub(crate) fn capped(&self, cap: f32) -> Self {
        Inferred::new(self.ty.clone(), self.confidence.min(cap))
    }
}

/// Everything a finished run leaves behind.
pub(crate) struct Outcome {
    pub env: TypeEnv,
    pub types: FxHashMap<TextRange, Inferred>,
    pub passes: usize,
    pub converged: bool,
}

pub(crate) struct Infer<'a> {
    pub(crate) catalog: &'a Catalog,
    pub(crate) env: TypeEnv,
    pub(crate) names: NameTable,
    /// Expression types of the current pass.
    types: FxHashMap<TextRange, Inferred>,
    /// Return type per function node, carried across passes.
    pub(crate) returns: FxHashMap<TextRange, Inferred>,
    /// One frame of collected `return` values per function being walked.
    return_frames: Vec<Vec<Inferred>>,
    return_changes: u64,
}

/// Run inference over `file` to a fixpoint or `max_passes`.
pub(crate) fn run(file: &SourceFile, catalog: &Catalog, max_passes: usize) -> Outcome {
    let _span = debug_span!("infer", max_passes).entered();

    let mut env = TypeEnv::new();
    let names = resolve::resolve(file, &mut env);
    debug!(scopes = env.scope_count(), "names resolved");

    let mut cx = Infer {
        catalog,
        env,
        names,
        types: FxHashMap::default(),
        returns: FxHashMap::default(),
        return_frames: Vec::new(),
        return_changes: 0,
    };
    cx.seed(file);
    debug!(pass = 0, updates = cx.changes(), "seeded literal bindings");

    let mut passes = 0;
    let mut converged = false;
    while passes < max_passes {
        passes += 1;
        let before = cx.changes();
        cx.types.clear();
        for stmt in file.statements() {
            cx.stmt(&stmt);
        }
        let updates = cx.changes() - before;
        debug!(pass = passes, updates, "pass finished");
        if updates == 0 {
            converged = true;
            break;
        }
    }
    if !converged {
        debug!(passes, "pass ceiling reached before fixpoint");
    }

    Outcome {
        env: cx.env,
        types: cx.types,
        passes,
        converged,
    }
}

impl<'a> Infer<'a> {
    fn changes(&self) -> u64 {
        self.env.generation() + self.return_changes
    }

    /// Pass 0: literal-initialized bindings.
    fn seed(&mut self, file: &SourceFile) {
        for node in file.syntax().descendants() {
            let Some(decl) = Declarator::cast(node) else {
                continue;
            };
            let (Some(Pattern::Ident(ident)), Some(init)) = (decl.pattern(), decl.init()) else {
                continue;
            };
            let Some(ty) = literal::closed_type(&init) else {
                continue;
            };
            if let Some(id) = self.names.declaration(&ident) {
                self.env.record(id, &ty, 1.0, Provenance::Literal);
            }
        }
    }

    // ── Statements ──────────────────────────────────────────────────────

    pub(crate) fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.var_decl(decl),
            Stmt::FnDecl(decl) => {
                let value = self.function(&FnLike::Decl(decl.clone()));
                let id = decl
                    .name()
                    .and_then(|name| self.names.decls.get(&name.syntax().text_range()).copied());
                if let Some(id) = id {
                    self.env
                        .record(id, &value.ty, value.confidence, Provenance::Propagated);
                }
            }
            Stmt::Return(ret) => {
                let value = match ret.expr() {
                    Some(expr) => self.expr(&expr),
                    None => Inferred::certain(Ty::undefined()),
                };
                if let Some(frame) = self.return_frames.last_mut() {
                    frame.push(value);
                }
            }
            Stmt::If(stmt) => {
                if let Some(cond) = stmt.condition() {
                    self.expr(&cond);
                }
                if let Some(then) = stmt.then_branch() {
                    self.stmt(&then);
                }
                if let Some(other) = stmt.else_branch() {
                    self.stmt(&other);
                }
            }
            Stmt::For(stmt) => {
                if let Some(decl) = stmt.init_decl() {
                    self.var_decl(&decl);
                }
                for expr in stmt.head_exprs() {
                    self.expr(&expr);
                }
                if let Some(body) = stmt.body() {
                    self.stmt(&body);
                }
            }
            Stmt::ForOf(stmt) => {
                let iterable = match stmt.iterable() {
                    Some(expr) => self.expr(&expr),
                    None => Inferred::unknown(),
                };
                let item = if stmt.is_for_in() {
                    Inferred::certain(Ty::string())
                } else {
                    Inferred::new(iterable.ty.element(), iterable.confidence)
                };
                if let Some(pattern) = stmt.pattern() {
                    self.bind_pattern(&pattern, &item, Provenance::Propagated);
                }
                if let Some(body) = stmt.body() {
                    self.stmt(&body);
                }
            }
            Stmt::While(stmt) => {
                if let Some(cond) = stmt.condition() {
                    self.expr(&cond);
                }
                if let Some(body) = stmt.body() {
                    self.stmt(&body);
                }
            }
            Stmt::Block(block) => {
                for stmt in block.statements() {
                    self.stmt(&stmt);
                }
            }
            Stmt::Expr(stmt) => {
                if let Some(expr) = stmt.expr() {
                    self.expr(&expr);
                }
            }
            Stmt::Empty(_) | Stmt::Break(_) | Stmt::Continue(_) => {}
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        for declarator in decl.declarators() {
            let (Some(pattern), Some(init)) = (declarator.pattern(), declarator.init()) else {
                continue;
            };
            let value = self.expr(&init);
            self.bind_pattern(&pattern, &value, provenance_of(&init));
        }
    }

    /// Walk a function body and produce the function's value type. The
    /// return type is stored for callers.
    pub(crate) fn function(&mut self, func: &FnLike) -> Inferred {
        self.return_frames.push(Vec::new());
        let mut open_end = false;
        let concise = match (func.body_block(), func.body_expr()) {
            (Some(block), _) => {
                for stmt in block.statements() {
                    self.stmt(&stmt);
                }
                open_end = block.statements().all(|stmt| falls_through(&stmt));
                None
            }
            (None, Some(expr)) => Some(self.expr(&expr)),
            (None, None) => None,
        };
        let mut collected = self.return_frames.pop().unwrap_or_default();
        // Running off the end returns `undefined` on that path.
        if open_end && !collected.is_empty() {
            collected.push(Inferred::certain(Ty::undefined()));
        }

        let ret = match concise {
            Some(value) => value,
            None if collected.is_empty() => Inferred::certain(Ty::Void),
            None => collected
                .into_iter()
                .reduce(|acc, next| join(&acc, &next))
                .unwrap_or_else(Inferred::unknown),
        };
        let range = func.syntax().text_range();
        if self.returns.get(&range) != Some(&ret) {
            self.returns.insert(range, ret.clone());
            self.return_changes += 1;
        }

        let params = func.params().iter().map(|p| self.param_type(p.pattern())).collect();
        Inferred::certain(Ty::function(params, ret.ty))
    }

    fn param_type(&self, pattern: Option<Pattern>) -> Ty {
        let ident = match pattern {
            Some(Pattern::Ident(ident)) => Some(ident),
            Some(Pattern::Assign(assign)) => match assign.pattern() {
                Some(Pattern::Ident(ident)) => Some(ident),
                _ => None,
            },
            Some(Pattern::Rest(rest)) => match rest.pattern() {
                Some(Pattern::Ident(ident)) => Some(ident),
                _ => None,
            },
            _ => None,
        };
        ident
            .and_then(|ident| self.names.declaration(&ident))
            .map(|id| self.env.binding(id).ty.clone())
            .unwrap_or(Ty::Unknown)
    }

    // ── Expressions ─────────────────────────────────────────────────────

    pub(crate) fn expr(&mut self, expr: &Expr) -> Inferred {
        let value = self.expr_inner(expr);
        self.types.insert(expr.syntax().text_range(), value.clone());
        value
    }

    fn expr_inner(&mut self, expr: &Expr) -> Inferred {
        match expr {
            Expr::Literal(lit) => Inferred::certain(literal::literal_type(lit)),
            Expr::NameRef(name) => self.name_ref(name),
            Expr::This(_) => Inferred::unknown(),
            Expr::Array(array) => {
                let mut elements = Vec::new();
                let mut confidence = 1.0f32;
                for element in array.elements() {
                    let value = match element {
                        Element::Expr(e) => self.expr(&e),
                        Element::Spread(spread) => {
                            let source = self.opt_expr(spread.expr());
                            Inferred::new(source.ty.element(), source.confidence)
                        }
                    };
                    if value.is_known() {
                        confidence = confidence.min(value.confidence);
                    }
                    elements.push(value.ty);
                }
                Inferred::new(literal::array_of(elements), confidence)
            }
            Expr::Object(object) => self.object(object),
            Expr::Paren(paren) => self.opt_expr(paren.expr()),
            Expr::Arrow(_) | Expr::Function(_) => match FnLike::cast(expr.syntax().clone()) {
                Some(func) => self.function(&func),
                None => Inferred::unknown(),
            },
            Expr::Call(call) => self.call(call),
            Expr::New(new) => self.new_expr(new),
            Expr::Member(member) => self.member(member),
            Expr::Index(index) => self.index(index),
            Expr::Unary(unary) => self.unary(unary),
            Expr::Postfix(postfix) => {
                self.opt_expr(postfix.operand());
                Inferred::certain(Ty::number())
            }
            Expr::Binary(binary) => self.binary(binary),
            Expr::Conditional(cond) => {
                self.opt_expr(cond.condition());
                let then = self.opt_expr(cond.then_expr());
                let other = self.opt_expr(cond.else_expr());
                join(&then, &other)
            }
            Expr::Assign(assign) => self.assign(assign),
        }
    }

    /// Record a type for an expression that is written rather than read.
    pub(crate) fn note(&mut self, expr: &Expr, value: &Inferred) {
        self.types.insert(expr.syntax().text_range(), value.clone());
    }

    fn opt_expr(&mut self, expr: Option<Expr>) -> Inferred {
        match expr {
            Some(expr) => self.expr(&expr),
            None => Inferred::unknown(),
        }
    }

    fn name_ref(&self, name: &NameRef) -> Inferred {
        if let Some(id) = self.names.reference(name) {
            let binding = self.env.binding(id);
            return Inferred::new(binding.ty.clone(), binding.confidence);
        }
        match self.catalog.value(&name.text()) {
            Some(ty) => Inferred::certain(ty.clone()),
            None => Inferred::unknown(),
        }
    }

    /// A name that refers to a built-in namespace such as `Math`, and is
    /// not shadowed by a user binding.
    fn namespace_of(&self, expr: Option<Expr>) -> Option<(NameRef, String)> {
        let Some(Expr::NameRef(name)) = expr else {
            return None;
        };
        let text = name.text();
        if self.names.reference(&name).is_none() && self.catalog.is_namespace(&text) {
            Some((name, text))
        } else {
            None
        }
    }

    fn object(&mut self, object: &ObjectExpr) -> Inferred {
        let mut shape = ShapeBuilder::new();
        let mut confidence = 1.0f32;
        for member in object.members() {
            match member {
                ObjectMember::Property(prop) => {
                    let value = self.opt_expr(prop.value());
                    match prop.key() {
                        Some(PropKey::Static(name)) => {
                            if value.is_known() {
                                confidence = confidence.min(value.confidence);
                            }
                            shape.field(name, value.ty);
                        }
                        Some(PropKey::Computed(key)) => {
                            self.opt_expr(key.expr());
                            shape.computed_key();
                        }
                        None => shape.computed_key(),
                    }
                }
                ObjectMember::Spread(spread) => {
                    let source = self.opt_expr(spread.expr());
                    if source.is_known() {
                        confidence = confidence.min(source.confidence);
                    }
                    shape.spread(&source.ty);
                }
            }
        }
        Inferred::new(shape.finish(), confidence)
    }

    fn member(&mut self, member: &MemberExpr) -> Inferred {
        let name = member.name_text().unwrap_or_default();
        if let Some((ns_ref, ns)) = self.namespace_of(member.object()) {
            self.expr(&Expr::NameRef(ns_ref));
            return match self.catalog.static_property(&ns, &name) {
                Some(ty) => Inferred::new(ty.clone(), MatchLevel::Exact.confidence()),
                None => Inferred::unknown(),
            };
        }

        let object = self.opt_expr(member.object());
        let value = self.property_of(&object, &name);
        optional(value, member.is_optional(), &object)
    }

    fn property_of(&self, object: &Inferred, name: &str) -> Inferred {
        let Some(core) = object.ty.non_nullish() else {
            return Inferred::unknown();
        };
        if let Some(field) = core.field(name) {
            return Inferred::new(field.clone(), object.confidence);
        }
        match self.catalog.property(&object.ty, name) {
            Some((ty, level)) => Inferred::new(ty, object.confidence.min(level.confidence())),
            None => Inferred::unknown(),
        }
    }

    fn index(&mut self, index: &IndexExpr) -> Inferred {
        let object = self.opt_expr(index.object());
        let key = self.opt_expr(index.index());
        let value = match object.ty.non_nullish() {
            Some(Ty::Array(elem)) if key.ty != Ty::string() => {
                Inferred::new(*elem, object.confidence)
            }
            Some(ty) if ty == Ty::string() => Inferred::new(ty, object.confidence),
            Some(shape @ Ty::Shape(_)) => {
                let field = match index.index() {
                    Some(Expr::Literal(lit)) => lit
                        .string_value()
                        .and_then(|name| shape.field(&name).cloned()),
                    _ => None,
                };
                field
                    .map(|ty| Inferred::new(ty, object.confidence))
                    .unwrap_or_else(Inferred::unknown)
            }
            _ => Inferred::unknown(),
        };
        optional(value, index.is_optional(), &object)
    }

    fn unary(&mut self, unary: &UnaryExpr) -> Inferred {
        self.opt_expr(unary.operand());
        match unary.op() {
            Some(SyntaxKind::BANG) => Inferred::certain(Ty::boolean()),
            Some(SyntaxKind::TYPEOF_KW) => Inferred::certain(Ty::string()),
            Some(SyntaxKind::VOID_KW) => Inferred::certain(Ty::undefined()),
            Some(
                SyntaxKind::MINUS
                | SyntaxKind::PLUS
                | SyntaxKind::TILDE
                | SyntaxKind::PLUS_PLUS
                | SyntaxKind::MINUS_MINUS,
            ) => Inferred::certain(Ty::number()),
            _ => Inferred::unknown(),
        }
    }

    fn binary(&mut self, binary: &BinaryExpr) -> Inferred {
        let lhs = self.opt_expr(binary.lhs());
        let rhs = self.opt_expr(binary.rhs());
        let Some(op) = binary.op() else {
            return Inferred::unknown();
        };
        binary_op(op, &lhs, &rhs)
    }

    fn assign(&mut self, assign: &AssignExpr) -> Inferred {
        let rhs = self.opt_expr(assign.rhs());
        let Some(lhs) = assign.lhs() else {
            return rhs;
        };
        match assign.op() {
            Some(SyntaxKind::EQ) | None => {
                self.assign_target(&lhs, &rhs);
                rhs
            }
            Some(op) => {
                let current = self.expr(&lhs);
                let value = match compound_base(op) {
                    Some(base) => binary_op(base, &current, &rhs),
                    None => Inferred::unknown(),
                };
                if let Expr::NameRef(name) = lhs.unparenthesized() {
                    if let Some(id) = self.names.reference(&name) {
                        self.env
                            .record(id, &value.ty, value.confidence, Provenance::Propagated);
                    }
                }
                value
            }
        }
    }

    fn new_expr(&mut self, new: &NewExpr) -> Inferred {
        self.args(&new.args());
        match new.callee() {
            Some(Expr::NameRef(name)) => {
                let global = self.names.reference(&name).is_none();
                let ctor = if global {
                    self.catalog.constructor(&name.text()).cloned()
                } else {
                    None
                };
                self.expr(&Expr::NameRef(name));
                Inferred::new(ctor.unwrap_or(Ty::Object), MatchLevel::Exact.confidence())
            }
            Some(callee) => {
                self.expr(&callee);
                Inferred::new(Ty::Object, MatchLevel::Category.confidence())
            }
            None => Inferred::unknown(),
        }
    }

    // ── Calls ───────────────────────────────────────────────────────────

    /// Evaluate call arguments. A spread argument is opaque.
    pub(crate) fn args(&mut self, args: &[Element]) -> Vec<Inferred> {
        args.iter()
            .map(|arg| match arg {
                Element::Expr(expr) => self.expr(expr),
                Element::Spread(spread) => {
                    self.opt_expr(spread.expr());
                    Inferred::unknown()
                }
            })
            .collect()
    }

    fn call(&mut self, call: &CallExpr) -> Inferred {
        let args = call.args();
        let Some(callee) = call.callee() else {
            self.args(&args);
            return Inferred::unknown();
        };
        match callee.clone().unparenthesized() {
            Expr::Member(member) => self.method_call(call, &member, &args),
            Expr::NameRef(name) => {
                self.expr(&callee);
                self.named_call(&name, &args)
            }
            Expr::Arrow(_) | Expr::Function(_) => {
                let values = self.args(&args);
                let Some(func) = FnLike::cast(callee.clone().unparenthesized().syntax().clone())
                else {
                    return Inferred::unknown();
                };
                self.bind_call_params(&func, &values);
                self.expr(&callee);
                self.return_of(&func)
            }
            _ => {
                let f = self.expr(&callee);
                self.args(&args);
                match f.ty {
                    Ty::Function(_, ret) => Inferred::new(*ret, f.confidence.min(CALL_CONFIDENCE)),
                    _ => Inferred::unknown(),
                }
            }
        }
    }

    fn named_call(&mut self, name: &NameRef, args: &[Element]) -> Inferred {
        let Some(id) = self.names.reference(name) else {
            let values = self.args(args);
            let Some(sig) = self.catalog.function(&name.text(), args.len()) else {
                return Inferred::unknown();
            };
            let tys: Vec<Ty> = values.into_iter().map(|v| v.ty).collect();
            let cx = CallContext {
                receiver: &Ty::Unknown,
                args: &tys,
                callback_return: None,
            };
            return Inferred::new((sig.resolve)(&cx), MatchLevel::Exact.confidence());
        };

        let values = self.args(args);
        if let Some(func) = self.names.function(id) {
            self.bind_call_params(&func, &values);
            return self.return_of(&func);
        }
        let binding = self.env.binding(id);
        match &binding.ty {
            Ty::Function(_, ret) => Inferred::new(
                (**ret).clone(),
                binding.confidence.min(CALL_CONFIDENCE),
            ),
            _ => Inferred::unknown(),
        }
    }

    /// Return type a caller sees: whatever the last visit of the body
    /// produced, capped at call confidence.
    pub(crate) fn return_of(&self, func: &FnLike) -> Inferred {
        self.returns
            .get(&func.syntax().text_range())
            .map(|ret| ret.capped(CALL_CONFIDENCE))
            .unwrap_or_else(Inferred::unknown)
    }

    fn method_call(&mut self, call: &CallExpr, member: &MemberExpr, args: &[Element]) -> Inferred {
        let name = member.name_text().unwrap_or_default();
        let catalog = self.catalog;

        if let Some((ns_ref, ns)) = self.namespace_of(member.object()) {
            self.expr(&Expr::NameRef(ns_ref));
            let values = self.args(args);
            let Some(sig) = catalog.static_method(&ns, &name, args.len()) else {
                return Inferred::unknown();
            };
            let tys: Vec<Ty> = values.into_iter().map(|v| v.ty).collect();
            let cx = CallContext {
                receiver: &Ty::Unknown,
                args: &tys,
                callback_return: None,
            };
            return Inferred::new((sig.resolve)(&cx), MatchLevel::Exact.confidence());
        }

        let receiver = self.opt_expr(member.object());
        let optional_chain = member.is_optional() || call.is_optional();

        if let Some(Ty::Function(_, ret)) = receiver.ty.non_nullish().and_then(|t| t.field(&name).cloned()) {
            self.args(args);
            let value = Inferred::new(*ret, receiver.confidence.min(CALL_CONFIDENCE));
            return optional(value, optional_chain, &receiver);
        }

        let Some(resolved) = catalog.method(&receiver.ty, &name, args.len()) else {
            self.args(args);
            return Inferred::unknown();
        };
        let signature = resolved.signature;
        let core = Inferred::new(resolved.receiver.clone(), receiver.confidence);

        let mut values = vec![Inferred::unknown(); args.len()];
        let callback = signature.callback.filter(|_| !args.is_empty());
        for (i, arg) in args.iter().enumerate() {
            if callback.is_some() && i == 0 {
                continue;
            }
            values[i] = self.args(std::slice::from_ref(arg)).remove(0);
        }
        let mut callback_return = None;
        if let (Some(shape), Some(arg)) = (callback, args.first()) {
            let seed = values.get(1).cloned();
            let (value, ret) = self.callback(arg, shape, &core, seed);
            values[0] = value;
            callback_return = ret.filter(Inferred::is_known);
        }

        let tys: Vec<Ty> = values.iter().map(|v| v.ty.clone()).collect();
        let cx = CallContext {
            receiver: &resolved.receiver,
            args: &tys,
            callback_return: callback_return.as_ref().map(|r| &r.ty),
        };
        let ty = (signature.resolve)(&cx);
        let value = Inferred::new(ty, receiver.confidence.min(resolved.level.confidence()));
        optional(value, optional_chain, &receiver)
    }
}

/// Provenance of a binding initialized from `init`.
fn provenance_of(init: &Expr) -> Provenance {
    if literal::closed_type(init).is_some() {
        return Provenance::Literal;
    }
    match init.clone().unparenthesized() {
        Expr::Call(_) | Expr::New(_) => Provenance::InferredCall,
        _ => Provenance::Propagated,
    }
}

/// `a?.b` on a receiver that may be nullish can itself be `undefined`.
fn optional(value: Inferred, is_optional: bool, receiver: &Inferred) -> Inferred {
    if is_optional && receiver.ty.is_nullable() && value.is_known() {
        Inferred::new(Ty::union([value.ty, Ty::undefined()]), value.confidence)
    } else {
        value
    }
}

/// Two values that meet at a branch (`?:`, `||`, `&&`, multiple returns):
/// one type if they agree, a union if both are known, otherwise unknown.
/// Whether control can reach the end of `stmt` without returning. Loops
/// are assumed to exit normally.
fn falls_through(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return(_) => false,
        Stmt::Block(block) => block.statements().all(|stmt| falls_through(&stmt)),
        Stmt::If(if_stmt) => match (if_stmt.then_branch(), if_stmt.else_branch()) {
            (Some(then), Some(other)) => falls_through(&then) || falls_through(&other),
            _ => true,
        },
        _ => true,
    }
}

pub(crate) fn join(a: &Inferred, b: &Inferred) -> Inferred {
    if !a.is_known() || !b.is_known() {
        return Inferred::unknown();
    }
    let confidence = a.confidence.min(b.confidence);
    if a.ty == b.ty {
        Inferred::new(a.ty.clone(), confidence)
    } else {
        Inferred::new(Ty::union([a.ty.clone(), b.ty.clone()]), confidence)
    }
}

fn compound_base(op: SyntaxKind) -> Option<SyntaxKind> {
    Some(match op {
        SyntaxKind::PLUS_EQ => SyntaxKind::PLUS,
        SyntaxKind::MINUS_EQ => SyntaxKind::MINUS,
        SyntaxKind::STAR_EQ => SyntaxKind::STAR,
        SyntaxKind::SLASH_EQ => SyntaxKind::SLASH,
        SyntaxKind::PERCENT_EQ => SyntaxKind::PERCENT,
        SyntaxKind::STAR_STAR_EQ => SyntaxKind::STAR_STAR,
        SyntaxKind::AMP_EQ => SyntaxKind::AMP,
        SyntaxKind::PIPE_EQ => SyntaxKind::PIPE,
        SyntaxKind::CARET_EQ => SyntaxKind::CARET,
        SyntaxKind::SHL_EQ => SyntaxKind::SHL,
        SyntaxKind::SHR_EQ => SyntaxKind::SHR,
        SyntaxKind::USHR_EQ => SyntaxKind::USHR,
        SyntaxKind::AMP_AMP_EQ => SyntaxKind::AMP_AMP,
        SyntaxKind::PIPE_PIPE_EQ => SyntaxKind::PIPE_PIPE,
        SyntaxKind::QUESTION_QUESTION_EQ => SyntaxKind::QUESTION_QUESTION,
        _ => return None,
    })
}

fn binary_op(op: SyntaxKind, lhs: &Inferred, rhs: &Inferred) -> Inferred {
    use SyntaxKind::*;
    match op {
        PLUS => {
            let strings: Vec<f32> = [lhs, rhs]
                .iter()
                .filter(|v| v.ty == Ty::string())
                .map(|v| v.confidence)
                .collect();
            if let Some(confidence) = strings.into_iter().reduce(f32::max) {
                Inferred::new(Ty::string(), confidence)
            } else {
                same_kind(lhs, rhs)
            }
        }
        MINUS | STAR | SLASH | PERCENT | STAR_STAR => same_kind(lhs, rhs),
        AMP | PIPE | CARET | SHL | SHR | USHR => Inferred::certain(Ty::number()),
        EQ_EQ | EQ_EQ_EQ | NOT_EQ | NOT_EQ_EQ | LT | GT | LT_EQ | GT_EQ | INSTANCEOF_KW
        | IN_KW => Inferred::certain(Ty::boolean()),
        AMP_AMP | PIPE_PIPE => join(lhs, rhs),
        QUESTION_QUESTION => {
            if lhs.ty.is_nullish() {
                rhs.clone()
            } else if lhs.ty.is_nullable() {
                join(lhs, rhs)
            } else {
                lhs.clone()
            }
        }
        _ => Inferred::unknown(),
    }
}

/// Arithmetic over two operands of one primitive kind keeps that kind. Mixed
/// kinds and nullish operands are not coerced.
fn same_kind(lhs: &Inferred, rhs: &Inferred) -> Inferred {
    match (&lhs.ty, &rhs.ty) {
        (Ty::Prim(a), Ty::Prim(b)) if a == b && !a.is_nullish() => {
            Inferred::new(lhs.ty.clone(), lhs.confidence.min(rhs.confidence))
        }
        _ => Inferred::unknown(),
    }
}
