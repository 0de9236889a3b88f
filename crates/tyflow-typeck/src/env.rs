//! Type environment: a scope arena mapping bindings to inferred types.
//!
//! Scopes live in a flat `Vec` and refer to their parent by index, so the
//! whole environment is owned by one inference run and dropped with it.
//! A binding is identified by its declaring scope and slot, never by name.

use std::fmt;

use rowan::TextRange;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::trace;

use crate::ty::{self, Ty, MAX_TYPE_DEPTH};

/// Index of a scope in the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

/// Identity of a binding: declaring scope plus slot within that scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId {
    pub scope: ScopeId,
    pub index: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    Function,
    Block,
}

/// How a binding was declared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Param,
}

/// Where a binding's current type came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    Literal,
    Propagated,
    InferredCall,
    Parameter,
    Unknown,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Provenance::Literal => "literal",
            Provenance::Propagated => "propagated",
            Provenance::InferredCall => "inferred-call",
            Provenance::Parameter => "parameter",
            Provenance::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug)]
pub struct Binding {
    pub name: String,
    /// Range of the declaring identifier.
    pub decl_range: TextRange,
    pub kind: BindingKind,
    pub ty: Ty,
    pub confidence: f32,
    pub provenance: Provenance,
    /// Set once two incompatible writes met; the binding stays `Unknown`.
    pub collided: bool,
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    names: FxHashMap<String, u32>,
    bindings: Vec<Binding>,
}

/// Outcome of recording a write into a binding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Update {
    Unchanged,
    /// Same type, higher confidence.
    Raised,
    /// Type gained information (unknown parts filled in, or widened by a
    /// nullish write).
    Refined,
    Collided,
}

/// The scope arena plus a generation counter bumped on every change.
#[derive(Debug)]
pub struct TypeEnv {
    scopes: Vec<Scope>,
    generation: u64,
}

impl TypeEnv {
    /// Create an environment holding only the program scope.
    pub fn new() -> Self {
        TypeEnv {
            scopes: vec![Scope {
                parent: None,
                kind: ScopeKind::Program,
                names: FxHashMap::default(),
                bindings: Vec::new(),
            }],
            generation: 0,
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn push_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: Some(parent),
            kind,
            names: FxHashMap::default(),
            bindings: Vec::new(),
        });
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    /// Nearest enclosing function (or program) scope, for `var` hoisting.
    pub fn function_scope(&self, mut id: ScopeId) -> ScopeId {
        loop {
            let scope = self.scope(id);
            match (scope.kind, scope.parent) {
                (ScopeKind::Block, Some(parent)) => id = parent,
                _ => return id,
            }
        }
    }

    /// Declare `name` in `scope`. Redeclaring a name in the same scope
    /// (`var x` twice, a function redeclared) returns the existing binding.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        decl_range: TextRange,
        kind: BindingKind,
    ) -> BindingId {
        let s = &mut self.scopes[scope.0 as usize];
        if let Some(&index) = s.names.get(name) {
            return BindingId { scope, index };
        }
        let index = s.bindings.len() as u32;
        s.bindings.push(Binding {
            name: name.to_string(),
            decl_range,
            kind,
            ty: Ty::Unknown,
            confidence: 0.0,
            provenance: Provenance::Unknown,
            collided: false,
        });
        s.names.insert(name.to_string(), index);
        BindingId { scope, index }
    }

    /// Resolve `name` from `scope` outward.
    pub fn lookup(&self, mut scope: ScopeId, name: &str) -> Option<BindingId> {
        loop {
            let s = self.scope(scope);
            if let Some(&index) = s.names.get(name) {
                return Some(BindingId { scope, index });
            }
            scope = s.parent?;
        }
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.scopes[id.scope.0 as usize].bindings[id.index as usize]
    }

    /// All bindings in scope order.
    pub fn bindings(&self) -> impl Iterator<Item = (BindingId, &Binding)> + '_ {
        self.scopes.iter().enumerate().flat_map(|(s, scope)| {
            scope.bindings.iter().enumerate().map(move |(i, b)| {
                (
                    BindingId {
                        scope: ScopeId(s as u32),
                        index: i as u32,
                    },
                    b,
                )
            })
        })
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Record a write of `ty` at `confidence` into a binding.
    ///
    /// Confidence never goes down, except on a collision which resets the
    /// binding to `Unknown` at 0.0 for the rest of the run.
    pub fn record(
        &mut self,
        id: BindingId,
        ty: &Ty,
        confidence: f32,
        provenance: Provenance,
    ) -> Update {
        let ty = if ty.depth() > MAX_TYPE_DEPTH {
            ty.truncated(MAX_TYPE_DEPTH)
        } else {
            ty.clone()
        };
        let binding = &mut self.scopes[id.scope.0 as usize].bindings[id.index as usize];
        if binding.collided || ty.is_unknown() {
            return Update::Unchanged;
        }

        let update = match ty::merge(&binding.ty, &ty) {
            None => {
                trace!(
                    name = %binding.name,
                    old = %binding.ty,
                    new = %ty,
                    "binding collision"
                );
                binding.ty = Ty::Unknown;
                binding.confidence = 0.0;
                binding.provenance = Provenance::Unknown;
                binding.collided = true;
                Update::Collided
            }
            Some(merged) if merged != binding.ty => {
                if binding.ty.is_unknown() {
                    binding.provenance = provenance;
                }
                binding.ty = merged;
                binding.confidence = binding.confidence.max(confidence);
                Update::Refined
            }
            Some(_) if confidence > binding.confidence => {
                binding.confidence = confidence;
                binding.provenance = provenance;
                Update::Raised
            }
            Some(_) => Update::Unchanged,
        };
        if update != Update::Unchanged {
            self.generation += 1;
        }
        update
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::TextSize;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(TextSize::from(start), TextSize::from(end))
    }

    #[test]
    fn lookup_walks_parent_indices() {
        let mut env = TypeEnv::new();
        let root = env.root();
        let x = env.declare(root, "x", range(0, 1), BindingKind::Let);
        let inner = env.push_scope(root, ScopeKind::Block);
        assert_eq!(env.lookup(inner, "x"), Some(x));
        assert_eq!(env.lookup(inner, "y"), None);
    }

    #[test]
    fn shadowing_gives_distinct_bindings() {
        let mut env = TypeEnv::new();
        let root = env.root();
        let outer = env.declare(root, "x", range(0, 1), BindingKind::Let);
        let block = env.push_scope(root, ScopeKind::Block);
        let inner = env.declare(block, "x", range(10, 11), BindingKind::Let);
        assert_ne!(outer, inner);
        assert_eq!(env.lookup(block, "x"), Some(inner));
        assert_eq!(env.lookup(root, "x"), Some(outer));
    }

    #[test]
    fn redeclaration_reuses_binding() {
        let mut env = TypeEnv::new();
        let root = env.root();
        let a = env.declare(root, "v", range(0, 1), BindingKind::Var);
        let b = env.declare(root, "v", range(5, 6), BindingKind::Var);
        assert_eq!(a, b);
        assert_eq!(env.binding(a).decl_range, range(0, 1));
    }

    #[test]
    fn function_scope_skips_blocks() {
        let mut env = TypeEnv::new();
        let root = env.root();
        let func = env.push_scope(root, ScopeKind::Function);
        let block = env.push_scope(func, ScopeKind::Block);
        let nested = env.push_scope(block, ScopeKind::Block);
        assert_eq!(env.function_scope(nested), func);
        assert_eq!(env.function_scope(root), root);
    }

    #[test]
    fn record_raises_confidence_monotonically() {
        let mut env = TypeEnv::new();
        let root = env.root();
        let x = env.declare(root, "x", range(0, 1), BindingKind::Const);
        assert_eq!(env.record(x, &Ty::number(), 0.7, Provenance::Propagated), Update::Refined);
        assert_eq!(env.record(x, &Ty::number(), 0.5, Provenance::Propagated), Update::Unchanged);
        assert_eq!(env.binding(x).confidence, 0.7);
        assert_eq!(env.record(x, &Ty::number(), 0.9, Provenance::Literal), Update::Raised);
        assert_eq!(env.binding(x).provenance, Provenance::Literal);
    }

    #[test]
    fn record_refines_unknown_parts() {
        let mut env = TypeEnv::new();
        let root = env.root();
        let xs = env.declare(root, "xs", range(0, 2), BindingKind::Let);
        env.record(xs, &Ty::array(Ty::Unknown), 1.0, Provenance::Literal);
        assert_eq!(
            env.record(xs, &Ty::array(Ty::string()), 0.9, Provenance::Propagated),
            Update::Refined
        );
        assert_eq!(env.binding(xs).ty, Ty::array(Ty::string()));
        assert_eq!(env.binding(xs).confidence, 1.0);
    }

    #[test]
    fn collision_is_sticky() {
        let mut env = TypeEnv::new();
        let root = env.root();
        let x = env.declare(root, "x", range(0, 1), BindingKind::Let);
        env.record(x, &Ty::number(), 1.0, Provenance::Literal);
        let before = env.generation();
        assert_eq!(env.record(x, &Ty::string(), 1.0, Provenance::Literal), Update::Collided);
        assert!(env.generation() > before);

        let b = env.binding(x);
        assert!(b.collided);
        assert_eq!(b.ty, Ty::Unknown);
        assert_eq!(b.confidence, 0.0);

        assert_eq!(env.record(x, &Ty::number(), 1.0, Provenance::Literal), Update::Unchanged);
        assert_eq!(env.binding(x).ty, Ty::Unknown);
    }

    #[test]
    fn unknown_writes_are_ignored() {
        let mut env = TypeEnv::new();
        let root = env.root();
        let x = env.declare(root, "x", range(0, 1), BindingKind::Let);
        env.record(x, &Ty::boolean(), 0.8, Provenance::Propagated);
        assert_eq!(env.record(x, &Ty::Unknown, 1.0, Provenance::Unknown), Update::Unchanged);
        assert_eq!(env.binding(x).ty, Ty::boolean());
    }

    #[test]
    fn nullish_write_widens() {
        let mut env = TypeEnv::new();
        let root = env.root();
        let x = env.declare(root, "x", range(0, 1), BindingKind::Let);
        env.record(x, &Ty::string(), 1.0, Provenance::Literal);
        assert_eq!(env.record(x, &Ty::null(), 1.0, Provenance::Literal), Update::Refined);
        assert_eq!(env.binding(x).ty.to_string(), "string | null");
    }
}
