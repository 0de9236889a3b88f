//! Tyflow type inference: multi-pass, confidence-weighted types for an
//! unannotated JavaScript subset.
//!
//! The engine assigns each binding and expression a [`Ty`] together with a
//! confidence in `[0, 1]`. It never fails on a syntactically valid program:
//! anything it cannot work out is `unknown`, because a wrong confident
//! annotation is worse than an honest unknown.
//!
//! # Architecture
//!
//! - [`ty`]: type representation, merge and refinement rules
//! - [`env`]: scope arena, bindings and the monotone `record` operation
//! - [`resolve`]: name resolution from identifiers to binding ids
//! - [`literal`]: literal and structural inference, pass-0 seeding
//! - [`builtins`]: the receiver-dependent built-in method catalog
//! - [`mod@infer`]: the fixpoint propagator
//! - [`diagnostics`]: syntax error rendering
//!
//! Use [`infer()`] (or [`infer_source`]) with [`InferOptions`] to get an
//! [`AnnotatedAst`].

mod annotate;
pub mod builtins;
mod callback;
pub mod diagnostics;
pub mod env;
pub mod error;
pub mod infer;
pub mod literal;
mod pattern;
pub mod resolve;
pub mod ty;

use std::fmt::{self, Write as _};

use rowan::TextRange;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;
use tyflow_common::span::Span;
use tyflow_parser::Parse;

use crate::annotate::Annotation;
use crate::builtins::Catalog;
use crate::env::{BindingKind, Provenance};
pub use crate::error::InferError;
pub use crate::infer::Inferred;
pub use crate::ty::Ty;

/// Engine settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferOptions {
    /// Run the engine at all. Off by default; a disabled run does no work.
    pub enabled: bool,
    /// Types below this confidence are reported as `unknown`. Applied only
    /// to the output, never during propagation.
    pub confidence_threshold: f32,
    /// Propagation pass ceiling.
    pub max_passes: usize,
}

impl Default for InferOptions {
    fn default() -> Self {
        InferOptions {
            enabled: false,
            confidence_threshold: 0.5,
            max_passes: 10,
        }
    }
}

/// Final state of one binding.
#[derive(Clone, Debug, Serialize)]
pub struct BindingSummary {
    pub name: String,
    pub span: Span,
    pub kind: BindingKind,
    #[serde(rename = "type", serialize_with = "serialize_display")]
    pub ty: Ty,
    pub confidence: f32,
    pub provenance: Provenance,
}

impl fmt::Display for BindingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}  ({:.2}, {})",
            self.name, self.ty, self.confidence, self.provenance
        )
    }
}

fn serialize_display<S: Serializer, T: fmt::Display>(value: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}

/// How the run went.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Propagation passes executed, not counting the literal seed.
    pub passes: usize,
    /// Whether the last pass changed nothing.
    pub converged: bool,
    /// False when the engine was bypassed.
    pub enabled: bool,
}

/// The parse together with everything inference found.
pub struct AnnotatedAst {
    parse: Parse,
    types: FxHashMap<TextRange, Inferred>,
    bindings: Vec<BindingSummary>,
    stats: RunStats,
}

impl AnnotatedAst {
    pub fn parse(&self) -> &Parse {
        &self.parse
    }

    /// Annotation for the node at `range`. Only known types at or above
    /// the threshold are present.
    pub fn type_of(&self, range: TextRange) -> Option<&Inferred> {
        self.types.get(&range)
    }

    pub fn types(&self) -> &FxHashMap<TextRange, Inferred> {
        &self.types
    }

    /// All bindings in declaration order.
    pub fn bindings(&self) -> &[BindingSummary] {
        &self.bindings
    }

    /// First binding declared with `name`.
    pub fn binding(&self, name: &str) -> Option<&BindingSummary> {
        self.bindings.iter().find(|b| b.name == name)
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// One line per binding: `name: type  (confidence, provenance)`.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        for binding in &self.bindings {
            let _ = writeln!(out, "{binding}");
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "bindings": self.bindings,
            "stats": self.stats,
        })
    }

    /// The source with `/*: T */` comments after annotated bindings.
    pub fn annotate(&self) -> String {
        let source = self.parse.syntax().to_string();
        let annotations = self
            .bindings
            .iter()
            .filter(|b| b.kind != BindingKind::Function)
            .map(|b| Annotation {
                end: b.span.end.into(),
                ty: (!b.ty.is_unknown()).then(|| b.ty.to_string()),
            })
            .collect();
        annotate::annotate(&source, annotations)
    }
}

/// Run inference on a parsed program.
///
/// A parse with errors is rejected whether or not the engine is enabled.
pub fn infer(parse: Parse, options: &InferOptions) -> Result<AnnotatedAst, InferError> {
    infer_with_catalog(parse, options, Catalog::global())
}

/// Parse `source` and run inference on it.
pub fn infer_source(source: &str, options: &InferOptions) -> Result<AnnotatedAst, InferError> {
    infer(tyflow_parser::parse(source), options)
}

/// [`infer`] with an explicit built-in catalog.
pub fn infer_with_catalog(
    parse: Parse,
    options: &InferOptions,
    catalog: &Catalog,
) -> Result<AnnotatedAst, InferError> {
    if !parse.ok() {
        return Err(InferError::Syntax(parse.errors().to_vec()));
    }
    if !options.enabled {
        return Ok(AnnotatedAst {
            parse,
            types: FxHashMap::default(),
            bindings: Vec::new(),
            stats: RunStats::default(),
        });
    }

    let outcome = infer::run(&parse.tree(), catalog, options.max_passes);
    let threshold = options.confidence_threshold;
    let visible = |value: &Inferred| value.is_known() && value.confidence >= threshold;

    let mut types: FxHashMap<TextRange, Inferred> = outcome
        .types
        .into_iter()
        .filter(|(_, value)| visible(value))
        .collect();

    let mut bindings = Vec::new();
    for (_, binding) in outcome.env.bindings() {
        let value = Inferred::new(binding.ty.clone(), binding.confidence);
        let shown = visible(&value);
        if shown {
            types.insert(binding.decl_range, value);
        }
        bindings.push(BindingSummary {
            name: binding.name.clone(),
            span: Span::new(binding.decl_range.start().into(), binding.decl_range.end().into()),
            kind: binding.kind,
            ty: if shown { binding.ty.clone() } else { Ty::Unknown },
            confidence: binding.confidence,
            provenance: binding.provenance,
        });
    }
    bindings.sort_by_key(|b| (b.span.start, b.span.end));
    debug!(
        bindings = bindings.len(),
        annotated = types.len(),
        passes = outcome.passes,
        converged = outcome.converged,
        "inference finished"
    );

    Ok(AnnotatedAst {
        parse,
        types,
        bindings,
        stats: RunStats {
            passes: outcome.passes,
            converged: outcome.converged,
            enabled: true,
        },
    })
}
