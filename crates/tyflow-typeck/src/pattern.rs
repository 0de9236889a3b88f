//! Binding values to patterns.
//!
//! Declarations, parameters, loop heads and destructuring assignments all
//! end up here: a value flows into a pattern and each identifier in it
//! receives the part of the value it destructures.

use tyflow_parser::ast::{Element, Expr, FnLike, ObjectMember, Pattern, PropKey};

use crate::env::Provenance;
use crate::infer::{Infer, Inferred, CALL_CONFIDENCE};
use crate::literal;
use crate::ty::Ty;

impl Infer<'_> {
    /// Record `value` into every identifier of `pattern`.
    pub(crate) fn bind_pattern(&mut self, pattern: &Pattern, value: &Inferred, provenance: Provenance) {
        match pattern {
            Pattern::Ident(ident) => {
                if let Some(id) = self.names.declaration(ident) {
                    self.env.record(id, &value.ty, value.confidence, provenance);
                }
            }
            Pattern::Array(array) => {
                let item = Inferred::new(value.ty.element(), value.confidence);
                for element in array.elements() {
                    match element {
                        Pattern::Rest(rest) => {
                            let tail = Inferred::new(Ty::array(item.ty.clone()), value.confidence);
                            if let Some(inner) = rest.pattern() {
                                self.bind_pattern(&inner, &tail, provenance);
                            }
                        }
                        other => self.bind_pattern(&other, &item, provenance),
                    }
                }
            }
            Pattern::Object(object) => {
                let source = value.ty.non_nullish().unwrap_or(Ty::Unknown);
                let mut taken = Vec::new();
                for prop in object.props() {
                    let field = match prop.key() {
                        Some(PropKey::Static(name)) => {
                            let ty = source.field(&name).cloned().unwrap_or(Ty::Unknown);
                            taken.push(name);
                            ty
                        }
                        Some(PropKey::Computed(key)) => {
                            if let Some(expr) = key.expr() {
                                self.expr(&expr);
                            }
                            Ty::Unknown
                        }
                        None => Ty::Unknown,
                    };
                    if let Some(target) = prop.pattern() {
                        self.bind_pattern(&target, &Inferred::new(field, value.confidence), provenance);
                    }
                }
                if let Some(inner) = object.rest().and_then(|rest| rest.pattern()) {
                    let rest = rest_of(&source, &taken);
                    self.bind_pattern(&inner, &Inferred::new(rest, value.confidence), provenance);
                }
            }
            Pattern::Rest(rest) => {
                if let Some(inner) = rest.pattern() {
                    self.bind_pattern(&inner, value, provenance);
                }
            }
            Pattern::Assign(assign) => {
                let default = assign.default_value().map(|expr| self.expr(&expr));
                let combined = with_default(value, default);
                if let Some(inner) = assign.pattern() {
                    self.bind_pattern(&inner, &combined, provenance);
                }
            }
        }
    }

    /// Bind call-site argument values to a user function's parameters.
    pub(crate) fn bind_call_params(&mut self, func: &FnLike, args: &[Inferred]) {
        for (i, param) in func.params().iter().enumerate() {
            let Some(pattern) = param.pattern() else {
                continue;
            };
            match (&pattern, args.get(i)) {
                (Pattern::Rest(_), _) => {
                    let rest = args.get(i..).unwrap_or_default();
                    let confidence = rest
                        .iter()
                        .filter(|a| a.is_known())
                        .map(|a| a.confidence)
                        .fold(CALL_CONFIDENCE, f32::min);
                    let ty = literal::array_of(rest.iter().map(|a| a.ty.clone()));
                    self.bind_pattern(&pattern, &Inferred::new(ty, confidence), Provenance::InferredCall);
                    break;
                }
                (_, Some(arg)) => {
                    self.bind_pattern(&pattern, &arg.capped(CALL_CONFIDENCE), Provenance::InferredCall);
                }
                (Pattern::Assign(_), None) => {
                    let missing = Inferred::new(Ty::undefined(), CALL_CONFIDENCE);
                    self.bind_pattern(&pattern, &missing, Provenance::InferredCall);
                }
                (_, None) => {}
            }
        }
    }

    /// Destructuring assignment: `x = v`, `[a, b] = v`, `({ a } = v)`.
    pub(crate) fn assign_target(&mut self, target: &Expr, value: &Inferred) {
        match target.clone().unparenthesized() {
            Expr::NameRef(name) => {
                self.note(target, value);
                if let Some(id) = self.names.reference(&name) {
                    self.env
                        .record(id, &value.ty, value.confidence, Provenance::Propagated);
                }
            }
            Expr::Array(array) => {
                let item = Inferred::new(value.ty.element(), value.confidence);
                for element in array.elements() {
                    match element {
                        Element::Expr(expr) => self.assign_target(&expr, &item),
                        Element::Spread(spread) => {
                            if let Some(expr) = spread.expr() {
                                let tail = Inferred::new(Ty::array(item.ty.clone()), value.confidence);
                                self.assign_target(&expr, &tail);
                            }
                        }
                    }
                }
            }
            Expr::Object(object) => {
                let source = value.ty.non_nullish().unwrap_or(Ty::Unknown);
                let mut taken = Vec::new();
                for member in object.members() {
                    match member {
                        ObjectMember::Property(prop) => {
                            let field = match prop.key() {
                                Some(PropKey::Static(name)) => {
                                    let ty = source.field(&name).cloned().unwrap_or(Ty::Unknown);
                                    taken.push(name);
                                    ty
                                }
                                _ => Ty::Unknown,
                            };
                            if let Some(expr) = prop.value() {
                                self.assign_target(&expr, &Inferred::new(field, value.confidence));
                            }
                        }
                        ObjectMember::Spread(spread) => {
                            if let Some(expr) = spread.expr() {
                                let rest = rest_of(&source, &taken);
                                self.assign_target(&expr, &Inferred::new(rest, value.confidence));
                            }
                        }
                    }
                }
            }
            Expr::Assign(assign) => {
                let default = assign.rhs().map(|expr| self.expr(&expr));
                let combined = with_default(value, default);
                if let Some(lhs) = assign.lhs() {
                    self.assign_target(&lhs, &combined);
                }
            }
            other => {
                self.expr(&other);
            }
        }
    }
}

/// Remaining fields after an object rest: the shape minus the destructured
/// keys, an opaque object for non-shape sources.
fn rest_of(source: &Ty, taken: &[String]) -> Ty {
    match source {
        Ty::Shape(fields) => Ty::Shape(
            fields
                .iter()
                .filter(|(name, _)| !taken.contains(name))
                .cloned()
                .collect(),
        ),
        Ty::Unknown => Ty::Unknown,
        _ => Ty::Object,
    }
}

/// Value of `pattern = default`: the default replaces the `undefined` part
/// of the incoming value.
fn with_default(value: &Inferred, default: Option<Inferred>) -> Inferred {
    let Some(default) = default else {
        return value.clone();
    };
    let present = match &value.ty {
        Ty::Unknown => return default,
        Ty::Union(members) => Ty::union(
            members
                .iter()
                .filter(|m| **m != Ty::undefined())
                .cloned(),
        ),
        ty if *ty == Ty::undefined() => return default,
        ty => ty.clone(),
    };
    if present == default.ty || !default.is_known() {
        Inferred::new(present, value.confidence)
    } else {
        Inferred::new(
            Ty::union([present, default.ty.clone()]),
            value.confidence.min(default.confidence),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fills_undefined() {
        let default = Some(Inferred::certain(Ty::number()));
        let missing = Inferred::certain(Ty::undefined());
        assert_eq!(with_default(&missing, default.clone()).ty, Ty::number());

        let maybe = Inferred::certain(Ty::union([Ty::number(), Ty::undefined()]));
        assert_eq!(with_default(&maybe, default.clone()).ty, Ty::number());

        let other = Inferred::certain(Ty::string());
        assert_eq!(
            with_default(&other, default).ty.to_string(),
            "number | string"
        );
    }

    #[test]
    fn object_rest_drops_taken_keys() {
        let shape = Ty::Shape(vec![
            ("a".into(), Ty::number()),
            ("b".into(), Ty::string()),
        ]);
        assert_eq!(rest_of(&shape, &["a".into()]).to_string(), "{ b: string }");
        assert_eq!(rest_of(&Ty::array(Ty::number()), &[]), Ty::Object);
        assert_eq!(rest_of(&Ty::Unknown, &[]), Ty::Unknown);
    }
}
