//! Callback parameter binding.
//!
//! When a catalog method takes a callback, the callback's parameters are
//! typed from the receiver before its body is walked: `xs.map(x => ...)`
//! gives `x` the element type of `xs`. Both inline functions and references
//! to named user functions are handled.

use tyflow_parser::ast::{Element, Expr, FnLike, Pattern};

use crate::builtins::CallbackShape;
use crate::env::Provenance;
use crate::infer::{Infer, Inferred};
use crate::ty::Ty;

/// Cap on confidence for callback parameters.
pub(crate) const PARAM_CONFIDENCE: f32 = 0.9;

/// Parameter types for a callback of `shape` over `receiver`. An unknown
/// element type leaves every parameter unknown.
pub(crate) fn callback_params(shape: CallbackShape, receiver: &Ty, seed: Option<&Ty>) -> Vec<Ty> {
    let item = receiver.element();
    if item.is_unknown() {
        return Vec::new();
    }
    match shape {
        CallbackShape::Iteration => vec![item, Ty::number(), receiver.clone()],
        CallbackShape::Reduce => {
            let acc = seed.cloned().unwrap_or_else(|| item.clone());
            vec![acc, item, Ty::number(), receiver.clone()]
        }
        CallbackShape::Compare => vec![item.clone(), item],
    }
}

impl Infer<'_> {
    /// Type the callback argument `arg` of a method called on `receiver`.
    ///
    /// Returns the argument's own value and the callback's return, if the
    /// callback is a function the engine can see into.
    pub(crate) fn callback(
        &mut self,
        arg: &Element,
        shape: CallbackShape,
        receiver: &Inferred,
        seed: Option<Inferred>,
    ) -> (Inferred, Option<Inferred>) {
        let Element::Expr(expr) = arg else {
            return (self.args(std::slice::from_ref(arg)).remove(0), None);
        };
        let seed = seed.filter(Inferred::is_known);
        let confidence = match &seed {
            Some(seed) => receiver.confidence.min(seed.confidence),
            None => receiver.confidence,
        }
        .min(PARAM_CONFIDENCE);
        let params = callback_params(shape, &receiver.ty, seed.as_ref().map(|s| &s.ty));

        match expr.clone().unparenthesized() {
            inner @ (Expr::Arrow(_) | Expr::Function(_)) => {
                let Some(func) = FnLike::cast(inner.syntax().clone()) else {
                    return (self.expr(expr), None);
                };
                self.bind_callback_params(&func, &params, confidence);
                let value = self.expr(expr);
                let ret = self.returns.get(&func.syntax().text_range()).cloned();
                (value, ret)
            }
            Expr::NameRef(name) => {
                let func = self
                    .names
                    .reference(&name)
                    .and_then(|id| self.names.function(id));
                if let Some(func) = &func {
                    self.bind_callback_params(func, &params, confidence);
                }
                let value = self.expr(expr);
                let ret = func.and_then(|f| self.returns.get(&f.syntax().text_range()).cloned());
                (value, ret)
            }
            _ => (self.expr(expr), None),
        }
    }

    fn bind_callback_params(&mut self, func: &FnLike, params: &[Ty], confidence: f32) {
        for (i, param) in func.params().iter().enumerate() {
            let Some(pattern) = param.pattern() else {
                continue;
            };
            let ty = match &pattern {
                Pattern::Rest(_) => Ty::array(Ty::Unknown),
                _ => params.get(i).cloned().unwrap_or(Ty::Unknown),
            };
            self.bind_pattern(&pattern, &Inferred::new(ty, confidence), Provenance::Parameter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_params() {
        let xs = Ty::array(Ty::number());
        let params = callback_params(CallbackShape::Iteration, &xs, None);
        assert_eq!(params, vec![Ty::number(), Ty::number(), xs]);
    }

    #[test]
    fn reduce_prefers_seed() {
        let xs = Ty::array(Ty::number());
        let seed = Ty::string();
        let params = callback_params(CallbackShape::Reduce, &xs, Some(&seed));
        assert_eq!(params[0], Ty::string());
        assert_eq!(params[1], Ty::number());
        let params = callback_params(CallbackShape::Reduce, &xs, None);
        assert_eq!(params[0], Ty::number());
    }

    #[test]
    fn unknown_element_types_nothing() {
        let xs = Ty::array(Ty::Unknown);
        assert!(callback_params(CallbackShape::Compare, &xs, None).is_empty());
    }
}
