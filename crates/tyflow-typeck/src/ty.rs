//! Type representation for the inference engine.
//!
//! `Ty` is a closed variant: primitives, arrays, structural shapes, functions,
//! regular expressions, unions, and the two sentinels `Unknown` and `Void`.
//! Unions are always kept normalized (flattened, deduplicated, sorted) so
//! that structural equality is order-insensitive.

use std::fmt;

use serde::Serialize;

/// Types nested deeper than this are cut off at `Unknown`.
pub const MAX_TYPE_DEPTH: usize = 8;

/// A primitive value kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Number,
    String,
    Boolean,
    Null,
    Undefined,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Number => "number",
            Primitive::String => "string",
            Primitive::Boolean => "boolean",
            Primitive::Null => "null",
            Primitive::Undefined => "undefined",
        }
    }

    pub fn is_nullish(self) -> bool {
        matches!(self, Primitive::Null | Primitive::Undefined)
    }
}

/// An inferred type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ty {
    Prim(Primitive),
    /// `ArrayOf(E)`; `Array(Unknown)` is an array whose element type is not
    /// determined.
    Array(Box<Ty>),
    /// Structural object type. Fields keep first-seen order.
    Shape(Vec<(String, Ty)>),
    /// An object whose fields are not tracked.
    Object,
    Function(Vec<Ty>, Box<Ty>),
    RegExp,
    /// Two or more distinct members, sorted.
    Union(Vec<Ty>),
    Unknown,
    /// The result of a function that never returns a value.
    Void,
}

impl Ty {
    pub fn number() -> Ty {
        Ty::Prim(Primitive::Number)
    }

    pub fn string() -> Ty {
        Ty::Prim(Primitive::String)
    }

    pub fn boolean() -> Ty {
        Ty::Prim(Primitive::Boolean)
    }

    pub fn null() -> Ty {
        Ty::Prim(Primitive::Null)
    }

    pub fn undefined() -> Ty {
        Ty::Prim(Primitive::Undefined)
    }

    pub fn array(elem: Ty) -> Ty {
        Ty::Array(Box::new(elem))
    }

    pub fn function(params: Vec<Ty>, ret: Ty) -> Ty {
        Ty::Function(params, Box::new(ret))
    }

    /// Build a normalized union. Nested unions are flattened and duplicates
    /// removed; a single remaining member is returned as is. Any `Unknown`
    /// member makes the whole union `Unknown`.
    pub fn union(members: impl IntoIterator<Item = Ty>) -> Ty {
        let mut flat = Vec::new();
        for member in members {
            match member {
                Ty::Union(inner) => flat.extend(inner),
                Ty::Unknown => return Ty::Unknown,
                other => flat.push(other),
            }
        }
        flat.sort();
        flat.dedup();
        match flat.len() {
            0 => Ty::Unknown,
            1 => flat.pop().unwrap_or(Ty::Unknown),
            _ => Ty::Union(flat),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Ty::Unknown)
    }

    /// `null` or `undefined` on its own.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Ty::Prim(p) if p.is_nullish())
    }

    /// Whether a value of this type may be `null` or `undefined`.
    pub fn is_nullable(&self) -> bool {
        match self {
            Ty::Prim(p) => p.is_nullish(),
            Ty::Union(members) => members.iter().any(Ty::is_nullish),
            _ => false,
        }
    }

    /// The type with its `null`/`undefined` members removed. A purely
    /// nullish type yields `None`.
    pub fn non_nullish(&self) -> Option<Ty> {
        match self {
            Ty::Union(members) => {
                let rest: Vec<Ty> = members.iter().filter(|m| !m.is_nullish()).cloned().collect();
                if rest.is_empty() {
                    None
                } else {
                    Some(Ty::union(rest))
                }
            }
            ty if ty.is_nullish() => None,
            ty => Some(ty.clone()),
        }
    }

    /// Element type seen when iterating or spreading a value of this type.
    pub fn element(&self) -> Ty {
        match self {
            Ty::Array(elem) => (**elem).clone(),
            Ty::Prim(Primitive::String) => Ty::string(),
            _ => Ty::Unknown,
        }
    }

    /// Field type of a shape, if the field exists.
    pub fn field(&self, name: &str) -> Option<&Ty> {
        match self {
            Ty::Shape(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, ty)| ty),
            _ => None,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Ty::Array(elem) => 1 + elem.depth(),
            Ty::Shape(fields) => 1 + fields.iter().map(|(_, t)| t.depth()).max().unwrap_or(0),
            Ty::Function(params, ret) => {
                1 + params.iter().map(Ty::depth).max().unwrap_or(0).max(ret.depth())
            }
            Ty::Union(members) => members.iter().map(Ty::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    /// Replace everything nested deeper than `max` with `Unknown`.
    pub fn truncated(&self, max: usize) -> Ty {
        if max == 0 {
            return match self {
                Ty::Array(_) | Ty::Shape(_) | Ty::Function(..) => Ty::Unknown,
                Ty::Union(members) => Ty::union(members.iter().map(|m| m.truncated(0))),
                other => other.clone(),
            };
        }
        match self {
            Ty::Array(elem) => Ty::array(elem.truncated(max - 1)),
            Ty::Shape(fields) => Ty::Shape(
                fields
                    .iter()
                    .map(|(n, t)| (n.clone(), t.truncated(max - 1)))
                    .collect(),
            ),
            Ty::Function(params, ret) => Ty::function(
                params.iter().map(|p| p.truncated(max - 1)).collect(),
                ret.truncated(max - 1),
            ),
            Ty::Union(members) => Ty::union(members.iter().map(|m| m.truncated(max))),
            other => other.clone(),
        }
    }
}

/// Fill `Unknown` components of one type from the other when the two agree
/// everywhere else. Returns `None` when they disagree on a known component.
pub fn refine(a: &Ty, b: &Ty) -> Option<Ty> {
    match (a, b) {
        _ if a == b => Some(a.clone()),
        (Ty::Unknown, other) | (other, Ty::Unknown) => Some(other.clone()),
        (Ty::Array(x), Ty::Array(y)) => Some(Ty::array(refine(x, y)?)),
        (Ty::Shape(_), Ty::Object) => Some(a.clone()),
        (Ty::Object, Ty::Shape(_)) => Some(b.clone()),
        (Ty::Shape(xs), Ty::Shape(ys)) => {
            if xs.len() != ys.len() {
                return None;
            }
            let mut fields = Vec::with_capacity(xs.len());
            for ((xn, xt), (yn, yt)) in xs.iter().zip(ys) {
                if xn != yn {
                    return None;
                }
                fields.push((xn.clone(), refine(xt, yt)?));
            }
            Some(Ty::Shape(fields))
        }
        (Ty::Function(xp, xr), Ty::Function(yp, yr)) => {
            if xp.len() != yp.len() {
                return None;
            }
            let params = xp
                .iter()
                .zip(yp)
                .map(|(x, y)| refine(x, y))
                .collect::<Option<Vec<_>>>()?;
            Some(Ty::function(params, refine(xr, yr)?))
        }
        _ => None,
    }
}

/// Merge a new write into a binding's current type.
///
/// Agreeing writes keep the type, writes that only fill in unknown parts
/// refine it, and a `null`/`undefined` on either side widens to a union.
/// Anything else is a collision and yields `None`.
pub fn merge(old: &Ty, new: &Ty) -> Option<Ty> {
    if let Some(refined) = refine(old, new) {
        return Some(refined);
    }
    let (old_core, new_core) = match (old.non_nullish(), new.non_nullish()) {
        (Some(o), Some(n)) => (o, n),
        _ => return Some(Ty::union([old.clone(), new.clone()])),
    };
    let core = refine(&old_core, &new_core)?;
    let nullish = [old, new]
        .into_iter()
        .flat_map(|t| match t {
            Ty::Union(members) => members.clone(),
            other => vec![other.clone()],
        })
        .filter(Ty::is_nullish);
    Some(Ty::union(std::iter::once(core).chain(nullish)))
}

/// Identifier keys print bare; anything else prints as a quoted string.
/// `*/` never appears in the output, so types can sit inside a block comment.
fn write_key(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let mut chars = name.chars();
    let is_ident = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if is_ident {
        return write!(f, "{}", name);
    }
    write!(f, "'")?;
    let mut prev = None;
    for c in name.chars() {
        match c {
            '\\' => write!(f, "\\\\")?,
            '\'' => write!(f, "\\'")?,
            '\n' => write!(f, "\\n")?,
            '\r' => write!(f, "\\r")?,
            '\t' => write!(f, "\\t")?,
            '\0' => write!(f, "\\0")?,
            '/' if prev == Some('*') => write!(f, "\\/")?,
            c => write!(f, "{}", c)?,
        }
        prev = Some(c);
    }
    write!(f, "'")
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Prim(p) => write!(f, "{}", p.name()),
            Ty::Array(elem) => match **elem {
                Ty::Union(_) | Ty::Function(..) => write!(f, "({})[]", elem),
                _ => write!(f, "{}[]", elem),
            },
            Ty::Shape(fields) => {
                if fields.is_empty() {
                    return write!(f, "{{}}");
                }
                write!(f, "{{ ")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_key(f, name)?;
                    write!(f, ": {}", ty)?;
                }
                write!(f, " }}")
            }
            Ty::Object => write!(f, "object"),
            Ty::Function(params, ret) => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ") => {}", ret)
            }
            Ty::RegExp => write!(f, "RegExp"),
            Ty::Union(members) => {
                // `null` and `undefined` print last.
                let ordered = members
                    .iter()
                    .filter(|m| !m.is_nullish())
                    .chain(members.iter().filter(|m| m.is_nullish()));
                for (i, m) in ordered.enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    match m {
                        Ty::Function(..) => write!(f, "({})", m)?,
                        _ => write!(f, "{}", m)?,
                    }
                }
                Ok(())
            }
            Ty::Unknown => write!(f, "unknown"),
            Ty::Void => write!(f, "void"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(fields: &[(&str, Ty)]) -> Ty {
        Ty::Shape(fields.iter().map(|(n, t)| (n.to_string(), t.clone())).collect())
    }

    #[test]
    fn union_is_order_insensitive_and_deduplicated() {
        let a = Ty::union([Ty::string(), Ty::number(), Ty::string()]);
        let b = Ty::union([Ty::number(), Ty::string()]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "number | string");
    }

    #[test]
    fn union_flattens_and_collapses() {
        let nested = Ty::union([Ty::union([Ty::number(), Ty::null()]), Ty::number()]);
        assert_eq!(nested.to_string(), "number | null");
        assert_eq!(Ty::union([Ty::boolean()]), Ty::boolean());
        assert_eq!(Ty::union([Ty::boolean(), Ty::Unknown]), Ty::Unknown);
    }

    #[test]
    fn display_forms() {
        assert_eq!(Ty::array(Ty::number()).to_string(), "number[]");
        assert_eq!(Ty::array(Ty::Unknown).to_string(), "unknown[]");
        assert_eq!(
            shape(&[("name", Ty::string()), ("age", Ty::number())]).to_string(),
            "{ name: string, age: number }"
        );
        assert_eq!(shape(&[]).to_string(), "{}");
        assert_eq!(
            shape(&[("a b", Ty::number()), ("it's", Ty::number()), ("1", Ty::number())]).to_string(),
            r"{ 'a b': number, 'it\'s': number, '1': number }"
        );
        assert_eq!(shape(&[("a*/b", Ty::number())]).to_string(), r"{ 'a*\/b': number }");
        assert_eq!(
            Ty::function(vec![Ty::number(), Ty::string()], Ty::boolean()).to_string(),
            "(number, string) => boolean"
        );
        assert_eq!(
            Ty::array(Ty::union([Ty::number(), Ty::string()])).to_string(),
            "(number | string)[]"
        );
        assert_eq!(Ty::RegExp.to_string(), "RegExp");
        assert_eq!(Ty::Void.to_string(), "void");
    }

    #[test]
    fn nullability() {
        let maybe = Ty::union([Ty::string(), Ty::undefined()]);
        assert!(maybe.is_nullable());
        assert_eq!(maybe.non_nullish(), Some(Ty::string()));
        assert!(Ty::null().is_nullable());
        assert_eq!(Ty::null().non_nullish(), None);
        assert!(!Ty::number().is_nullable());
    }

    #[test]
    fn element_types() {
        assert_eq!(Ty::array(Ty::boolean()).element(), Ty::boolean());
        assert_eq!(Ty::string().element(), Ty::string());
        assert_eq!(Ty::Object.element(), Ty::Unknown);
    }

    #[test]
    fn refine_fills_unknown_components() {
        let partial = Ty::array(Ty::Unknown);
        let full = Ty::array(Ty::number());
        assert_eq!(refine(&partial, &full), Some(full.clone()));
        assert_eq!(refine(&full, &partial), Some(full));
        assert_eq!(refine(&Ty::number(), &Ty::string()), None);
        assert_eq!(
            refine(&Ty::Object, &shape(&[("a", Ty::number())])),
            Some(shape(&[("a", Ty::number())]))
        );
    }

    #[test]
    fn refine_rejects_different_shapes() {
        let a = shape(&[("a", Ty::number())]);
        let b = shape(&[("b", Ty::number())]);
        assert_eq!(refine(&a, &b), None);
    }

    #[test]
    fn merge_widens_with_nullish() {
        assert_eq!(
            merge(&Ty::number(), &Ty::null()),
            Some(Ty::union([Ty::number(), Ty::null()]))
        );
        let widened = Ty::union([Ty::number(), Ty::undefined()]);
        assert_eq!(merge(&widened, &Ty::number()), Some(widened.clone()));
        assert_eq!(merge(&Ty::number(), &Ty::string()), None);
    }

    #[test]
    fn truncation_caps_depth() {
        let mut ty = Ty::number();
        for _ in 0..12 {
            ty = Ty::array(ty);
        }
        let cut = ty.truncated(MAX_TYPE_DEPTH);
        assert!(cut.depth() <= MAX_TYPE_DEPTH);
        assert_eq!(Ty::array(Ty::number()).truncated(MAX_TYPE_DEPTH), Ty::array(Ty::number()));
    }
}
