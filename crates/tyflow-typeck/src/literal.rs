//! Literal and structural inference.
//!
//! Types that follow from the shape of a literal alone: primitive literals,
//! the homogeneity rule for arrays, and shape construction for objects.
//! [`closed_type`] types whole expressions with no free variables; it is
//! what pass 0 seeds the environment with.

use tyflow_parser::ast::{Element, Expr, Literal, LiteralKind, ObjectMember, PropKey};
use tyflow_parser::SyntaxKind;

use crate::ty::Ty;

/// Type of a literal token.
pub fn literal_type(lit: &Literal) -> Ty {
    match lit.kind() {
        Some(LiteralKind::Number) => Ty::number(),
        Some(LiteralKind::String | LiteralKind::Template) => Ty::string(),
        Some(LiteralKind::Boolean) => Ty::boolean(),
        Some(LiteralKind::Null) => Ty::null(),
        Some(LiteralKind::Regex) => Ty::RegExp,
        None => Ty::Unknown,
    }
}

/// Array homogeneity reduction: `ArrayOf(T)` when every element has the
/// same known type `T`, otherwise `ArrayOf(Unknown)`. Empty arrays are
/// `ArrayOf(Unknown)`.
pub fn array_of(elements: impl IntoIterator<Item = Ty>) -> Ty {
    let mut elements = elements.into_iter();
    let Some(first) = elements.next() else {
        return Ty::array(Ty::Unknown);
    };
    if first.is_unknown() || first == Ty::Void {
        return Ty::array(Ty::Unknown);
    }
    if elements.all(|ty| ty == first) {
        Ty::array(first)
    } else {
        Ty::array(Ty::Unknown)
    }
}

/// Incrementally builds the type of an object literal.
///
/// Fields keep first-seen order; a later write to an existing key replaces
/// its type in place. A computed key or a spread of anything but a shape
/// makes the whole literal an opaque object. If an unknown spread source
/// resolves to a shape in a later pass, the binding refines to that shape.
#[derive(Debug, Default)]
pub struct ShapeBuilder {
    fields: Vec<(String, Ty)>,
    opaque: bool,
}

impl ShapeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&mut self, name: String, ty: Ty) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = ty,
            None => self.fields.push((name, ty)),
        }
    }

    pub fn computed_key(&mut self) {
        self.opaque = true;
    }

    pub fn spread(&mut self, source: &Ty) {
        match source {
            Ty::Shape(fields) => {
                for (name, ty) in fields {
                    self.field(name.clone(), ty.clone());
                }
            }
            _ => self.opaque = true,
        }
    }

    pub fn finish(self) -> Ty {
        if self.opaque {
            Ty::Object
        } else {
            Ty::Shape(self.fields)
        }
    }
}

/// Type of an expression that depends on no binding, or `None` if it does.
pub fn closed_type(expr: &Expr) -> Option<Ty> {
    match expr {
        Expr::Literal(lit) => Some(literal_type(lit)),
        Expr::Paren(paren) => closed_type(&paren.expr()?),
        Expr::Array(array) => {
            let mut elements = Vec::new();
            for element in array.elements() {
                match element {
                    Element::Expr(e) => elements.push(closed_type(&e)?),
                    Element::Spread(_) => return None,
                }
            }
            Some(array_of(elements))
        }
        Expr::Object(object) => {
            let mut shape = ShapeBuilder::new();
            for member in object.members() {
                let ObjectMember::Property(prop) = member else {
                    return None;
                };
                let value = closed_type(&prop.value()?)?;
                match prop.key()? {
                    PropKey::Static(name) => shape.field(name, value),
                    PropKey::Computed(_) => shape.computed_key(),
                }
            }
            Some(shape.finish())
        }
        Expr::Unary(unary) => {
            let operand = closed_type(&unary.operand()?)?;
            match unary.op()? {
                SyntaxKind::BANG => Some(Ty::boolean()),
                SyntaxKind::TYPEOF_KW => Some(Ty::string()),
                SyntaxKind::VOID_KW => Some(Ty::undefined()),
                SyntaxKind::MINUS | SyntaxKind::PLUS | SyntaxKind::TILDE
                    if operand == Ty::number() =>
                {
                    Some(Ty::number())
                }
                _ => None,
            }
        }
        _ => None,
    }
}
