//! The built-in method catalog.
//!
//! A read-only table of resolution rules for methods and properties of
//! built-in receivers, static members of the global namespaces, global
//! functions and constructors. The catalog is built once per process
//! ([`Catalog::global`]) and shared by reference with every inference run.
//!
//! Method resolution is keyed on the *inferred receiver type*, so the same
//! name can mean different things on different receivers (`slice` on a
//! string returns a string, on an array the array). The lookup order is:
//!
//! 1. exact receiver kind + method name + arity bucket,
//! 2. receiver category (array-like, string-like, any known value),
//! 3. no match; the caller types the call `Unknown` at the confidence floor.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::literal::array_of;
use crate::ty::{Primitive, Ty};

/// Computes a call's result type from its context.
pub type Resolver = fn(&CallContext<'_>) -> Ty;

/// What a resolver gets to look at.
#[derive(Debug)]
pub struct CallContext<'a> {
    /// The receiver, with `null`/`undefined` members removed. `Unknown`
    /// for global functions and namespace members.
    pub receiver: &'a Ty,
    pub args: &'a [Ty],
    /// Inferred return type of the callback argument, for higher-order
    /// methods. `None` when there is no callback or it could not be typed.
    pub callback_return: Option<&'a Ty>,
}

/// How a higher-order method calls its callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallbackShape {
    /// `(item, index, array)`
    Iteration,
    /// `(acc, item, index, array)`
    Reduce,
    /// `(a, b)`
    Compare,
}

/// Accepted argument counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    Any,
    Range(u8, u8),
}

impl Arity {
    pub fn accepts(self, argc: usize) -> bool {
        match self {
            Arity::Any => true,
            Arity::Range(min, max) => (min as usize..=max as usize).contains(&argc),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Signature {
    pub arity: Arity,
    pub callback: Option<CallbackShape>,
    pub resolve: Resolver,
}

/// Exact receiver discriminator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReceiverKind {
    Array,
    String,
    Number,
    Boolean,
    RegExp,
    Function,
    Object,
}

impl ReceiverKind {
    pub fn of(ty: &Ty) -> Option<ReceiverKind> {
        let kind = match ty {
            Ty::Array(_) => ReceiverKind::Array,
            Ty::Prim(Primitive::String) => ReceiverKind::String,
            Ty::Prim(Primitive::Number) => ReceiverKind::Number,
            Ty::Prim(Primitive::Boolean) => ReceiverKind::Boolean,
            Ty::RegExp => ReceiverKind::RegExp,
            Ty::Function(..) => ReceiverKind::Function,
            Ty::Shape(_) | Ty::Object => ReceiverKind::Object,
            _ => return None,
        };
        Some(kind)
    }
}

/// Receiver category for the fallback lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    ArrayLike,
    StringLike,
    Any,
}

impl Category {
    /// Category of a receiver and the receiver as the category's resolvers
    /// see it (nullish members removed, array unions collapsed).
    pub fn of(ty: &Ty) -> Option<(Category, Ty)> {
        let core = ty.non_nullish()?;
        match &core {
            Ty::Unknown | Ty::Void => None,
            Ty::Array(_) => Some((Category::ArrayLike, core)),
            Ty::Prim(Primitive::String) => Some((Category::StringLike, core)),
            Ty::Union(members) if members.iter().all(|m| matches!(m, Ty::Array(_))) => {
                Some((Category::ArrayLike, Ty::array(Ty::Unknown)))
            }
            _ => Some((Category::Any, core)),
        }
    }
}

/// Which rule matched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatchLevel {
    Exact,
    Category,
}

impl MatchLevel {
    pub fn confidence(self) -> f32 {
        match self {
            MatchLevel::Exact => 0.9,
            MatchLevel::Category => 0.7,
        }
    }
}

/// A successful method lookup.
#[derive(Debug)]
pub struct Resolved<'c> {
    pub signature: &'c Signature,
    pub level: MatchLevel,
    /// The receiver the resolver should be given.
    pub receiver: Ty,
}

/// Global namespace objects with static members.
pub const NAMESPACES: &[&str] = &[
    "Math", "JSON", "Object", "Array", "Number", "String", "console", "Date",
];

/// Entries grouped by an outer key, then by member name.
type Table<K, V> = FxHashMap<K, FxHashMap<&'static str, V>>;

pub struct Catalog {
    methods: Table<ReceiverKind, Vec<Signature>>,
    category_methods: Table<Category, Vec<Signature>>,
    properties: Table<ReceiverKind, Ty>,
    category_properties: Table<Category, Ty>,
    statics: Table<&'static str, Signature>,
    static_properties: Table<&'static str, Ty>,
    functions: FxHashMap<&'static str, Signature>,
    constructors: FxHashMap<&'static str, Ty>,
    values: FxHashMap<&'static str, Ty>,
}

impl Catalog {
    /// The process-wide catalog.
    pub fn global() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(Catalog::new)
    }

    pub fn new() -> Catalog {
        let mut catalog = Catalog {
            methods: FxHashMap::default(),
            category_methods: FxHashMap::default(),
            properties: FxHashMap::default(),
            category_properties: FxHashMap::default(),
            statics: FxHashMap::default(),
            static_properties: FxHashMap::default(),
            functions: FxHashMap::default(),
            constructors: FxHashMap::default(),
            values: FxHashMap::default(),
        };
        register_array(&mut catalog);
        register_string(&mut catalog);
        register_other_receivers(&mut catalog);
        register_namespaces(&mut catalog);
        register_globals(&mut catalog);
        catalog
    }

    /// Resolve `receiver.name(...)` with `argc` arguments.
    pub fn method(&self, receiver: &Ty, name: &str, argc: usize) -> Option<Resolved<'_>> {
        if let Some(kind) = ReceiverKind::of(receiver) {
            let signatures = self.methods.get(&kind).and_then(|m| m.get(name));
            if let Some(signature) = pick(signatures, argc) {
                return Some(Resolved {
                    signature,
                    level: MatchLevel::Exact,
                    receiver: receiver.clone(),
                });
            }
        }

        let (category, core) = Category::of(receiver)?;
        [category, Category::Any].into_iter().find_map(|cat| {
            let signatures = self.category_methods.get(&cat).and_then(|m| m.get(name));
            pick(signatures, argc).map(|signature| Resolved {
                signature,
                level: MatchLevel::Category,
                receiver: core.clone(),
            })
        })
    }

    /// Resolve a non-call property read such as `xs.length`.
    pub fn property(&self, receiver: &Ty, name: &str) -> Option<(Ty, MatchLevel)> {
        if let Some(kind) = ReceiverKind::of(receiver) {
            if let Some(ty) = self.properties.get(&kind).and_then(|m| m.get(name)) {
                return Some((ty.clone(), MatchLevel::Exact));
            }
        }
        let (category, _) = Category::of(receiver)?;
        self.category_properties
            .get(&category)?
            .get(name)
            .map(|ty| (ty.clone(), MatchLevel::Category))
    }

    pub fn is_namespace(&self, name: &str) -> bool {
        NAMESPACES.contains(&name)
    }

    /// A static method of a global namespace, e.g. `Math.max`.
    pub fn static_method(&self, namespace: &str, name: &str, argc: usize) -> Option<&Signature> {
        self.statics
            .get(namespace)?
            .get(name)
            .filter(|sig| sig.arity.accepts(argc))
    }

    pub fn static_property(&self, namespace: &str, name: &str) -> Option<&Ty> {
        self.static_properties.get(namespace)?.get(name)
    }

    /// A global function such as `parseInt` or `String`.
    pub fn function(&self, name: &str, argc: usize) -> Option<&Signature> {
        self.functions.get(name).filter(|sig| sig.arity.accepts(argc))
    }

    /// Result type of `new Name(...)` for a known constructor.
    pub fn constructor(&self, name: &str) -> Option<&Ty> {
        self.constructors.get(name)
    }

    /// Type of a global value such as `undefined` or `Math`.
    pub fn value(&self, name: &str) -> Option<&Ty> {
        self.values.get(name)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

fn pick(signatures: Option<&Vec<Signature>>, argc: usize) -> Option<&Signature> {
    signatures?.iter().find(|sig| sig.arity.accepts(argc))
}

// ── Registration helpers ───────────────────────────────────────────────

const ANY: Arity = Arity::Any;

fn upto(max: u8) -> Arity {
    Arity::Range(0, max)
}

fn between(min: u8, max: u8) -> Arity {
    Arity::Range(min, max)
}

impl Catalog {
    fn add_method(
        &mut self,
        kind: ReceiverKind,
        category: Option<Category>,
        name: &'static str,
        arity: Arity,
        callback: Option<CallbackShape>,
        resolve: Resolver,
    ) {
        let signature = Signature {
            arity,
            callback,
            resolve,
        };
        if let Some(category) = category {
            self.category_methods
                .entry(category)
                .or_default()
                .entry(name)
                .or_default()
                .push(signature.clone());
        }
        self.methods
            .entry(kind)
            .or_default()
            .entry(name)
            .or_default()
            .push(signature);
    }

    fn add_static(&mut self, namespace: &'static str, name: &'static str, arity: Arity, resolve: Resolver) {
        self.statics.entry(namespace).or_default().insert(
            name,
            Signature {
                arity,
                callback: None,
                resolve,
            },
        );
    }

    fn add_function(&mut self, name: &'static str, arity: Arity, resolve: Resolver) {
        self.functions.insert(
            name,
            Signature {
                arity,
                callback: None,
                resolve,
            },
        );
    }
}

// ── Resolvers ──────────────────────────────────────────────────────────

fn number(_: &CallContext<'_>) -> Ty {
    Ty::number()
}

fn string(_: &CallContext<'_>) -> Ty {
    Ty::string()
}

fn boolean(_: &CallContext<'_>) -> Ty {
    Ty::boolean()
}

fn void(_: &CallContext<'_>) -> Ty {
    Ty::Void
}

fn unknown(_: &CallContext<'_>) -> Ty {
    Ty::Unknown
}

fn object(_: &CallContext<'_>) -> Ty {
    Ty::Object
}

fn regexp(_: &CallContext<'_>) -> Ty {
    Ty::RegExp
}

fn string_array(_: &CallContext<'_>) -> Ty {
    Ty::array(Ty::string())
}

fn unknown_array(_: &CallContext<'_>) -> Ty {
    Ty::array(Ty::Unknown)
}

fn same_as_receiver(cx: &CallContext<'_>) -> Ty {
    cx.receiver.clone()
}

fn element_or_undefined(cx: &CallContext<'_>) -> Ty {
    let elem = cx.receiver.element();
    if elem.is_unknown() {
        Ty::Unknown
    } else {
        Ty::union([elem, Ty::undefined()])
    }
}

fn strings_or_null(_: &CallContext<'_>) -> Ty {
    Ty::union([Ty::array(Ty::string()), Ty::null()])
}

fn string_or_undefined(_: &CallContext<'_>) -> Ty {
    Ty::union([Ty::string(), Ty::undefined()])
}

/// `ArrayOf(callback return)` when the callback's type is known, else the
/// receiver's element type.
fn map_result(cx: &CallContext<'_>) -> Ty {
    match cx.callback_return {
        Some(Ty::Void) => Ty::array(Ty::undefined()),
        Some(ret) if !ret.is_unknown() => Ty::array(ret.clone()),
        _ => Ty::array(cx.receiver.element()),
    }
}

fn flat_map_result(cx: &CallContext<'_>) -> Ty {
    match cx.callback_return {
        Some(Ty::Array(inner)) => Ty::array((**inner).clone()),
        Some(ret) if !ret.is_unknown() && *ret != Ty::Void => Ty::array(ret.clone()),
        _ => Ty::array(Ty::Unknown),
    }
}

fn flat_result(cx: &CallContext<'_>) -> Ty {
    match cx.receiver.element() {
        Ty::Array(inner) => Ty::array(*inner),
        Ty::Unknown => Ty::array(Ty::Unknown),
        _ => cx.receiver.clone(),
    }
}

/// `concat` keeps the receiver's type while every argument contributes the
/// same element type.
fn concat_result(cx: &CallContext<'_>) -> Ty {
    let elem = cx.receiver.element();
    let consistent = cx.args.iter().all(|arg| {
        let contributed = match arg {
            Ty::Array(inner) => (**inner).clone(),
            other => other.clone(),
        };
        contributed.is_unknown() || contributed == elem
    });
    if consistent {
        cx.receiver.clone()
    } else {
        Ty::array(Ty::Unknown)
    }
}

/// Best effort: the accumulator type when the initializer and every return
/// path of the callback agree on it.
fn reduce_result(cx: &CallContext<'_>) -> Ty {
    let seed = match cx.args.get(1) {
        Some(init) => init.clone(),
        None => cx.receiver.element(),
    };
    match cx.callback_return {
        Some(ret) if !seed.is_unknown() && *ret == seed => seed,
        _ => Ty::Unknown,
    }
}

fn function_return(cx: &CallContext<'_>) -> Ty {
    match cx.receiver {
        Ty::Function(_, ret) => (**ret).clone(),
        _ => Ty::Unknown,
    }
}

fn first_arg(cx: &CallContext<'_>) -> Ty {
    cx.args.first().cloned().unwrap_or(Ty::Unknown)
}

fn object_values(cx: &CallContext<'_>) -> Ty {
    match cx.args.first() {
        Some(Ty::Shape(fields)) => array_of(fields.iter().map(|(_, ty)| ty.clone())),
        _ => Ty::array(Ty::Unknown),
    }
}

/// `Object.assign(target, ...sources)` over shapes merges fields left to
/// right; anything else is an opaque object.
fn object_assign(cx: &CallContext<'_>) -> Ty {
    let mut fields: Vec<(String, Ty)> = Vec::new();
    for arg in cx.args {
        let Ty::Shape(source) = arg else {
            return Ty::Object;
        };
        for (name, ty) in source {
            match fields.iter_mut().find(|(n, _)| n == name) {
                Some(slot) => slot.1 = ty.clone(),
                None => fields.push((name.clone(), ty.clone())),
            }
        }
    }
    Ty::Shape(fields)
}

fn array_from(cx: &CallContext<'_>) -> Ty {
    match cx.args.first() {
        Some(Ty::Array(elem)) => Ty::array((**elem).clone()),
        Some(Ty::Prim(Primitive::String)) => Ty::array(Ty::string()),
        _ => Ty::array(Ty::Unknown),
    }
}

fn array_of_args(cx: &CallContext<'_>) -> Ty {
    array_of(cx.args.iter().cloned())
}

// ── Tables ─────────────────────────────────────────────────────────────

fn register_array(c: &mut Catalog) {
    use CallbackShape::*;
    let mut add = |name, arity, callback, resolve: Resolver| {
        c.add_method(
            ReceiverKind::Array,
            Some(Category::ArrayLike),
            name,
            arity,
            callback,
            resolve,
        )
    };

    // Higher-order.
    add("map", between(1, 2), Some(Iteration), map_result);
    add("filter", between(1, 2), Some(Iteration), same_as_receiver);
    add("forEach", between(1, 2), Some(Iteration), void);
    add("some", between(1, 2), Some(Iteration), boolean);
    add("every", between(1, 2), Some(Iteration), boolean);
    add("find", between(1, 2), Some(Iteration), element_or_undefined);
    add("findLast", between(1, 2), Some(Iteration), element_or_undefined);
    add("findIndex", between(1, 2), Some(Iteration), number);
    add("findLastIndex", between(1, 2), Some(Iteration), number);
    add("flatMap", between(1, 2), Some(Iteration), flat_map_result);
    add("reduce", between(1, 2), Some(Reduce), reduce_result);
    add("reduceRight", between(1, 2), Some(Reduce), reduce_result);
    add("sort", upto(1), Some(Compare), same_as_receiver);

    // Type-preserving.
    add("slice", upto(2), None, same_as_receiver);
    add("concat", ANY, None, concat_result);
    add("reverse", upto(0), None, same_as_receiver);
    add("splice", ANY, None, same_as_receiver);
    add("fill", between(1, 3), None, same_as_receiver);
    add("copyWithin", between(1, 3), None, same_as_receiver);

    // Type-changing.
    add("join", upto(1), None, string);
    add("includes", between(1, 2), None, boolean);
    add("indexOf", between(1, 2), None, number);
    add("lastIndexOf", between(1, 2), None, number);
    add("push", ANY, None, number);
    add("unshift", ANY, None, number);
    add("pop", upto(0), None, element_or_undefined);
    add("shift", upto(0), None, element_or_undefined);
    add("at", upto(1), None, element_or_undefined);
    add("flat", upto(1), None, flat_result);
    add("keys", upto(0), None, |_| Ty::array(Ty::number()));
    add("entries", upto(0), None, unknown_array);
    add("values", upto(0), None, same_as_receiver);
    add("toString", upto(0), None, string);

    c.properties.entry(ReceiverKind::Array).or_default().insert("length", Ty::number());
    c.category_properties
        .entry(Category::ArrayLike)
        .or_default()
        .insert("length", Ty::number());
}

fn register_string(c: &mut Catalog) {
    let mut add = |name, arity, resolve: Resolver| {
        c.add_method(
            ReceiverKind::String,
            Some(Category::StringLike),
            name,
            arity,
            None,
            resolve,
        )
    };

    for name in [
        "toUpperCase",
        "toLowerCase",
        "toLocaleUpperCase",
        "toLocaleLowerCase",
        "trim",
        "trimStart",
        "trimEnd",
        "normalize",
        "toString",
        "valueOf",
    ] {
        add(name, upto(1), string);
    }
    add("slice", upto(2), string);
    add("substring", between(1, 2), string);
    add("substr", between(1, 2), string);
    add("concat", ANY, string);
    add("padStart", between(1, 2), string);
    add("padEnd", between(1, 2), string);
    add("repeat", between(1, 1), string);
    add("replace", between(2, 2), string);
    add("replaceAll", between(2, 2), string);
    add("charAt", upto(1), string);
    add("at", upto(1), string_or_undefined);
    add("split", upto(2), string_array);
    add("indexOf", between(1, 2), number);
    add("lastIndexOf", between(1, 2), number);
    add("charCodeAt", upto(1), number);
    add("codePointAt", upto(1), number);
    add("search", between(1, 1), number);
    add("localeCompare", between(1, 3), number);
    add("includes", between(1, 2), boolean);
    add("startsWith", between(1, 2), boolean);
    add("endsWith", between(1, 2), boolean);
    add("match", between(1, 1), strings_or_null);
    add("matchAll", between(1, 1), unknown);

    c.properties.entry(ReceiverKind::String).or_default().insert("length", Ty::number());
    c.category_properties
        .entry(Category::StringLike)
        .or_default()
        .insert("length", Ty::number());
}

fn register_other_receivers(c: &mut Catalog) {
    use ReceiverKind::{Boolean, Function, Number, RegExp};

    c.add_method(Number, None, "toFixed", upto(1), None, string);
    c.add_method(Number, None, "toPrecision", upto(1), None, string);
    c.add_method(Number, None, "toExponential", upto(1), None, string);
    c.add_method(Number, None, "toString", upto(1), None, string);
    c.add_method(Number, None, "toLocaleString", ANY, None, string);
    c.add_method(Number, None, "valueOf", upto(0), None, number);

    c.add_method(Boolean, None, "toString", upto(0), None, string);
    c.add_method(Boolean, None, "valueOf", upto(0), None, boolean);

    c.add_method(RegExp, None, "test", between(1, 1), None, boolean);
    c.add_method(RegExp, None, "exec", between(1, 1), None, strings_or_null);
    c.add_method(RegExp, None, "toString", upto(0), None, string);
    c.properties.entry(RegExp).or_default().insert("source", Ty::string());
    c.properties.entry(RegExp).or_default().insert("flags", Ty::string());
    c.properties.entry(RegExp).or_default().insert("lastIndex", Ty::number());
    for flag in ["global", "ignoreCase", "multiline", "sticky", "unicode", "dotAll"] {
        c.properties.entry(RegExp).or_default().insert(flag, Ty::boolean());
    }

    c.add_method(Function, None, "call", ANY, None, function_return);
    c.add_method(Function, None, "apply", upto(2), None, function_return);
    c.add_method(Function, None, "bind", ANY, None, same_as_receiver);
    c.properties.entry(Function).or_default().insert("length", Ty::number());
    c.properties.entry(Function).or_default().insert("name", Ty::string());

    // Any known value.
    let any: [(&'static str, Arity, Resolver); 5] = [
        ("toString", ANY, string),
        ("toLocaleString", ANY, string),
        ("hasOwnProperty", between(1, 1), boolean),
        ("propertyIsEnumerable", between(1, 1), boolean),
        ("isPrototypeOf", between(1, 1), boolean),
    ];
    for (name, arity, resolve) in any {
        c.category_methods
            .entry(Category::Any)
            .or_default()
            .entry(name)
            .or_default()
            .push(Signature {
                arity,
                callback: None,
                resolve,
            });
    }
}

fn register_namespaces(c: &mut Catalog) {
    for name in [
        "abs", "acos", "asin", "atan", "atan2", "cbrt", "ceil", "cos", "exp", "floor", "fround",
        "hypot", "log", "log10", "log1p", "log2", "max", "min", "pow", "random", "round", "sign",
        "sin", "sqrt", "tan", "trunc",
    ] {
        c.add_static("Math", name, ANY, number);
    }
    for name in ["PI", "E", "LN2", "LN10", "LOG2E", "LOG10E", "SQRT2", "SQRT1_2"] {
        c.static_properties.entry("Math").or_default().insert(name, Ty::number());
    }

    c.add_static("JSON", "stringify", between(1, 3), string);
    c.add_static("JSON", "parse", between(1, 2), unknown);

    c.add_static("Object", "keys", between(1, 1), string_array);
    c.add_static("Object", "values", between(1, 1), object_values);
    c.add_static("Object", "entries", between(1, 1), unknown_array);
    c.add_static("Object", "assign", ANY, object_assign);
    c.add_static("Object", "freeze", between(1, 1), first_arg);
    c.add_static("Object", "fromEntries", between(1, 1), object);
    c.add_static("Object", "create", between(1, 2), object);

    c.add_static("Array", "isArray", between(1, 1), boolean);
    c.add_static("Array", "from", between(1, 2), array_from);
    c.add_static("Array", "of", ANY, array_of_args);

    for name in ["isInteger", "isFinite", "isNaN", "isSafeInteger"] {
        c.add_static("Number", name, between(1, 1), boolean);
    }
    c.add_static("Number", "parseFloat", between(1, 1), number);
    c.add_static("Number", "parseInt", between(1, 2), number);
    for name in [
        "MAX_SAFE_INTEGER",
        "MIN_SAFE_INTEGER",
        "MAX_VALUE",
        "MIN_VALUE",
        "EPSILON",
        "POSITIVE_INFINITY",
        "NEGATIVE_INFINITY",
        "NaN",
    ] {
        c.static_properties.entry("Number").or_default().insert(name, Ty::number());
    }

    c.add_static("String", "fromCharCode", ANY, string);
    c.add_static("String", "fromCodePoint", ANY, string);
    c.add_static("String", "raw", ANY, string);

    for name in ["log", "error", "warn", "info", "debug", "trace", "table"] {
        c.add_static("console", name, ANY, void);
    }

    c.add_static("Date", "now", upto(0), number);
    c.add_static("Date", "parse", between(1, 1), number);
    c.add_static("Date", "UTC", ANY, number);
}

fn register_globals(c: &mut Catalog) {
    c.add_function("parseInt", between(1, 2), number);
    c.add_function("parseFloat", between(1, 1), number);
    c.add_function("Number", upto(1), number);
    c.add_function("String", upto(1), string);
    c.add_function("Boolean", upto(1), boolean);
    c.add_function("isNaN", between(1, 1), boolean);
    c.add_function("isFinite", between(1, 1), boolean);
    c.add_function("Array", ANY, unknown_array);
    c.add_function("Object", upto(1), object);
    c.add_function("RegExp", between(1, 2), regexp);
    for name in ["encodeURIComponent", "decodeURIComponent", "encodeURI", "decodeURI"] {
        c.add_function(name, between(1, 1), string);
    }
    c.add_function("setTimeout", ANY, number);
    c.add_function("setInterval", ANY, number);
    c.add_function("clearTimeout", upto(1), void);
    c.add_function("clearInterval", upto(1), void);

    c.constructors.insert("Array", Ty::array(Ty::Unknown));
    c.constructors.insert("RegExp", Ty::RegExp);

    c.values.insert("undefined", Ty::undefined());
    c.values.insert("NaN", Ty::number());
    c.values.insert("Infinity", Ty::number());
    for &name in NAMESPACES {
        c.values.insert(name, Ty::Object);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(catalog: &Catalog, receiver: &Ty, name: &str, args: &[Ty], cb: Option<&Ty>) -> Option<(Ty, MatchLevel)> {
        let resolved = catalog.method(receiver, name, args.len())?;
        let cx = CallContext {
            receiver: &resolved.receiver,
            args,
            callback_return: cb,
        };
        Some(((resolved.signature.resolve)(&cx), resolved.level))
    }

    #[test]
    fn same_name_depends_on_receiver() {
        let c = Catalog::new();
        let nums = Ty::array(Ty::number());
        assert_eq!(
            call(&c, &Ty::string(), "slice", &[Ty::number()], None),
            Some((Ty::string(), MatchLevel::Exact))
        );
        assert_eq!(
            call(&c, &nums, "slice", &[Ty::number()], None),
            Some((nums.clone(), MatchLevel::Exact))
        );
        assert_eq!(
            call(&c, &Ty::string(), "concat", &[Ty::string()], None).map(|r| r.0),
            Some(Ty::string())
        );
        assert_eq!(
            call(&c, &nums, "concat", &[Ty::array(Ty::number())], None).map(|r| r.0),
            Some(nums)
        );
    }

    #[test]
    fn type_changing_entries() {
        let c = Catalog::new();
        let strs = Ty::array(Ty::string());
        assert_eq!(call(&c, &strs, "join", &[Ty::string()], None).map(|r| r.0), Some(Ty::string()));
        assert_eq!(call(&c, &strs, "includes", &[Ty::string()], None).map(|r| r.0), Some(Ty::boolean()));
        assert_eq!(
            call(&c, &strs, "find", &[Ty::Unknown], None).map(|r| r.0.to_string()),
            Some("string | undefined".to_string())
        );
        assert_eq!(call(&c, &strs, "findIndex", &[Ty::Unknown], None).map(|r| r.0), Some(Ty::number()));
        assert_eq!(c.property(&strs, "length"), Some((Ty::number(), MatchLevel::Exact)));
    }

    #[test]
    fn map_uses_callback_return_or_falls_back() {
        let c = Catalog::new();
        let nums = Ty::array(Ty::number());
        let mapped = call(&c, &nums, "map", &[Ty::Unknown], Some(&Ty::string()));
        assert_eq!(mapped.map(|r| r.0), Some(Ty::array(Ty::string())));
        let fallback = call(&c, &nums, "map", &[Ty::Unknown], Some(&Ty::Unknown));
        assert_eq!(fallback.map(|r| r.0), Some(nums));
    }

    #[test]
    fn nullable_receiver_uses_category() {
        let c = Catalog::new();
        let maybe = Ty::union([Ty::string(), Ty::undefined()]);
        assert_eq!(
            call(&c, &maybe, "toUpperCase", &[], None),
            Some((Ty::string(), MatchLevel::Category))
        );
        assert_eq!(c.property(&maybe, "length"), Some((Ty::number(), MatchLevel::Category)));
    }

    #[test]
    fn any_category_and_misses() {
        let c = Catalog::new();
        assert_eq!(
            call(&c, &Ty::Object, "hasOwnProperty", &[Ty::string()], None),
            Some((Ty::boolean(), MatchLevel::Category))
        );
        assert!(c.method(&Ty::Unknown, "map", 1).is_none());
        assert!(c.method(&Ty::number(), "map", 1).is_none());
        // Wrong arity falls through every level.
        assert!(c.method(&Ty::string(), "repeat", 0).is_none());
    }

    #[test]
    fn callback_shapes() {
        let c = Catalog::new();
        let nums = Ty::array(Ty::number());
        let shape = |name| c.method(&nums, name, 1).and_then(|r| r.signature.callback);
        assert_eq!(shape("map"), Some(CallbackShape::Iteration));
        assert_eq!(shape("reduce"), Some(CallbackShape::Reduce));
        assert_eq!(shape("sort"), Some(CallbackShape::Compare));
        assert_eq!(shape("join"), None);
    }

    #[test]
    fn reduce_is_best_effort() {
        let c = Catalog::new();
        let nums = Ty::array(Ty::number());
        let args = [Ty::Unknown, Ty::number()];
        assert_eq!(
            call(&c, &nums, "reduce", &args, Some(&Ty::number())).map(|r| r.0),
            Some(Ty::number())
        );
        assert_eq!(
            call(&c, &nums, "reduce", &args, Some(&Ty::string())).map(|r| r.0),
            Some(Ty::Unknown)
        );
    }

    #[test]
    fn globals_and_namespaces() {
        let c = Catalog::global();
        assert!(c.is_namespace("Math"));
        assert!(c.static_method("Math", "max", 3).is_some());
        assert_eq!(c.static_property("Math", "PI"), Some(&Ty::number()));
        assert!(c.function("parseInt", 1).is_some());
        assert_eq!(c.constructor("Array"), Some(&Ty::array(Ty::Unknown)));
        assert_eq!(c.value("undefined"), Some(&Ty::undefined()));
        assert!(c.value("window").is_none());
    }

    #[test]
    fn lookups_accept_borrowed_names() {
        let c = Catalog::global();
        let method = String::from("slice");
        let namespace = String::from("Math");
        let member = String::from("PI");
        assert!(c.method(&Ty::string(), &method, 1).is_some());
        assert!(c.method(&Ty::union([Ty::string(), Ty::null()]), &method, 1).is_some());
        assert_eq!(
            c.property(&Ty::array(Ty::number()), &String::from("length")),
            Some((Ty::number(), MatchLevel::Exact))
        );
        assert!(c.static_method(&namespace, &String::from("floor"), 1).is_some());
        assert_eq!(c.static_property(&namespace, &member), Some(&Ty::number()));
    }
}
