//! End-to-end inference tests: source text through parse and infer.

use insta::assert_snapshot;
use tyflow_typeck::env::Provenance;
use tyflow_typeck::{infer_source, AnnotatedAst, InferError, InferOptions};

// ── Helpers ────────────────────────────────────────────────────────────

fn enabled() -> InferOptions {
    InferOptions {
        enabled: true,
        ..InferOptions::default()
    }
}

fn run(src: &str) -> AnnotatedAst {
    match infer_source(src, &enabled()) {
        Ok(ast) => ast,
        Err(err) => panic!("{err}"),
    }
}

/// Displayed type of the first binding named `name`.
fn ty(ast: &AnnotatedAst, name: &str) -> String {
    ast.binding(name)
        .unwrap_or_else(|| panic!("no binding `{name}`"))
        .ty
        .to_string()
}

fn confidence(ast: &AnnotatedAst, name: &str) -> f32 {
    ast.binding(name)
        .unwrap_or_else(|| panic!("no binding `{name}`"))
        .confidence
}

// ── Literal and structural ─────────────────────────────────────────────

#[test]
fn array_homogeneity() {
    let ast = run("const a = [1, 2, 3]; const b = []; const c = [1, 'two']; const d = ['x', 'y'];");
    assert_eq!(ty(&ast, "a"), "number[]");
    assert_eq!(ty(&ast, "b"), "unknown[]");
    assert_eq!(ty(&ast, "c"), "unknown[]");
    assert_eq!(ty(&ast, "d"), "string[]");
}

#[test]
fn array_spread_joins_homogeneity() {
    let ast = run("const xs = [1, 2]; const ys = [...xs, 3]; const zs = [...xs, 'a'];");
    assert_eq!(ty(&ast, "ys"), "number[]");
    assert_eq!(ty(&ast, "zs"), "unknown[]");
}

#[test]
fn object_spread_merges_shapes() {
    let ast = run(
        "const base = { a: 1, b: 'x' };
         const next = { ...base, b: true, c: null };
         const opaque = { ...[1, 2] };",
    );
    assert_eq!(ty(&ast, "next"), "{ a: number, b: boolean, c: null }");
    assert_eq!(ty(&ast, "opaque"), "object");
}

#[test]
fn unresolved_spread_is_an_opaque_object() {
    let ast = run(
        "const o = { ...unknownThing, a: 1 };
         const early = { ...late, z: 1 };
         const late = { y: 'y' };",
    );
    assert_eq!(ty(&ast, "o"), "object");
    assert_eq!(ty(&ast, "early"), "{ y: string, z: number }");
}

#[test]
fn shape_exposure_under_partial_destructuring() {
    let ast = run("const obj = { name: 'John', age: 30 }; const { name, age } = obj;");
    assert_eq!(ty(&ast, "obj"), "{ name: string, age: number }");
    assert_eq!(ty(&ast, "name"), "string");
    assert_eq!(ty(&ast, "age"), "number");
}

// ── Catalog ────────────────────────────────────────────────────────────

#[test]
fn slice_and_concat_depend_on_receiver() {
    let ast = run(
        "const s = 'hello';
         const xs = [1, 2, 3];
         const s1 = s.slice(1);
         const s2 = s.concat('!');
         const a1 = xs.slice(1);
         const a2 = xs.concat([4]);",
    );
    assert_eq!(ty(&ast, "s1"), "string");
    assert_eq!(ty(&ast, "s2"), "string");
    assert_eq!(ty(&ast, "a1"), "number[]");
    assert_eq!(ty(&ast, "a2"), "number[]");
}

#[test]
fn deterministic_type_changing_methods() {
    let ast = run(
        "const xs = [1, 2, 3];
         const n = xs.length;
         const j = xs.join(',');
         const has = xs.includes(2);
         const found = xs.find(x => x > 1);
         const at = xs.findIndex(x => x > 1);",
    );
    assert_eq!(ty(&ast, "n"), "number");
    assert_eq!(ty(&ast, "j"), "string");
    assert_eq!(ty(&ast, "has"), "boolean");
    assert_eq!(ty(&ast, "found"), "number | undefined");
    assert_eq!(ty(&ast, "at"), "number");
}

#[test]
fn chain_propagation() {
    let ast = run(r#"const r = "a,b,c".split(",").map(s => s.toUpperCase()).join("-");"#);
    assert_eq!(ty(&ast, "r"), "string");
    assert_eq!(ty(&ast, "s"), "string");
}

#[test]
fn globals_and_constructors() {
    let ast = run(
        "const m = Math.max(1, 2);
         const j = JSON.stringify({ a: 1 });
         const p = parseInt('42');
         const re = new RegExp('a+');
         const arr = new Array();
         const d = new Date();
         const pi = Math.PI;",
    );
    assert_eq!(ty(&ast, "m"), "number");
    assert_eq!(ty(&ast, "j"), "string");
    assert_eq!(ty(&ast, "p"), "number");
    assert_eq!(ty(&ast, "re"), "RegExp");
    assert_eq!(ty(&ast, "arr"), "unknown[]");
    assert_eq!(ty(&ast, "d"), "object");
    assert_eq!(ty(&ast, "pi"), "number");
}

#[test]
fn shadowed_namespace_is_a_user_binding() {
    let ast = run("const Math = { max: 'no' }; const m = Math.max;");
    assert_eq!(ty(&ast, "m"), "string");
}

// ── Callbacks ──────────────────────────────────────────────────────────

#[test]
fn numbers_doubled_scenario() {
    let ast = run("const numbers = [1, 2, 3];\nconst doubled = numbers.map(x => x * 2);");
    assert_snapshot!(ast.render_summary(), @r"
    numbers: number[]  (1.00, literal)
    doubled: number[]  (0.90, inferred-call)
    x: number  (0.90, parameter)
    ");
}

#[test]
fn empty_array_scenario() {
    let ast = run("const empty = [];\nconst result = empty.map(x => x * 2);");
    assert_eq!(ty(&ast, "empty"), "unknown[]");
    assert_eq!(ty(&ast, "result"), "unknown[]");
    assert_eq!(ty(&ast, "x"), "unknown");
}

#[test]
fn callback_arity_binding() {
    let ast = run("const xs = [1, 2]; xs.forEach((x, i, a) => x);");
    assert_eq!(ty(&ast, "x"), "number");
    assert_eq!(ty(&ast, "i"), "number");
    assert_eq!(ty(&ast, "a"), "number[]");
    assert_eq!(ast.binding("x").map(|b| b.provenance), Some(Provenance::Parameter));
}

#[test]
fn destructured_callback_parameter() {
    let ast = run(
        "const people = [{ name: 'a', age: 1 }];
         people.forEach(({ name, age, missing }) => name);",
    );
    assert_eq!(ty(&ast, "name"), "string");
    assert_eq!(ty(&ast, "age"), "number");
    assert_eq!(ty(&ast, "missing"), "unknown");
}

#[test]
fn sort_and_reduce_shapes() {
    let ast = run(
        "const xs = [3, 1, 2];
         const sorted = xs.sort((a, b) => a - b);
         const sum = xs.reduce((acc, n) => acc + n, 0);
         const label = xs.reduce((text, n) => text + n, '');",
    );
    assert_eq!(ty(&ast, "a"), "number");
    assert_eq!(ty(&ast, "b"), "number");
    assert_eq!(ty(&ast, "sorted"), "number[]");
    assert_eq!(ty(&ast, "acc"), "number");
    assert_eq!(ty(&ast, "sum"), "number");
    assert_eq!(ty(&ast, "text"), "string");
    assert_eq!(ty(&ast, "label"), "string");
}

#[test]
fn named_callback() {
    let ast = run("function double(n) { return n * 2; }\nconst out = [1, 2].map(double);");
    assert_eq!(ty(&ast, "n"), "number");
    assert_eq!(ty(&ast, "out"), "number[]");
}

// ── Operators ──────────────────────────────────────────────────────────

#[test]
fn arithmetic_and_comparison() {
    let ast = run(
        "const a = 1 + 2;
         const s = 'x' + 1;
         const t = 1 + 'x';
         const lt = a < 2;
         const odd = a - s;
         const flag = true + true;
         const neg = -a;
         const kind = typeof a;",
    );
    assert_eq!(ty(&ast, "a"), "number");
    assert_eq!(ty(&ast, "s"), "string");
    assert_eq!(ty(&ast, "t"), "string");
    assert_eq!(ty(&ast, "lt"), "boolean");
    assert_eq!(ty(&ast, "odd"), "unknown");
    assert_eq!(ty(&ast, "flag"), "boolean");
    assert_eq!(ty(&ast, "neg"), "number");
    assert_eq!(ty(&ast, "kind"), "string");
}

#[test]
fn logical_operators_use_the_union_policy() {
    let ast = run(
        "const n = 1;
         const s = 'a';
         const same = n || 2;
         const mixed = n || s;
         const both = n && s;
         const open = n || g();",
    );
    assert_eq!(ty(&ast, "same"), "number");
    assert_eq!(ty(&ast, "mixed"), "number | string");
    assert_eq!(ty(&ast, "both"), "number | string");
    assert_eq!(ty(&ast, "open"), "unknown");
}

#[test]
fn nullish_coalescing() {
    let ast = run(
        "const a = null ?? 5;
         const b = undefined ?? 'd';
         const found = [1, 2].find(x => x > 1);
         const c = found ?? 0;
         const d = 1 ?? 'never';",
    );
    assert_eq!(ty(&ast, "a"), "number");
    assert_eq!(ty(&ast, "b"), "string");
    assert_eq!(ty(&ast, "c"), "number | undefined");
    assert_eq!(ty(&ast, "d"), "number");
}

#[test]
fn ternary_branches() {
    let ast = run("const c = true; const same = c ? 1 : 2; const mixed = c ? 1 : 'one';");
    assert_eq!(ty(&ast, "same"), "number");
    assert_eq!(ty(&ast, "mixed"), "number | string");
}

// ── Flow ───────────────────────────────────────────────────────────────

#[test]
fn aliases_propagate() {
    let ast = run("const a = [1]; const b = a; const c = b; const n = c[0];");
    assert_eq!(ty(&ast, "c"), "number[]");
    assert_eq!(ty(&ast, "n"), "number");
    assert_eq!(ast.binding("b").map(|b| b.provenance), Some(Provenance::Propagated));
}

#[test]
fn forward_references_resolve_in_later_passes() {
    let ast = run(
        "function first() { return second(); }
         function second() { return 'x'; }
         const r = first();",
    );
    assert_eq!(ty(&ast, "r"), "string");
    assert!(ast.stats().converged);
    assert!(ast.stats().passes >= 2);
}

#[test]
fn user_function_calls() {
    let ast = run("function add(a, b) { return a + b; }\nconst total = add(1, 2);");
    assert_snapshot!(ast.render_summary(), @r"
    add: (number, number) => number  (1.00, propagated)
    a: number  (0.80, inferred-call)
    b: number  (0.80, inferred-call)
    total: number  (0.80, inferred-call)
    ");
}

#[test]
fn missing_return_path_adds_undefined() {
    let ast = run(
        "function f(a) { if (a) { return 1; } }
         const r = f(true);
         function g(a) { if (a) { return 1; } else { return 2; } }
         const s = g(true);",
    );
    assert_eq!(ty(&ast, "f"), "(boolean) => number | undefined");
    assert_eq!(ty(&ast, "r"), "number | undefined");
    assert_eq!(ty(&ast, "g"), "(boolean) => number");
    assert_eq!(ty(&ast, "s"), "number");
}

#[test]
fn arrow_functions_and_defaults() {
    let ast = run(
        "const greet = (name, greeting = 'hi') => greeting + name;
         const out = greet('bob');
         const log = () => { console.log('x'); };
         const nothing = log();",
    );
    assert_eq!(ty(&ast, "greeting"), "string");
    assert_eq!(ty(&ast, "name"), "string");
    assert_eq!(ty(&ast, "out"), "string");
    assert_eq!(ty(&ast, "nothing"), "void");
}

#[test]
fn immediately_invoked_function() {
    let ast = run("const v = (function () { return 'x'; })();");
    assert_eq!(ty(&ast, "v"), "string");
}

#[test]
fn array_destructuring_and_rest() {
    let ast = run("const [a, b, ...rest] = [1, 2, 3]; const [x = 'd'] = [];");
    assert_eq!(ty(&ast, "a"), "number");
    assert_eq!(ty(&ast, "b"), "number");
    assert_eq!(ty(&ast, "rest"), "number[]");
    assert_eq!(ty(&ast, "x"), "string");
}

#[test]
fn object_rename_and_rest() {
    let ast = run("const { name: n, ...others } = { name: 'x', age: 1, ok: true };");
    assert_eq!(ty(&ast, "n"), "string");
    assert_eq!(ty(&ast, "others"), "{ age: number, ok: boolean }");
}

#[test]
fn destructuring_assignment() {
    let ast = run("let a; let b; [a, b] = [1, 2]; let c; ({ c } = { c: 'x' });");
    assert_eq!(ty(&ast, "a"), "number");
    assert_eq!(ty(&ast, "b"), "number");
    assert_eq!(ty(&ast, "c"), "string");
}

#[test]
fn loops_bind_elements() {
    let ast = run(
        "for (const item of ['a', 'b']) {}
         for (const key in { a: 1 }) {}
         for (let i = 0; i < 3; i++) {}",
    );
    assert_eq!(ty(&ast, "item"), "string");
    assert_eq!(ty(&ast, "key"), "string");
    assert_eq!(ty(&ast, "i"), "number");
}

#[test]
fn member_and_index_access() {
    let ast = run(
        "const o = { list: [1, 2], label: 'l' };
         const len = o.list.length;
         const first = o.list[0];
         const ch = 'abc'[0];
         const viaKey = o['label'];
         const upper = o.label.toUpperCase();",
    );
    assert_eq!(ty(&ast, "len"), "number");
    assert_eq!(ty(&ast, "first"), "number");
    assert_eq!(ty(&ast, "ch"), "string");
    assert_eq!(ty(&ast, "viaKey"), "string");
    assert_eq!(ty(&ast, "upper"), "string");
}

#[test]
fn optional_chaining_on_nullable_receiver() {
    let ast = run("const cfg = [{ port: 1 }].find(c => c.port > 0); const port = cfg?.port;");
    assert_eq!(ty(&ast, "cfg"), "{ port: number } | undefined");
    assert_eq!(ty(&ast, "port"), "number | undefined");
}

#[test]
fn nullish_write_widens() {
    let ast = run("let y = 1; y = null;");
    assert_eq!(ty(&ast, "y"), "number | null");
}

#[test]
fn conflicting_writes_collide() {
    let ast = run("let x = 1; x = 'str'; function id(v) { return v; } id(1); id('s');");
    assert_eq!(ty(&ast, "x"), "unknown");
    assert_eq!(confidence(&ast, "x"), 0.0);
    assert_eq!(ty(&ast, "v"), "unknown");
}

#[test]
fn compound_assignment_keeps_type() {
    let ast = run("let total = 0; for (const n of [1, 2]) { total += n; } let s = ''; s += 1;");
    assert_eq!(ty(&ast, "total"), "number");
    assert_eq!(ty(&ast, "s"), "string");
}

#[test]
fn extended_compound_assignment() {
    let ast = run(
        "let p = 2; p **= 3;
         let bits = 1; bits |= 4; bits <<= 1; bits >>>= 0;
         let name = null; name ??= 'anon';
         let label = ''; label ||= 'none';",
    );
    assert_eq!(ty(&ast, "p"), "number");
    assert_eq!(ty(&ast, "bits"), "number");
    assert_eq!(ty(&ast, "name"), "string | null");
    assert_eq!(ty(&ast, "label"), "string");
}

#[test]
fn scopes_keep_same_names_apart() {
    let ast = run("const x = 1; function f() { const x = 'inner'; return x; } const r = f();");
    let xs: Vec<String> = ast
        .bindings()
        .iter()
        .filter(|b| b.name == "x")
        .map(|b| b.ty.to_string())
        .collect();
    assert_eq!(xs, ["number", "string"]);
    assert_eq!(ty(&ast, "r"), "string");
}

#[test]
fn self_nesting_is_bounded() {
    let ast = run("let a = []; a = [a]; a = [a];");
    assert!(ast.stats().passes <= InferOptions::default().max_passes);
}

// ── Options and entry point ────────────────────────────────────────────

#[test]
fn disabled_engine_is_bypassed() {
    let ast = infer_source("const a = 1;", &InferOptions::default()).unwrap();
    assert!(ast.bindings().is_empty());
    assert!(ast.types().is_empty());
    assert!(!ast.stats().enabled);
    assert_eq!(ast.stats().passes, 0);
}

#[test]
fn syntax_errors_abort() {
    for options in [InferOptions::default(), enabled()] {
        match infer_source("const = 1;", &options) {
            Err(InferError::Syntax(errors)) => assert_eq!(errors.len(), 1),
            Ok(_) => panic!("expected a syntax error"),
        }
    }
}

#[test]
fn threshold_applies_at_output() {
    let src = "function add(a, b) { return a + b; } const t = add(1, 2);";
    let strict = InferOptions {
        confidence_threshold: 0.85,
        ..enabled()
    };
    let ast = infer_source(src, &strict).unwrap();
    let t = ast.binding("t").unwrap();
    assert_eq!(t.ty.to_string(), "unknown");
    assert!((t.confidence - 0.8).abs() < 1e-6);
    assert!(ast.type_of(rowan::TextRange::new(
        t.span.start.into(),
        t.span.end.into()
    ))
    .is_none());

    // Same run with the default threshold shows the type.
    assert_eq!(ty(&run(src), "t"), "number");
}

#[test]
fn pass_ceiling_returns_best_state() {
    let src = "function first() { return second(); } function second() { return 1; } const r = first();";
    let options = InferOptions {
        max_passes: 1,
        ..enabled()
    };
    let ast = infer_source(src, &options).unwrap();
    assert!(!ast.stats().converged);
    assert_eq!(ast.stats().passes, 1);
    assert_eq!(ty(&ast, "r"), "unknown");
}

#[test]
fn expression_annotations_are_keyed_by_range() {
    let src = "const xs = [1, 2];";
    let ast = run(src);
    let start = src.find('[').unwrap() as u32;
    let range = rowan::TextRange::new(start.into(), (src.len() as u32 - 1).into());
    let value = ast.type_of(range).expect("array literal is annotated");
    assert_eq!(value.ty.to_string(), "number[]");
}

// ── Printer round trips ────────────────────────────────────────────────

#[test]
fn annotated_output() {
    let ast = run("const numbers = [1, 2, 3];\nconst doubled = numbers.map(x => x * 2);\nlet later;");
    assert_snapshot!(ast.annotate(), @r"
    const numbers /*: number[] */ = [1, 2, 3];
    const doubled /*: number[] */ = numbers.map(x /*: number */ => x * 2);
    let later;
    ");
}

#[test]
fn reinferring_annotated_output_is_stable() {
    let src = "const obj = { name: 'John', age: 30 };
const { name, age } = obj;
function add(a, b) { return a + b; }
const total = add(age, 1);
const words = 'a b'.split(' ').map(w => w.length);";
    let first = run(src);
    let printed = first.annotate();
    let second = run(&printed);
    assert_eq!(first.render_summary(), second.render_summary());
    assert_eq!(second.annotate(), printed);
}

#[test]
fn comment_closers_in_keys_stay_inside_annotations() {
    let src = "const o = { 'a*/b': 1, 'c d': 'x' };";
    let first = run(src);
    let printed = first.annotate();
    assert_eq!(
        printed,
        r"const o /*: { 'a*\/b': number, 'c d': string } */ = { 'a*/b': 1, 'c d': 'x' };"
    );
    let second = run(&printed);
    assert_eq!(first.render_summary(), second.render_summary());
    assert_eq!(second.annotate(), printed);
}

#[test]
fn consistent_renaming_does_not_change_types() {
    let original = "const xs = [1, 2]; const ys = xs.map(v => v + 1); const [h] = ys;";
    let renamed = "const aa = [1, 2]; const bb = aa.map(cc => cc + 1); const [dd] = bb;";
    let types = |src: &str| -> Vec<String> {
        run(src)
            .bindings()
            .iter()
            .map(|b| format!("{} {:.2}", b.ty, b.confidence))
            .collect()
    };
    assert_eq!(types(original), types(renamed));
}
