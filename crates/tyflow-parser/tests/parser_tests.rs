//! Parser integration tests.
//!
//! Small inputs are snapshotted through `debug_tree`; larger ones are
//! checked through the typed AST.

use insta::assert_snapshot;
use tyflow_parser::ast::{
    ArrowBody, DeclKind, Element, Expr, ObjectMember, Pattern, PropKey, Stmt,
};
use tyflow_parser::{debug_tree, parse, SyntaxKind};

fn parse_and_debug(source: &str) -> String {
    let parse = parse(source);
    let tree = debug_tree(&parse.syntax());
    if parse.errors().is_empty() {
        tree
    } else {
        format!(
            "{}errors:\n{}",
            tree,
            parse
                .errors()
                .iter()
                .map(|e| format!("  - {} @{}..{}", e.message, e.span.start, e.span.end))
                .collect::<Vec<_>>()
                .join("\n")
        )
    }
}

/// Node kinds in preorder.
fn node_kinds(source: &str) -> Vec<SyntaxKind> {
    let parse = parse(source);
    assert!(parse.ok(), "unexpected errors: {:?}", parse.errors());
    parse.syntax().descendants().map(|n| n.kind()).collect()
}

fn first_stmt(source: &str) -> Stmt {
    let parse = parse(source);
    assert!(parse.ok(), "unexpected errors: {:?}", parse.errors());
    parse.tree().statements().next().expect("one statement")
}

fn first_expr(source: &str) -> Expr {
    match first_stmt(source) {
        Stmt::Expr(stmt) => stmt.expr().expect("expression"),
        other => panic!("expected expression statement, got {other:?}"),
    }
}

// ── Snapshots ───────────────────────────────────────────────────────────

#[test]
fn const_array_declaration() {
    assert_snapshot!(parse_and_debug("const xs = [1, 2];"), @r#"
    SOURCE_FILE@0..18
      VAR_DECL@0..18
        CONST_KW "const"
        DECLARATOR@6..17
          IDENT_PAT@6..8
            IDENT "xs"
          EQ "="
          ARRAY_EXPR@11..17
            L_BRACKET "["
            LITERAL@12..13
              NUMBER "1"
            COMMA ","
            LITERAL@15..16
              NUMBER "2"
            R_BRACKET "]"
        SEMICOLON ";"
    "#);
}

#[test]
fn binary_precedence() {
    assert_snapshot!(parse_and_debug("a + b * c"), @r#"
    SOURCE_FILE@0..9
      EXPR_STMT@0..9
        BINARY_EXPR@0..9
          NAME_REF@0..1
            IDENT "a"
          PLUS "+"
          BINARY_EXPR@4..9
            NAME_REF@4..5
              IDENT "b"
            STAR "*"
            NAME_REF@8..9
              IDENT "c"
    "#);
}

#[test]
fn missing_paren_error() {
    assert_snapshot!(parse_and_debug("f(1"), @r#"
    SOURCE_FILE@0..3
      EXPR_STMT@0..3
        CALL_EXPR@0..3
          NAME_REF@0..1
            IDENT "f"
          ARG_LIST@1..3
            L_PAREN "("
            LITERAL@2..3
              NUMBER "1"
    errors:
      - expected `)` @3..3
    "#);
}

// ── Node ranges ─────────────────────────────────────────────────────────

#[test]
fn node_ranges_exclude_surrounding_trivia() {
    let src = "  // lead\n  const a = 1  \n";
    let parse = parse(src);
    assert!(parse.ok());
    let decl = parse.tree().statements().next().unwrap();
    let range = decl.syntax().text_range();
    assert_eq!(&src[usize::from(range.start())..usize::from(range.end())], "const a = 1");
    assert_eq!(parse.syntax().to_string(), src);
}

// ── Declarations and patterns ───────────────────────────────────────────

#[test]
fn declaration_kinds() {
    for (src, kind) in [
        ("var a = 1", DeclKind::Var),
        ("let a = 1", DeclKind::Let),
        ("const a = 1", DeclKind::Const),
    ] {
        match first_stmt(src) {
            Stmt::VarDecl(decl) => assert_eq!(decl.kind(), kind),
            other => panic!("{other:?}"),
        }
    }
}

#[test]
fn object_pattern_with_rename_default_and_rest() {
    let Stmt::VarDecl(decl) = first_stmt("const { name, age: years, city = 'x', ...rest } = person") else {
        panic!("expected declaration");
    };
    let declarator = decl.declarators().next().unwrap();
    let Some(Pattern::Object(obj)) = declarator.pattern() else {
        panic!("expected object pattern");
    };
    let keys: Vec<_> = obj
        .props()
        .map(|p| p.key().and_then(|k| k.as_static().map(str::to_string)))
        .collect();
    assert_eq!(
        keys,
        vec![Some("name".into()), Some("age".into()), Some("city".into())]
    );
    assert!(obj.rest().is_some());
    let names: Vec<_> = Pattern::Object(obj).bindings().iter().map(|b| b.text()).collect();
    assert_eq!(names, vec!["name", "years", "city", "rest"]);
    assert!(matches!(declarator.init(), Some(Expr::NameRef(_))));
}

#[test]
fn array_pattern_with_hole_and_rest() {
    let Stmt::VarDecl(decl) = first_stmt("let [, second, ...others] = xs") else {
        panic!("expected declaration");
    };
    let Some(Pattern::Array(arr)) = decl.declarators().next().unwrap().pattern() else {
        panic!("expected array pattern");
    };
    let elements: Vec<_> = arr.elements().collect();
    assert_eq!(elements.len(), 2);
    assert!(matches!(elements[0], Pattern::Ident(_)));
    assert!(matches!(elements[1], Pattern::Rest(_)));
}

#[test]
fn multiple_declarators() {
    let Stmt::VarDecl(decl) = first_stmt("let a = 1, b, c = 'x';") else {
        panic!("expected declaration");
    };
    assert_eq!(decl.declarators().count(), 3);
}

// ── Functions ───────────────────────────────────────────────────────────

#[test]
fn arrow_with_single_param_and_expression_body() {
    let Expr::Call(call) = first_expr("xs.map(x => x * 2)") else {
        panic!("expected call");
    };
    let Some(Expr::Member(member)) = call.callee() else {
        panic!("expected member callee");
    };
    assert_eq!(member.name_text().as_deref(), Some("map"));
    let args = call.args();
    assert_eq!(args.len(), 1);
    let Element::Expr(Expr::Arrow(arrow)) = &args[0] else {
        panic!("expected arrow argument");
    };
    assert_eq!(arrow.param_list().unwrap().params().count(), 1);
    assert!(matches!(arrow.body(), Some(ArrowBody::Expr(Expr::Binary(_)))));
}

#[test]
fn arrow_with_destructured_params_and_block_body() {
    let kinds = node_kinds("const f = ({ a }, [b], c = 1, ...d) => { return a }");
    for kind in [
        SyntaxKind::ARROW_FN,
        SyntaxKind::OBJECT_PAT,
        SyntaxKind::ARRAY_PAT,
        SyntaxKind::ASSIGN_PAT,
        SyntaxKind::REST_PAT,
        SyntaxKind::BLOCK,
        SyntaxKind::RETURN_STMT,
    ] {
        assert!(kinds.contains(&kind), "missing {kind:?}");
    }
    assert_eq!(kinds.iter().filter(|k| **k == SyntaxKind::PARAM).count(), 4);
}

#[test]
fn function_declaration_and_expression() {
    let Stmt::FnDecl(decl) = first_stmt("function add(a, b) { return a + b }") else {
        panic!("expected function declaration");
    };
    assert_eq!(decl.name().unwrap().text(), "add");
    assert_eq!(decl.param_list().unwrap().params().count(), 2);

    let kinds = node_kinds("const f = function named() {}");
    assert!(kinds.contains(&SyntaxKind::FN_EXPR));
    assert!(kinds.contains(&SyntaxKind::NAME));
}

#[test]
fn parenthesized_expression_is_not_arrow() {
    let kinds = node_kinds("(a + b) * 2");
    assert!(kinds.contains(&SyntaxKind::PAREN_EXPR));
    assert!(!kinds.contains(&SyntaxKind::ARROW_FN));
}

// ── Object literals ─────────────────────────────────────────────────────

#[test]
fn object_literal_members() {
    let Expr::Paren(paren) = first_expr("({ name: 'x', age, [k]: 1, ...base, 'quoted': 2, greet() { return 1 } })") else {
        panic!("expected parenthesized object");
    };
    let Some(Expr::Object(obj)) = paren.expr() else {
        panic!("expected object literal");
    };
    let members: Vec<_> = obj.members().collect();
    assert_eq!(members.len(), 6);

    let keys: Vec<_> = members
        .iter()
        .filter_map(|m| match m {
            ObjectMember::Property(p) => p.key(),
            ObjectMember::Spread(_) => None,
        })
        .map(|k| match k {
            PropKey::Static(name) => name,
            PropKey::Computed(_) => "<computed>".to_string(),
        })
        .collect();
    assert_eq!(keys, vec!["name", "age", "<computed>", "quoted", "greet"]);

    let ObjectMember::Property(shorthand) = &members[1] else {
        panic!("expected property");
    };
    assert!(shorthand.is_shorthand());
    assert!(matches!(shorthand.value(), Some(Expr::NameRef(_))));

    let ObjectMember::Property(method) = &members[5] else {
        panic!("expected method");
    };
    assert!(matches!(method.value(), Some(Expr::Function(_))));
    assert!(!method.is_shorthand());
}

// ── Member access and calls ─────────────────────────────────────────────

#[test]
fn optional_chaining() {
    let Expr::Member(member) = first_expr("user?.profile") else {
        panic!("expected member");
    };
    assert!(member.is_optional());

    let Expr::Index(index) = first_expr("xs?.[0]") else {
        panic!("expected index");
    };
    assert!(index.is_optional());

    let Expr::Call(call) = first_expr("cb?.(1)") else {
        panic!("expected call");
    };
    assert!(call.is_optional());
}

#[test]
fn keyword_property_names() {
    let Expr::Member(member) = first_expr("promise.new") else {
        panic!("expected member");
    };
    assert_eq!(member.name_text().as_deref(), Some("new"));
}

#[test]
fn new_expression_with_member_chain() {
    let Expr::Member(member) = first_expr("new Date().getTime") else {
        panic!("expected member");
    };
    assert!(matches!(member.object(), Some(Expr::New(_))));
}

#[test]
fn method_chain_nests_left_to_right() {
    let Expr::Call(outer) = first_expr("'a,b'.split(',').map(s => s.trim()).join('-')") else {
        panic!("expected call");
    };
    let Some(Expr::Member(join)) = outer.callee() else {
        panic!("expected member");
    };
    assert_eq!(join.name_text().as_deref(), Some("join"));
    let Some(Expr::Call(map_call)) = join.object() else {
        panic!("expected inner call");
    };
    assert_eq!(map_call.args().len(), 1);
}

// ── Operators ───────────────────────────────────────────────────────────

#[test]
fn conditional_is_right_associative() {
    let Expr::Conditional(cond) = first_expr("a ? 1 : b ? 2 : 3") else {
        panic!("expected conditional");
    };
    assert!(matches!(cond.else_expr(), Some(Expr::Conditional(_))));
}

#[test]
fn assignment_is_right_associative() {
    let Expr::Assign(assign) = first_expr("a = b = 1") else {
        panic!("expected assignment");
    };
    assert_eq!(assign.op(), Some(SyntaxKind::EQ));
    assert!(matches!(assign.rhs(), Some(Expr::Assign(_))));
}

#[test]
fn compound_assignment_forms() {
    let cases = [
        ("a **= 2", SyntaxKind::STAR_STAR_EQ),
        ("a &= 1", SyntaxKind::AMP_EQ),
        ("a |= 1", SyntaxKind::PIPE_EQ),
        ("a ^= 1", SyntaxKind::CARET_EQ),
        ("a <<= 1", SyntaxKind::SHL_EQ),
        ("a >>= 1", SyntaxKind::SHR_EQ),
        ("a >>>= 1", SyntaxKind::USHR_EQ),
        ("a &&= b", SyntaxKind::AMP_AMP_EQ),
        ("a ||= b", SyntaxKind::PIPE_PIPE_EQ),
        ("a ??= b", SyntaxKind::QUESTION_QUESTION_EQ),
    ];
    for (source, op) in cases {
        let Expr::Assign(assign) = first_expr(source) else {
            panic!("expected assignment for `{source}`");
        };
        assert_eq!(assign.op(), Some(op), "{source}");
    }
}

#[test]
fn nullish_and_logical_operators() {
    let Expr::Binary(bin) = first_expr("a ?? b || c") else {
        panic!("expected binary");
    };
    assert_eq!(bin.op(), Some(SyntaxKind::PIPE_PIPE));
    assert!(matches!(bin.lhs(), Some(Expr::Binary(_))));
}

#[test]
fn unary_and_postfix() {
    let Expr::Unary(unary) = first_expr("typeof x") else {
        panic!("expected unary");
    };
    assert_eq!(unary.op(), Some(SyntaxKind::TYPEOF_KW));

    let Expr::Postfix(postfix) = first_expr("i++") else {
        panic!("expected postfix");
    };
    assert_eq!(postfix.op(), Some(SyntaxKind::PLUS_PLUS));
}

#[test]
fn destructuring_assignment_parses_as_assign_expr() {
    let Expr::Assign(assign) = first_expr("[a, b] = [b, a]") else {
        panic!("expected assignment");
    };
    assert!(matches!(assign.lhs(), Some(Expr::Array(_))));
}

// ── Statements and line breaks ──────────────────────────────────────────

#[test]
fn statements_without_semicolons() {
    let parse = parse("const a = 1\nconst b = a\nb++\n");
    assert!(parse.ok(), "{:?}", parse.errors());
    assert_eq!(parse.tree().statements().count(), 3);
}

#[test]
fn return_followed_by_line_break_has_no_value() {
    let Stmt::FnDecl(decl) = first_stmt("function f() {\n  return\n  1\n}") else {
        panic!("expected function");
    };
    let stmts: Vec<_> = decl.body().unwrap().statements().collect();
    assert_eq!(stmts.len(), 2);
    let Stmt::Return(ret) = &stmts[0] else {
        panic!("expected return");
    };
    assert!(ret.expr().is_none());
}

#[test]
fn control_flow_statements() {
    let kinds = node_kinds(
        "if (a) { b() } else c()\nwhile (x) { break }\nfor (let i = 0; i < 3; i++) { continue }\n;",
    );
    for kind in [
        SyntaxKind::IF_STMT,
        SyntaxKind::ELSE_BRANCH,
        SyntaxKind::WHILE_STMT,
        SyntaxKind::BREAK_STMT,
        SyntaxKind::FOR_STMT,
        SyntaxKind::CONTINUE_STMT,
        SyntaxKind::EMPTY_STMT,
    ] {
        assert!(kinds.contains(&kind), "missing {kind:?}");
    }
}

#[test]
fn for_of_and_for_in() {
    let Stmt::ForOf(for_of) = first_stmt("for (const [k, v] of entries) { use(k, v) }") else {
        panic!("expected for-of");
    };
    assert!(!for_of.is_for_in());
    assert!(matches!(for_of.pattern(), Some(Pattern::Array(_))));
    assert!(matches!(for_of.iterable(), Some(Expr::NameRef(_))));
    assert!(matches!(for_of.body(), Some(Stmt::Block(_))));

    let Stmt::ForOf(for_in) = first_stmt("for (const key in obj) log(key)") else {
        panic!("expected for-in");
    };
    assert!(for_in.is_for_in());
}

// ── Errors ──────────────────────────────────────────────────────────────

#[test]
fn two_expressions_on_one_line_is_an_error() {
    let parse = parse("a b");
    assert_eq!(parse.errors().len(), 1);
    assert_eq!(parse.errors()[0].message, "expected `;` or a line break");
}

#[test]
fn unclosed_block_points_at_opening_brace() {
    let parse = parse("function f() {\n  return 1\n");
    assert_eq!(parse.errors().len(), 1);
    let err = &parse.errors()[0];
    assert_eq!(err.message, "expected `}`");
    let (label, span) = err.related.clone().unwrap();
    assert_eq!(label, "block opened here");
    assert_eq!((span.start, span.end), (13, 14));
}

#[test]
fn unterminated_string_is_reported() {
    let parse = parse("const s = 'abc");
    assert_eq!(parse.errors()[0].message, "unterminated string literal");
}

#[test]
fn tree_is_lossless_even_with_errors() {
    let src = "const = ;\nlet ok = 1";
    let parse = parse(src);
    assert!(!parse.ok());
    assert_eq!(parse.syntax().to_string(), src);
}
