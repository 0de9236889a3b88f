//! Typed AST nodes for expressions.

use crate::ast::stmt::Block;
use crate::ast::pat::Pattern;
use crate::ast::{ast_node, child_node, child_nodes, child_token, first_significant_token, AstNode, PropKey};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

// ── Expr enum ────────────────────────────────────────────────────────────

/// Any expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(Literal),
    NameRef(NameRef),
    This(ThisExpr),
    Array(ArrayExpr),
    Object(ObjectExpr),
    Paren(ParenExpr),
    Arrow(ArrowFn),
    Function(FnExpr),
    Call(CallExpr),
    New(NewExpr),
    Member(MemberExpr),
    Index(IndexExpr),
    Unary(UnaryExpr),
    Postfix(PostfixExpr),
    Binary(BinaryExpr),
    Conditional(ConditionalExpr),
    Assign(AssignExpr),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        let expr = match node.kind() {
            SyntaxKind::LITERAL => Expr::Literal(Literal { syntax: node }),
            SyntaxKind::NAME_REF => Expr::NameRef(NameRef { syntax: node }),
            SyntaxKind::THIS_EXPR => Expr::This(ThisExpr { syntax: node }),
            SyntaxKind::ARRAY_EXPR => Expr::Array(ArrayExpr { syntax: node }),
            SyntaxKind::OBJECT_EXPR => Expr::Object(ObjectExpr { syntax: node }),
            SyntaxKind::PAREN_EXPR => Expr::Paren(ParenExpr { syntax: node }),
            SyntaxKind::ARROW_FN => Expr::Arrow(ArrowFn { syntax: node }),
            SyntaxKind::FN_EXPR => Expr::Function(FnExpr { syntax: node }),
            SyntaxKind::CALL_EXPR => Expr::Call(CallExpr { syntax: node }),
            SyntaxKind::NEW_EXPR => Expr::New(NewExpr { syntax: node }),
            SyntaxKind::MEMBER_EXPR => Expr::Member(MemberExpr { syntax: node }),
            SyntaxKind::INDEX_EXPR => Expr::Index(IndexExpr { syntax: node }),
            SyntaxKind::UNARY_EXPR => Expr::Unary(UnaryExpr { syntax: node }),
            SyntaxKind::POSTFIX_EXPR => Expr::Postfix(PostfixExpr { syntax: node }),
            SyntaxKind::BINARY_EXPR => Expr::Binary(BinaryExpr { syntax: node }),
            SyntaxKind::CONDITIONAL_EXPR => Expr::Conditional(ConditionalExpr { syntax: node }),
            SyntaxKind::ASSIGN_EXPR => Expr::Assign(AssignExpr { syntax: node }),
            _ => return None,
        };
        Some(expr)
    }

    /// Access the underlying syntax node regardless of variant.
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Expr::Literal(n) => &n.syntax,
            Expr::NameRef(n) => &n.syntax,
            Expr::This(n) => &n.syntax,
            Expr::Array(n) => &n.syntax,
            Expr::Object(n) => &n.syntax,
            Expr::Paren(n) => &n.syntax,
            Expr::Arrow(n) => &n.syntax,
            Expr::Function(n) => &n.syntax,
            Expr::Call(n) => &n.syntax,
            Expr::New(n) => &n.syntax,
            Expr::Member(n) => &n.syntax,
            Expr::Index(n) => &n.syntax,
            Expr::Unary(n) => &n.syntax,
            Expr::Postfix(n) => &n.syntax,
            Expr::Binary(n) => &n.syntax,
            Expr::Conditional(n) => &n.syntax,
            Expr::Assign(n) => &n.syntax,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(self) -> Expr {
        let mut expr = self;
        while let Expr::Paren(paren) = &expr {
            match paren.expr() {
                Some(inner) => expr = inner,
                None => break,
            }
        }
        expr
    }
}

/// The `n`-th direct expression child of `node`.
fn nth_expr(node: &SyntaxNode, n: usize) -> Option<Expr> {
    node.children().filter_map(Expr::cast).nth(n)
}

/// The operator token of a unary, binary, postfix or assignment node: its
/// only direct non-trivia token.
fn operator(node: &SyntaxNode) -> Option<SyntaxToken> {
    first_significant_token(node)
}

// ── Literals and names ──────────────────────────────────────────────────

ast_node!(Literal, LITERAL);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    String,
    Template,
    Regex,
    Boolean,
    Null,
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        first_significant_token(&self.syntax)
    }

    pub fn kind(&self) -> Option<LiteralKind> {
        let kind = match self.token()?.kind() {
            SyntaxKind::NUMBER => LiteralKind::Number,
            SyntaxKind::STRING => LiteralKind::String,
            SyntaxKind::TEMPLATE => LiteralKind::Template,
            SyntaxKind::REGEX => LiteralKind::Regex,
            SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW => LiteralKind::Boolean,
            SyntaxKind::NULL_KW => LiteralKind::Null,
            _ => return None,
        };
        Some(kind)
    }

    /// Value of a plain string literal with quotes removed.
    pub fn string_value(&self) -> Option<String> {
        let token = self.token()?;
        (token.kind() == SyntaxKind::STRING).then(|| crate::ast::unquote(token.text()))
    }
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn ident(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn text(&self) -> String {
        self.ident().map(|t| t.text().to_string()).unwrap_or_default()
    }
}

ast_node!(ThisExpr, THIS_EXPR);

// ── Array and object literals ───────────────────────────────────────────

/// An element of an array literal or argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Expr(Expr),
    Spread(SpreadElement),
}

impl Element {
    fn cast(node: SyntaxNode) -> Option<Self> {
        if node.kind() == SyntaxKind::SPREAD_ELEMENT {
            return Some(Element::Spread(SpreadElement { syntax: node }));
        }
        Expr::cast(node).map(Element::Expr)
    }
}

ast_node!(SpreadElement, SPREAD_ELEMENT);

impl SpreadElement {
    pub fn expr(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

ast_node!(ArrayExpr, ARRAY_EXPR);

impl ArrayExpr {
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.syntax.children().filter_map(Element::cast)
    }
}

/// A member of an object literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectMember {
    Property(Property),
    Spread(SpreadElement),
}

ast_node!(ObjectExpr, OBJECT_EXPR);

impl ObjectExpr {
    pub fn members(&self) -> impl Iterator<Item = ObjectMember> + '_ {
        self.syntax.children().filter_map(|node| match node.kind() {
            SyntaxKind::PROPERTY => Some(ObjectMember::Property(Property { syntax: node })),
            SyntaxKind::SPREAD_ELEMENT => Some(ObjectMember::Spread(SpreadElement { syntax: node })),
            _ => None,
        })
    }
}

ast_node!(Property, PROPERTY);

impl Property {
    pub fn key(&self) -> Option<PropKey> {
        let first = self
            .syntax
            .children_with_tokens()
            .find(|el| !el.kind().is_trivia())?;
        match first {
            rowan::NodeOrToken::Node(node) => match node.kind() {
                SyntaxKind::COMPUTED_KEY => Some(PropKey::Computed(ComputedKey { syntax: node })),
                SyntaxKind::NAME_REF => Some(PropKey::Static(NameRef { syntax: node }.text())),
                _ => None,
            },
            rowan::NodeOrToken::Token(token) => PropKey::from_token(&token),
        }
    }

    /// The value expression; for shorthand `{ a }` this is the `a` reference
    /// and for methods the function.
    pub fn value(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn is_shorthand(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::COLON).is_none()
            && child_node::<FnExpr>(&self.syntax).is_none()
    }
}

ast_node!(ComputedKey, COMPUTED_KEY);

impl ComputedKey {
    pub fn expr(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    pub fn expr(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

// ── Functions ───────────────────────────────────────────────────────────

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(Param, PARAM);

impl Param {
    pub fn pattern(&self) -> Option<Pattern> {
        self.syntax.children().find_map(Pattern::cast)
    }
}

ast_node!(ArrowFn, ARROW_FN);

/// Body of an arrow function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrowBody {
    Block(Block),
    Expr(Expr),
}

impl ArrowFn {
    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<ArrowBody> {
        if let Some(block) = child_node::<Block>(&self.syntax) {
            return Some(ArrowBody::Block(block));
        }
        nth_expr(&self.syntax, 0).map(ArrowBody::Expr)
    }
}

ast_node!(FnExpr, FN_EXPR);

impl FnExpr {
    pub fn name(&self) -> Option<crate::ast::stmt::Name> {
        child_node(&self.syntax)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}

/// Anything with parameters and a body: arrows, function expressions,
/// methods and function declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FnLike {
    Arrow(ArrowFn),
    Expr(FnExpr),
    Decl(crate::ast::stmt::FnDecl),
}

impl FnLike {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::ARROW_FN => Some(FnLike::Arrow(ArrowFn { syntax: node })),
            SyntaxKind::FN_EXPR => Some(FnLike::Expr(FnExpr { syntax: node })),
            SyntaxKind::FN_DECL => crate::ast::stmt::FnDecl::cast(node).map(FnLike::Decl),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            FnLike::Arrow(n) => &n.syntax,
            FnLike::Expr(n) => &n.syntax,
            FnLike::Decl(n) => n.syntax(),
        }
    }

    pub fn params(&self) -> Vec<Param> {
        let list = match self {
            FnLike::Arrow(n) => n.param_list(),
            FnLike::Expr(n) => n.param_list(),
            FnLike::Decl(n) => n.param_list(),
        };
        list.map(|l| l.params().collect()).unwrap_or_default()
    }

    /// Block body, if the function has one.
    pub fn body_block(&self) -> Option<Block> {
        match self {
            FnLike::Arrow(n) => match n.body()? {
                ArrowBody::Block(block) => Some(block),
                ArrowBody::Expr(_) => None,
            },
            FnLike::Expr(n) => n.body(),
            FnLike::Decl(n) => n.body(),
        }
    }

    /// Concise arrow body (`x => x * 2`).
    pub fn body_expr(&self) -> Option<Expr> {
        match self {
            FnLike::Arrow(n) => match n.body()? {
                ArrowBody::Expr(expr) => Some(expr),
                ArrowBody::Block(_) => None,
            },
            _ => None,
        }
    }
}

// ── Calls and access ────────────────────────────────────────────────────

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Element> + '_ {
        self.syntax.children().filter_map(Element::cast)
    }
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    pub fn callee(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child_node(&self.syntax)
    }

    pub fn args(&self) -> Vec<Element> {
        self.arg_list().map(|l| l.args().collect()).unwrap_or_default()
    }

    pub fn is_optional(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::QUESTION_DOT).is_some()
    }
}

ast_node!(NewExpr, NEW_EXPR);

impl NewExpr {
    pub fn callee(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn args(&self) -> Vec<Element> {
        child_node::<ArgList>(&self.syntax)
            .map(|l| l.args().collect())
            .unwrap_or_default()
    }
}

ast_node!(MemberExpr, MEMBER_EXPR);

impl MemberExpr {
    pub fn object(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    /// The property name token after `.` / `?.`.
    pub fn name(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::IDENT || t.kind().is_keyword())
            .last()
    }

    pub fn name_text(&self) -> Option<String> {
        self.name().map(|t| t.text().to_string())
    }

    pub fn is_optional(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::QUESTION_DOT).is_some()
    }
}

ast_node!(IndexExpr, INDEX_EXPR);

impl IndexExpr {
    pub fn object(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn index(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 1)
    }

    pub fn is_optional(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::QUESTION_DOT).is_some()
    }
}

// ── Operators ───────────────────────────────────────────────────────────

ast_node!(UnaryExpr, UNARY_EXPR);

impl UnaryExpr {
    pub fn op(&self) -> Option<SyntaxKind> {
        operator(&self.syntax).map(|t| t.kind())
    }

    pub fn operand(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

ast_node!(PostfixExpr, POSTFIX_EXPR);

impl PostfixExpr {
    pub fn op(&self) -> Option<SyntaxKind> {
        operator(&self.syntax).map(|t| t.kind())
    }

    pub fn operand(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    pub fn op(&self) -> Option<SyntaxKind> {
        operator(&self.syntax).map(|t| t.kind())
    }

    pub fn lhs(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn rhs(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 1)
    }
}

ast_node!(ConditionalExpr, CONDITIONAL_EXPR);

impl ConditionalExpr {
    pub fn condition(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn then_expr(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 1)
    }

    pub fn else_expr(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 2)
    }
}

ast_node!(AssignExpr, ASSIGN_EXPR);

impl AssignExpr {
    /// `EQ` for plain assignment, `PLUS_EQ` etc. for compound forms.
    pub fn op(&self) -> Option<SyntaxKind> {
        operator(&self.syntax).map(|t| t.kind())
    }

    pub fn lhs(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn rhs(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 1)
    }
}
