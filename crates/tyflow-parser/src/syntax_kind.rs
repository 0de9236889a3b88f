//! SyntaxKind enum for the tyflow CST.
//!
//! This is a superset of `TokenKind` (mapped to SCREAMING_SNAKE_CASE) plus
//! composite node kinds for CST nodes produced by the parser.

use tyflow_common::token::TokenKind;

/// Every kind of syntax element in the CST.
///
/// Token kinds (leaves) are mapped 1:1 from [`TokenKind`]. The first two
/// values are sentinels used by the event-based parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Sentinels ──────────────────────────────────────────────────────
    /// Placeholder kind for incomplete/unfinished parser events.
    TOMBSTONE = 0,
    /// Wrapper for tokens/nodes that couldn't be parsed.
    ERROR_NODE = 1,

    // ── Keywords (20) ──────────────────────────────────────────────────
    BREAK_KW,
    CONST_KW,
    CONTINUE_KW,
    ELSE_KW,
    FALSE_KW,
    FOR_KW,
    FUNCTION_KW,
    IF_KW,
    IN_KW,
    INSTANCEOF_KW,
    LET_KW,
    NEW_KW,
    NULL_KW,
    RETURN_KW,
    THIS_KW,
    TRUE_KW,
    TYPEOF_KW,
    VAR_KW,
    VOID_KW,
    WHILE_KW,

    // ── Operators (47) ─────────────────────────────────────────────────
    PLUS,
    MINUS,
    STAR,
    STAR_STAR,
    SLASH,
    PERCENT,
    PLUS_PLUS,
    MINUS_MINUS,
    EQ,
    EQ_EQ,
    EQ_EQ_EQ,
    NOT_EQ,
    NOT_EQ_EQ,
    LT,
    GT,
    LT_EQ,
    GT_EQ,
    AMP_AMP,
    PIPE_PIPE,
    QUESTION_QUESTION,
    BANG,
    QUESTION,
    QUESTION_DOT,
    FAT_ARROW,
    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    SLASH_EQ,
    PERCENT_EQ,
    STAR_STAR_EQ,
    AMP_EQ,
    PIPE_EQ,
    CARET_EQ,
    SHL_EQ,
    SHR_EQ,
    USHR_EQ,
    AMP_AMP_EQ,
    PIPE_PIPE_EQ,
    QUESTION_QUESTION_EQ,
    AMP,
    PIPE,
    CARET,
    TILDE,
    SHL,
    SHR,
    USHR,
    DOT_DOT_DOT,

    // ── Delimiters (6) ─────────────────────────────────────────────────
    L_PAREN,
    R_PAREN,
    L_BRACKET,
    R_BRACKET,
    L_BRACE,
    R_BRACE,

    // ── Punctuation (4) ────────────────────────────────────────────────
    COMMA,
    DOT,
    COLON,
    SEMICOLON,

    // ── Literals (4) ───────────────────────────────────────────────────
    NUMBER,
    STRING,
    TEMPLATE,
    REGEX,

    // ── Identifiers, trivia, special (5) ───────────────────────────────
    IDENT,
    COMMENT,
    WHITESPACE,
    EOF,
    ERROR,

    // ── Statement node kinds ───────────────────────────────────────────
    /// Root node of a parsed file.
    SOURCE_FILE,
    /// `const a = 1, b = 2`
    VAR_DECL,
    /// One `pattern = init` inside a VAR_DECL.
    DECLARATOR,
    /// `function name(params) { ... }`
    FN_DECL,
    /// Declared name of a function.
    NAME,
    /// `{ ... }` in statement position.
    BLOCK,
    RETURN_STMT,
    IF_STMT,
    /// `else <stmt>`
    ELSE_BRANCH,
    /// `for (init; cond; update) body`
    FOR_STMT,
    /// `for (const x of xs) body` and `for (const k in obj) body`
    FOR_OF_STMT,
    WHILE_STMT,
    EXPR_STMT,
    EMPTY_STMT,
    BREAK_STMT,
    CONTINUE_STMT,

    // ── Expression node kinds ──────────────────────────────────────────
    /// Number, string, template, regex, boolean or null literal.
    LITERAL,
    /// Identifier in expression position.
    NAME_REF,
    THIS_EXPR,
    /// `[a, ...b]`
    ARRAY_EXPR,
    /// `{ a: 1, b, [k]: v, ...rest, m() {} }`
    OBJECT_EXPR,
    /// One member of an object literal.
    PROPERTY,
    /// `[expr]` in key position.
    COMPUTED_KEY,
    /// `...expr` in an array, object or argument list.
    SPREAD_ELEMENT,
    PAREN_EXPR,
    /// `(a, b) => body` or `a => body`
    ARROW_FN,
    /// `function (params) { ... }`, also object-literal methods.
    FN_EXPR,
    /// `(a, b = 1, ...rest)`
    PARAM_LIST,
    /// A single parameter wrapping its pattern.
    PARAM,
    CALL_EXPR,
    NEW_EXPR,
    /// `(a, ...b)` after a callee.
    ARG_LIST,
    /// `a.b` or `a?.b`
    MEMBER_EXPR,
    /// `a[b]` or `a?.[b]`
    INDEX_EXPR,
    /// `!a`, `-a`, `typeof a`, `++a`, ...
    UNARY_EXPR,
    /// `a++`, `a--`
    POSTFIX_EXPR,
    BINARY_EXPR,
    /// `cond ? a : b`
    CONDITIONAL_EXPR,
    /// `a = b`, `a += b`, `[a, b] = xs`
    ASSIGN_EXPR,

    // ── Pattern node kinds ─────────────────────────────────────────────
    /// Binding identifier.
    IDENT_PAT,
    /// `[a, , ...rest]`
    ARRAY_PAT,
    /// `{ a, b: c, ...rest }`
    OBJECT_PAT,
    /// One member of an object pattern.
    PROP_PAT,
    /// `...pat`
    REST_PAT,
    /// `pat = default`
    ASSIGN_PAT,
}

impl SyntaxKind {
    /// Whether this kind represents trivia (tokens that don't affect parsing).
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::WHITESPACE | SyntaxKind::COMMENT)
    }

    pub fn is_keyword(self) -> bool {
        (self as u16) >= (SyntaxKind::BREAK_KW as u16) && (self as u16) <= (SyntaxKind::WHILE_KW as u16)
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            // Keywords
            TokenKind::Break => SyntaxKind::BREAK_KW,
            TokenKind::Const => SyntaxKind::CONST_KW,
            TokenKind::Continue => SyntaxKind::CONTINUE_KW,
            TokenKind::Else => SyntaxKind::ELSE_KW,
            TokenKind::False => SyntaxKind::FALSE_KW,
            TokenKind::For => SyntaxKind::FOR_KW,
            TokenKind::Function => SyntaxKind::FUNCTION_KW,
            TokenKind::If => SyntaxKind::IF_KW,
            TokenKind::In => SyntaxKind::IN_KW,
            TokenKind::Instanceof => SyntaxKind::INSTANCEOF_KW,
            TokenKind::Let => SyntaxKind::LET_KW,
            TokenKind::New => SyntaxKind::NEW_KW,
            TokenKind::Null => SyntaxKind::NULL_KW,
            TokenKind::Return => SyntaxKind::RETURN_KW,
            TokenKind::This => SyntaxKind::THIS_KW,
            TokenKind::True => SyntaxKind::TRUE_KW,
            TokenKind::Typeof => SyntaxKind::TYPEOF_KW,
            TokenKind::Var => SyntaxKind::VAR_KW,
            TokenKind::Void => SyntaxKind::VOID_KW,
            TokenKind::While => SyntaxKind::WHILE_KW,
            // Operators
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Minus => SyntaxKind::MINUS,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::StarStar => SyntaxKind::STAR_STAR,
            TokenKind::Slash => SyntaxKind::SLASH,
            TokenKind::Percent => SyntaxKind::PERCENT,
            TokenKind::PlusPlus => SyntaxKind::PLUS_PLUS,
            TokenKind::MinusMinus => SyntaxKind::MINUS_MINUS,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::EqEq => SyntaxKind::EQ_EQ,
            TokenKind::EqEqEq => SyntaxKind::EQ_EQ_EQ,
            TokenKind::NotEq => SyntaxKind::NOT_EQ,
            TokenKind::NotEqEq => SyntaxKind::NOT_EQ_EQ,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::LtEq => SyntaxKind::LT_EQ,
            TokenKind::GtEq => SyntaxKind::GT_EQ,
            TokenKind::AmpAmp => SyntaxKind::AMP_AMP,
            TokenKind::PipePipe => SyntaxKind::PIPE_PIPE,
            TokenKind::QuestionQuestion => SyntaxKind::QUESTION_QUESTION,
            TokenKind::Bang => SyntaxKind::BANG,
            TokenKind::Question => SyntaxKind::QUESTION,
            TokenKind::QuestionDot => SyntaxKind::QUESTION_DOT,
            TokenKind::FatArrow => SyntaxKind::FAT_ARROW,
            TokenKind::PlusEq => SyntaxKind::PLUS_EQ,
            TokenKind::MinusEq => SyntaxKind::MINUS_EQ,
            TokenKind::StarEq => SyntaxKind::STAR_EQ,
            TokenKind::SlashEq => SyntaxKind::SLASH_EQ,
            TokenKind::PercentEq => SyntaxKind::PERCENT_EQ,
            TokenKind::StarStarEq => SyntaxKind::STAR_STAR_EQ,
            TokenKind::AmpEq => SyntaxKind::AMP_EQ,
            TokenKind::PipeEq => SyntaxKind::PIPE_EQ,
            TokenKind::CaretEq => SyntaxKind::CARET_EQ,
            TokenKind::ShlEq => SyntaxKind::SHL_EQ,
            TokenKind::ShrEq => SyntaxKind::SHR_EQ,
            TokenKind::UShrEq => SyntaxKind::USHR_EQ,
            TokenKind::AmpAmpEq => SyntaxKind::AMP_AMP_EQ,
            TokenKind::PipePipeEq => SyntaxKind::PIPE_PIPE_EQ,
            TokenKind::QuestionQuestionEq => SyntaxKind::QUESTION_QUESTION_EQ,
            TokenKind::Amp => SyntaxKind::AMP,
            TokenKind::Pipe => SyntaxKind::PIPE,
            TokenKind::Caret => SyntaxKind::CARET,
            TokenKind::Tilde => SyntaxKind::TILDE,
            TokenKind::Shl => SyntaxKind::SHL,
            TokenKind::Shr => SyntaxKind::SHR,
            TokenKind::UShr => SyntaxKind::USHR,
            TokenKind::DotDotDot => SyntaxKind::DOT_DOT_DOT,
            // Delimiters
            TokenKind::LParen => SyntaxKind::L_PAREN,
            TokenKind::RParen => SyntaxKind::R_PAREN,
            TokenKind::LBracket => SyntaxKind::L_BRACKET,
            TokenKind::RBracket => SyntaxKind::R_BRACKET,
            TokenKind::LBrace => SyntaxKind::L_BRACE,
            TokenKind::RBrace => SyntaxKind::R_BRACE,
            // Punctuation
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Semicolon => SyntaxKind::SEMICOLON,
            // Literals
            TokenKind::Number => SyntaxKind::NUMBER,
            TokenKind::String => SyntaxKind::STRING,
            TokenKind::Template => SyntaxKind::TEMPLATE,
            TokenKind::Regex => SyntaxKind::REGEX,
            // Identifiers, trivia, special
            TokenKind::Ident => SyntaxKind::IDENT,
            TokenKind::Comment => SyntaxKind::COMMENT,
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Eof => SyntaxKind::EOF,
            TokenKind::Error => SyntaxKind::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_map_to_keyword_kinds() {
        let keywords = [
            TokenKind::Break,
            TokenKind::Const,
            TokenKind::Continue,
            TokenKind::Else,
            TokenKind::False,
            TokenKind::For,
            TokenKind::Function,
            TokenKind::If,
            TokenKind::In,
            TokenKind::Instanceof,
            TokenKind::Let,
            TokenKind::New,
            TokenKind::Null,
            TokenKind::Return,
            TokenKind::This,
            TokenKind::True,
            TokenKind::Typeof,
            TokenKind::Var,
            TokenKind::Void,
            TokenKind::While,
        ];
        for kind in keywords {
            assert!(SyntaxKind::from(kind).is_keyword(), "{kind:?}");
        }
        assert!(!SyntaxKind::from(TokenKind::Ident).is_keyword());
        assert!(!SyntaxKind::from(TokenKind::Plus).is_keyword());
    }

    #[test]
    fn trivia_kinds_identified() {
        assert!(SyntaxKind::WHITESPACE.is_trivia());
        assert!(SyntaxKind::COMMENT.is_trivia());
        assert!(!SyntaxKind::IDENT.is_trivia());
        assert!(!SyntaxKind::SEMICOLON.is_trivia());
    }

    #[test]
    fn sentinel_kinds_are_first_values() {
        assert_eq!(SyntaxKind::TOMBSTONE as u16, 0);
        assert_eq!(SyntaxKind::ERROR_NODE as u16, 1);
    }

    #[test]
    fn node_kinds_follow_token_kinds() {
        assert!(SyntaxKind::SOURCE_FILE > SyntaxKind::ERROR);
        assert!(SyntaxKind::ASSIGN_PAT > SyntaxKind::SOURCE_FILE);
    }
}
