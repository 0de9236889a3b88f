use serde::Serialize;

use crate::span::Span;

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

/// Every token kind in the supported JavaScript subset.
///
/// Contextual words (`of`, `undefined`, `get`, ...) are plain identifiers;
/// the parser inspects their text where it cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Keywords (20) ──────────────────────────────────────────────────
    Break,
    Const,
    Continue,
    Else,
    False,
    For,
    Function,
    If,
    In,
    Instanceof,
    Let,
    New,
    Null,
    Return,
    This,
    True,
    Typeof,
    Var,
    Void,
    While,

    // ── Operators (47) ─────────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `===`
    EqEqEq,
    /// `!=`
    NotEq,
    /// `!==`
    NotEqEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `??`
    QuestionQuestion,
    /// `!`
    Bang,
    /// `?`
    Question,
    /// `?.`
    QuestionDot,
    /// `=>`
    FatArrow,
    /// `+=`
    PlusEq,
    /// `-=`
    MinusEq,
    /// `*=`
    StarEq,
    /// `/=`
    SlashEq,
    /// `%=`
    PercentEq,
    /// `**=`
    StarStarEq,
    /// `&=`
    AmpEq,
    /// `|=`
    PipeEq,
    /// `^=`
    CaretEq,
    /// `<<=`
    ShlEq,
    /// `>>=`
    ShrEq,
    /// `>>>=`
    UShrEq,
    /// `&&=`
    AmpAmpEq,
    /// `||=`
    PipePipeEq,
    /// `??=`
    QuestionQuestionEq,
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `~`
    Tilde,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `>>>`
    UShr,
    /// `...`
    DotDotDot,

    // ── Delimiters (6) ─────────────────────────────────────────────────
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // ── Punctuation (4) ────────────────────────────────────────────────
    Comma,
    Dot,
    Colon,
    Semicolon,

    // ── Literals (4) ───────────────────────────────────────────────────
    /// Decimal, hex, binary, octal or exponent number, e.g. `42`, `0xff`, `1e3`.
    Number,
    /// Single- or double-quoted string including its quotes.
    String,
    /// Whole template literal from backtick to backtick, interpolations included.
    Template,
    /// Regular expression literal including flags, e.g. `/a+/g`.
    Regex,

    // ── Identifiers and trivia (3) ─────────────────────────────────────
    Ident,
    /// `// ...` or `/* ... */`. Kept so spans stay true source offsets.
    Comment,
    Whitespace,

    // ── Special (2) ────────────────────────────────────────────────────
    Eof,
    /// Invalid/unexpected input.
    Error,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Break
                | TokenKind::Const
                | TokenKind::Continue
                | TokenKind::Else
                | TokenKind::False
                | TokenKind::For
                | TokenKind::Function
                | TokenKind::If
                | TokenKind::In
                | TokenKind::Instanceof
                | TokenKind::Let
                | TokenKind::New
                | TokenKind::Null
                | TokenKind::Return
                | TokenKind::This
                | TokenKind::True
                | TokenKind::Typeof
                | TokenKind::Var
                | TokenKind::Void
                | TokenKind::While
        )
    }

    /// Whether a `/` following this token is a division operator rather than
    /// the start of a regex literal.
    pub fn ends_operand(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::Template
                | TokenKind::Regex
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::This
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        )
    }
}

/// Look up a keyword from its string representation.
///
/// The lexer calls this after scanning an identifier-shaped token.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        "break" => Some(TokenKind::Break),
        "const" => Some(TokenKind::Const),
        "continue" => Some(TokenKind::Continue),
        "else" => Some(TokenKind::Else),
        "false" => Some(TokenKind::False),
        "for" => Some(TokenKind::For),
        "function" => Some(TokenKind::Function),
        "if" => Some(TokenKind::If),
        "in" => Some(TokenKind::In),
        "instanceof" => Some(TokenKind::Instanceof),
        "let" => Some(TokenKind::Let),
        "new" => Some(TokenKind::New),
        "null" => Some(TokenKind::Null),
        "return" => Some(TokenKind::Return),
        "this" => Some(TokenKind::This),
        "true" => Some(TokenKind::True),
        "typeof" => Some(TokenKind::Typeof),
        "var" => Some(TokenKind::Var),
        "void" => Some(TokenKind::Void),
        "while" => Some(TokenKind::While),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_from_str_recognizes_all_keywords() {
        let keywords = [
            ("break", TokenKind::Break),
            ("const", TokenKind::Const),
            ("continue", TokenKind::Continue),
            ("else", TokenKind::Else),
            ("false", TokenKind::False),
            ("for", TokenKind::For),
            ("function", TokenKind::Function),
            ("if", TokenKind::If),
            ("in", TokenKind::In),
            ("instanceof", TokenKind::Instanceof),
            ("let", TokenKind::Let),
            ("new", TokenKind::New),
            ("null", TokenKind::Null),
            ("return", TokenKind::Return),
            ("this", TokenKind::This),
            ("true", TokenKind::True),
            ("typeof", TokenKind::Typeof),
            ("var", TokenKind::Var),
            ("void", TokenKind::Void),
            ("while", TokenKind::While),
        ];

        for (s, expected) in &keywords {
            assert_eq!(
                keyword_from_str(s),
                Some(*expected),
                "keyword_from_str({s:?}) should return Some({expected:?})"
            );
            assert!(expected.is_keyword());
        }
    }

    #[test]
    fn contextual_words_are_identifiers() {
        assert_eq!(keyword_from_str("of"), None);
        assert_eq!(keyword_from_str("undefined"), None);
        assert_eq!(keyword_from_str("async"), None);
        assert_eq!(keyword_from_str("Return"), None); // case-sensitive
        assert_eq!(keyword_from_str(""), None);
    }

    #[test]
    fn token_new_constructor() {
        let tok = Token::new(TokenKind::Function, 10, 18);
        assert_eq!(tok.kind, TokenKind::Function);
        assert_eq!(tok.span, Span::new(10, 18));
    }

    #[test]
    fn trivia_kinds() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::Comment.is_trivia());
        assert!(!TokenKind::Ident.is_trivia());
    }

    #[test]
    fn operand_enders_decide_slash() {
        assert!(TokenKind::Ident.ends_operand());
        assert!(TokenKind::RParen.ends_operand());
        assert!(!TokenKind::Eq.ends_operand());
        assert!(!TokenKind::LParen.ends_operand());
        assert!(!TokenKind::Return.ends_operand());
    }
}
