// tyflow lexer -- lossless tokenizer for the supported JavaScript subset.

mod cursor;

use cursor::Cursor;
use tyflow_common::token::{keyword_from_str, Token, TokenKind};

/// Converts source text into a stream of tokens.
///
/// Whitespace and comments come out as trivia tokens, so concatenating the
/// text of every token reproduces the input exactly. The stream always ends
/// with a single `Eof` token.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    emitted_eof: bool,
    /// Last non-trivia token kind, used to tell `/` from a regex literal.
    last_significant: Option<TokenKind>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
            last_significant: None,
        }
    }

    /// Tokenize the entire source into a `Vec<Token>`, including the final `Eof`.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    fn next_token(&mut self) -> Token {
        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            c if c.is_whitespace() => {
                self.cursor.eat_while(char::is_whitespace);
                self.finish(TokenKind::Whitespace, start)
            }

            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '[' => self.single_char_token(TokenKind::LBracket, start),
            ']' => self.single_char_token(TokenKind::RBracket, start),
            '{' => self.single_char_token(TokenKind::LBrace, start),
            '}' => self.single_char_token(TokenKind::RBrace, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            ':' => self.single_char_token(TokenKind::Colon, start),
            '~' => self.single_char_token(TokenKind::Tilde, start),

            '=' => self.lex_eq(start),
            '!' => self.lex_bang(start),
            '<' => self.lex_lt(start),
            '>' => self.lex_gt(start),
            '&' => {
                use TokenKind::{Amp, AmpAmp, AmpAmpEq, AmpEq};
                self.lex_logical('&', [Amp, AmpEq, AmpAmp, AmpAmpEq], start)
            }
            '|' => {
                use TokenKind::{Pipe, PipeEq, PipePipe, PipePipeEq};
                self.lex_logical('|', [Pipe, PipeEq, PipePipe, PipePipeEq], start)
            }
            '^' => self.lex_pair('=', TokenKind::Caret, TokenKind::CaretEq, start),
            '+' => self.lex_plus(start),
            '-' => self.lex_minus(start),
            '*' => self.lex_star(start),
            '%' => self.lex_pair('=', TokenKind::Percent, TokenKind::PercentEq, start),
            '?' => self.lex_question(start),
            '.' => self.lex_dot(start),
            '/' => self.lex_slash(start),

            '0'..='9' => self.lex_number(start),

            '"' | '\'' => self.lex_string(c, start),
            '`' => self.lex_template(start),

            c if is_ident_start(c) => self.lex_ident(start),

            _ => {
                self.cursor.advance();
                self.finish(TokenKind::Error, start)
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn finish(&self, kind: TokenKind, start: u32) -> Token {
        Token::new(kind, start, self.cursor.pos())
    }

    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        self.finish(kind, start)
    }

    /// `c` -> `single`, `c second` -> `double`.
    fn lex_pair(&mut self, second: char, single: TokenKind, double: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat(second) {
            self.finish(double, start)
        } else {
            self.finish(single, start)
        }
    }

    // ── Operator lexing ──────────────────────────────────────────────────

    /// `c`, `c=`, `cc`, `cc=` for `&` and `|`, in that order in `kinds`.
    fn lex_logical(&mut self, c: char, kinds: [TokenKind; 4], start: u32) -> Token {
        self.cursor.advance();
        let doubled = usize::from(self.cursor.eat(c)) * 2;
        let assign = usize::from(self.cursor.eat('='));
        self.finish(kinds[doubled + assign], start)
    }

    /// `=`, `==`, `===`, `=>`
    fn lex_eq(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('>') {
            return self.finish(TokenKind::FatArrow, start);
        }
        if self.cursor.eat('=') {
            if self.cursor.eat('=') {
                return self.finish(TokenKind::EqEqEq, start);
            }
            return self.finish(TokenKind::EqEq, start);
        }
        self.finish(TokenKind::Eq, start)
    }

    /// `!`, `!=`, `!==`
    fn lex_bang(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('=') {
            if self.cursor.eat('=') {
                return self.finish(TokenKind::NotEqEq, start);
            }
            return self.finish(TokenKind::NotEq, start);
        }
        self.finish(TokenKind::Bang, start)
    }

    /// `<`, `<=`, `<<`, `<<=`
    fn lex_lt(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('=') {
            self.finish(TokenKind::LtEq, start)
        } else if self.cursor.eat('<') {
            if self.cursor.eat('=') {
                return self.finish(TokenKind::ShlEq, start);
            }
            self.finish(TokenKind::Shl, start)
        } else {
            self.finish(TokenKind::Lt, start)
        }
    }

    /// `>`, `>=`, `>>`, `>>=`, `>>>`, `>>>=`
    fn lex_gt(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('=') {
            return self.finish(TokenKind::GtEq, start);
        }
        if self.cursor.eat('>') {
            if self.cursor.eat('>') {
                if self.cursor.eat('=') {
                    return self.finish(TokenKind::UShrEq, start);
                }
                return self.finish(TokenKind::UShr, start);
            }
            if self.cursor.eat('=') {
                return self.finish(TokenKind::ShrEq, start);
            }
            return self.finish(TokenKind::Shr, start);
        }
        self.finish(TokenKind::Gt, start)
    }

    /// `+`, `++`, `+=`
    fn lex_plus(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('+') {
            self.finish(TokenKind::PlusPlus, start)
        } else if self.cursor.eat('=') {
            self.finish(TokenKind::PlusEq, start)
        } else {
            self.finish(TokenKind::Plus, start)
        }
    }

    /// `-`, `--`, `-=`
    fn lex_minus(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('-') {
            self.finish(TokenKind::MinusMinus, start)
        } else if self.cursor.eat('=') {
            self.finish(TokenKind::MinusEq, start)
        } else {
            self.finish(TokenKind::Minus, start)
        }
    }

    /// `*`, `**`, `*=`, `**=`
    fn lex_star(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('*') {
            if self.cursor.eat('=') {
                return self.finish(TokenKind::StarStarEq, start);
            }
            self.finish(TokenKind::StarStar, start)
        } else if self.cursor.eat('=') {
            self.finish(TokenKind::StarEq, start)
        } else {
            self.finish(TokenKind::Star, start)
        }
    }

    /// `?`, `??`, `??=`, `?.` (but `a ?.5 : b` stays a ternary)
    fn lex_question(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('?') {
            if self.cursor.eat('=') {
                return self.finish(TokenKind::QuestionQuestionEq, start);
            }
            return self.finish(TokenKind::QuestionQuestion, start);
        }
        if self.cursor.peek() == Some('.')
            && !self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance();
            return self.finish(TokenKind::QuestionDot, start);
        }
        self.finish(TokenKind::Question, start)
    }

    /// `.`, `...`, or a number like `.5`
    fn lex_dot(&mut self, start: u32) -> Token {
        if self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.cursor.advance();
            self.eat_fraction_and_exponent();
            return self.finish(TokenKind::Number, start);
        }
        self.cursor.advance();
        if self.cursor.peek() == Some('.') && self.cursor.peek_next() == Some('.') {
            self.cursor.advance();
            self.cursor.advance();
            return self.finish(TokenKind::DotDotDot, start);
        }
        self.finish(TokenKind::Dot, start)
    }

    /// Comments, regex literals, `/` and `/=`.
    fn lex_slash(&mut self, start: u32) -> Token {
        match self.cursor.peek_next() {
            Some('/') => {
                self.cursor.eat_while(|c| c != '\n');
                return self.finish(TokenKind::Comment, start);
            }
            Some('*') => return self.lex_block_comment(start),
            _ => {}
        }

        let is_division = self.last_significant.is_some_and(TokenKind::ends_operand);
        if !is_division {
            return self.lex_regex(start);
        }

        self.cursor.advance();
        if self.cursor.eat('=') {
            self.finish(TokenKind::SlashEq, start)
        } else {
            self.finish(TokenKind::Slash, start)
        }
    }

    // ── Comments ─────────────────────────────────────────────────────────

    fn lex_block_comment(&mut self, start: u32) -> Token {
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'
        loop {
            match self.cursor.advance() {
                None => return self.finish(TokenKind::Error, start),
                Some('*') if self.cursor.eat('/') => {
                    return self.finish(TokenKind::Comment, start);
                }
                Some(_) => {}
            }
        }
    }

    // ── Regex literals ───────────────────────────────────────────────────

    /// `/body/flags`. A line break before the closing slash is an error.
    fn lex_regex(&mut self, start: u32) -> Token {
        self.cursor.advance(); // opening '/'
        let mut in_class = false;
        loop {
            match self.cursor.advance() {
                None | Some('\n') => return self.finish(TokenKind::Error, start),
                Some('\\') => {
                    self.cursor.advance();
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some(_) => {}
            }
        }
        self.cursor.eat_while(is_ident_continue);
        self.finish(TokenKind::Regex, start)
    }

    // ── Number literals ──────────────────────────────────────────────────

    /// Decimal, hex (`0x`), binary (`0b`), octal (`0o`), fractions and
    /// exponents. Numeric separators (`1_000`) are accepted.
    fn lex_number(&mut self, start: u32) -> Token {
        let first = self.cursor.advance();

        if first == Some('0') {
            match self.cursor.peek() {
                Some('x' | 'X') => {
                    self.cursor.advance();
                    self.cursor.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
                    return self.finish(TokenKind::Number, start);
                }
                Some('b' | 'B') => {
                    self.cursor.advance();
                    self.cursor.eat_while(|c| matches!(c, '0' | '1' | '_'));
                    return self.finish(TokenKind::Number, start);
                }
                Some('o' | 'O') => {
                    self.cursor.advance();
                    self.cursor.eat_while(|c| matches!(c, '0'..='7' | '_'));
                    return self.finish(TokenKind::Number, start);
                }
                _ => {}
            }
        }

        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        // `1.` is a complete number, so `1..toFixed()` calls a method on it.
        if self.cursor.peek() == Some('.') {
            self.cursor.advance();
        }
        self.eat_fraction_and_exponent();
        self.finish(TokenKind::Number, start)
    }

    /// Fraction digits then an optional exponent, after the `.` is consumed.
    fn eat_fraction_and_exponent(&mut self) {
        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            let sign_or_digit = self.cursor.peek_next();
            if sign_or_digit.is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-') {
                self.cursor.advance(); // 'e'
                self.cursor.advance(); // sign or first digit
                self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
            }
        }
    }

    // ── String literals ──────────────────────────────────────────────────

    /// A quoted string, quotes included. Unterminated strings (end of input
    /// or a raw line break) become `Error`.
    fn lex_string(&mut self, quote: char, start: u32) -> Token {
        self.cursor.advance();
        loop {
            match self.cursor.advance() {
                None | Some('\n') => return self.finish(TokenKind::Error, start),
                Some('\\') => {
                    self.cursor.advance();
                }
                Some(c) if c == quote => return self.finish(TokenKind::String, start),
                Some(_) => {}
            }
        }
    }

    /// A whole template literal, backtick to backtick, as one token.
    fn lex_template(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.scan_template_rest() {
            self.finish(TokenKind::Template, start)
        } else {
            self.finish(TokenKind::Error, start)
        }
    }

    /// Scan after an opening backtick up to and including the closing one.
    fn scan_template_rest(&mut self) -> bool {
        loop {
            match self.cursor.advance() {
                None => return false,
                Some('\\') => {
                    self.cursor.advance();
                }
                Some('`') => return true,
                Some('$') if self.cursor.eat('{') => {
                    if !self.scan_interpolation() {
                        return false;
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Scan a `${ ... }` body up to and including its closing brace,
    /// skipping over nested braces, strings and templates.
    fn scan_interpolation(&mut self) -> bool {
        let mut depth = 0u32;
        loop {
            match self.cursor.advance() {
                None => return false,
                Some('{') => depth += 1,
                Some('}') if depth == 0 => return true,
                Some('}') => depth -= 1,
                Some('`') => {
                    if !self.scan_template_rest() {
                        return false;
                    }
                }
                Some(quote @ ('"' | '\'')) => loop {
                    match self.cursor.advance() {
                        None => return false,
                        Some('\\') => {
                            self.cursor.advance();
                        }
                        Some(c) if c == quote => break,
                        Some(_) => {}
                    }
                },
                Some(_) => {}
            }
        }
    }

    // ── Identifiers and keywords ─────────────────────────────────────────

    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice(start, self.cursor.pos());

        let kind = keyword_from_str(text).unwrap_or(TokenKind::Ident);
        self.finish(kind, start)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }

        let token = self.next_token();
        match token.kind {
            TokenKind::Eof => self.emitted_eof = true,
            kind if kind.is_trivia() => {}
            kind => self.last_significant = Some(kind),
        }
        Some(token)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
