/// Byte-level source iterator for the lexer.
///
/// All positions are byte offsets into the original UTF-8 source text.
pub struct Cursor<'src> {
    source: &'src str,
    pos: u32,
    chars: std::str::Chars<'src>,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            chars: source.chars(),
        }
    }

    /// Look at the current character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Look at the character after the current one.
    pub fn peek_next(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next()
    }

    /// Consume the current character and advance the position.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8() as u32;
        Some(c)
    }

    /// Consume the current character if it equals `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Advance while the predicate holds for the current character.
    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.advance();
        }
    }

    /// Slice of the source between two byte offsets already visited by
    /// the cursor, so both lie on character boundaries.
    pub fn slice(&self, start: u32, end: u32) -> &'src str {
        self.source.get(start as usize..end as usize).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cursor_starts_at_zero() {
        let cursor = Cursor::new("xs");
        assert_eq!(cursor.pos(), 0);
        assert!(cursor.peek().is_some());
    }

    #[test]
    fn peek_next_looks_ahead() {
        let cursor = Cursor::new("=>");
        assert_eq!(cursor.peek(), Some('='));
        assert_eq!(cursor.peek_next(), Some('>'));
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn eat_only_matching() {
        let mut cursor = Cursor::new("?.");
        assert!(!cursor.eat('.'));
        assert!(cursor.eat('?'));
        assert!(cursor.eat('.'));
        assert!(cursor.peek().is_none());
    }

    #[test]
    fn advance_tracks_multibyte_utf8() {
        let mut cursor = Cursor::new("\u{00E9}a");
        assert_eq!(cursor.advance(), Some('\u{00E9}'));
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.advance(), Some('a'));
        assert_eq!(cursor.pos(), 3);
        assert_eq!(cursor.advance(), None);
    }

    #[test]
    fn eat_while_then_slice() {
        let mut cursor = Cursor::new("count42 = 1");
        cursor.eat_while(|c| c.is_alphanumeric());
        assert_eq!(cursor.pos(), 7);
        assert_eq!(cursor.slice(0, 7), "count42");
        assert_eq!(cursor.slice(0, 99), "");
    }
}
