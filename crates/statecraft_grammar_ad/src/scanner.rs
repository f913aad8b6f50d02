//! Character-level scanning for activity diagrams.
//!
//! PlantUML is lexed in context: the same characters are a keyword at the
//! start of a statement and plain text inside an action. The scanner only
//! moves a cursor; the parser decides what a run of characters means.

/// Cursor over the source text.
#[derive(Clone, Copy)]
pub(crate) struct Scanner<'src> {
    src: &'src str,
    pos: usize,
}

impl<'src> Scanner<'src> {
    pub(crate) fn new(src: &'src str) -> Self {
        Self { src, pos: 0 }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn rest(&self) -> &'src str {
        &self.src[self.pos..]
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advances past `n` bytes; callers only pass lengths of matched ASCII.
    pub(crate) fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    /// Moves the cursor back to an earlier position.
    pub(crate) fn rewind(&mut self, pos: usize) {
        self.pos = pos.min(self.pos);
    }

    /// Skips all whitespace, newlines included.
    pub(crate) fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Skips whitespace other than `\n`, staying on the current line.
    pub(crate) fn skip_inline_ws(&mut self) {
        while self.peek().is_some_and(is_inline_ws) {
            self.bump();
        }
    }

    /// Skips whitespace, newlines and PlantUML comments.
    pub(crate) fn skip_trivia(&mut self) {
        loop {
            self.skip_whitespace();
            if self.rest().starts_with("/'") {
                match self.rest()[2..].find("'/") {
                    Some(i) => self.advance(i + 4),
                    None => self.pos = self.src.len(),
                }
            } else if self.peek() == Some('\'') {
                self.skip_to_line_end();
            } else {
                break;
            }
        }
    }

    /// Moves to the next `\n` (not consumed) or the end of input.
    pub(crate) fn skip_to_line_end(&mut self) {
        match self.rest().find('\n') {
            Some(i) => self.advance(i),
            None => self.pos = self.src.len(),
        }
    }

    /// True if only spaces remain before the next newline.
    pub(crate) fn at_line_end(&self) -> bool {
        self.rest()
            .chars()
            .find(|&c| !is_inline_ws(c))
            .is_none_or(|c| c == '\n')
    }

    /// True if nothing but indentation precedes the cursor on its line.
    pub(crate) fn at_line_start(&self) -> bool {
        self.src[..self.pos]
            .chars()
            .rev()
            .find(|&c| !is_inline_ws(c))
            .is_none_or(|c| c == '\n')
    }

    pub(crate) fn peek_str(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// True if the input continues with `word` followed by a word boundary.
    pub(crate) fn peek_keyword(&self, word: &str) -> bool {
        self.rest().starts_with(word)
            && !self.rest()[word.len()..]
                .chars()
                .next()
                .is_some_and(is_word_char)
    }

    /// True if the input continues with `first`, inline space, then `second`.
    pub(crate) fn peek_keyword_pair(&self, first: &str, second: &str) -> bool {
        if !self.peek_keyword(first) {
            return false;
        }
        let after = &self.rest()[first.len()..];
        let trimmed = after.trim_start_matches([' ', '\t']);
        trimmed.len() < after.len()
            && trimmed.starts_with(second)
            && !trimmed[second.len()..].chars().next().is_some_and(is_word_char)
    }

    /// Consumes characters while `keep` holds; returns the consumed range.
    pub(crate) fn eat_while(&mut self, keep: impl Fn(char) -> bool) -> (usize, usize) {
        let start = self.pos;
        while self.peek().is_some_and(&keep) {
            self.bump();
        }
        (start, self.pos)
    }
}

fn is_inline_ws(c: char) -> bool {
    c.is_whitespace() && c != '\n'
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub(crate) fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
