//! Tokenizer for SCL source.
//!
//! Whitespace and comments are dropped. Keywords are lexed as identifiers;
//! the parser decides where a word is reserved.

/// Kind of a lexed token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tok {
    /// `[a-zA-Z_][a-zA-Z0-9_]*`, keywords included.
    Ident,
    /// `\d+`.
    Number,
    /// A double-quoted string with backslash escapes.
    Str,
    /// Operator or delimiter.
    Punct(&'static str),
    /// A character no rule accepts, or an unterminated string.
    Unknown,
    /// End of input.
    Eof,
}

/// A token and its byte range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) tok: Tok,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// Operators and delimiters, longest first so prefixes never win.
const PUNCTUATION: [&str; 30] = [
    "=>", "\\/", "/\\", "\\E", "\\A", "::", "==", "!=", "<=", ">=", "<", ">", "=", "#", "+",
    "-", "*", "/", "!", "~", ".", ",", ":", ";", "{", "}", "(", ")", "[", "]",
];

/// Splits `src` into tokens; the last token is always [`Tok::Eof`].
pub(crate) fn tokenize(src: &str) -> Vec<Token> {
    let mut lexer = Lexer { src, pos: 0 };
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        tokens.push(token);
        if token.tok == Tok::Eof {
            return tokens;
        }
    }
}

struct Lexer<'src> {
    src: &'src str,
    pos: usize,
}

impl Lexer<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, keep: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&keep) {
            self.bump();
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            self.eat_while(char::is_whitespace);
            if self.rest().starts_with("//") {
                self.eat_while(|c| c != '\n');
            } else if self.rest().starts_with("/*") {
                match self.rest()[2..].find("*/") {
                    Some(i) => self.pos += i + 4,
                    None => self.pos = self.src.len(),
                }
            } else {
                return;
            }
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_trivia();
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Token {
                tok: Tok::Eof,
                start,
                end: start,
            };
        };
        let tok = if c.is_ascii_alphabetic() || c == '_' {
            self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
            Tok::Ident
        } else if c.is_ascii_digit() {
            self.eat_while(|c| c.is_ascii_digit());
            Tok::Number
        } else if c == '"' {
            self.string()
        } else if let Some(p) = PUNCTUATION.into_iter().find(|p| self.rest().starts_with(p)) {
            self.pos += p.len();
            Tok::Punct(p)
        } else {
            self.bump();
            Tok::Unknown
        };
        Token {
            tok,
            start,
            end: self.pos,
        }
    }

    fn string(&mut self) -> Tok {
        self.bump();
        loop {
            match self.bump() {
                None => return Tok::Unknown,
                Some('\\') => {
                    self.bump();
                }
                Some('"') => return Tok::Str,
                Some(_) => {}
            }
        }
    }
}
