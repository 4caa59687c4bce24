use std::str::Chars;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Names and keywords; sections are recognised by the reader
    Ident,
    Number,

    // Operators
    Plus,
    Minus,
    Colon,
    Le,
    Ge,
    Eq,

    // Special
    Newline,
    Comment,
    Eof,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: Chars<'a>,
    pos: usize,
    current: Option<char>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.chars();
        let current = chars.next();
        Self {
            source,
            chars,
            pos: 0,
            current,
        }
    }

    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current;
        self.current = self.chars.next();
        if let Some(c) = c {
            self.pos += c.len_utf8();
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.current
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn token_from(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, Span::new(start, self.pos), &self.source[start..self.pos])
    }

    fn comment(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        self.token_from(TokenKind::Comment, start)
    }

    fn number(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.advance();
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            // exponent only when followed by digits, otherwise `2e` starts a name
            let rest = &self.source[self.pos + 1..];
            let digits = rest.trim_start_matches(['+', '-']);
            if digits.starts_with(|c: char| c.is_ascii_digit()) {
                self.advance();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.advance();
                }
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }
        self.token_from(TokenKind::Number, start)
    }

    fn ident(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_name_char(c)) {
            self.advance();
        }
        self.token_from(TokenKind::Ident, start)
    }

    /// `<`, `<=`, `=<`, `>`, `>=`, `=>`, `=`
    fn relation(&mut self) -> Token {
        let start = self.pos;
        let first = self.advance();
        let second = self.peek();
        let kind = match (first, second) {
            (Some('<'), Some('=')) | (Some('='), Some('<')) => {
                self.advance();
                TokenKind::Le
            }
            (Some('>'), Some('=')) | (Some('='), Some('>')) => {
                self.advance();
                TokenKind::Ge
            }
            (Some('<'), _) => TokenKind::Le,
            (Some('>'), _) => TokenKind::Ge,
            _ => TokenKind::Eq,
        };
        self.token_from(kind, start)
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let start = self.pos;

        let Some(c) = self.peek() else {
            return Token::new(TokenKind::Eof, Span::new(start, start), "");
        };

        match c {
            '\n' => {
                self.advance();
                self.token_from(TokenKind::Newline, start)
            }
            '\\' => self.comment(),
            '+' => {
                self.advance();
                self.token_from(TokenKind::Plus, start)
            }
            '-' => {
                self.advance();
                self.token_from(TokenKind::Minus, start)
            }
            ':' => {
                self.advance();
                self.token_from(TokenKind::Colon, start)
            }
            '<' | '>' | '=' => self.relation(),
            c if c.is_ascii_digit() || c == '.' => self.number(),
            c if is_name_start(c) => self.ident(),
            _ => {
                self.advance();
                self.token_from(TokenKind::Error, start)
            }
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || "_!\"#$%&()/,;?@`'{}|~".contains(c)
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '.'
}
