use crate::error::LexError;
use crate::token::{Literal, Token, TokenType};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static KEYWORDS: Lazy<HashMap<&'static str, TokenType>> = Lazy::new(|| {
    let mut keywords = HashMap::new();
    keywords.insert("and", TokenType::And);
    keywords.insert("class", TokenType::Class);
    keywords.insert("else", TokenType::Else);
    keywords.insert("false", TokenType::False);
    keywords.insert("for", TokenType::For);
    keywords.insert("fun", TokenType::Fun);
    keywords.insert("if", TokenType::If);
    keywords.insert("nil", TokenType::Nil);
    keywords.insert("or", TokenType::Or);
    keywords.insert("print", TokenType::Print);
    keywords.insert("return", TokenType::Return);
    keywords.insert("super", TokenType::Super);
    keywords.insert("this", TokenType::This);
    keywords.insert("true", TokenType::True);
    keywords.insert("var", TokenType::Var);
    keywords.insert("while", TokenType::While);
    keywords
});

/// Result of scanning a whole source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized<'a> {
    /// Every token in source order, ending with exactly one `Eof`.
    pub tokens: Vec<Token<'a>>,
    pub errors: Vec<LexError>,
}

impl Tokenized<'_> {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Scans `source` to completion, collecting tokens and lexical errors separately.
pub fn tokenize(source: &str) -> Tokenized<'_> {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for result in Scanner::new(source) {
        match result {
            Ok(token) => tokens.push(token),
            Err(error) => {
                tracing::trace!(line = error.line, %error, "lexical error");
                errors.push(error);
            }
        }
    }

    tracing::debug!(tokens = tokens.len(), errors = errors.len(), "tokenized source");

    Tokenized { tokens, errors }
}

pub struct Scanner<'a> {
    source: &'a str,
    start: usize,
    current: usize,
    line: usize,
    start_line: usize,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
            start_line: 1,
            finished: false,
        }
    }

    /// Scans the next token. Once input is exhausted every call returns `Eof`.
    pub fn scan_token(&mut self) -> Result<Token<'a>, LexError> {
        self.skip_whitespace();
        self.start = self.current;
        self.start_line = self.line;

        if self.is_at_end() {
            return Ok(Token::eof(self.line));
        }

        match self.advance() {
            b'(' => Ok(self.new_token(TokenType::LeftParen)),
            b')' => Ok(self.new_token(TokenType::RightParen)),
            b'{' => Ok(self.new_token(TokenType::LeftBrace)),
            b'}' => Ok(self.new_token(TokenType::RightBrace)),
            b',' => Ok(self.new_token(TokenType::Comma)),
            b'.' => Ok(self.new_token(TokenType::Dot)),
            b'-' => Ok(self.new_token(TokenType::Minus)),
            b'+' => Ok(self.new_token(TokenType::Plus)),
            b';' => Ok(self.new_token(TokenType::Semicolon)),
            b'*' => Ok(self.new_token(TokenType::Star)),
            b'/' => Ok(self.new_token(TokenType::Slash)),

            b'!' if self.match_byte(b'=') => Ok(self.new_token(TokenType::BangEqual)),
            b'!' => Ok(self.new_token(TokenType::Bang)),

            b'=' if self.match_byte(b'=') => Ok(self.new_token(TokenType::EqualEqual)),
            b'=' => Ok(self.new_token(TokenType::Equal)),

            b'<' if self.match_byte(b'=') => Ok(self.new_token(TokenType::LessEqual)),
            b'<' => Ok(self.new_token(TokenType::Less)),

            b'>' if self.match_byte(b'=') => Ok(self.new_token(TokenType::GreaterEqual)),
            b'>' => Ok(self.new_token(TokenType::Greater)),

            b'"' => self.string(),

            b if is_digit(b) => Ok(self.number()),

            b if is_alpha(b) => Ok(self.identifier()),

            _ => Err(self.unexpected_character()),
        }
    }

    #[inline]
    fn advance(&mut self) -> u8 {
        let b = self.source.as_bytes()[self.current];
        self.current += 1;
        b
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    #[inline]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.source.as_bytes()[self.current]
        }
    }

    #[inline]
    fn peek_next(&self) -> u8 {
        if self.current + 1 >= self.source.len() {
            0
        } else {
            self.source.as_bytes()[self.current + 1]
        }
    }

    #[inline]
    fn match_byte(&mut self, expected: u8) -> bool {
        if self.is_at_end() {
            return false;
        }
        if self.source.as_bytes()[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn new_token(&self, token_type: TokenType) -> Token<'a> {
        Token::new(token_type, &self.source[self.start..self.current], self.start_line)
    }

    fn unexpected_character(&mut self) -> LexError {
        // Report the whole scalar value and skip it as a unit so the
        // cursor never lands inside a UTF-8 sequence.
        let c = self.source[self.start..].chars().next().unwrap_or_default();
        self.current = self.start + c.len_utf8();
        LexError::unexpected_character(self.line, c)
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                b' ' | b'\r' | b'\t' => {
                    self.advance();
                }
                b'\n' => {
                    self.line += 1;
                    self.advance();
                }
                b'/' if self.peek_next() == b'/' => {
                    while self.peek() != b'\n' && !self.is_at_end() {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    fn string(&mut self) -> Result<Token<'a>, LexError> {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.peek() == b'\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            return Err(LexError::unterminated_string(self.line));
        }

        self.advance();

        let mut token = self.new_token(TokenType::String);
        token.literal = Some(Literal::Str(&self.source[self.start + 1..self.current - 1]));
        Ok(token)
    }

    fn number(&mut self) -> Token<'a> {
        while is_digit(self.peek()) {
            self.advance();
        }

        if self.peek() == b'.' && is_digit(self.peek_next()) {
            self.advance();

            while is_digit(self.peek()) {
                self.advance();
            }
        }

        let mut token = self.new_token(TokenType::Number);
        token.literal = Some(Literal::Number(normalize_number(token.lexeme)));
        token
    }

    fn identifier(&mut self) -> Token<'a> {
        while is_alphanumeric(self.peek()) {
            self.advance();
        }

        let lexeme = &self.source[self.start..self.current];
        let token_type = KEYWORDS.get(lexeme)
            .copied()
            .unwrap_or(TokenType::Identifier);

        self.new_token(token_type)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.scan_token();
        if matches!(&result, Ok(token) if token.is_eof()) {
            self.finished = true;
        }
        Some(result)
    }
}

/// Canonical text of a number literal: integers gain `.0`, fractional
/// parts lose trailing zeros but keep at least one digit.
fn normalize_number(lexeme: &str) -> String {
    match lexeme.split_once('.') {
        Some((integer, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{}.0", integer)
            } else {
                format!("{}.{}", integer, fraction)
            }
        }
        None => format!("{}.0", lexeme),
    }
}

#[inline]
fn is_alpha(c: u8) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_uppercase() || c == b'_'
}

#[inline]
fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

#[inline]
fn is_alphanumeric(c: u8) -> bool {
    is_alpha(c) || is_digit(c)
}
