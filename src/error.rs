use std::io;
use std::path::PathBuf;

use crate::token::Token;

/// Problem found while scanning. Scanning continues past it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("[line {line}] Error: {kind}")]
pub struct LexError {
    pub line: usize,
    pub kind: LexErrorKind,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Unexpected character: {0}")]
    UnexpectedCharacter(char),
}

impl LexError {
    pub fn unterminated_string(line: usize) -> Self {
        LexError { line, kind: LexErrorKind::UnterminatedString }
    }

    pub fn unexpected_character(line: usize, c: char) -> Self {
        LexError { line, kind: LexErrorKind::UnexpectedCharacter(c) }
    }
}

/// A grammar rule that failed at a token. Aborts only the enclosing
/// top-level expression.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("[line {line}] Error at '{lexeme}': {kind}")]
pub struct ParseError {
    pub line: usize,
    /// Lexeme of the offending token; empty at end of input.
    pub lexeme: String,
    pub kind: ParseErrorKind,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("Expect expression")]
    ExpectExpression,
    #[error("Expect ')' after expression.")]
    ExpectClosingParen,
    #[error("Expression nests too deeply.")]
    TooDeeplyNested,
}

impl ParseError {
    pub fn at(token: &Token<'_>, kind: ParseErrorKind) -> Self {
        ParseError {
            line: token.line,
            lexeme: token.lexeme.to_string(),
            kind,
        }
    }

    /// The message without the line prefix, e.g. `Error at ')': Expect expression`.
    pub fn message(&self) -> String {
        format!("Error at '{}': {}", self.lexeme, self.kind)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoxError {
    #[error("Error reading file {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} lexical error(s)", .0.len())]
    Lex(Vec<LexError>),
    #[error("{} syntax error(s)", .0.len())]
    Parse(Vec<ParseError>),
}

impl LoxError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            LoxError::Io { .. } => 1,
            LoxError::Lex(_) | LoxError::Parse(_) => 65,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    #[test]
    fn test_lex_error_display() {
        assert_eq!(
            LexError::unexpected_character(3, '@').to_string(),
            "[line 3] Error: Unexpected character: @"
        );
        assert_eq!(
            LexError::unterminated_string(1).to_string(),
            "[line 1] Error: Unterminated string."
        );
    }

    #[test]
    fn test_parse_error_message() {
        let token = Token::new(TokenType::RightParen, ")", 2);
        let error = ParseError::at(&token, ParseErrorKind::ExpectExpression);
        assert_eq!(error.message(), "Error at ')': Expect expression");
        assert_eq!(error.to_string(), "[line 2] Error at ')': Expect expression");
    }

    #[test]
    fn test_parse_error_at_end() {
        let error = ParseError::at(&Token::eof(4), ParseErrorKind::ExpectClosingParen);
        assert_eq!(error.lexeme, "");
        assert_eq!(error.message(), "Error at '': Expect ')' after expression.");
        assert_eq!(error.to_string(), "[line 4] Error at '': Expect ')' after expression.");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(LoxError::Lex(vec![]).exit_code(), 65);
        assert_eq!(LoxError::Parse(vec![]).exit_code(), 65);
        let io = LoxError::Io {
            path: PathBuf::from("missing.lox"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(io.exit_code(), 1);
    }
}
