use std::fmt;
use crate::token::{Literal, Token, TokenType};

/// Payload of a literal expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<'a> {
    Bool(bool),
    Nil,
    Str(&'a str),
    /// Normalized decimal text as produced by the scanner.
    Number(String),
}

impl<'a> Value<'a> {
    /// Literal value carried by `token`, if it is one of the literal kinds.
    pub fn from_token(token: &Token<'a>) -> Option<Self> {
        match (token.token_type, &token.literal) {
            (TokenType::True, _) => Some(Value::Bool(true)),
            (TokenType::False, _) => Some(Value::Bool(false)),
            (TokenType::Nil, _) => Some(Value::Nil),
            (TokenType::String, Some(Literal::Str(s))) => Some(Value::Str(*s)),
            (TokenType::Number, Some(Literal::Number(n))) => Some(Value::Number(n.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "nil"),
            Value::Str(s) => write!(f, "{}", s),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::tokenize;

    #[test]
    fn test_keyword_literals() {
        let tokens = tokenize("true false nil").tokens;
        let values: Vec<_> = tokens.iter().filter_map(Value::from_token).collect();
        assert_eq!(values, vec![Value::Bool(true), Value::Bool(false), Value::Nil]);
        assert_eq!(values.iter().map(|v| v.to_string()).collect::<Vec<_>>(), ["true", "false", "nil"]);
    }

    #[test]
    fn test_string_and_number_literals() {
        let tokens = tokenize("\"hi there\" 2.50").tokens;
        assert_eq!(Value::from_token(&tokens[0]), Some(Value::Str("hi there")));
        assert_eq!(Value::from_token(&tokens[1]).map(|v| v.to_string()), Some("2.5".to_string()));
    }

    #[test]
    fn test_non_literal_tokens() {
        let tokens = tokenize("foo + (").tokens;
        assert!(tokens.iter().all(|t| Value::from_token(t).is_none()));
    }
}
