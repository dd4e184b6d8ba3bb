use std::fmt;
use crate::token::Token;
use crate::value::Value;

/// Expression tree. Each node owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr<'a> {
    Literal(Value<'a>),
    Unary {
        operator: Token<'a>,
        operand: Box<Expr<'a>>,
    },
    Binary {
        operator: Token<'a>,
        left: Box<Expr<'a>>,
        right: Box<Expr<'a>>,
    },
    Grouping(Box<Expr<'a>>),
}

impl<'a> Expr<'a> {
    pub fn unary(operator: Token<'a>, operand: Expr<'a>) -> Self {
        Expr::Unary { operator, operand: Box::new(operand) }
    }

    pub fn binary(operator: Token<'a>, left: Expr<'a>, right: Expr<'a>) -> Self {
        Expr::Binary { operator, left: Box::new(left), right: Box::new(right) }
    }

    pub fn grouping(inner: Expr<'a>) -> Self {
        Expr::Grouping(Box::new(inner))
    }
}

/// Renders the S-expression form, e.g. `(+ 1.0 (group (- 2.0)))`.
impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Unary { operator, operand } => write!(f, "({} {})", operator.lexeme, operand),
            Expr::Binary { operator, left, right } => {
                write!(f, "({} {} {})", operator.lexeme, left, right)
            }
            Expr::Grouping(inner) => write!(f, "(group {})", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn number(text: &str) -> Expr<'static> {
        Expr::Literal(Value::Number(text.to_string()))
    }

    #[test]
    fn test_literal_rendering() {
        assert_eq!(number("1.0").to_string(), "1.0");
        assert_eq!(Expr::Literal(Value::Str("hello")).to_string(), "hello");
        assert_eq!(Expr::Literal(Value::Nil).to_string(), "nil");
    }

    #[test]
    fn test_nested_rendering() {
        let minus = Token::new(TokenType::Minus, "-", 1);
        let star = Token::new(TokenType::Star, "*", 1);
        let expr = Expr::binary(
            star,
            Expr::unary(minus, number("123.0")),
            Expr::grouping(number("45.67")),
        );
        assert_eq!(expr.to_string(), "(* (- 123.0) (group 45.67))");
    }
}
