use crate::error::{LoxError, ParseError, ParseErrorKind};
use crate::expr::Expr;
use crate::scanner::tokenize;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// Deepest chain of nested sub-expressions (unary operands, groupings,
/// right-hand operands) accepted before a top-level expression is abandoned.
const MAX_NESTING_DEPTH: usize = 256;

/// Scans and parses `source`. Lexical errors suppress parsing entirely.
pub fn parse_source(source: &str) -> Result<Vec<Expr<'_>>, LoxError> {
    let tokenized = tokenize(source);
    if tokenized.has_errors() {
        return Err(LoxError::Lex(tokenized.errors));
    }

    let parsed = parse(tokenized.tokens);
    if !parsed.errors.is_empty() {
        return Err(LoxError::Parse(parsed.errors));
    }

    Ok(parsed.expressions)
}

pub fn parse(tokens: Vec<Token<'_>>) -> Parsed<'_> {
    Parser::new(tokens).parse()
}

/// Every top-level expression that parsed, plus one error per failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<'a> {
    pub expressions: Vec<Expr<'a>>,
    pub errors: Vec<ParseError>,
}

type ParseResult<'a> = Result<Expr<'a>, ParseError>;

#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
enum Precedence {
    None,
    Equality,
    Comparison,
    Term,
    Factor,
    Unary,
    Primary,
}

impl Precedence {
    fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Unary,
            Precedence::Unary => Precedence::Primary,
            Precedence::Primary => Precedence::Primary,
        }
    }
}

type PrefixFn<'a> = fn(&mut Parser<'a>, Token<'a>) -> ParseResult<'a>;
type InfixFn<'a> = fn(&mut Parser<'a>, Token<'a>, Expr<'a>) -> ParseResult<'a>;

struct ParseRule<'a> {
    prefix: Option<PrefixFn<'a>>,
    infix: Option<InfixFn<'a>>,
    precedence: Precedence,
}

impl<'a> ParseRule<'a> {
    fn new(prefix: Option<PrefixFn<'a>>, infix: Option<InfixFn<'a>>, precedence: Precedence) -> Self {
        ParseRule { prefix, infix, precedence }
    }
}

pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let line = tokens.last().map_or(1, |token| token.line);
            tokens.push(Token::eof(line));
        }

        Parser { tokens, current: 0, depth: 0 }
    }

    pub fn parse(mut self) -> Parsed<'a> {
        let mut expressions = Vec::new();
        let mut errors = Vec::new();

        while !self.is_at_end() {
            let start = self.current;
            match self.expression() {
                Ok(expr) => expressions.push(expr),
                Err(error) => {
                    tracing::trace!(line = error.line, %error, "syntax error");
                    errors.push(error);
                    self.sync(start);
                }
            }
        }

        tracing::debug!(expressions = expressions.len(), errors = errors.len(), "parsed tokens");

        Parsed { expressions, errors }
    }

    fn get_rule(token_type: TokenType) -> ParseRule<'a> {
        match token_type {
            TokenType::LeftParen => ParseRule::new(Some(Self::grouping), None, Precedence::None),
            TokenType::Minus => ParseRule::new(Some(Self::unary), Some(Self::binary), Precedence::Term),
            TokenType::Plus => ParseRule::new(None, Some(Self::binary), Precedence::Term),
            TokenType::Slash => ParseRule::new(None, Some(Self::binary), Precedence::Factor),
            TokenType::Star => ParseRule::new(None, Some(Self::binary), Precedence::Factor),
            TokenType::Bang => ParseRule::new(Some(Self::unary), None, Precedence::None),
            TokenType::BangEqual => ParseRule::new(None, Some(Self::binary), Precedence::Equality),
            TokenType::EqualEqual => ParseRule::new(None, Some(Self::binary), Precedence::Equality),
            TokenType::Greater => ParseRule::new(None, Some(Self::binary), Precedence::Comparison),
            TokenType::GreaterEqual => ParseRule::new(None, Some(Self::binary), Precedence::Comparison),
            TokenType::Less => ParseRule::new(None, Some(Self::binary), Precedence::Comparison),
            TokenType::LessEqual => ParseRule::new(None, Some(Self::binary), Precedence::Comparison),
            TokenType::String
            | TokenType::Number
            | TokenType::True
            | TokenType::False
            | TokenType::Nil => ParseRule::new(Some(Self::literal), None, Precedence::None),
            _ => ParseRule::new(None, None, Precedence::None),
        }
    }

    fn expression(&mut self) -> ParseResult<'a> {
        self.parse_precedence(Precedence::Equality)
    }

    fn parse_precedence(&mut self, precedence: Precedence) -> ParseResult<'a> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::at(self.peek(), ParseErrorKind::TooDeeplyNested));
        }

        self.depth += 1;
        let result = self.parse_prefix_and_infix(precedence);
        self.depth -= 1;
        result
    }

    fn parse_prefix_and_infix(&mut self, precedence: Precedence) -> ParseResult<'a> {
        let token = self.advance();

        #[cfg(feature = "debug_trace")]
        tracing::trace!(?precedence, %token, "parse_precedence");

        let prefix = match Self::get_rule(token.token_type).prefix {
            Some(rule) => rule,
            None => return Err(ParseError::at(&token, ParseErrorKind::ExpectExpression)),
        };

        let mut expr = prefix(self, token)?;

        // The rule is looked up before the operator is consumed; every rule
        // above `Precedence::None` has an infix parser.
        loop {
            let rule = Self::get_rule(self.peek().token_type);
            let infix = match rule.infix {
                Some(infix) if precedence <= rule.precedence => infix,
                _ => break,
            };
            let operator = self.advance();
            expr = infix(self, operator, expr)?;
        }

        Ok(expr)
    }

    fn grouping(&mut self, _paren: Token<'a>) -> ParseResult<'a> {
        let inner = self.expression()?;

        if !self.check(TokenType::RightParen) {
            return Err(ParseError::at(self.peek(), ParseErrorKind::ExpectClosingParen));
        }
        self.advance();

        Ok(Expr::grouping(inner))
    }

    fn unary(&mut self, operator: Token<'a>) -> ParseResult<'a> {
        let operand = self.parse_precedence(Precedence::Unary)?;
        Ok(Expr::unary(operator, operand))
    }

    fn binary(&mut self, operator: Token<'a>, left: Expr<'a>) -> ParseResult<'a> {
        let rule = Self::get_rule(operator.token_type);
        let right = self.parse_precedence(rule.precedence.next())?;
        Ok(Expr::binary(operator, left, right))
    }

    fn literal(&mut self, token: Token<'a>) -> ParseResult<'a> {
        Value::from_token(&token)
            .map(Expr::Literal)
            .ok_or_else(|| ParseError::at(&token, ParseErrorKind::ExpectExpression))
    }

    /// Returns the token under the cursor and moves past it. The cursor
    /// never moves past the final `Eof`.
    fn advance(&mut self) -> Token<'a> {
        let token = self.tokens[self.current].clone();
        if !token.is_eof() {
            self.current += 1;
        }
        token
    }

    fn peek(&self) -> &Token<'a> {
        &self.tokens[self.current]
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.peek().token_type == token_type
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    /// Discards tokens after a failed expression that began at `start`,
    /// stopping after a `;` or before a statement keyword. Consumes at
    /// least one token.
    fn sync(&mut self, start: usize) {
        if self.current == start {
            self.advance();
        }

        while !self.is_at_end() {
            if self.tokens[self.current - 1].token_type == TokenType::Semicolon {
                break;
            }

            if self.peek().token_type.starts_statement() {
                break;
            }

            self.advance();
        }

        tracing::trace!(skipped = self.current - start, "resynchronized");
    }
}
