//! Front end for a small Lox-style expression language: a scanner that turns
//! source text into tokens and a precedence-climbing parser that builds
//! expression trees. Both stages collect every error they find instead of
//! stopping at the first one.

pub mod error;
pub mod expr;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

#[cfg(test)]
mod property_tests;

pub use error::{LexError, LoxError, ParseError};
pub use expr::Expr;
pub use parser::{parse, parse_source, Parsed, Parser};
pub use scanner::{tokenize, Scanner, Tokenized};
pub use token::{Token, TokenType};
