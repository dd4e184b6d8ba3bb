//! Property tests over generated sources for the scanner and parser.

use proptest::prelude::*;

use crate::parser::parse;
use crate::scanner::tokenize;
use crate::token::TokenType;

/// Fragments that scan cleanly and mix into both valid and invalid expressions.
const FRAGMENTS: &[&str] = &[
    "1", "2.50", "\"s\"", "true", "false", "nil", "foo", "+", "-", "*", "/",
    "!", "==", "!=", "<", "<=", ">", ">=", "(", ")", ";", "var", "\n", " ",
];

fn fragment_source() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..40)
        .prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn scanner_ends_with_single_eof(source in any::<String>()) {
        let tokenized = tokenize(&source);
        let eofs = tokenized.tokens.iter().filter(|t| t.token_type == TokenType::Eof).count();
        prop_assert_eq!(eofs, 1);
        prop_assert!(tokenized.tokens.last().is_some_and(|t| t.is_eof()));
    }

    #[test]
    fn scanner_lines_never_decrease(source in any::<String>()) {
        let tokenized = tokenize(&source);
        for pair in tokenized.tokens.windows(2) {
            prop_assert!(pair[0].line <= pair[1].line);
        }
    }

    #[test]
    fn scanner_is_deterministic(source in any::<String>()) {
        prop_assert_eq!(tokenize(&source), tokenize(&source));
    }

    #[test]
    fn fragments_scan_without_errors(source in fragment_source()) {
        prop_assert!(tokenize(&source).errors.is_empty());
    }

    #[test]
    fn parser_terminates_with_bounded_errors(source in fragment_source()) {
        let tokenized = tokenize(&source);
        let token_count = tokenized.tokens.len();
        let parsed = parse(tokenized.tokens);
        prop_assert!(parsed.errors.len() + parsed.expressions.len() < token_count);
    }

    #[test]
    fn parser_is_deterministic(source in fragment_source()) {
        let first = parse(tokenize(&source).tokens);
        let second = parse(tokenize(&source).tokens);
        prop_assert_eq!(first, second);
    }
}
