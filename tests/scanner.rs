use rlox::diagnostics::Diagnostics;
use rlox::scanner::{self, Scanner};
use rlox::token::{Token, TokenType};

fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
    let scanner = Scanner::new(source.as_bytes());
    let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

    assert_eq!(tokens.len(), expected.len());

    for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
        assert_eq!(actual.token_type, *expected_type);
        assert_eq!(actual.lexeme, *expected_lexeme);
    }
}

#[test]
fn symbols() {
    assert_token_sequence(
        "({*.,+*})",
        &[
            (TokenType::LEFT_PAREN, "("),
            (TokenType::LEFT_BRACE, "{"),
            (TokenType::STAR, "*"),
            (TokenType::DOT, "."),
            (TokenType::COMMA, ","),
            (TokenType::PLUS, "+"),
            (TokenType::STAR, "*"),
            (TokenType::RIGHT_BRACE, "}"),
            (TokenType::RIGHT_PAREN, ")"),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn maximal_munch_operators() {
    assert_token_sequence(
        "! != = == < <= > >=",
        &[
            (TokenType::BANG, "!"),
            (TokenType::BANG_EQUAL, "!="),
            (TokenType::EQUAL, "="),
            (TokenType::EQUAL_EQUAL, "=="),
            (TokenType::LESS, "<"),
            (TokenType::LESS_EQUAL, "<="),
            (TokenType::GREATER, ">"),
            (TokenType::GREATER_EQUAL, ">="),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn keywords_and_identifiers() {
    assert_token_sequence(
        "var language = nil; fun orchid() {}",
        &[
            (TokenType::VAR, "var"),
            (TokenType::IDENTIFIER, "language"),
            (TokenType::EQUAL, "="),
            (TokenType::NIL, "nil"),
            (TokenType::SEMICOLON, ";"),
            (TokenType::FUN, "fun"),
            // "orchid" starts with keyword "or" but must stay one identifier
            (TokenType::IDENTIFIER, "orchid"),
            (TokenType::LEFT_PAREN, "("),
            (TokenType::RIGHT_PAREN, ")"),
            (TokenType::LEFT_BRACE, "{"),
            (TokenType::RIGHT_BRACE, "}"),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn number_literals() {
    let tokens: Vec<Token> = Scanner::new(b"123 3.14 0.5".as_ref())
        .filter_map(Result::ok)
        .collect();

    let numbers: Vec<f64> = tokens
        .iter()
        .filter_map(|t| match t.token_type {
            TokenType::NUMBER(n) => Some(n),
            _ => None,
        })
        .collect();

    assert_eq!(numbers, vec![123.0, 3.14, 0.5]);
}

#[test]
fn trailing_dot_is_not_part_of_number() {
    assert_token_sequence(
        "123.",
        &[
            (TokenType::NUMBER(123.0), "123"),
            (TokenType::DOT, "."),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn string_literal_strips_quotes() {
    let tokens: Vec<Token> = Scanner::new(b"\"hello\"".as_ref())
        .filter_map(Result::ok)
        .collect();

    assert_eq!(tokens[0].token_type, TokenType::STRING(String::new()));
    match &tokens[0].token_type {
        TokenType::STRING(s) => assert_eq!(s, "hello"),
        other => panic!("expected string token, got {:?}", other),
    }
    assert_eq!(tokens[0].lexeme, "\"hello\"");
}

#[test]
fn multiline_string_counts_lines() {
    let tokens: Vec<Token> = Scanner::new(b"\"a\nb\"\nx".as_ref())
        .filter_map(Result::ok)
        .collect();

    // The identifier after the two-line string sits on line 3.
    let ident = tokens
        .iter()
        .find(|t| t.token_type == TokenType::IDENTIFIER)
        .expect("identifier token");
    assert_eq!(ident.line, 3);
}

#[test]
fn comments_and_whitespace_are_skipped() {
    assert_token_sequence(
        "1 // the rest is ignored ** }} \n+ 2",
        &[
            (TokenType::NUMBER(1.0), "1"),
            (TokenType::PLUS, "+"),
            (TokenType::NUMBER(2.0), "2"),
            (TokenType::EOF, ""),
        ],
    );
}

#[test]
fn unexpected_characters_are_reported_and_scanning_continues() {
    let mut diagnostics = Diagnostics::new();
    let tokens = scanner::scan(b",.$(#", &mut diagnostics);

    // Both bad bytes are diagnosed; the good tokens around them survive.
    assert_eq!(diagnostics.len(), 2);
    for error in diagnostics.iter() {
        assert!(error.to_string().contains("Unexpected character"));
    }

    let kinds: Vec<&str> = tokens.iter().map(|t| t.token_type.name()).collect();
    assert_eq!(kinds, vec!["COMMA", "DOT", "LEFT_PAREN", "EOF"]);
}

#[test]
fn unterminated_string_is_a_diagnostic() {
    let mut diagnostics = Diagnostics::new();
    let tokens = scanner::scan(b"\"oops", &mut diagnostics);

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics
        .iter()
        .next()
        .unwrap()
        .to_string()
        .contains("Unterminated string."));

    // Still terminated by EOF.
    assert_eq!(tokens.last().unwrap().token_type, TokenType::EOF);
}

#[test]
fn rescanning_lexemes_reproduces_token_kinds() {
    let source = "fun add(a, b) { return a + b; } // adder\nprint add(1.5, 2) >= 3;";

    let mut diagnostics = Diagnostics::new();
    let first = scanner::scan(source.as_bytes(), &mut diagnostics);
    assert!(diagnostics.is_empty());

    let joined: String = first
        .iter()
        .filter(|t| t.token_type != TokenType::EOF)
        .map(|t| t.lexeme.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let second = scanner::scan(joined.as_bytes(), &mut diagnostics);
    assert!(diagnostics.is_empty());

    let first_kinds: Vec<&str> = first.iter().map(|t| t.token_type.name()).collect();
    let second_kinds: Vec<&str> = second.iter().map(|t| t.token_type.name()).collect();
    assert_eq!(first_kinds, second_kinds);
}

#[test]
fn display_format_renders_integral_numbers_with_fraction() {
    let tokens: Vec<Token> = Scanner::new(b"3 3.25".as_ref())
        .filter_map(Result::ok)
        .collect();

    assert_eq!(tokens[0].to_string(), "NUMBER 3 3.0");
    assert_eq!(tokens[1].to_string(), "NUMBER 3.25 3.25");
}
