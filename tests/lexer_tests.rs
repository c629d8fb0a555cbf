// tests/lexer_tests.rs

use rust_decimal::Decimal;
use tagsql::ast::Token;
use tagsql::lexer::{LexError, Lexer};

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut result = Vec::new();
    loop {
        let token = lexer.next_token().expect("lex failure");
        let done = token == Token::Eof;
        result.push(token);
        if done {
            return result;
        }
    }
}

// ============================================================================
// Keywords and identifiers
// ============================================================================

#[test]
fn test_keywords_any_case() {
    assert_eq!(
        tokens("SELECT select SeLeCt"),
        vec![Token::Select, Token::Select, Token::Select, Token::Eof]
    );
}

#[test]
fn test_identifiers_are_case_sensitive() {
    // both are identifiers, preserved verbatim
    assert_eq!(
        tokens("Title title"),
        vec![
            Token::Identifier("Title".to_string()),
            Token::Identifier("title".to_string()),
            Token::Eof
        ]
    );
}

#[test]
fn test_quoted_identifier() {
    assert_eq!(
        tokens("\"Album Artist\""),
        vec![Token::Identifier("Album Artist".to_string()), Token::Eof]
    );
}

#[test]
fn test_bracketed_identifier() {
    assert_eq!(
        tokens("[Track Count]"),
        vec![Token::Identifier("Track Count".to_string()), Token::Eof]
    );
}

#[test]
fn test_quoted_identifier_is_not_a_keyword() {
    assert_eq!(
        tokens("\"SELECT\""),
        vec![Token::Identifier("SELECT".to_string()), Token::Eof]
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_integer_literal() {
    assert_eq!(
        tokens("1999"),
        vec![Token::Number(Decimal::from(1999)), Token::Eof]
    );
}

#[test]
fn test_decimal_literal_keeps_precision() {
    let toks = tokens("1.50");
    match &toks[0] {
        Token::Number(n) => assert_eq!(n.to_string(), "1.50"),
        other => panic!("expected number, got {:?}", other),
    }
}

#[test]
fn test_string_literal() {
    assert_eq!(
        tokens("'Legacy'"),
        vec![Token::String("Legacy".to_string()), Token::Eof]
    );
}

#[test]
fn test_string_doubled_quote() {
    assert_eq!(
        tokens("'it''s'"),
        vec![Token::String("it's".to_string()), Token::Eof]
    );
}

#[test]
fn test_empty_string() {
    assert_eq!(
        tokens("''"),
        vec![Token::String(String::new()), Token::Eof]
    );
}

// ============================================================================
// Operators and punctuation
// ============================================================================

#[test]
fn test_comparison_operators() {
    assert_eq!(
        tokens("= < > <= >= != <>"),
        vec![
            Token::Eq,
            Token::Lt,
            Token::Gt,
            Token::LtEq,
            Token::GtEq,
            Token::NotEq,
            Token::NotEq,
            Token::Eof
        ]
    );
}

#[test]
fn test_reserved_arithmetic_tokens() {
    assert_eq!(
        tokens("+ - * / % & | ^ ~"),
        vec![
            Token::Plus,
            Token::Minus,
            Token::Star,
            Token::Slash,
            Token::Percent,
            Token::Ampersand,
            Token::Pipe,
            Token::Caret,
            Token::Tilde,
            Token::Eof
        ]
    );
}

#[test]
fn test_full_statement() {
    assert_eq!(
        tokens("SELECT Title, Album WHERE Year > 2000"),
        vec![
            Token::Select,
            Token::Identifier("Title".to_string()),
            Token::Comma,
            Token::Identifier("Album".to_string()),
            Token::Where,
            Token::Identifier("Year".to_string()),
            Token::Gt,
            Token::Number(Decimal::from(2000)),
            Token::Eof
        ]
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_string() {
    let mut lexer = Lexer::new("'never closed");
    assert!(matches!(
        lexer.next_token(),
        Err(LexError::UnterminatedString { .. })
    ));
}

#[test]
fn test_unexpected_character() {
    let mut lexer = Lexer::new("?");
    assert!(matches!(
        lexer.next_token(),
        Err(LexError::UnexpectedChar { ch: '?', .. })
    ));
}

#[test]
fn test_lone_bang_is_an_error() {
    let mut lexer = Lexer::new("!");
    assert!(matches!(
        lexer.next_token(),
        Err(LexError::UnexpectedChar { ch: '!', .. })
    ));
}

#[test]
fn test_error_position_points_at_offender() {
    let mut lexer = Lexer::new("Year ?");
    lexer.next_token().unwrap();
    match lexer.next_token() {
        Err(LexError::UnexpectedChar { position, .. }) => {
            assert_eq!(position.line, 1);
            assert_eq!(position.column, 6);
        }
        other => panic!("expected lex error, got {:?}", other),
    }
}
