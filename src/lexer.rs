use std::fmt;

use rust_decimal::Decimal;

use crate::ast::Token;

/// Line/column position inside the statement text, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors produced while tokenizing statement text.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    /// Character that starts no token
    UnexpectedChar { ch: char, position: Position },
    /// String or quoted identifier with no closing quote
    UnterminatedString { position: Position },
    /// Numeric literal that does not parse as a decimal
    InvalidNumber { text: String, position: Position },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedChar { ch, position } => {
                write!(f, "Unexpected character '{}' at {}", ch, position)
            }
            LexError::UnterminatedString { position } => {
                write!(f, "Unterminated string starting at {}", position)
            }
            LexError::InvalidNumber { text, position } => {
                write!(f, "Invalid number '{}' at {}", text, position)
            }
        }
    }
}

impl std::error::Error for LexError {}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Position of the next unconsumed character.
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if let Some('\n') = self.current_char() {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_bare_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Read a quoted run terminated by `close`, where a doubled closing
    /// quote stands for a literal one. Covers `'...'` strings and `"..."`
    /// quoted identifiers.
    fn read_quoted(&mut self, close: char) -> Result<String, LexError> {
        let start = self.position();
        let mut result = String::new();
        self.advance(); // consume opening quote

        while let Some(ch) = self.current_char() {
            if ch == close {
                if self.peek_char(1) == Some(close) {
                    result.push(close);
                    self.advance();
                    self.advance();
                } else {
                    self.advance();
                    return Ok(result);
                }
            } else {
                result.push(ch);
                self.advance();
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    /// Read a `[bracketed identifier]`. No escape for `]` - brackets nest
    /// nothing in this grammar.
    fn read_bracketed(&mut self) -> Result<String, LexError> {
        let start = self.position();
        let mut result = String::new();
        self.advance(); // consume '['

        while let Some(ch) = self.current_char() {
            if ch == ']' {
                self.advance();
                return Ok(result);
            }
            result.push(ch);
            self.advance();
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position();
        let mut number = String::new();
        let mut seen_dot = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !seen_dot
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                seen_dot = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match number.parse::<Decimal>() {
            Ok(value) => Ok(Token::Number(value)),
            Err(_) => Err(LexError::InvalidNumber {
                text: number,
                position: start,
            }),
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        match self.current_char() {
            None => Ok(Token::Eof),
            Some(',') => {
                self.advance();
                Ok(Token::Comma)
            }
            Some('(') => {
                self.advance();
                Ok(Token::LParen)
            }
            Some(')') => {
                self.advance();
                Ok(Token::RParen)
            }
            Some('=') => {
                self.advance();
                Ok(Token::Eq)
            }
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::LtEq)
                } else if self.peek_char(1) == Some('>') {
                    self.advance();
                    self.advance();
                    Ok(Token::NotEq)
                } else {
                    self.advance();
                    Ok(Token::Lt)
                }
            }
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::GtEq)
                } else {
                    self.advance();
                    Ok(Token::Gt)
                }
            }
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::NotEq)
                } else {
                    let position = self.position();
                    Err(LexError::UnexpectedChar { ch: '!', position })
                }
            }
            Some('+') => {
                self.advance();
                Ok(Token::Plus)
            }
            Some('-') => {
                self.advance();
                Ok(Token::Minus)
            }
            Some('*') => {
                self.advance();
                Ok(Token::Star)
            }
            Some('/') => {
                self.advance();
                Ok(Token::Slash)
            }
            Some('%') => {
                self.advance();
                Ok(Token::Percent)
            }
            Some('&') => {
                self.advance();
                Ok(Token::Ampersand)
            }
            Some('|') => {
                self.advance();
                Ok(Token::Pipe)
            }
            Some('^') => {
                self.advance();
                Ok(Token::Caret)
            }
            Some('~') => {
                self.advance();
                Ok(Token::Tilde)
            }
            Some('\'') => Ok(Token::String(self.read_quoted('\'')?)),
            Some('"') => Ok(Token::Identifier(self.read_quoted('"')?)),
            Some('[') => Ok(Token::Identifier(self.read_bracketed()?)),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_bare_identifier();
                match Token::keyword(&ident) {
                    Some(keyword) => Ok(keyword),
                    None => Ok(Token::Identifier(ident)),
                }
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) => {
                let position = self.position();
                Err(LexError::UnexpectedChar { ch, position })
            }
        }
    }
}

#[test]
fn test_keywords_case_insensitive() {
    let mut lexer = Lexer::new("select WHERE Update set delete and OR not like IN");
    assert_eq!(lexer.next_token().unwrap(), Token::Select);
    assert_eq!(lexer.next_token().unwrap(), Token::Where);
    assert_eq!(lexer.next_token().unwrap(), Token::Update);
    assert_eq!(lexer.next_token().unwrap(), Token::Set);
    assert_eq!(lexer.next_token().unwrap(), Token::Delete);
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(lexer.next_token().unwrap(), Token::Or);
    assert_eq!(lexer.next_token().unwrap(), Token::Not);
    assert_eq!(lexer.next_token().unwrap(), Token::Like);
    assert_eq!(lexer.next_token().unwrap(), Token::In);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_doubled_quote_escape() {
    let mut lexer = Lexer::new("'it''s'");
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::String("it's".to_string())
    );
}
