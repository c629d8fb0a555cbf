use std::fmt;
use std::mem;

use crate::{
    ast::{Assignment, BinOp, ColumnSpec, Expression, Statement, Token, UnOp},
    lexer::{LexError, Lexer, Position},
};

/// Errors produced while parsing statement text.
///
/// A parse never partially succeeds: the first failure aborts with the
/// position and expected-token context.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Tokenizer failure
    Lex(LexError),
    /// Token that does not fit the grammar at its position
    UnexpectedToken {
        found: Token,
        expected: &'static str,
        position: Position,
    },
    /// Arithmetic/bitwise operator that is tokenized but not part of the
    /// evaluated grammar
    ReservedOperator { found: Token, position: Position },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(e) => write!(f, "{}", e),
            ParseError::UnexpectedToken {
                found,
                expected,
                position,
            } => write!(f, "Expected {} at {}, got {:?}", expected, position, found),
            ParseError::ReservedOperator { found, position } => write!(
                f,
                "Operator {:?} at {} is reserved and cannot be evaluated",
                found, position
            ),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Lex(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError::Lex(e)
    }
}

pub struct Parser {
    lexer: Lexer,
    current: Token,
    current_position: Position,
    peeked: Option<(Token, Position)>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_position = lexer.position();
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            current_position,
            peeked: None,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        match self.peeked.take() {
            Some((token, position)) => {
                self.current = token;
                self.current_position = position;
            }
            None => {
                self.current_position = self.lexer.position();
                self.current = self.lexer.next_token()?;
            }
        }
        Ok(())
    }

    fn peek(&mut self) -> Result<&Token, ParseError> {
        if self.peeked.is_none() {
            let position = self.lexer.position();
            let token = self.lexer.next_token()?;
            self.peeked = Some((token, position));
        }
        Ok(&self.peeked.as_ref().unwrap().0)
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current) == mem::discriminant(token)
    }

    fn expect(&mut self, expected: Token, context: &'static str) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(context));
        }
        self.advance()
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            found: self.current.clone(),
            expected,
            position: self.current_position,
        }
    }

    fn identifier(&mut self, context: &'static str) -> Result<String, ParseError> {
        match mem::replace(&mut self.current, Token::Eof) {
            Token::Identifier(name) => {
                self.advance()?;
                Ok(name)
            }
            other => {
                self.current = other;
                Err(self.unexpected(context))
            }
        }
    }

    /// Parse a complete statement, requiring the whole input to be consumed.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let statement = match &self.current {
            Token::Select => self.parse_select(),
            Token::Update => self.parse_update(),
            Token::Delete => self.parse_delete(),
            _ => Err(self.unexpected("SELECT, UPDATE, or DELETE")),
        }?;
        self.expect(Token::Eof, "end of statement")?;
        Ok(statement)
    }

    fn parse_select(&mut self) -> Result<Statement, ParseError> {
        self.advance()?; // consume SELECT

        let columns = if self.check(&Token::Star) {
            self.advance()?;
            ColumnSpec::All
        } else {
            let mut names = vec![self.identifier("'*' or a column name")?];
            while self.check(&Token::Comma) {
                self.advance()?;
                names.push(self.identifier("a column name after ','")?);
            }
            ColumnSpec::Named(names)
        };

        let filter = self.parse_where_opt()?;
        Ok(Statement::Select { columns, filter })
    }

    fn parse_update(&mut self) -> Result<Statement, ParseError> {
        self.advance()?; // consume UPDATE
        self.expect(Token::Set, "SET after UPDATE")?;

        let mut assignments = vec![self.parse_assignment()?];
        while self.check(&Token::Comma) {
            self.advance()?;
            assignments.push(self.parse_assignment()?);
        }

        let filter = self.parse_where_opt()?;
        Ok(Statement::Update {
            assignments,
            filter,
        })
    }

    fn parse_assignment(&mut self) -> Result<Assignment, ParseError> {
        let property = self.identifier("a property name")?;
        self.expect(Token::Eq, "'=' after property name")?;
        let value = self.parse_expression()?;
        Ok(Assignment { property, value })
    }

    fn parse_delete(&mut self) -> Result<Statement, ParseError> {
        self.advance()?; // consume DELETE
        let filter = self.parse_where_opt()?;
        Ok(Statement::Delete { filter })
    }

    fn parse_where_opt(&mut self) -> Result<Option<Expression>, ParseError> {
        if self.check(&Token::Where) {
            self.advance()?;
            Ok(Some(self.parse_expression()?))
        } else {
            Ok(None)
        }
    }

    /// Parse an expression. Precedence, highest to lowest:
    /// comparison/LIKE/IN, NOT, AND, OR; binary operators left-associate.
    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_and()?;
        while self.check(&Token::Or) {
            self.advance()?;
            let right = self.parse_and()?;
            left = Expression::binary(BinOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_not()?;
        while self.check(&Token::And) {
            self.advance()?;
            let right = self.parse_not()?;
            left = Expression::binary(BinOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expression, ParseError> {
        if self.check(&Token::Not) {
            self.advance()?;
            let operand = self.parse_not()?;
            Ok(Expression::unary(UnOp::Not, operand))
        } else {
            self.parse_comparison()
        }
    }

    fn parse_comparison(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match &self.current {
                Token::Eq => BinOp::Eq,
                Token::NotEq => BinOp::Ne,
                Token::Lt => BinOp::Lt,
                Token::Gt => BinOp::Gt,
                Token::LtEq => BinOp::Le,
                Token::GtEq => BinOp::Ge,
                Token::Like => BinOp::Like,
                Token::In => BinOp::In,
                // `NOT` in operator position is only valid as NOT LIKE / NOT IN
                Token::Not => match self.peek()? {
                    Token::Like => BinOp::NotLike,
                    Token::In => BinOp::NotIn,
                    _ => return Err(self.unexpected("LIKE or IN after NOT")),
                },
                Token::Plus
                | Token::Minus
                | Token::Star
                | Token::Slash
                | Token::Percent
                | Token::Ampersand
                | Token::Pipe
                | Token::Caret => {
                    return Err(ParseError::ReservedOperator {
                        found: self.current.clone(),
                        position: self.current_position,
                    })
                }
                _ => break,
            };

            self.advance()?;
            if matches!(op, BinOp::NotLike | BinOp::NotIn) {
                self.advance()?; // consume the LIKE / IN after NOT
            }

            let right = self.parse_unary()?;
            left = Expression::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        match &self.current {
            Token::Minus => {
                self.advance()?;
                let operand = self.parse_unary()?;
                Ok(Expression::unary(UnOp::Negate, operand))
            }
            Token::Plus | Token::Tilde => Err(ParseError::ReservedOperator {
                found: self.current.clone(),
                position: self.current_position,
            }),
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        match mem::replace(&mut self.current, Token::Eof) {
            Token::Identifier(name) => {
                self.advance()?;
                Ok(Expression::Property(name))
            }
            Token::Number(n) => {
                self.advance()?;
                Ok(Expression::Number(n))
            }
            Token::String(s) => {
                self.advance()?;
                Ok(Expression::Text(s))
            }
            Token::LParen => {
                self.advance()?;
                let first = self.parse_expression()?;
                if self.check(&Token::Comma) {
                    let mut items = vec![first];
                    while self.check(&Token::Comma) {
                        self.advance()?;
                        items.push(self.parse_expression()?);
                    }
                    self.expect(Token::RParen, "')' to close the list")?;
                    Ok(Expression::Tuple(items))
                } else {
                    self.expect(Token::RParen, "')'")?;
                    Ok(first)
                }
            }
            token => {
                self.current = token;
                Err(self.unexpected("a property, literal, or '('"))
            }
        }
    }
}

/// Convenience wrapper: lex and parse one statement.
pub fn parse(statement: &str) -> Result<Statement, ParseError> {
    Parser::new(Lexer::new(statement))?.parse_statement()
}
