use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Arbitrary-precision decimal number
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// ```
    Number(Decimal),

    /// String literal enclosed in single quotes
    ///
    /// A doubled quote inside the literal stands for a literal quote.
    ///
    /// # Examples
    /// ```text
    /// 'hello'
    /// 'it''s'
    /// ```
    String(String),

    /// Property identifier, bare or quoted
    ///
    /// Bare identifiers start with a letter or underscore. Quoted forms
    /// (`"abc d"` or `[abc d]`) allow arbitrary characters. Identifiers are
    /// case-sensitive; keywords are not.
    ///
    /// # Examples
    /// ```text
    /// Title
    /// "Album Artist"
    /// [Track Count]
    /// ```
    Identifier(String),

    // Keywords (matched case-insensitively)
    Select,
    Where,
    Update,
    Set,
    Delete,
    And,
    Or,
    Not,
    Like,
    In,

    // Comparison
    /// Equality / assignment (`=`)
    Eq,
    /// Inequality (`!=` or `<>`)
    NotEq,
    /// Less than
    Lt,
    /// Greater than
    Gt,
    /// Less than or equal
    LtEq,
    /// Greater than or equal
    GtEq,

    // Arithmetic and bitwise tokens.
    //
    // Reserved for a future grammar extension: the lexer produces them and
    // the parser knows their precedence slot, but no statement evaluates
    // them. `-` doubles as unary negation.
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Ampersand,
    Pipe,
    Caret,
    Tilde,

    // Delimiters
    Comma,
    LParen,
    RParen,

    /// End of statement text
    Eof,
}

impl Token {
    /// Keyword lookup for a bare identifier, case-insensitive.
    pub fn keyword(ident: &str) -> Option<Token> {
        match ident.to_ascii_uppercase().as_str() {
            "SELECT" => Some(Token::Select),
            "WHERE" => Some(Token::Where),
            "UPDATE" => Some(Token::Update),
            "SET" => Some(Token::Set),
            "DELETE" => Some(Token::Delete),
            "AND" => Some(Token::And),
            "OR" => Some(Token::Or),
            "NOT" => Some(Token::Not),
            "LIKE" => Some(Token::Like),
            "IN" => Some(Token::In),
            _ => None,
        }
    }
}
