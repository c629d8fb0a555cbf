use rust_decimal::Decimal;

/// A runtime value produced by evaluating an expression or reading a
/// catalog property.
///
/// The set of representable shapes is closed: every coercion an operator
/// performs is an exhaustive match over these variants, and failures are
/// reported as evaluation errors rather than silently defaulted.
///
/// # Examples
///
/// ```
/// use tagsql::Value;
/// use rust_decimal::Decimal;
///
/// let number = Value::Number(Decimal::from(1999));
/// let text = Value::Text("Legacy".to_string());
/// let genres = Value::list_of_text(vec!["Rock".to_string(), "Pop".to_string()]);
/// assert_eq!(genres.type_name(), "list");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent tag field
    Null,

    /// Boolean, produced by comparison and logical operators
    Boolean(bool),

    /// Arbitrary-precision decimal number
    Number(Decimal),

    /// UTF-8 text
    Text(String),

    /// Ordered collection of values; list-valued tag fields are lists of
    /// [`Value::Text`]
    List(Vec<Value>),
}

impl Value {
    /// Wrap an ordered list of strings, the shape list-valued tag
    /// properties read and write.
    pub fn list_of_text(items: Vec<String>) -> Value {
        Value::List(items.into_iter().map(Value::Text).collect())
    }

    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::List(_) => "list",
        }
    }

    /// Printable form used for SELECT output and membership tests against
    /// delimited text. Lists join their elements with `list_separator`;
    /// absent fields print as the empty string.
    pub fn render(&self, list_separator: char) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Text(s) => s.clone(),
            Value::List(items) => {
                let parts: Vec<String> =
                    items.iter().map(|v| v.render(list_separator)).collect();
                parts.join(&list_separator.to_string())
            }
        }
    }
}
