//! SQL tokens - the atomic units of SQL output.
//!
//! Tokens serialize to SQLite syntax; identifier and string quoting lives
//! here so the builders never concatenate unescaped text.

/// Quote an identifier with double quotes, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a string literal with single quotes, doubling embedded quotes.
pub fn quote_str(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// SQL token - every element the builders can emit.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    And,
    Or,
    Not,
    As,
    GroupBy,
    Having,
    OrderBy,
    Asc,
    Desc,
    Limit,
    Offset,
    In,
    Between,
    Like,
    IsNull,
    IsNotNull,
    Distinct,
    Null,

    // === DDL Keywords ===
    Create,
    Drop,
    Table,
    If,
    Exists,
    Primary,
    Key,
    Unique,
    Default,
    Autoincrement,

    // === DML Keywords ===
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    Returning,
    On,
    Conflict,
    Do,
    Nothing,

    // === Punctuation ===
    Comma,
    Dot,
    Star,
    LParen,
    RParen,

    // === Operators ===
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Concat,

    // === Whitespace ===
    Space,

    // === Dynamic Content ===
    /// Identifier (table, column, alias)
    Ident(String),
    /// Integer literal
    LitInt(i64),
    /// Float literal
    LitFloat(f64),
    /// String literal
    LitString(String),
    /// Boolean literal (SQLite stores booleans as 1/0)
    LitBool(bool),
    /// NULL literal
    LitNull,
    /// Function name, rendered uppercase
    FunctionName(String),

    // === Escape Hatch ===
    /// Raw SQL passed directly to output without escaping.
    ///
    /// **Never pass user input to this variant.** Raw SQL is not sanitized
    /// and can lead to SQL injection. For user-provided values, use the
    /// literal variants, which escape properly.
    Raw(String),
}

impl Token {
    /// Serialize this token to SQLite syntax.
    pub fn serialize(&self) -> String {
        match self {
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::Or => "OR".into(),
            Token::Not => "NOT".into(),
            Token::As => "AS".into(),
            Token::GroupBy => "GROUP BY".into(),
            Token::Having => "HAVING".into(),
            Token::OrderBy => "ORDER BY".into(),
            Token::Asc => "ASC".into(),
            Token::Desc => "DESC".into(),
            Token::Limit => "LIMIT".into(),
            Token::Offset => "OFFSET".into(),
            Token::In => "IN".into(),
            Token::Between => "BETWEEN".into(),
            Token::Like => "LIKE".into(),
            Token::IsNull => "IS NULL".into(),
            Token::IsNotNull => "IS NOT NULL".into(),
            Token::Distinct => "DISTINCT".into(),
            Token::Null => "NULL".into(),

            Token::Create => "CREATE".into(),
            Token::Drop => "DROP".into(),
            Token::Table => "TABLE".into(),
            Token::If => "IF".into(),
            Token::Exists => "EXISTS".into(),
            Token::Primary => "PRIMARY".into(),
            Token::Key => "KEY".into(),
            Token::Unique => "UNIQUE".into(),
            Token::Default => "DEFAULT".into(),
            Token::Autoincrement => "AUTOINCREMENT".into(),

            Token::Insert => "INSERT".into(),
            Token::Into => "INTO".into(),
            Token::Values => "VALUES".into(),
            Token::Update => "UPDATE".into(),
            Token::Set => "SET".into(),
            Token::Delete => "DELETE".into(),
            Token::Returning => "RETURNING".into(),
            Token::On => "ON".into(),
            Token::Conflict => "CONFLICT".into(),
            Token::Do => "DO".into(),
            Token::Nothing => "NOTHING".into(),

            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::Star => "*".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            Token::Eq => "=".into(),
            Token::Ne => "<>".into(),
            Token::Lt => "<".into(),
            Token::Gt => ">".into(),
            Token::Lte => "<=".into(),
            Token::Gte => ">=".into(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Mul => "*".into(),
            Token::Div => "/".into(),
            Token::Mod => "%".into(),
            Token::Concat => "||".into(),

            Token::Space => " ".into(),

            Token::Ident(name) => quote_ident(name),
            Token::LitInt(n) => n.to_string(),
            Token::LitFloat(f) => {
                if f.is_nan() {
                    panic!("Cannot serialize NaN to SQL")
                }
                if f.is_infinite() {
                    panic!("Cannot serialize Infinity to SQL")
                }
                let mut buffer = ryu::Buffer::new();
                buffer.format(*f).to_string()
            }
            Token::LitString(s) => quote_str(s),
            Token::LitBool(b) => if *b { "1" } else { "0" }.into(),
            Token::LitNull => "NULL".into(),
            Token::FunctionName(name) => name.to_uppercase(),

            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self) -> String {
        self.tokens.iter().map(|t| t.serialize()).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_serialize() {
        assert_eq!(Token::Select.serialize(), "SELECT");
        assert_eq!(Token::GroupBy.serialize(), "GROUP BY");
        assert_eq!(Token::IsNotNull.serialize(), "IS NOT NULL");
    }

    #[test]
    fn test_ident_quoting() {
        assert_eq!(Token::Ident("users".into()).serialize(), "\"users\"");
        assert_eq!(Token::Ident("we\"ird".into()).serialize(), "\"we\"\"ird\"");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(
            Token::LitString("John Doe".into()).serialize(),
            "'John Doe'"
        );
        assert_eq!(Token::LitString("O'Brien".into()).serialize(), "'O''Brien'");
    }

    #[test]
    fn test_bool_renders_numeric() {
        assert_eq!(Token::LitBool(true).serialize(), "1");
        assert_eq!(Token::LitBool(false).serialize(), "0");
    }

    #[test]
    fn test_float_serialize() {
        assert_eq!(Token::LitFloat(3.14).serialize(), "3.14");
        assert_eq!(Token::LitFloat(1.0).serialize(), "1.0");
        assert_eq!(Token::LitFloat(-42.5).serialize(), "-42.5");
    }

    #[test]
    #[should_panic(expected = "Cannot serialize NaN")]
    fn test_float_nan_panics() {
        Token::LitFloat(f64::NAN).serialize();
    }

    #[test]
    #[should_panic(expected = "Cannot serialize Infinity")]
    fn test_float_infinity_panics() {
        Token::LitFloat(f64::INFINITY).serialize();
    }

    #[test]
    fn test_token_stream() {
        let mut ts = TokenStream::new();
        ts.push(Token::Select)
            .space()
            .push(Token::Ident("name".into()))
            .space()
            .push(Token::From)
            .space()
            .push(Token::Ident("users".into()));

        assert_eq!(ts.serialize(), "SELECT \"name\" FROM \"users\"");
    }
}
