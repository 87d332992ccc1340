//! Expression AST - the core of SQL expression building.
//!
//! A strongly-typed AST for SQLite expressions with exhaustive pattern
//! matching enforced by the compiler.

use serde_json::Value;

use super::token::{Token, TokenStream};

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled in `to_tokens()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference: optional_table.column
    Column {
        table: Option<String>,
        column: String,
    },

    /// Literal values
    Literal(Literal),

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// Unary operation: op expr
    UnaryOp { op: UnaryOperator, expr: Box<Expr> },

    /// Function call: name(args...)
    Function {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
    },

    /// IN: expr IN (values...)
    In {
        expr: Box<Expr>,
        values: Vec<Expr>,
        negated: bool,
    },

    /// BETWEEN: expr BETWEEN low AND high
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },

    /// IS NULL / IS NOT NULL
    IsNull { expr: Box<Expr>, negated: bool },

    /// Wildcard: * or table.*
    Star { table: Option<String> },

    /// Parenthesized expression
    Paren(Box<Expr>),

    /// Raw SQL expression passed directly to output without escaping.
    ///
    /// **Never pass user input to this variant.** For user-provided values,
    /// use `Expr::Literal`, which escapes content properly.
    Raw(String),
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    // Logical
    And,
    Or,
    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    // String
    Concat,
    Like,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
}

impl Expr {
    /// Convert to a token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { table, column } => {
                if let Some(table) = table {
                    ts.push(Token::Ident(table.clone())).push(Token::Dot);
                }
                ts.push(Token::Ident(column.clone()));
            }

            Expr::Literal(lit) => {
                ts.push(lit.to_token());
            }

            Expr::BinaryOp { left, op, right } => {
                ts.append(&left.to_tokens())
                    .space()
                    .push(op.to_token())
                    .space()
                    .append(&right.to_tokens());
            }

            Expr::UnaryOp { op, expr } => match op {
                UnaryOperator::Not => {
                    ts.push(Token::Not).space().append(&expr.to_tokens());
                }
                UnaryOperator::Minus => {
                    ts.push(Token::Minus).append(&expr.to_tokens());
                }
            },

            Expr::Function {
                name,
                args,
                distinct,
            } => {
                ts.push(Token::FunctionName(name.clone())).lparen();
                if *distinct {
                    ts.push(Token::Distinct).space();
                }
                if args.is_empty() && name.eq_ignore_ascii_case("count") {
                    ts.push(Token::Star);
                } else {
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            ts.comma().space();
                        }
                        ts.append(&arg.to_tokens());
                    }
                }
                ts.rparen();
            }

            Expr::In {
                expr,
                values,
                negated,
            } => {
                ts.append(&expr.to_tokens()).space();
                if *negated {
                    ts.push(Token::Not).space();
                }
                ts.push(Token::In).space().lparen();
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&value.to_tokens());
                }
                ts.rparen();
            }

            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                ts.append(&expr.to_tokens()).space();
                if *negated {
                    ts.push(Token::Not).space();
                }
                ts.push(Token::Between)
                    .space()
                    .append(&low.to_tokens())
                    .space()
                    .push(Token::And)
                    .space()
                    .append(&high.to_tokens());
            }

            Expr::IsNull { expr, negated } => {
                ts.append(&expr.to_tokens()).space();
                if *negated {
                    ts.push(Token::IsNotNull);
                } else {
                    ts.push(Token::IsNull);
                }
            }

            Expr::Star { table } => {
                if let Some(table) = table {
                    ts.push(Token::Ident(table.clone())).push(Token::Dot);
                }
                ts.push(Token::Star);
            }

            Expr::Paren(inner) => {
                ts.lparen().append(&inner.to_tokens()).rparen();
            }

            Expr::Raw(sql) => {
                ts.push(Token::Raw(sql.clone()));
            }
        }

        ts
    }

    /// Serialize to a SQL fragment.
    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Wrap in parentheses.
    pub fn paren(self) -> Expr {
        Expr::Paren(Box::new(self))
    }
}

impl Literal {
    fn to_token(&self) -> Token {
        match self {
            Literal::Int(n) => Token::LitInt(*n),
            Literal::Float(f) => Token::LitFloat(*f),
            Literal::String(s) => Token::LitString(s.clone()),
            Literal::Bool(b) => Token::LitBool(*b),
            Literal::Null => Token::LitNull,
        }
    }
}

impl BinaryOperator {
    fn to_token(self) -> Token {
        match self {
            BinaryOperator::Eq => Token::Eq,
            BinaryOperator::Ne => Token::Ne,
            BinaryOperator::Lt => Token::Lt,
            BinaryOperator::Gt => Token::Gt,
            BinaryOperator::Lte => Token::Lte,
            BinaryOperator::Gte => Token::Gte,
            BinaryOperator::And => Token::And,
            BinaryOperator::Or => Token::Or,
            BinaryOperator::Plus => Token::Plus,
            BinaryOperator::Minus => Token::Minus,
            BinaryOperator::Mul => Token::Mul,
            BinaryOperator::Div => Token::Div,
            BinaryOperator::Mod => Token::Mod,
            BinaryOperator::Concat => Token::Concat,
            BinaryOperator::Like => Token::Like,
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// Column reference.
pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.to_string(),
    }
}

/// Table-qualified column reference.
pub fn table_col(table: &str, name: &str) -> Expr {
    Expr::Column {
        table: Some(table.to_string()),
        column: name.to_string(),
    }
}

/// Wildcard.
pub fn star() -> Expr {
    Expr::Star { table: None }
}

/// Integer literal.
pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

/// Float literal.
pub fn lit_float(f: f64) -> Expr {
    Expr::Literal(Literal::Float(f))
}

/// String literal.
pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.to_string()))
}

/// Boolean literal.
pub fn lit_bool(b: bool) -> Expr {
    Expr::Literal(Literal::Bool(b))
}

/// NULL literal.
pub fn lit_null() -> Expr {
    Expr::Literal(Literal::Null)
}

/// Literal from a JSON value.
///
/// Scalars map to the matching SQL literal; nested arrays and objects are
/// stored as their JSON text, which is how SQLite keeps JSON columns.
pub fn lit_json(value: &Value) -> Expr {
    match value {
        Value::Null => lit_null(),
        Value::Bool(b) => lit_bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                lit_int(i)
            } else {
                lit_float(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => lit_str(s),
        Value::Array(_) | Value::Object(_) => Expr::Literal(Literal::String(value.to_string())),
    }
}

/// Function call.
pub fn func(name: &str, args: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Function {
        name: name.to_string(),
        args: args.into_iter().collect(),
        distinct: false,
    }
}

/// COUNT(*)
pub fn count_star() -> Expr {
    Expr::Function {
        name: "count".to_string(),
        args: vec![],
        distinct: false,
    }
}

/// COUNT(expr)
pub fn count(expr: Expr) -> Expr {
    func("count", [expr])
}

/// SUM(expr)
pub fn sum(expr: Expr) -> Expr {
    func("sum", [expr])
}

/// AVG(expr)
pub fn avg(expr: Expr) -> Expr {
    func("avg", [expr])
}

/// MIN(expr)
pub fn min(expr: Expr) -> Expr {
    func("min", [expr])
}

/// MAX(expr)
pub fn max(expr: Expr) -> Expr {
    func("max", [expr])
}

/// COALESCE(exprs...)
pub fn coalesce(exprs: impl IntoIterator<Item = Expr>) -> Expr {
    func("coalesce", exprs)
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<f64> for Expr {
    fn from(f: f64) -> Self {
        lit_float(f)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(Literal::String(s))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        lit_bool(b)
    }
}

// =============================================================================
// Combinators
// =============================================================================

/// Fluent combinators for building expressions.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    // Comparison operators
    fn eq(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Eq, other.into())
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Ne, other.into())
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gt, other.into())
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gte, other.into())
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lt, other.into())
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lte, other.into())
    }

    // Logical operators
    fn and(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::And, other.into())
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Or, other.into())
    }

    fn not(self) -> Expr {
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(self.into_expr()),
        }
    }

    // Arithmetic operators
    fn add(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Plus, other.into())
    }

    fn sub(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Minus, other.into())
    }

    fn mul(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Mul, other.into())
    }

    fn div(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Div, other.into())
    }

    // String operators
    fn like(self, pattern: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Like, pattern.into())
    }

    fn concat(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Concat, other.into())
    }

    // Predicates
    fn in_list(self, values: impl IntoIterator<Item = impl Into<Expr>>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values: values.into_iter().map(|v| v.into()).collect(),
            negated: false,
        }
    }

    fn not_in_list(self, values: impl IntoIterator<Item = impl Into<Expr>>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values: values.into_iter().map(|v| v.into()).collect(),
            negated: true,
        }
    }

    fn between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Expr {
        Expr::Between {
            expr: Box::new(self.into_expr()),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: false,
        }
    }

    fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: false,
        }
    }

    fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: true,
        }
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column() {
        assert_eq!(col("name").to_sql(), "\"name\"");
        assert_eq!(table_col("users", "name").to_sql(), "\"users\".\"name\"");
    }

    #[test]
    fn test_literals() {
        assert_eq!(lit_int(42).to_sql(), "42");
        assert_eq!(lit_str("O'Brien").to_sql(), "'O''Brien'");
        assert_eq!(lit_bool(true).to_sql(), "1");
        assert_eq!(lit_null().to_sql(), "NULL");
        assert_eq!(lit_float(2.5).to_sql(), "2.5");
    }

    #[test]
    fn test_lit_json() {
        use serde_json::json;
        assert_eq!(lit_json(&json!(1)).to_sql(), "1");
        assert_eq!(lit_json(&json!("x")).to_sql(), "'x'");
        assert_eq!(lit_json(&json!(null)).to_sql(), "NULL");
        assert_eq!(lit_json(&json!(true)).to_sql(), "1");
        assert_eq!(lit_json(&json!([1, 2])).to_sql(), "'[1,2]'");
    }

    #[test]
    fn test_comparison() {
        assert_eq!(col("id").eq(lit_int(1)).to_sql(), "\"id\" = 1");
        assert_eq!(col("age").gte(18).to_sql(), "\"age\" >= 18");
        assert_eq!(col("name").ne("x").to_sql(), "\"name\" <> 'x'");
    }

    #[test]
    fn test_logical_chain() {
        let expr = col("a").eq(1).and(col("b").gt(2));
        assert_eq!(expr.to_sql(), "\"a\" = 1 AND \"b\" > 2");
    }

    #[test]
    fn test_paren() {
        let expr = col("a").eq(1).or(col("b").eq(2)).paren().and(col("c").eq(3));
        assert_eq!(expr.to_sql(), "(\"a\" = 1 OR \"b\" = 2) AND \"c\" = 3");
    }

    #[test]
    fn test_predicates() {
        assert_eq!(
            col("id").in_list([1i64, 2, 3]).to_sql(),
            "\"id\" IN (1, 2, 3)"
        );
        assert_eq!(
            col("id").not_in_list([1i64]).to_sql(),
            "\"id\" NOT IN (1)"
        );
        assert_eq!(
            col("age").between(18, 65).to_sql(),
            "\"age\" BETWEEN 18 AND 65"
        );
        assert_eq!(col("email").is_null().to_sql(), "\"email\" IS NULL");
        assert_eq!(col("email").is_not_null().to_sql(), "\"email\" IS NOT NULL");
    }

    #[test]
    fn test_like() {
        assert_eq!(
            col("name").like("John%").to_sql(),
            "\"name\" LIKE 'John%'"
        );
    }

    #[test]
    fn test_functions() {
        assert_eq!(count_star().to_sql(), "COUNT(*)");
        assert_eq!(sum(col("amount")).to_sql(), "SUM(\"amount\")");
        assert_eq!(
            coalesce([col("nick"), col("name")]).to_sql(),
            "COALESCE(\"nick\", \"name\")"
        );
    }

    #[test]
    fn test_not() {
        assert_eq!(col("active").eq(1).paren().not().to_sql(), "NOT (\"active\" = 1)");
    }
}
