//! DDL (Data Definition Language) support.
//!
//! Builders for CREATE TABLE and DROP TABLE in SQLite syntax.
//!
//! # Examples
//!
//! ```ignore
//! use shellite::ddl::{ColumnDef, CreateTable, DataType, DropTable};
//!
//! let create = CreateTable::new("users")
//!     .if_not_exists()
//!     .column(ColumnDef::new("id", DataType::Integer).primary_key())
//!     .column(ColumnDef::new("name", DataType::Text).not_null());
//!
//! let drop = DropTable::new("users").if_exists();
//! ```

use super::expr::Literal;
use super::token::{Token, TokenStream};

/// SQLite column type affinities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Real,
    Text,
    Blob,
    Numeric,
}

impl DataType {
    fn keyword(self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Real => "REAL",
            DataType::Text => "TEXT",
            DataType::Blob => "BLOB",
            DataType::Numeric => "NUMERIC",
        }
    }
}

/// Column-level constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraint {
    PrimaryKey { autoincrement: bool },
    NotNull,
    Unique,
    Default(Literal),
}

/// One column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDef {
    /// Create a column definition.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            constraints: Vec::new(),
        }
    }

    /// PRIMARY KEY.
    pub fn primary_key(mut self) -> Self {
        self.constraints
            .push(ColumnConstraint::PrimaryKey {
                autoincrement: false,
            });
        self
    }

    /// PRIMARY KEY AUTOINCREMENT.
    pub fn primary_key_autoincrement(mut self) -> Self {
        self.constraints
            .push(ColumnConstraint::PrimaryKey {
                autoincrement: true,
            });
        self
    }

    /// NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.constraints.push(ColumnConstraint::NotNull);
        self
    }

    /// UNIQUE.
    pub fn unique(mut self) -> Self {
        self.constraints.push(ColumnConstraint::Unique);
        self
    }

    /// DEFAULT value.
    pub fn default_value(mut self, value: Literal) -> Self {
        self.constraints.push(ColumnConstraint::Default(value));
        self
    }

    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.name.clone()))
            .space()
            .push(Token::Raw(self.data_type.keyword().to_string()));

        for constraint in &self.constraints {
            ts.space();
            match constraint {
                ColumnConstraint::PrimaryKey { autoincrement } => {
                    ts.push(Token::Primary).space().push(Token::Key);
                    if *autoincrement {
                        ts.space().push(Token::Autoincrement);
                    }
                }
                ColumnConstraint::NotNull => {
                    ts.push(Token::Not).space().push(Token::Null);
                }
                ColumnConstraint::Unique => {
                    ts.push(Token::Unique);
                }
                ColumnConstraint::Default(value) => {
                    ts.push(Token::Default).space();
                    let token = match value {
                        Literal::Int(n) => Token::LitInt(*n),
                        Literal::Float(f) => Token::LitFloat(*f),
                        Literal::String(s) => Token::LitString(s.clone()),
                        Literal::Bool(b) => Token::LitBool(*b),
                        Literal::Null => Token::LitNull,
                    };
                    ts.push(token);
                }
            }
        }

        ts
    }
}

/// CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct CreateTable {
    pub table: String,
    pub if_not_exists: bool,
    pub columns: Vec<ColumnDef>,
}

impl CreateTable {
    /// Create a new CREATE TABLE statement.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            if_not_exists: false,
            columns: Vec::new(),
        }
    }

    /// Add IF NOT EXISTS.
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    /// Add a column.
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Convert to SQL.
    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Convert to a token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Create).space().push(Token::Table).space();
        if self.if_not_exists {
            ts.push(Token::If)
                .space()
                .push(Token::Not)
                .space()
                .push(Token::Exists)
                .space();
        }
        ts.push(Token::Ident(self.table.clone())).space().lparen();

        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.append(&column.to_tokens());
        }

        ts.rparen();
        ts
    }
}

/// DROP TABLE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "DDL statements have no effect until converted to SQL with to_sql()"]
pub struct DropTable {
    pub table: String,
    pub if_exists: bool,
}

impl DropTable {
    /// Create a new DROP TABLE statement.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            if_exists: false,
        }
    }

    /// Add IF EXISTS.
    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    /// Convert to SQL.
    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Convert to a token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Drop).space().push(Token::Table).space();
        if self.if_exists {
            ts.push(Token::If).space().push(Token::Exists).space();
        }
        ts.push(Token::Ident(self.table.clone()));
        ts
    }
}
