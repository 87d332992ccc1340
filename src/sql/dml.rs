//! DML (Data Manipulation Language) support.
//!
//! Builders for INSERT, UPDATE and DELETE statements in SQLite syntax.
//!
//! # Examples
//!
//! ```ignore
//! use shellite::dml::{Delete, Insert, Update};
//! use shellite::expr::{col, lit_int, lit_str, ExprExt};
//!
//! let insert = Insert::into("users")
//!     .columns(["name", "email"])
//!     .values([lit_str("Alice"), lit_str("alice@example.com")]);
//!
//! let update = Update::table("users")
//!     .set("status", lit_str("active"))
//!     .filter(col("id").eq(lit_int(1)));
//!
//! let delete = Delete::from("users")
//!     .filter(col("status").eq(lit_str("inactive")));
//! ```

use super::expr::{Expr, ExprExt};
use super::token::{Token, TokenStream};

// ============================================================================
// INSERT
// ============================================================================

/// INSERT statement.
#[derive(Debug, Clone)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Vec<Expr>>,
    pub on_conflict: Option<OnConflict>,
    pub returning: Vec<Expr>,
}

impl Insert {
    /// Create a new INSERT statement.
    pub fn into(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
            on_conflict: None,
            returning: Vec::new(),
        }
    }

    /// Set the columns to insert.
    pub fn columns(mut self, cols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = cols.into_iter().map(|c| c.into()).collect();
        self
    }

    /// Add a row of values.
    pub fn values(mut self, vals: impl IntoIterator<Item = impl Into<Expr>>) -> Self {
        self.values
            .push(vals.into_iter().map(|v| v.into()).collect());
        self
    }

    /// Add ON CONFLICT clause.
    pub fn on_conflict(mut self, conflict: OnConflict) -> Self {
        self.on_conflict = Some(conflict);
        self
    }

    /// Add RETURNING clause.
    pub fn returning(mut self, exprs: impl IntoIterator<Item = impl Into<Expr>>) -> Self {
        self.returning = exprs.into_iter().map(|e| e.into()).collect();
        self
    }

    /// Convert to SQL.
    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Convert to a token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Insert)
            .space()
            .push(Token::Into)
            .space()
            .push(Token::Ident(self.table.clone()));

        if !self.columns.is_empty() {
            ts.space().lparen();
            for (i, col) in self.columns.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.push(Token::Ident(col.clone()));
            }
            ts.rparen();
        }

        if !self.values.is_empty() {
            ts.space().push(Token::Values);
            for (row_idx, row) in self.values.iter().enumerate() {
                if row_idx > 0 {
                    ts.comma();
                }
                ts.space().lparen();
                for (i, val) in row.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&val.to_tokens());
                }
                ts.rparen();
            }
        }

        if let Some(ref conflict) = self.on_conflict {
            ts.space().append(&conflict.to_tokens());
        }

        append_returning(&mut ts, &self.returning);
        ts
    }
}

/// ON CONFLICT clause for INSERT.
#[derive(Debug, Clone)]
pub enum OnConflict {
    DoNothing,
    DoUpdate {
        conflict_columns: Vec<String>,
        set: Vec<(String, Expr)>,
    },
}

impl OnConflict {
    /// Create ON CONFLICT DO NOTHING.
    pub fn do_nothing() -> Self {
        OnConflict::DoNothing
    }

    /// Create ON CONFLICT DO UPDATE.
    pub fn do_update(
        conflict_columns: impl IntoIterator<Item = impl Into<String>>,
        set: impl IntoIterator<Item = (impl Into<String>, Expr)>,
    ) -> Self {
        OnConflict::DoUpdate {
            conflict_columns: conflict_columns.into_iter().map(|c| c.into()).collect(),
            set: set.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Convert to a token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            OnConflict::DoNothing => {
                ts.push(Token::On)
                    .space()
                    .push(Token::Conflict)
                    .space()
                    .push(Token::Do)
                    .space()
                    .push(Token::Nothing);
            }
            OnConflict::DoUpdate {
                conflict_columns,
                set,
            } => {
                ts.push(Token::On)
                    .space()
                    .push(Token::Conflict)
                    .space()
                    .lparen();
                for (i, col) in conflict_columns.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.push(Token::Ident(col.clone()));
                }
                ts.rparen()
                    .space()
                    .push(Token::Do)
                    .space()
                    .push(Token::Update)
                    .space()
                    .push(Token::Set)
                    .space();
                for (i, (col, value)) in set.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.push(Token::Ident(col.clone()))
                        .space()
                        .push(Token::Eq)
                        .space()
                        .append(&value.to_tokens());
                }
            }
        }

        ts
    }
}

// ============================================================================
// UPDATE
// ============================================================================

/// UPDATE statement.
#[derive(Debug, Clone)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Update {
    pub table: String,
    pub set: Vec<(String, Expr)>,
    pub filter: Option<Expr>,
    pub returning: Vec<Expr>,
}

impl Update {
    /// Create a new UPDATE statement.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            set: Vec::new(),
            filter: None,
            returning: Vec::new(),
        }
    }

    /// Add a SET assignment.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.set.push((column.into(), value.into()));
        self
    }

    /// Set the WHERE clause, AND-ing with any existing filter.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Add RETURNING clause.
    pub fn returning(mut self, exprs: impl IntoIterator<Item = impl Into<Expr>>) -> Self {
        self.returning = exprs.into_iter().map(|e| e.into()).collect();
        self
    }

    /// Convert to SQL.
    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Convert to a token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Update)
            .space()
            .push(Token::Ident(self.table.clone()))
            .space()
            .push(Token::Set)
            .space();

        for (i, (col, value)) in self.set.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(Token::Ident(col.clone()))
                .space()
                .push(Token::Eq)
                .space()
                .append(&value.to_tokens());
        }

        if let Some(ref filter) = self.filter {
            ts.space()
                .push(Token::Where)
                .space()
                .append(&filter.to_tokens());
        }

        append_returning(&mut ts, &self.returning);
        ts
    }
}

// ============================================================================
// DELETE
// ============================================================================

/// DELETE statement.
#[derive(Debug, Clone)]
#[must_use = "DML statements have no effect until converted to SQL with to_sql()"]
pub struct Delete {
    pub table: String,
    pub filter: Option<Expr>,
    pub returning: Vec<Expr>,
}

impl Delete {
    /// Create a new DELETE statement.
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filter: None,
            returning: Vec::new(),
        }
    }

    /// Set the WHERE clause, AND-ing with any existing filter.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Add RETURNING clause.
    pub fn returning(mut self, exprs: impl IntoIterator<Item = impl Into<Expr>>) -> Self {
        self.returning = exprs.into_iter().map(|e| e.into()).collect();
        self
    }

    /// Convert to SQL.
    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Convert to a token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Delete)
            .space()
            .push(Token::From)
            .space()
            .push(Token::Ident(self.table.clone()));

        if let Some(ref filter) = self.filter {
            ts.space()
                .push(Token::Where)
                .space()
                .append(&filter.to_tokens());
        }

        append_returning(&mut ts, &self.returning);
        ts
    }
}

fn append_returning(ts: &mut TokenStream, returning: &[Expr]) {
    if returning.is_empty() {
        return;
    }
    ts.space().push(Token::Returning).space();
    for (i, expr) in returning.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.append(&expr.to_tokens());
    }
}
