//! SELECT query builder.

use super::expr::Expr;
use super::token::{Token, TokenStream};

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: SortDir,
}

impl OrderByExpr {
    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            dir: SortDir::Asc,
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            dir: SortDir::Desc,
        }
    }
}

/// One projected expression, with an optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: Some(alias.into()),
        }
    }
}

impl From<Expr> for SelectExpr {
    fn from(expr: Expr) -> Self {
        SelectExpr::new(expr)
    }
}

/// SELECT statement.
///
/// An empty column list projects `*`.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "queries have no effect until converted to SQL with to_sql()"]
pub struct Select {
    pub table: String,
    pub columns: Vec<SelectExpr>,
    pub distinct: bool,
    pub filter: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Select {
    /// Create a SELECT over a table.
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            distinct: false,
            filter: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Set the projected columns.
    pub fn columns(mut self, columns: impl IntoIterator<Item = impl Into<SelectExpr>>) -> Self {
        self.columns = columns.into_iter().map(|c| c.into()).collect();
        self
    }

    /// Add one projected expression.
    pub fn column(mut self, expr: impl Into<SelectExpr>) -> Self {
        self.columns.push(expr.into());
        self
    }

    /// SELECT DISTINCT.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Set the WHERE clause, AND-ing with any existing filter.
    pub fn filter(mut self, expr: Expr) -> Self {
        use super::expr::ExprExt;
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Add GROUP BY expressions.
    pub fn group_by(mut self, exprs: impl IntoIterator<Item = Expr>) -> Self {
        self.group_by.extend(exprs);
        self
    }

    /// Set the HAVING clause.
    pub fn having(mut self, expr: Expr) -> Self {
        self.having = Some(expr);
        self
    }

    /// Add an ORDER BY term.
    pub fn order_by(mut self, order: OrderByExpr) -> Self {
        self.order_by.push(order);
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Convert to SQL.
    pub fn to_sql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Convert to a token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Select).space();
        if self.distinct {
            ts.push(Token::Distinct).space();
        }

        if self.columns.is_empty() {
            ts.push(Token::Star);
        } else {
            for (i, column) in self.columns.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&column.expr.to_tokens());
                if let Some(ref alias) = column.alias {
                    ts.space()
                        .push(Token::As)
                        .space()
                        .push(Token::Ident(alias.clone()));
                }
            }
        }

        ts.space()
            .push(Token::From)
            .space()
            .push(Token::Ident(self.table.clone()));

        if let Some(ref filter) = self.filter {
            ts.space()
                .push(Token::Where)
                .space()
                .append(&filter.to_tokens());
        }

        if !self.group_by.is_empty() {
            ts.space().push(Token::GroupBy).space();
            for (i, expr) in self.group_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&expr.to_tokens());
            }
        }

        if let Some(ref having) = self.having {
            ts.space()
                .push(Token::Having)
                .space()
                .append(&having.to_tokens());
        }

        if !self.order_by.is_empty() {
            ts.space().push(Token::OrderBy).space();
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&order.expr.to_tokens());
                match order.dir {
                    SortDir::Asc => ts.space().push(Token::Asc),
                    SortDir::Desc => ts.space().push(Token::Desc),
                };
            }
        }

        if let Some(limit) = self.limit {
            ts.space()
                .push(Token::Limit)
                .space()
                .push(Token::LitInt(limit as i64));
        }

        if let Some(offset) = self.offset {
            ts.space()
                .push(Token::Offset)
                .space()
                .push(Token::LitInt(offset as i64));
        }

        ts
    }
}
