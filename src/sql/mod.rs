//! SQL generation module.
//!
//! A type-safe SQL builder targeting SQLite. It includes:
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`ddl`] - Data Definition Language (CREATE TABLE, DROP TABLE)
//! - [`dml`] - Data Manipulation Language (INSERT, UPDATE, DELETE)
//! - [`token`] - Token types and quoting helpers

pub mod ddl;
pub mod dml;
pub mod expr;
pub mod query;
pub mod token;

// Re-export commonly used types at the sql module level
pub use expr::{
    avg, coalesce, col, count, count_star, func, lit_bool, lit_float, lit_int, lit_json, lit_null,
    lit_str, max, min, star, sum, table_col, BinaryOperator, Expr, ExprExt, Literal, UnaryOperator,
};
pub use query::{OrderByExpr, Select, SelectExpr, SortDir};
pub use token::{quote_ident, quote_str, Token, TokenStream};

// Re-export DDL types
pub use ddl::{ColumnConstraint, ColumnDef, CreateTable, DataType, DropTable};

// Re-export DML types
pub use dml::{Delete, Insert, OnConflict, Update};
