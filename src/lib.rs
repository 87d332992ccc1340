//! # shellite
//!
//! SQLite access by driving the `sqlite3` shell as a child process.
//!
//! No SQLite library is linked. A [`shell::Session`] spawns the shell binary,
//! fixes its output mode to JSON, and speaks a sentinel-framed
//! request/response protocol over the child's pipes. Everything above the
//! session is SQL-string construction.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          CRUD layer (db::Database) / CLI                 │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql builders]
//! ┌─────────────────────────────────────────────────────────┐
//! │                   SQL statement text                     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [execute / sql]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Session: framed protocol + timeout + decode       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ stdin/stdout/stderr pipes
//! ┌─────────────────────────────────────────────────────────┐
//! │                 sqlite3 child process                    │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod shell;
pub mod sql;

// Re-export SQL submodules at crate level for convenient paths
pub use sql::ddl;
pub use sql::dml;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::db::Database;
    pub use crate::shell::{
        DecodeMode, QueryOutput, Row, Session, SessionConfig, SessionError, SessionResult, MEMORY,
    };
    pub use crate::sql::{
        avg, coalesce, col, count, count_star, func, lit_bool, lit_float, lit_int, lit_json,
        lit_null, lit_str, max, min, star, sum, table_col,
        // Types
        ColumnDef, CreateTable, DataType, Delete, DropTable, Expr, ExprExt, Insert, Literal,
        OnConflict, OrderByExpr, Select, SelectExpr, SortDir, Update,
    };
}

// Also export the most-used items at the crate root
pub use db::Database;
pub use shell::{DecodeMode, QueryOutput, Row, Session, SessionConfig, SessionError, SessionResult};
pub use sql::{col, lit_int, lit_str, Expr, ExprExt, Select};
