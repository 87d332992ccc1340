//! CRUD convenience layer over a [`Session`].
//!
//! `Database` wraps a session and turns builder-generated SQL into calls on
//! the session's public operations. Nothing here touches the process streams
//! directly; every statement goes through the framed protocol.

use serde_json::Value;

use crate::shell::{
    DecodeMode, QueryOutput, Session, SessionConfig, SessionError, SessionResult,
};
use crate::sql::{
    col, lit_json, CreateTable, Delete, DropTable, Expr, ExprExt, Insert, Select, Update,
};

/// A database handle: one session plus statement builders.
///
/// # Example
///
/// ```ignore
/// use shellite::db::Database;
/// use shellite::shell::SessionConfig;
/// use serde_json::json;
///
/// let mut db = Database::in_memory(SessionConfig::default()).await?;
/// db.sql("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL)").await?;
/// db.insert("users", &json!({"id": 1, "name": "John Doe"})).await?;
/// let rows = db.select_all("users").await?;
/// db.close().await?;
/// ```
pub struct Database {
    session: Session,
}

impl Database {
    /// Open a database file.
    pub async fn open(path: impl Into<String>, config: SessionConfig) -> SessionResult<Self> {
        Ok(Self {
            session: Session::open(path, config).await?,
        })
    }

    /// Open an in-memory database.
    pub async fn in_memory(config: SessionConfig) -> SessionResult<Self> {
        Ok(Self {
            session: Session::in_memory(config).await?,
        })
    }

    /// Close the underlying session.
    pub async fn close(&mut self) -> SessionResult<()> {
        self.session.close().await
    }

    /// Access the underlying session.
    pub fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Run a SQL statement with structured decoding.
    pub async fn sql(&mut self, command: &str) -> SessionResult<QueryOutput> {
        self.session.sql(command).await
    }

    /// Run a command in an explicit decode mode.
    pub async fn execute(
        &mut self,
        command: &str,
        mode: DecodeMode,
    ) -> SessionResult<QueryOutput> {
        self.session.execute(command, mode).await
    }

    /// Insert one row given as a JSON object.
    ///
    /// Keys become column names and values become literals. Returns the
    /// inserted row via `RETURNING *`, so generated rowids are visible.
    pub async fn insert(&mut self, table: &str, row: &Value) -> SessionResult<QueryOutput> {
        let fields = row.as_object().ok_or_else(|| {
            SessionError::InvalidRequest(format!("insert into {table}: row must be a JSON object"))
        })?;
        if fields.is_empty() {
            return Err(SessionError::InvalidRequest(format!(
                "insert into {table}: row must have at least one field"
            )));
        }

        let statement = Insert::into(table)
            .columns(fields.keys().cloned())
            .values(fields.values().map(lit_json))
            .returning([crate::sql::star()]);
        self.sql(&statement.to_sql()).await
    }

    /// Select every row of a table.
    pub async fn select_all(&mut self, table: &str) -> SessionResult<QueryOutput> {
        self.select(Select::from(table)).await
    }

    /// Select rows matching a filter expression.
    pub async fn select_where(&mut self, table: &str, filter: Expr) -> SessionResult<QueryOutput> {
        self.select(Select::from(table).filter(filter)).await
    }

    /// Run a built SELECT query.
    pub async fn select(&mut self, query: Select) -> SessionResult<QueryOutput> {
        self.sql(&query.to_sql()).await
    }

    /// Update rows matching a filter, with assignments given as a JSON object.
    pub async fn update_where(
        &mut self,
        table: &str,
        set: &Value,
        filter: Expr,
    ) -> SessionResult<QueryOutput> {
        let fields = set.as_object().ok_or_else(|| {
            SessionError::InvalidRequest(format!("update {table}: set must be a JSON object"))
        })?;
        if fields.is_empty() {
            return Err(SessionError::InvalidRequest(format!(
                "update {table}: set must have at least one field"
            )));
        }

        let mut statement = Update::table(table).filter(filter);
        for (column, value) in fields {
            statement = statement.set(column.clone(), lit_json(value));
        }
        self.sql(&statement.to_sql()).await
    }

    /// Delete rows matching a filter.
    pub async fn delete_where(&mut self, table: &str, filter: Expr) -> SessionResult<QueryOutput> {
        self.sql(&Delete::from(table).filter(filter).to_sql()).await
    }

    /// Run a built CREATE TABLE statement.
    pub async fn create_table(&mut self, statement: CreateTable) -> SessionResult<QueryOutput> {
        self.sql(&statement.to_sql()).await
    }

    /// Drop a table if it exists.
    pub async fn drop_table(&mut self, table: &str) -> SessionResult<QueryOutput> {
        self.sql(&DropTable::new(table).if_exists().to_sql()).await
    }

    /// Names of the user tables in the database.
    pub async fn tables(&mut self) -> SessionResult<Vec<String>> {
        let query = Select::from("sqlite_master")
            .columns([col("name")])
            .filter(col("type").eq("table"))
            .filter(col("name").like("sqlite_%").not());
        let rows = self.select(query).await?.into_rows()?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.get("name").and_then(Value::as_str).map(String::from))
            .collect())
    }

    /// Column metadata for a table, from `pragma_table_info`.
    pub async fn columns(&mut self, table: &str) -> SessionResult<QueryOutput> {
        let query = format!(
            "SELECT * FROM pragma_table_info({})",
            crate::sql::quote_str(table)
        );
        self.sql(&query).await
    }
}
