//! Live-process tests for the CRUD layer.
//!
//! These spawn a real sqlite3 shell and are skipped when the binary is not
//! on the search path.

use serde_json::json;
use shellite::db::Database;
use shellite::shell::{QueryOutput, SessionConfig, SessionError};
use shellite::sql::{col, ColumnDef, CreateTable, DataType, ExprExt};

fn sqlite3_available() -> bool {
    std::process::Command::new("sqlite3")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

macro_rules! require_sqlite3 {
    () => {
        if !sqlite3_available() {
            eprintln!("skipping: sqlite3 not on PATH");
            return;
        }
    };
}

async fn users_db() -> Database {
    let mut db = Database::in_memory(SessionConfig::default()).await.unwrap();
    db.create_table(
        CreateTable::new("users")
            .column(ColumnDef::new("id", DataType::Integer).primary_key())
            .column(ColumnDef::new("name", DataType::Text).not_null()),
    )
    .await
    .unwrap();
    db
}

#[tokio::test]
async fn insert_select_round_trip() {
    require_sqlite3!();
    let mut db = users_db().await;

    let inserted = db
        .insert("users", &json!({"id": 1, "name": "John Doe"}))
        .await
        .unwrap();
    let rows = inserted.rows().expect("RETURNING should produce rows");
    assert_eq!(rows[0]["id"], json!(1));
    assert_eq!(rows[0]["name"], json!("John Doe"));

    let output = db.select_all("users").await.unwrap();
    let rows = output.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], json!(1));
    assert_eq!(rows[0]["name"], json!("John Doe"));

    db.close().await.unwrap();
}

#[tokio::test]
async fn delete_then_select_is_no_data() {
    require_sqlite3!();
    let mut db = users_db().await;

    db.insert("users", &json!({"id": 1, "name": "John Doe"}))
        .await
        .unwrap();
    db.delete_where("users", col("id").eq(1)).await.unwrap();

    let output = db.select_all("users").await.unwrap();
    assert_eq!(output, QueryOutput::None);

    db.close().await.unwrap();
}

#[tokio::test]
async fn update_changes_matching_rows() {
    require_sqlite3!();
    let mut db = users_db().await;

    db.insert("users", &json!({"id": 1, "name": "John Doe"}))
        .await
        .unwrap();
    db.insert("users", &json!({"id": 2, "name": "Jane Doe"}))
        .await
        .unwrap();

    db.update_where("users", &json!({"name": "Renamed"}), col("id").eq(1))
        .await
        .unwrap();

    let output = db
        .select_where("users", col("name").eq("Renamed"))
        .await
        .unwrap();
    let rows = output.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], json!(1));

    db.close().await.unwrap();
}

#[tokio::test]
async fn insert_rejects_non_object_rows() {
    require_sqlite3!();
    let mut db = users_db().await;

    let err = db.insert("users", &json!([1, 2])).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidRequest(_)));

    let err = db.insert("users", &json!({})).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidRequest(_)));

    db.close().await.unwrap();
}

#[tokio::test]
async fn tables_lists_user_tables_only() {
    require_sqlite3!();
    let mut db = users_db().await;

    let tables = db.tables().await.unwrap();
    assert_eq!(tables, vec!["users".to_string()]);

    db.drop_table("users").await.unwrap();
    let tables = db.tables().await.unwrap();
    assert!(tables.is_empty());

    db.close().await.unwrap();
}

#[tokio::test]
async fn columns_reports_table_info() {
    require_sqlite3!();
    let mut db = users_db().await;

    let output = db.columns("users").await.unwrap();
    let rows = output.rows().unwrap();
    let names: Vec<&str> = rows
        .iter()
        .filter_map(|row| row.get("name").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(names, vec!["id", "name"]);

    db.close().await.unwrap();
}

#[tokio::test]
async fn file_backed_database_persists() {
    require_sqlite3!();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.db").to_string_lossy().to_string();

    let mut db = Database::open(&path, SessionConfig::default()).await.unwrap();
    db.sql("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)")
        .await
        .unwrap();
    db.insert("notes", &json!({"id": 1, "body": "persisted"}))
        .await
        .unwrap();
    db.close().await.unwrap();

    let mut db = Database::open(&path, SessionConfig::default()).await.unwrap();
    let output = db.select_all("notes").await.unwrap();
    let rows = output.rows().unwrap();
    assert_eq!(rows[0]["body"], json!("persisted"));
    db.close().await.unwrap();
}

#[tokio::test]
async fn type_coercion_preserves_integers_and_strings() {
    require_sqlite3!();
    let mut db = Database::in_memory(SessionConfig::default()).await.unwrap();
    db.sql("CREATE TABLE mixed (i INTEGER, f REAL, s TEXT, b INTEGER)")
        .await
        .unwrap();
    db.insert(
        "mixed",
        &json!({"i": 42, "f": 2.5, "s": "text", "b": true}),
    )
    .await
    .unwrap();

    let output = db.select_all("mixed").await.unwrap();
    let row = &output.rows().unwrap()[0];
    assert_eq!(row["i"], json!(42));
    assert_eq!(row["f"], json!(2.5));
    assert_eq!(row["s"], json!("text"));
    assert_eq!(row["b"], json!(1));

    db.close().await.unwrap();
}
