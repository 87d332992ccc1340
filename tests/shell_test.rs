//! Live-process tests for the session protocol.
//!
//! These spawn a real sqlite3 shell and are skipped when the binary is not
//! on the search path.

use std::time::Duration;

use serde_json::json;
use shellite::shell::{DecodeMode, QueryOutput, Session, SessionConfig, SessionError};

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

#[tokio::test]
async fn select_arithmetic_returns_row_list() {
    require_sqlite3!();
    let mut session = Session::in_memory(SessionConfig::default()).await.unwrap();

    let output = session.sql("SELECT 1+1").await.unwrap();
    let rows = output.rows().expect("expected rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["1+1"], json!(2));

    session.close().await.unwrap();
}

#[tokio::test]
async fn ddl_returns_no_data() {
    require_sqlite3!();
    let mut session = Session::in_memory(SessionConfig::default()).await.unwrap();

    let output = session
        .sql("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL)")
        .await
        .unwrap();
    assert!(output.is_none());

    let output = session
        .sql("SELECT name FROM sqlite_master WHERE type='table'")
        .await
        .unwrap();
    let rows = output.rows().expect("expected rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], json!("users"));

    session.close().await.unwrap();
}

#[tokio::test]
async fn engine_error_carries_diagnostic_text() {
    require_sqlite3!();
    let mut session = Session::in_memory(SessionConfig::default()).await.unwrap();

    let err = session.sql("SELECT * FROM missing").await.unwrap_err();
    match err {
        SessionError::Engine { command, message } => {
            assert!(command.contains("missing"));
            assert!(
                message.contains("no such table"),
                "unexpected engine message: {message}"
            );
        }
        other => panic!("expected Engine error, got {other:?}"),
    }

    // The sentinel still framed the failed command, so the session keeps
    // working afterward.
    let output = session.sql("SELECT 2 AS n").await.unwrap();
    assert_eq!(output.rows().unwrap()[0]["n"], json!(2));

    session.close().await.unwrap();
}

#[tokio::test]
async fn consecutive_commands_do_not_leak() {
    require_sqlite3!();
    let mut session = Session::in_memory(SessionConfig::default()).await.unwrap();

    let first = session.sql("SELECT 1 AS a").await.unwrap();
    assert_eq!(first.rows().unwrap()[0]["a"], json!(1));

    let second = session.sql("SELECT 2 AS b").await.unwrap();
    let rows = second.rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 1);
    assert_eq!(rows[0]["b"], json!(2));

    session.close().await.unwrap();
}

#[tokio::test]
async fn slow_query_times_out() {
    require_sqlite3!();
    let config = SessionConfig::default().timeout(Duration::from_millis(50));
    let mut session = Session::in_memory(config).await.unwrap();

    let slow = "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x+1 FROM c WHERE x < 50000000) \
                SELECT count(*) FROM c";
    let err = session.sql(slow).await.unwrap_err();
    assert!(err.requires_reopen());
    match err {
        SessionError::QueryTimeout {
            command,
            timeout_ms,
        } => {
            assert_eq!(timeout_ms, 50);
            assert!(command.contains("RECURSIVE"));
        }
        other => panic!("expected QueryTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn closed_session_rejects_commands() {
    require_sqlite3!();
    let mut session = Session::in_memory(SessionConfig::default()).await.unwrap();

    session.close().await.unwrap();
    assert!(!session.is_open());

    let err = session.sql("SELECT 1").await.unwrap_err();
    assert!(matches!(err, SessionError::NotConnected));

    let err = session.close().await.unwrap_err();
    assert!(matches!(err, SessionError::AlreadyClosed));
}

#[tokio::test]
async fn raw_mode_returns_text() {
    require_sqlite3!();
    let mut session = Session::in_memory(SessionConfig::default()).await.unwrap();

    session
        .sql("CREATE TABLE users (id INTEGER PRIMARY KEY)")
        .await
        .unwrap();

    let output = session.execute(".tables", DecodeMode::Raw).await.unwrap();
    match output {
        QueryOutput::Text(text) => assert!(text.contains("users")),
        other => panic!("expected Text, got {other:?}"),
    }

    session.close().await.unwrap();
}

#[tokio::test]
async fn empty_select_is_no_data_not_empty_rows() {
    require_sqlite3!();
    let mut session = Session::in_memory(SessionConfig::default()).await.unwrap();

    session
        .sql("CREATE TABLE t (x INTEGER)")
        .await
        .unwrap();
    let output = session.sql("SELECT * FROM t").await.unwrap();
    assert_eq!(output, QueryOutput::None);

    session.close().await.unwrap();
}

#[tokio::test]
async fn busy_timeout_bootstrap_succeeds() {
    require_sqlite3!();
    let config = SessionConfig::default().busy_timeout(Duration::from_millis(250));
    let mut session = Session::in_memory(config).await.unwrap();

    let output = session.sql("SELECT 1 AS ok").await.unwrap();
    assert_eq!(output.rows().unwrap()[0]["ok"], json!(1));

    session.close().await.unwrap();
}
