//! Decoding of raw sqlite3 responses into structured values.
//!
//! The session bootstraps the engine with `.mode json`, so row-producing
//! statements answer with a JSON array of row objects. Statements with no
//! rows answer with empty output, which decodes to a distinct "no data"
//! signal rather than an empty row list.

use serde_json::Value;

use super::error::{SessionError, SessionResult};

/// One result row: column name to JSON value.
pub type Row = serde_json::Map<String, Value>;

/// How the caller wants a response interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Return the trimmed response text unparsed.
    Raw,
    /// Parse the response as JSON rows.
    Structured,
}

/// Decoded result of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// The command produced no output (DDL, DML without RETURNING).
    None,
    /// Structured rows from a JSON response.
    Rows(Vec<Row>),
    /// Raw response text, unparsed.
    Text(String),
}

impl QueryOutput {
    /// Whether this is the "no data" signal.
    pub fn is_none(&self) -> bool {
        matches!(self, QueryOutput::None)
    }

    /// The rows, if this output is structured.
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            QueryOutput::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// Consume into rows; "no data" becomes an empty list.
    pub fn into_rows(self) -> SessionResult<Vec<Row>> {
        match self {
            QueryOutput::None => Ok(Vec::new()),
            QueryOutput::Rows(rows) => Ok(rows),
            QueryOutput::Text(raw) => Err(SessionError::UnexpectedShape { raw }),
        }
    }
}

/// Interpret a raw response according to the requested mode.
pub fn decode(raw: &str, mode: DecodeMode) -> SessionResult<QueryOutput> {
    if raw.is_empty() {
        tracing::trace!(?mode, "empty response, no data");
        return Ok(QueryOutput::None);
    }

    match mode {
        DecodeMode::Raw => Ok(QueryOutput::Text(raw.to_string())),
        DecodeMode::Structured => {
            let value: Value = serde_json::from_str(raw).map_err(|source| SessionError::Decode {
                raw: raw.to_string(),
                source,
            })?;
            let rows = rows_from_value(value, raw)?;
            tracing::trace!(rows = rows.len(), "decoded structured response");
            Ok(QueryOutput::Rows(rows))
        }
    }
}

/// A query response is always tabular (a list of row objects) or absent; the
/// bootstrap fixes the output format to JSON objects. A bare scalar means a
/// statement whose output format deviates, or a framing bug.
fn rows_from_value(value: Value, raw: &str) -> SessionResult<Vec<Row>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                _ => Err(SessionError::UnexpectedShape {
                    raw: raw.to_string(),
                }),
            })
            .collect(),
        Value::Object(row) => Ok(vec![row]),
        _ => Err(SessionError::UnexpectedShape {
            raw: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_is_no_data_in_both_modes() {
        assert_eq!(decode("", DecodeMode::Raw).unwrap(), QueryOutput::None);
        assert_eq!(
            decode("", DecodeMode::Structured).unwrap(),
            QueryOutput::None
        );
    }

    #[test]
    fn test_raw_mode_passes_text_through() {
        let out = decode("users  posts", DecodeMode::Raw).unwrap();
        assert_eq!(out, QueryOutput::Text("users  posts".to_string()));
    }

    #[test]
    fn test_structured_row_list() {
        let out = decode(r#"[{"id":1,"name":"John Doe"},{"id":2,"name":"Jane"}]"#, DecodeMode::Structured).unwrap();
        let rows = out.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], json!(1));
        assert_eq!(rows[1]["name"], json!("Jane"));
    }

    #[test]
    fn test_bare_object_is_one_row() {
        let out = decode(r#"{"count":3}"#, DecodeMode::Structured).unwrap();
        let rows = out.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["count"], json!(3));
    }

    #[test]
    fn test_scalar_is_unexpected_shape() {
        let err = decode("42", DecodeMode::Structured).unwrap_err();
        assert!(matches!(err, SessionError::UnexpectedShape { .. }));
    }

    #[test]
    fn test_array_of_scalars_is_unexpected_shape() {
        let err = decode("[1,2,3]", DecodeMode::Structured).unwrap_err();
        assert!(matches!(err, SessionError::UnexpectedShape { .. }));
    }

    #[test]
    fn test_invalid_json_is_decode_failure() {
        let err = decode("not json at all", DecodeMode::Structured).unwrap_err();
        match err {
            SessionError::Decode { raw, .. } => assert_eq!(raw, "not json at all"),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn test_into_rows_flattens_no_data() {
        assert!(QueryOutput::None.into_rows().unwrap().is_empty());
        let rows = QueryOutput::Rows(vec![Row::new()]).into_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert!(QueryOutput::Text("x".to_string()).into_rows().is_err());
    }

    #[test]
    fn test_integer_values_stay_integers() {
        let out = decode(r#"[{"1+1":2}]"#, DecodeMode::Structured).unwrap();
        let rows = out.rows().unwrap();
        assert_eq!(rows[0]["1+1"], json!(2));
        assert!(rows[0]["1+1"].is_i64());
    }
}
